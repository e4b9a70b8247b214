use std::fmt::{ self,
                Display,
                Formatter };
use crate::runtime::{ data_structures::dictionary::WordId,
                      error::{ self,
                               type_mismatch },
                      interpreter::Interpreter };



/// The element type of the operand stack.  Also what word bodies and quotations are made of.
///
/// Exactly one variant is active at a time.  Reading a value as the wrong variant through the
/// `as_*` accessors is reported as a type mismatch.
#[derive(Clone, PartialEq, Debug, Default)]
pub enum Value
{
    /// A variable slot that has never been written to.
    #[default]
    Uninitialized,

    Boolean(bool),

    /// A signed integer.
    Number(i64),

    /// Raw text from a string literal.
    String(String),

    /// A reference to a slot in the variable store, by name.
    VariableRef(String),

    /// A reference to a word in the dictionary.  The layer is the definition of the word that was
    /// current when the reference was resolved, later redefinitions do not affect it.
    WordRef
    {
        id: WordId,
        name: String,
        layer: usize
    },

    /// A sequence of values captured when it was parsed.
    Quotation(Vec<Value>)
}


/// Convert an arbitrary data type to a Value.
pub trait ToValue
{
    fn to_value(&self) -> Value;
}


impl ToValue for i64
{
    fn to_value(&self) -> Value
    {
        Value::Number(*self)
    }
}


impl ToValue for usize
{
    fn to_value(&self) -> Value
    {
        Value::Number(*self as i64)
    }
}


impl ToValue for bool
{
    fn to_value(&self) -> Value
    {
        Value::Boolean(*self)
    }
}


/// Render a value the way the stack and dictionary listings show it.
impl Display for Value
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match self
        {
            Value::Uninitialized           => write!(f, "nil"),
            Value::Boolean(value)          => write!(f, "{}", value),
            Value::Number(value)           => write!(f, "{}", value),
            Value::String(value)           => write!(f, "\"{}\"", value),
            Value::VariableRef(name)       => write!(f, "{}", name),
            Value::WordRef { name, .. }    => write!(f, "{}", name),
            Value::Quotation(values)       =>
                {
                    write!(f, "[ ")?;

                    for value in values.iter()
                    {
                        write!(f, "{} ", value)?;
                    }

                    write!(f, "]")
                }
        }
    }
}


impl Value
{
    /// Name of the active variant, used in error messages.
    pub fn type_name(&self) -> &'static str
    {
        match self
        {
            Value::Uninitialized   => "uninitialized",
            Value::Boolean(_)      => "boolean",
            Value::Number(_)       => "number",
            Value::String(_)       => "string",
            Value::VariableRef(_)  => "variable",
            Value::WordRef { .. }  => "word",
            Value::Quotation(_)    => "quotation"
        }
    }

    /// Do both values hold the same variant?
    pub fn same_variant(&self, other: &Value) -> bool
    {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn is_word_ref(&self) -> bool
    {
        matches!(self, Value::WordRef { .. })
    }

    fn mismatch<T>(&self, interpreter: &dyn Interpreter, expected: &str) -> error::Result<T>
    {
        type_mismatch(interpreter,
                      format!("expected {}, got '{}' ({})", expected, self, self.type_name()))
    }

    pub fn as_number(&self, interpreter: &dyn Interpreter) -> error::Result<i64>
    {
        match self
        {
            Value::Number(value) => Ok(*value),
            _                    => self.mismatch(interpreter, "number")
        }
    }

    pub fn as_bool(&self, interpreter: &dyn Interpreter) -> error::Result<bool>
    {
        match self
        {
            Value::Boolean(value) => Ok(*value),
            _                     => self.mismatch(interpreter, "boolean")
        }
    }

    pub fn as_variable(&self, interpreter: &dyn Interpreter) -> error::Result<&String>
    {
        match self
        {
            Value::VariableRef(name) => Ok(name),
            _                        => self.mismatch(interpreter, "variable")
        }
    }

    pub fn as_quotation(&self, interpreter: &dyn Interpreter) -> error::Result<&Vec<Value>>
    {
        match self
        {
            Value::Quotation(values) => Ok(values),
            _                        => self.mismatch(interpreter, "quotation")
        }
    }

    /// Take the element list out of a quotation value.
    pub fn into_quotation(self, interpreter: &dyn Interpreter) -> error::Result<Vec<Value>>
    {
        match self
        {
            Value::Quotation(values) => Ok(values),
            other                    => other.mismatch(interpreter, "quotation")
        }
    }
}
