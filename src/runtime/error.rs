use std::{ error::Error,
           fmt::{ self, Debug, Display, Formatter } };
use thiserror::Error;
use crate::{ runtime::interpreter::CallStack,
             lang::source_buffer::SourceLocation };

use super::interpreter::Interpreter;



pub type Result<T> = std::result::Result<T, ScriptError>;


/// Deep recursion produces huge call stacks, only the innermost calls are shown.
const CALL_STACK_DISPLAY_LIMIT: usize = 16;



/// The part of the runtime an error originated from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Component
{
    /// Turning source text into tokens.
    Tokenizer,

    /// Turning tokens into values and word definitions.
    Compiler,

    /// Executing values against the stack.
    Interpreter,

    /// Finding and reading source files.
    Loader
}


impl Display for Component
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        let name = match self
            {
                Component::Tokenizer   => "Tokenizer",
                Component::Compiler    => "Compiler",
                Component::Interpreter => "Interpreter",
                Component::Loader      => "Loader"
            };

        write!(f, "{}", name)
    }
}



/// Every way processing a source unit can fail.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum ErrorKind
{
    #[error("malformed marker, {0}")]
    MalformedMarker(String),

    #[error("string literal was not closed")]
    UnterminatedStringLiteral,

    #[error("parenthesized comment was not closed")]
    UnterminatedComment,

    #[error("word definition terminator (' ; ') expected at end of word '{0}'")]
    UnterminatedDefinition(String),

    #[error("unexpected end of quotation without closing marker ']'")]
    UnterminatedQuotation,

    #[error("'{0}' is not a defined word or valid data type")]
    UnresolvedToken(String),

    #[error("deferred word '{0}' was executed before it was defined")]
    UnresolvedDeferredWord(String),

    #[error("type mismatch, {0}")]
    TypeMismatch(String),

    #[error("variable '{0}' is not defined")]
    UndefinedVariable(String),

    #[error("{0}")]
    FileAccessFailure(String),

    #[error("stack underflow, {0}")]
    StackUnderflow(String),

    #[error("unexpected {0}")]
    UnexpectedToken(String),

    #[error("'{0}' is not a known directive")]
    UnknownDirective(String),

    #[error("'{0}' is a primitive word and can not be redefined")]
    ReservedWord(String),

    #[error("invalid argument, {0}")]
    InvalidArgument(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),

    #[error("quotations nested more than {0} deep")]
    NestingTooDeep(usize),

    #[error("source files included more than {0} deep")]
    IncludeDepthExceeded(usize)
}


impl ErrorKind
{
    /// Which component raises this kind of error.
    pub fn component(&self) -> Component
    {
        match self
        {
            ErrorKind::MalformedMarker(_)
            | ErrorKind::UnterminatedStringLiteral
            | ErrorKind::UnterminatedComment => Component::Tokenizer,

            ErrorKind::UnterminatedDefinition(_)
            | ErrorKind::UnterminatedQuotation
            | ErrorKind::UnresolvedToken(_)
            | ErrorKind::UnexpectedToken(_)
            | ErrorKind::UnknownDirective(_)
            | ErrorKind::ReservedWord(_)
            | ErrorKind::NestingTooDeep(_) => Component::Compiler,

            ErrorKind::FileAccessFailure(_)
            | ErrorKind::IncludeDepthExceeded(_) => Component::Loader,

            ErrorKind::UnresolvedDeferredWord(_)
            | ErrorKind::TypeMismatch(_)
            | ErrorKind::UndefinedVariable(_)
            | ErrorKind::StackUnderflow(_)
            | ErrorKind::InvalidArgument(_)
            | ErrorKind::DivisionByZero
            | ErrorKind::CallDepthExceeded(_) => Component::Interpreter
        }
    }
}



/// Any error that occurs while tokenizing, compiling or running a script.
#[derive(Clone)]
pub struct ScriptError
{
    /// What went wrong.
    kind: ErrorKind,

    /// The location in the source code the error occurred, if available.
    location: Option<SourceLocation>,

    /// The script's call stack at the time of the error, if available.
    call_stack: Option<CallStack>
}


impl Error for ScriptError
{
    fn source(&self) -> Option<&(dyn Error + 'static)>
    {
        Some(&self.kind)
    }
}


impl Display for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match &self.location
        {
            Some(location) => write!(f, "{}: {}: {}", location, self.component(), self.kind)?,
            None => write!(f, "{}: {}", self.component(), self.kind)?
        }

        if let Some(call_stack) = &self.call_stack
            && !call_stack.is_empty()
        {
            write!(f, "\n\nCall stack\n")?;

            for item in call_stack.iter().rev().take(CALL_STACK_DISPLAY_LIMIT)
            {
                writeln!(f, "  {}", item)?;
            }

            if call_stack.len() > CALL_STACK_DISPLAY_LIMIT
            {
                writeln!(f, "  ... {} more", call_stack.len() - CALL_STACK_DISPLAY_LIMIT)?;
            }
        }

        Ok(())
    }
}


impl Debug for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "{}", self)
    }
}


impl ScriptError
{
    pub fn new(kind: ErrorKind,
               location: Option<SourceLocation>,
               call_stack: Option<CallStack>) -> ScriptError
    {
        ScriptError { kind, location, call_stack }
    }

    /// Create a new ScriptError and wrap it in a Result::Err.
    pub fn new_as_result<T>(kind: ErrorKind,
                            location: Option<SourceLocation>,
                            call_stack: Option<CallStack>) -> Result<T>
    {
        Err(ScriptError::new(kind, location, call_stack))
    }

    pub fn kind(&self) -> &ErrorKind
    {
        &self.kind
    }

    pub fn component(&self) -> Component
    {
        self.kind.component()
    }

    /// Human readable explanation of the failure, without location or call stack.
    pub fn explanation(&self) -> String
    {
        self.kind.to_string()
    }

    pub fn location(&self) -> &Option<SourceLocation>
    {
        &self.location
    }

    /// The name of the source unit the error was raised in, if known.
    pub fn source_name(&self) -> Option<&str>
    {
        self.location.as_ref().map(|location| location.path().as_str())
    }

    pub fn call_stack(&self) -> &Option<CallStack>
    {
        &self.call_stack
    }
}


impl From<std::io::Error> for ScriptError
{
    fn from(error: std::io::Error) -> ScriptError
    {
        ScriptError::new(ErrorKind::FileAccessFailure(format!("I/O error: {}", error)), None, None)
    }
}



/// Create a ScriptError wrapped in a Result::Err using the interpreter's current location and
/// call stack.
pub fn script_error<T>(interpreter: &dyn Interpreter, kind: ErrorKind) -> Result<T>
{
    let location = interpreter.current_location().clone();
    let call_stack = interpreter.call_stack().clone();

    ScriptError::new_as_result(kind, location, Some(call_stack))
}


/// Shorthand for the very common type mismatch report.
pub fn type_mismatch<T>(interpreter: &dyn Interpreter, message: String) -> Result<T>
{
    script_error(interpreter, ErrorKind::TypeMismatch(message))
}
