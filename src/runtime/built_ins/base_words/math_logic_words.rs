use crate::runtime::{
    built_ins::PrimitiveTable,
    data_structures::value::{ToValue, Value},
    error::{self, script_error, type_mismatch, ErrorKind},
    interpreter::Interpreter,
};

/// Pop two numbers, top first, and push the result of `bottom OP top`.
fn number_op<F>(interpreter: &mut dyn Interpreter, name: &str, op: F) -> error::Result<()>
where
    F: Fn(i64, i64) -> Value,
{
    interpreter.require_depth(2, name)?;

    let top = interpreter.pop_as_number()?;
    let bottom = interpreter.pop_as_number()?;

    interpreter.push(op(bottom, top));
    Ok(())
}

/// Like `number_op` but refuses a zero divisor.
fn division_op<F>(interpreter: &mut dyn Interpreter, name: &str, op: F) -> error::Result<()>
where
    F: Fn(i64, i64) -> i64,
{
    interpreter.require_depth(2, name)?;

    let top = interpreter.pop_as_number()?;
    let bottom = interpreter.pop_as_number()?;

    if top == 0 {
        return script_error(interpreter, ErrorKind::DivisionByZero);
    }

    interpreter.push(op(bottom, top).to_value());
    Ok(())
}

fn bool_op<F>(interpreter: &mut dyn Interpreter, name: &str, op: F) -> error::Result<()>
where
    F: Fn(bool, bool) -> bool,
{
    interpreter.require_depth(2, name)?;

    let top = interpreter.pop_as_bool()?;
    let bottom = interpreter.pop_as_bool()?;

    interpreter.push(op(bottom, top).to_value());
    Ok(())
}

/// Pop two values of the same variant and compare them.
fn values_equal(interpreter: &mut dyn Interpreter, name: &str) -> error::Result<bool> {
    interpreter.require_depth(2, name)?;

    let top = interpreter.pop()?;
    let bottom = interpreter.pop()?;

    if !top.same_variant(&bottom) {
        return type_mismatch(
            interpreter,
            format!(
                "'{}' can not compare {} '{}' with {} '{}'",
                name,
                bottom.type_name(),
                bottom,
                top.type_name(),
                top
            ),
        );
    }

    Ok(bottom == top)
}

/// Add two numbers.
///
/// Signature: `a b -- sum`
fn word_add(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    number_op(interpreter, "+", |a, b| Value::Number(a.wrapping_add(b)))
}

/// Subtract the top number from the one below it.
///
/// Signature: `a b -- difference`
fn word_subtract(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    number_op(interpreter, "-", |a, b| Value::Number(a.wrapping_sub(b)))
}

/// Multiply two numbers.
///
/// Signature: `a b -- product`
fn word_multiply(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    number_op(interpreter, "*", |a, b| Value::Number(a.wrapping_mul(b)))
}

/// Divide, truncating toward zero.
///
/// Signature: `a b -- quotient`
fn word_divide(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    division_op(interpreter, "/", i64::wrapping_div)
}

/// Remainder of a truncating division, it takes the sign of the dividend.
///
/// Signature: `a b -- remainder`
fn word_mod(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    division_op(interpreter, "mod", i64::wrapping_rem)
}

/// Signature: `a b -- bool`
fn word_less(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    number_op(interpreter, "<", |a, b| Value::Boolean(a < b))
}

/// Signature: `a b -- bool`
fn word_greater(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    number_op(interpreter, ">", |a, b| Value::Boolean(a > b))
}

/// Signature: `a b -- bool`
fn word_less_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    number_op(interpreter, "<=", |a, b| Value::Boolean(a <= b))
}

/// Signature: `a b -- bool`
fn word_greater_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    number_op(interpreter, ">=", |a, b| Value::Boolean(a >= b))
}

/// Are two values of the same type equal?
///
/// Signature: `a b -- bool`
fn word_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let equal = values_equal(interpreter, "==")?;

    interpreter.push(equal.to_value());
    Ok(())
}

/// Signature: `a b -- bool`
fn word_not_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let equal = values_equal(interpreter, "<>")?;

    interpreter.push((!equal).to_value());
    Ok(())
}

/// Signature: `bool -- !bool`
fn word_not(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop_as_bool()?;

    interpreter.push((!value).to_value());
    Ok(())
}

/// Signature: `a b -- bool`
fn word_and(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    bool_op(interpreter, "and", |a, b| a && b)
}

/// Signature: `a b -- bool`
fn word_or(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    bool_op(interpreter, "or", |a, b| a || b)
}

/// Signature: `a b -- bool`
fn word_xor(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    bool_op(interpreter, "xor", |a, b| a ^ b)
}

/// Register the arithmetic, comparison and logic words.
pub fn register_math_logic_words(table: &mut PrimitiveTable) {
    table.add_word("+", word_add);
    table.add_word("-", word_subtract);
    table.add_word("*", word_multiply);
    table.add_word("/", word_divide);
    table.add_word("mod", word_mod);
    table.add_word("<", word_less);
    table.add_word(">", word_greater);
    table.add_word("<=", word_less_equal);
    table.add_word(">=", word_greater_equal);
    table.add_word("==", word_equal);
    table.add_word("<>", word_not_equal);
    table.add_word("not", word_not);
    table.add_word("and", word_and);
    table.add_word("or", word_or);
    table.add_word("xor", word_xor);
}
