use crate::runtime::{
    built_ins::PrimitiveTable,
    data_structures::value::ToValue,
    error::{self, script_error, ErrorKind},
    interpreter::Interpreter,
};

/// Drop the top value on the data stack.
///
/// Signature: `value -- `
fn word_drop(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let _ = interpreter.pop()?;

    Ok(())
}

/// Duplicate the top value on the data stack.
///
/// Signature: `value -- value value`
fn word_dup(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    interpreter.push(value.clone());
    interpreter.push(value);

    Ok(())
}

/// Swap the top 2 values on the data stack.
///
/// Signature: `a b -- b a`
fn word_swap(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require_depth(2, "swap")?;

    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(b);
    interpreter.push(a);

    Ok(())
}

/// Swap the top two pairs of values.
///
/// Signature: `a b c d -- c d a b`
fn word_2swap(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require_depth(4, "2swap")?;

    let d = interpreter.pop()?;
    let c = interpreter.pop()?;
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(c);
    interpreter.push(d);
    interpreter.push(a);
    interpreter.push(b);

    Ok(())
}

/// Make a copy of the second value and push it over the first.
///
/// Signature: `a b -- a b a`
fn word_over(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pick(1)?;
    interpreter.push(value);

    Ok(())
}

/// Move the third value up to the top.
///
/// Signature: `a b c -- b c a`
fn word_rot(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.remove_at(2)?;
    interpreter.push(value);

    Ok(())
}

/// Move the top value down to the third position.
///
/// Signature: `a b c -- c a b`
fn word_minus_rot(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require_depth(3, "-rot")?;

    let value = interpreter.pop()?;
    interpreter.insert_at(2, value)
}

/// Copy the value at the given index to the top of the stack.  The index is counted from the top
/// after it was popped, 0 being the top itself.
///
/// Signature: `index -- picked-value`
fn word_pick(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let index = interpreter.pop_as_number()?;

    if index < 0 {
        return script_error(
            interpreter,
            ErrorKind::InvalidArgument(format!("pick index {} is negative", index)),
        );
    }

    let value = interpreter.pick(index as usize)?;
    interpreter.push(value);

    Ok(())
}

/// Clear the data stack.
///
/// Signature: `... -- `
fn word_cls(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.clear_stack();
    Ok(())
}

/// Get the depth of the data stack before calling this word.
///
/// Signature: ` -- depth`
fn word_depth(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let depth = interpreter.stack().len();

    interpreter.push(depth.to_value());
    Ok(())
}

/// Register the stack manipulation words.
pub fn register_stack_words(table: &mut PrimitiveTable) {
    table.add_word("drop", word_drop);
    table.add_word("dup", word_dup);
    table.add_word("swap", word_swap);
    table.add_word("2swap", word_2swap);
    table.add_word("over", word_over);
    table.add_word("rot", word_rot);
    table.add_word("-rot", word_minus_rot);
    table.add_word("pick", word_pick);
    table.add_word("cls", word_cls);
    table.add_word("depth", word_depth);
}
