use crate::runtime::{
    built_ins::PrimitiveTable,
    error::{self, script_error, ErrorKind},
    interpreter::Interpreter,
};

/// Write a value to a variable.
///
/// Signature: `value variable -- `
fn word_write_variable(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require_depth(2, "!")?;

    let name = interpreter.pop_as_variable()?;
    let value = interpreter.pop()?;

    if !interpreter.variables_mut().set(&name, value) {
        return script_error(interpreter, ErrorKind::UndefinedVariable(name));
    }

    Ok(())
}

/// Read a value from a variable.
///
/// Signature: `variable -- value`
fn word_read_variable(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let name = interpreter.pop_as_variable()?;

    match interpreter.variables().get(&name).cloned() {
        Some(value) => {
            interpreter.push(value);
            Ok(())
        }

        None => script_error(interpreter, ErrorKind::UndefinedVariable(name)),
    }
}

/// Register the variable access words.
pub fn register_variable_words(table: &mut PrimitiveTable) {
    table.add_word("!", word_write_variable);
    table.add_word("@", word_read_variable);
}
