use crate::runtime::{built_ins::PrimitiveTable, error, interpreter::Interpreter};
use std::fmt::Write;

/// Render the stack from the top down.
pub fn format_stack(interpreter: &dyn Interpreter) -> String {
    let stack = interpreter.stack();
    let mut text = String::new();

    let _ = writeln!(text, "Stack (size: {}):", stack.len());
    let _ = writeln!(text);
    let _ = writeln!(text, "\t  Top");
    let _ = writeln!(text, "\t---------");

    for value in stack.iter().rev() {
        let _ = writeln!(text, "\t   {}", value);
    }

    text
}

/// Render every known word followed by the variables.
pub fn format_words(interpreter: &dyn Interpreter) -> String {
    format!("{}\n{}", interpreter.dictionary(), interpreter.variables())
}

/// Print the stack without changing it.
///
/// Signature: ` -- `
fn word_stack(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let text = format_stack(interpreter);
    interpreter.write_output(&text)
}

/// Print the dictionary and the variables.
///
/// Signature: ` -- `
fn word_words(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let text = format_words(interpreter);
    interpreter.write_output(&text)
}

/// Pop a value and print it followed by a space.
///
/// Signature: `value -- `
fn word_print(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;
    interpreter.write_output(&format!("{} ", value))
}

/// Register the words that print the interpreter's state.
pub fn register_introspection_words(table: &mut PrimitiveTable) {
    table.add_word("stack", word_stack);
    table.add_word("words", word_words);
    table.add_word(".", word_print);
}
