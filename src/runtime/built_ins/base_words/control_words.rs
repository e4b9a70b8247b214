use crate::{
    runtime::{built_ins::PrimitiveTable, error, interpreter::Interpreter},
};

/// Execute one of two quotations depending on a condition.  Only the chosen branch runs, its
/// values are dispatched in place once `if` returns, so a recursive call in a branch doesn't keep
/// `if` on the call stack.
///
/// Signature: `bool true-quotation false-quotation -- ...`
fn word_if(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require_depth(3, "if")?;

    let false_branch = interpreter.pop_as_quotation()?;
    let true_branch = interpreter.pop_as_quotation()?;
    let condition = interpreter.pop_as_bool()?;

    let branch = if condition { true_branch } else { false_branch };

    interpreter.dispatch_in_place(branch);
    Ok(())
}

/// Register the control flow words.
pub fn register_control_words(table: &mut PrimitiveTable) {
    table.add_word("if", word_if);
}
