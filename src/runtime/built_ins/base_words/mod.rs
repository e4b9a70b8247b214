/// Words that manipulate the operand stack.
mod stack_words;

/// Words that work with math, comparisons, logic and Value equality.
mod math_logic_words;

/// Words that read and write variables.
mod variable_words;

/// Words that choose what to execute.
mod control_words;

use crate::runtime::built_ins::{
    base_words::{
        control_words::register_control_words, math_logic_words::register_math_logic_words,
        stack_words::register_stack_words, variable_words::register_variable_words,
    },
    PrimitiveTable,
};

/// Called to register all of the core words of the language.
pub fn register_base_words(table: &mut PrimitiveTable) {
    register_stack_words(table);
    register_math_logic_words(table);
    register_variable_words(table);
    register_control_words(table);
}
