/// Module contains the Value enumeration, the element type of the operand stack as well as of
/// word bodies and quotations.
pub mod value;

/// The dictionary module provides the layered word dictionary used by the interpreter.
pub mod dictionary;

/// Storage for `:variable` declared names.
pub mod variable_store;
