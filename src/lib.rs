//! A small concatenative, stack based scripting language.
//!
//! Source text is tokenized up front, word definitions are compiled into a layered dictionary and
//! everything else is dispatched against an operand stack as it is found.

/// Module for managing the source code and turning it into words and values.
#[macro_use]
pub mod lang;

/// Module for the runtime and the data structures used by the interpreter.  As well as the
/// interpreter itself.
pub mod runtime;
