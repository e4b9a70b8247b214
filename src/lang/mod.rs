/// Module for managing the original source code.
pub mod source_buffer;

/// Module for managing the turning of the source code into a list of tokens for further processing.
pub mod tokenizing;

/// Module for turning that list of tokens into values and word definitions.  Top level code is
/// executed as soon as it is resolved, so this phase requires an active interpreter.
pub mod compilation;
