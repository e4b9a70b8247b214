use crate::{
    lang::{source_buffer::SourceLocation, tokenizing::TokenStream},
    runtime::{
        config::InterpreterConfig,
        data_structures::{
            dictionary::{Dictionary, WordId},
            value::Value,
            variable_store::VariableStore,
        },
        error,
    },
};
use std::{
    fmt::{self, Display, Formatter},
    io::Write,
};

pub mod throf_interpreter;

/// A call stack item is a record of the executing word's name and the location within the
/// original source code it was reached from.  These items are read-only and the fields are
/// accessed by member functions.
#[derive(Clone, Debug)]
pub struct CallItem {
    location: SourceLocation,
    word: String,
}

impl CallItem {
    pub fn new(word: String, location: SourceLocation) -> CallItem {
        CallItem { location, word }
    }

    /// Where in the source code was the execution of this word found?
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    // The name of the word being executed.
    pub fn word(&self) -> &String {
        &self.word
    }
}

/// Make sure that this word can be nicely displayed to the user in event of an error.
impl Display for CallItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.word)
    }
}

/// The words currently being executed, innermost last.  Used to give errors some context.
pub type CallStack = Vec<CallItem>;

/// The operand stack.  The top of the stack is the end of the vector.
pub type ValueStack = Vec<Value>;

/// Trait for managing the interpreter's operand stack.  Every read is bounds checked, running out
/// of values is reported as a stack underflow.
pub trait InterpreterStack {
    /// The whole operand stack, bottom first.
    fn stack(&self) -> &ValueStack;

    fn push(&mut self, value: Value);

    /// Pop the top value.  Fails with a stack underflow if the stack is empty.
    fn pop(&mut self) -> error::Result<Value>;

    /// Make sure the stack holds at least `count` values before a word starts popping.
    fn require_depth(&self, count: usize, word: &str) -> error::Result<()>;

    /// Pop the top value, which must be a number.
    fn pop_as_number(&mut self) -> error::Result<i64>;

    /// Pop the top value, which must be a boolean.
    fn pop_as_bool(&mut self) -> error::Result<bool>;

    /// Pop the top value, which must be a variable reference, and return the variable's name.
    fn pop_as_variable(&mut self) -> error::Result<String>;

    /// Pop the top value, which must be a quotation, and return its elements.
    fn pop_as_quotation(&mut self) -> error::Result<Vec<Value>>;

    /// Copy the value `index` positions below the top, the top itself being index 0.
    fn pick(&self, index: usize) -> error::Result<Value>;

    /// Remove the value `index` positions below the top and return it.
    fn remove_at(&mut self, index: usize) -> error::Result<Value>;

    /// Insert a value so that it ends up `index` positions below the top.
    fn insert_at(&mut self, index: usize, value: Value) -> error::Result<()>;

    /// Drop everything on the stack.
    fn clear_stack(&mut self);
}

/// Trait for looking up, dispatching and executing words.
pub trait WordManagement {
    /// If currently set, the location of the top level token being processed.
    fn current_location(&self) -> &Option<SourceLocation>;

    fn set_current_location(&mut self, location: SourceLocation);

    fn dictionary(&self) -> &Dictionary;

    fn dictionary_mut(&mut self) -> &mut Dictionary;

    fn variables(&self) -> &VariableStore;

    fn variables_mut(&mut self) -> &mut VariableStore;

    /// Push a value, or execute it if it is a word reference.
    fn dispatch(&mut self, value: &Value) -> error::Result<()>;

    /// Queue values to be dispatched in place, as part of the word currently executing.  They run
    /// once the calling primitive returns, without a call stack entry of their own.
    fn dispatch_in_place(&mut self, values: Vec<Value>);

    /// Execute one layer of a word, along with everything it calls.  Primitives run their native
    /// handler, compiled words replay their body value by value.
    fn execute_word(&mut self, id: WordId, name: &str, layer: usize) -> error::Result<()>;

    /// Find a word by name and execute its current definition.
    fn execute_word_named(&mut self, name: &str) -> error::Result<()>;

    /// The current script execution call stack.
    fn call_stack(&self) -> &CallStack;

    /// Record entry into a word.  Fails once the configured nesting limit is reached.
    fn call_stack_push(&mut self, name: String, location: SourceLocation) -> error::Result<()>;

    /// Record exit from the innermost word.
    fn call_stack_pop(&mut self) -> error::Result<()>;
}

/// Trait for feeding source code to the interpreter.  Each call processes one source unit, word
/// definitions it completes stay installed even if a later part of it fails.
pub trait CodeManagement {
    /// Find, tokenize and process a source file.  While it is processed its directory is on the
    /// search path so that its own includes resolve relative to it.
    fn process_source_file(&mut self, path: &str) -> error::Result<()>;

    /// Tokenize and process an in memory source.  The path names the source in errors, the REPL
    /// uses "\<repl\>".
    fn process_source(&mut self, path: &str, source: &str) -> error::Result<()>;

    /// Process an already tokenized source unit.
    fn process_tokens(&mut self, tokens: TokenStream) -> error::Result<()>;
}

/// Core interpreter trait.
///
/// Brings the stack, word and code management traits together along with search path handling
/// and the output sink used by the printing words.
pub trait Interpreter: InterpreterStack + WordManagement + CodeManagement {
    fn config(&self) -> &InterpreterConfig;

    /// Add a new path to the search path list.  The path has to exist.
    fn add_search_path(&mut self, path: &str) -> error::Result<()>;

    /// Add the parent directory of a file to the search paths.
    fn add_search_path_for_file(&mut self, file_path: &str) -> error::Result<()>;

    /// Drop the last added path.  The search path list acts like a stack.
    fn drop_search_path(&mut self) -> error::Result<()>;

    fn search_paths(&self) -> &Vec<String>;

    /// Find a file, either as given or in the search paths, newest first.  Returns the fully
    /// qualified path.
    fn find_file(&self, path: &str) -> error::Result<String>;

    /// Where program output goes.
    fn output(&mut self) -> &mut dyn Write;

    /// Write text to the output sink.
    fn write_output(&mut self, text: &str) -> error::Result<()> {
        self.output().write_all(text.as_bytes())?;
        Ok(())
    }
}
