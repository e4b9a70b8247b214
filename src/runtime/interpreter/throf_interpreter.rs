use std::{ fs::{ metadata, canonicalize },
           io::{ stdout, Write },
           path::{ Path, PathBuf },
           rc::Rc };
use tracing::{ debug, trace };
use crate::{ location_here,
             lang::{ compilation::process_source_from_tokens,
                     source_buffer::SourceLocation,
                     tokenizing::{ tokenize_from_file,
                                   tokenize_from_source,
                                   TokenStream } },
             runtime::{ built_ins::PRIMITIVES,
                        config::InterpreterConfig,
                        data_structures::{ dictionary::{ Definition,
                                                         Dictionary,
                                                         WordId },
                                           value::Value,
                                           variable_store::VariableStore },
                        error::{ self,
                                 script_error,
                                 ErrorKind,
                                 ScriptError },
                        interpreter::{ CallItem,
                                       CallStack,
                                       CodeManagement,
                                       Interpreter,
                                       InterpreterStack,
                                       ValueStack,
                                       WordManagement } } };



/// The search paths used to find included files.
pub type SearchPaths = Vec<String>;



/// A body being walked by the dispatch loop: a compiled word, or the branch an `if` picked.
struct Frame
{
    values: Rc<Vec<Value>>,

    /// Index of the next value to dispatch.
    position: usize,

    /// Word frames own an entry on the call stack, branch frames don't.
    is_word: bool
}



/// The core interpreter implementation.  Owns the operand stack, the dictionary and the variable
/// store, nothing is shared with any other instance.
pub struct ThrofInterpreter
{
    /// Settings this instance was created with.
    config: InterpreterConfig,

    /// The search paths used to find included files.
    search_paths: SearchPaths,

    /// The operand stack.
    stack: ValueStack,


    /// The last known location execution has reached in the original source code.
    current_location: Option<SourceLocation>,

    /// The words currently executing.
    call_stack: CallStack,

    /// Bodies in the middle of being dispatched, innermost last.
    frames: Vec<Frame>,

    /// How many source files are being processed inside each other.
    include_depth: usize,


    /// The dictionary of words known by the interpreter.
    dictionary: Dictionary,

    /// The values of the declared variables.
    variables: VariableStore,


    /// Where the printing words write to.
    output: Box<dyn Write>
}


impl Interpreter for ThrofInterpreter
{
    fn config(&self) -> &InterpreterConfig
    {
        &self.config
    }

    fn add_search_path(&mut self, path: &str) -> error::Result<()>
    {
        if let Err(err) = metadata(path)
        {
            return script_error(self,
                                ErrorKind::FileAccessFailure(
                                    format!("could not append search path {}: {}", path, err)));
        }

        self.search_paths.push(path.to_string());
        Ok(())
    }

    fn add_search_path_for_file(&mut self, file_path: &str) -> error::Result<()>
    {
        match Path::new(file_path).parent()
        {
            Some(parent) if !parent.as_os_str().is_empty() =>
                self.add_search_path(&parent.to_string_lossy()),

            _ => self.add_search_path(".")
        }
    }

    fn drop_search_path(&mut self) -> error::Result<()>
    {
        if self.search_paths.pop().is_none()
        {
            return script_error(self,
                                ErrorKind::FileAccessFailure(
                                    "search path stack underflow".to_string()));
        }

        Ok(())
    }

    fn search_paths(&self) -> &Vec<String>
    {
        &self.search_paths
    }

    fn find_file(&self, path: &str) -> error::Result<String>
    {
        fn to_full_path(interpreter: &ThrofInterpreter, path: &Path) -> error::Result<String>
        {
            let canonical = canonicalize(path)?;

            match canonical.to_str()
            {
                Some(canonical) => Ok(canonical.to_string()),
                None => script_error(interpreter,
                                     ErrorKind::FileAccessFailure(
                                         format!("path {} contains invalid characters",
                                                 canonical.display())))
            }
        }

        if Path::new(path).exists()
        {
            return to_full_path(self, Path::new(path));
        }

        for directory in self.search_paths.iter().rev()
        {
            let full_path = PathBuf::from(directory).join(path);

            if full_path.exists()
            {
                return to_full_path(self, &full_path);
            }
        }

        script_error(self, ErrorKind::FileAccessFailure(format!("file {} not found", path)))
    }

    fn output(&mut self) -> &mut dyn Write
    {
        self.output.as_mut()
    }
}


impl InterpreterStack for ThrofInterpreter
{
    fn stack(&self) -> &ValueStack
    {
        &self.stack
    }

    fn push(&mut self, value: Value)
    {
        self.stack.push(value);
    }

    fn pop(&mut self) -> error::Result<Value>
    {
        match self.stack.pop()
        {
            Some(value) => Ok(value),
            None => script_error(self,
                                 ErrorKind::StackUnderflow("the stack is empty".to_string()))
        }
    }

    fn require_depth(&self, count: usize, word: &str) -> error::Result<()>
    {
        if self.stack.len() < count
        {
            return script_error(self,
                                ErrorKind::StackUnderflow(
                                    format!("'{}' needs {} value(s), the stack holds {}",
                                            word,
                                            count,
                                            self.stack.len())));
        }

        Ok(())
    }

    fn pop_as_number(&mut self) -> error::Result<i64>
    {
        let value = self.pop()?;
        value.as_number(self)
    }

    fn pop_as_bool(&mut self) -> error::Result<bool>
    {
        let value = self.pop()?;
        value.as_bool(self)
    }

    fn pop_as_variable(&mut self) -> error::Result<String>
    {
        let value = self.pop()?;
        Ok(value.as_variable(self)?.clone())
    }

    fn pop_as_quotation(&mut self) -> error::Result<Vec<Value>>
    {
        let value = self.pop()?;
        value.into_quotation(self)
    }

    fn pick(&self, index: usize) -> error::Result<Value>
    {
        self.require_depth(index + 1, "pick")?;
        Ok(self.stack[self.stack.len() - 1 - index].clone())
    }

    fn remove_at(&mut self, index: usize) -> error::Result<Value>
    {
        self.require_depth(index + 1, "remove")?;

        let position = self.stack.len() - 1 - index;
        Ok(self.stack.remove(position))
    }

    fn insert_at(&mut self, index: usize, value: Value) -> error::Result<()>
    {
        self.require_depth(index, "insert")?;

        let position = self.stack.len() - index;
        self.stack.insert(position, value);

        Ok(())
    }

    fn clear_stack(&mut self)
    {
        self.stack.clear();
    }
}


// Helper methods for running words.  Compiled bodies are walked with an explicit frame stack, so
// deep recursion in a script doesn't recurse in the interpreter itself.
impl ThrofInterpreter
{
    fn call_location(&self) -> SourceLocation
    {
        match &self.current_location
        {
            Some(location) => location.clone(),
            None => location_here!()
        }
    }

    /// Start executing a word.  A primitive runs to completion right away, a compiled word gets a
    /// frame that `run_frames` walks.
    fn enter_word(&mut self, id: WordId, name: &str, layer: usize) -> error::Result<()>
    {
        trace!("Executing {} (id {}, layer {}).", name, id, layer);

        let location = self.call_location();
        self.call_stack_push(name.to_string(), location)?;

        if let Some(primitive) = PRIMITIVES.by_id(id)
        {
            let result = (primitive.handler())(self);

            let _ = self.call_stack.pop();
            return result;
        }

        let body =
            match self.dictionary.definition(id, layer)
            {
                Some(Definition { body: Some(body), .. }) => body.clone(),

                Some(Definition { body: None, .. }) =>
                    return script_error(self, ErrorKind::UnresolvedDeferredWord(name.to_string())),

                None =>
                    return script_error(self, ErrorKind::UnresolvedToken(name.to_string()))
            };

        self.frames.push(Frame { values: body, position: 0, is_word: true });
        Ok(())
    }

    /// Dispatch values from the innermost frame until every frame above `base` has finished.
    fn run_frames(&mut self, base: usize) -> error::Result<()>
    {
        while self.frames.len() > base
        {
            let Some(frame) = self.frames.last_mut() else { break };

            if frame.position >= frame.values.len()
            {
                if let Some(finished) = self.frames.pop()
                    && finished.is_word
                {
                    let _ = self.call_stack.pop();
                }

                continue;
            }

            let value = frame.values[frame.position].clone();
            frame.position += 1;

            match value
            {
                Value::WordRef { id, name, layer } => self.enter_word(id, &name, layer)?,
                value => self.push(value)
            }
        }

        Ok(())
    }
}


impl CodeManagement for ThrofInterpreter
{
    fn process_source_file(&mut self, path: &str) -> error::Result<()>
    {
        if self.include_depth >= self.config.max_include_depth
        {
            return script_error(self, ErrorKind::IncludeDepthExceeded(self.config.max_include_depth));
        }

        let full_path = self.find_file(path)?;
        let tokens = tokenize_from_file(&full_path)?;

        debug!("Entering {}.", full_path);

        self.add_search_path_for_file(&full_path)?;
        self.include_depth += 1;

        let result = self.process_tokens(tokens);

        self.include_depth -= 1;
        self.drop_search_path()?;

        debug!("Leaving {}.", full_path);
        result
    }

    fn process_source(&mut self, path: &str, source: &str) -> error::Result<()>
    {
        let tokens = tokenize_from_source(path, source)?;
        self.process_tokens(tokens)
    }

    fn process_tokens(&mut self, tokens: TokenStream) -> error::Result<()>
    {
        debug!("Processing {} ({} tokens).", tokens.source_name(), tokens.len());
        process_source_from_tokens(tokens, self)
    }
}


impl WordManagement for ThrofInterpreter
{
    fn current_location(&self) -> &Option<SourceLocation>
    {
        &self.current_location
    }

    fn set_current_location(&mut self, location: SourceLocation)
    {
        self.current_location = Some(location);
    }

    fn dictionary(&self) -> &Dictionary
    {
        &self.dictionary
    }

    fn dictionary_mut(&mut self) -> &mut Dictionary
    {
        &mut self.dictionary
    }

    fn variables(&self) -> &VariableStore
    {
        &self.variables
    }

    fn variables_mut(&mut self) -> &mut VariableStore
    {
        &mut self.variables
    }

    fn dispatch(&mut self, value: &Value) -> error::Result<()>
    {
        match value
        {
            Value::WordRef { id, name, layer } => self.execute_word(*id, name, *layer),

            // Everything that isn't a word is data, quotations included.
            _ =>
                {
                    self.push(value.clone());
                    Ok(())
                }
        }
    }

    fn dispatch_in_place(&mut self, values: Vec<Value>)
    {
        self.frames.push(Frame { values: Rc::new(values), position: 0, is_word: false });
    }

    fn execute_word(&mut self, id: WordId, name: &str, layer: usize) -> error::Result<()>
    {
        let frame_base = self.frames.len();
        let call_base = self.call_stack.len();

        let result = self.enter_word(id, name, layer)
                         .and_then(|()| self.run_frames(frame_base));

        if result.is_err()
        {
            self.frames.truncate(frame_base);
            self.call_stack.truncate(call_base);
        }

        result
    }

    fn execute_word_named(&mut self, name: &str) -> error::Result<()>
    {
        match self.dictionary.resolve(name)
        {
            Some(( id, layer )) => self.execute_word(id, name, layer),
            None => script_error(self, ErrorKind::UnresolvedToken(name.to_string()))
        }
    }

    fn call_stack(&self) -> &CallStack
    {
        &self.call_stack
    }

    fn call_stack_push(&mut self, name: String, location: SourceLocation) -> error::Result<()>
    {
        if self.call_stack.len() >= self.config.max_call_depth
        {
            return script_error(self, ErrorKind::CallDepthExceeded(self.config.max_call_depth));
        }

        self.call_stack.push(CallItem::new(name, location));
        Ok(())
    }

    fn call_stack_pop(&mut self) -> error::Result<()>
    {
        if self.call_stack.pop().is_none()
        {
            return ScriptError::new_as_result(
                ErrorKind::StackUnderflow("call stack is empty".to_string()),
                self.current_location.clone(),
                None);
        }

        Ok(())
    }
}


impl ThrofInterpreter
{
    /// Create an interpreter with the default settings, writing its output to stdout.
    pub fn new() -> ThrofInterpreter
    {
        ThrofInterpreter::with_config(InterpreterConfig::default())
    }

    /// Create an interpreter with the given settings.  All primitives are registered in the
    /// dictionary up front.
    pub fn with_config(config: InterpreterConfig) -> ThrofInterpreter
    {
        let mut dictionary = Dictionary::new();

        for primitive in PRIMITIVES.iter()
        {
            dictionary.insert_primitive(primitive.id(), primitive.name());
        }

        ThrofInterpreter
            {
                search_paths: config.search_paths.clone(),

                config,

                stack: Vec::with_capacity(200),

                current_location: None,
                call_stack: CallStack::with_capacity(40),
                frames: Vec::with_capacity(40),
                include_depth: 0,

                dictionary,
                variables: VariableStore::new(),

                output: Box::new(stdout())
            }
    }

    /// Send program output somewhere other than stdout.
    pub fn set_output(&mut self, output: Box<dyn Write>)
    {
        self.output = output;
    }

    /// Load the configured init source if it exists.  Returns whether it was found.
    pub fn load_init_file(&mut self) -> error::Result<bool>
    {
        let init_file = self.config.init_file.clone();

        if !Path::new(&init_file).exists()
        {
            debug!("No init file {} found.", init_file);
            return Ok(false);
        }

        self.process_source_file(&init_file)?;
        Ok(true)
    }
}


impl Default for ThrofInterpreter
{
    fn default() -> Self
    {
        Self::new()
    }
}
