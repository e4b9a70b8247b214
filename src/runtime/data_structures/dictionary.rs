use crate::{
    lang::source_buffer::SourceLocation,
    runtime::{data_structures::value::Value, error::ErrorKind},
};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::{self, Display, Formatter},
    rc::Rc,
};

/// Identifies a word.  Primitives use a fixed range of negative ids, user words are numbered from
/// `FIRST_USER_ID` up in the order their names are first seen.
pub type WordId = i64;

/// The id handed to the first user defined word.
pub const FIRST_USER_ID: WordId = 1;

/// The compiled body of a word, shared between the dictionary and any running invocation.
pub type WordBody = Rc<Vec<Value>>;

/// One definition of a word.  A word gains a new layer each time it is redefined, references
/// resolved against an older layer keep running that layer.
#[derive(Clone)]
pub struct Definition {
    /// The compiled body, or None while the layer was reserved by `:defer` and not yet filled.
    pub body: Option<WordBody>,

    /// Where the definition, or the deferral, was found.
    pub location: SourceLocation,
}

impl Definition {
    pub fn is_pending(&self) -> bool {
        self.body.is_none()
    }
}

/// Is the word built into the runtime or compiled from source?
#[derive(Clone)]
pub enum WordKind {
    Primitive,
    Compiled(Vec<Definition>),
}

/// The information stored in the dictionary for each word.
#[derive(Clone)]
pub struct WordInfo {
    pub id: WordId,
    pub name: String,
    pub kind: WordKind,
}

impl WordInfo {
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, WordKind::Primitive)
    }

    /// Index of the newest definition layer.  Always 0 for primitives.
    pub fn current_layer(&self) -> usize {
        match &self.kind {
            WordKind::Primitive => 0,
            WordKind::Compiled(layers) => layers.len().saturating_sub(1),
        }
    }

    /// The newest definition, None for primitives.
    pub fn current_definition(&self) -> Option<&Definition> {
        match &self.kind {
            WordKind::Primitive => None,
            WordKind::Compiled(layers) => layers.last(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.current_definition().is_some_and(Definition::is_pending)
    }
}

/// Render one line of the word listing.
impl Display for WordInfo {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} : ", self.name)?;

        match self.current_definition() {
            None => write!(f, "primitive"),
            Some(Definition { body: None, .. }) => write!(f, "deferred"),
            Some(Definition {
                body: Some(body), ..
            }) => {
                for value in body.iter() {
                    write!(f, "{} ", value)?;
                }

                Ok(())
            }
        }
    }
}

/// What a call to `Dictionary::define` did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DefineOutcome {
    /// The name was new and got a fresh id.
    Created,

    /// A new layer was pushed on an existing word.
    Redefined,

    /// The pending layer reserved by `:defer` was filled in.
    FilledDeferred,
}

/// The word dictionary.  Maps names to ids and ids to their layered definitions.
pub struct Dictionary {
    ids: HashMap<String, WordId>,
    words: BTreeMap<WordId, WordInfo>,
    next_id: WordId,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// List every word sorted by name, with a count of the compiled ones up front.
impl Display for Dictionary {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(
            f,
            "Dictionary (compiled words: {}):",
            self.compiled_word_count()
        )?;
        writeln!(f)?;

        for word in self.sorted_words() {
            writeln!(f, "\t{}", word)?;
        }

        Ok(())
    }
}

impl Dictionary {
    /// Create an empty dictionary.  Primitives are added by the interpreter.
    pub fn new() -> Dictionary {
        Dictionary {
            ids: HashMap::new(),
            words: BTreeMap::new(),
            next_id: FIRST_USER_ID,
        }
    }

    /// Register a built in word under its fixed id.
    pub fn insert_primitive(&mut self, id: WordId, name: &str) {
        let _ = self.ids.insert(name.to_string(), id);
        let _ = self.words.insert(
            id,
            WordInfo {
                id,
                name: name.to_string(),
                kind: WordKind::Primitive,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// How many words were compiled from source, deferred ones included.
    pub fn compiled_word_count(&self) -> usize {
        self.words.values().filter(|word| !word.is_primitive()).count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    pub fn find_id(&self, name: &str) -> Option<WordId> {
        self.ids.get(name).copied()
    }

    pub fn find(&self, name: &str) -> Option<&WordInfo> {
        self.ids.get(name).and_then(|id| self.words.get(id))
    }

    pub fn get(&self, id: WordId) -> Option<&WordInfo> {
        self.words.get(&id)
    }

    /// Resolve a name to its id and the layer that is current right now.
    pub fn resolve(&self, name: &str) -> Option<(WordId, usize)> {
        self.find(name).map(|word| (word.id, word.current_layer()))
    }

    /// Get a specific definition layer of a compiled word.
    pub fn definition(&self, id: WordId, layer: usize) -> Option<&Definition> {
        match &self.words.get(&id)?.kind {
            WordKind::Primitive => None,
            WordKind::Compiled(layers) => layers.get(layer),
        }
    }

    /// Is the newest layer of the named word still waiting for its body?
    pub fn is_deferred(&self, name: &str) -> bool {
        self.find(name).is_some_and(WordInfo::is_pending)
    }

    /// Words sorted by name.
    pub fn sorted_words(&self) -> Vec<&WordInfo> {
        let mut words: Vec<&WordInfo> = self.words.values().collect();

        words.sort_by(|a, b| a.name.cmp(&b.name));
        words
    }

    fn allocate(&mut self, name: &str, layers: Vec<Definition>) -> WordId {
        let id = self.next_id;

        self.next_id += 1;

        let _ = self.ids.insert(name.to_string(), id);
        let _ = self.words.insert(
            id,
            WordInfo {
                id,
                name: name.to_string(),
                kind: WordKind::Compiled(layers),
            },
        );

        id
    }

    fn layers_mut(&mut self, name: &str) -> Result<Option<(WordId, &mut Vec<Definition>)>, ErrorKind> {
        let Some(id) = self.ids.get(name).copied() else {
            return Ok(None);
        };

        match self.words.get_mut(&id).map(|word| &mut word.kind) {
            Some(WordKind::Compiled(layers)) => Ok(Some((id, layers))),
            _ => Err(ErrorKind::ReservedWord(name.to_string())),
        }
    }

    /// Install a compiled body under the given name.
    ///
    /// A new name gets a fresh id.  A name whose newest layer was reserved by `:defer` has that
    /// layer filled in.  Otherwise a new layer is pushed, keeping the id.
    pub fn define(
        &mut self,
        name: &str,
        body: Vec<Value>,
        location: SourceLocation,
    ) -> Result<(WordId, DefineOutcome), ErrorKind> {
        let definition = Definition {
            body: Some(Rc::new(body)),
            location,
        };

        match self.layers_mut(name)? {
            None => Ok((self.allocate(name, vec![definition]), DefineOutcome::Created)),

            Some((id, layers)) => match layers.last_mut() {
                Some(top) if top.is_pending() => {
                    *top = definition;
                    Ok((id, DefineOutcome::FilledDeferred))
                }

                _ => {
                    layers.push(definition);
                    Ok((id, DefineOutcome::Redefined))
                }
            },
        }
    }

    /// Reserve an id and a pending layer for a word whose body comes later.  Deferring a word
    /// that is already pending changes nothing.
    pub fn defer(&mut self, name: &str, location: SourceLocation) -> Result<WordId, ErrorKind> {
        let pending = Definition {
            body: None,
            location,
        };

        match self.layers_mut(name)? {
            None => Ok(self.allocate(name, vec![pending])),

            Some((id, layers)) => {
                if !layers.last().is_some_and(Definition::is_pending) {
                    layers.push(pending);
                }

                Ok(id)
            }
        }
    }
}
