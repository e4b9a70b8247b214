use crate::runtime::{data_structures::dictionary::WordId, error, interpreter::Interpreter};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// The core words of the language.
pub mod base_words;

/// Words that print or list the interpreter state.
pub mod introspection_words;

/// The native function behind a primitive word.
pub type WordHandler = fn(&mut dyn Interpreter) -> error::Result<()>;

/// A primitive word: its id, its name and the native function that runs it.
pub struct PrimitiveInfo {
    id: WordId,
    name: String,
    handler: WordHandler,
}

impl PrimitiveInfo {
    pub fn id(&self) -> WordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> WordHandler {
        self.handler
    }
}

/// The fixed table of primitive words.  Ids are handed out as -1, -2, ... in registration order so
/// that they never collide with user words.
#[derive(Default)]
pub struct PrimitiveTable {
    primitives: Vec<PrimitiveInfo>,
    names: HashMap<String, WordId>,
}

impl PrimitiveTable {
    pub fn new() -> PrimitiveTable {
        PrimitiveTable {
            primitives: Vec::new(),
            names: HashMap::new(),
        }
    }

    /// Add a primitive and return the id it was given.
    pub fn add_word(&mut self, name: &str, handler: WordHandler) -> WordId {
        debug_assert!(
            !self.names.contains_key(name),
            "primitive word {} registered twice",
            name
        );

        let id = -(self.primitives.len() as WordId) - 1;

        self.primitives.push(PrimitiveInfo {
            id,
            name: name.to_string(),
            handler,
        });
        let _ = self.names.insert(name.to_string(), id);

        id
    }

    pub fn by_id(&self, id: WordId) -> Option<&PrimitiveInfo> {
        if id >= 0 {
            return None;
        }

        self.primitives.get((-id - 1) as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&PrimitiveInfo> {
        self.names.get(name).and_then(|id| self.by_id(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrimitiveInfo> {
        self.primitives.iter()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

fn build_primitive_table() -> PrimitiveTable {
    let mut table = PrimitiveTable::new();

    base_words::register_base_words(&mut table);
    introspection_words::register_introspection_words(&mut table);

    table
}

lazy_static! {
    /// Every primitive word, built once and never changed afterwards.
    pub static ref PRIMITIVES: PrimitiveTable = build_primitive_table();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_negative_and_dense() {
        assert!(!PRIMITIVES.is_empty());

        for (index, primitive) in PRIMITIVES.iter().enumerate() {
            assert_eq!(primitive.id(), -(index as WordId) - 1);
            assert_eq!(PRIMITIVES.by_id(primitive.id()).map(|p| p.name()), Some(primitive.name()));
            assert_eq!(PRIMITIVES.by_name(primitive.name()).map(|p| p.id()), Some(primitive.id()));
        }

        assert!(PRIMITIVES.by_id(0).is_none());
        assert!(PRIMITIVES.by_id(1).is_none());
        assert!(PRIMITIVES.by_id(-(PRIMITIVES.len() as WordId) - 1).is_none());
    }

    #[test]
    fn core_words_are_registered() {
        for name in [
            "drop", "swap", "2swap", "rot", "-rot", "pick", "cls", "dup", "+", "-", "*", "/",
            "mod", "<", ">", "<=", ">=", "==", "<>", "not", "and", "or", "xor", "!", "@", "if",
            "stack", "words", ".",
        ] {
            assert!(PRIMITIVES.by_name(name).is_some(), "missing primitive {}", name);
        }
    }
}
