use crate::runtime::data_structures::value::Value;
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
};

/// Storage for the values of `:variable` declared names.  A namespace of its own, separate from
/// the word dictionary.
#[derive(Default)]
pub struct VariableStore {
    values: HashMap<String, Value>,
}

/// List every variable sorted by name along with its current value.
impl Display for VariableStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Variables ({}):", self.values.len())?;
        writeln!(f)?;

        let mut names: Vec<&String> = self.values.keys().collect();
        names.sort();

        for name in names {
            writeln!(f, "\t{} = {}", name, self.values[name])?;
        }

        Ok(())
    }
}

impl VariableStore {
    pub fn new() -> VariableStore {
        VariableStore {
            values: HashMap::new(),
        }
    }

    /// Register a new variable holding `Uninitialized`.  Returns false, leaving the current value
    /// alone, if the variable already exists.
    pub fn register(&mut self, name: &str) -> bool {
        if self.values.contains_key(name) {
            return false;
        }

        let _ = self.values.insert(name.to_string(), Value::Uninitialized);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Write a registered variable.  Returns false if no such variable was registered.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }

            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_keeps_existing_values() {
        let mut variables = VariableStore::new();

        assert!(variables.register("x"));
        assert_eq!(variables.get("x"), Some(&Value::Uninitialized));

        assert!(variables.set("x", Value::Number(42)));
        assert!(!variables.register("x"));
        assert_eq!(variables.get("x"), Some(&Value::Number(42)));
    }

    #[test]
    fn unknown_variables_are_not_written() {
        let mut variables = VariableStore::new();

        assert!(!variables.set("missing", Value::Boolean(true)));
        assert!(variables.is_empty());
    }
}
