use std::collections::hash_map::{self, HashMap};
use std::rc::Rc;

use crate::frontend::ast::Block;

// A user defined function. Parameter names are pairwise distinct.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionEntry {
    pub params: Vec<String>,
    pub body: Rc<Block>,
}

// Global, write-once table of functions. Names are resolved when called, so
// a function can call itself or one declared after it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FunctionRegistry {
    funcs: HashMap<String, FunctionEntry>,
}

impl FunctionRegistry {
    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.funcs.get(name)
    }

    // Refuses to overwrite an existing entry and gives the entry back
    pub fn declare(&mut self, name: &str, entry: FunctionEntry) -> Result<(), FunctionEntry> {
        match self.funcs.entry(name.to_string()) {
            hash_map::Entry::Occupied(_) => Err(entry),
            hash_map::Entry::Vacant(e) => {
                e.insert(entry);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    // Functions ordered by name
    pub fn sorted(&self) -> Vec<(&String, &FunctionEntry)> {
        let mut funcs: Vec<_> = self.funcs.iter().collect();
        funcs.sort_by(|a, b| a.0.cmp(b.0));
        funcs
    }

    pub fn clear(&mut self) {
        self.funcs.clear();
    }
}
