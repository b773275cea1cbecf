//! An ordered, uniquely-keyed collection of codes for one data dimension.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::code::Code;
use crate::error::{ModelError, Result};

/// The assembled vocabulary for a single dimension (e.g. `variable`,
/// `region`). Codes keep their insertion order; names are unique and
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeList {
    name: String,
    codes: IndexMap<String, Code>,
}

impl CodeList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            codes: IndexMap::new(),
        }
    }

    /// The dimension name this codelist governs.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Code> {
        self.codes.get(name)
    }

    /// Add a code, rejecting a name that is already present.
    pub fn insert(&mut self, code: Code) -> Result<()> {
        if self.codes.contains_key(&code.name) {
            return Err(ModelError::DuplicateCode {
                dimension: self.name.clone(),
                name: code.name.clone(),
            });
        }
        self.codes.insert(code.name.clone(), code);
        Ok(())
    }

    /// Iterate codes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Code> {
        self.codes.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.codes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
