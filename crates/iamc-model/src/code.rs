//! Codes and tags, the atomic entries of a nomenclature.
//!
//! A `Code` is a named vocabulary entry with free-form attributes. A `Tag`
//! is a named list of substitution targets: any code whose name contains
//! the brace-wrapped tag name (e.g. `{fuel}`) is expanded into one code per
//! target during codelist assembly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::value::AttrValue;

/// Reserved attribute keys that populate [`Code::description`] instead of
/// landing in the attribute map.
const DESCRIPTION_KEYS: [&str; 2] = ["definition", "description"];

/// A named vocabulary entry with a mapping of attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Code {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub attributes: IndexMap<String, AttrValue>,
}

impl Code {
    /// Create a code, promoting a reserved `definition`/`description`
    /// attribute into the description field.
    pub fn new(name: impl Into<String>, mut attributes: IndexMap<String, AttrValue>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }

        let mut description = None;
        for key in DESCRIPTION_KEYS {
            if let Some(value) = attributes.shift_remove(key) {
                description = match value {
                    AttrValue::Null => None,
                    AttrValue::String(s) => Some(s),
                    other => Some(other.to_cell()),
                };
                break;
            }
        }

        Ok(Self {
            name,
            description,
            attributes,
        })
    }

    /// A code with no attributes, from a bare name.
    pub fn from_name(name: impl Into<String>) -> Result<Self> {
        Self::new(name, IndexMap::new())
    }

    /// The description, or the empty string when absent.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn attribute(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// Insert or overwrite a single attribute. No value coercion happens
    /// here; values keep the type they were decoded with.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: AttrValue) {
        self.attributes.insert(key.into(), value);
    }
}

/// A tag definition: the substitution targets for one placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// The tag name without braces (`fuel`, not `{fuel}`).
    pub name: String,

    /// Substitution targets, in definition order. Each target supplies a
    /// replacement name and attribute fragments for placeholder expansion.
    pub targets: Vec<Code>,
}

impl Tag {
    pub fn new(name: impl Into<String>, targets: Vec<Code>) -> Self {
        Self {
            name: name.into(),
            targets,
        }
    }

    /// The literal placeholder text referencing this tag, e.g. `{fuel}`.
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.name)
    }
}
