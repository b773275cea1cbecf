//! Loading codelist definition directories.
//!
//! A codelist is assembled from a directory of YAML files. Each file holds a
//! sequence of entries: a bare name, a single-key `name: {attributes}`
//! mapping, or a tag definition whose key is brace-wrapped (`{fuel}`) and
//! whose value lists the substitution targets. With a configured top-level
//! attribute (regions use `hierarchy`) a file is instead a mapping from a
//! group name to a list of entries, and the group name is injected as that
//! attribute on every nested code.
//!
//! Codes and tags are collected across all files first; expansion,
//! stray-placeholder detection, name hygiene and duplicate checks run in
//! [`CodeListBuilder::finalize`], so diagnostics always see the complete
//! merged picture.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use iamc_model::{AttrValue, Code, CodeList, ModelError, Tag};

use crate::error::{Result, StandardsError};
use crate::expand::{expand_tag, find_placeholder};

/// Hidden attribute recording the file a code was defined in.
pub const FILE_ATTR: &str = "file";

/// Collects codes and tags from definition files, then assembles a
/// validated [`CodeList`].
#[derive(Debug)]
pub struct CodeListBuilder {
    dimension: String,
    top_level_attr: Option<String>,
    codes: Vec<Code>,
    tags: Vec<Tag>,
}

impl CodeListBuilder {
    pub fn new(dimension: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            top_level_attr: None,
            codes: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Promote the top-level grouping key of each file to this attribute
    /// on every code nested beneath it.
    pub fn top_level_attr(mut self, attr: impl Into<String>) -> Self {
        self.top_level_attr = Some(attr.into());
        self
    }

    /// Parse every YAML file under `path` (recursively, in sorted order).
    pub fn parse_files(&mut self, path: &Path) -> Result<&mut Self> {
        if !path.is_dir() {
            return Err(StandardsError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        // provenance is recorded relative to the directory's parent, so a
        // code from `<defs>/variables/foo.yaml` carries `variables/foo.yaml`
        let base = path.parent().unwrap_or(path);

        let files = collect_yaml_files(path)?;
        for file in &files {
            let text = std::fs::read_to_string(file)
                .map_err(|source| StandardsError::io(file.clone(), source))?;
            let value: Value = serde_yaml::from_str(&text)
                .map_err(|source| StandardsError::yaml(file.clone(), source))?;

            let label = file
                .strip_prefix(base)
                .unwrap_or(file)
                .to_string_lossy()
                .replace('\\', "/");
            self.parse_value(&value, &label)?;
        }

        tracing::debug!(
            dimension = %self.dimension,
            files = files.len(),
            codes = self.codes.len(),
            tags = self.tags.len(),
            "parsed codelist definition files"
        );
        Ok(self)
    }

    /// Parse a single YAML document, e.g. a re-imported export.
    pub fn parse_str(&mut self, yaml: &str, label: &str) -> Result<&mut Self> {
        let value: Value = serde_yaml::from_str(yaml)
            .map_err(|source| StandardsError::yaml(label, source))?;
        self.parse_value(&value, label)?;
        Ok(self)
    }

    fn parse_value(&mut self, value: &Value, file: &str) -> Result<()> {
        if let Some(attr) = self.top_level_attr.clone() {
            let Value::Mapping(groups) = value else {
                return Err(invalid(file, "expected a mapping of groups to code lists"));
            };
            for (key, entries) in groups {
                let Value::String(group) = key else {
                    return Err(invalid(file, "group names must be strings"));
                };
                if let Some(tag_name) = placeholder_key(group) {
                    self.push_tag(tag_name, entries, file)?;
                    continue;
                }
                let Value::Sequence(entries) = entries else {
                    return Err(invalid(
                        file,
                        &format!("group {group} must hold a list of codes"),
                    ));
                };
                for entry in entries {
                    self.push_entry(entry, file, Some((attr.as_str(), group.as_str())))?;
                }
            }
        } else {
            let Value::Sequence(entries) = value else {
                return Err(invalid(file, "expected a list of codelist entries"));
            };
            for entry in entries {
                self.push_entry(entry, file, None)?;
            }
        }
        Ok(())
    }

    fn push_entry(
        &mut self,
        entry: &Value,
        file: &str,
        group: Option<(&str, &str)>,
    ) -> Result<()> {
        if let Value::Mapping(mapping) = entry
            && mapping.len() == 1
            && let Some((Value::String(key), value)) = mapping.iter().next()
            && let Some(tag_name) = placeholder_key(key)
        {
            return self.push_tag(tag_name, value, file);
        }

        let mut code = code_from_entry(entry, file)?;
        if let Some((attr, value)) = group {
            code.set_attribute(attr, AttrValue::from(value));
        }
        code.set_attribute(FILE_ATTR, AttrValue::from(file));
        self.codes.push(code);
        Ok(())
    }

    fn push_tag(&mut self, name: &str, targets: &Value, file: &str) -> Result<()> {
        let Value::Sequence(entries) = targets else {
            return Err(StandardsError::MalformedTag {
                entry: format!("{{{name}}} in {file}"),
            });
        };

        let mut parsed = Vec::with_capacity(entries.len());
        for entry in entries {
            parsed.push(code_from_entry(entry, file)?);
        }

        tracing::debug!(tag = name, targets = parsed.len(), file, "discovered tag");
        self.tags.push(Tag::new(name, parsed));
        Ok(())
    }

    /// Expand all discovered tags, then enforce the structural invariants:
    /// no stray placeholders, no leading/trailing whitespace in names, no
    /// duplicate tags or codes.
    pub fn finalize(self) -> Result<CodeList> {
        let mut seen = BTreeSet::new();
        for tag in &self.tags {
            if !seen.insert(tag.name.as_str()) {
                return Err(StandardsError::DuplicateTag {
                    dimension: self.dimension.clone(),
                    name: tag.name.clone(),
                });
            }
        }

        let mut codes = self.codes;
        for tag in &self.tags {
            codes = expand_tag(codes, tag)?;
        }

        for code in &codes {
            if let Some(placeholder) = find_placeholder(&code.name) {
                return Err(StandardsError::StrayTag {
                    code: code.name.clone(),
                    placeholder: placeholder.to_string(),
                });
            }
            if code.name.trim() != code.name {
                return Err(StandardsError::InvalidName {
                    name: code.name.clone(),
                });
            }
        }

        let mut list = CodeList::new(self.dimension);
        for code in codes {
            list.insert(code)?;
        }

        tracing::debug!(
            dimension = list.name(),
            codes = list.len(),
            "assembled codelist"
        );
        Ok(list)
    }
}

/// Load the codelist for one dimension from a definition directory.
pub fn from_directory(dimension: &str, path: &Path) -> Result<CodeList> {
    let mut builder = CodeListBuilder::new(dimension);
    builder.parse_files(path)?;
    builder.finalize()
}

/// Like [`from_directory`], with a top-level grouping attribute.
pub fn from_directory_with(
    dimension: &str,
    path: &Path,
    top_level_attr: &str,
) -> Result<CodeList> {
    let mut builder = CodeListBuilder::new(dimension).top_level_attr(top_level_attr);
    builder.parse_files(path)?;
    builder.finalize()
}

/// Parse one entry into a [`Code`]: a bare name string, or a single-key
/// `name: {attributes}` mapping. Anything else is malformed.
fn code_from_entry(entry: &Value, file: &str) -> Result<Code> {
    match entry {
        Value::String(name) => Ok(Code::from_name(name.clone())?),
        Value::Mapping(mapping) => {
            if mapping.len() != 1 {
                return Err(ModelError::MalformedCode {
                    entry: mapping_keys(mapping),
                }
                .into());
            }
            let Some((Value::String(name), value)) = mapping.iter().next() else {
                return Err(invalid(file, "code names must be strings"));
            };

            let attributes = match value {
                Value::Null => IndexMap::new(),
                Value::Mapping(_) => {
                    serde_yaml::from_value::<IndexMap<String, AttrValue>>(value.clone())
                        .map_err(|source| StandardsError::yaml(file, source))?
                }
                _ => {
                    return Err(invalid(
                        file,
                        &format!("attributes of {name} must be a mapping"),
                    ));
                }
            };

            Ok(Code::new(name.clone(), attributes)?)
        }
        _ => Err(invalid(file, "entries must be names or single-key mappings")),
    }
}

/// `{fuel}` -> `fuel`; returns None for keys that are not placeholders.
fn placeholder_key(key: &str) -> Option<&str> {
    key.strip_prefix('{')?.strip_suffix('}').filter(|s| !s.is_empty())
}

fn mapping_keys(mapping: &Mapping) -> String {
    mapping
        .keys()
        .map(|key| match key {
            Value::String(s) => s.clone(),
            other => format!("{other:?}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn invalid(file: &str, message: &str) -> StandardsError {
    StandardsError::InvalidFormat {
        file: file.to_string(),
        message: message.to_string(),
    }
}

/// All `.yaml`/`.yml` files under `dir`, recursively, in sorted order so
/// assembly is deterministic across platforms.
fn collect_yaml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        let entries =
            std::fs::read_dir(&current).map_err(|source| StandardsError::io(&current, source))?;
        for entry in entries {
            let entry = entry.map_err(|source| StandardsError::io(&current, source))?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("yaml" | "yml")
            ) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_keys() {
        assert_eq!(placeholder_key("{fuel}"), Some("fuel"));
        assert_eq!(placeholder_key("fuel"), None);
        assert_eq!(placeholder_key("{}"), None);
    }

    #[test]
    fn multi_key_mapping_is_malformed() {
        let mut builder = CodeListBuilder::new("variable");
        let err = builder
            .parse_str("- Primary Energy:\n  Final Energy:\n", "inline.yaml")
            .expect_err("two keys in one entry");
        assert!(
            err.to_string()
                .contains("not a single name-attributes mapping")
        );
    }

    #[test]
    fn bare_strings_are_codes() {
        let mut builder = CodeListBuilder::new("scenario");
        builder
            .parse_str("- scenario1\n- scenario2\n", "inline.yaml")
            .expect("parse");
        let list = builder.finalize().expect("assemble");
        assert!(list.contains("scenario1"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn trailing_whitespace_is_rejected_with_literal() {
        let mut builder = CodeListBuilder::new("scenario");
        builder
            .parse_str("- scenario1\n- 'scenario2 '\n", "inline.yaml")
            .expect("parse");
        let err = builder.finalize().expect_err("whitespace name");
        assert!(err.to_string().contains("'scenario2 '"), "got: {err}");
    }

    #[test]
    fn duplicate_tag_is_rejected() {
        let mut builder = CodeListBuilder::new("variable");
        builder
            .parse_str("- '{fuel}':\n  - Electricity\n", "a.yaml")
            .expect("parse a");
        builder
            .parse_str("- '{fuel}':\n  - Gas\n", "b.yaml")
            .expect("parse b");
        let err = builder.finalize().expect_err("duplicate tag");
        assert_eq!(
            err.to_string(),
            "duplicate item in variable tag codelist: fuel"
        );
    }
}
