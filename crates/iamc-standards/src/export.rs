//! Exporting codelists to tabular and YAML representations.
//!
//! The tabular form feeds the spreadsheet writer: one row per code, with a
//! title-cased header and a hidden `file` provenance column that callers
//! can drop. The YAML form is the normalized round-trip format, one
//! single-key mapping per code with null attributes rendered empty.

use std::fmt::Write as _;

use serde::Serialize;

use iamc_model::{AttrValue, CodeList};

use crate::error::{Result, StandardsError};
use crate::loader::FILE_ATTR;

/// An ordered tabular rendering of a codelist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Render a codelist as rows: the dimension name, the description, then
/// every attribute key in first-seen order. The `file` provenance column
/// is appended last and only when requested.
pub fn to_rows(codelist: &CodeList, include_file: bool) -> Table {
    let mut attr_keys: Vec<String> = Vec::new();
    for code in codelist.iter() {
        for key in code.attributes.keys() {
            if key != FILE_ATTR && !attr_keys.iter().any(|k| k == key) {
                attr_keys.push(key.clone());
            }
        }
    }

    let mut columns = Vec::with_capacity(attr_keys.len() + 3);
    columns.push(title_case(codelist.name()));
    columns.push("Description".to_string());
    columns.extend(attr_keys.iter().map(|key| title_case(key)));
    if include_file {
        columns.push(title_case(FILE_ATTR));
    }

    let rows = codelist
        .iter()
        .map(|code| {
            let mut row = Vec::with_capacity(columns.len());
            row.push(code.name.clone());
            row.push(code.description().to_string());
            for key in &attr_keys {
                row.push(
                    code.attribute(key)
                        .map(AttrValue::to_cell)
                        .unwrap_or_default(),
                );
            }
            if include_file {
                row.push(
                    code.attribute(FILE_ATTR)
                        .map(AttrValue::to_cell)
                        .unwrap_or_default(),
                );
            }
            row
        })
        .collect();

    Table { columns, rows }
}

/// Render a codelist as delimited text. Provenance is dropped. With
/// `sort_by_code` the rows are ordered by code name, otherwise insertion
/// order is kept.
pub fn to_csv(codelist: &CodeList, sort_by_code: bool, lineterminator: &str) -> Result<String> {
    let table = to_rows(codelist, false);

    let terminator = match lineterminator.as_bytes() {
        b"\r\n" => csv::Terminator::CRLF,
        [byte] => csv::Terminator::Any(*byte),
        _ => csv::Terminator::Any(b'\n'),
    };

    let mut writer = csv::WriterBuilder::new()
        .terminator(terminator)
        .from_writer(Vec::new());

    writer
        .write_record(&table.columns)
        .map_err(|source| csv_error(codelist, &source))?;

    let mut rows = table.rows;
    if sort_by_code {
        rows.sort_by(|a, b| a[0].cmp(&b[0]));
    }
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|source| csv_error(codelist, &source))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|source| csv_error(codelist, &source))?;
    String::from_utf8(bytes).map_err(|source| csv_error(codelist, &source))
}

/// Render a codelist as the normalized nested-list YAML form:
///
/// ```yaml
/// - Some Variable:
///     description: Some basic variable
///     unit:
///     bool: true
///     file: simple_codelist/foo.yaml
/// ```
///
/// Null attributes are rendered empty. Re-parsing this text yields an
/// equivalent codelist (modulo provenance).
pub fn to_yaml(codelist: &CodeList) -> String {
    let mut out = String::new();
    for code in codelist.iter() {
        let _ = writeln!(out, "- {}:", yaml_scalar_str(&code.name));
        let description = match &code.description {
            Some(text) => AttrValue::from(text.as_str()),
            None => AttrValue::Null,
        };
        let _ = writeln!(out, "    description:{}", yaml_value_suffix(&description));
        for (key, value) in &code.attributes {
            if key == FILE_ATTR {
                continue;
            }
            let _ = writeln!(out, "    {}:{}", yaml_scalar_str(key), yaml_value_suffix(value));
        }
        if let Some(file) = code.attribute(FILE_ATTR) {
            let _ = writeln!(out, "    {}:{}", FILE_ATTR, yaml_value_suffix(file));
        }
    }
    out
}

/// The text after a `key:` for one value; empty for null, otherwise a
/// space and the scalar.
fn yaml_value_suffix(value: &AttrValue) -> String {
    match value {
        AttrValue::Null => String::new(),
        AttrValue::Bool(b) => format!(" {b}"),
        AttrValue::Int(i) => format!(" {i}"),
        // whole-valued floats keep a fractional digit so they re-parse as
        // floats, not integers
        AttrValue::Float(f) if f.fract() == 0.0 && f.is_finite() => format!(" {f:.1}"),
        AttrValue::Float(f) => format!(" {f}"),
        AttrValue::String(s) => format!(" {}", yaml_scalar_str(s)),
        AttrValue::List(items) => {
            let inner = items
                .iter()
                .map(|item| yaml_value_suffix(item).trim_start().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!(" [{inner}]")
        }
    }
}

/// Quote a string scalar only when the plain form would not survive a
/// round trip (empty, YAML special token, numeric-looking, or structural
/// characters).
fn yaml_scalar_str(s: &str) -> String {
    if !needs_quotes(s) {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn needs_quotes(s: &str) -> bool {
    if s.is_empty() || s.trim() != s {
        return true;
    }
    if s.chars().any(char::is_control) {
        return true;
    }
    if matches!(s, "true" | "false" | "null" | "~") {
        return true;
    }
    if s.parse::<i64>().is_ok() || s.parse::<f64>().is_ok() {
        return true;
    }
    if s.contains(": ") || s.ends_with(':') || s.contains(" #") {
        return true;
    }
    matches!(
        s.as_bytes()[0],
        b'{' | b'[' | b'&' | b'*' | b'?' | b'|' | b'>' | b'%' | b'@' | b'`' | b'"' | b'\'' | b'#'
            | b'-'
    )
}

fn csv_error(codelist: &CodeList, source: &dyn std::fmt::Display) -> StandardsError {
    StandardsError::InvalidFormat {
        file: format!("{} codelist", codelist.name()),
        message: format!("csv export failed: {source}"),
    }
}

/// Title-case a column name the way spreadsheet exports expect:
/// `unit` -> `Unit`, `eu_member` -> `Eu_Member`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut boundary = true;
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            if boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            boundary = false;
        } else {
            out.push(ch);
            boundary = true;
        }
    }
    out
}
