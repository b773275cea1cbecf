//! Tag expansion: substituting `{tag}` placeholders with target codes.
//!
//! A code named `Final Energy|Industry|{fuel}` together with a tag `fuel`
//! whose targets are `Electricity` and `Renewables` expands to two codes,
//! one per target. The placeholder is replaced in the name, in the
//! description, and inside any string attribute whose key the target also
//! defines. Target attributes absent from the code are never injected.
//!
//! Expansion runs once per tag; a name referencing several tags is expanded
//! sequentially, yielding the cross product of all targets.

use iamc_model::{AttrValue, Code, Tag};

use crate::error::{Result, StandardsError};

/// Expand one tag over a code list.
///
/// Codes whose name does not contain the placeholder pass through
/// unchanged, keeping their position. A code that does contain it is
/// replaced in place by one code per target, in target order.
pub fn expand_tag(codes: Vec<Code>, tag: &Tag) -> Result<Vec<Code>> {
    let placeholder = tag.placeholder();
    let mut expanded = Vec::with_capacity(codes.len());

    for code in codes {
        if code.name.contains(&placeholder) {
            expanded.extend(expand_code(&code, tag, &placeholder)?);
        } else {
            expanded.push(code);
        }
    }

    Ok(expanded)
}

fn expand_code(code: &Code, tag: &Tag, placeholder: &str) -> Result<Vec<Code>> {
    let mut group = Vec::with_capacity(tag.targets.len());

    for target in &tag.targets {
        let mut output = code.clone();
        output.name = code.name.replace(placeholder, &target.name);

        if let Some(fragment) = target.description.as_deref() {
            output.description = output
                .description
                .map(|d| d.replace(placeholder, fragment));
        }

        for (key, fragment) in &target.attributes {
            let Some(value) = output.attributes.get(key) else {
                continue;
            };
            let Some(text) = value.as_str() else {
                continue;
            };
            if !text.contains(placeholder) {
                continue;
            }
            let Some(fragment) = fragment.as_str() else {
                return Err(StandardsError::NonStringFragment {
                    code: code.name.clone(),
                    target: target.name.clone(),
                    attribute: key.clone(),
                });
            };
            let substituted = text.replace(placeholder, fragment);
            output.set_attribute(key.clone(), AttrValue::String(substituted));
        }

        group.push(output);
    }

    Ok(group)
}

/// Find the first brace-wrapped placeholder in a name, if any.
///
/// This is a plain scan for a `{...}` substring; placeholders are flat and
/// non-recursive, so no templating machinery is needed.
pub fn find_placeholder(name: &str) -> Option<&str> {
    let start = name.find('{')?;
    let end = name[start..].find('}')? + start;
    Some(&name[start..=end])
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    fn code_with(name: &str, attributes: &[(&str, AttrValue)]) -> Code {
        let mut map = IndexMap::new();
        for (key, value) in attributes {
            map.insert((*key).to_string(), value.clone());
        }
        Code::new(name, map).expect("valid code")
    }

    fn fuel_tag() -> Tag {
        Tag::new(
            "fuel",
            vec![
                code_with("Electricity", &[("description", AttrValue::from("electricity"))]),
                code_with("Renewables", &[("description", AttrValue::from("renewables"))]),
            ],
        )
    }

    #[test]
    fn codes_without_placeholder_pass_through() {
        let codes = vec![
            code_with("Primary Energy", &[]),
            code_with("Final Energy", &[]),
        ];
        let expanded = expand_tag(codes.clone(), &fuel_tag()).expect("expansion");
        assert_eq!(expanded, codes);
    }

    #[test]
    fn one_tag_yields_one_code_per_target() {
        let codes = vec![
            code_with("Primary Energy", &[]),
            code_with(
                "Final Energy|{fuel}",
                &[("description", AttrValue::from("final energy from {fuel}"))],
            ),
            code_with("Emissions|CO2", &[]),
        ];

        let expanded = expand_tag(codes, &fuel_tag()).expect("expansion");
        let names: Vec<&str> = expanded.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Primary Energy",
                "Final Energy|Electricity",
                "Final Energy|Renewables",
                "Emissions|CO2",
            ]
        );
        assert_eq!(expanded[2].description(), "final energy from renewables");
    }

    #[test]
    fn two_tags_yield_cross_product() {
        let sector = Tag::new(
            "sector",
            vec![code_with("Industry", &[]), code_with("Transport", &[])],
        );
        let codes = vec![code_with("Final Energy|{sector}|{fuel}", &[])];

        let expanded = expand_tag(codes, &sector).expect("first pass");
        let expanded = expand_tag(expanded, &fuel_tag()).expect("second pass");

        let names: Vec<&str> = expanded.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Final Energy|Industry|Electricity",
                "Final Energy|Industry|Renewables",
                "Final Energy|Transport|Electricity",
                "Final Energy|Transport|Renewables",
            ]
        );
    }

    #[test]
    fn target_attributes_are_not_injected() {
        let tag = Tag::new(
            "fuel",
            vec![code_with("Gas", &[("unit", AttrValue::from("EJ/yr"))])],
        );
        let codes = vec![code_with("Final Energy|{fuel}", &[])];
        let expanded = expand_tag(codes, &tag).expect("expansion");
        assert!(expanded[0].attribute("unit").is_none());
    }

    #[test]
    fn non_string_fragment_is_rejected() {
        let tag = Tag::new(
            "fuel",
            vec![code_with("Gas", &[("note", AttrValue::Int(3))])],
        );
        let codes = vec![code_with(
            "Final Energy|{fuel}",
            &[("note", AttrValue::from("see {fuel}"))],
        )];

        let err = expand_tag(codes, &tag).expect_err("must reject");
        assert!(err.to_string().contains("non-string attribute note"));
    }

    #[test]
    fn placeholder_scan() {
        assert_eq!(find_placeholder("Primary Energy|{Feul}"), Some("{Feul}"));
        assert_eq!(find_placeholder("Primary Energy"), None);
        assert_eq!(find_placeholder("odd } brace {"), None);
    }
}
