use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use iamc_standards::DataStructureDefinition;
use iamc_validate::validate;

fn unique_temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "iamc-nomenclature-{}-{}-{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    dir
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn write_definitions(root: &Path) {
    write(
        &root.join("variables/variables.yaml"),
        "- Primary Energy:\n\
         \x20   description: Total primary energy supply\n\
         \x20   unit: EJ/yr\n\
         - Final Energy:\n\
         \x20   unit: EJ/yr\n",
    );
    write(
        &root.join("regions/regions.yaml"),
        "common:\n\
         \x20   - World\n\
         countries:\n\
         \x20   - Some Country:\n\
         \x20       iso2: XY\n",
    );
}

fn dimension_values(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    pairs
        .iter()
        .map(|(dimension, values)| {
            (
                (*dimension).to_string(),
                values.iter().map(|v| (*v).to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn conforming_dataset_passes() {
    let root = unique_temp_dir("validate-ok");
    write_definitions(&root);
    let definition = DataStructureDefinition::from_directory(&root).expect("load definitions");

    let data = dimension_values(&[
        ("variable", &["Primary Energy", "Final Energy"]),
        ("region", &["World", "Some Country"]),
    ]);
    validate(&definition, &data).expect("dataset conforms");

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn unknown_region_is_reported() {
    let root = unique_temp_dir("validate-region");
    write_definitions(&root);
    let definition = DataStructureDefinition::from_directory(&root).expect("load definitions");

    let data = dimension_values(&[
        ("variable", &["Primary Energy"]),
        ("region", &["World", "Atlantis"]),
    ]);
    let err = validate(&definition, &data).expect_err("Atlantis is not defined");

    assert_eq!(err.violations.len(), 1);
    assert_eq!(err.violations[0].dimension, "region");
    assert_eq!(err.violations[0].missing, ["Atlantis"]);
    assert!(err.to_string().contains("region: [\"Atlantis\"]"));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn all_violations_are_collected_in_one_error() {
    let root = unique_temp_dir("validate-all");
    write_definitions(&root);
    let definition = DataStructureDefinition::from_directory(&root).expect("load definitions");

    let data = dimension_values(&[
        ("variable", &["Primary Energy", "Primary Energy|Unknown"]),
        ("region", &["Atlantis", "Lemuria"]),
    ]);
    let err = validate(&definition, &data).expect_err("two dimensions fail");

    // no fail-fast: both dimensions show up with their full missing sets
    assert_eq!(err.violations.len(), 2);
    assert_eq!(err.violations[0].dimension, "variable");
    assert_eq!(err.violations[0].missing, ["Primary Energy|Unknown"]);
    assert_eq!(err.violations[1].dimension, "region");
    assert_eq!(err.violations[1].missing, ["Atlantis", "Lemuria"]);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn absent_dimension_is_skipped() {
    let root = unique_temp_dir("validate-skip");
    write_definitions(&root);
    let definition = DataStructureDefinition::from_directory(&root).expect("load definitions");

    // dataset without a region column validates against variables only
    let data = dimension_values(&[("variable", &["Final Energy"])]);
    validate(&definition, &data).expect("missing dimension is not an error");

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn missing_definitions_directory_raises() {
    let root = unique_temp_dir("validate-missing");
    let err = DataStructureDefinition::from_directory(&root).expect_err("no definitions");
    assert!(err.to_string().contains("definitions directory not found"));
}
