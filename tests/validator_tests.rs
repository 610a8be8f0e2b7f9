// Integration tests for the batch validator and the shared schema checks

use anyhow::Result;
use serde_json::{Map, Value};
use std::fs;
use tempfile::TempDir;

use manifest_tools::batch::{self, BatchValidator};
use manifest_tools::config::RepoPaths;
use manifest_tools::manifest::Manifest;
use manifest_tools::validation::{self, ValidationIssue};

fn data(raw: &str) -> Map<String, Value> {
    serde_json::from_str(raw).expect("test manifest must be valid JSON")
}

fn setup() -> Result<(TempDir, RepoPaths)> {
    let temp = TempDir::new()?;
    let paths = RepoPaths::new(temp.path());
    fs::create_dir_all(&paths.integrations)?;
    Ok((temp, paths))
}

fn write_manifest(paths: &RepoPaths, domain: &str, body: &str) -> Result<()> {
    let manifest_path = paths.manifest_for(domain);
    fs::create_dir_all(manifest_path.parent().unwrap())?;
    fs::write(&manifest_path, body)?;
    Ok(())
}

#[test]
fn missing_required_field_is_first_violation() {
    let record = data(r#"{"domain":"foo","name":"Foo","requirements":[]}"#);
    assert_eq!(
        validation::validate_data(&record),
        Err(ValidationIssue::MissingField("documentation"))
    );
}

#[test]
fn bogus_integration_type_is_rejected() {
    let record = data(
        r#"{"domain":"foo","name":"Foo","documentation":"u","integration_type":"bogus","requirements":[]}"#,
    );
    assert_eq!(
        validation::validate_data(&record),
        Err(ValidationIssue::InvalidIntegrationType {
            found: "bogus".to_string()
        })
    );
}

#[test]
fn mixed_case_integration_type_is_rejected() {
    // The closed set is lowercase; "Device" and "HUB" are not members
    for found in ["Device", "HUB"] {
        let record = data(&format!(
            r#"{{"domain":"foo","name":"Foo","documentation":"u","integration_type":"{found}","requirements":[]}}"#,
        ));
        assert_eq!(
            validation::validate_data(&record),
            Err(ValidationIssue::InvalidIntegrationType {
                found: found.to_string()
            })
        );
        assert!(matches!(
            validation::validate_data_strict(&record),
            Err(ValidationIssue::InvalidIntegrationType { .. })
        ));
    }
}

#[test]
fn non_string_integration_type_is_rejected() {
    let record = data(
        r#"{"domain":"foo","name":"Foo","documentation":"u","integration_type":7,"requirements":[]}"#,
    );
    assert_eq!(
        validation::validate_data(&record),
        Err(ValidationIssue::InvalidIntegrationType {
            found: "7".to_string()
        })
    );
}

#[test]
fn config_flow_requires_integration_type() {
    let record = data(
        r#"{"domain":"foo","name":"Foo","config_flow":true,"documentation":"u","requirements":[]}"#,
    );
    assert_eq!(
        validation::validate_data(&record),
        Err(ValidationIssue::IntegrationTypeRequired)
    );
}

#[test]
fn config_flow_false_needs_no_type() {
    let record = data(
        r#"{"domain":"foo","name":"Foo","config_flow":false,"documentation":"u","requirements":[]}"#,
    );
    assert_eq!(validation::validate_data(&record), Ok(()));
}

#[test]
fn unordered_keys_fail_the_strict_check() {
    // domain/name are exempt wherever they appear; zeta before alpha is
    // the violation
    let record = data(r#"{"name":"Foo","domain":"foo","zeta":1,"alpha":2}"#);
    assert_eq!(
        validation::check_key_order(&record),
        Err(ValidationIssue::KeysOutOfOrder {
            expected: "name, domain, alpha, zeta".to_string()
        })
    );
}

#[test]
fn ordered_keys_pass_the_strict_check() {
    let record = data(r#"{"domain":"foo","name":"Foo","alpha":1,"zeta":2}"#);
    assert_eq!(validation::check_key_order(&record), Ok(()));
}

#[test]
fn interactive_rules_ignore_key_order() {
    // The manager-side check deliberately skips ordering; only the batch
    // validator enforces it
    let record = data(
        r#"{"domain":"foo","name":"Foo","requirements":[],"documentation":"u","zeta":1,"alpha":2}"#,
    );
    assert_eq!(validation::validate_data(&record), Ok(()));
    assert!(matches!(
        validation::validate_data_strict(&record),
        Err(ValidationIssue::KeysOutOfOrder { .. })
    ));
}

#[test]
fn validate_one_reports_invalid_json() -> Result<()> {
    let (_temp, paths) = setup()?;
    write_manifest(&paths, "broken", "{ not json")?;

    let issue = batch::validate_one(&paths.manifest_for("broken")).unwrap_err();
    assert!(matches!(issue, ValidationIssue::InvalidJson(_)));
    Ok(())
}

#[test]
fn canonical_round_trip_preserves_the_record() -> Result<()> {
    let (_temp, paths) = setup()?;
    write_manifest(
        &paths,
        "foo",
        r#"{"requirements":["lib==1.0"],"name":"Foo","documentation":"https://example.org","domain":"foo","config_flow":true,"integration_type":"device"}"#,
    )?;
    let manifest_path = paths.manifest_for("foo");

    let mut manifest = Manifest::load(&manifest_path)?;
    manifest.canonicalize();
    manifest.write(&manifest_path)?;

    let reread = Manifest::load(&manifest_path)?;
    assert_eq!(reread, manifest);

    let keys: Vec<&str> = reread.data().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "domain",
            "name",
            "config_flow",
            "documentation",
            "integration_type",
            "requirements",
        ]
    );
    Ok(())
}

#[test]
fn empty_registry_is_trivially_valid() -> Result<()> {
    let temp = TempDir::new()?;
    let validator = BatchValidator::new(RepoPaths::new(temp.path()));
    assert_eq!(validator.run(), 0);
    Ok(())
}

#[test]
fn one_bad_manifest_fails_the_batch() -> Result<()> {
    let (_temp, paths) = setup()?;
    write_manifest(
        &paths,
        "good",
        r#"{"domain":"good","name":"Good","config_flow":true,"documentation":"u","integration_type":"hub","requirements":[]}"#,
    )?;
    write_manifest(
        &paths,
        "bad",
        r#"{"domain":"bad","name":"Bad","config_flow":true,"documentation":"u","requirements":[]}"#,
    )?;

    let validator = BatchValidator::new(paths);
    assert_eq!(validator.discover_all().len(), 2);
    assert_eq!(validator.run(), 1);
    Ok(())
}

#[test]
fn all_valid_manifests_pass_the_batch() -> Result<()> {
    let (_temp, paths) = setup()?;
    write_manifest(
        &paths,
        "good",
        r#"{"domain":"good","name":"Good","config_flow":true,"documentation":"u","integration_type":"hub","requirements":[]}"#,
    )?;

    let validator = BatchValidator::new(paths);
    assert_eq!(validator.run(), 0);
    Ok(())
}
