//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::io::Write;
use std::process::{Command, Output};

fn ldapschema(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ldapschema"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

// ============================================================================
// Normalize / Match Command Tests
// ============================================================================

#[test]
fn test_cli_normalize() {
    let output = ldapschema(&["normalize", "--rule", "caseIgnoreMatch", "  AB  C "]);
    assert!(output.status.success(), "normalize should succeed");
    // "ab c"
    assert_eq!(stdout(&output), "61622063");
}

#[test]
fn test_cli_normalize_base64_value() {
    // "QUI=" is "AB"
    let output = ldapschema(&["normalize", "--rule", "octetStringMatch", "b64:QUI="]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "4142");
}

#[test]
fn test_cli_match() {
    let output = ldapschema(&["match", "--rule", "cn", "--assertion", "x", "y"]);
    assert!(!output.status.success(), "an attribute type is not a matching rule");

    let output = ldapschema(&[
        "match",
        "--rule",
        "generalizedTimeMatch",
        "--assertion",
        "20060906130000.000Z",
        "2006090613Z",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "TRUE");

    let output = ldapschema(&["match", "--rule", "integerMatch", "--assertion", "42", "forty-two"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "UNDEFINED");
}

#[test]
fn test_cli_substring() {
    let output = ldapschema(&[
        "substring",
        "--rule",
        "caseIgnoreSubstringsMatch",
        "--any",
        "value",
        "--any",
        "this",
        "this is a value",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "FALSE");

    let output = ldapschema(&[
        "substring",
        "--rule",
        "caseIgnoreSubstringsMatch",
        "--initial",
        "This",
        "--final",
        "VALUE",
        "this is a value",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "TRUE");
}

// ============================================================================
// Index Command Tests
// ============================================================================

#[test]
fn test_cli_keys() {
    let output = ldapschema(&["keys", "--rule", "caseExactSubstringsMatch", "--key-size", "2", "abc"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("2.5.13.7:2"), "should list the substring index");
    // "ab", "bc" and "c"
    assert!(text.contains("  6162"));
    assert!(text.contains("  6263"));
    assert!(text.contains("  63"));

    let output = ldapschema(&["keys", "--rule", "caseExactSubstringsMatch", "--key-size", "0", "abc"]);
    assert!(!output.status.success(), "a zero key size is rejected");
}

#[test]
fn test_cli_query() {
    let output = ldapschema(&["query", "--rule", "caseExactMatch", "--assertion", "def"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["type"], "exact");
    assert_eq!(json["args"]["index_id"], "2.5.13.5");
    assert_eq!(json["args"]["key"], "def");
}

// ============================================================================
// Dump / Options Tests
// ============================================================================

#[test]
fn test_cli_dump() {
    let output = ldapschema(&["dump"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("=== Schema: Core Schema ==="));
    assert!(text.contains("Attribute types: "));
    assert!(!text.contains("=== Warnings ==="));
}

#[test]
fn test_cli_dump_json() {
    let output = ldapschema(&["dump", "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["name"], "Core Schema");
    assert!(json["attribute_types"].as_array().unwrap().len() > 10);
}

#[test]
fn test_cli_options_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"allow_zero_length_directory_strings": true}}"#).unwrap();

    let output = ldapschema(&["dump", "--json", "--options", file.path().to_str().unwrap()]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["name"], "Core Schema");
}

#[test]
fn test_cli_bad_options_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    let output = ldapschema(&["dump", "--options", file.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}
