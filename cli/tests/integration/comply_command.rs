//! Integration tests for `tfcomply comply` against a local mock API.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;

const MOID: &str = "5f3a0c6e6962752d30a1b2c3";
const KEY_ID: &str = "59c84e4a16267c0001c23428/59cc595416267c0001a0dfc7/62a1b2c3d4e5f60001a2b3c4";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn expected_template() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("full")
        .join("expected.json")
}

fn tfcomply(server: &MockServer, key: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tfcomply"));
    cmd.env("NO_COLOR", "1")
        .env("IS_HOST", server.base_url())
        .env("IS_KEYID", KEY_ID)
        .env("IS_KEYFILE", fixture(key));
    cmd
}

fn comply_args(name: &str) -> Vec<String> {
    vec![
        "comply".to_string(),
        "--path".to_string(),
        "/api/v1/snmp/Policies/{{ .moid }}".to_string(),
        "--expected".to_string(),
        expected_template().display().to_string(),
        "--var".to_string(),
        format!("moid={MOID}"),
        "--var".to_string(),
        format!("name={name}"),
    ]
}

fn snmp_policy(name: &str) -> serde_json::Value {
    json!({
        "Moid": MOID,
        "ClassId": "snmp.Policy",
        "ObjectType": "snmp.Policy",
        "Name": name,
        "Description": format!("{name} SNMP Policy."),
        "AccessCommunityString": "",
        "CommunityAccess": "Full",
        "Enabled": true,
        "EngineId": "",
        "IsCommunityAccessSet": false,
        "SnmpPort": 161,
        "SnmpTraps": [{
            "ClassId": "snmp.Trap",
            "Community": "",
            "Destination": "198.18.1.62",
            "Enabled": true,
            "IsCommunitySet": false,
            "ObjectType": "snmp.Trap",
            "Port": 162,
            "SecurityLevel": "AuthPriv",
            "Type": "Trap",
            "User": "snmpuser",
            "Version": "V3",
            "VrfName": ""
        }],
        "SnmpUsers": [{
            "AuthType": "SHA",
            "ClassId": "snmp.User",
            "IsAuthPasswordSet": true,
            "IsPrivacyPasswordSet": false,
            "Name": "snmpuser",
            "ObjectType": "snmp.User",
            "PrivacyType": "NA",
            "SecurityLevel": "AuthNoPriv"
        }],
        "SysContact": "",
        "SysLocation": "",
        "Tags": [],
        "TrapCommunity": "",
        "V2Enabled": false,
        "V3Enabled": true
    })
}

#[test]
fn test_comply_passes_for_compliant_object() {
    let name = "test-policies-snmp-a1B2c3";
    let server = MockServer::start();
    let api = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/v1/snmp/Policies/{MOID}"))
            .header_exists("authorization")
            .header_exists("digest")
            .header_exists("date");
        then.status(200).json_body(snmp_policy(name));
    });

    tfcomply(&server, "ec_sec1.pem")
        .args(comply_args(name))
        .assert()
        .success()
        .stdout(predicate::str::contains("complies"));

    api.assert();
}

#[test]
fn test_comply_signs_with_rsa_keys() {
    let name = "test-policies-snmp-rsa001";
    let server = MockServer::start();
    let api = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/v1/snmp/Policies/{MOID}"))
            .header_exists("authorization");
        then.status(200).json_body(snmp_policy(name));
    });

    tfcomply(&server, "rsa_pkcs1.pem")
        .args(comply_args(name))
        .assert()
        .success();

    api.assert();
}

#[test]
fn test_comply_fails_and_lists_mismatches() {
    let name = "test-policies-snmp-a1B2c3";
    let mut policy = snmp_policy(name);
    policy["SnmpPort"] = json!(1161);
    policy["SnmpUsers"][0]["AuthType"] = json!("MD5");
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/api/v1/snmp/Policies/{MOID}"));
        then.status(200).json_body(policy);
    });

    tfcomply(&server, "ec_sec1.pem")
        .args(comply_args(name))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/SnmpPort: expected 161, got 1161"))
        .stderr(predicate::str::contains("/SnmpUsers/0/AuthType"));
}

#[test]
fn test_comply_json_report() {
    let name = "test-policies-snmp-a1B2c3";
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/api/v1/snmp/Policies/{MOID}"));
        then.status(200).json_body(json!({"Name": "someone-else"}));
    });

    let output = tfcomply(&server, "ec_sec1.pem")
        .arg("--json")
        .args(comply_args(name))
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(report["compliant"], false);
    assert_eq!(report["path"], format!("/api/v1/snmp/Policies/{MOID}"));
    let reasons: Vec<&str> = report["mismatches"]
        .as_array()
        .expect("mismatches")
        .iter()
        .filter_map(|m| m["reason"].as_str())
        .collect();
    assert!(reasons.contains(&"missing"), "got: {reasons:?}");
    assert!(reasons.contains(&"value_differs"), "got: {reasons:?}");
}

#[test]
fn test_comply_reports_http_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/api/v1/snmp/Policies/{MOID}"));
        then.status(404)
            .json_body(json!({"code": "InvalidRequest", "message": "Object not found"}));
    });

    tfcomply(&server, "ec_sec1.pem")
        .args(comply_args("test-policies-snmp-a1B2c3"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 404"));
}

#[test]
fn test_comply_without_credentials_fails_before_any_request() {
    let server = MockServer::start();
    let api = server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(json!({}));
    });

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tfcomply"));
    cmd.env("NO_COLOR", "1")
        .env("IS_HOST", server.base_url())
        .env_remove("IS_KEYID")
        .env_remove("IS_KEYFILE")
        .args(comply_args("x"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("IS_KEYID"));

    api.assert_hits(0);
}
