//! Unit tests for `TerraformDriver`.
//!
//! These tests verify the CLI argument lists, `TF_VAR_*` export, output
//! decoding, and retry behaviour without spawning terraform.

#![allow(clippy::expect_used)]

use std::time::Duration;

use tfcomply::application::ports::{Provisioner, TerraformOptions};
use tfcomply::domain::{RetryPolicy, TemplateVars};
use tfcomply::infra::terraform::TerraformDriver;

use crate::mocks::{MockCommandRunner, err_output, ok_output};

fn opts() -> TerraformOptions {
    let mut vars = TemplateVars::new();
    vars.insert("name".to_string(), "test-policies-snmp-a1B2c3".to_string());
    vars.insert("snmp_auth_password_1".to_string(), "s3cret".to_string());
    TerraformOptions::with_default_retryable_errors("/work/full", vars)
}

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(
        &[(".*Error installing provider.*", "Failed to download provider.")],
        max_retries,
        Duration::from_millis(1),
    )
    .expect("policy")
}

#[tokio::test]
async fn test_init_and_apply_runs_init_then_apply_in_module_dir() {
    let runner = MockCommandRunner::new();
    let driver = TerraformDriver::new(runner.clone(), "terraform");

    driver.init_and_apply(&opts()).await.expect("apply");

    let calls = runner.recorded_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.program == "terraform"));
    assert_eq!(
        calls[0].args,
        ["-chdir=/work/full", "init", "-upgrade=false", "-input=false", "-no-color"]
    );
    assert_eq!(
        calls[1].args,
        ["-chdir=/work/full", "apply", "-input=false", "-auto-approve", "-lock=false", "-no-color"]
    );
}

#[tokio::test]
async fn test_vars_are_exported_as_tf_var_env_not_arguments() {
    let runner = MockCommandRunner::new();
    let driver = TerraformDriver::new(runner.clone(), "terraform");

    driver.init_and_apply(&opts()).await.expect("apply");

    let apply = &runner.recorded_calls()[1];
    assert!(apply.env.contains(&("TF_VAR_name".to_string(), "test-policies-snmp-a1B2c3".to_string())));
    assert!(apply.env.contains(&("TF_VAR_snmp_auth_password_1".to_string(), "s3cret".to_string())));
    assert!(!apply.args.iter().any(|a| a.contains("s3cret")), "secret leaked into argv");
}

#[tokio::test]
async fn test_output_reads_json_value() {
    let runner = MockCommandRunner::with_outputs(vec![ok_output(b"\"5f3a0c6e6962752d30a1b2c3\"\n")]);
    let driver = TerraformDriver::new(runner.clone(), "terraform");

    let moid = driver.output(&opts(), "moid").await.expect("output");

    assert_eq!(moid, "5f3a0c6e6962752d30a1b2c3");
    assert_eq!(
        runner.recorded_calls()[0].args,
        ["-chdir=/work/full", "output", "-no-color", "-json", "moid"]
    );
}

#[tokio::test]
async fn test_output_failure_is_not_retried() {
    let runner = MockCommandRunner::with_outputs(vec![err_output(
        b"Error installing provider \"intersight\"",
    )]);
    let driver = TerraformDriver::new(runner.clone(), "terraform");
    let mut o = opts();
    o.retry = fast_retry(3);

    let err = driver.output(&o, "moid").await.expect_err("should fail");

    assert!(format!("{err:#}").contains("terraform output failed"), "got: {err:#}");
    assert_eq!(runner.recorded_calls().len(), 1);
}

#[tokio::test]
async fn test_destroy_uses_auto_approve() {
    let runner = MockCommandRunner::new();
    let driver = TerraformDriver::new(runner.clone(), "/opt/bin/terraform");

    driver.destroy(&opts()).await.expect("destroy");

    let calls = runner.recorded_calls();
    assert_eq!(calls[0].program, "/opt/bin/terraform");
    assert_eq!(
        calls[0].args,
        ["-chdir=/work/full", "destroy", "-auto-approve", "-input=false", "-lock=false", "-no-color"]
    );
}

#[tokio::test]
async fn test_retryable_init_failure_is_retried_then_succeeds() {
    let runner = MockCommandRunner::with_outputs(vec![
        err_output(b"Error installing provider \"intersight\": connection reset"),
        ok_output(b""),
        ok_output(b""),
    ]);
    let driver = TerraformDriver::new(runner.clone(), "terraform");
    let mut o = opts();
    o.retry = fast_retry(3);

    driver.init_and_apply(&o).await.expect("apply after retry");

    assert_eq!(runner.subcommands(), ["init", "init", "apply"]);
}

#[tokio::test]
async fn test_retries_stop_after_max_retries() {
    let failure = || err_output(b"Error installing provider \"intersight\"");
    let runner = MockCommandRunner::with_outputs(vec![failure(), failure(), failure(), failure()]);
    let driver = TerraformDriver::new(runner.clone(), "terraform");
    let mut o = opts();
    o.retry = fast_retry(2);

    let err = driver.init_and_apply(&o).await.expect_err("should give up");

    // one attempt plus two retries
    assert_eq!(runner.subcommands(), ["init", "init", "init"]);
    assert!(format!("{err:#}").contains("terraform init failed"), "got: {err:#}");
}

#[tokio::test]
async fn test_non_retryable_failure_fails_immediately_with_stderr() {
    let runner = MockCommandRunner::with_outputs(vec![
        ok_output(b""),
        err_output(b"Error: Invalid value for variable \"apikey\""),
    ]);
    let driver = TerraformDriver::new(runner.clone(), "terraform");
    let mut o = opts();
    o.retry = fast_retry(3);

    let err = driver.init_and_apply(&o).await.expect_err("should fail");

    assert_eq!(runner.subcommands(), ["init", "apply"]);
    let msg = format!("{err:#}");
    assert!(msg.contains("terraform apply failed (exit code 1)"), "got: {msg}");
    assert!(msg.contains("Invalid value for variable"), "got: {msg}");
}
