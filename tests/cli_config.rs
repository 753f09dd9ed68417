//! Configuration editing and temp cleanup.

mod common;

use std::fs;

use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use common::TestContext;
use predicates::prelude::*;

#[test]
fn show_prints_effective_values() {
    let ctx = TestContext::new();
    ctx.cli()
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("doubao-seedream-4-5-251128"))
        .stdout(predicate::str::contains("max_count = 10"));
}

#[test]
fn config_without_an_action_is_a_usage_error() {
    let ctx = TestContext::new();
    ctx.cli()
        .arg("config")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--show"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn set_updates_one_key_and_keeps_the_rest() {
    let ctx = TestContext::new();
    ctx.cli().args(["config", "--set", "generation.concurrency=5"]).assert().success();

    let content = fs::read_to_string(ctx.home().join("studio.toml")).unwrap();
    assert!(content.contains("concurrency = 5"));
    assert!(content.contains("width = 64"));
}

#[test]
fn set_rejects_invalid_values() {
    let ctx = TestContext::new();
    ctx.cli()
        .args(["config", "--set", "generation.concurrency=0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("concurrency"));

    ctx.cli()
        .args(["config", "--set", "generation.colour=blue"])
        .assert()
        .code(1);

    let content = fs::read_to_string(ctx.home().join("studio.toml")).unwrap();
    assert!(!content.contains("colour"));
}

#[test]
fn broken_config_is_reported() {
    let ctx = TestContext::new();
    ctx.write_config("[generation]\nunknown_key = 1\n");
    ctx.cli().arg("ls").assert().code(1).stderr(predicate::str::contains("unknown_key"));
}

#[test]
fn cleanup_empties_temp_directory() {
    let ctx = TestContext::new();
    let photo = ctx.write_photo("me.jpg", 64, 64);
    ctx.cli()
        .args(["generate", "-s", "portrait", "--mock", "-n"])
        .arg("-p")
        .arg(&photo)
        .assert()
        .success();
    let normalized = ctx.files_in(&ctx.temp_dir());
    assert_eq!(normalized.len(), 1);

    ctx.cli()
        .arg("cleanup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 temporary file(s)"));
    ChildPath::new(&normalized[0]).assert(predicate::path::missing());
    ChildPath::new(ctx.temp_dir()).assert(predicate::path::is_dir());
    assert_eq!(ctx.files_in(&ctx.output_dir()).len(), 1);
}

#[test]
fn logs_are_written_to_the_configured_directory() {
    let ctx = TestContext::new();
    ctx.write_config("[generation]\nwidth = 64\nheight = 64\n\n[paths]\nlogs_dir = \"var/log\"\n");
    let photo = ctx.write_photo("me.jpg", 64, 64);
    ctx.cli()
        .args(["generate", "-s", "portrait", "--mock", "-n"])
        .arg("-p")
        .arg(&photo)
        .assert()
        .success();

    let logs = ctx.files_in(&ctx.home().join("var").join("log"));
    assert_eq!(logs.len(), 1);
    let content = fs::read_to_string(&logs[0]).unwrap();
    assert!(content.contains("generation finished"));
}
