use assert_cmd::Command;
use attic_prune::test_utils::fixtures::AtticFixture;
use chrono::Utc;
use predicates::prelude::*;
use serde_json::Value;

const OLD_EPOCH: i64 = 1_000_000_000;

fn attic_prune() -> Command {
    let mut cmd = Command::cargo_bin("attic-prune").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("ATTIC_PRUNE_DIR")
        .env_remove("ATTIC_PRUNE_DRY_RUN")
        .env_remove("ATTIC_PRUNE_ROBOT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    attic_prune()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--no-act"));
}

#[test]
fn test_cli_version() {
    attic_prune()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_age_is_required() {
    attic_prune().assert().failure();
}

#[test]
fn test_missing_attic_fails_before_touching_files() {
    let fixture = AtticFixture::without_attic();
    let bystander = fixture.create_file(&format!("data/pages/start.{OLD_EPOCH}.txt.gz"));

    attic_prune()
        .arg("0")
        .arg("--dir")
        .arg(fixture.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot find directory"))
        .stderr(predicate::str::contains("data/attic"));

    assert!(bystander.exists());
}

#[test]
fn test_missing_attic_robot_error() {
    let fixture = AtticFixture::without_attic();

    attic_prune()
        .args(["0", "--robot", "--dir"])
        .arg(fixture.root())
        .assert()
        .failure()
        .stdout(predicate::str::contains("attic_not_found"));
}

#[test]
fn test_prunes_old_and_keeps_new() {
    let fixture = AtticFixture::new();
    let old = fixture.revision("ns/page", OLD_EPOCH);
    let fresh = fixture.revision("ns/page", Utc::now().timestamp());

    attic_prune()
        .arg("30")
        .arg("-d")
        .arg(fixture.root())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(!old.exists());
    assert!(fresh.exists());
}

#[test]
fn test_verbose_reports_each_decision() {
    let fixture = AtticFixture::new();
    let old = fixture.revision("ns/page", OLD_EPOCH);
    let fresh = fixture.revision("ns/page", Utc::now().timestamp());

    let output = attic_prune()
        .arg("30")
        .arg("-v")
        .arg("-d")
        .arg(fixture.root())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert_eq!(stdout.matches("deleting file").count(), 1);
    assert_eq!(stdout.matches("skipping file").count(), 1);
    assert!(stdout.contains(&format!("processing directory {}", fixture.attic().display())));
    assert!(stdout.contains(&format!("deleting file {}", old.display())));
    assert!(stdout.contains(&format!("skipping file {} with an age of 0 days", fresh.display())));
    assert!(stdout.contains("pruned 1 of 1 expired revisions"));
}

#[test]
fn test_dry_run_lists_candidates_and_deletes_nothing() {
    let fixture = AtticFixture::new();
    let old = fixture.revision("wiki/syntax", OLD_EPOCH);
    let older = fixture.revision("start", OLD_EPOCH - 86_400);

    for flag in ["-n", "--no-act", "--dry-run"] {
        attic_prune()
            .args(["1", flag, "--dir"])
            .arg(fixture.root())
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("deleting file {}", old.display())))
            .stdout(predicate::str::contains(format!("deleting file {}", older.display())))
            .stdout(predicate::str::contains("would prune 2 of 2 revisions"));
    }

    assert!(old.exists());
    assert!(older.exists());
}

#[test]
fn test_env_forces_dry_run() {
    let fixture = AtticFixture::new();
    let old = fixture.revision("page", OLD_EPOCH);

    attic_prune()
        .env("ATTIC_PRUNE_DRY_RUN", "true")
        .arg("1")
        .arg("--dir")
        .arg(fixture.root())
        .assert()
        .success();

    assert!(old.exists());
}

#[test]
fn test_bad_env_value_is_rejected() {
    let fixture = AtticFixture::new();
    let old = fixture.revision("page", OLD_EPOCH);

    attic_prune()
        .env("ATTIC_PRUNE_DRY_RUN", "perhaps")
        .arg("1")
        .arg("--dir")
        .arg(fixture.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ATTIC_PRUNE_DRY_RUN"));

    assert!(old.exists());
}

#[test]
fn test_dir_from_env_and_cwd() {
    let fixture = AtticFixture::new();
    let a = fixture.revision("a", OLD_EPOCH);

    attic_prune()
        .env("ATTIC_PRUNE_DIR", fixture.root())
        .arg("1")
        .assert()
        .success();
    assert!(!a.exists());

    let b = fixture.revision("b", OLD_EPOCH);
    attic_prune()
        .current_dir(fixture.root())
        .arg("1")
        .assert()
        .success();
    assert!(!b.exists());
}

#[test]
fn test_other_files_are_left_alone() {
    let fixture = AtticFixture::new();
    let plain = fixture.create_file(&format!("data/attic/page.{OLD_EPOCH}.txt"));
    let changes = fixture.create_file(&format!("data/attic/page.{OLD_EPOCH}.changes"));
    let meta = fixture.create_file(&format!("data/meta/page.{OLD_EPOCH}.txt.gz"));

    attic_prune()
        .arg("0")
        .arg("--dir")
        .arg(fixture.root())
        .assert()
        .success();

    assert!(plain.exists());
    assert!(changes.exists());
    assert!(meta.exists());
}

#[test]
fn test_malformed_names_warn_and_continue() {
    let fixture = AtticFixture::new();
    let short = fixture.create_file("data/attic/a/1000000000.txt.gz");
    let bad = fixture.create_file("data/attic/a/page.soon.txt.gz");
    let old = fixture.revision("b/page", OLD_EPOCH);

    attic_prune()
        .arg("30")
        .arg("--dir")
        .arg(fixture.root())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "file with unexpected name: '{}'",
            short.display()
        )))
        .stdout(predicate::str::contains(format!(
            "invalid timestamp in file name: '{}'",
            bad.display()
        )));

    assert!(short.exists());
    assert!(bad.exists());
    assert!(!old.exists());
}

#[test]
fn test_robot_report() {
    let fixture = AtticFixture::new();
    fixture.revision("ns/old", OLD_EPOCH);
    fixture.revision("ns/new", Utc::now().timestamp());
    fixture.create_file("data/attic/ns/notes.txt");

    let output = attic_prune()
        .args(["30", "--robot", "--dir"])
        .arg(fixture.root())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "ok");
    let summary = &json["data"]["summary"];
    assert_eq!(summary["deleted"], 1);
    assert_eq!(summary["kept"], 1);
    assert_eq!(summary["ignored"], 1);
    assert_eq!(summary["directories"], 2);
    assert_eq!(json["data"]["entries"].as_array().unwrap().len(), 2);
}

#[test]
fn test_second_run_is_a_no_op() {
    let fixture = AtticFixture::new();
    fixture.revision("p", OLD_EPOCH);

    for expected in [1, 0] {
        let output = attic_prune()
            .args(["30", "--robot", "--dir"])
            .arg(fixture.root())
            .output()
            .unwrap();
        assert!(output.status.success());
        let json: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["data"]["summary"]["deleted"], expected);
    }
}

#[test]
fn test_robot_env_formats_config_errors_as_json() {
    let fixture = AtticFixture::without_attic();
    attic_prune()
        .env("ATTIC_PRUNE_ROBOT", "on")
        .args(["30", "--dir"])
        .arg(fixture.root())
        .assert()
        .failure()
        .stdout(predicate::str::contains("attic_not_found"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_reported_and_run_succeeds() {
    let fixture = AtticFixture::new();
    let old = fixture.revision("ns/page", OLD_EPOCH);
    std::os::unix::fs::symlink(fixture.attic(), fixture.attic().join("ns/loop")).unwrap();

    attic_prune()
        .args(["30", "--follow-links", "--dir"])
        .arg(fixture.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("cannot read"));
    assert!(!old.exists());
}
