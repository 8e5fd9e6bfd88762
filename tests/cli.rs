#![cfg(not(target_arch = "wasm32"))]

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn sierpinski() -> Command {
    Command::cargo_bin("sierpinski").expect("binary exists")
}

#[test]
fn summary_describes_the_default_pass() {
    let mut cmd = sierpinski();
    cmd.arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Sierpinski depth 0 (unique): 1 triangles"))
        .stdout(contains("Seed origin=(0.00, 600.00) length=600.00"))
        .stdout(contains("Leaf edge length 600.00"))
        .stdout(contains("Bounds min=(0.00, 80.38) max=(600.00, 600.00)"));
}

#[test]
fn listing_depth_one_shows_the_three_corners() {
    let mut cmd = sierpinski();
    cmd.args(["--summary-only", "--list", "--depth", "1", "--size", "300x300"]);
    cmd.assert()
        .success()
        .stdout(contains("Sierpinski depth 1 (unique): 3 triangles"))
        .stdout(contains(
            " - left=(0.00, 300.00) apex=(75.00, 170.10) right=(150.00, 300.00)",
        ))
        .stdout(contains(
            " - left=(150.00, 300.00) apex=(225.00, 170.10) right=(300.00, 300.00)",
        ))
        .stdout(contains(
            " - left=(75.00, 170.10) apex=(150.00, 40.19) right=(225.00, 170.10)",
        ));
}

#[test]
fn replayed_emission_counts_repeated_draws() {
    let mut cmd = sierpinski();
    cmd.args(["--summary-only", "--depth", "2", "--emission", "replayed"]);
    cmd.assert()
        .success()
        .stdout(contains("Sierpinski depth 2 (replayed): 27 triangles"))
        .stdout(contains("Leaf edge length 150.00"));
}

#[test]
fn settings_document_is_applied_before_flags() {
    let mut settings = NamedTempFile::new().expect("temp settings");
    settings
        .write_all(b"<sierpinski><depth>3</depth><max-depth>5</max-depth></sierpinski>")
        .expect("write settings");

    let mut cmd = sierpinski();
    cmd.arg("--settings")
        .arg(settings.path())
        .arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Sierpinski depth 3 (unique): 27 triangles"))
        .stdout(contains("Leaf edge length 75.00"));

    let mut cmd = sierpinski();
    cmd.arg("--settings")
        .arg(settings.path())
        .args(["--depth", "5", "--summary-only"]);
    cmd.assert()
        .success()
        .stdout(contains("Sierpinski depth 5 (unique): 243 triangles"));
}

#[test]
fn depth_outside_the_control_range_is_rejected() {
    let mut cmd = sierpinski();
    cmd.args(["--summary-only", "--depth", "9"]);
    cmd.assert()
        .failure()
        .stderr(contains("depth 9 is outside the range 0..=8"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn unknown_arguments_print_usage() {
    let mut cmd = sierpinski();
    cmd.arg("--explode");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --explode"))
        .stderr(contains("Usage: sierpinski"));
}
