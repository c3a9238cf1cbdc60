use assert_cmd::prelude::*;
use once_cell::sync::Lazy;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

static LAYOUT_XML: Lazy<String> = Lazy::new(|| {
    r#"<values>
    <object position="car_x" value="3.5"/>
    <object position="car_y" value="10"/>
    <object position="sun_z" value="2"/>
    <object position="floor_y" value="-1.5"/>
</values>
"#
    .to_string()
});

fn write_layout(contents: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp layout");
    tmp.write_all(contents.as_bytes()).expect("write layout");
    tmp
}

#[test]
fn headless_run_reports_the_final_state() {
    let layout = write_layout(&LAYOUT_XML);
    let mut cmd = Command::cargo_bin("orrery").expect("binary exists");
    cmd.arg(layout.path())
        .arg("--headless")
        .arg("--frames")
        .arg("1");
    cmd.assert()
        .success()
        .stdout(contains("Simulated 1 frames (0.04s of scene time)"))
        .stdout(contains(" - sun at (0.00, 0.00, 2.00)"))
        .stdout(contains(" - floor at (0.00, -1.50, 0.00)"))
        .stdout(contains(" - car at (3.50, 10.00, 0.00)"))
        .stdout(contains("Car position (3.50, 10.00, 0.00)"))
        .stdout(contains("Active camera eye (0.00, 10.00, -10.00)"));
}

#[test]
fn missing_layout_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.xml");
    let mut cmd = Command::cargo_bin("orrery").expect("binary exists");
    cmd.arg(&path).arg("--headless").arg("--frames").arg("1");
    cmd.assert()
        .success()
        .stdout(contains("Car position (0.00, 0.00, 0.00)"));
}

#[test]
fn malformed_layout_is_an_error() {
    let layout = write_layout(r#"<values><object position="car_x"/></values>"#);
    let mut cmd = Command::cargo_bin("orrery").expect("binary exists");
    cmd.arg(layout.path()).arg("--headless");
    cmd.assert()
        .failure()
        .stderr(contains("missing the value attribute"));
}

#[test]
fn unknown_arguments_are_rejected() {
    let mut cmd = Command::cargo_bin("orrery").expect("binary exists");
    cmd.arg("--bogus");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --bogus"));
}
