use std::{fs, path::PathBuf, process::Command};

fn cubesnake() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cubesnake"));
    let _ = command.env("RUST_LOG", "info");
    command
}

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cubesnake-{}-{name}", std::process::id()));
    fs::write(&path, contents).expect("scratch file is writable");
    path
}

#[test]
fn headless_session_reports_the_outcome() {
    let output = cubesnake()
        .args(["--headless", "120", "--seed", "3", "--preset", "pursuit"])
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "headless run failed: {output:?}");
    let log = String::from_utf8_lossy(&output.stdout);
    assert!(log.contains("headless session finished"), "log was: {log}");
    assert!(log.contains("frames=120"), "log was: {log}");
    assert!(log.contains("strategy=NearestPursuit"), "log was: {log}");
}

#[test]
fn layout_file_drives_a_capture() {
    let layout = scratch_file("layout.toml", "targets = [[0.5, 0.0, 0.0]]\n");
    let config = scratch_file("config.toml", "end_threshold = 1\n");

    let output = cubesnake()
        .arg("--headless")
        .arg("400")
        .arg("--layout")
        .arg(&layout)
        .arg("--config")
        .arg(&config)
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "headless run failed: {output:?}");
    let log = String::from_utf8_lossy(&output.stdout);
    assert!(log.contains("score=1"), "log was: {log}");
    assert!(log.contains("remaining_targets=0"), "log was: {log}");
    assert!(log.contains("FinalReveal"), "log was: {log}");
}

#[test]
fn invalid_config_is_rejected() {
    let config = scratch_file("invalid.toml", "segment_count = 0\n");

    let output = cubesnake()
        .arg("--headless")
        .arg("1")
        .arg("--config")
        .arg(&config)
        .output()
        .expect("binary runs");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid session configuration"), "stderr was: {stderr}");
}
