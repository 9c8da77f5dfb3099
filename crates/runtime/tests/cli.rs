use std::process::Command;

fn reinforce() -> Command {
    Command::new(env!("CARGO_BIN_EXE_reinforce"))
}

#[test]
fn tiny_training_run_completes() {
    let output = reinforce()
        .args([
            "--episodes", "3", "--max-steps", "20", "--hidden", "8", "--window", "2",
            "--report-every", "1", "--eval-episodes", "1",
        ])
        .env("RUST_LOG", "info")
        .output()
        .expect("failed to launch reinforce");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Episode 3\tAverage Score:"), "stdout: {stdout}");
    assert!(stdout.contains("greedy evaluation"), "stdout: {stdout}");
}

#[test]
fn config_file_is_loaded() {
    let path = std::env::temp_dir().join(format!("reinforce-cli-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "episodes": 2, "max_steps": 10, "hidden": 4, "report_every": 1 }"#).unwrap();

    let output = reinforce()
        .arg("--config")
        .arg(&path)
        .env("RUST_LOG", "info")
        .output()
        .expect("failed to launch reinforce");
    std::fs::remove_file(&path).unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Episode 2\tAverage Score:"), "stdout: {stdout}");
    assert!(!stdout.contains("Episode 3\t"));
}

#[test]
fn invalid_flags_fail() {
    let output = reinforce()
        .args(["--gamma", "1.5", "--episodes", "1"])
        .output()
        .expect("failed to launch reinforce");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid training config"));
}

#[test]
fn missing_config_file_fails() {
    let output = reinforce()
        .args(["--config", "/nonexistent/reinforce.json"])
        .output()
        .expect("failed to launch reinforce");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("loading config"));
}
