use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_serpent-defence"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch the serpent-defence binary")
}

#[test]
fn json_report_describes_final_frame() {
    let output = run(&["--ticks", "200", "--json", "--log", "warn"]);
    assert!(output.status.success(), "{output:?}");

    let frame: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout holds a single JSON document");
    assert_eq!(frame["status"], "Running");
    assert_eq!(frame["wave"]["wave"], 1);
    assert!(frame["towers"]["snapshots"].as_array().is_some());
}

#[test]
fn text_report_prints_grid_and_summary() {
    let output = run(&["--ticks", "50", "--report-every", "25", "--log", "off"]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.lines().next().is_some_and(|line| line.len() == 16));
    assert!(stdout.contains('S'));
    assert!(stdout.contains("path length"));
    assert!(stdout.contains("placed Rapid"));
    assert!(stdout.contains("gold"));
}

#[test]
fn invalid_time_step_is_reported() {
    let output = run(&["--dt=-1", "--log", "off"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--dt"));
}

#[test]
fn missing_config_file_is_reported() {
    let output = run(&["--config", "/definitely/not/here.json", "--log", "off"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config file"));
}
