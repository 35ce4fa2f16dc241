use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("signal-enricher").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn topics_command_prints_assignments() {
    let mut cmd = Command::cargo_bin("signal-enricher").expect("binary exists");
    let output = cmd
        .args(["topics", "The metro bus was delayed", "Nothing relevant here"])
        .env_remove("MODEL_BACKEND")
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(parsed[0][0]["themeId"], "transit");
    assert_eq!(parsed[1][0]["themeId"], "general");
}
