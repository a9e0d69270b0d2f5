use std::process::Command;

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_hwp2docx"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--font-name"));
    assert!(stdout.contains("--size-delta"));
}

#[test]
fn test_cli_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_hwp2docx"))
        .arg(dir.path().join("missing.hwp"))
        .arg(dir.path().join("out.docx"))
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Input file not found"), "{stderr}");
}

#[test]
fn test_cli_rejects_invalid_sizes() {
    for args in [
        ["--font-size", "0"],
        ["--size-delta", "-2"],
        ["--font-size", "big"],
        ["--size-delta", "0.3"],
        ["--font-size", "10.25"],
    ] {
        let output = Command::new(env!("CARGO_BIN_EXE_hwp2docx"))
            .args(args)
            .args(["in.hwp", "out.docx"])
            .output()
            .expect("Failed to execute command");
        assert!(!output.status.success(), "{args:?} should be rejected");
    }
}

#[test]
fn test_cli_accepts_half_point_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_hwp2docx"))
        .args(["--size-delta", "0.5", "--font-size", "10.5pt"])
        .arg(dir.path().join("missing.hwp"))
        .arg(dir.path().join("out.docx"))
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Input file not found"), "{stderr}");
}

#[test]
fn test_cli_accepts_legacy_mode_names() {
    let dir = tempfile::tempdir().unwrap();
    for mode in ["uno", "python", "office", "text"] {
        let output = Command::new(env!("CARGO_BIN_EXE_hwp2docx"))
            .args(["--mode", mode])
            .arg(dir.path().join("missing.hwp"))
            .arg(dir.path().join("out.docx"))
            .output()
            .expect("Failed to execute command");
        // argument parsing succeeds; the missing input is what fails
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Input file not found"), "{mode}: {stderr}");
    }
}
