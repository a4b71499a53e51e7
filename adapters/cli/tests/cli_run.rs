use std::{fs, process::Command};

#[test]
fn short_run_prints_reports_and_writes_frame() {
    let frame = std::env::temp_dir().join(format!("turf-war-frame-{}.png", std::process::id()));
    let _ = fs::remove_file(&frame);

    let output = Command::new(env!("CARGO_BIN_EXE_turf-war"))
        .args(["--duration-secs", "1", "--quality", "32", "--attack-as", "base", "--target", "13"])
        .args(["--attack-every-secs", "0.5", "--frame"])
        .arg(&frame)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch turf-war binary");

    assert!(
        output.status.success(),
        "turf-war exited with {:?}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Turf War."), "{stdout}");
    assert!(stdout.contains("Standings"), "{stdout}");
    assert!(stdout.contains("North Central"), "{stdout}");
    assert!(stdout.contains("neutral -> Base"), "{stdout}");

    let bytes = fs::read(&frame).expect("frame written");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let _ = fs::remove_file(&frame);
}

#[test]
fn unknown_target_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_turf-war"))
        .args(["--duration-secs", "0", "--target", "99"])
        .output()
        .expect("failed to launch turf-war binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid attack target"));
}
