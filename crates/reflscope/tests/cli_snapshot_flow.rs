#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

const CORE_PAYLOAD: &str = r#"{"assemblyName":"Core","timestamp":"t1","types":[{"name":"Foo","fullName":"NS.Foo","namespace":"NS","baseType":"","isClass":true,"isStruct":false,"isEnum":false,"isInterface":false,"fields":[{"name":"x","fieldType":"int","isPublic":true,"isStatic":false,"isReadOnly":false}],"methods":[],"properties":[]}]}"#;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/reflscope-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn wait_for_path(path: &Path, timeout: Duration) {
    let start = Instant::now();
    while !path.exists() {
        assert!(
            start.elapsed() < timeout,
            "socket path did not appear in time"
        );
        thread::sleep(Duration::from_millis(25));
    }
}

#[test]
fn decode_prints_snapshot_as_json() {
    let dir = unique_temp_dir("decode");
    let file = dir.join("snapshot.json");
    std::fs::write(&file, CORE_PAYLOAD).expect("payload file should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_reflscope"))
        .args(["--format", "json", "decode"])
        .arg(&file)
        .output()
        .expect("decode command should run");

    assert!(output.status.success(), "decode should exit zero");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#""assemblyName":"Core""#));
    assert!(stdout.contains(r#""name":"Foo""#));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_framed_capture() {
    let dir = unique_temp_dir("decode-framed");
    let file = dir.join("capture.bin");
    let mut capture = (CORE_PAYLOAD.len() as i32).to_le_bytes().to_vec();
    capture.extend_from_slice(CORE_PAYLOAD.as_bytes());
    std::fs::write(&file, capture).expect("capture file should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_reflscope"))
        .args(["--format", "json", "decode", "--framed"])
        .arg(&file)
        .output()
        .expect("decode command should run");

    assert!(output.status.success(), "framed decode should exit zero");
    assert!(String::from_utf8_lossy(&output.stdout).contains(r#""assemblyName":"Core""#));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_rejects_malformed_payload() {
    let dir = unique_temp_dir("decode-bad");
    let file = dir.join("broken.json");
    std::fs::write(&file, r#"{"assemblyName":"Core""#).expect("payload file should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_reflscope"))
        .args(["--format", "json", "decode"])
        .arg(&file)
        .output()
        .expect("decode command should run");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(60), "malformed payload is data-invalid");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn emit_and_watch_round_trip() {
    let dir = unique_temp_dir("e2e");
    let sock_path = dir.join("channel.sock");
    let payload_file = dir.join("snapshot.json");
    std::fs::write(&payload_file, CORE_PAYLOAD).expect("payload file should be writable");

    let mut emit = Command::new(env!("CARGO_BIN_EXE_reflscope"))
        .args(["--log-level", "error", "emit"])
        .arg(&sock_path)
        .arg("--file")
        .arg(&payload_file)
        .args(["--count", "1"])
        .spawn()
        .expect("emit command should start");

    wait_for_path(&sock_path, Duration::from_secs(5));

    let output = Command::new(env!("CARGO_BIN_EXE_reflscope"))
        .args(["--log-level", "error", "--format", "json", "watch"])
        .arg(&sock_path)
        .args(["--count", "1"])
        .output()
        .expect("watch command should run");

    assert!(output.status.success(), "watch should exit zero");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#""assemblyName":"Core""#));

    // What watch printed must match decoding the payload directly.
    let expected = reflscope::schema::decode_snapshot(CORE_PAYLOAD.as_bytes())
        .expect("payload should decode");
    let printed: serde_json::Value =
        serde_json::from_str(stdout.lines().next().expect("watch should print one line"))
            .expect("watch output should be json");
    assert_eq!(printed["snapshot"]["assemblyName"], expected.assembly_name);
    assert_eq!(
        printed["snapshot"]["types"][0]["name"],
        expected.types[0].name
    );

    let status = emit.wait().expect("emit should exit");
    assert!(status.success(), "emit should exit zero after serving");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_reflscope"))
        .arg("version")
        .output()
        .expect("version command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("reflscope"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
