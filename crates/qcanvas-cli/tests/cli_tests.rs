//! Tests that drive the built `qcanvas` binary.

use std::path::Path;
use std::process::{Command, Output};

fn qcanvas(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qcanvas"))
        .args(args)
        .current_dir(cwd)
        .env_remove("QCANVAS_QUBITS")
        .env_remove("QCANVAS_LAYERS")
        .env_remove("QCANVAS_SHOTS")
        .env_remove("QCANVAS_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run qcanvas")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    let output = qcanvas(&["version"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_seed_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = qcanvas(&["seed", "  Alice "], dir.path());
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("735577801"), "{text}");
    assert!(text.contains("40"), "{text}");
}

#[test]
fn test_seed_rejects_blank_name() {
    let dir = tempfile::tempdir().unwrap();
    let output = qcanvas(&["seed", "   "], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_generate_writes_frontend_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = qcanvas(&["generate", "Muhammed Rasin", "--seed", "1"], dir.path());
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let counts = read_json(&dir.path().join("web").join("quantum_data.json"));
    let counts = counts.as_object().unwrap();
    let total: u64 = counts.values().map(|v| v.as_u64().unwrap()).sum();
    assert_eq!(total, 100);
    assert!(counts.keys().all(|k| k.len() == 5));
}

#[test]
fn test_generate_full_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("art.json");
    let output = qcanvas(
        &[
            "generate",
            "Alice",
            "--full-meta",
            "--qubits",
            "3",
            "--layers",
            "1",
            "--shots",
            "64",
            "--output",
            out.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert!(output.status.success());

    let value = read_json(&out);
    assert_eq!(value["name"], "Alice");
    assert_eq!(value["seed"], 735_577_801u32);
    assert_eq!(value["total_shots"], 64);
    assert_eq!(value["backend"], "simulator");
    assert_eq!(
        value["config"],
        serde_json::json!({"num_qubits": 3, "layers": 1, "shots": 64})
    );
}

#[test]
fn test_generate_batch_saves_first_name() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("batch.json");
    let output = qcanvas(
        &[
            "generate",
            "Alice",
            "Bob",
            "--batch",
            "--full-meta",
            "-o",
            out.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("'Alice'") && text.contains("'Bob'"), "{text}");
    assert_eq!(read_json(&out)["name"], "Alice");
}

#[test]
fn test_generate_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("canvas.yaml"), "num_qubits: 2\nshots: 10\n").unwrap();
    let output = qcanvas(
        &["generate", "Alice", "--config", "canvas.yaml", "--full-meta"],
        dir.path(),
    );
    assert!(output.status.success());

    let value = read_json(&dir.path().join("web").join("quantum_data.json"));
    assert_eq!(value["config"]["num_qubits"], 2);
    assert_eq!(value["config"]["layers"], 3);
    assert_eq!(value["total_shots"], 10);
}

#[test]
fn test_generate_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = qcanvas(&["generate", "Alice", "--qubits", "0"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("web").exists());
}

#[test]
fn test_generate_requires_a_name() {
    let dir = tempfile::tempdir().unwrap();
    let output = qcanvas(&["generate"], dir.path());
    assert!(!output.status.success());
}
