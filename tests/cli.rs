use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const ITERATIONS: &str = "1000";

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("crypter"));
    cmd.env_remove("CRYPTER_SECRET")
        .env_remove("CRYPTER_LOG")
        .env("CRYPTER_ITERATIONS", ITERATIONS);
    cmd
}

fn encrypt_file(secret: &str, input: &std::path::Path, output: &std::path::Path, extra: &[&str]) {
    bin()
        .env("CRYPTER_SECRET", secret)
        .arg("encrypt")
        .args(extra)
        .arg("--input")
        .arg(input)
        .arg("--output")
        .arg(output)
        .assert()
        .success();
}

#[test]
fn encrypt_and_decrypt_roundtrip() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let sealed = dir.path().join("plain.txt.sealed");
    fs::write(&plain, "hello world").unwrap();

    encrypt_file("pw", &plain, &sealed, &[]);
    assert_eq!(fs::read(&sealed).unwrap().len(), 96 + 11);

    bin()
        .env("CRYPTER_SECRET", "pw")
        .arg("decrypt")
        .arg("--input")
        .arg(&sealed)
        .assert()
        .success()
        .stdout("hello world");
}

#[test]
fn stdin_to_stdout_roundtrip() {
    let output = bin()
        .env("CRYPTER_SECRET", "pw")
        .arg("encrypt")
        .arg("--engine")
        .arg("subtle")
        .write_stdin("piped payload")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(output.len(), 80 + 13 + 16);

    bin()
        .env("CRYPTER_SECRET", "pw")
        .arg("decrypt")
        .arg("--engine")
        .arg("subtle")
        .write_stdin(output)
        .assert()
        .success()
        .stdout("piped payload");
}

#[test]
fn wrong_secret_fails() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let sealed = dir.path().join("sealed.bin");
    fs::write(&plain, "secret data").unwrap();

    encrypt_file("pw", &plain, &sealed, &[]);

    bin()
        .env("CRYPTER_SECRET", "wrong_pw")
        .arg("decrypt")
        .arg("--input")
        .arg(&sealed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decryption failed"));
}

#[test]
fn aad_must_be_repeated() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let sealed = dir.path().join("sealed.bin");
    fs::write(&plain, "bound").unwrap();

    encrypt_file("pw", &plain, &sealed, &["--aad", "user-42"]);

    bin()
        .env("CRYPTER_SECRET", "pw")
        .arg("decrypt")
        .arg("--input")
        .arg(&sealed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decryption failed"));

    bin()
        .env("CRYPTER_SECRET", "pw")
        .arg("decrypt")
        .arg("--aad")
        .arg("user-42")
        .arg("--input")
        .arg(&sealed)
        .assert()
        .success()
        .stdout("bound");
}

#[test]
fn empty_aad_is_rejected() {
    bin()
        .env("CRYPTER_SECRET", "pw")
        .arg("encrypt")
        .arg("--aad")
        .arg("")
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("additional authenticated data"));
}

#[test]
fn secret_file_is_read_without_trailing_newline() {
    let dir = tempdir().unwrap();
    let secret = dir.path().join("secret");
    let plain = dir.path().join("plain.txt");
    let sealed = dir.path().join("sealed.bin");
    fs::write(&secret, "from-file\n").unwrap();
    fs::write(&plain, "payload").unwrap();

    bin()
        .arg("encrypt")
        .arg("--secret-file")
        .arg(&secret)
        .arg("--input")
        .arg(&plain)
        .arg("--output")
        .arg(&sealed)
        .assert()
        .success();

    bin()
        .env("CRYPTER_SECRET", "from-file")
        .arg("decrypt")
        .arg("--input")
        .arg(&sealed)
        .assert()
        .success()
        .stdout("payload");
}

#[test]
fn empty_secret_file_fails() {
    let dir = tempdir().unwrap();
    let secret = dir.path().join("secret");
    fs::write(&secret, "\n").unwrap();

    bin()
        .arg("encrypt")
        .arg("--secret-file")
        .arg(&secret)
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is empty"));
}

#[test]
fn missing_secret_fails() {
    bin()
        .arg("encrypt")
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No secret provided"));
}

#[test]
fn too_few_iterations_fail() {
    bin()
        .env("CRYPTER_SECRET", "pw")
        .arg("encrypt")
        .arg("--iterations")
        .arg("10")
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("iteration count"));
}

#[test]
fn truncated_envelope_is_invalid() {
    bin()
        .env("CRYPTER_SECRET", "pw")
        .arg("decrypt")
        .write_stdin(vec![0u8; 40])
        .assert()
        .failure()
        .stderr(predicate::str::contains("full information"));
}

#[test]
fn engines_interoperate_through_shared_layout() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let sealed = dir.path().join("sealed.bin");
    fs::write(&plain, "cross engine").unwrap();

    encrypt_file("pw", &plain, &sealed, &["--engine", "direct"]);

    bin()
        .env("CRYPTER_SECRET", "pw")
        .arg("decrypt")
        .arg("--engine")
        .arg("subtle")
        .arg("--layout")
        .arg("detached")
        .arg("--input")
        .arg(&sealed)
        .assert()
        .success()
        .stdout("cross engine");
}

#[test]
fn relayout_then_decrypt_with_other_engine() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let sealed = dir.path().join("sealed.bin");
    let moved = dir.path().join("moved.bin");
    fs::write(&plain, "moved tag").unwrap();

    encrypt_file("pw", &plain, &sealed, &["--engine", "subtle"]);

    bin()
        .arg("relayout")
        .arg("--from")
        .arg("combined")
        .arg("--to")
        .arg("detached")
        .arg("--input")
        .arg(&sealed)
        .arg("--output")
        .arg(&moved)
        .assert()
        .success();

    bin()
        .env("CRYPTER_SECRET", "pw")
        .arg("decrypt")
        .arg("--engine")
        .arg("direct")
        .arg("--input")
        .arg(&moved)
        .assert()
        .success()
        .stdout("moved tag");
}

#[test]
fn inspect_prints_envelope_fields() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let sealed = dir.path().join("sealed.bin");
    fs::write(&plain, "hello world").unwrap();

    encrypt_file("pw", &plain, &sealed, &[]);

    let output = bin()
        .arg("inspect")
        .arg("--input")
        .arg(&sealed)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let info: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(info["layout"], "detached");
    assert_eq!(info["length"], 107);
    assert_eq!(info["ciphertext_length"], 11);
    assert_eq!(info["salt"].as_str().unwrap().len(), 128);
    assert_eq!(info["nonce"].as_str().unwrap().len(), 32);
    assert_eq!(info["tag"].as_str().unwrap().len(), 32);
}

#[test]
fn inspect_rejects_short_input() {
    bin()
        .arg("inspect")
        .write_stdin(vec![0u8; 10])
        .assert()
        .failure()
        .stderr(predicate::str::contains("envelope too short"));
}
