// Black-box tests against the `pdfid` binary via std::process::Command.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Locate the `pdfid` binary produced by Cargo.
fn pdfid_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_pdfid") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop(); // remove test binary filename
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("pdfid");
    p
}

/// A document with five small dictionaries, sized so total capacity
/// comfortably exceeds one byte (mirrors the driver's own unit fixture).
fn write_roomy_fixture(path: &std::path::Path) {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"%PDF-1.6\n");
    for (id, extra) in [(1, 3), (2, 4), (3, 5), (4, 4), (5, 3)] {
        buf.extend_from_slice(format!("{id} 0 obj\n<< /Type /X").as_bytes());
        for i in 0..extra {
            buf.extend_from_slice(format!(" /K{i} {i}").as_bytes());
        }
        buf.extend_from_slice(b" >>\nendobj\n");
    }
    buf.extend_from_slice(b"trailer\n<< /Root 1 0 R >>\n%%EOF");
    fs::write(path, buf).unwrap();
}

/// A single dictionary with fewer than two permutable entries once
/// `/Type` is pinned off: zero capacity.
fn write_tiny_fixture(path: &std::path::Path) {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"%PDF-1.6\n");
    buf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /A 1 >>\nendobj\n");
    buf.extend_from_slice(b"trailer\n<< /Root 1 0 R >>\n%%EOF");
    fs::write(path, buf).unwrap();
}

#[test]
fn write_then_read_round_trips_a_byte() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    let payload = dir.path().join("payload.bin");
    write_roomy_fixture(&input);
    fs::write(&payload, [0xA5u8]).unwrap();

    let status = Command::new(pdfid_bin())
        .args([
            "write",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            payload.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run pdfid write");
    assert!(status.success(), "write should exit 0");
    assert!(output.exists());

    let recovered = dir.path().join("recovered.bin");
    let status = Command::new(pdfid_bin())
        .args(["read", output.to_str().unwrap(), recovered.to_str().unwrap()])
        .status()
        .expect("failed to run pdfid read");
    assert!(status.success(), "read should exit 0");

    let bytes = fs::read(&recovered).unwrap();
    assert_eq!(bytes[0], 0xA5);
}

#[test]
fn capacity_reports_nonzero_bytes_for_roomy_fixture() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.pdf");
    write_roomy_fixture(&input);

    let output = Command::new(pdfid_bin())
        .args(["capacity", input.to_str().unwrap()])
        .output()
        .expect("failed to run pdfid capacity");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    let bytes: u64 = text.trim().parse().expect("capacity prints a plain integer");
    assert!(bytes >= 1);
}

#[test]
fn capacity_reports_zero_bytes_for_tiny_fixture() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.pdf");
    write_tiny_fixture(&input);

    let output = Command::new(pdfid_bin())
        .args(["capacity", input.to_str().unwrap()])
        .output()
        .expect("failed to run pdfid capacity");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert_eq!(text.trim(), "0");
}

#[test]
fn write_exits_2_when_payload_exceeds_capacity() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    let payload = dir.path().join("payload.bin");
    write_tiny_fixture(&input); // zero capacity
    fs::write(&payload, [0x01u8]).unwrap();

    let status = Command::new(pdfid_bin())
        .args([
            "write",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            payload.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run pdfid write");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn unknown_subcommand_exits_1() {
    let status = Command::new(pdfid_bin())
        .arg("frobnicate")
        .status()
        .expect("failed to run pdfid");
    assert_eq!(status.code(), Some(1));
}
