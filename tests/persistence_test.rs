#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: a customer creates a payment
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "{}", common::HEADER).unwrap();
    writeln!(csv1, "42, customer, create, , 100.0, EUR, SWIFT, 123456789, DEUTDEFF").unwrap();

    let mut cmd1 = Command::new(cargo_bin!("payrelease"));
    cmd1.arg(csv1.path()).arg("--db-path").arg(&db_path);

    let output1 = cmd1.output().expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("1,42,100.0,EUR,SWIFT,123456789,DEUTDEFF,pending,,"));

    // 2. Second run: staff verifies the payment stored by the first run
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "{}", common::HEADER).unwrap();
    writeln!(csv2, "7, employee, verify, 1").unwrap();
    writeln!(csv2, "43, customer, create, , 5, ZAR, SWIFT, 123456, FIRNZAJJ").unwrap();

    let mut cmd2 = Command::new(cargo_bin!("payrelease"));
    cmd2.arg(csv2.path()).arg("--db-path").arg(&db_path);

    let output2 = cmd2.output().expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);

    assert!(stdout2.contains("1,42,100.0,EUR,SWIFT,123456789,DEUTDEFF,verified,7,"));
    // The id sequence continues across runs.
    assert!(stdout2.contains("2,43,5,ZAR,SWIFT,123456,FIRNZAJJ,pending,,"));
}
