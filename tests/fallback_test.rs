use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

mod common;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "{}", common::HEADER).unwrap();
    writeln!(csv, "42, customer, create, , 100.0, USD, SWIFT, 123456789, ABCD1234").unwrap();
    writeln!(csv, "43, customer, create, , 5, ZAR, SWIFT, 000111222, FIRNZAJJ").unwrap();
    writeln!(csv, "7, employee, verify, 2").unwrap();

    let mut cmd = Command::new(cargo_bin!("payrelease"));
    cmd.arg(csv.path()).arg("--db-path").arg("some_db");

    // The in-memory store still runs the full lifecycle.
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."))
        .stdout(predicate::str::contains(
            "1,42,100.0,USD,SWIFT,123456789,ABCD1234,pending,,",
        ))
        .stdout(predicate::str::contains(
            "2,43,5,ZAR,SWIFT,000111222,FIRNZAJJ,verified,7,",
        ));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "{}", common::HEADER).unwrap();
    writeln!(csv, "42, customer, create, , 100.0, USD, SWIFT, 123456789, ABCD1234").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("payrelease"));
    cmd.arg(csv.path()).arg("--db-path").arg(&db_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Falling back").not())
        .stdout(predicate::str::contains(
            "1,42,100.0,USD,SWIFT,123456789,ABCD1234,pending,,",
        ));
}
