use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const STORE: &str = "tests/data/store";

#[test]
fn create_writes_a_nexus_dataset_to_stdout() {
    let mut command = Command::cargo_bin("phylomat").unwrap();
    command
        .args(["create", "--store", STORE])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#NEXUS"))
        .stdout(predicate::str::contains("DIMENSIONS NTAX=2 NCHAR=3214;"));
}

#[test]
fn create_writes_to_a_file_and_charset_out() {
    let out = assert_fs::NamedTempFile::new("dataset.phy").unwrap();
    let charsets = assert_fs::NamedTempFile::new("charsets.txt").unwrap();

    let mut command = Command::cargo_bin("phylomat").unwrap();
    command
        .args([
            "create",
            "--store",
            STORE,
            "--format",
            "PHY",
            "-o",
            out.path().to_str().unwrap(),
            "--charset-out",
            charsets.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    out.assert(predicate::str::starts_with("2 3214\n"));
    charsets.assert(predicate::str::contains("charset wingless = 2803-3214;"));

    out.close().unwrap();
    charsets.close().unwrap();
}

#[test]
fn fatal_input_errors_exit_nonzero() {
    let mut command = Command::cargo_bin("phylomat").unwrap();
    command
        .args([
            "create",
            "--store",
            STORE,
            "--positions",
            "1st",
            "--degen",
            "NORMAL",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Cannot degenerate codons if you have not selected all codon positions",
        ));
}

#[test]
fn unknown_codon_position_is_rejected_at_parse_time() {
    let mut command = Command::cargo_bin("phylomat").unwrap();
    command
        .args(["create", "--store", STORE, "--positions", "4th"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown codon position: 4th"));
}

#[test]
fn summary_reports_store_statistics_as_json() {
    let mut command = Command::cargo_bin("phylomat").unwrap();
    let assert = command.args(["summary", "--store", STORE]).assert().success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["genes"], 4);
    assert_eq!(value["vouchers"], 2);
    assert_eq!(value["sequences_per_gene"]["COI"], 2);
}
