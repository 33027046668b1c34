use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

#[test]
fn wrong_argument_count_exits_1() {
    Command::cargo_bin("romcheck").unwrap().assert().code(1);
    Command::cargo_bin("romcheck").unwrap().arg("only.dat").assert().code(1);
    Command::cargo_bin("romcheck").unwrap().args(["a.dat", "roms", "extra"]).assert().code(1);
}

#[test]
fn missing_dat_file_exits_1() {
    let tmp = TempDir::new().unwrap();
    tmp.child("roms").create_dir_all().unwrap();
    Command::cargo_bin("romcheck")
        .unwrap()
        .current_dir(tmp.path())
        .args(["nope.dat", "roms"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: DAT file 'nope.dat' not found"));
    tmp.child("verification_report.txt").assert(predicate::path::missing());
}

#[test]
fn missing_roms_folder_exits_1() {
    let tmp = TempDir::new().unwrap();
    tmp.child("set.dat").write_str("<datafile/>").unwrap();
    Command::cargo_bin("romcheck")
        .unwrap()
        .current_dir(tmp.path())
        .args(["set.dat", "roms"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ROMs folder 'roms' not found"));
}

#[test]
fn malformed_dat_exits_1_without_report() {
    let tmp = TempDir::new().unwrap();
    tmp.child("roms").create_dir_all().unwrap();
    tmp.child("bad.dat").write_str("<datafile><game></datafile>").unwrap();
    Command::cargo_bin("romcheck")
        .unwrap()
        .current_dir(tmp.path())
        .args(["bad.dat", "roms"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse manifest bad.dat: malformed XML"));
    tmp.child("verification_report.txt").assert(predicate::path::missing());
}

#[test]
fn help_exits_0() {
    Command::cargo_bin("romcheck")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("DAT"));
}
