// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use approx::assert_abs_diff_eq;
use assert_cmd::{output::OutputError, Command};
use indoc::indoc;
use tempfile::TempDir;

use fda_freq_units::{ConfigFile, FreqUnit, RangeType};

fn freq_units() -> Command {
    Command::cargo_bin("freq-units").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

fn write_file<T: AsRef<Path>>(dir: T, filename: &str, contents: &str) -> PathBuf {
    let path = dir.as_ref().join(filename);
    let mut f = File::create(&path).expect("couldn't make file");
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_help() {
    let (stdout, _) = get_cmd_output(freq_units().arg("--help").ok());
    assert!(stdout.contains("--fs"), "{stdout}");
    assert!(stdout.contains("ARGUMENTS_FILE"), "{stdout}");
}

#[test]
fn test_unit_change_is_reported() {
    let dir = TempDir::new().expect("couldn't make tmp dir");
    let output = dir.path().join("out.toml");
    let cmd = freq_units()
        .args(["--unit", "Hz", "--fs", "48e3", "--range", "sym", "--no-sort"])
        .arg("-o")
        .arg(&output)
        .ok();
    let succeeded = cmd.is_ok();
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(succeeded, "{stdout}\n{stderr}");

    assert!(
        stdout.contains(r#"{"sender":"freq_units","view_changed":"f_unit"}"#),
        "{stdout}"
    );
    assert!(
        stdout.contains(r#"{"sender":"freq_units","view_changed":"f_range"}"#),
        "{stdout}"
    );
    assert!(
        stdout.contains(r#"{"sender":"freq_units","view_changed":"f_S"}"#),
        "{stdout}"
    );
    // Unsorting isn't announced.
    assert!(!stdout.contains("specs_changed"), "{stdout}");
    assert!(stdout.contains("Final state"), "{stdout}");

    let config = ConfigFile::read(&output);
    assert!(config.is_ok(), "{:?}", config.unwrap_err());
    let filter = config.unwrap().filter;
    assert_eq!(filter.freq_specs_unit(), FreqUnit::Hz);
    assert_abs_diff_eq!(filter.f_s(), 48e3);
    assert_eq!(filter.freq_specs_range_type(), RangeType::Sym);
    assert_eq!(filter.freq_specs_range(), [-24e3, 24e3]);
    assert!(!filter.freq_specs_sort());
}

#[test]
fn test_args_file_and_save_toml() {
    let dir = TempDir::new().expect("couldn't make tmp dir");
    let config = write_file(
        &dir,
        "config.json",
        indoc! {r#"
            {
                "filter": {"f_S": 1000.0, "f_max": 1000.0, "freq_specs_unit": "Hz"},
                "params": {"N_FFT": 256}
            }
        "#},
    );
    let args_file = write_file(
        &dir,
        "args.toml",
        &format!(
            "config = {:?}\nunit = \"k\"\nlock = true\n",
            config.display().to_string()
        ),
    );
    let output = dir.path().join("out.json");
    let saved = dir.path().join("saved.toml");

    let cmd = freq_units()
        .arg(&args_file)
        .arg("--save-toml")
        .arg(&saved)
        .arg("--output")
        .arg(&output)
        .ok();
    let succeeded = cmd.is_ok();
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(succeeded, "{stdout}\n{stderr}");

    let filter = ConfigFile::read(&output).unwrap().filter;
    assert_eq!(filter.freq_specs_unit(), FreqUnit::k);
    assert_abs_diff_eq!(filter.f_s(), 1.0);
    assert_abs_diff_eq!(filter.f_max(), 256.0);
    // The lock is hidden for normalized units.
    assert_eq!(filter.f_s_locked(), None);

    let saved = std::fs::read_to_string(&saved).unwrap();
    assert!(saved.contains("unit = \"k\""), "{saved}");
    assert!(saved.contains("lock = true"), "{saved}");
}

#[test]
fn test_dry_run() {
    let dir = TempDir::new().expect("couldn't make tmp dir");
    let output = dir.path().join("out.toml");
    let cmd = freq_units()
        .args(["--unit", "kHz", "--dry-run", "-o"])
        .arg(&output)
        .ok();
    let succeeded = cmd.is_ok();
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(succeeded, "{stdout}\n{stderr}");
    assert!(stdout.contains("Dry run"), "{stdout}");
    assert!(!stdout.contains("Notification"), "{stdout}");
    assert!(!output.exists());
}

#[test]
fn test_errors_are_displayed() {
    let cmd = freq_units().args(["--fs", "-5"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: "), "{stderr}");
    assert!(stderr.contains("positive"), "{stderr}");

    let cmd = freq_units().args(["--config", "does_not_exist.toml"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: "), "{stderr}");

    let cmd = freq_units().args(["--lock", "--unlock"]).ok();
    assert!(cmd.is_err());
}

#[test]
fn test_overflowing_fs_is_an_error() {
    let cmd = freq_units().args(["--unit", "Hz", "--fs", "1e400 Hz"]).ok();
    assert!(cmd.is_err());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: "), "{stderr}");
    assert!(!stdout.contains("complete"), "{stdout}");
}

#[test]
fn test_unknown_unit_is_only_a_warning() {
    let cmd = freq_units().args(["--unit", "furlongs"]).ok();
    let succeeded = cmd.is_ok();
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(succeeded, "{stdout}\n{stderr}");
    assert!(stdout.contains("furlongs"), "{stdout}");
}
