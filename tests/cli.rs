use std::fs;
use std::path::Path;
use std::process::Command;

use rust_xlsxwriter::Workbook;
use serde_json::Value;
use tempfile::tempdir;

const HEADERS: [&str; 13] = [
    "Date",
    "Day",
    "SessionTimeRange",
    "Client",
    "ProgramName",
    "Batch",
    "SessionName",
    "Mentor",
    "Year",
    "Month",
    "VendorName",
    "HoursWorked",
    "Remarks",
];

fn write_source(path: &Path, rows: &[[&str; 13]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .expect("header written");
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet
                    .write_string((row_idx + 1) as u32, col as u16, *value)
                    .expect("cell written");
            }
        }
    }
    workbook.save(path).expect("source saved");
}

fn run_cli(dir: &Path, args: &[&str], password: Option<&str>) -> (bool, String, String) {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_session-sheets"));
    cmd.current_dir(dir).args(args).env_remove("RUST_LOG");
    cmd.env_remove("SESSION_SHEETS_PASSWORD");
    cmd.env("SESSION_SHEETS_TEST_PASSWORD", "open-sesame");
    if let Some(password) = password {
        cmd.env("SESSION_SHEETS_PASSWORD", password);
    }
    let output = cmd.output().expect("run session-sheets");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

fn prepare(dir: &Path) {
    fs::write(
        dir.join("session-sheets.toml"),
        r#"
source = "source.xlsx"
destination = "destination.xlsx"
section = "Formatted Data"

[transform]
day_first = true

[dashboard]
users = ["Arya"]
password_env = "SESSION_SHEETS_TEST_PASSWORD"
"#,
    )
    .expect("config written");

    write_source(
        &dir.join("source.xlsx"),
        &[
            [
                "06/01/2024", "", "9:00 AM to 10:00 AM", "Acme", "Rust", "B1", "Intro", "Arya",
                "", "", "NIIT", "", "",
            ],
            [
                "05/01/2024", "", "9:00 AM - 10:00 AM", "Globex", "Go", "B2", "Intro", "Dev", "",
                "", "NIIT", "2", "",
            ],
            [
                "05/01/2024", "", "9:00 AM - 10:00 AM", "Acme", "Rust", "B1", "Traits", "Arya",
                "", "", "NIIT", "", "",
            ],
            [
                "02/02/2024", "", "1:00 PM - 2:30 PM", "Acme", "Rust", "B1", "Async", "Arya", "",
                "", "NIIT", "", "",
            ],
        ],
    );
}

#[test]
fn transfer_then_dashboard_json() {
    let temp_dir = tempdir().expect("temporary directory");
    prepare(temp_dir.path());

    let (ok, stdout, stderr) = run_cli(temp_dir.path(), &["transfer"], None);
    assert!(ok, "transfer failed: {stderr}");
    assert!(stdout.contains("Transferred 4 session(s)"), "{stdout}");
    assert!(temp_dir.path().join("destination.xlsx").exists());

    let (ok, stdout, stderr) = run_cli(
        temp_dir.path(),
        &[
            "dashboard",
            "--user",
            "arya",
            "--month",
            "January",
            "--format",
            "json",
            "--export",
            "january.csv",
        ],
        Some("open-sesame"),
    );
    assert!(ok, "dashboard failed: {stderr}");

    let report: Value = serde_json::from_str(&stdout).expect("JSON report");
    assert_eq!(report["user"], "Arya");
    assert_eq!(report["summary"]["sessions"], 3);
    assert_eq!(report["summary"]["total_hours"], 4.0);
    assert_eq!(report["records"][0]["date"], "2024-01-05");
    assert_eq!(report["records"][0]["day"], "Friday");
    assert_eq!(report["clashes"].as_array().map(Vec::len), Some(1));

    let csv = fs::read_to_string(temp_dir.path().join("january.csv")).expect("CSV export");
    assert_eq!(csv.lines().count(), 4);
}

#[test]
fn dashboard_rejects_unknown_user_and_wrong_password() {
    let temp_dir = tempdir().expect("temporary directory");
    prepare(temp_dir.path());
    let (ok, _, stderr) = run_cli(temp_dir.path(), &["transfer"], None);
    assert!(ok, "transfer failed: {stderr}");

    let (ok, _, stderr) = run_cli(
        temp_dir.path(),
        &["dashboard", "--user", "mallory"],
        Some("open-sesame"),
    );
    assert!(!ok);
    assert!(stderr.contains("access denied for user 'mallory'"), "{stderr}");

    let (ok, _, stderr) = run_cli(
        temp_dir.path(),
        &["dashboard", "--user", "arya"],
        Some("wrong"),
    );
    assert!(!ok);
    assert!(stderr.contains("access denied"), "{stderr}");
}

#[test]
fn transfer_without_source_fails_with_path() {
    let temp_dir = tempdir().expect("temporary directory");
    let (ok, _, stderr) = run_cli(
        temp_dir.path(),
        &["transfer", "--source", "absent.xlsx"],
        None,
    );
    assert!(!ok);
    assert!(stderr.contains("input file not found: absent.xlsx"), "{stderr}");
}
