#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn cli(sheet: &Path) -> Command {
    let mut cmd = Command::cargo_bin("escala-cli").unwrap();
    cmd.arg("--sheet")
        .arg(sheet)
        .arg("--month")
        .arg("6")
        .arg("--year")
        .arg("2025");
    cmd
}

fn submit_work(sheet: &Path, employee: &str, date: &str) {
    cli(sheet)
        .args([
            "submit",
            "--employee",
            employee,
            "--name",
            "Ana",
            "--date",
            date,
            "--kind",
            "work",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
}

#[test]
fn submit_then_list() {
    let dir = tempdir().unwrap();
    let sheet = dir.path().join("escala.json");

    submit_work(&sheet, "emp-1", "2025-06-16");

    cli(&sheet)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana").and(predicate::str::contains("work")));
}

#[test]
fn list_exports_csv_and_json() {
    let dir = tempdir().unwrap();
    let sheet = dir.path().join("escala.json");
    let out_csv = dir.path().join("junho.csv");
    let out_json = dir.path().join("junho.json");

    submit_work(&sheet, "emp-1", "2025-06-16");

    cli(&sheet)
        .args(["list", "--out-csv"])
        .arg(&out_csv)
        .arg("--out-json")
        .arg(&out_json)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&out_csv).unwrap();
    assert!(csv.starts_with("id,employee_id,employee_name,date,kind"));
    assert!(csv.contains("2025-06-16"));

    let json = std::fs::read_to_string(&out_json).unwrap();
    assert!(json.contains("\"employee_name\": \"Ana\""));
}

#[test]
fn staff_lists_only_schedulable_employees() {
    let dir = tempdir().unwrap();
    let sheet = dir.path().join("escala.json");
    let csv = dir.path().join("staff.csv");
    std::fs::write(
        &csv,
        "display_name,role,schedulable\nAna,vendedora,1\nBruno,gerente,0\n",
    )
    .unwrap();

    cli(&sheet)
        .args(["staff", "--csv"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana").and(predicate::str::contains("Bruno").not()));
}

#[test]
fn validate_refuses_friday_dayoff() {
    let dir = tempdir().unwrap();
    let sheet = dir.path().join("escala.json");

    cli(&sheet)
        .args([
            "validate",
            "--employee",
            "emp-1",
            "--name",
            "Ana",
            "--date",
            "2025-06-20",
            "--kind",
            "dayoff",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Friday"));
}

#[test]
fn test_mode_apply_needs_confirmation() {
    let dir = tempdir().unwrap();
    let sheet = dir.path().join("escala.json");

    cli(&sheet).args(["test", "on"]).assert().success();
    submit_work(&sheet, "emp-1", "2025-06-16");

    // primeira etapa: só o aviso de sobrescrita
    cli(&sheet)
        .arg("apply")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--yes"));

    // segunda etapa: promove e zera o conjunto de teste
    cli(&sheet)
        .args(["apply", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 1"));

    cli(&sheet)
        .args(["list", "--mode", "production"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana"));

    cli(&sheet)
        .args(["list", "--mode", "test"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_mode_discard_requires_confirmation_too() {
    let dir = tempdir().unwrap();
    let sheet = dir.path().join("escala.json");

    cli(&sheet).args(["test", "on"]).assert().success();
    submit_work(&sheet, "emp-1", "2025-06-16");

    cli(&sheet)
        .arg("discard")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("cannot be undone"));

    cli(&sheet)
        .args(["discard", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Discarded 1"));
}

#[test]
fn check_passes_on_a_clean_month() {
    let dir = tempdir().unwrap();
    let sheet = dir.path().join("escala.json");

    submit_work(&sheet, "emp-1", "2025-06-16");

    cli(&sheet)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("no conflicts"));
}

#[test]
fn check_reports_a_staged_friday_dayoff() {
    let dir = tempdir().unwrap();
    let sheet = dir.path().join("escala.json");

    // quinta-feira passa na validação...
    cli(&sheet)
        .args([
            "submit",
            "--employee",
            "emp-1",
            "--name",
            "Ana",
            "--date",
            "2025-06-19",
            "--kind",
            "dayoff",
        ])
        .assert()
        .success();

    // ...e é movida para sexta por edição direta; o check pega depois
    let id = {
        let raw = std::fs::read_to_string(&sheet).unwrap();
        let sheet_json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        sheet_json["entries"][0]["id"].as_str().unwrap().to_owned()
    };
    cli(&sheet)
        .args(["edit", "--id", &id, "--date", "2025-06-20"])
        .assert()
        .success();

    cli(&sheet)
        .arg("check")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("ERROR").and(predicate::str::contains("Friday")));
}
