use crate::model::{Employee, EmployeeId, Role, ScheduleEntry};
use crate::scheduler::Conflict;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de funcionários desde CSV: header `display_name,role[,schedulable][,id]`
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let display = rec.get(0).context("missing display_name")?.trim();
        let role = rec.get(1).context("missing role")?.trim();
        if display.is_empty() || role.is_empty() {
            bail!("invalid employee row (empty)");
        }
        let mut employee = Employee::new(display.to_string(), Role::parse(role));
        if let Some(flag) = rec.get(2) {
            let flag = flag.trim();
            if !flag.is_empty() {
                employee.schedulable = parse_bool(flag)
                    .with_context(|| format!("invalid schedulable value for {display}"))?;
            }
        }
        if let Some(id) = rec.get(3) {
            let id = id.trim();
            if !id.is_empty() {
                employee.id = EmployeeId::new(id);
            }
        }
        out.push(employee);
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "sim" | "s" => Ok(true),
        "false" | "0" | "no" | "n" | "nao" | "não" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Export JSON dos lançamentos (formatação bonita)
pub fn export_entries_json<P: AsRef<Path>>(path: P, entries: &[ScheduleEntry]) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(entries)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV dos lançamentos:
/// header `id,employee_id,employee_name,date,kind,opening,closing,compensatory_rest_id,mode,note`
pub fn export_entries_csv<P: AsRef<Path>>(path: P, entries: &[ScheduleEntry]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "id",
        "employee_id",
        "employee_name",
        "date",
        "kind",
        "opening",
        "closing",
        "compensatory_rest_id",
        "mode",
        "note",
    ])?;
    for e in entries {
        let date = e.date.to_string();
        w.write_record([
            e.id.as_str(),
            e.employee_id.as_str(),
            e.employee_name.as_str(),
            date.as_str(),
            e.kind.as_str(),
            if e.is_opening { "1" } else { "0" },
            if e.is_closing { "1" } else { "0" },
            e.compensatory_rest_id
                .as_ref()
                .map(|id| id.as_str())
                .unwrap_or(""),
            e.mode.as_str(),
            e.note.as_deref().unwrap_or(""),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV de conflitos: header `severity,employee_id,date,message`
pub fn export_conflicts_csv<P: AsRef<Path>>(path: P, conflicts: &[Conflict]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["severity", "employee_id", "date", "message"])?;
    for c in conflicts {
        let date = c.date.to_string();
        w.write_record([
            c.severity.as_str(),
            c.employee_id.as_str(),
            date.as_str(),
            c.message.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
