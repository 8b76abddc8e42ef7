use super::{util, Conflict, PlanError, Planner};
use crate::model::{EmployeeId, EntryKind, ScheduleEntry};
use crate::storage::Store;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Varredura pura de um intervalo: agrupa por funcionário e reaplica as
/// regras sobre o estado persistido. Só leitura, nunca bloqueia gravações.
pub fn scan(entries: &[ScheduleEntry], start: NaiveDate, end: NaiveDate) -> Vec<Conflict> {
    let mut out = Vec::new();

    for entry in entries {
        if entry.date < start || entry.date > end {
            continue;
        }

        if entry.kind == EntryKind::DayOff && util::is_friday(entry.date) {
            out.push(Conflict::friday_day_off(&entry.employee_id, entry.date));
        }

        if entry.kind.requires_compensation() && entry.compensatory_rest_id.is_none() {
            out.push(Conflict::missing_compensation(&entry.employee_id, entry.date));
        }

        if util::triggers_opening(entry.kind, entry.date) {
            let saturday = util::preceding_saturday(entry.date);
            // a abertura pode estar fora do intervalo pedido, então olha o
            // conjunto inteiro
            if !util::has_opening_on_saturday(entries, &entry.employee_id, saturday) {
                out.push(Conflict::missing_opening(
                    &entry.employee_id,
                    entry.date,
                    saturday,
                ));
            }
        }
    }

    out
}

/// Varredura completa: scan local + conjunto calculado pelo Store, com
/// deduplicação por (funcionário, data, mensagem).
pub(super) fn scan_with_store<S: Store>(
    planner: &Planner<S>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Conflict>, PlanError> {
    // busca desde o sábado anterior ao início: a abertura de um domingo no
    // dia 1º pode morar no mês passado
    let entries = planner.entries_in_range(util::preceding_saturday(start), end)?;
    let mut out = scan(&entries, start, end);

    let mut seen: HashSet<(String, NaiveDate, String)> =
        out.iter().map(Conflict::key).collect();

    let employees: Vec<EmployeeId> = {
        let mut ids: Vec<EmployeeId> = entries.iter().map(|e| e.employee_id.clone()).collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids.dedup();
        ids
    };

    for employee in &employees {
        let remote = planner
            .store()
            .conflicts(employee, start, end, planner.mode())?;
        for conflict in remote {
            if seen.insert(conflict.key()) {
                out.push(conflict);
            }
        }
    }

    out.sort_by(|a, b| {
        (a.date, a.employee_id.as_str(), &a.message)
            .cmp(&(b.date, b.employee_id.as_str(), &b.message))
    });
    Ok(out)
}
