#![forbid(unsafe_code)]
use chrono::NaiveDate;
use escala::{
    model::{EmployeeId, EntryKind, Mode, ScheduleEntry},
    notification::{prepare_report, TextNotice},
    scheduler::{scan, Planner, Severity},
    storage::{MemStore, Scope, Store},
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(employee: &str, day: NaiveDate, kind: EntryKind) -> ScheduleEntry {
    ScheduleEntry::new(
        EmployeeId::new(employee),
        employee.to_owned(),
        day,
        kind,
        Mode::Production,
    )
}

fn range() -> (NaiveDate, NaiveDate) {
    (date(2025, 6, 1), date(2025, 6, 30))
}

#[test]
fn friday_dayoff_is_an_error() {
    let entries = vec![entry("emp-1", date(2025, 6, 20), EntryKind::DayOff)];
    let (start, end) = range();
    let conflicts = scan(&entries, start, end);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].severity, Severity::Error);
    assert!(conflicts[0].message.contains("Friday"));
}

#[test]
fn unlinked_compensation_is_an_error_reported_once() {
    // gravado direto no Store: estado transitório permitido, mas sinalizado
    let mut store = MemStore::new();
    store
        .create(entry("emp-1", date(2025, 6, 15), EntryKind::SundayWorked))
        .unwrap();

    let p = Planner::new(store, Scope::new(6, 2025).unwrap());
    let (start, end) = range();
    let conflicts = p.scan_conflicts(start, end).unwrap();

    // o Store também reporta a compensação ausente pelo seu próprio RPC;
    // a deduplicação garante um único erro
    let errors: Vec<_> = conflicts
        .iter()
        .filter(|c| c.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("compensatory"));

    // e um aviso pela abertura de sábado ausente
    let warnings: Vec<_> = conflicts
        .iter()
        .filter(|c| c.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
}

#[test]
fn linked_compensation_is_clean() {
    let mut sunday = entry("emp-1", date(2025, 6, 15), EntryKind::SundayWorked);
    let comp = entry("emp-1", date(2025, 6, 18), EntryKind::DayOff);
    sunday.compensatory_rest_id = Some(comp.id.clone());
    let mut opening = entry("emp-1", date(2025, 6, 14), EntryKind::Work);
    opening.is_opening = true;

    let (start, end) = range();
    let conflicts = scan(&[sunday, comp, opening], start, end);
    assert!(conflicts.is_empty());
}

#[test]
fn work_on_sunday_without_opening_warns() {
    let entries = vec![entry("emp-1", date(2025, 6, 15), EntryKind::Work)];
    let (start, end) = range();
    let conflicts = scan(&entries, start, end);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].severity, Severity::Warning);
    assert!(conflicts[0].message.contains("2025-06-14"));
}

#[test]
fn entries_outside_the_range_are_ignored() {
    let entries = vec![entry("emp-1", date(2025, 7, 4), EntryKind::DayOff)];
    let (start, end) = range();
    assert!(scan(&entries, start, end).is_empty());
}

#[test]
fn grouped_by_employee_not_cross_matched() {
    // a abertura de sábado de emp-2 não cobre o domingo de emp-1
    let mut opening = entry("emp-2", date(2025, 6, 14), EntryKind::Work);
    opening.is_opening = true;
    let entries = vec![
        entry("emp-1", date(2025, 6, 15), EntryKind::Work),
        opening,
    ];
    let (start, end) = range();
    let conflicts = scan(&entries, start, end);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].employee_id.as_str(), "emp-1");
}

#[test]
fn rendered_report_snapshot() {
    let entries = vec![
        entry("emp-1", date(2025, 6, 15), EntryKind::SundayWorked),
        entry("emp-2", date(2025, 6, 20), EntryKind::DayOff),
    ];
    let (start, end) = range();
    let conflicts = scan(&entries, start, end);
    let report = prepare_report(&conflicts, start, end, &TextNotice);
    assert_eq!(report.errors, 2);
    assert_eq!(report.warnings, 1);
    insta::assert_snapshot!(report.content);
}

#[test]
fn empty_report_says_so() {
    let (start, end) = range();
    let report = prepare_report(&[], start, end, &TextNotice);
    assert!(!report.has_errors());
    assert!(report.content.contains("no conflicts"));
}

#[test]
fn prior_month_opening_covers_a_sunday_on_the_first() {
    // abertura no sábado 2025-05-31; o domingo 2025-06-01 abre o intervalo
    let mut store = MemStore::new();
    let mut opening = entry("emp-1", date(2025, 5, 31), EntryKind::Work);
    opening.is_opening = true;
    store.create(opening).unwrap();
    store
        .create(entry("emp-1", date(2025, 6, 1), EntryKind::Work))
        .unwrap();

    let p = Planner::new(store, Scope::new(6, 2025).unwrap());
    let (start, end) = range();
    let conflicts = p.scan_conflicts(start, end).unwrap();
    assert!(conflicts.is_empty());
}
