#![forbid(unsafe_code)]
use chrono::NaiveDate;
use escala::{
    model::{EmployeeId, EntryDraft, EntryKind, Mode},
    scheduler::{PlanError, Planner},
    storage::{MemStore, Scope, Store},
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn scope() -> Scope {
    Scope::new(6, 2025).unwrap()
}

fn planner() -> Planner<MemStore> {
    Planner::new(MemStore::new(), scope())
}

fn work(employee: &str, day: NaiveDate) -> EntryDraft {
    EntryDraft::new(EmployeeId::new(employee), employee.to_owned(), day, EntryKind::Work)
}

#[test]
fn staged_entries_carry_test_mode() {
    let mut p = planner();
    p.toggle_test_mode(true).unwrap();
    assert_eq!(p.mode(), Mode::Test);

    p.submit(work("emp-1", date(2025, 6, 16))).unwrap();
    assert_eq!(p.store().list_entries(scope(), Mode::Test).unwrap().len(), 1);
    assert!(p
        .store()
        .list_entries(scope(), Mode::Production)
        .unwrap()
        .is_empty());
}

#[test]
fn apply_round_trips_into_production() {
    let mut p = planner();
    p.toggle_test_mode(true).unwrap();
    p.submit(work("emp-1", date(2025, 6, 16))).unwrap();
    p.submit(work("emp-2", date(2025, 6, 17))).unwrap();

    let count = p.apply_test().unwrap();
    assert_eq!(count, 2);
    assert!(!p.is_test_active());

    let production = p.store().list_entries(scope(), Mode::Production).unwrap();
    assert_eq!(production.len(), 2);
    assert!(production.iter().all(|e| e.mode == Mode::Production));
    assert!(p.store().list_entries(scope(), Mode::Test).unwrap().is_empty());
}

#[test]
fn apply_overwrites_the_production_counterpart() {
    let mut p = planner();
    // produção já tem um dia de trabalho
    let original = p.submit(work("emp-1", date(2025, 6, 16))).unwrap();

    // em teste, o mesmo dia vira folga
    p.toggle_test_mode(true).unwrap();
    p.submit(EntryDraft::new(
        EmployeeId::new("emp-1"),
        "emp-1",
        date(2025, 6, 16),
        EntryKind::DayOff,
    ))
    .unwrap();
    assert_eq!(p.apply_test().unwrap(), 1);

    let production = p.store().list_entries(scope(), Mode::Production).unwrap();
    assert_eq!(production.len(), 1);
    assert_eq!(production[0].kind, EntryKind::DayOff);
    // sobrescrita em vez de recriação: o id de produção sobrevive
    assert_eq!(production[0].id, original.id);
}

#[test]
fn discard_leaves_production_untouched() {
    let mut p = planner();
    p.submit(work("emp-1", date(2025, 6, 16))).unwrap();

    p.toggle_test_mode(true).unwrap();
    p.submit(work("emp-2", date(2025, 6, 17))).unwrap();
    p.submit(work("emp-3", date(2025, 6, 18))).unwrap();

    assert_eq!(p.discard_test().unwrap(), 2);
    assert!(!p.is_test_active());
    assert!(p.store().list_entries(scope(), Mode::Test).unwrap().is_empty());
    assert_eq!(
        p.store().list_entries(scope(), Mode::Production).unwrap().len(),
        1
    );
}

#[test]
fn deactivation_is_refused_while_entries_remain() {
    let mut p = planner();
    p.toggle_test_mode(true).unwrap();
    p.submit(work("emp-1", date(2025, 6, 16))).unwrap();

    let err = p.toggle_test_mode(false).unwrap_err();
    assert!(matches!(err, PlanError::TestEntriesPending(1)));
    assert!(p.is_test_active());

    // depois do descarte a saída é livre
    p.discard_test().unwrap();
    p.toggle_test_mode(true).unwrap();
    p.toggle_test_mode(false).unwrap();
    assert!(!p.is_test_active());
}

#[test]
fn bulk_operations_require_active_test_mode() {
    let mut p = planner();
    assert!(matches!(
        p.apply_test().unwrap_err(),
        PlanError::TestModeInactive
    ));
    assert!(matches!(
        p.discard_test().unwrap_err(),
        PlanError::TestModeInactive
    ));
}

#[test]
fn apply_only_touches_the_scoped_month() {
    let mut p = planner();
    p.toggle_test_mode(true).unwrap();
    p.submit(work("emp-1", date(2025, 6, 16))).unwrap();
    // julho fica fora do escopo corrente
    p.submit(work("emp-1", date(2025, 7, 16))).unwrap();

    assert_eq!(p.apply_test().unwrap(), 1);
    let july = Scope::new(7, 2025).unwrap();
    assert_eq!(p.store().list_entries(july, Mode::Test).unwrap().len(), 1);
}
