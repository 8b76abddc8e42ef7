#![forbid(unsafe_code)]
use chrono::NaiveDate;
use escala::calendar::{export_holidays_json, Holiday, HolidayRegistry, HolidaySet};
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample() -> HolidaySet {
    HolidaySet::new(vec![
        Holiday {
            date: date(2025, 6, 19),
            name: "Corpus Christi".into(),
            worked_by_default: false,
        },
        Holiday {
            date: date(2026, 1, 1),
            name: "Confraternização Universal".into(),
            worked_by_default: false,
        },
    ])
}

#[test]
fn save_and_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holidays.json");
    export_holidays_json(&path, &sample()).unwrap();

    let loaded = HolidaySet::load_from_file(&path).unwrap();
    assert_eq!(loaded.holidays.len(), 2);
    assert!(loaded.is_holiday(date(2025, 6, 19)));
    assert!(!loaded.is_holiday(date(2025, 6, 20)));
}

#[test]
fn list_for_year_filters() {
    let set = sample();
    let of_2025 = set.list_for_year(2025).unwrap();
    assert_eq!(of_2025.len(), 1);
    assert_eq!(of_2025[0].name, "Corpus Christi");
}

#[test]
fn duplicate_dates_are_rejected() {
    let set = HolidaySet::new(vec![
        Holiday {
            date: date(2025, 6, 19),
            name: "A".into(),
            worked_by_default: false,
        },
        Holiday {
            date: date(2025, 6, 19),
            name: "B".into(),
            worked_by_default: true,
        },
    ]);
    assert!(set.validate().is_err());
}
