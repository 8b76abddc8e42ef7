use crate::calendar::Holiday;
use crate::model::{EmployeeId, EntryKind, ScheduleEntry};
use chrono::{Datelike, Days, NaiveDate, Weekday};

pub(super) fn is_friday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Fri
}

pub(super) fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// Sábado imediatamente anterior à data (a própria, se já for sábado).
pub(super) fn preceding_saturday(date: NaiveDate) -> NaiveDate {
    let back = (date.weekday().num_days_from_sunday() as u64 + 1) % 7;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// O lançamento puxa uma abertura de sábado: domingo trabalhado, ou um
/// turno de trabalho caído num domingo de calendário. Folga nunca puxa.
pub(super) fn triggers_opening(kind: EntryKind, date: NaiveDate) -> bool {
    kind == EntryKind::SundayWorked
        || (is_sunday(date) && matches!(kind, EntryKind::Work | EntryKind::HolidayWorked))
}

pub(super) fn holiday_on(holidays: &[Holiday], date: NaiveDate) -> Option<&Holiday> {
    holidays.iter().find(|h| h.date == date)
}

/// Há abertura registrada para o funcionário no sábado anterior?
pub(super) fn has_opening_on_saturday(
    entries: &[ScheduleEntry],
    employee: &EmployeeId,
    saturday: NaiveDate,
) -> bool {
    entries
        .iter()
        .any(|e| &e.employee_id == employee && e.date == saturday && e.is_opening)
}
