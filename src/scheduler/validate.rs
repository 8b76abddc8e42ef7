use super::types::Validation;
use super::util;
use crate::calendar::Holiday;
use crate::model::{EntryDraft, EntryKind, ScheduleEntry};

/// Valida um candidato contra o calendário e os lançamentos existentes do
/// mesmo funcionário.
///
/// Pura e síncrona: sem I/O, sem cache; o chamador reexecuta a cada mudança
/// de campo. Todas as regras aplicáveis disparam, não apenas a primeira.
pub fn validate(
    draft: &EntryDraft,
    existing: &[ScheduleEntry],
    holidays: &[Holiday],
) -> Validation {
    let mut report = Validation::default();

    // 1. folga não pode cair em sexta-feira
    if draft.kind == EntryKind::DayOff && util::is_friday(draft.date) {
        report.error(format!("day-off on Friday {} is not allowed", draft.date));
    }

    // 2. domingo/feriado trabalhado exige folga compensatória
    if draft.kind.requires_compensation() && draft.compensatory_date.is_none() {
        report.error(format!(
            "{} requires a compensatory rest date",
            draft.kind.as_str()
        ));
    }

    // 3. a compensação em si não pode cair em sexta-feira
    if let Some(comp) = draft.compensatory_date {
        if util::is_friday(comp) {
            report.error(format!(
                "compensatory rest on Friday {comp} is not allowed"
            ));
        }
        if !draft.kind.requires_compensation() {
            report.warning(format!(
                "compensatory date is ignored for kind {}",
                draft.kind.as_str()
            ));
        }
    }

    // 4. aviso da abertura de sábado gerada automaticamente
    if util::triggers_opening(draft.kind, draft.date) {
        let saturday = util::preceding_saturday(draft.date);
        if !util::has_opening_on_saturday(existing, &draft.employee_id, saturday) {
            report.info(format!(
                "an opening shift on Saturday {saturday} will be created automatically"
            ));
        }
    }

    // dicas de feriado, não bloqueantes
    match util::holiday_on(holidays, draft.date) {
        Some(holiday) if draft.kind == EntryKind::Work && !holiday.worked_by_default => {
            report.warning(format!(
                "{} falls on holiday \"{}\"; consider kind holiday_worked",
                draft.date, holiday.name
            ));
        }
        None if draft.kind == EntryKind::HolidayWorked => {
            report.warning(format!(
                "no registered holiday on {}; holiday_worked may be wrong",
                draft.date
            ));
        }
        _ => {}
    }

    report
}
