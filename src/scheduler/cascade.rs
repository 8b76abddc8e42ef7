use super::{util, PlanError, Planner};
use crate::model::{EntryDraft, EntryId, EntryKind, Mode, ScheduleEntry};
use crate::storage::{Store, StoreError};
use chrono::NaiveDate;

/// Submete um candidato: valida, grava a cadeia derivada e o principal.
///
/// A cadeia NÃO é transacional: cada passo é uma gravação independente, na
/// ordem compensação → principal → abertura. Uma falha no meio deixa o que já
/// foi gravado no lugar.
pub(super) fn submit<S: Store>(
    planner: &mut Planner<S>,
    draft: EntryDraft,
) -> Result<ScheduleEntry, PlanError> {
    let report = planner.validate_draft(&draft)?;
    if !report.is_ok() {
        return Err(PlanError::Validation(report.errors));
    }

    let mode = planner.mode();

    // 1. a folga compensatória precisa existir antes do principal referenciá-la
    let compensatory_id = if draft.kind.requires_compensation() {
        // o validador já exigiu a data
        let comp_date = draft
            .compensatory_date
            .ok_or_else(|| PlanError::Validation(vec!["missing compensatory date".into()]))?;
        Some(ensure_compensatory(planner, &draft, comp_date, mode)?)
    } else {
        None
    };

    // 2. lançamento principal; chave duplicada aqui é erro do usuário
    let mut entry = ScheduleEntry::new(
        draft.employee_id.clone(),
        draft.employee_name.clone(),
        draft.date,
        draft.kind,
        mode,
    );
    entry.is_opening = draft.is_opening;
    entry.is_closing = draft.is_closing;
    entry.compensatory_rest_id = compensatory_id;
    entry.note = draft.note.clone();

    let entry = match planner.store_mut().create(entry) {
        Ok(created) => created,
        Err(StoreError::DuplicateKey { employee, date, .. }) => {
            return Err(PlanError::SlotTaken { employee, date });
        }
        Err(other) => return Err(other.into()),
    };

    // 3. abertura de sábado; uma folga no domingo não gera cadeia nenhuma
    if util::triggers_opening(entry.kind, entry.date) {
        create_opening(planner, &entry, mode)?;
    }

    Ok(entry)
}

/// Cria a folga compensatória; chave duplicada vira lookup-and-reuse.
fn ensure_compensatory<S: Store>(
    planner: &mut Planner<S>,
    draft: &EntryDraft,
    comp_date: NaiveDate,
    mode: Mode,
) -> Result<EntryId, PlanError> {
    let mut comp = ScheduleEntry::new(
        draft.employee_id.clone(),
        draft.employee_name.clone(),
        comp_date,
        EntryKind::DayOff,
        mode,
    );
    comp.note = Some(format!("compensatory rest for work on {}", draft.date));

    match planner.store_mut().create(comp) {
        Ok(created) => Ok(created.id),
        Err(StoreError::DuplicateKey { .. }) => {
            let existing = planner
                .store()
                .find_by_key(&draft.employee_id, comp_date, mode)?
                .ok_or_else(|| {
                    StoreError::Other(anyhow::anyhow!(
                        "duplicate reported but no entry found for {} on {comp_date}",
                        draft.employee_id.as_str()
                    ))
                })?;
            Ok(existing.id)
        }
        Err(other) => Err(other.into()),
    }
}

/// Gera a abertura do sábado anterior; chave duplicada é engolida.
fn create_opening<S: Store>(
    planner: &mut Planner<S>,
    main: &ScheduleEntry,
    mode: Mode,
) -> Result<(), PlanError> {
    let saturday = util::preceding_saturday(main.date);
    let mut opening = ScheduleEntry::new(
        main.employee_id.clone(),
        main.employee_name.clone(),
        saturday,
        EntryKind::Work,
        mode,
    );
    opening.is_opening = true;
    opening.note = Some(format!(
        "auto-generated: opening shift for Sunday worked on {}",
        main.date
    ));

    match planner.store_mut().create(opening) {
        Ok(_) => Ok(()),
        // o sábado já tem lançamento: considera satisfeito
        Err(StoreError::DuplicateKey { .. }) => Ok(()),
        Err(other) => Err(other.into()),
    }
}
