use crate::scheduler::{Conflict, Severity};
use crate::storage::Scope;
use chrono::NaiveDate;

/// Relatório de conflitos pronto para exibição.
#[derive(Debug, Clone)]
pub struct Report {
    pub errors: usize,
    pub warnings: usize,
    pub content: String,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Permite customizar o rendering do aviso (texto, e-mail, etc.).
pub trait NoticeRenderer {
    fn render(&self, conflicts: &[Conflict], start: NaiveDate, end: NaiveDate) -> String;
}

/// Gabarito texto simples, uma linha por conflito.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNotice;

impl NoticeRenderer for TextNotice {
    fn render(&self, conflicts: &[Conflict], start: NaiveDate, end: NaiveDate) -> String {
        if conflicts.is_empty() {
            return format!("Schedule check {start} to {end}: no conflicts.\n");
        }
        let mut out = format!("Schedule check {start} to {end}:\n");
        for c in conflicts {
            out.push_str(&format!(
                "  [{}] {} {}: {}\n",
                c.severity.as_str().to_uppercase(),
                c.date,
                c.employee_id.as_str(),
                c.message
            ));
        }
        out
    }
}

/// Monta o relatório de um scan, particionado em erros e avisos.
pub fn prepare_report(
    conflicts: &[Conflict],
    start: NaiveDate,
    end: NaiveDate,
    renderer: &dyn NoticeRenderer,
) -> Report {
    let errors = conflicts
        .iter()
        .filter(|c| c.severity == Severity::Error)
        .count();
    let warnings = conflicts
        .iter()
        .filter(|c| c.severity == Severity::Warning)
        .count();
    Report {
        errors,
        warnings,
        content: renderer.render(conflicts, start, end),
    }
}

/// Texto da primeira etapa da confirmação de `apply`.
pub fn apply_warning(scope: Scope, staged: usize) -> String {
    format!(
        "About to apply {staged} test entr{suffix} for {scope}.\n\
         Existing production entries sharing (employee, date) WILL be overwritten.\n\
         Re-run with --yes to confirm.",
        suffix = if staged == 1 { "y" } else { "ies" },
    )
}

/// Texto da primeira etapa da confirmação de `discard`.
pub fn discard_warning(scope: Scope, staged: usize) -> String {
    format!(
        "About to discard {staged} test entr{suffix} for {scope}. This cannot be undone.\n\
         Re-run with --yes to confirm.",
        suffix = if staged == 1 { "y" } else { "ies" },
    )
}
