mod cascade;
mod conflicts;
mod testmode;
mod types;
mod util;
mod validate;

pub use conflicts::scan;
pub use testmode::TestMode;
pub use types::{Conflict, PlanError, Severity, Validation};
pub use validate::validate;

use crate::calendar::{Holiday, HolidayRegistry};
use crate::model::{EntryDraft, Mode, ScheduleEntry};
use crate::storage::{Scope, Store};
use chrono::{Datelike, NaiveDate};

/// Planner: fachada do motor de regras sobre um Store.
///
/// Carrega o modo corrente (teste/produção) e o escopo mês/ano; todo acesso
/// ao Store passa o modo explicitamente, sem estado global.
pub struct Planner<S: Store> {
    store: S,
    scope: Scope,
    holidays: Vec<Holiday>,
    test_mode: TestMode,
}

impl<S: Store> Planner<S> {
    pub fn new(store: S, scope: Scope) -> Self {
        Self {
            store,
            scope,
            holidays: Vec::new(),
            test_mode: TestMode::Off,
        }
    }

    /// Retoma uma sessão com o estado do modo de teste vindo da persistência.
    pub fn resume(store: S, scope: Scope, test_active: bool) -> Self {
        let mut planner = Self::new(store, scope);
        if test_active {
            planner.test_mode = TestMode::Active;
        }
        planner
    }

    pub fn store(&self) -> &S {
        &self.store
    }
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }
    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }
    pub fn set_holidays(&mut self, holidays: Vec<Holiday>) {
        self.holidays = holidays;
    }

    /// Carrega os feriados do ano do escopo a partir de um registro.
    pub fn load_holidays(&mut self, registry: &dyn HolidayRegistry) -> anyhow::Result<()> {
        self.holidays = registry.list_for_year(self.scope.year)?;
        Ok(())
    }

    pub fn is_test_active(&self) -> bool {
        self.test_mode == TestMode::Active
    }

    /// Modo carimbado em toda gravação corrente.
    pub fn mode(&self) -> Mode {
        match self.test_mode {
            TestMode::Active => Mode::Test,
            TestMode::Off => Mode::Production,
        }
    }

    /// Valida um candidato contra os lançamentos existentes do funcionário.
    pub fn validate_draft(&self, draft: &EntryDraft) -> Result<Validation, PlanError> {
        let mode = self.mode();
        let scope = Scope {
            month: draft.date.month(),
            year: draft.date.year(),
        };
        let mut existing: Vec<ScheduleEntry> = self.store.list_entries(scope, mode)?;

        // o sábado anterior a um domingo no dia 1º mora no mês passado
        let saturday = util::preceding_saturday(draft.date);
        if (saturday.year(), saturday.month()) != (draft.date.year(), draft.date.month()) {
            let prior = Scope {
                month: saturday.month(),
                year: saturday.year(),
            };
            existing.extend(self.store.list_entries(prior, mode)?);
        }

        existing.retain(|e| e.employee_id == draft.employee_id);
        Ok(validate::validate(draft, &existing, &self.holidays))
    }

    /// Valida e grava o candidato com a cadeia derivada.
    pub fn submit(&mut self, draft: EntryDraft) -> Result<ScheduleEntry, PlanError> {
        cascade::submit(self, draft)
    }

    /// Revarre um intervalo persistido e devolve os conflitos, deduplicados
    /// contra o conjunto do Store.
    pub fn scan_conflicts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Conflict>, PlanError> {
        conflicts::scan_with_store(self, start, end)
    }

    pub fn toggle_test_mode(&mut self, on: bool) -> Result<(), PlanError> {
        testmode::toggle(self, on)
    }

    pub fn apply_test(&mut self) -> Result<usize, PlanError> {
        testmode::apply(self)
    }

    pub fn discard_test(&mut self) -> Result<usize, PlanError> {
        testmode::discard(self)
    }

    /// Lançamentos do modo corrente cobrindo todos os meses do intervalo.
    pub fn entries_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduleEntry>, PlanError> {
        let mut out = Vec::new();
        let (mut year, mut month) = (start.year(), start.month());
        while (year, month) <= (end.year(), end.month()) {
            let scope = Scope { month, year };
            out.extend(self.store.list_entries(scope, self.mode())?);
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }
        out.retain(|e| e.date >= start && e.date <= end);
        Ok(out)
    }
}
