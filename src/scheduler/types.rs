use crate::model::EmployeeId;
use crate::storage::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gravidade de um conflito detectado após a gravação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// Violação de regra encontrada no estado já persistido.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub severity: Severity,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub message: String,
}

impl Conflict {
    /// Chave de deduplicação entre o scan local e o conjunto do Store.
    pub fn key(&self) -> (String, NaiveDate, String) {
        (
            self.employee_id.as_str().to_owned(),
            self.date,
            self.message.clone(),
        )
    }

    pub fn friday_day_off(employee: &EmployeeId, date: NaiveDate) -> Self {
        Self {
            severity: Severity::Error,
            employee_id: employee.clone(),
            date,
            message: format!("day-off on Friday {date} is not allowed"),
        }
    }

    pub fn missing_compensation(employee: &EmployeeId, date: NaiveDate) -> Self {
        Self {
            severity: Severity::Error,
            employee_id: employee.clone(),
            date,
            message: format!("work on {date} has no compensatory rest linked"),
        }
    }

    pub fn missing_opening(employee: &EmployeeId, date: NaiveDate, saturday: NaiveDate) -> Self {
        Self {
            severity: Severity::Warning,
            employee_id: employee.clone(),
            date,
            message: format!("no opening shift on Saturday {saturday} before Sunday {date}"),
        }
    }
}

/// Resultado da validação de um candidato: tudo que se aplica, não só o
/// primeiro problema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
}

impl Validation {
    /// `true` quando a submissão pode prosseguir.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub(crate) fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub(crate) fn info(&mut self, message: impl Into<String>) {
        self.infos.push(message.into());
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    /// Candidato recusado pelo validador; nada chega ao Store.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    /// Chave duplicada no lançamento principal, exposta ao usuário.
    #[error("employee {} already has an entry on {}", .employee.as_str(), .date)]
    SlotTaken {
        employee: EmployeeId,
        date: NaiveDate,
    },
    /// Recusa da desativação do modo de teste com lançamentos pendentes.
    #[error("test mode still holds {0} staged entries; apply or discard first")]
    TestEntriesPending(usize),
    #[error("test mode is not active")]
    TestModeInactive,
    #[error(transparent)]
    Store(#[from] StoreError),
}
