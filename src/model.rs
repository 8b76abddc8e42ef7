use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identificador forte para Employee
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identificador forte para ScheduleEntry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Tipo do lançamento na escala.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Dia normal de trabalho.
    Work,
    /// Folga.
    DayOff,
    /// Domingo trabalhado (exige folga compensatória).
    SundayWorked,
    /// Feriado trabalhado (exige folga compensatória).
    HolidayWorked,
}

impl EntryKind {
    /// Tipos que exigem uma folga compensatória vinculada.
    pub fn requires_compensation(self) -> bool {
        matches!(self, Self::SundayWorked | Self::HolidayWorked)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::DayOff => "dayoff",
            Self::SundayWorked => "sunday_worked",
            Self::HolidayWorked => "holiday_worked",
        }
    }
}

/// Modo de gravação: rascunho (teste) ou definitivo (produção).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Test,
    Production,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Um lançamento de escala: um funcionário, um dia de calendário.
///
/// Unicidade garantida pelo Store sobre (employee_id, date, mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub employee_id: EmployeeId,
    /// Nome desnormalizado para exibição.
    pub employee_name: String,
    pub date: NaiveDate,
    pub kind: EntryKind,
    #[serde(default)]
    pub is_opening: bool,
    #[serde(default)]
    pub is_closing: bool,
    /// Referência à folga compensatória (quando kind exige).
    #[serde(default)]
    pub compensatory_rest_id: Option<EntryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub mode: Mode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduleEntry {
    pub fn new(
        employee_id: EmployeeId,
        employee_name: impl Into<String>,
        date: NaiveDate,
        kind: EntryKind,
        mode: Mode,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::random(),
            employee_id,
            employee_name: employee_name.into(),
            date,
            kind,
            is_opening: false,
            is_closing: false,
            compensatory_rest_id: None,
            note: None,
            mode,
            created_at: now,
            updated_at: now,
        }
    }

    /// Chave de unicidade do lançamento.
    pub fn key(&self) -> (&EmployeeId, NaiveDate, Mode) {
        (&self.employee_id, self.date, self.mode)
    }
}

/// Candidato a lançamento, ainda não persistido.
///
/// Não carrega `mode`: o Planner carimba o modo corrente na submissão.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub date: NaiveDate,
    pub kind: EntryKind,
    #[serde(default)]
    pub is_opening: bool,
    #[serde(default)]
    pub is_closing: bool,
    /// Data da folga compensatória, obrigatória para domingo/feriado trabalhado.
    #[serde(default)]
    pub compensatory_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl EntryDraft {
    pub fn new(
        employee_id: EmployeeId,
        employee_name: impl Into<String>,
        date: NaiveDate,
        kind: EntryKind,
    ) -> Self {
        Self {
            employee_id,
            employee_name: employee_name.into(),
            date,
            kind,
            is_opening: false,
            is_closing: false,
            compensatory_date: None,
            note: None,
        }
    }

    pub fn with_compensatory_date(mut self, date: NaiveDate) -> Self {
        self.compensatory_date = Some(date);
        self
    }
}

/// Função do funcionário (para extensões pós-MVP)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Salesperson,
    Cashier,
    Manager,
    Custom(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "salesperson" | "vendedor" | "vendedora" => Self::Salesperson,
            "cashier" | "caixa" => Self::Cashier,
            "manager" | "gerente" => Self::Manager,
            _ => Self::Custom(raw.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Salesperson => "salesperson",
            Self::Cashier => "cashier",
            Self::Manager => "manager",
            Self::Custom(s) => s.as_str(),
        }
    }
}

/// Funcionário elegível (ou não) para a escala.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub display_name: String,
    pub role: Role,
    #[serde(default = "default_schedulable")]
    pub schedulable: bool,
}

fn default_schedulable() -> bool {
    true
}

impl Employee {
    pub fn new<D: Into<String>>(display_name: D, role: Role) -> Self {
        Self {
            id: EmployeeId::random(),
            display_name: display_name.into(),
            role,
            schedulable: true,
        }
    }
}

/// Diretório de funcionários: só expõe quem pode entrar na escala.
pub trait EmployeeDirectory {
    fn list_schedulable(&self) -> Vec<Employee>;
}

/// Diretório simples em memória (carregado de CSV via `io`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Staff {
    pub employees: Vec<Employee>,
}

impl Staff {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    pub fn find_by_name<'a>(&'a self, name: &str) -> Option<&'a Employee> {
        self.employees.iter().find(|e| e.display_name == name)
    }

    pub fn find_by_id<'a>(&'a self, id: &EmployeeId) -> Option<&'a Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }
}

impl EmployeeDirectory for Staff {
    fn list_schedulable(&self) -> Vec<Employee> {
        self.employees
            .iter()
            .filter(|e| e.schedulable)
            .cloned()
            .collect()
    }
}
