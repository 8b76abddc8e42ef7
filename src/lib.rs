#![forbid(unsafe_code)]
//! Escala — biblioteca de escalas de trabalho locais (sem BD).
//!
//! - Armazenamento em arquivo (JSON/CSV).
//! - Regras de folga: sexta-feira proibida, compensação de domingo/feriado.
//! - Cadeia automática: folga compensatória + abertura de sábado.
//! - Modo de teste com apply/discard em bloco.
//! - Datas em dia de calendário (`NaiveDate`); timestamps em UTC.

pub mod calendar;
pub mod io;
pub mod model;
pub mod notification;
pub mod scheduler;
pub mod storage;

pub use calendar::{Holiday, HolidayRegistry, HolidaySet};
pub use model::{
    Employee, EmployeeDirectory, EmployeeId, EntryDraft, EntryId, EntryKind, Mode, Role,
    ScheduleEntry, Staff,
};
pub use notification::{prepare_report, NoticeRenderer, Report, TextNotice};
pub use scheduler::{scan, validate, Conflict, PlanError, Planner, Severity, TestMode, Validation};
pub use storage::{
    Change, ChangeListener, EntryPatch, JsonStore, MemStore, Scope, Sheet, Store, StoreError,
};
