use crate::model::{EmployeeId, EntryId, EntryKind, Mode, ScheduleEntry};
use crate::scheduler::Conflict;
use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Janela de consulta: um mês de um ano.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub month: u32,
    pub year: i32,
}

impl Scope {
    pub fn new(month: u32, year: i32) -> anyhow::Result<Self> {
        if !(1..=12).contains(&month) {
            anyhow::bail!("invalid month: {month}");
        }
        Ok(Self { month, year })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    pub fn first_day(&self) -> NaiveDate {
        // month já validado em `new`
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Alteração parcial de um lançamento existente.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub kind: Option<EntryKind>,
    #[serde(default)]
    pub is_opening: Option<bool>,
    #[serde(default)]
    pub is_closing: Option<bool>,
    /// `Some(None)` limpa a referência.
    #[serde(default)]
    pub compensatory_rest_id: Option<Option<EntryId>>,
    #[serde(default)]
    pub note: Option<Option<String>>,
}

/// Evento de mudança emitido para assinantes opcionais.
#[derive(Debug, Clone)]
pub enum Change {
    Created(ScheduleEntry),
    Updated(ScheduleEntry),
    Deleted(EntryId),
    Applied { count: usize },
    Discarded { count: usize },
}

pub type ChangeListener = Box<dyn Fn(&Change) + Send>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Violação da chave (employee_id, date, mode).
    #[error("entry already exists for employee {} on {} ({})", .employee.as_str(), .date, .mode.as_str())]
    DuplicateKey {
        employee: EmployeeId,
        date: NaiveDate,
        mode: Mode,
    },
    #[error("unknown entry: {}", .0.as_str())]
    NotFound(EntryId),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Contrato de persistência consumido pelo motor de regras.
///
/// Toda operação resolve ou falha uma única vez; sem retry nem timeout.
pub trait Store {
    fn list_entries(&self, scope: Scope, mode: Mode) -> Result<Vec<ScheduleEntry>, StoreError>;
    /// Falha com `DuplicateKey` quando (employee_id, date, mode) já existe.
    fn create(&mut self, entry: ScheduleEntry) -> Result<ScheduleEntry, StoreError>;
    fn update(&mut self, id: &EntryId, patch: EntryPatch) -> Result<ScheduleEntry, StoreError>;
    fn delete(&mut self, id: &EntryId) -> Result<(), StoreError>;
    fn find_by_key(
        &self,
        employee: &EmployeeId,
        date: NaiveDate,
        mode: Mode,
    ) -> Result<Option<ScheduleEntry>, StoreError>;
    /// Conjunto de conflitos calculado do lado do armazenamento.
    fn conflicts(
        &self,
        employee: &EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
        mode: Mode,
    ) -> Result<Vec<Conflict>, StoreError>;
    /// Promove cada lançamento de teste do escopo para produção
    /// (sobrescrevendo a contraparte existente) e apaga a origem.
    fn apply_test_entries(&mut self, scope: Scope) -> Result<usize, StoreError>;
    /// Apaga todos os lançamentos de teste do escopo.
    fn discard_test_entries(&mut self, scope: Scope) -> Result<usize, StoreError>;
    /// Capacidade opcional: retorna `false` quando não há push; o chamador
    /// deve então recarregar por polling.
    fn subscribe(&mut self, listener: ChangeListener) -> bool {
        let _ = listener;
        false
    }
}

/// Documento serializado em disco.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    /// Flag do modo de teste, persistida junto com os lançamentos.
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub entries: Vec<ScheduleEntry>,
}

/// Store em memória; também serve de base para o `JsonStore`.
#[derive(Default)]
pub struct MemStore {
    sheet: Sheet,
    listeners: Vec<ChangeListener>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sheet(sheet: Sheet) -> Self {
        Self {
            sheet,
            listeners: Vec::new(),
        }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn staging_active(&self) -> bool {
        self.sheet.test_mode
    }

    pub fn set_staging_active(&mut self, on: bool) {
        self.sheet.test_mode = on;
    }

    fn emit(&self, change: Change) {
        for listener in &self.listeners {
            listener(&change);
        }
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.sheet.entries.iter().position(|e| &e.id == id)
    }

    fn key_taken(&self, employee: &EmployeeId, date: NaiveDate, mode: Mode) -> bool {
        self.sheet
            .entries
            .iter()
            .any(|e| &e.employee_id == employee && e.date == date && e.mode == mode)
    }
}

impl Store for MemStore {
    fn list_entries(&self, scope: Scope, mode: Mode) -> Result<Vec<ScheduleEntry>, StoreError> {
        let mut out: Vec<ScheduleEntry> = self
            .sheet
            .entries
            .iter()
            .filter(|e| e.mode == mode && scope.contains(e.date))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            (a.date, a.employee_id.as_str()).cmp(&(b.date, b.employee_id.as_str()))
        });
        Ok(out)
    }

    fn create(&mut self, entry: ScheduleEntry) -> Result<ScheduleEntry, StoreError> {
        if self.key_taken(&entry.employee_id, entry.date, entry.mode) {
            return Err(StoreError::DuplicateKey {
                employee: entry.employee_id.clone(),
                date: entry.date,
                mode: entry.mode,
            });
        }
        self.sheet.entries.push(entry.clone());
        self.emit(Change::Created(entry.clone()));
        Ok(entry)
    }

    fn update(&mut self, id: &EntryId, patch: EntryPatch) -> Result<ScheduleEntry, StoreError> {
        let pos = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        // recalcula a chave antes de gravar, caso a data mude
        if let Some(new_date) = patch.date {
            let current = &self.sheet.entries[pos];
            if new_date != current.date
                && self.key_taken(&current.employee_id, new_date, current.mode)
            {
                return Err(StoreError::DuplicateKey {
                    employee: current.employee_id.clone(),
                    date: new_date,
                    mode: current.mode,
                });
            }
        }

        let entry = &mut self.sheet.entries[pos];
        if let Some(date) = patch.date {
            entry.date = date;
        }
        if let Some(kind) = patch.kind {
            entry.kind = kind;
        }
        if let Some(flag) = patch.is_opening {
            entry.is_opening = flag;
        }
        if let Some(flag) = patch.is_closing {
            entry.is_closing = flag;
        }
        if let Some(reference) = patch.compensatory_rest_id {
            entry.compensatory_rest_id = reference;
        }
        if let Some(note) = patch.note {
            entry.note = note;
        }
        entry.updated_at = Utc::now();
        let updated = entry.clone();
        self.emit(Change::Updated(updated.clone()));
        Ok(updated)
    }

    fn delete(&mut self, id: &EntryId) -> Result<(), StoreError> {
        let pos = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.sheet.entries.remove(pos);
        self.emit(Change::Deleted(id.clone()));
        Ok(())
    }

    fn find_by_key(
        &self,
        employee: &EmployeeId,
        date: NaiveDate,
        mode: Mode,
    ) -> Result<Option<ScheduleEntry>, StoreError> {
        Ok(self
            .sheet
            .entries
            .iter()
            .find(|e| &e.employee_id == employee && e.date == date && e.mode == mode)
            .cloned())
    }

    fn conflicts(
        &self,
        employee: &EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
        mode: Mode,
    ) -> Result<Vec<Conflict>, StoreError> {
        // versão do lado do armazenamento: só a regra de compensação,
        // independente do scan local do detector
        let out = self
            .sheet
            .entries
            .iter()
            .filter(|e| {
                &e.employee_id == employee
                    && e.mode == mode
                    && e.date >= start
                    && e.date <= end
                    && e.kind.requires_compensation()
                    && e.compensatory_rest_id.is_none()
            })
            .map(|e| Conflict::missing_compensation(&e.employee_id, e.date))
            .collect();
        Ok(out)
    }

    fn apply_test_entries(&mut self, scope: Scope) -> Result<usize, StoreError> {
        let staged: Vec<ScheduleEntry> = self
            .sheet
            .entries
            .iter()
            .filter(|e| e.mode == Mode::Test && scope.contains(e.date))
            .cloned()
            .collect();

        for entry in &staged {
            let existing = self
                .sheet
                .entries
                .iter()
                .position(|e| {
                    e.mode == Mode::Production
                        && e.employee_id == entry.employee_id
                        && e.date == entry.date
                });
            match existing {
                // sobrescreve a contraparte mantendo id e created_at dela
                Some(pos) => {
                    let target = &mut self.sheet.entries[pos];
                    target.employee_name = entry.employee_name.clone();
                    target.kind = entry.kind;
                    target.is_opening = entry.is_opening;
                    target.is_closing = entry.is_closing;
                    target.compensatory_rest_id = entry.compensatory_rest_id.clone();
                    target.note = entry.note.clone();
                    target.updated_at = Utc::now();
                }
                // reaproveita o id da origem para não pendurar referências
                None => {
                    let mut promoted = entry.clone();
                    promoted.mode = Mode::Production;
                    promoted.updated_at = Utc::now();
                    self.sheet.entries.push(promoted);
                }
            }
            let source = self
                .position(&entry.id)
                .ok_or_else(|| StoreError::NotFound(entry.id.clone()))?;
            self.sheet.entries.remove(source);
        }

        let count = staged.len();
        self.emit(Change::Applied { count });
        Ok(count)
    }

    fn discard_test_entries(&mut self, scope: Scope) -> Result<usize, StoreError> {
        let before = self.sheet.entries.len();
        self.sheet
            .entries
            .retain(|e| !(e.mode == Mode::Test && scope.contains(e.date)));
        let count = before - self.sheet.entries.len();
        self.emit(Change::Discarded { count });
        Ok(count)
    }

    fn subscribe(&mut self, listener: ChangeListener) -> bool {
        self.listeners.push(listener);
        true
    }
}

/// Store com persistência em arquivo JSON, gravação atômica.
pub struct JsonStore {
    path: PathBuf,
    mem: MemStore,
}

impl JsonStore {
    /// Abre um arquivo de escala; arquivo ausente vira planilha vazia.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let sheet = if path.exists() {
            let data =
                fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice(&data)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            Sheet::default()
        };
        Ok(Self {
            path,
            mem: MemStore::from_sheet(sheet),
        })
    }

    pub fn sheet(&self) -> &Sheet {
        self.mem.sheet()
    }

    pub fn staging_active(&self) -> bool {
        self.mem.staging_active()
    }

    pub fn set_staging_active(&mut self, on: bool) -> Result<(), StoreError> {
        self.mem.set_staging_active(on);
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(self.mem.sheet()).map_err(anyhow::Error::from)?;
        let mut tmp = NamedTempFile::new_in(self.path.parent().unwrap_or_else(|| Path::new(".")))
            .context("creating temp file")?;
        tmp.write_all(&json).map_err(anyhow::Error::from)?;
        tmp.flush().map_err(anyhow::Error::from)?;
        tmp.as_file().sync_all().map_err(anyhow::Error::from)?;
        tmp.persist(&self.path)
            .map_err(|e| anyhow::Error::from(e).context("atomic rename"))?;
        Ok(())
    }
}

impl Store for JsonStore {
    fn list_entries(&self, scope: Scope, mode: Mode) -> Result<Vec<ScheduleEntry>, StoreError> {
        self.mem.list_entries(scope, mode)
    }

    fn create(&mut self, entry: ScheduleEntry) -> Result<ScheduleEntry, StoreError> {
        let created = self.mem.create(entry)?;
        self.persist()?;
        Ok(created)
    }

    fn update(&mut self, id: &EntryId, patch: EntryPatch) -> Result<ScheduleEntry, StoreError> {
        let updated = self.mem.update(id, patch)?;
        self.persist()?;
        Ok(updated)
    }

    fn delete(&mut self, id: &EntryId) -> Result<(), StoreError> {
        self.mem.delete(id)?;
        self.persist()
    }

    fn find_by_key(
        &self,
        employee: &EmployeeId,
        date: NaiveDate,
        mode: Mode,
    ) -> Result<Option<ScheduleEntry>, StoreError> {
        self.mem.find_by_key(employee, date, mode)
    }

    fn conflicts(
        &self,
        employee: &EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
        mode: Mode,
    ) -> Result<Vec<Conflict>, StoreError> {
        self.mem.conflicts(employee, start, end, mode)
    }

    fn apply_test_entries(&mut self, scope: Scope) -> Result<usize, StoreError> {
        let count = self.mem.apply_test_entries(scope)?;
        self.persist()?;
        Ok(count)
    }

    fn discard_test_entries(&mut self, scope: Scope) -> Result<usize, StoreError> {
        let count = self.mem.discard_test_entries(scope)?;
        self.persist()?;
        Ok(count)
    }

    fn subscribe(&mut self, listener: ChangeListener) -> bool {
        self.mem.subscribe(listener)
    }
}
