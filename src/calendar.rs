use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Feriado do calendário. Somente leitura para o motor de regras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    /// `true` quando a loja abre normalmente nesse feriado.
    #[serde(default)]
    pub worked_by_default: bool,
}

/// Fonte de feriados consultada pelo Planner.
pub trait HolidayRegistry {
    fn list_for_year(&self, year: i32) -> Result<Vec<Holiday>>;
}

/// Conjunto de feriados carregado de um arquivo JSON local.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidaySet {
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

impl HolidaySet {
    pub fn new(holidays: Vec<Holiday>) -> Self {
        Self { holidays }
    }

    /// Carrega e valida um arquivo `holidays.json`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data =
            fs::read(path).with_context(|| format!("reading holidays {}", path.display()))?;
        let set: HolidaySet = serde_json::from_slice(&data)
            .with_context(|| format!("parsing holidays {}", path.display()))?;
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<()> {
        for (i, a) in self.holidays.iter().enumerate() {
            if a.name.trim().is_empty() {
                bail!("holiday {} has an empty name", a.date);
            }
            for b in self.holidays.iter().skip(i + 1) {
                if a.date == b.date {
                    bail!("duplicate holiday date: {}", a.date);
                }
            }
        }
        Ok(())
    }

    pub fn holiday_on(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.date == date)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_on(date).is_some()
    }
}

impl HolidayRegistry for HolidaySet {
    fn list_for_year(&self, year: i32) -> Result<Vec<Holiday>> {
        Ok(self
            .holidays
            .iter()
            .filter(|h| h.date.year() == year)
            .cloned()
            .collect())
    }
}

pub fn export_holidays_json<P: AsRef<Path>>(path: P, set: &HolidaySet) -> Result<()> {
    set.validate()?;
    let json = serde_json::to_string_pretty(set)?;
    fs::write(path, json)?;
    Ok(())
}
