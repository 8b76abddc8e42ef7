#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use escala::{
    calendar::HolidaySet,
    io,
    model::{EmployeeDirectory, EmployeeId, EntryDraft, EntryId, EntryKind, Mode, Staff},
    notification::{apply_warning, discard_warning, prepare_report, TextNotice},
    scheduler::Planner,
    storage::{EntryPatch, JsonStore, Scope, Store},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimalista de escala (sem banco de dados)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Ativa os logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Arquivo JSON da escala
    #[arg(long, global = true, default_value = "escala.json")]
    sheet: String,

    /// Arquivo JSON de feriados (opcional)
    #[arg(long, global = true)]
    holidays: Option<String>,

    /// Mês do escopo (1-12; padrão: mês corrente)
    #[arg(long, global = true)]
    month: Option<u32>,

    /// Ano do escopo (padrão: ano corrente)
    #[arg(long, global = true)]
    year: Option<i32>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validar um candidato sem gravar nada
    Validate {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        name: String,
        /// AAAA-MM-DD
        #[arg(long)]
        date: String,
        /// work | dayoff | sunday_worked | holiday_worked
        #[arg(long)]
        kind: String,
        /// Data da folga compensatória (AAAA-MM-DD)
        #[arg(long)]
        comp: Option<String>,
        #[arg(long)]
        opening: bool,
        #[arg(long)]
        closing: bool,
    },

    /// Submeter um lançamento (com a cadeia derivada)
    Submit {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        name: String,
        /// AAAA-MM-DD
        #[arg(long)]
        date: String,
        /// work | dayoff | sunday_worked | holiday_worked
        #[arg(long)]
        kind: String,
        /// Data da folga compensatória (AAAA-MM-DD)
        #[arg(long)]
        comp: Option<String>,
        #[arg(long)]
        opening: bool,
        #[arg(long)]
        closing: bool,
        #[arg(long)]
        note: Option<String>,
    },

    /// Editar um lançamento existente
    Edit {
        #[arg(long)]
        id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        opening: Option<bool>,
        #[arg(long)]
        closing: Option<bool>,
        #[arg(long)]
        note: Option<String>,
        /// Limpa a referência de compensação
        #[arg(long)]
        clear_comp: bool,
    },

    /// Remover um lançamento
    Remove {
        #[arg(long)]
        id: String,
    },

    /// Listar o escopo corrente e opcionalmente exportar
    List {
        /// test | production (padrão: modo corrente)
        #[arg(long)]
        mode: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Revarrer conflitos no escopo corrente
    Check {
        /// Export CSV dos conflitos (opcional)
        #[arg(long)]
        report: Option<String>,
    },

    /// Ligar ou desligar o modo de teste
    Test {
        /// on | off
        state: String,
    },

    /// Promover todos os lançamentos de teste do escopo para produção
    Apply {
        /// Confirma a sobrescrita (segunda etapa)
        #[arg(long)]
        yes: bool,
    },

    /// Descartar todos os lançamentos de teste do escopo
    Discard {
        /// Confirma o descarte (segunda etapa)
        #[arg(long)]
        yes: bool,
    },

    /// Listar os funcionários escaláveis de um CSV
    Staff {
        #[arg(long)]
        csv: String,
    },
}

fn parse_kind(raw: &str) -> Result<EntryKind> {
    Ok(match raw {
        "work" => EntryKind::Work,
        "dayoff" => EntryKind::DayOff,
        "sunday_worked" => EntryKind::SundayWorked,
        "holiday_worked" => EntryKind::HolidayWorked,
        other => bail!("unknown entry kind: {other}"),
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date {raw}: {e}"))
}

fn build_draft(
    employee: String,
    name: String,
    date: &str,
    kind: &str,
    comp: Option<String>,
    opening: bool,
    closing: bool,
    note: Option<String>,
) -> Result<EntryDraft> {
    let mut draft = EntryDraft::new(
        EmployeeId::new(employee),
        name,
        parse_date(date)?,
        parse_kind(kind)?,
    );
    if let Some(comp) = comp {
        draft.compensatory_date = Some(parse_date(&comp)?);
    }
    draft.is_opening = opening;
    draft.is_closing = closing;
    draft.note = note;
    Ok(draft)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let now = Utc::now().date_naive();
    let scope = Scope::new(
        cli.month.unwrap_or_else(|| now.month()),
        cli.year.unwrap_or_else(|| now.year()),
    )?;

    let store = JsonStore::open(&cli.sheet)?;
    let staging = store.staging_active();
    let mut planner = Planner::resume(store, scope, staging);

    if let Some(path) = &cli.holidays {
        let set = HolidaySet::load_from_file(path)?;
        planner.load_holidays(&set)?;
    }

    let code = match cli.cmd {
        Commands::Validate {
            employee,
            name,
            date,
            kind,
            comp,
            opening,
            closing,
        } => {
            let draft = build_draft(employee, name, &date, &kind, comp, opening, closing, None)?;
            let report = planner.validate_draft(&draft)?;
            for msg in &report.errors {
                println!("ERROR: {msg}");
            }
            for msg in &report.warnings {
                println!("WARNING: {msg}");
            }
            for msg in &report.infos {
                println!("INFO: {msg}");
            }
            if report.is_ok() {
                println!("OK: candidate accepted");
                0
            } else {
                2
            }
        }
        Commands::Submit {
            employee,
            name,
            date,
            kind,
            comp,
            opening,
            closing,
            note,
        } => {
            let draft = build_draft(employee, name, &date, &kind, comp, opening, closing, note)?;
            let entry = planner.submit(draft)?;
            println!(
                "Created {} | {} | {} | {}",
                entry.id.as_str(),
                entry.date,
                entry.kind.as_str(),
                entry.mode.as_str()
            );
            0
        }
        Commands::Edit {
            id,
            date,
            kind,
            opening,
            closing,
            note,
            clear_comp,
        } => {
            let patch = EntryPatch {
                date: date.as_deref().map(parse_date).transpose()?,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                is_opening: opening,
                is_closing: closing,
                compensatory_rest_id: if clear_comp { Some(None) } else { None },
                note: note.map(Some),
            };
            let entry = planner.store_mut().update(&EntryId::new(id), patch)?;
            println!("Updated {} | {}", entry.id.as_str(), entry.date);
            0
        }
        Commands::Remove { id } => {
            planner.store_mut().delete(&EntryId::new(id))?;
            println!("Removed");
            0
        }
        Commands::List {
            mode,
            out_json,
            out_csv,
        } => {
            let mode = match mode.as_deref() {
                Some("test") => Mode::Test,
                Some("production") => Mode::Production,
                Some(other) => bail!("unknown mode: {other}"),
                None => planner.mode(),
            };
            let entries = planner.store().list_entries(scope, mode)?;
            if let Some(path) = out_json {
                io::export_entries_json(path, &entries)?;
            }
            if let Some(path) = out_csv {
                io::export_entries_csv(path, &entries)?;
            }
            // impressão compacta
            for e in &entries {
                println!(
                    "{} | {} | {} | {}{}{}",
                    e.id.as_str(),
                    e.date,
                    e.employee_name,
                    e.kind.as_str(),
                    if e.is_opening { " [opening]" } else { "" },
                    if e.is_closing { " [closing]" } else { "" },
                );
            }
            0
        }
        Commands::Check { report } => {
            let (start, end) = (scope.first_day(), scope.last_day());
            let conflicts = planner.scan_conflicts(start, end)?;
            let notice = prepare_report(&conflicts, start, end, &TextNotice);
            print!("{}", notice.content);
            if let Some(path) = report {
                io::export_conflicts_csv(path, &conflicts)?;
            }
            if conflicts.is_empty() {
                0
            } else {
                // código 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Test { state } => {
            let on = match state.as_str() {
                "on" => true,
                "off" => false,
                other => bail!("expected on|off, got {other}"),
            };
            planner.toggle_test_mode(on)?;
            let active = planner.is_test_active();
            planner.store_mut().set_staging_active(active)?;
            println!("test mode: {}", if active { "on" } else { "off" });
            0
        }
        Commands::Apply { yes } => {
            let staged = planner.store().list_entries(scope, Mode::Test)?.len();
            if !yes {
                println!("{}", apply_warning(scope, staged));
                1
            } else {
                let count = planner.apply_test()?;
                let active = planner.is_test_active();
                planner.store_mut().set_staging_active(active)?;
                println!("Applied {count} entries to production");
                0
            }
        }
        Commands::Discard { yes } => {
            let staged = planner.store().list_entries(scope, Mode::Test)?.len();
            if !yes {
                println!("{}", discard_warning(scope, staged));
                1
            } else {
                let count = planner.discard_test()?;
                let active = planner.is_test_active();
                planner.store_mut().set_staging_active(active)?;
                println!("Discarded {count} test entries");
                0
            }
        }
        Commands::Staff { csv } => {
            let staff = Staff::new(io::import_employees_csv(csv)?);
            for employee in staff.list_schedulable() {
                println!(
                    "{} | {} | {}",
                    employee.id.as_str(),
                    employee.display_name,
                    employee.role.as_str()
                );
            }
            0
        }
    };

    std::process::exit(code);
}
