use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cuentas_core::{HouseholdId, MemberDirectory, TransactionStore, parse_date};
use cuentas_finance::pipeline::DuplicateKey;
use cuentas_finance::{
    AppState, Period, Selection, TableFilter, canonicalize_batch, dedup, find_duplicates, new_manual,
    recompute,
};
use cuentas_ingest::{ImportOptions, import_file};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod output;
mod remote;
mod state;
mod store;

use config::{Config, load_config};
use output::{format_cop, render_report};

#[derive(Parser, Debug)]
#[command(
    name = "cuentas",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CUENTAS_BUILD_SHA"), ")"),
    about = "Household finance classification and reporting"
)]
struct Cli {
    /// Use the remote store from config.toml instead of the local file
    #[arg(long, global = true)]
    remote: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a bank export (csv, xlsx, json) into the store
    Import {
        file: PathBuf,

        /// Sheet to read from a workbook (default: Consolidado, else the first)
        #[arg(long)]
        sheet: Option<String>,

        /// Owner for rows without a member column
        #[arg(long)]
        owner: Option<String>,

        /// Bank for rows without a bank column
        #[arg(long)]
        bank: Option<String>,

        /// Parse and classify only, do not write
        #[arg(long)]
        dry_run: bool,
    },

    /// Record one transaction by hand
    Add {
        /// Date, e.g. 2026-01-15 or 15/01/2026
        #[arg(long)]
        date: String,

        #[arg(long)]
        amount: f64,

        /// Type text, e.g. Compra, Depósito, Abono
        #[arg(long = "type", default_value = "Compra")]
        type_hint: String,

        #[arg(long)]
        detail: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, default_value = "")]
        owner: String,
    },

    /// KPIs and breakdowns for a period
    Report {
        /// month, 3months, 6months, year, all, or a year such as 2025
        #[arg(long)]
        period: Option<String>,

        /// Member ids to include (repeatable); default everyone
        #[arg(long = "member")]
        members: Vec<String>,

        /// Count credit-card payments as expenses
        #[arg(long)]
        include_card_payments: bool,

        /// Reference date instead of today
        #[arg(long)]
        as_of: Option<String>,

        /// Expense rows to list
        #[arg(long, default_value_t = 10)]
        rows: usize,

        /// Only list expenses of this category
        #[arg(long)]
        category: Option<String>,

        /// Only list expenses matching this text
        #[arg(long, default_value = "")]
        search: String,

        /// Emit the view model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a detail/type pair would be classified
    Classify {
        detail: String,

        #[arg(long = "type", default_value = "")]
        type_hint: String,

        #[arg(long)]
        category: Option<String>,
    },

    /// Correct the category of a stored transaction
    Recategorize { id: String, category: String },

    /// List groups of stored transactions that look like double imports
    Duplicates,

    /// List household members
    Members,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.cuentas/config.toml
    Init,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config()?;

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?),
        },

        Command::Classify { detail, type_hint, category } => {
            let c = cfg.category_rules().classify(&detail, &type_hint, category.as_deref(), None);
            println!("kind={} category={}", c.kind, c.category);
        }

        Command::Members => {
            let members = cfg.list(&cfg.household())?;
            if members.is_empty() {
                println!("No members configured (add [[members]] to config.toml)");
            }
            for m in members {
                println!("{:<10} [{}] {} {}", m.id, m.initials, m.name, m.color);
            }
        }

        Command::Import { file, sheet, owner, bank, dry_run } => {
            let store = open_store(&cfg, cli.remote)?;
            import(&cfg, store.as_ref(), &file, sheet.as_deref(), owner, bank, dry_run)?;
        }

        Command::Add { date, amount, type_hint, detail, category, owner } => {
            let store = open_store(&cfg, cli.remote)?;
            let date = parse_date(&date.as_str().into()).with_context(|| format!("invalid --date {date:?}"))?;
            let household = cfg.household();
            let txn = new_manual(
                &household,
                date,
                amount,
                &type_hint,
                &detail,
                category.as_deref(),
                &owner,
                &cfg.category_rules(),
            )?;
            let saved = store.insert(&household, &[txn])?;
            for t in saved {
                println!(
                    "Added {} {} {} {} [{}]",
                    t.id.as_deref().unwrap_or("-"),
                    t.date,
                    t.kind,
                    format_cop(t.amount),
                    t.category
                );
            }
        }

        Command::Report { period, members, include_card_payments, as_of, rows, category, search, json } => {
            let store = open_store(&cfg, cli.remote)?;
            let period = match period {
                Some(p) => p.parse::<Period>().with_context(|| format!("invalid --period {p:?}"))?,
                None => cfg.period()?,
            };
            let reference = match as_of {
                Some(s) => parse_date(&s.as_str().into()).with_context(|| format!("invalid --as-of {s:?}"))?,
                None => cfg.today()?,
            };

            let mut state = load_state(&cfg, store.as_ref())?;
            state.selection = Selection::new(period).with_members(members);
            state.include_card_payments = include_card_payments || cfg.include_card_payments;

            let mut view = recompute(&state, reference);
            let filter = TableFilter { category, search };
            view.expenses.retain(|t| filter.matches(t));

            if json {
                println!("{}", serde_json::to_string_pretty(&view).context("serialize report")?);
            } else {
                print!("{}", render_report(&view, rows));
            }
        }

        Command::Recategorize { id, category } => {
            let store = open_store(&cfg, cli.remote)?;
            let mut state = load_state(&cfg, store.as_ref())?;
            state.update_category(store.as_ref(), &id, &category)?;
            println!("Transaction {id} → {}", category.trim());
        }

        Command::Duplicates => {
            let store = open_store(&cfg, cli.remote)?;
            let txns = store.fetch(&cfg.household())?;
            let groups = find_duplicates(&txns);
            if groups.is_empty() {
                println!("No duplicates among {} transactions", txns.len());
            }
            for g in &groups {
                let ids: Vec<&str> = g
                    .indices
                    .iter()
                    .map(|&i| txns[i].id.as_deref().unwrap_or("-"))
                    .collect();
                println!(
                    "{} {} {:?} owner={:?} ids={}",
                    g.key.date,
                    format_cop(g.key.cents as f64 / 100.0),
                    g.key.detail,
                    g.key.owner,
                    ids.join(",")
                );
            }
        }
    }

    Ok(())
}

fn open_store(cfg: &Config, remote: bool) -> Result<Box<dyn TransactionStore>> {
    if remote {
        let section = remote::require_remote(cfg.remote.as_ref())?;
        return Ok(Box::new(remote::RemoteStore::from_config(section, cfg.category_rules())?));
    }
    let local = store::JsonFileStore::new(cfg.data_path()?);
    debug!(path = %local.path().display(), "using local store");
    Ok(Box::new(local))
}

fn load_state(cfg: &Config, store: &dyn TransactionStore) -> Result<AppState> {
    let mut state = AppState::new(cfg.household());
    state.load_members(cfg)?;
    state.refresh(store).context("loading transactions")?;
    Ok(state)
}

#[allow(clippy::too_many_arguments)]
fn import(
    cfg: &Config,
    store: &dyn TransactionStore,
    file: &Path,
    sheet: Option<&str>,
    owner: Option<String>,
    bank: Option<String>,
    dry_run: bool,
) -> Result<()> {
    if !file.exists() {
        bail!("file not found: {}", file.display());
    }
    let household: HouseholdId = cfg.household();
    let opts = ImportOptions { default_owner: owner, default_bank: bank };
    let batch = import_file(file, sheet, &opts).with_context(|| format!("importing {}", file.display()))?;
    for r in &batch.rejected {
        println!("row {}: rejected ({:?})", r.row, r.reason);
    }

    let canonical = canonicalize_batch(&batch.records, &household, &cfg.category_rules());
    for r in &canonical.rejected {
        println!("record {}: {}", r.index + 1, r.error);
    }

    let existing: HashSet<DuplicateKey> = store
        .fetch(&household)?
        .iter()
        .map(DuplicateKey::of)
        .collect();
    let parsed = canonical.transactions.len();
    let fresh: Vec<_> = dedup(canonical.transactions)
        .into_iter()
        .filter(|t| !existing.contains(&DuplicateKey::of(t)))
        .collect();

    println!(
        "Parsed {} rows from {} ({} rejected), {} new after removing duplicates",
        parsed,
        file.display(),
        batch.rejected_count() + canonical.rejected.len(),
        fresh.len()
    );

    if dry_run {
        for t in &fresh {
            println!("{}  {:<20} {:<16} {:>14}  {}", t.date, t.kind, t.category, format_cop(t.amount), t.detail);
        }
        return Ok(());
    }

    let saved = store.insert(&household, &fresh)?;
    info!(household = %household, saved = saved.len(), "import stored");
    println!("Stored {} transactions", saved.len());
    Ok(())
}
