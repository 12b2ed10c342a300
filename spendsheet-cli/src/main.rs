use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use spendsheet_core::time::start_of_day;
use spendsheet_ingest::normalize_date;
use spendsheet_sync::{
    ExpenseStore, HttpSheetSource, LoadState, RefreshOutcome, SheetSource, StaticSheetSource,
};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod output;
mod state;

#[derive(Parser, Debug)]
#[command(name = "spendsheet", version, about = "Expense views over a published spreadsheet")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Total spend and row count for the filtered view
    Summary(ViewArgs),

    /// Spend per day for the filtered view
    Daily(ViewArgs),

    /// Rows of the filtered view
    List {
        #[command(flatten)]
        view: ViewArgs,

        /// Limit number of rows printed (default: 50)
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Distinct categories across the whole sheet
    Categories {
        /// Read a local CSV export instead of fetching
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Manage ~/.spendsheet/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the config file and the sheet URL it resolves to
    Show,
}

#[derive(Args, Debug, Clone)]
struct ViewArgs {
    /// First day (DD/MM/YYYY, DD-MM-YYYY or YYYY-MM-DD). Defaults to this month.
    #[arg(long, value_parser = parse_day, requires = "to")]
    from: Option<NaiveDate>,

    /// Last day, inclusive
    #[arg(long, value_parser = parse_day, requires = "from")]
    to: Option<NaiveDate>,

    /// Only this category (exact match); "all" for every category
    #[arg(long, default_value = "all")]
    category: String,

    /// Read a local CSV export instead of fetching
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

fn parse_day(s: &str) -> std::result::Result<NaiveDate, String> {
    normalize_date(s).ok_or_else(|| format!("unrecognized date '{s}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Summary(view) => {
            let store = load_view(&view).await?;
            if view.json {
                let out = serde_json::json!({
                    "filter": store.filter(),
                    "count": store.active_view().len(),
                    "total_spent": store.total_spent(),
                    "categories": store.categories(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_filter_line(&store);
                println!("Expenses: {}", store.active_view().len());
                println!("Total spent: {}", output::format_rupiah(store.total_spent()));
                println!("Categories: {}", store.categories().join(", "));
            }
        }

        Command::Daily(view) => {
            let store = load_view(&view).await?;
            let days = store.daily_spending();
            if view.json {
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else {
                print_filter_line(&store);
                output::print_daily(&days);
                println!("Total spent: {}", output::format_rupiah(store.total_spent()));
            }
        }

        Command::List { view, limit } => {
            let store = load_view(&view).await?;
            if view.json {
                println!("{}", serde_json::to_string_pretty(store.active_view())?);
            } else {
                print_filter_line(&store);
                output::print_expenses(store.active_view(), limit);
            }
        }

        Command::Categories { csv } => {
            let source = build_source(csv.as_ref())?;
            let mut store = ExpenseStore::new();
            let outcome = store.refresh(source.as_ref()).await;
            ensure_loaded(&store, outcome)?;
            for c in store.categories() {
                println!("{c}");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                let env_id = std::env::var(config::SHEET_ID_ENV).ok();
                println!("\n# effective sheet: {}", cfg.sheet.describe_sheet(env_id));
            }
        },
    }

    Ok(())
}

/// Load the sheet and apply the view's filters.
async fn load_view(view: &ViewArgs) -> Result<ExpenseStore> {
    let source = build_source(view.csv.as_ref())?;
    let mut store = ExpenseStore::new();

    let outcome = match (view.from, view.to) {
        (Some(from), Some(to)) => {
            store.set_date_range(start_of_day(from), start_of_day(to));
            store.refresh(source.as_ref()).await
        }
        _ => {
            let today = Local::now().date_naive();
            let outcome = store.initialize_default_range(source.as_ref(), today).await;
            // The store is fresh, so initialization always refreshes
            outcome.unwrap_or(RefreshOutcome::Applied { count: 0 })
        }
    };
    ensure_loaded(&store, outcome)?;

    store.set_category(&view.category);
    Ok(store)
}

fn ensure_loaded(store: &ExpenseStore, outcome: RefreshOutcome) -> Result<()> {
    match (outcome, store.load_state()) {
        (RefreshOutcome::Failed, LoadState::Failed(reason)) => {
            bail!("could not load sheet: {reason}")
        }
        (RefreshOutcome::Failed, _) => bail!("could not load sheet"),
        _ => Ok(()),
    }
}

fn build_source(csv: Option<&PathBuf>) -> Result<Box<dyn SheetSource>> {
    if let Some(path) = csv {
        if !path.exists() {
            bail!("CSV not found: {}", path.display());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        return Ok(Box::new(StaticSheetSource::text(text)));
    }

    let cfg = config::load_config()?;
    let url = cfg
        .sheet
        .sheet_url(std::env::var(config::SHEET_ID_ENV).ok())?;
    let source = HttpSheetSource::new(url, cfg.sheet.timeout(), cfg.sheet.cache_bust)
        .context("build HTTP client")?;
    debug!(url = ?source.url(), "using remote sheet");
    Ok(Box::new(source))
}

fn print_filter_line(store: &ExpenseStore) {
    let filter = store.filter();
    let range = match filter.date_range {
        Some(r) => {
            let (from, to) = r.normalized();
            format!("{} .. {}", from.date(), to.date())
        }
        None => "all dates".to_string(),
    };
    println!("# {} | category: {}\n", range, filter.category.as_selection());
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendsheet_core::time::month_bounds;
    use tempfile::tempdir;

    #[test]
    fn test_parse_day_accepts_sheet_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(parse_day("31/12/2025"), Ok(expected));
        assert_eq!(parse_day("2025-12-31"), Ok(expected));
        assert!(parse_day("tomorrow").is_err());
    }

    #[test]
    fn test_cli_parses_view_args() {
        let cli = Cli::try_parse_from([
            "spendsheet", "list", "--from", "01/12/2025", "--to", "31/12/2025",
            "--category", "Food", "--limit", "5",
        ])
        .unwrap();
        match cli.command {
            Command::List { view, limit } => {
                assert_eq!(limit, 5);
                assert_eq!(view.category, "Food");
                let (first, last) = month_bounds(view.from.unwrap());
                assert_eq!(Some(first), view.from);
                assert_eq!(Some(last), view.to);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_from_requires_to() {
        assert!(Cli::try_parse_from(["spendsheet", "summary", "--from", "01/12/2025"]).is_err());
    }

    #[tokio::test]
    async fn test_load_view_from_local_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(
            &path,
            "Tanggal,Name,Total,Jenis\n01/12/2025,Coffee,Rp 15.000,Food\n02/12/2025,Bus,Rp 3.500,Transport\n",
        )
        .unwrap();

        let view = ViewArgs {
            from: NaiveDate::from_ymd_opt(2025, 12, 1),
            to: NaiveDate::from_ymd_opt(2025, 12, 1),
            category: "all".to_string(),
            csv: Some(path),
            json: false,
        };
        let store = load_view(&view).await.unwrap();

        assert_eq!(store.expenses().len(), 2);
        assert_eq!(store.active_view().len(), 1);
        assert_eq!(store.total_spent(), 15000.0);
    }

    #[tokio::test]
    async fn test_load_view_missing_csv_fails() {
        let dir = tempdir().unwrap();
        let view = ViewArgs {
            from: None,
            to: None,
            category: "all".to_string(),
            csv: Some(dir.path().join("missing.csv")),
            json: false,
        };
        let err = load_view(&view).await.unwrap_err();
        assert!(err.to_string().contains("CSV not found"));
    }
}
