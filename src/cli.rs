//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use crate::adapters::csv_adapter::CsvLedgerAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::console::{self, Console};
use crate::domain::error::LedgerError;
use crate::domain::ledger::Ledger;
use crate::domain::report::format_amount;
use crate::domain::settings::Settings;
use crate::domain::transaction::Kind;

/// Read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "finledger.ini";

#[derive(Parser, Debug)]
#[command(name = "finledger", about = "Personal income and expense ledger")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Ledger CSV file, overriding `[ledger] path`
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = LevelFilter::WARN)]
    pub log_level: LevelFilter,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive menu (default)
    Menu,
    /// Start the web server
    Serve {
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
    /// Record a transaction
    Add {
        #[arg(short, long)]
        kind: String,
        #[arg(short = 'C', long)]
        category: String,
        #[arg(short, long, allow_hyphen_values = true)]
        amount: String,
        /// Defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List transactions with their positions
    List,
    /// Change one field of the transaction at a position
    Edit {
        position: usize,
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Remove the transaction at a position
    Remove { position: usize },
    /// Print balance and summaries
    Report,
    /// Print text charts and write the SVG dashboard
    Chart {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "{}={},tower_http={}",
            env!("CARGO_CRATE_NAME"),
            level,
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn execute(cli: Cli) -> Result<(), LedgerError> {
    let settings = build_settings(cli.config.as_deref(), cli.file)?;
    let ledger = open_ledger(&settings);

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Console::new(&ledger, &settings, stdin.lock(), stdout.lock()).run()?;
            Ok(())
        }
        Command::Serve { listen } => {
            let mut settings = settings;
            if let Some(addr) = listen {
                settings.listen = addr;
            }
            serve(ledger, settings)
        }
        Command::Add {
            kind,
            category,
            amount,
            date,
        } => {
            let kind: Kind = kind.parse()?;
            let t = ledger.add(kind, &category, &amount, date.as_deref())?;
            eprintln!(
                "Added {} {} ({}) on {} with id {}",
                t.kind,
                format_amount(&settings.currency, t.amount),
                t.category,
                t.date,
                t.id
            );
            Ok(())
        }
        Command::List => {
            let rows = ledger.load()?;
            if rows.is_empty() {
                eprintln!("No transactions recorded.");
                return Ok(());
            }
            let mut out = io::stdout().lock();
            console::write_rows(&mut out, &rows, &settings.currency)?;
            Ok(())
        }
        Command::Edit {
            position,
            field,
            value,
        } => {
            let t = ledger.update(position, &field, &value)?;
            eprintln!("Updated position {} (id {})", position, t.id);
            Ok(())
        }
        Command::Remove { position } => {
            let t = ledger.remove(position)?;
            eprintln!(
                "Removed {} {} ({})",
                t.kind,
                format_amount(&settings.currency, t.amount),
                t.category
            );
            Ok(())
        }
        Command::Report => {
            let rows = ledger.load()?;
            let mut out = io::stdout().lock();
            console::write_report(&mut out, &rows, &settings.currency)
        }
        Command::Chart { output } => {
            let output = output.unwrap_or_else(|| settings.chart.output.clone());
            let rows = ledger.load()?;
            console::write_charts(&mut io::stdout().lock(), &rows, &settings, &output)?;
            eprintln!("Chart written to {}", output.display());
            Ok(())
        }
    }
}

/// Merge the INI file (explicit, or `finledger.ini` when present) with
/// command-line overrides.
pub fn build_settings(
    config_path: Option<&Path>,
    file_override: Option<PathBuf>,
) -> Result<Settings, LedgerError> {
    let config = load_config(config_path)?;
    let mut settings = Settings::from_config(&config)?;
    if let Some(file) = file_override {
        settings.ledger_path = file;
    }
    debug!(ledger = %settings.ledger_path.display(), "settings resolved");
    Ok(settings)
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, LedgerError> {
    let path = match path {
        Some(p) => p,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
        None => return Ok(FileConfigAdapter::default()),
    };
    FileConfigAdapter::from_file(path).map_err(|e| LedgerError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn open_ledger(settings: &Settings) -> Ledger {
    let adapter = CsvLedgerAdapter::new(settings.ledger_path.clone(), settings.legacy_schema);
    Ledger::new(Arc::new(adapter))
}

#[cfg(feature = "web")]
fn serve(ledger: Ledger, settings: Settings) -> Result<(), LedgerError> {
    use crate::adapters::web::{AppState, build_router};
    use tracing::info;

    let addr = settings.listen;
    let router = build_router(AppState { ledger, settings });

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "web server listening");
        eprintln!("Serving ledger on http://{}", addr);
        axum::serve(listener, router).await?;
        Ok::<(), io::Error>(())
    })?;
    Ok(())
}

#[cfg(not(feature = "web"))]
fn serve(_ledger: Ledger, _settings: Settings) -> Result<(), LedgerError> {
    Err(LedgerError::Io(io::Error::new(
        io::ErrorKind::Unsupported,
        "web feature is required for serve",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["finledger"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, LevelFilter::WARN);
    }

    #[test]
    fn add_accepts_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "finledger",
            "add",
            "--kind",
            "expense",
            "--category",
            "Food",
            "--amount",
            "12.50",
            "--file",
            "my.csv",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("my.csv")));
        match cli.command {
            Some(Command::Add {
                kind,
                category,
                amount,
                date,
            }) => {
                assert_eq!(kind, "expense");
                assert_eq!(category, "Food");
                assert_eq!(amount, "12.50");
                assert!(date.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_rejects_bad_listen_address() {
        assert!(Cli::try_parse_from(["finledger", "serve", "--listen", "nowhere"]).is_err());
    }

    #[test]
    fn edit_takes_positional_arguments() {
        let cli = Cli::try_parse_from(["finledger", "edit", "2", "value", "42.5"]).unwrap();
        match cli.command {
            Some(Command::Edit {
                position,
                field,
                value,
            }) => {
                assert_eq!(position, 2);
                assert_eq!(field, "value");
                assert_eq!(value, "42.5");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn explicit_missing_config_is_a_config_error() {
        let err = load_config(Some(Path::new("/nonexistent/finledger.ini"))).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigParse { .. }));
    }

    #[test]
    fn file_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let ini = dir.path().join("finledger.ini");
        fs::write(&ini, "[ledger]\npath = from_config.csv\n").unwrap();

        let settings = build_settings(Some(&ini), None).unwrap();
        assert_eq!(settings.ledger_path, PathBuf::from("from_config.csv"));

        let settings = build_settings(Some(&ini), Some(PathBuf::from("flag.csv"))).unwrap();
        assert_eq!(settings.ledger_path, PathBuf::from("flag.csv"));
    }

    #[test]
    fn non_numeric_chart_width_in_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ini = dir.path().join("finledger.ini");
        fs::write(&ini, "[chart]\nwidth = wide\n").unwrap();

        let err = build_settings(Some(&ini), None).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { ref key, .. } if key == "width"));
        assert_eq!(
            format!("{:?}", ExitCode::from(&err)),
            format!("{:?}", ExitCode::from(2u8))
        );
    }
}
