//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_store::CsvStore;
use crate::adapters::file_config::FileConfigAdapter;
use crate::adapters::prompt_parser::KeywordPromptParser;
use crate::domain::config::{BacktestConfig, DataField};
use crate::domain::engine::BacktestEngine;
use crate::domain::error::BitacoreError;
use crate::domain::schema::BacktestRequest;
use crate::ports::config_port::ConfigPort;
use crate::ports::prompt_port::PromptPort;
use crate::ports::snapshot_port::SnapshotPort;

#[derive(Parser, Debug)]
#[command(name = "bitacore", about = "Portfolio rebalancing backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest from a JSON request or a free-text prompt
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        request: Option<PathBuf>,
        #[arg(short, long)]
        prompt: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a backtest request without touching any data
    Validate {
        #[arg(short, long)]
        request: PathBuf,
    },
    /// Show the available date range per data field
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        field: Option<String>,
    },
    /// List data fields present in the store
    ListFields {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Load observations from a CSV file into the SQLite store
    Load {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        field: String,
        #[arg(long)]
        csv: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            request,
            prompt,
            output,
        } => run_backtest(&config, request.as_ref(), prompt.as_deref(), output.as_ref()),
        Command::Validate { request } => run_validate(&request),
        Command::Info { config, field } => run_info(&config, field.as_deref()),
        Command::ListFields { config } => run_list_fields(&config),
        Command::Load { config, field, csv } => run_load(&config, &field, &csv),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = BitacoreError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Open the snapshot store named by `[data] backend` (default `csv`).
fn open_store(config: &FileConfigAdapter) -> Result<Box<dyn SnapshotPort>, BitacoreError> {
    let backend = config
        .get_string("data", "backend")
        .unwrap_or_else(|| "csv".to_string());

    match backend.as_str() {
        "csv" => Ok(Box::new(CsvStore::from_config(config)?)),
        "sqlite" => {
            #[cfg(feature = "sqlite")]
            {
                use crate::adapters::sqlite_store::SqliteStore;
                Ok(Box::new(SqliteStore::from_config(config)?))
            }
            #[cfg(not(feature = "sqlite"))]
            {
                Err(BitacoreError::ConfigInvalid {
                    section: "data".into(),
                    key: "backend".into(),
                    reason: "sqlite feature is not compiled in".into(),
                })
            }
        }
        other => Err(BitacoreError::ConfigInvalid {
            section: "data".into(),
            key: "backend".into(),
            reason: format!("unknown backend '{other}' (expected 'csv' or 'sqlite')"),
        }),
    }
}

fn read_request(path: &PathBuf) -> Result<BacktestRequest, BitacoreError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| BitacoreError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn resolve_request(
    request_path: Option<&PathBuf>,
    prompt: Option<&str>,
) -> Result<BacktestRequest, BitacoreError> {
    match (request_path, prompt) {
        (Some(path), None) => {
            eprintln!("Loading request from {}", path.display());
            read_request(path)
        }
        (None, Some(text)) => {
            eprintln!("Parsing prompt");
            KeywordPromptParser::new().parse(text)
        }
        _ => Err(BitacoreError::ConfigInvalid {
            section: "cli".into(),
            key: "request".into(),
            reason: "exactly one of --request or --prompt is required".into(),
        }),
    }
}

fn run_backtest(
    config_path: &PathBuf,
    request_path: Option<&PathBuf>,
    prompt: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let app_config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let request = match resolve_request(request_path, prompt) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let bt_config = match BacktestConfig::try_from(&request) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let store = match open_store(&app_config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Running backtest: {} top {} by {} from {}",
        bt_config.calendar_rule, bt_config.n, bt_config.data_field, bt_config.initial_date
    );

    let engine = BacktestEngine::new(store.as_ref());
    let response = match engine.run(&bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Processed {} of {} rebalance dates in {:.3}s",
        response.metadata.rebalance_dates_processed,
        response.metadata.total_rebalance_dates,
        response.execution_time,
    );
    for warning in &response.warnings {
        eprintln!("warning: {warning}");
    }

    let json = match serde_json::to_string_pretty(&response) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("error: failed to encode response: {e}");
            return ExitCode::from(1);
        }
    };

    match output_path {
        Some(path) => match fs::write(path, &json) {
            Ok(()) => {
                eprintln!("Response written to: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to write response: {e}");
                ExitCode::from(1)
            }
        },
        None => {
            println!("{json}");
            ExitCode::SUCCESS
        }
    }
}

fn run_validate(request_path: &PathBuf) -> ExitCode {
    eprintln!("Validating request: {}", request_path.display());
    let request = match read_request(request_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match BacktestConfig::try_from(&request) {
        Ok(config) => {
            eprintln!("\nResolved strategy:");
            eprintln!("  calendar:  {}", config.calendar_rule);
            eprintln!("  start:     {}", config.initial_date);
            eprintln!("  filter:    {} (n = {})", config.filter, config.n);
            eprintln!("  ranked by: {}", config.data_field);
            eprintln!("  weighting: {}", config.weighting);
            eprintln!("\nRequest is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &PathBuf, field: Option<&str>) -> ExitCode {
    let app_config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = match open_store(&app_config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let fields: Vec<DataField> = match field {
        Some(name) => match name.parse() {
            Ok(f) => vec![f],
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
        None => DataField::ALL.to_vec(),
    };

    for f in fields {
        match store.data_range(f) {
            Ok((min, max)) => println!("{f}: {min} to {max}"),
            Err(_) => eprintln!("{f}: no data found"),
        }
    }
    ExitCode::SUCCESS
}

fn run_list_fields(config_path: &PathBuf) -> ExitCode {
    let app_config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = match open_store(&app_config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut found = 0;
    for field in DataField::ALL {
        if store.data_range(field).is_ok() {
            println!("{field}");
            found += 1;
        }
    }
    if found == 0 {
        eprintln!("No data fields found");
    }
    ExitCode::SUCCESS
}

fn run_load(config_path: &PathBuf, field: &str, csv_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::csv_store::read_observations;
        use crate::adapters::sqlite_store::SqliteStore;

        let app_config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let field: DataField = match field.parse() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let observations = match read_observations(csv_path) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let store = match SqliteStore::from_config(&app_config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        if let Err(e) = store.initialize_schema() {
            eprintln!("error: {e}");
            return (&e).into();
        }

        match store.insert_observations(field, &observations) {
            Ok(inserted) => {
                eprintln!("Loaded {inserted} observations for {field}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config_path, field, csv_path);
        eprintln!("error: sqlite feature is required for load");
        ExitCode::from(1)
    }
}
