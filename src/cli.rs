//! CLI definition and dispatch.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;

use crate::adapters::csv_adapter::CsvQuoteAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::condition_parser::parse_strategy;
use crate::domain::engine::{run_backtest, EngineParams};
use crate::domain::error::KabusimError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::QuoteDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "kabusim", about = "Condition-driven stock backtest simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        strategy: PathBuf,
        /// Override the security code from the config file
        #[arg(long)]
        code: Option<String>,
        /// Write the full result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse and check a strategy file
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// Show the available data range for a security
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            strategy,
            code,
            output,
        } => cmd_backtest(&config, &strategy, code.as_deref(), output.as_deref()),
        Command::Validate { strategy } => cmd_validate(&strategy),
        Command::Info { config, code } => cmd_info(&config, code.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            (&err).into()
        }
    }
}

fn cmd_backtest(
    config_path: &Path,
    strategy_path: &Path,
    code_override: Option<&str>,
    output: Option<&Path>,
) -> Result<(), KabusimError> {
    let config = FileConfigAdapter::from_file(config_path)?;

    let code = match code_override {
        Some(c) => c.to_string(),
        None => require_key(&config, "backtest", "code")?,
    };
    let initial_cash = config.get_double("backtest", "initial_cash", 0.0);
    let max_position = config.get_double("backtest", "max_position", 100.0);
    let start_date = optional_date(&config, "backtest", "start_date")?;
    let end_date = optional_date(&config, "backtest", "end_date")?;
    let quotes_dir = config
        .get_string("data", "quotes_dir")
        .unwrap_or_else(|| ".".to_string());

    let conditions = parse_strategy(&fs::read_to_string(strategy_path)?)?;

    let adapter = CsvQuoteAdapter::new(PathBuf::from(quotes_dir));
    let quotes = adapter.fetch_daily_quotes(&code, start_date, end_date)?;
    info!("{}: {} observations loaded", code, quotes.len());

    let params = EngineParams {
        initial_cash,
        max_position_pct: max_position,
        buy: conditions.buy,
        sell: conditions.sell,
        take_profit: conditions.take_profit,
        stop_loss: conditions.stop_loss,
    };
    let result = run_backtest(&quotes, &params)?;

    println!("Backtest complete: {code}");
    println!("  initial cash:  {:>15.2}", result.initial_cash);
    println!("  final equity:  {:>15.2}", result.final_equity);
    println!("  total return:  {:.2}%", result.total_return);
    println!("  win rate:      {}", fmt_percent(result.win_rate));
    println!("  max drawdown:  {:.2}%", result.max_drawdown);
    println!("  sharpe ratio:  {}", fmt_ratio(result.sharpe_ratio));
    println!("  trades:        {}", result.trades.len());

    if let Some(path) = output {
        JsonReportAdapter.write(&result, path)?;
        info!("result written to {}", path.display());
    }

    Ok(())
}

fn cmd_validate(strategy_path: &Path) -> Result<(), KabusimError> {
    let conditions = parse_strategy(&fs::read_to_string(strategy_path)?)?;
    let total = conditions.buy.conditions.len()
        + conditions.sell.conditions.len()
        + conditions.take_profit.conditions.len()
        + conditions.stop_loss.conditions.len();
    println!("{}: ok ({} conditions)", strategy_path.display(), total);
    Ok(())
}

fn cmd_info(config_path: &Path, code_override: Option<&str>) -> Result<(), KabusimError> {
    let config = FileConfigAdapter::from_file(config_path)?;
    let code = match code_override {
        Some(c) => c.to_string(),
        None => require_key(&config, "backtest", "code")?,
    };
    let quotes_dir = config
        .get_string("data", "quotes_dir")
        .unwrap_or_else(|| ".".to_string());

    let adapter = CsvQuoteAdapter::new(PathBuf::from(quotes_dir));
    match adapter.data_range(&code)? {
        Some((first, last, count)) => {
            println!("{code}: {count} observations from {first} to {last}");
        }
        None => println!("{code}: no observations"),
    }
    Ok(())
}

fn require_key(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, KabusimError> {
    match config.get_string(section, key) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(KabusimError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn optional_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, KabusimError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| KabusimError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("invalid {key} format, expected YYYY-MM-DD"),
            }),
    }
}

fn fmt_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "—".to_string(),
    }
}

fn fmt_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "—".to_string(),
    }
}
