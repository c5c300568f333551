//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::clock::ManualClock;
use crate::adapters::csv_feed_adapter::CsvFeedAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::paper_execution_adapter::PaperExecutionAdapter;
use crate::domain::config::TradingConfig;
use crate::domain::config_validation::{
    build_feed_config, build_trading_config, first_order_id, validate_config,
};
use crate::domain::error::BarTraderError;
use crate::domain::order::OrderGroup;
use crate::domain::trader::Trader;
use crate::logging::setup_logging;
use crate::ports::feed_port::FeedPort;

#[derive(Parser, Debug)]
#[command(name = "bartrader", about = "Intraday bar aggregation and bracket-order signals")]
pub struct Cli {
    /// trace, debug, info, warn or error
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a session configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Replay recorded updates through the engine against paper execution
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        /// Backfill bars, fed without boundary logic
        #[arg(long)]
        history: Option<PathBuf>,
        /// Live updates, aggregated into bars
        #[arg(long)]
        live: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    setup_logging(&cli.log_level, cli.json_logs);
    match cli.command {
        Command::Validate { config } => run_validate(&config),
        Command::Replay {
            config,
            history,
            live,
        } => run_replay(&config, history.as_deref(), &live),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    // validate_config succeeded, so this cannot fail
    if let Ok(config) = build_trading_config(&adapter) {
        print_config(&config);
    }
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn print_config(config: &TradingConfig) {
    let strategy = &config.strategy;
    eprintln!("  Symbol:        {}", config.symbol);
    eprintln!("  Venue zone:    {}", config.venue_tz());
    eprintln!("  Bar minutes:   {}", config.bar_minutes);
    eprintln!("  Policy:        {}", strategy.policy);
    eprintln!("  SMA period:    {}", strategy.sma_period);
    match strategy.max_trades_per_day {
        Some(cap) => eprintln!("  Daily cap:     {cap}"),
        None => eprintln!("  Daily cap:     none"),
    }
    eprintln!("  Quantity:      {}", strategy.quantity());
    eprintln!(
        "  Blackout:      {} min from {}",
        config.session.blackout_minutes, config.session.session_open
    );
}

fn run_replay(config_path: &Path, history_path: Option<&Path>, live_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    match replay_from_config(&adapter, history_path, live_path) {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// What a replay did.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub symbol: String,
    pub historical_updates: usize,
    pub live_updates: usize,
    pub order_groups: Vec<OrderGroup>,
    pub trades_today: u32,
    pub position_active: bool,
}

pub fn replay_from_config(
    adapter: &FileConfigAdapter,
    history_path: Option<&Path>,
    live_path: &Path,
) -> Result<ReplaySummary, BarTraderError> {
    let config = build_trading_config(adapter)?;
    let feed = CsvFeedAdapter::new(build_feed_config(adapter, config.venue_tz())?, config.venue_tz());
    let execution = PaperExecutionAdapter::new(first_order_id(adapter)?);
    run_replay_pipeline(&feed, config, execution, history_path, live_path)
}

/// Feed backfill then live updates through a [`Trader`], with a manual clock
/// that follows the live timestamps.
pub fn run_replay_pipeline(
    feed: &dyn FeedPort,
    config: TradingConfig,
    execution: PaperExecutionAdapter,
    history_path: Option<&Path>,
    live_path: &Path,
) -> Result<ReplaySummary, BarTraderError> {
    let history = match history_path {
        Some(path) => feed.read_updates(path)?,
        None => Vec::new(),
    };
    let live = feed.read_updates(live_path)?;
    let start = live
        .first()
        .or(history.first())
        .map(|u| u.timestamp)
        .ok_or_else(|| BarTraderError::Feed {
            reason: format!("no updates in {}", live_path.display()),
        })?;

    let clock = ManualClock::new(start);
    let mut trader = Trader::new(config, execution, clock.clone())?;

    for update in &history {
        trader.on_historical(update);
    }
    info!(bars = trader.indicators().history().len(), "backfill loaded");

    let mut order_groups = Vec::new();
    for update in &live {
        clock.set(update.timestamp);
        if let Some(group) = trader.on_live(update)? {
            order_groups.push(group);
        }
    }

    Ok(ReplaySummary {
        symbol: trader.config().symbol.clone(),
        historical_updates: history.len(),
        live_updates: live.len(),
        order_groups,
        trades_today: trader.state().trades_today,
        position_active: trader.state().position_active,
    })
}

fn print_summary(summary: &ReplaySummary) {
    println!(
        "{}: {} historical, {} live updates",
        summary.symbol, summary.historical_updates, summary.live_updates
    );
    for group in &summary.order_groups {
        println!("{}", group.oca_group);
        for leg in group.legs() {
            println!("  {leg}");
        }
    }
    println!(
        "Submitted {} order group(s); trades today {}, position {}",
        summary.order_groups.len(),
        summary.trades_today,
        if summary.position_active { "open" } else { "flat" }
    );
}
