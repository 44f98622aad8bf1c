mod bootstrap;
mod config;
mod error;
mod feed;
mod ledger;
mod picks;
mod reconcile;
mod schedule;

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bootstrap::AppContext;
use crate::config::Config;
use crate::ledger::WINNER_USAGE_LIMIT;
use crate::reconcile::{ReconcileOrchestrator, RoundSummary, SeasonSummary, ValidationScheduler};

// Exit statuses: 0 reconciled cleanly, 1 fatal, 2 finished with errors,
// 3 nothing to do.
const EXIT_WITH_ERRORS: u8 = 2;
const EXIT_NOTHING_TO_DO: u8 = 3;

enum Command {
    Round(i32),
    Current,
    All,
    Report,
    Serve,
}

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,pickem_validator=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    dotenv::dotenv().ok();

    let Some(command) = parse_command(std::env::args().skip(1).collect()) else {
        eprintln!("Usage: validator <round N | current | all | report | serve>");
        return ExitCode::FAILURE;
    };

    match run(command).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_command(args: Vec<String>) -> Option<Command> {
    let mut args = args.into_iter();
    match args.next()?.as_str() {
        "round" => args.next()?.parse().ok().map(Command::Round),
        "current" => Some(Command::Current),
        "all" => Some(Command::All),
        "report" => Some(Command::Report),
        "serve" => Some(Command::Serve),
        _ => None,
    }
}

async fn run(command: Command) -> anyhow::Result<ExitCode> {
    let config = Config::from_env()?;
    let ctx = bootstrap::initialize(&config).await?;

    match command {
        Command::Round(round) => {
            let summary = ctx.orchestrator.reconcile_round(round).await?;
            Ok(round_exit(&summary))
        }
        Command::Current => match ctx.orchestrator.reconcile_current_round().await? {
            Some(summary) => Ok(round_exit(&summary)),
            None => Ok(ExitCode::from(EXIT_NOTHING_TO_DO)),
        },
        Command::All => {
            let season = ctx.orchestrator.reconcile_all_incomplete_rounds().await?;
            Ok(season_exit(&season))
        }
        Command::Report => {
            print_report(&ctx).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Serve => {
            serve(ctx.orchestrator.clone(), &config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn round_exit(summary: &RoundSummary) -> ExitCode {
    if !summary.is_clean() {
        ExitCode::from(EXIT_WITH_ERRORS)
    } else if summary.fixtures_updated == 0 {
        ExitCode::from(EXIT_NOTHING_TO_DO)
    } else {
        ExitCode::SUCCESS
    }
}

fn season_exit(season: &SeasonSummary) -> ExitCode {
    if !season.success {
        ExitCode::from(EXIT_WITH_ERRORS)
    } else if season.fixtures_updated() == 0 {
        ExitCode::from(EXIT_NOTHING_TO_DO)
    } else {
        ExitCode::SUCCESS
    }
}

async fn serve(orchestrator: Arc<ReconcileOrchestrator>, config: &Config) -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = ValidationScheduler::new(orchestrator, config.scheduler);
    let handle = scheduler.start(shutdown_rx);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    let _ = shutdown_tx.send(true);
    handle.await?;

    Ok(())
}

/// Operator-facing eligibility report, per participant.
async fn print_report(ctx: &AppContext) -> anyhow::Result<()> {
    for participant in ctx.picks.list_participants().await? {
        println!("{}:", participant.username);

        let eliminations = ctx.ledger.list_eliminations(participant.id).await?;
        println!("  eliminations: {}", eliminations.len());
        for elimination in &eliminations {
            println!("    {} ({})", elimination.team, elimination.kind);
        }

        let winner_usage = ctx.ledger.list_winner_usage(participant.id).await?;
        println!("  winner usages: {}", winner_usage.len());
        for usage in &winner_usage {
            if usage.usage_count >= WINNER_USAGE_LIMIT {
                println!("    {} (ELIMINATED)", usage.team);
            } else {
                println!("    {} ({}/{}x)", usage.team, usage.usage_count, WINNER_USAGE_LIMIT);
            }
        }

        let loser_usage = ctx.ledger.list_loser_usage(participant.id).await?;
        println!("  loser usages: {}", loser_usage.len());
        for usage in &loser_usage {
            println!("    {} (round {})", usage.team, usage.round);
        }
    }

    Ok(())
}
