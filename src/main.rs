use clap::Parser;
use tracing::info;

use dailypin::cli::{Cli, Commands};
use dailypin::config::Config;
use dailypin::domain::{DeliveryMode, SourceType};
use dailypin::errors::BotResult;
use dailypin::services::{
    ConsoleNotifier, DeliveryOptions, DeliveryService, NotificationService, Notifier, RunOutcome,
};
use dailypin::sources::{ContentSource, PinterestSource, RaindropSource};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> BotResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hint => {
            cmd_hint();
            Ok(())
        }
        Commands::Run {
            source,
            mode,
            count,
            cron,
            dry_run,
        } => cmd_run(source, mode, count, cron, dry_run),
    }
}

fn cmd_hint() {
    println!("Daily Pin Bot is running!\n");
    println!("To trigger the scheduled delivery manually, run:");
    println!("  dailypin run --cron \"* * * * *\"\n");
    println!("To preview the message without sending it:");
    println!("  dailypin run --dry-run");
}

fn cmd_run(
    source: Option<SourceType>,
    mode: DeliveryMode,
    count: usize,
    cron: Option<String>,
    dry_run: bool,
) -> BotResult<()> {
    dailypin::setup_logging();

    let config = Config::from_env()?;
    let source_type = source.unwrap_or(config.source);
    let options = DeliveryOptions::new(mode, count);

    info!(
        cron = cron.as_deref().unwrap_or("manual"),
        source = %source_type,
        dry_run,
        "Daily Pin Bot triggered"
    );

    match source_type {
        SourceType::Pins => {
            let source = PinterestSource::new(config.pinterest()?)?;
            execute(source, &config, options, dry_run)
        }
        SourceType::Articles => {
            let source = RaindropSource::new(config.raindrop()?)?;
            execute(source, &config, options, dry_run)
        }
    }
}

fn execute<S: ContentSource>(
    source: S,
    config: &Config,
    options: DeliveryOptions,
    dry_run: bool,
) -> BotResult<()> {
    if dry_run {
        deliver(source, ConsoleNotifier, config, options);
    } else {
        let notifier = NotificationService::new(&config.telegram)?;
        deliver(source, notifier, config, options);
    }

    Ok(())
}

fn deliver<S: ContentSource, N: Notifier>(
    source: S,
    notifier: N,
    config: &Config,
    options: DeliveryOptions,
) {
    let service = DeliveryService::new(source, notifier, config.telegram.chat_id.as_str(), options);

    match service.run(&mut rand::thread_rng()) {
        RunOutcome::Delivered { items } => info!(items, "Daily delivery sent successfully"),
        RunOutcome::Reported { .. } => info!("Error notification handled"),
    }
}
