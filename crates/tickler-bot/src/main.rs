use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use tickler_core::{ReminderDelivery, TicklerConfig};
use tickler_scheduler::{ChannelSink, FireReport, ReminderService};

mod delivery;
mod processor;
mod slash;

use processor::MessageProcessor;

/// Natural-language reminder bot. Reads messages from stdin, one per line.
#[derive(Debug, Parser)]
#[command(name = "tickler-bot", version, about)]
struct Cli {
    /// Path to tickler.toml (default: $TICKLER_CONFIG or ~/.tickler/tickler.toml).
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // load config: --config > TICKLER_CONFIG env > ~/.tickler/tickler.toml
    let config_path = cli.config.or_else(|| std::env::var("TICKLER_CONFIG").ok());
    let loaded = TicklerConfig::load(config_path.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let default_filter = if config.bot.debug {
        "tickler_bot=debug,tickler_scheduler=debug,tickler_nlp=debug"
    } else {
        "tickler_bot=info,tickler_scheduler=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = &loaded {
        warn!("Config load failed ({}), using defaults", e);
    }

    // Delivery channel: ChannelSink → stdout delivery task
    let (delivery_tx, delivery_rx) = tokio::sync::mpsc::channel::<ReminderDelivery>(256);
    // Fire reports: scheduler → report logger task
    let (report_tx, report_rx) =
        tokio::sync::mpsc::channel::<FireReport>(config.scheduler.report_buffer.max(1));

    let service = Arc::new(ReminderService::new(
        Arc::new(ChannelSink::new(delivery_tx)),
        config.scheduler.clone(),
        Some(report_tx),
    ));
    let delivery_task = tokio::spawn(delivery::run_stdout_delivery(delivery_rx));
    tokio::spawn(delivery::run_report_logger(report_rx));

    let processor = MessageProcessor::new(Arc::clone(&service));
    info!(
        auto_delete = config.scheduler.auto_delete_on_trigger,
        "tickler bot ready: type a message, or 'help'"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    let text = line.trim();
                    if text.is_empty() {
                        continue;
                    }
                    println!("{}", processor.process(text));
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted: shutting down");
                service.shutdown();
                return Ok(());
            }
        }
    }

    // stdin closed: keep running until every pending reminder has fired.
    let pending = service.list_pending().len();
    if pending > 0 {
        info!(pending, "input closed: waiting for pending reminders (Ctrl-C to quit)");
    }
    while !service.list_pending().is_empty() {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    service.shutdown();

    // Dropping the last handles closes the delivery channel once in-flight
    // fires finish, which lets the delivery task drain and exit.
    drop(processor);
    drop(service);
    if tokio::time::timeout(Duration::from_secs(5), delivery_task)
        .await
        .is_err()
    {
        warn!("delivery task did not drain in time");
    }
    Ok(())
}
