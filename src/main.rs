use ConcurrentQueueMini::{ConcurrentQueue, Popped, QueueConfig, SafeQueue, append_stats};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

/// Run producers and consumers against one shared queue
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Number of producer threads
    #[arg(long, default_value_t = 8)]
    producers: usize,

    /// Number of consumer threads
    #[arg(long, default_value_t = 4)]
    consumers: usize,

    /// Items pushed by each producer
    #[arg(long, default_value_t = 1000)]
    items: u64,

    /// JSON queue configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append the final stats snapshot to this NDJSON file
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("ConcurrentQueueMini={}", level)
            .parse()
            .context("building log filter")?,
    );
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => QueueConfig::from_json_file(path)
            .with_context(|| format!("loading queue config from {}", path.display()))?,
        None => QueueConfig::default(),
    };
    let queue: SafeQueue<u64> = Arc::new(ConcurrentQueue::with_config(config));

    let consumers: Vec<_> = (0..cli.consumers)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || {
                let mut received = 0u64;
                while let Popped::Item(_) = queue.wait_and_pop() {
                    received += 1;
                }
                received
            })
        })
        .collect();

    let producers: Vec<_> = (0..cli.producers as u64)
        .map(|id| {
            let queue = queue.clone();
            let items = cli.items;
            thread::spawn(move || {
                for i in 0..items {
                    // Only this binary closes the queue, after every producer joined
                    if queue.push(id * items + i).is_err() {
                        break;
                    }
                }
            })
        })
        .collect();

    for handle in producers {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("producer thread panicked"))?;
    }
    queue.close();

    let mut total = 0u64;
    for handle in consumers {
        total += handle
            .join()
            .map_err(|_| anyhow::anyhow!("consumer thread panicked"))?;
    }

    let stats = queue.stats();
    info!(
        received = total,
        pushed = stats.pushed,
        popped = stats.popped,
        remaining = stats.len,
        "all consumers finished"
    );

    if let Some(path) = &cli.stats_out {
        append_stats(&[stats], path)
            .with_context(|| format!("writing stats to {}", path.display()))?;
    }
    Ok(())
}
