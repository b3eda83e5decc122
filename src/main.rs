use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use config::DEFAULT_RANGES;
use local::LocalPage;
use log::warn;
use page::Page;
use runner::{OutputFormat, Runner};

mod config;
mod local;
mod page;
pub mod runner;
mod sampler;
mod stat;

#[derive(Parser, Debug)]
#[command(
    name = "weigen",
    version,
    about = "Generate (wei, ether) test case literals",
    long_about = None
)]
struct Args {
    #[arg(short, long, default_value = "local")]
    engine: String,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pause after triggering an update, in milliseconds
    #[arg(short = 'd', long = "delay-ms", default_value_t = 10)]
    delay_ms: u64,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Print a comment line with the timestamp and seed first
    #[arg(long)]
    header: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // parse the command args
    let args = Args::parse();

    let result = match open_page(&args.engine) {
        Ok(page) => run(page, &args).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("weigen: {}", e);
        process::exit(1);
    }
}

/// Picks the conversion page by engine name.
fn open_page(engine: &str) -> Result<LocalPage, String> {
    match engine {
        "local" => Ok(LocalPage::new()),
        _ => Err(format!("unsupported engine {:?}. Please check.", engine)),
    }
}

async fn run<T>(page: T, args: &Args) -> Result<(), String>
where
    T: Page + Send + Sync,
{
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    // stop between samples on Ctrl+C, keeping what was already printed
    if let Err(e) = ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    }) {
        warn!("failed to set Ctrl-C handler: {}", e);
    }

    let runner = Runner::new(
        page,
        &DEFAULT_RANGES,
        Duration::from_millis(args.delay_ms),
        args.format,
        args.seed,
        running,
    )
    .with_header(args.header);
    runner.run().await?;

    let stale = runner.stat().stale();
    if stale > 0 {
        warn!(
            "{} of {} cases read an empty output, consider a larger --delay-ms",
            stale,
            runner.stat().emitted()
        );
    }
    Ok(())
}
