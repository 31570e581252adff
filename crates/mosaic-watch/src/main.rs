//! Watch relay binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mosaic_bucket::BucketClient;
use mosaic_client::{MosaicClient, PollConfig};
use mosaic_models::{AgentCatalog, RunTarget};
use mosaic_watch::source::validate_local_dir;
use mosaic_watch::{
    BucketSink, BucketSource, LocalSink, LocalSource, OutputSink, Relay, SeenStore, WatchConfig,
    WatchSource, Watcher,
};

#[derive(Parser, Debug)]
#[command(name = "mosaic-watch")]
#[command(about = "Watch a folder and run every new video through Mosaic")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Agent to run, by catalog name or raw id
    #[arg(long, env = "MOSAIC_AGENT_ID", global = true)]
    agent: Option<String>,

    /// Free-text prompt for a generated agent, instead of a fixed one
    #[arg(long, env = "MOSAIC_PROMPT", global = true)]
    prompt: Option<String>,

    /// Seconds between folder scans
    #[arg(long, env = "WATCH_POLL_SECONDS", global = true, default_value_t = 60)]
    poll: u64,

    /// Run a single scan then exit
    #[arg(long, global = true)]
    once: bool,

    /// Relay files already present at first start instead of skipping them
    #[arg(long, env = "WATCH_PROCESS_EXISTING", global = true)]
    process_existing: bool,

    /// Where the seen-set is persisted
    #[arg(
        long,
        env = "WATCH_SEEN_FILE",
        global = true,
        default_value = ".mosaic-seen.json"
    )]
    seen_file: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Watch a local directory; outputs land in an output directory
    Local {
        /// Directory to watch
        dir: PathBuf,

        /// Where run outputs are delivered
        #[arg(long, env = "WATCH_OUTPUT_DIR", default_value = "downloads")]
        output_dir: PathBuf,
    },
    /// Watch an S3-compatible bucket; outputs are uploaded next to sources
    Bucket {
        /// Key prefix to watch, empty for the whole bucket
        #[arg(default_value = "")]
        prefix: String,
    },
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables before clap reads env-backed args
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("mosaic=info".parse().unwrap())
        .add_directive("aws=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting mosaic-watch");

    let catalog = match AgentCatalog::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load agent catalog: {}", e);
            std::process::exit(1);
        }
    };

    let target = match (cli.agent, cli.prompt) {
        (Some(agent), None) => RunTarget::Agent(catalog.resolve(&agent)),
        (None, Some(prompt)) => RunTarget::Prompt(prompt),
        _ => {
            error!("Set exactly one of --agent (MOSAIC_AGENT_ID) or --prompt (MOSAIC_PROMPT)");
            std::process::exit(1);
        }
    };

    let client = match MosaicClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create Mosaic client: {}", e);
            std::process::exit(1);
        }
    };

    let config = WatchConfig {
        scan_interval: Duration::from_secs(cli.poll),
        once: cli.once,
        process_existing: cli.process_existing,
        seen_path: cli.seen_file,
    };

    let seen = match SeenStore::load(&config.seen_path).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load seen-set: {}", e);
            std::process::exit(1);
        }
    };

    let (source, sink): (Box<dyn WatchSource>, Box<dyn OutputSink>) = match cli.command {
        Command::Local { dir, output_dir } => {
            if let Err(e) = validate_local_dir(&dir).await {
                error!("{}", e);
                std::process::exit(1);
            }
            (
                Box::new(LocalSource::new(dir)),
                Box::new(LocalSink::new(output_dir)),
            )
        }
        Command::Bucket { prefix } => {
            let bucket = match BucketClient::from_env().await {
                Ok(b) => b,
                Err(e) => {
                    error!("Failed to create bucket client: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = bucket.check_connectivity().await {
                error!("{}", e);
                std::process::exit(1);
            }
            (
                Box::new(BucketSource::new(bucket.clone(), prefix)),
                Box::new(BucketSink::new(bucket)),
            )
        }
    };

    let relay = Relay::new(client, target, PollConfig::from_env());
    let mut watcher = Watcher::new(source, sink, relay, seen, config);

    if let Err(e) = watcher.run().await {
        error!("Watcher error: {}", e);
        std::process::exit(1);
    }

    info!("Watcher shutdown complete");
}
