//! Freighter CLI - discover the latest container images for a warehouse

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod display;
mod error;
mod exit_codes;

use commands::discover::DiscoverOptions;
use freighter_registry::selector::DEFAULT_METADATA_CONCURRENCY;

#[derive(Parser)]
#[command(name = "freighter")]
#[command(author = "Freighter Contributors")]
#[command(version)]
#[command(about = "Discover the latest container images for a warehouse", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one discovery pass over a warehouse file
    Discover {
        /// Warehouse YAML file
        warehouse: PathBuf,

        /// Credential store file (default: <config dir>/freighter/credentials.yaml)
        #[arg(long, env = "FREIGHTER_CREDENTIALS")]
        credentials: Option<PathBuf>,

        /// Registry reached over plain HTTP (host or host:port, repeatable)
        #[arg(
            long = "insecure-registry",
            env = "FREIGHTER_INSECURE_REGISTRIES",
            value_delimiter = ','
        )]
        insecure_registries: Vec<String>,

        /// Give up after this many seconds
        #[arg(long, default_value_t = 60)]
        timeout: u64,

        /// Concurrent image metadata lookups for NewestBuild subscriptions
        #[arg(long, default_value_t = DEFAULT_METADATA_CONCURRENCY)]
        metadata_concurrency: usize,

        /// Output freight as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the browsable source URL of a repository at a tag
    SourceUrl {
        /// Git repository URL
        base_url: String,

        /// Tag
        tag: String,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Discover {
            warehouse,
            credentials,
            insecure_registries,
            timeout,
            metadata_concurrency,
            json,
        } => {
            commands::discover::run(
                &warehouse,
                DiscoverOptions {
                    credentials,
                    insecure_registries,
                    timeout_secs: timeout,
                    metadata_concurrency,
                    json,
                },
            )
            .await
        }

        Commands::SourceUrl { base_url, tag } => commands::source_url::run(&base_url, &tag),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
