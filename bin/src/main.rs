//! adreach CLI - Estimate ad impressions by region, gender and age.

use std::path::PathBuf;
use std::process::ExitCode;

use adreach_lib::RoundingMode;
use adreach_lib::url::BASE_URL;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{filter::LevelFilter, fmt};

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "adreach")]
#[command(about = "Estimate ad impressions by region, gender and age", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output and warnings)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Rounding of exact halves (half-even, half-away-from-zero)
    #[arg(long, global = true, default_value = "half-even")]
    rounding: RoundingMode,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a pre-fetched archive page ({"data": [...]})
    File {
        /// Path to the JSON snapshot
        path: PathBuf,

        /// Only break down the first record
        #[arg(long)]
        first: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Crawl the ads archive and aggregate every returned ad
    Crawl {
        /// Access token passed through to the archive
        #[arg(long)]
        access_token: String,

        /// Page id whose ads are requested (repeatable)
        #[arg(long = "page-id", required = true)]
        page_ids: Vec<String>,

        /// Reached country code (repeatable)
        #[arg(long = "country", default_value = "US")]
        countries: Vec<String>,

        /// Earliest delivery date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Latest delivery date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,

        /// Ad type
        #[arg(long, default_value = "POLITICAL_AND_ISSUE_ADS")]
        ad_type: String,

        /// Delivery status (ALL, ACTIVE, INACTIVE)
        #[arg(long, default_value = "ALL")]
        status: String,

        /// Archive endpoint
        #[arg(long, default_value = BASE_URL)]
        base_url: String,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,

        /// Stop requesting pages after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    let subscriber = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::File {
            path,
            first,
            format,
        } => commands::file::file(&path, first, format, cli.rounding),
        Commands::Crawl {
            access_token,
            page_ids,
            countries,
            since,
            until,
            ad_type,
            status,
            base_url,
            max_pages,
            timeout_secs,
            format,
        } => {
            let args = commands::crawl::CrawlArgs {
                access_token,
                page_ids,
                countries,
                since,
                until,
                ad_type,
                status,
                base_url,
                max_pages,
                timeout_secs,
            };
            commands::crawl::crawl(args, format, cli.rounding, cli.quiet).await
        }
    }
}
