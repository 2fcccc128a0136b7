//! qhp CLI - quote history download, futures stitching and archive transfer.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "qhp")]
#[command(about = "Quote history client: download, stitch and archive bar series", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Quote store connection flags.
#[derive(Args)]
struct EndpointArgs {
    /// Quote store endpoint (tcp://host:port)
    #[arg(long = "qhp", value_name = "ENDPOINT")]
    endpoint: String,

    /// Reply timeout in seconds
    #[arg(long, default_value = "60")]
    timeout: u64,

    /// Attempts per request when the store times out
    #[arg(long, default_value = "3")]
    retries: u32,
}

/// Output file flags shared by commands that write series.
#[derive(Args)]
struct OutputArgs {
    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    format: Format,

    /// Seconds added to every timestamp in the output
    #[arg(short = 'd', long, default_value = "0", allow_hyphen_values = true)]
    time_delta: i64,

    /// Timezone for dates and times in the output (e.g. Europe/Moscow)
    #[arg(short = 'z', long)]
    timezone: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download one symbol
    Download {
        /// Symbol to download
        #[arg(short = 'y', long)]
        symbol: String,

        /// Start date (YYYYMMDD)
        #[arg(short, long)]
        from: String,

        /// End date (YYYYMMDD)
        #[arg(short, long)]
        to: String,

        /// Bar timeframe (M1, M5, M15, M30, H1, D, W)
        #[arg(short = 'p', long)]
        timeframe: String,

        #[command(flatten)]
        endpoint: EndpointArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Download every contract of a futures series and stitch them
    Futures {
        /// Contract base: Si or ~Si requests Si-3.20, @Si requests SiH0
        #[arg(short = 'y', long)]
        symbol: String,

        /// Start date (YYYYMMDD)
        #[arg(short, long)]
        from: String,

        /// End date (YYYYMMDD)
        #[arg(short, long)]
        to: String,

        /// Bar timeframe (M1, M5, M15, M30, H1, D, W)
        #[arg(short = 'p', long)]
        timeframe: String,

        /// Months between contract expirations
        #[arg(short, long, default_value = "3")]
        interval: u32,

        /// Days cut from each contract's tail before stitching
        #[arg(short, long, default_value = "5")]
        stitch_delta: i64,

        /// Resample each contract to this many seconds
        #[arg(short, long)]
        rescale: Option<u64>,

        /// Ticker written to the output instead of the contract base
        #[arg(short = 'e', long)]
        replace_ticker: Option<String>,

        #[command(flatten)]
        endpoint: EndpointArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List securities known to the quote store
    List {
        #[command(flatten)]
        endpoint: EndpointArgs,
    },

    /// Copy every security from the quote store into the history archive
    Transfer {
        /// History archive endpoint (tcp://host:port)
        #[arg(short = 'a', long = "hap", value_name = "ENDPOINT")]
        archive: String,

        /// Start date (YYYYMMDD)
        #[arg(short, long)]
        from: String,

        /// End date (YYYYMMDD)
        #[arg(short, long)]
        to: String,

        /// Bar timeframe (M1, M5, M15, M30, H1, D, W)
        #[arg(short = 'p', long)]
        timeframe: String,

        /// Seconds added to every timestamp before upload
        #[arg(short = 'd', long, default_value = "0", allow_hyphen_values = true)]
        time_delta: i64,

        /// File of ticker patterns to skip, one per line
        #[arg(short, long)]
        blocklist: Option<PathBuf>,

        /// Prefix of exchange-coded futures tickers
        #[arg(long, default_value = qhp_lib::DEFAULT_EXCHANGE_PREFIX)]
        exchange_prefix: String,

        #[command(flatten)]
        endpoint: EndpointArgs,
    },

    /// Upload an interchange file to the history archive
    Upload {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// History archive endpoint (tcp://host:port)
        #[arg(short = 'a', long = "hap", value_name = "ENDPOINT")]
        archive: String,

        /// Ticker to store the series under
        #[arg(short = 'y', long)]
        symbol: String,

        /// Bar timeframe (M1, M5, M15, M30, H1, D, W)
        #[arg(short = 'p', long)]
        timeframe: String,

        /// Field delimiter of the input file
        #[arg(long, default_value = ";")]
        delimiter: char,

        /// Seconds subtracted from every timestamp in the file
        #[arg(short = 'd', long, default_value = "0", allow_hyphen_values = true)]
        time_delta: i64,

        /// Declared start of the uploaded span (YYYYMMDD)
        #[arg(long)]
        force_from: Option<String>,

        /// Declared end of the uploaded span (YYYYMMDD)
        #[arg(long)]
        force_to: Option<String>,

        /// Reply timeout in seconds
        #[arg(long, default_value = "60")]
        timeout: u64,
    },

    /// Stitch a directory of per-contract interchange files
    Stitch {
        /// Directory holding one file per contract
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Days cut from each contract's tail before stitching
        #[arg(short = 'd', long, default_value = "5")]
        stitch_delta: i64,

        /// Ticker written to the output
        #[arg(short, long)]
        ticker: Option<String>,
    },
}

impl EndpointArgs {
    fn config(&self) -> qhp_lib::ClientConfig {
        qhp_lib::ClientConfig {
            timeout: Duration::from_secs(self.timeout),
            ..qhp_lib::ClientConfig::new(&self.endpoint)
        }
    }

    fn retry(&self) -> qhp_lib::RetryPolicy {
        qhp_lib::RetryPolicy {
            max_attempts: self.retries,
            ..Default::default()
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Download {
            symbol,
            from,
            to,
            timeframe,
            endpoint,
            output,
        } => {
            commands::download::download(
                &symbol,
                &from,
                &to,
                &timeframe,
                &endpoint,
                &output,
                cli.quiet,
            )
            .await
        }
        Commands::Futures {
            symbol,
            from,
            to,
            timeframe,
            interval,
            stitch_delta,
            rescale,
            replace_ticker,
            endpoint,
            output,
        } => {
            let params = commands::download::FuturesParams {
                base: symbol,
                from,
                to,
                timeframe,
                interval,
                stitch_delta,
                rescale,
                replace_ticker,
            };
            commands::download::futures(params, &endpoint, &output, cli.quiet).await
        }
        Commands::List { endpoint } => commands::list::list_securities(&endpoint).await,
        Commands::Transfer {
            archive,
            from,
            to,
            timeframe,
            time_delta,
            blocklist,
            exchange_prefix,
            endpoint,
        } => {
            let params = commands::transfer::TransferParams {
                archive,
                from,
                to,
                timeframe,
                time_delta,
                blocklist,
                exchange_prefix,
            };
            commands::transfer::transfer(params, &endpoint, cli.quiet).await
        }
        Commands::Upload {
            input,
            archive,
            symbol,
            timeframe,
            delimiter,
            time_delta,
            force_from,
            force_to,
            timeout,
        } => {
            let params = commands::upload::UploadParams {
                input,
                archive,
                symbol,
                timeframe,
                delimiter,
                time_delta,
                force_from,
                force_to,
                timeout: Duration::from_secs(timeout),
            };
            commands::upload::upload(params, cli.quiet).await
        }
        Commands::Stitch {
            input_dir,
            output,
            stitch_delta,
            ticker,
        } => commands::stitch::stitch_files(
            &input_dir,
            &output,
            stitch_delta,
            ticker.as_deref(),
            cli.quiet,
        ),
    }
}
