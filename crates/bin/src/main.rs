//! RiskRanger CLI binary.
//!
//! Fetches daily prices from Yahoo Finance and prints risk and return
//! statistics for one or more tickers.

mod settings;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use riskranger::{Analysis, RiskAnalyzer};
use riskranger_data::yahoo::{DEFAULT_RATE_SYMBOL, YahooQuoteProvider, YahooTreasuryRate};
use riskranger_data::{DateRange, FetchWindow, Lookback, PriceField, RateSource};
use riskranger_output::{ExportFormat, Exporter, FailureText, ReportText};
use riskranger_risk::{RiskFreeRateEstimator, RiskFreeStrategy, RiskMetricsEngine};
use serde_json::json;
use settings::Settings;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOOKBACK: Lookback = Lookback::Years(5);

#[derive(Parser)]
#[command(name = "riskranger")]
#[command(about = "RiskRanger: risk and return statistics for stock tickers", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute risk metrics for one or more tickers
    Analyze(AnalyzeArgs),

    /// Print the estimated risk-free rate
    Rate {
        #[command(flatten)]
        window: WindowArgs,

        /// Yield index quoted in percent
        #[arg(long, default_value = DEFAULT_RATE_SYMBOL)]
        symbol: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct WindowArgs {
    /// First date of an explicit range (YYYY-MM-DD)
    #[arg(long, requires = "end", conflicts_with = "period")]
    start: Option<NaiveDate>,

    /// Last date of an explicit range (YYYY-MM-DD, inclusive)
    #[arg(long, requires = "start", conflicts_with = "period")]
    end: Option<NaiveDate>,

    /// Lookback ending today: Nd, Nmo, Ny or max [default: 5y]
    #[arg(long)]
    period: Option<Lookback>,
}

impl WindowArgs {
    fn resolve(&self, fallback: Option<Lookback>) -> Result<FetchWindow, Box<dyn std::error::Error>> {
        match (self.start, self.end, self.period) {
            (Some(start), Some(end), _) => Ok(DateRange::new(start, end)?.into()),
            (_, _, Some(period)) => Ok(period.into()),
            _ => Ok(fallback.unwrap_or(DEFAULT_LOOKBACK).into()),
        }
    }
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Ticker symbols
    #[arg(required = true)]
    tickers: Vec<String>,

    #[command(flatten)]
    window: WindowArgs,

    /// VaR and CVaR confidence level, strictly between 0 and 1 [default: 0.95]
    #[arg(long)]
    confidence: Option<f64>,

    /// Return periods per year [default: 252]
    #[arg(long)]
    annualization: Option<u32>,

    /// Use this annual risk-free rate (decimal) instead of the market yield
    #[arg(long)]
    risk_free_rate: Option<f64>,

    /// Rate (decimal) to use when the market yield cannot be fetched
    #[arg(long)]
    fallback_rate: Option<f64>,

    /// Yield index for the market risk-free rate [default: ^IRX]
    #[arg(long)]
    rate_symbol: Option<String>,

    /// Price column: close (price return) or adjusted (total return) [default: close]
    #[arg(long, value_enum)]
    price: Option<PriceArg>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write the reports to a .csv or .json file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Maximum tickers fetched at the same time [default: 4]
    #[arg(long)]
    concurrency: Option<usize>,

    /// JSON settings file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PriceArg {
    Close,
    Adjusted,
}

impl From<PriceArg> for PriceField {
    fn from(arg: PriceArg) -> Self {
        match arg {
            PriceArg::Close => Self::Close,
            PriceArg::Adjusted => Self::AdjustedClose,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze(args) => analyze(args).await?,
        Commands::Rate {
            window,
            symbol,
            format,
        } => print_rate(&window, symbol, format).await?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "riskranger=debug" } else { "riskranger=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn analyze(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_optional(args.config.as_deref())?;
    let window = args.window.resolve(settings.period()?)?;
    let tickers: Vec<String> = args.tickers.iter().map(|t| t.trim().to_uppercase()).collect();

    let engine = RiskMetricsEngine::new(settings.risk_config(args.confidence, args.annualization))?;

    let strategy = args
        .risk_free_rate
        .or(settings.risk_free_rate)
        .map_or(RiskFreeStrategy::Market, RiskFreeStrategy::Override);
    let mut estimator = RiskFreeRateEstimator::new(strategy)?;
    if let Some(rate) = args.fallback_rate.or(settings.fallback_rate) {
        estimator = estimator.with_fallback(rate)?;
    }

    let price_field = args
        .price
        .map(PriceField::from)
        .or(settings.price_field)
        .unwrap_or_default();
    let mut quotes = YahooQuoteProvider::new()?
        .with_price_field(price_field)
        .with_backoff(settings.backoff());
    if let Some(delay) = settings.rate_limit() {
        quotes = quotes.with_rate_limit(delay);
    }
    let rates = YahooTreasuryRate::new()?
        .with_symbol(
            args.rate_symbol
                .or_else(|| settings.rate_symbol.clone())
                .unwrap_or_else(|| DEFAULT_RATE_SYMBOL.to_string()),
        )
        .with_backoff(settings.backoff());

    let mut analyzer = RiskAnalyzer::new(quotes, rates, engine, estimator);
    if let Some(concurrency) = args.concurrency.or(settings.concurrency) {
        analyzer = analyzer.with_concurrency(concurrency);
    }

    let pb = ProgressBar::new(tickers.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!(
        "Fetching {} tickers ({} concurrent)...",
        tickers.len(),
        analyzer.concurrency()
    ));

    let analysis = match analyzer
        .analyze_with(&tickers, window, |outcome| {
            pb.inc(1);
            pb.set_message(outcome.symbol.clone());
        })
        .await
    {
        Ok(analysis) => {
            pb.finish_and_clear();
            analysis
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    if let Some(path) = &args.export {
        let format = ExportFormat::from_path(path)?;
        let reports: Vec<_> = analysis.reports().cloned().collect();
        reports.as_slice().export_to_file(path, format)?;
        eprintln!("Exported {} report(s) to {}", reports.len(), path.display());
    }

    let all_failed = analysis.all_failed();
    match args.format {
        OutputFormat::Text => print_text(&analysis),
        OutputFormat::Json => println!("{}", analysis.into_run_report().to_json()?),
    }

    if all_failed {
        return Err("no ticker could be analyzed".into());
    }
    Ok(())
}

/// Window label with the calendar dates a lookback covers on `today`.
fn describe_window(window: &FetchWindow, today: NaiveDate) -> String {
    match (window, window.calendar_range(today)) {
        (FetchWindow::Lookback(_), Some(range)) => format!("{window} ({range})"),
        _ => window.to_string(),
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

fn print_text(analysis: &Analysis) {
    println!("\nWindow: {}", describe_window(&analysis.window, today()));
    println!(
        "Risk-free rate: {:.4}% ({})",
        analysis.risk_free_rate.rate * 100.0,
        analysis.risk_free_rate.origin
    );

    for outcome in &analysis.outcomes {
        println!();
        match &outcome.result {
            Ok(report) => print!("{}", ReportText(report)),
            Err(e) => print!(
                "{}",
                FailureText {
                    symbol: &outcome.symbol,
                    error: &e.to_string(),
                }
            ),
        }
    }
}

async fn print_rate(
    window: &WindowArgs,
    symbol: String,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let window = window.resolve(None)?;
    let source = YahooTreasuryRate::new()?.with_symbol(symbol);
    let rate = source.fetch_rate(window).await?;

    match format {
        OutputFormat::Text => {
            println!(
                "Average {} yield over {}: {:.4}%",
                source.symbol(),
                describe_window(&window, today()),
                rate * 100.0
            );
        }
        OutputFormat::Json => {
            let range = window.calendar_range(today());
            let output = json!({
                "symbol": source.symbol(),
                "window": window.to_string(),
                "start": range.map(|r| r.start()),
                "end": range.map(|r| r.end()),
                "rate": rate,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
