//! danmu-cli
//!
//! Fetches the danmaku of one Bilibili video, runs the analysis pipeline and
//! prints the report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use danmu_classifiers::{
    AnalysisOutcome, AnalysisPipeline, FileSettings, PipelineOptions, SettingsStore,
    StaticSettings, DEFAULT_TERM_LIMIT,
};
use danmu_core::DisplayLanguage;
use danmu_source::BilibiliSource;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

mod render;

#[derive(Parser, Debug)]
#[command(name = "danmu-cli")]
#[command(about = "Sentiment and word-frequency analysis of Bilibili danmaku", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze the danmaku of one video
    Analyze(AnalyzeArgs),
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
    /// Video page URL, BV id or av id
    video: String,

    /// Settings file path
    #[arg(short, long, env = "DANMU_SETTINGS", default_value = "danmu-settings.yaml")]
    settings: PathBuf,

    /// Display language (zh-CN or en-US), overrides the settings file
    #[arg(short, long)]
    language: Option<DisplayLanguage>,

    /// Number of terms in the word-frequency table
    #[arg(short, long, default_value_t = DEFAULT_TERM_LIMIT)]
    top: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print Prometheus metrics after the report
    #[arg(long)]
    metrics: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Command::Analyze(args) => analyze(args).await,
    }
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let metrics_handle = if args.metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    let mut settings = FileSettings::new(&args.settings)
        .load()
        .await
        .with_context(|| format!("Failed to load settings from {}", args.settings.display()))?;
    if let Some(language) = args.language {
        settings.language = language;
    }
    info!(
        provider = %settings.provider.provider,
        remote = settings.provider.is_remote_usable(),
        language = %settings.language,
        "Settings loaded"
    );

    let source = BilibiliSource::new().context("Failed to create comment source")?;
    let pipeline = AnalysisPipeline::new(Arc::new(source), Arc::new(StaticSettings::new(settings)))?
        .with_options(PipelineOptions { top_terms: args.top });

    let outcome = pipeline
        .analyze_video(&args.video)
        .await
        .with_context(|| format!("Failed to analyze {}", args.video))?;

    match outcome {
        AnalysisOutcome::Report(report) => match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => print!("{}", render::text_report(&report)),
        },
        AnalysisOutcome::NoData => warn!(video = %args.video, "No danmaku found"),
        AnalysisOutcome::Superseded => warn!(video = %args.video, "Analysis superseded"),
    }

    if let Some(handle) = metrics_handle {
        println!("{}", handle.render());
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("danmu=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("danmu=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Install the Prometheus recorder and return the handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "danmu_analysis_runs_total",
        "Total number of analysis runs by outcome"
    );
    metrics::describe_counter!(
        "danmu_classifier_fallbacks_total",
        "Total number of keyword-lexicon fallbacks by reason"
    );
    metrics::describe_histogram!(
        "danmu_pipeline_latency_us",
        metrics::Unit::Microseconds,
        "Analysis latency in microseconds after comments were fetched"
    );

    Ok(handle)
}
