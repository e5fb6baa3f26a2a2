mod assessment;
mod backend;
mod config;
mod progress;
mod report;
mod scoring;
mod session;
mod synthetic;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use backend::{AnalysisBackend, HttpBackend, UnconfiguredBackend, Upload};
use progress::ProgressUpdate;
use session::{AppState, Assessment, Assessor, FallbackPolicy, Request};

/// DPR Assessor: scores a Detailed Project Report, classifies its risks,
/// and writes JSON and plain-text assessment reports.
#[derive(Parser, Debug)]
#[command(name = "dpr-assessor", version, about)]
struct Cli {
    /// DPR document to analyse (pdf, txt, doc or docx, up to 16MB)
    ///
    /// Not required when --demo or --load is used.
    file: Option<PathBuf>,

    /// Run on synthetic demo data instead of a document
    #[arg(long, conflicts_with = "load")]
    demo: bool,

    /// Re-open a structured export (DPR_Analysis_Data_*.json) instead of analysing
    #[arg(long, value_name = "JSON")]
    load: Option<PathBuf>,

    /// Directory for the exported reports (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Seed for synthetic data and progress, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Fail instead of substituting synthetic data when the backend fails
    #[arg(long)]
    strict: bool,

    /// Skip writing export files
    #[arg(long)]
    no_export: bool,

    /// Write one export to stdout instead of the colored summary
    #[arg(long, value_enum)]
    print: Option<ExportFormat>,

    /// Show per-section recommendations and issues
    #[arg(short, long)]
    detailed: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load()?;

    let mut state = AppState::new();

    if let Some(path) = cli.load.as_deref() {
        info!(path = %path.display(), "loading saved analysis");
        state.complete(load_saved(path).await?);
    } else {
        let request = if cli.demo {
            info!("using synthetic demo data");
            Request::Demo
        } else if let Some(path) = cli.file.as_deref() {
            Request::Upload(Upload::from_path(path).await?)
        } else {
            println!("No file selected. Pass a DPR document, or use --demo.");
            return Ok(());
        };

        let policy = if cli.strict {
            FallbackPolicy::Fail
        } else {
            config.backend.on_failure
        };
        let assessor = Assessor::new(build_backend(&config)?, policy, config.progress.timing())
            .with_seed(cli.seed);

        state.begin();
        let (tx, rx) = mpsc::unbounded_channel();
        let bar = tokio::spawn(render_progress(rx));
        let outcome = assessor
            .run(request, tx)
            .instrument(info_span!("assess"))
            .await;
        bar.await?;
        let assessment = outcome?;
        debug!(source = ?assessment.source, progress = ?assessment.progress, "assessment complete");
        state.complete(assessment);
    }

    // stderr, so the warning survives --print redirection
    if let Some(notice) = state.current().and_then(|current| current.source.notice()) {
        eprintln!("{}", notice.yellow().bold());
    }

    match cli.print {
        Some(ExportFormat::Json) => println!("{}", state.export_structured()?),
        Some(ExportFormat::Text) => print!("{}", state.export_text()?),
        None => {
            if let Some(current) = state.current() {
                report::print_summary(&current.result, cli.detailed);
            }
        }
    }

    if !cli.no_export {
        let dir = cli.output_dir.unwrap_or(config.export.output_dir);
        let paths = state.write_exports(&dir, Utc::now())?;
        eprintln!("Exported {}", paths.structured.display());
        eprintln!("Exported {}", paths.text.display());
        info!(dir = %dir.display(), "exports written");
    }

    Ok(())
}

fn build_backend(
    config: &config::Config,
) -> Result<Box<dyn AnalysisBackend>, backend::BackendError> {
    match config.backend_url() {
        Some(url) => {
            let http = HttpBackend::new(url, config.backend_timeout())?;
            debug!(url = %http.upload_url(), "using HTTP analysis backend");
            Ok(Box::new(http))
        }
        None => {
            debug!("no backend URL configured");
            Ok(Box::new(UnconfiguredBackend))
        }
    }
}

/// Read a structured export back and check it before display.
async fn load_saved(path: &Path) -> Result<Assessment, Box<dyn std::error::Error>> {
    let json = tokio::fs::read_to_string(path).await?;
    let result = report::from_structured(&json)?;
    result.validate()?;
    Ok(Assessment::loaded(result))
}

/// Mirror progress updates onto a terminal bar until the sender goes away.
async fn render_progress(mut updates: UnboundedReceiver<ProgressUpdate>) {
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = ProgressBar::new(100).with_style(style);

    while let Some(update) = updates.recv().await {
        bar.set_position(u64::from(update.percentage));
        bar.set_message(update.step_label);
    }
    bar.finish_with_message("Analysis complete");
}
