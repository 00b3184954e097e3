use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use blur_detection::{BlurAnalyzer, BlurAssessment, BlurThresholds, LogSink};
use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info, warn, Level, LevelFilter};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "blurcheck")]
#[command(about = "Flag extremely blurry frames using edge, wavelet and Laplacian metrics")]
struct Cli {
    /// Image files to assess. Without files, one base64 payload is read from stdin
    files: Vec<PathBuf>,

    /// Mean edge gradient below this votes "poor" [default: 20]
    #[arg(long)]
    edge_threshold: Option<f64>,

    /// Wavelet detail energy below this votes "poor" [default: 4.5]
    #[arg(long)]
    wavelet_threshold: Option<f64>,

    /// Laplacian variance below this votes "poor" [default: 100]
    #[arg(long)]
    variance_threshold: Option<f64>,

    /// Gradient magnitude a pixel must exceed to count as an edge [default: 10]
    #[arg(long)]
    edge_pixel_threshold: Option<f64>,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn thresholds(&self) -> BlurThresholds {
        let defaults = BlurThresholds::default();
        BlurThresholds {
            edge_pixel_threshold: self
                .edge_pixel_threshold
                .unwrap_or(defaults.edge_pixel_threshold),
            edge_score_threshold: self.edge_threshold.unwrap_or(defaults.edge_score_threshold),
            wavelet_score_threshold: self
                .wavelet_threshold
                .unwrap_or(defaults.wavelet_score_threshold),
            variance_threshold: self.variance_threshold.unwrap_or(defaults.variance_threshold),
            ..defaults
        }
    }
}

/// One line of batch output
#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    #[serde(flatten)]
    assessment: Option<BlurAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let analyzer = BlurAnalyzer::new(cli.thresholds());
    info!("blurcheck started. Thresholds: {:?}", analyzer.thresholds());

    let outcome = if cli.files.is_empty() {
        run_single(&analyzer)
    } else {
        run_batch(&analyzer, &cli.files)
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Every stderr record is a single JSON object so the channel stays machine-readable
fn init_logging(verbosity: u8) {
    // Honour RUST_LOG only when no -v flag was given
    let mut logger = if verbosity == 0 && std::env::var_os("RUST_LOG").is_some() {
        Builder::from_env(Env::default())
    } else {
        let mut b = Builder::new();
        b.filter_level(level_for_verbosity(verbosity));
        b
    };

    logger
        .format(|buf, record| writeln!(buf, "{}", log_line(record.level(), record.args())))
        .init();
}

/// JSON object written to stderr for one log record
fn log_line(level: Level, message: &std::fmt::Arguments<'_>) -> serde_json::Value {
    serde_json::json!({
        "level": level.as_str(),
        "log": message.to_string(),
    })
}

/// Read one base64 payload from stdin and print its assessment
fn run_single(analyzer: &BlurAnalyzer) -> Result<ExitCode> {
    let mut payload = String::new();
    std::io::stdin()
        .read_to_string(&mut payload)
        .context("Failed to read payload from stdin")?;

    match assess_payload(analyzer, &payload) {
        Ok(assessment) => {
            print_json_line(&assessment)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            report_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn assess_payload(analyzer: &BlurAnalyzer, payload: &str) -> Result<BlurAssessment> {
    let frame = frame_decode::decode_frame(payload).context("Failed to decode image data")?;
    let assessment = analyzer.assess(Some(&frame), &LogSink);
    info!("Final results: {:?}", assessment);
    Ok(assessment)
}

/// Assess image files in parallel; report them in input order
fn run_batch(analyzer: &BlurAnalyzer, files: &[PathBuf]) -> Result<ExitCode> {
    info!("Assessing {} files", files.len());

    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| file_report(analyzer, path))
        .collect();

    for report in &reports {
        print_json_line(report)?;
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        warn!("Failed to assess {} of {} files", failed, reports.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn assess_file(analyzer: &BlurAnalyzer, path: &Path) -> Result<BlurAssessment> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let frame = frame_decode::decode_image(&bytes)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(analyzer.assess(Some(&frame), &LogSink))
}

fn file_report(analyzer: &BlurAnalyzer, path: &Path) -> FileReport {
    let path_str = path.display().to_string();
    match assess_file(analyzer, path) {
        Ok(assessment) => FileReport {
            path: path_str,
            assessment: Some(assessment),
            error: None,
        },
        Err(e) => {
            error!("{:#}", e);
            FileReport {
                path: path_str,
                assessment: None,
                error: Some(format!("{:#}", e)),
            }
        }
    }
}

fn print_json_line<T: Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, value).context("Failed to serialize result")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Structured error object on stderr, independent of the log level
fn report_error(err: &anyhow::Error) {
    let message = format!("{:#}", err);
    error!("{}", message);
    eprintln!("{}", serde_json::json!({ "error": message }));
}
