//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::Args;
use drumcheck_analysis::{ComparisonSettings, CsvCurveSink, Signal};
use drumcheck_config::{AnalysisProfile, ProfileSource};
use drumcheck_io::{SourceFormat, load_signal};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// How input files are decoded.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Read inputs as headerless little-endian float32 instead of WAV
    #[arg(long, requires = "sample_rate")]
    pub raw: bool,

    /// Sample rate of --raw inputs in Hz
    #[arg(long, value_name = "HZ")]
    pub sample_rate: Option<u32>,
}

impl InputArgs {
    /// Decoder selected by the flags.
    pub fn format(&self) -> anyhow::Result<SourceFormat> {
        source_format(self.raw, self.sample_rate, "--raw requires --sample-rate")
    }
}

/// How each side of a comparison is decoded.
#[derive(Args, Debug)]
pub struct PairInputArgs {
    /// Read the reference as headerless little-endian float32 instead of WAV
    #[arg(long, requires = "reference_rate")]
    pub reference_raw: bool,

    /// Sample rate of a --reference-raw input in Hz
    #[arg(long, value_name = "HZ")]
    pub reference_rate: Option<u32>,

    /// Read the candidate as headerless little-endian float32 instead of WAV
    #[arg(long, requires = "candidate_rate")]
    pub candidate_raw: bool,

    /// Sample rate of a --candidate-raw input in Hz
    #[arg(long, value_name = "HZ")]
    pub candidate_rate: Option<u32>,
}

impl PairInputArgs {
    /// Decoder for the reference.
    pub fn reference(&self) -> anyhow::Result<SourceFormat> {
        source_format(
            self.reference_raw,
            self.reference_rate,
            "--reference-raw requires --reference-rate",
        )
    }

    /// Decoder for the candidate.
    pub fn candidate(&self) -> anyhow::Result<SourceFormat> {
        source_format(
            self.candidate_raw,
            self.candidate_rate,
            "--candidate-raw requires --candidate-rate",
        )
    }
}

fn source_format(
    raw: bool,
    sample_rate: Option<u32>,
    missing_rate: &str,
) -> anyhow::Result<SourceFormat> {
    match (raw, sample_rate) {
        (false, _) => Ok(SourceFormat::Wav),
        (true, Some(sample_rate)) => Ok(SourceFormat::RawF32 { sample_rate }),
        (true, None) => anyhow::bail!("{missing_rate}"),
    }
}

/// Profile selection and report outputs.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Analysis profile (TOML); defaults to the user profile if present
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the full report as JSON
    #[arg(long, value_name = "OUT")]
    pub json: Option<PathBuf>,

    /// Write waveform and RMS curves as CSV into this directory
    #[arg(long, value_name = "DIR")]
    pub curves: Option<PathBuf>,
}

/// Discover, validate and convert the analysis profile.
pub fn load_settings(
    config: Option<&Path>,
) -> anyhow::Result<(AnalysisProfile, ComparisonSettings)> {
    let (profile, source) =
        AnalysisProfile::discover(config).context("loading analysis profile")?;
    match &source {
        ProfileSource::Explicit(path) | ProfileSource::User(path) => {
            tracing::info!(profile = %profile.name, path = %path.display(), "loaded profile");
        }
        ProfileSource::Defaults => tracing::info!("using built-in profile"),
    }
    let settings = profile
        .settings()
        .with_context(|| format!("invalid profile '{}'", profile.name))?;
    Ok((profile, settings))
}

/// Load one input file.
pub fn load_input(path: &Path, format: SourceFormat) -> anyhow::Result<Signal> {
    let signal =
        load_signal(path, format).with_context(|| format!("failed to load {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        samples = signal.len(),
        sample_rate = signal.sample_rate(),
        "loaded input"
    );
    Ok(signal)
}

/// Open the CSV curve sink if `--curves` was given.
pub fn open_curves(dir: Option<&Path>) -> anyhow::Result<Option<CsvCurveSink>> {
    dir.map(|dir| {
        CsvCurveSink::create(dir)
            .with_context(|| format!("failed to create curve directory {}", dir.display()))
    })
    .transpose()
}

/// Report written curve files.
pub fn finish_curves(sink: Option<&CsvCurveSink>) {
    if let Some(sink) = sink {
        for path in sink.written() {
            tracing::info!(path = %path.display(), "wrote curve");
        }
        println!("Wrote {} curve files", sink.written().len());
    }
}

/// Serialize `value` as pretty JSON into `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote JSON report to {}", path.display());
    Ok(())
}
