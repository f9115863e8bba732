//! Curve export for external plotting.
//!
//! Plotting is optional: callers hold an `Option<&mut dyn CurveSink>` and
//! the analysis runs identically with or without one. [`CsvCurveSink`]
//! writes plain CSV files that any plotting tool can read.
//!
//! # Example
//!
//! ```rust,ignore
//! use drumcheck_analysis::export::{CsvCurveSink, emit_summary};
//!
//! let mut sink = CsvCurveSink::create("curves")?;
//! emit_summary(Some(&mut sink), "candidate", &signal, &summary)?;
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::compare::{ComparisonReport, SignalSummary};
use crate::dynamics::RmsWindow;
use crate::signal::Signal;

/// Receiver for time-series curves.
pub trait CurveSink {
    /// Full waveform of one signal.
    fn waveform(&mut self, label: &str, signal: &Signal) -> io::Result<()>;

    /// RMS profile of one signal.
    fn rms_profile(&mut self, label: &str, sample_rate: u32, profile: &[RmsWindow])
    -> io::Result<()>;

    /// Two transient-aligned slices, possibly at different rates.
    fn aligned_pair(&mut self, reference: &Signal, candidate: &Signal) -> io::Result<()>;
}

/// Writes each curve to `<dir>/<label>_<curve>.csv`.
#[derive(Debug)]
pub struct CsvCurveSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl CsvCurveSink {
    /// Create the output directory if needed.
    pub fn create(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn open(&mut self, label: &str, curve: &str) -> io::Result<BufWriter<File>> {
        let name: String = label
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let path = self.dir.join(format!("{name}_{curve}.csv"));
        let file = File::create(&path)?;
        self.written.push(path);
        Ok(BufWriter::new(file))
    }
}

impl CurveSink for CsvCurveSink {
    fn waveform(&mut self, label: &str, signal: &Signal) -> io::Result<()> {
        let mut out = self.open(label, "waveform")?;
        writeln!(out, "index,time_ms,amplitude")?;
        for (i, x) in signal.samples().iter().enumerate() {
            writeln!(out, "{},{:.6},{:.6}", i, signal.samples_to_ms(i), x)?;
        }
        out.flush()
    }

    fn rms_profile(
        &mut self,
        label: &str,
        sample_rate: u32,
        profile: &[RmsWindow],
    ) -> io::Result<()> {
        let mut out = self.open(label, "rms")?;
        writeln!(out, "start,start_ms,len,rms")?;
        for window in profile {
            writeln!(
                out,
                "{},{:.6},{},{:.6}",
                window.start,
                crate::math::samples_to_ms(window.start, sample_rate),
                window.len,
                window.rms
            )?;
        }
        out.flush()
    }

    fn aligned_pair(&mut self, reference: &Signal, candidate: &Signal) -> io::Result<()> {
        let mut out = self.open("aligned", "pair")?;
        writeln!(out, "index,reference_ms,reference,candidate_ms,candidate")?;
        let len = reference.len().max(candidate.len());
        for i in 0..len {
            let column = |signal: &Signal| match signal.samples().get(i) {
                Some(x) => format!("{:.6},{:.6}", signal.samples_to_ms(i), x),
                None => ",".to_string(),
            };
            writeln!(out, "{},{},{}", i, column(reference), column(candidate))?;
        }
        out.flush()
    }
}

/// Send a single-signal analysis to `sink`, if there is one.
///
/// Returns whether anything was emitted.
pub fn emit_summary(
    sink: Option<&mut dyn CurveSink>,
    label: &str,
    signal: &Signal,
    summary: &SignalSummary,
) -> io::Result<bool> {
    let Some(sink) = sink else {
        return Ok(false);
    };
    sink.waveform(label, signal)?;
    sink.rms_profile(label, summary.sample_rate, &summary.analysis.rms_profile)?;
    Ok(true)
}

/// Send a comparison to `sink`, if there is one.
///
/// `reference` and `candidate` are the full signals the report was computed
/// from; the aligned slices are cut from them here.
pub fn emit_comparison(
    sink: Option<&mut dyn CurveSink>,
    reference: &Signal,
    candidate: &Signal,
    report: &ComparisonReport,
) -> io::Result<bool> {
    let Some(sink) = sink else {
        return Ok(false);
    };
    let (ref_slice, cand_slice) = report.alignment.aligned_signals(reference, candidate);
    sink.aligned_pair(&ref_slice, &cand_slice)?;
    sink.rms_profile(
        "reference",
        report.reference.sample_rate,
        &report.reference.analysis.rms_profile,
    )?;
    sink.rms_profile(
        "candidate",
        report.candidate.sample_rate,
        &report.candidate.analysis.rms_profile,
    )?;
    Ok(true)
}
