//! Text rendering of analysis and comparison results.

use std::fmt::{self, Write};

use drumcheck_analysis::compare::{ComparisonReport, ShapeReport};
use drumcheck_analysis::math::{linear_to_db, samples_to_ms};
use drumcheck_analysis::SignalSummary;
use serde::Serialize;

/// JSON document written by `drumcheck analyze --json`.
#[derive(Serialize)]
pub struct AnalyzeOutput<'a> {
    /// Profile name.
    pub profile: &'a str,
    /// Input path as given.
    pub input: String,
    /// Measurements.
    pub summary: &'a SignalSummary,
}

/// Result of the comparison stage of `drumcheck compare`.
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome<'a> {
    /// Both recordings were loaded and compared.
    Completed {
        /// Full comparison.
        report: &'a ComparisonReport,
    },
    /// The reference was unavailable; only the candidate was measured.
    Skipped {
        /// Why the comparison did not run.
        reason: String,
        /// Measurements on the full candidate.
        candidate: &'a SignalSummary,
    },
}

/// JSON document written by `drumcheck compare --json`.
#[derive(Serialize)]
pub struct CompareOutput<'a> {
    /// Profile name.
    pub profile: &'a str,
    /// Reference path as given.
    pub reference: String,
    /// Candidate path as given.
    pub candidate: String,
    /// Comparison result or the reason it was skipped.
    pub comparison: ComparisonOutcome<'a>,
}

fn heading(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(title.len()))
}

fn shape_line(shape: Option<&ShapeReport>, sample_rate: u32) -> String {
    match shape {
        Some(report) => format!(
            "{:?} (slope std {:.6} at {:.2} ms)",
            report.shape,
            report.statistic.slope_std_dev,
            samples_to_ms(report.statistic.center, sample_rate)
        )
        .to_lowercase(),
        None => "probe window does not fit".to_string(),
    }
}

fn opt_ms(ms: Option<f32>) -> String {
    ms.map_or_else(|| "not reached".to_string(), |ms| format!("{ms:.2} ms"))
}

/// Render every single-signal measurement.
pub fn summary_text(label: &str, summary: &SignalSummary) -> Result<String, fmt::Error> {
    let rate = summary.sample_rate;
    let analysis = &summary.analysis;
    let mut out = String::new();

    heading(&mut out, label)?;
    writeln!(
        out,
        "  Length:      {} samples ({:.1} ms at {} Hz)",
        summary.len,
        samples_to_ms(summary.len, rate),
        rate
    )?;
    match summary.onset.index() {
        Some(i) => writeln!(out, "  Onset:       sample {i} ({:.2} ms)", samples_to_ms(i, rate))?,
        None => writeln!(out, "  Onset:       not found")?,
    }
    writeln!(
        out,
        "  Peak:        {:+.4} ({:.1} dBFS) at {:.2} ms",
        analysis.peak.value,
        linear_to_db(analysis.peak.magnitude()),
        analysis.peak_ms
    )?;
    writeln!(
        out,
        "  Attack:      {:.2} ms (from sample {})",
        analysis.attack_ms, analysis.attack.start
    )?;
    writeln!(out, "  Decay:")?;
    for decay in &analysis.decays {
        let label = format!("{} dB", decay.threshold_db);
        writeln!(out, "    {label:<10} {}", opt_ms(decay.ms))?;
    }
    if let Some(level) = &summary.half_level {
        writeln!(
            out,
            "  Half level:  first {:.2} ms, last {:.2} ms",
            samples_to_ms(level.first_rise, rate),
            samples_to_ms(level.last_above, rate)
        )?;
    }
    writeln!(out, "  Early RMS:")?;
    for prefix in &summary.prefix_rms {
        let clamped = if prefix.measured < prefix.requested {
            " (clamped)"
        } else {
            ""
        };
        writeln!(
            out,
            "    {:<10} {:.4} ({:.1} dB){clamped}",
            format!("{:.0} ms", samples_to_ms(prefix.requested, rate)),
            prefix.rms,
            linear_to_db(prefix.rms)
        )?;
    }
    if let Some(click) = &summary.transient {
        writeln!(
            out,
            "  Click:       max |x| {:.4}, peak {:+.4}, trough {:+.4} over {} samples",
            click.max_abs, click.peak, click.trough, click.len
        )?;
    }
    writeln!(out, "  Shape:       {}", shape_line(summary.shape.as_ref(), rate))?;
    writeln!(
        out,
        "  RMS profile: {} windows of {} samples",
        analysis.rms_profile.len(),
        analysis.rms_window
    )?;
    Ok(out)
}

/// Render the differences between reference and candidate.
pub fn comparison_text(report: &ComparisonReport) -> Result<String, fmt::Error> {
    let alignment = &report.alignment;
    let ref_rate = report.reference.sample_rate;
    let cand_rate = report.candidate.sample_rate;
    let mut out = String::new();

    heading(&mut out, "Alignment")?;
    writeln!(
        out,
        "  Reference onset: sample {} ({:.2} ms)",
        alignment.onset_a,
        samples_to_ms(alignment.onset_a, ref_rate)
    )?;
    writeln!(
        out,
        "  Candidate onset: sample {} ({:.2} ms)",
        alignment.onset_b,
        samples_to_ms(alignment.onset_b, cand_rate)
    )?;
    writeln!(
        out,
        "  Compared:        {} samples ({:.1} ms reference, {:.1} ms candidate)",
        alignment.length,
        samples_to_ms(alignment.length, ref_rate),
        samples_to_ms(alignment.length, cand_rate)
    )?;
    writeln!(out)?;

    heading(&mut out, "Timing (candidate - reference)")?;
    writeln!(out, "  Peak time:   {:+.2} ms", report.peak_time_diff_ms)?;
    writeln!(out, "  Attack:      {:+.2} ms", report.attack_diff_ms)?;
    for decay in &report.decay_diffs {
        let label = format!("{} dB", decay.threshold_db);
        let diff = decay
            .diff_ms
            .map_or_else(|| "n/a".to_string(), |d| format!("{d:+.2} ms"));
        writeln!(
            out,
            "  {label:<12} ref {}, cand {}, diff {diff}",
            opt_ms(decay.reference_ms),
            opt_ms(decay.candidate_ms)
        )?;
    }
    writeln!(out)?;

    heading(&mut out, "Early RMS (candidate / reference)")?;
    for level in &report.rms_ratios {
        let ratio = level
            .ratio
            .map_or_else(|| "n/a".to_string(), |r| format!("{r:.3}"));
        writeln!(
            out,
            "  {:<10} ref {:.4}, cand {:.4}, ratio {ratio}",
            format!("{:.0} ms", level.window_ms),
            level.reference,
            level.candidate
        )?;
    }
    writeln!(out)?;

    heading(&mut out, "Shape")?;
    writeln!(
        out,
        "  Reference:   {}",
        shape_line(report.reference.shape.as_ref(), ref_rate)
    )?;
    writeln!(
        out,
        "  Candidate:   {}",
        shape_line(report.candidate.shape.as_ref(), cand_rate)
    )?;
    writeln!(out)?;

    heading(&mut out, "Initial spike")?;
    writeln!(out, "  {:>8}  {:>9}  {:>9}  {:>9}", "ms", "ref", "cand", "diff")?;
    for point in &report.points {
        writeln!(
            out,
            "  {:>8.3}  {:>+9.4}  {:>+9.4}  {:>+9.4}",
            point.time_ms, point.reference, point.candidate, point.diff
        )?;
    }
    writeln!(out)?;

    heading(&mut out, "Similarity")?;
    match &report.similarity {
        Some(s) => {
            writeln!(out, "  MSE:         {:.6}", s.mse)?;
            writeln!(out, "  RMSE:        {:.6}", s.rmse)?;
            if s.snr_db.is_finite() {
                writeln!(out, "  SNR:         {:.1} dB", s.snr_db)?;
            } else {
                writeln!(out, "  SNR:         identical")?;
            }
        }
        None => writeln!(
            out,
            "  skipped: sample rates differ ({ref_rate} Hz vs {cand_rate} Hz)"
        )?,
    }

    Ok(out)
}
