//! A/B comparison of a candidate recording against a reference.
//!
//! [`compare_signals`] aligns the pair at their transients, re-runs the
//! single-signal analyses on each aligned slice, and reports the differences
//! that matter when matching a synthesized drum to a recording: peak and
//! attack timing, decay times per threshold, early RMS levels, the shape of
//! the body a few milliseconds in, and a coarse point-by-point trace of the
//! initial spike.
//!
//! Signals may have different sample rates. Every time-based quantity is
//! converted with the rate of the signal it applies to, and the point trace
//! maps instants rather than indices.

use std::time::Duration;

use serde::Serialize;

use crate::dynamics::{PrefixRms, prefix_rms};
use crate::envelope::{AnalysisResult, AnalysisSettings, LevelCrossings, analyze, level_crossings};
use crate::error::{AnalysisError, Result};
use crate::math::duration_ms;
use crate::shape::{LocalShape, ShapeStatistic, classify_local_shape, loudest_in};
use crate::signal::Signal;
use crate::transient::{AlignmentResult, DEFAULT_ONSET_THRESHOLD, Onset, align, detect_onset};

/// Compute Mean Squared Error between two signals
///
/// Only the overlapping prefix is compared.
pub fn mse(signal_a: &[f32], signal_b: &[f32]) -> f32 {
    let len = signal_a.len().min(signal_b.len());
    if len == 0 {
        return 0.0;
    }

    let sum: f64 = signal_a[..len]
        .iter()
        .zip(signal_b[..len].iter())
        .map(|(&a, &b)| (f64::from(a) - f64::from(b)).powi(2))
        .sum();

    (sum / len as f64) as f32
}

/// Compute Root Mean Squared Error
pub fn rmse(signal_a: &[f32], signal_b: &[f32]) -> f32 {
    mse(signal_a, signal_b).sqrt()
}

/// Compute Signal-to-Noise Ratio in dB
///
/// Treats `test` as the "noisy" version of `reference`. Identical signals
/// give `f32::INFINITY`.
pub fn snr_db(reference: &[f32], test: &[f32]) -> f32 {
    let len = reference.len().min(test.len());
    if len == 0 {
        return 0.0;
    }

    let signal_power: f64 = reference[..len]
        .iter()
        .map(|&x| f64::from(x).powi(2))
        .sum();
    let noise_power: f64 = reference[..len]
        .iter()
        .zip(test[..len].iter())
        .map(|(&r, &t)| (f64::from(r) - f64::from(t)).powi(2))
        .sum();

    if noise_power > 1e-10 {
        (10.0 * (signal_power / noise_power).log10()) as f32
    } else {
        f32::INFINITY
    }
}

/// Extremes of the first samples of a signal (the initial click).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowExtremes {
    /// Samples inspected.
    pub len: usize,
    /// Largest magnitude.
    pub max_abs: f32,
    /// Largest signed value.
    pub peak: f32,
    /// Smallest signed value.
    pub trough: f32,
}

/// Extremes over `signal[..len]`, clamped to the signal length.
///
/// Returns `None` if no samples are inspected.
pub fn window_extremes(signal: &[f32], len: usize) -> Option<WindowExtremes> {
    let window = &signal[..len.min(signal.len())];
    let first = *window.first()?;
    let (peak, trough, max_abs) = window.iter().fold(
        (first, first, first.abs()),
        |(peak, trough, max_abs), &x| (peak.max(x), trough.min(x), max_abs.max(x.abs())),
    );
    Some(WindowExtremes {
        len: window.len(),
        max_abs,
        peak,
        trough,
    })
}

/// One instant of a point-by-point trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointComparison {
    /// Time since the start of both signals.
    pub time_ms: f32,
    /// Reference sample at that instant.
    pub reference: f32,
    /// Candidate sample at that instant.
    pub candidate: f32,
    /// `candidate - reference`.
    pub diff: f32,
}

/// Sample both signals at up to `count` evenly spaced instants within
/// `window`.
///
/// Instants are taken on the candidate's sample grid and mapped onto the
/// reference by time (`floor(i * rate_ref / rate_cand)`), so signals at
/// different rates line up. Instants that fall past the end of either signal
/// are skipped.
pub fn point_compare(
    reference: &Signal,
    candidate: &Signal,
    window: Duration,
    count: usize,
) -> Vec<PointComparison> {
    let span = candidate.duration_to_samples(window);
    let ref_span = reference
        .duration_to_samples(window)
        .min(reference.len());
    let step = (span / count.max(1)).max(1);
    let cand_rate = u64::from(candidate.sample_rate());
    let ref_rate = u64::from(reference.sample_rate());

    (0..span.min(candidate.len()))
        .step_by(step)
        .filter_map(|i| {
            let r = (i as u64 * ref_rate / cand_rate) as usize;
            if r >= ref_span {
                return None;
            }
            let reference_value = reference.samples()[r];
            let candidate_value = candidate.samples()[i];
            Some(PointComparison {
                time_ms: candidate.samples_to_ms(i),
                reference: reference_value,
                candidate: candidate_value,
                diff: candidate_value - reference_value,
            })
        })
        .collect()
}

/// Where and how to probe the local waveform shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProbe {
    /// Start of the search range, from the start of the signal.
    pub offset: Duration,
    /// Length of the search range. The probe centres on its loudest sample.
    pub span: Duration,
    /// Samples on each side of the centre.
    pub half_width: usize,
    /// Slope spread at or below which the shape is called linear.
    pub cutoff: f32,
}

impl Default for ShapeProbe {
    fn default() -> Self {
        Self {
            offset: Duration::from_millis(20),
            span: Duration::from_millis(20),
            half_width: 10,
            cutoff: 1e-3,
        }
    }
}

/// Parameters for [`summarize`] and [`compare_signals`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSettings {
    /// Envelope analysis parameters.
    pub analysis: AnalysisSettings,
    /// Absolute onset threshold used for alignment.
    pub onset_threshold: f32,
    /// Optional cap on the aligned length. A cap shorter than one sample
    /// fails with [`AnalysisError::EmptyAlignment`].
    pub max_duration: Option<Duration>,
    /// Shape probe placement.
    pub shape: ShapeProbe,
    /// Prefix lengths for early RMS levels.
    pub rms_levels: Vec<Duration>,
    /// Length of the initial-click window.
    pub transient_window: Duration,
    /// Length of the point-by-point trace.
    pub point_window: Duration,
    /// Number of points in the trace.
    pub point_count: usize,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            analysis: AnalysisSettings::default(),
            onset_threshold: DEFAULT_ONSET_THRESHOLD,
            max_duration: Some(Duration::from_millis(500)),
            shape: ShapeProbe::default(),
            rms_levels: [50, 100, 200, 500]
                .into_iter()
                .map(Duration::from_millis)
                .collect(),
            transient_window: Duration::from_micros(500),
            point_window: Duration::from_millis(6),
            point_count: 20,
        }
    }
}

/// Shape statistic at the probe point with its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeReport {
    /// Raw slope statistics.
    pub statistic: ShapeStatistic,
    /// Label under the configured cutoff.
    pub shape: LocalShape,
}

/// Everything measured on a single signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSummary {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Length in samples.
    pub len: usize,
    /// Onset under the configured absolute threshold.
    pub onset: Onset,
    /// Peak, decay, attack and RMS profile.
    pub analysis: AnalysisResult,
    /// Where the envelope first reaches and last holds half the peak.
    pub half_level: Option<LevelCrossings>,
    /// Shape at the probe point; `None` when the probe window does not fit.
    pub shape: Option<ShapeReport>,
    /// Early RMS levels.
    pub prefix_rms: Vec<PrefixRms>,
    /// Extremes of the initial click.
    pub transient: Option<WindowExtremes>,
}

/// Run every single-signal measurement.
pub fn summarize(signal: &Signal, settings: &ComparisonSettings) -> Result<SignalSummary> {
    let samples = signal.samples();
    let analysis = analyze(signal, &settings.analysis)?;
    let shape = probe_shape(signal, &settings.shape)?;

    let lengths: Vec<usize> = settings
        .rms_levels
        .iter()
        .map(|&d| signal.duration_to_samples(d))
        .collect();

    Ok(SignalSummary {
        sample_rate: signal.sample_rate(),
        len: signal.len(),
        onset: detect_onset(samples, settings.onset_threshold),
        analysis,
        half_level: level_crossings(samples, 0.5),
        shape,
        prefix_rms: prefix_rms(samples, &lengths),
        transient: window_extremes(
            samples,
            signal.duration_to_samples(settings.transient_window),
        ),
    })
}

fn probe_shape(signal: &Signal, probe: &ShapeProbe) -> Result<Option<ShapeReport>> {
    let start = signal.duration_to_samples(probe.offset);
    let span = signal.duration_to_samples(probe.span);
    let Some(center) = loudest_in(signal.samples(), start, span) else {
        return Ok(None);
    };

    match classify_local_shape(signal.samples(), center, probe.half_width) {
        Ok(statistic) => {
            let shape = statistic.classify(probe.cutoff);
            Ok(Some(ShapeReport { statistic, shape }))
        }
        Err(AnalysisError::OutOfBounds { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Decay times of both signals at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecayDiff {
    /// Threshold in dB below each signal's own peak.
    pub threshold_db: f32,
    /// Reference decay time, if reached.
    pub reference_ms: Option<f32>,
    /// Candidate decay time, if reached.
    pub candidate_ms: Option<f32>,
    /// `candidate - reference`, only when both were reached.
    pub diff_ms: Option<f32>,
}

/// Early RMS levels of both signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RmsRatio {
    /// Prefix length in milliseconds.
    pub window_ms: f32,
    /// Reference RMS.
    pub reference: f32,
    /// Candidate RMS.
    pub candidate: f32,
    /// `candidate / reference`; `None` when the reference is silent.
    pub ratio: Option<f32>,
}

/// Sample-wise similarity of two aligned slices at the same rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Similarity {
    /// Mean squared error.
    pub mse: f32,
    /// Root mean squared error.
    pub rmse: f32,
    /// Signal-to-noise ratio of the candidate against the reference, in dB.
    pub snr_db: f32,
}

/// Result of [`compare_signals`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Onsets and common length (reference is side A).
    pub alignment: AlignmentResult,
    /// Measurements on the aligned reference slice.
    pub reference: SignalSummary,
    /// Measurements on the aligned candidate slice.
    pub candidate: SignalSummary,
    /// Candidate peak time minus reference peak time.
    pub peak_time_diff_ms: f32,
    /// Candidate attack time minus reference attack time.
    pub attack_diff_ms: f32,
    /// Per-threshold decay comparison.
    pub decay_diffs: Vec<DecayDiff>,
    /// Early RMS level comparison.
    pub rms_ratios: Vec<RmsRatio>,
    /// Point-by-point trace of the start of the aligned slices.
    pub points: Vec<PointComparison>,
    /// Sample-wise similarity; `None` when the sample rates differ.
    pub similarity: Option<Similarity>,
}

/// Align `candidate` to `reference` and compare the aligned slices.
pub fn compare_signals(
    reference: &Signal,
    candidate: &Signal,
    settings: &ComparisonSettings,
) -> Result<ComparisonReport> {
    let alignment = align(
        reference,
        candidate,
        settings.onset_threshold,
        settings.max_duration,
    )?;
    if alignment.length == 0 {
        return Err(AnalysisError::EmptyAlignment {
            max_duration_ms: settings.max_duration.map_or(0.0, duration_ms),
        });
    }
    let (ref_slice, cand_slice) = alignment.aligned_signals(reference, candidate);

    let ref_summary = summarize(&ref_slice, settings)?;
    let cand_summary = summarize(&cand_slice, settings)?;

    let decay_diffs = ref_summary
        .analysis
        .decays
        .iter()
        .zip(&cand_summary.analysis.decays)
        .map(|(r, c)| DecayDiff {
            threshold_db: r.threshold_db,
            reference_ms: r.ms,
            candidate_ms: c.ms,
            diff_ms: r.ms.zip(c.ms).map(|(r, c)| c - r),
        })
        .collect();

    let rms_ratios = settings
        .rms_levels
        .iter()
        .zip(ref_summary.prefix_rms.iter().zip(&cand_summary.prefix_rms))
        .map(|(window, (r, c))| RmsRatio {
            window_ms: duration_ms(*window),
            reference: r.rms,
            candidate: c.rms,
            ratio: (r.rms > 0.0).then(|| c.rms / r.rms),
        })
        .collect();

    let similarity = (reference.sample_rate() == candidate.sample_rate()).then(|| {
        let (r, c) = (ref_slice.samples(), cand_slice.samples());
        Similarity {
            mse: mse(r, c),
            rmse: rmse(r, c),
            snr_db: snr_db(r, c),
        }
    });

    let points = point_compare(
        &ref_slice,
        &cand_slice,
        settings.point_window,
        settings.point_count,
    );

    #[cfg(feature = "tracing")]
    tracing::debug!(
        length = alignment.length,
        points = points.len(),
        same_rate = similarity.is_some(),
        "compared aligned pair"
    );

    Ok(ComparisonReport {
        alignment,
        peak_time_diff_ms: cand_summary.analysis.peak_ms - ref_summary.analysis.peak_ms,
        attack_diff_ms: cand_summary.analysis.attack_ms - ref_summary.analysis.attack_ms,
        reference: ref_summary,
        candidate: cand_summary,
        decay_diffs,
        rms_ratios,
        points,
        similarity,
    })
}
