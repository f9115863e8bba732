//! Peak detection and peak-relative attack/decay timing.
//!
//! All thresholds are expressed in dB relative to the peak magnitude and all
//! amplitude comparisons use absolute sample values. Times are measured in
//! samples; [`DecayOutcome::to_ms`] and [`Signal::samples_to_ms`] convert
//! them with the signal's own rate.
//!
//! # Example
//!
//! ```rust
//! use drumcheck_analysis::envelope::{decay_time, find_peak, DecayOutcome, Threshold};
//!
//! let decay: Vec<f32> = (0..2000).map(|i| (-(i as f32) / 200.0).exp()).collect();
//! let peak = find_peak(&decay).unwrap();
//! let minus_6 = Threshold::decay(-6.0).unwrap();
//!
//! let outcome = decay_time(&decay, peak.index, peak.value, minus_6).unwrap();
//! assert_eq!(outcome, DecayOutcome::Reached { samples: 139 });
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::dynamics::{RmsWindow, windowed_rms};
use crate::error::{AnalysisError, Result};
use crate::math::{db_to_linear, duration_ms, samples_to_ms};
use crate::signal::Signal;

/// Default decay thresholds, in dB below the peak.
pub const DEFAULT_DECAY_THRESHOLDS_DB: [f32; 4] = [-6.0, -12.0, -20.0, -40.0];

/// Default attack threshold, in dB below the peak.
pub const DEFAULT_ATTACK_THRESHOLD_DB: f32 = -40.0;

/// A peak-relative attenuation level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Threshold {
    db: f32,
}

impl Threshold {
    /// Create an attenuation threshold. `db` must be finite and <= 0.
    pub fn decay(db: f32) -> Result<Self> {
        if db.is_finite() && db <= 0.0 {
            Ok(Self { db })
        } else {
            Err(AnalysisError::InvalidThreshold { db })
        }
    }

    /// Threshold in dB.
    pub fn db(self) -> f32 {
        self.db
    }

    /// Linear ratio `10^(db/20)`.
    pub fn ratio(self) -> f32 {
        db_to_linear(self.db)
    }

    /// Absolute amplitude this threshold corresponds to for a given peak.
    pub fn level(self, peak_magnitude: f32) -> f32 {
        peak_magnitude * self.ratio()
    }
}

/// Location and signed value of the largest-magnitude sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    /// Sample index.
    pub index: usize,
    /// Signed sample value.
    pub value: f32,
}

impl Peak {
    /// Absolute value of the peak.
    pub fn magnitude(self) -> f32 {
        self.value.abs()
    }
}

/// Find the sample of maximum absolute amplitude.
///
/// Ties resolve to the earliest index. NaN and infinite samples are skipped.
/// Fails with [`AnalysisError::EmptySignal`] on empty input and
/// [`AnalysisError::NonFiniteSample`] if no sample is finite.
pub fn find_peak(signal: &[f32]) -> Result<Peak> {
    if signal.is_empty() {
        return Err(AnalysisError::EmptySignal);
    }

    let mut peak: Option<Peak> = None;
    for (index, &value) in signal.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        if peak.is_none_or(|p| value.abs() > p.magnitude()) {
            peak = Some(Peak { index, value });
        }
    }
    peak.ok_or(AnalysisError::NonFiniteSample { index: 0 })
}

/// Result of a decay search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecayOutcome {
    /// The signal fell below the threshold this many samples after the peak.
    Reached {
        /// Elapsed samples from the peak to the first sample below threshold.
        samples: usize,
    },
    /// The signal ends (or is silent) before falling below the threshold.
    NotReached,
}

impl DecayOutcome {
    /// Elapsed samples, if the threshold was reached.
    pub fn samples(self) -> Option<usize> {
        match self {
            DecayOutcome::Reached { samples } => Some(samples),
            DecayOutcome::NotReached => None,
        }
    }

    /// Elapsed milliseconds at `sample_rate`, if the threshold was reached.
    pub fn to_ms(self, sample_rate: u32) -> Option<f32> {
        self.samples().map(|n| samples_to_ms(n, sample_rate))
    }

    /// True if the threshold was crossed.
    pub fn is_reached(self) -> bool {
        matches!(self, DecayOutcome::Reached { .. })
    }
}

fn check_peak_index(signal: &[f32], peak_index: usize) -> Result<()> {
    if peak_index < signal.len() {
        Ok(())
    } else {
        Err(AnalysisError::PeakOutOfRange {
            index: peak_index,
            len: signal.len(),
        })
    }
}

/// Time from the peak until the magnitude first drops below
/// `|peak_value| * 10^(threshold/20)`.
///
/// Scans forward from `peak_index`. A silent peak (`peak_value == 0`) can
/// never be attenuated and yields [`DecayOutcome::NotReached`].
pub fn decay_time(
    signal: &[f32],
    peak_index: usize,
    peak_value: f32,
    threshold: Threshold,
) -> Result<DecayOutcome> {
    check_peak_index(signal, peak_index)?;

    let magnitude = peak_value.abs();
    if magnitude == 0.0 {
        return Ok(DecayOutcome::NotReached);
    }

    let level = threshold.level(magnitude);
    Ok(signal[peak_index..]
        .iter()
        .position(|x| x.abs() < level)
        .map_or(DecayOutcome::NotReached, |samples| DecayOutcome::Reached {
            samples,
        }))
}

/// Start of the rise into the peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attack {
    /// Index of the last sample before the peak that is below the threshold,
    /// or 0 when the signal is already above it at the start.
    pub start: usize,
    /// Elapsed samples from `start` to the peak.
    pub samples: usize,
}

/// Locate the start of the attack by scanning backward from the peak.
///
/// The attack starts at the nearest sample before the peak whose magnitude
/// is below the peak-relative threshold. If none exists the start is clamped
/// to index 0. A silent peak has a zero-length attack.
pub fn attack_time(
    signal: &[f32],
    peak_index: usize,
    peak_value: f32,
    threshold: Threshold,
) -> Result<Attack> {
    check_peak_index(signal, peak_index)?;

    let magnitude = peak_value.abs();
    if magnitude == 0.0 {
        return Ok(Attack {
            start: peak_index,
            samples: 0,
        });
    }

    let level = threshold.level(magnitude);
    let start = signal[..=peak_index]
        .iter()
        .rposition(|x| x.abs() < level)
        .unwrap_or(0);

    Ok(Attack {
        start,
        samples: peak_index - start,
    })
}

/// First and last samples at or above a fraction of the peak magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelCrossings {
    /// First index from the start reaching the level.
    pub first_rise: usize,
    /// Last index from the end still at or above the level.
    pub last_above: usize,
}

/// Find where the envelope first reaches and last holds `fraction` of the peak.
///
/// Returns `None` for empty or silent signals.
pub fn level_crossings(signal: &[f32], fraction: f32) -> Option<LevelCrossings> {
    let peak = find_peak(signal).ok()?;
    if peak.magnitude() == 0.0 {
        return None;
    }

    let level = peak.magnitude() * fraction;
    let first_rise = signal.iter().position(|x| x.abs() >= level)?;
    let last_above = signal.iter().rposition(|x| x.abs() >= level)?;
    Some(LevelCrossings {
        first_rise,
        last_above,
    })
}

/// Parameters for [`analyze`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Decay thresholds to measure, in the order they should be reported.
    pub decay_thresholds: Vec<Threshold>,
    /// Threshold used to locate the attack start.
    pub attack_threshold: Threshold,
    /// Window length of the RMS profile, converted with each signal's rate.
    /// Must span at least one sample of every analyzed signal.
    pub rms_window: Duration,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            decay_thresholds: DEFAULT_DECAY_THRESHOLDS_DB
                .iter()
                .map(|&db| Threshold { db })
                .collect(),
            attack_threshold: Threshold {
                db: DEFAULT_ATTACK_THRESHOLD_DB,
            },
            rms_window: Duration::from_millis(10),
        }
    }
}

/// Decay time measured for one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecayMeasurement {
    /// Threshold in dB below the peak.
    pub threshold_db: f32,
    /// Outcome of the forward scan.
    pub outcome: DecayOutcome,
    /// Outcome converted to milliseconds.
    pub ms: Option<f32>,
}

/// Envelope analysis of one signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Sample rate of the analysed signal.
    pub sample_rate: u32,
    /// Length in samples.
    pub len: usize,
    /// Largest-magnitude sample.
    pub peak: Peak,
    /// Peak position in milliseconds.
    pub peak_ms: f32,
    /// One entry per requested decay threshold, in request order.
    pub decays: Vec<DecayMeasurement>,
    /// Attack start and length.
    pub attack: Attack,
    /// Attack length in milliseconds.
    pub attack_ms: f32,
    /// RMS window length in samples.
    pub rms_window: usize,
    /// Non-overlapping RMS profile.
    pub rms_profile: Vec<RmsWindow>,
}

impl AnalysisResult {
    /// Decay outcome measured for `threshold_db`, if it was requested.
    pub fn decay(&self, threshold_db: f32) -> Option<DecayOutcome> {
        self.decays
            .iter()
            .find(|d| d.threshold_db == threshold_db)
            .map(|d| d.outcome)
    }
}

/// Run peak, decay, attack and RMS analysis on a signal.
pub fn analyze(signal: &Signal, settings: &AnalysisSettings) -> Result<AnalysisResult> {
    let samples = signal.samples();
    let rate = signal.sample_rate();
    let peak = find_peak(samples)?;

    let decays = settings
        .decay_thresholds
        .iter()
        .map(|&threshold| {
            let outcome = decay_time(samples, peak.index, peak.value, threshold)?;
            Ok(DecayMeasurement {
                threshold_db: threshold.db(),
                outcome,
                ms: outcome.to_ms(rate),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let attack = attack_time(samples, peak.index, peak.value, settings.attack_threshold)?;

    let rms_window = signal.duration_to_samples(settings.rms_window);
    if rms_window == 0 {
        return Err(AnalysisError::WindowShorterThanSample {
            window_ms: duration_ms(settings.rms_window),
            sample_rate: rate,
        });
    }
    let rms_profile = windowed_rms(samples, rms_window)?;

    Ok(AnalysisResult {
        sample_rate: rate,
        len: samples.len(),
        peak,
        peak_ms: signal.samples_to_ms(peak.index),
        decays,
        attack,
        attack_ms: signal.samples_to_ms(attack.samples),
        rms_window,
        rms_profile,
    })
}
