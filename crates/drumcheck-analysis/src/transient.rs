//! Onset detection and transient alignment of two recordings.
//!
//! Onsets use a fixed absolute amplitude rather than a peak-relative level,
//! so a hit is found even when its peak arrives much later than the first
//! audible sample. Alignment then trims each signal to start at its onset
//! and truncates both to a common sample count.
//!
//! # Example
//!
//! ```rust
//! use drumcheck_analysis::Signal;
//! use drumcheck_analysis::transient::align;
//!
//! let mut late = vec![0.0; 300];
//! late.extend((0..1000).map(|i| (-(i as f32) / 100.0).exp()));
//! let early: Vec<f32> = (0..1000).map(|i| (-(i as f32) / 100.0).exp()).collect();
//!
//! let a = Signal::new(late, 44100).unwrap();
//! let b = Signal::new(early, 44100).unwrap();
//! let alignment = align(&a, &b, 0.05, None).unwrap();
//!
//! assert_eq!((alignment.onset_a, alignment.onset_b), (300, 0));
//! let (slice_a, slice_b) = alignment.slices(&a, &b);
//! assert_eq!(slice_a, slice_b);
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::error::{AnalysisError, Result, Side};
use crate::signal::Signal;

/// Default absolute onset threshold.
pub const DEFAULT_ONSET_THRESHOLD: f32 = 0.05;

/// Result of an onset search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "onset", content = "index", rename_all = "snake_case")]
pub enum Onset {
    /// First sample whose magnitude exceeds the threshold.
    At(usize),
    /// No sample exceeds the threshold.
    NotFound,
}

impl Onset {
    /// Onset index, if one was found.
    pub fn index(self) -> Option<usize> {
        match self {
            Onset::At(index) => Some(index),
            Onset::NotFound => None,
        }
    }
}

/// Find the first sample with `|x| > threshold`.
pub fn detect_onset(signal: &[f32], threshold: f32) -> Onset {
    signal
        .iter()
        .position(|x| x.abs() > threshold)
        .map_or(Onset::NotFound, Onset::At)
}

/// Onsets and common length of an aligned pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignmentResult {
    /// Onset index in the first signal.
    pub onset_a: usize,
    /// Onset index in the second signal.
    pub onset_b: usize,
    /// Number of samples compared from each onset.
    pub length: usize,
}

impl AlignmentResult {
    /// Borrow the time-synchronized slices `a[onset_a..][..length]` and
    /// `b[onset_b..][..length]`.
    ///
    /// `a` and `b` must be the signals the alignment was computed from.
    pub fn slices<'a>(&self, a: &'a Signal, b: &'a Signal) -> (&'a [f32], &'a [f32]) {
        (
            window(a.samples(), self.onset_a, self.length),
            window(b.samples(), self.onset_b, self.length),
        )
    }

    /// Copy the aligned slices into new signals that keep their source rates.
    pub fn aligned_signals(&self, a: &Signal, b: &Signal) -> (Signal, Signal) {
        (
            a.slice(self.onset_a, self.length),
            b.slice(self.onset_b, self.length),
        )
    }
}

fn window(samples: &[f32], start: usize, len: usize) -> &[f32] {
    let start = start.min(samples.len());
    let end = start.saturating_add(len).min(samples.len());
    &samples[start..end]
}

/// Align two signals at their onsets.
///
/// The common length is the shorter of the two post-onset tails, further
/// capped by `max_duration` converted with each signal's own sample rate.
/// Fails with [`AnalysisError::NoTransient`] if either signal never exceeds
/// `threshold`.
pub fn align(
    a: &Signal,
    b: &Signal,
    threshold: f32,
    max_duration: Option<Duration>,
) -> Result<AlignmentResult> {
    let (onset_a, onset_b) = match (
        detect_onset(a.samples(), threshold),
        detect_onset(b.samples(), threshold),
    ) {
        (Onset::At(onset_a), Onset::At(onset_b)) => (onset_a, onset_b),
        (Onset::NotFound, Onset::At(_)) => return Err(no_transient(Side::First, threshold)),
        (Onset::At(_), Onset::NotFound) => return Err(no_transient(Side::Second, threshold)),
        (Onset::NotFound, Onset::NotFound) => return Err(no_transient(Side::Both, threshold)),
    };

    let mut length = (a.len() - onset_a).min(b.len() - onset_b);
    if let Some(max) = max_duration {
        length = length
            .min(a.duration_to_samples(max))
            .min(b.duration_to_samples(max));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(onset_a, onset_b, length, "aligned pair at transients");

    Ok(AlignmentResult {
        onset_a,
        onset_b,
        length,
    })
}

fn no_transient(side: Side, threshold: f32) -> AnalysisError {
    AnalysisError::NoTransient { side, threshold }
}
