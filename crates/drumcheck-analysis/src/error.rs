//! Error types for the analysis core.
//!
//! These are precondition violations. Conditions that legitimately never
//! occur in a signal (a decay threshold that is never crossed, an onset that
//! never fires) are ordinary return values, see
//! [`DecayOutcome`](crate::envelope::DecayOutcome) and
//! [`Onset`](crate::transient::Onset).

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which signal of an aligned pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The first signal passed to the operation.
    First,
    /// The second signal passed to the operation.
    Second,
    /// Both signals.
    Both,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::First => f.write_str("first signal"),
            Side::Second => f.write_str("second signal"),
            Side::Both => f.write_str("both signals"),
        }
    }
}

/// Errors reported by the analysis core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A peak was requested on a zero-length signal.
    #[error("cannot analyze an empty signal")]
    EmptySignal,

    /// RMS window length was zero.
    #[error("RMS window length must be at least one sample")]
    InvalidWindow,

    /// The shape-classification window does not fit inside the signal.
    #[error(
        "window of half-width {half_width} around sample {center} exceeds signal of {len} samples"
    )]
    OutOfBounds {
        /// Requested window centre.
        center: usize,
        /// Requested half-width.
        half_width: usize,
        /// Length of the signal.
        len: usize,
    },

    /// A peak index handed to a timing scan does not exist in the signal.
    #[error("peak index {index} is outside a signal of {len} samples")]
    PeakOutOfRange {
        /// Offending index.
        index: usize,
        /// Length of the signal.
        len: usize,
    },

    /// No sample crossed the onset threshold, so the pair cannot be aligned.
    #[error("no transient above {threshold} in {side}")]
    NoTransient {
        /// Signal(s) without an onset.
        side: Side,
        /// Absolute threshold that was never exceeded.
        threshold: f32,
    },

    /// A decay threshold must be an attenuation (dB <= 0).
    #[error("threshold of {db} dB is not an attenuation")]
    InvalidThreshold {
        /// Offending value in dB.
        db: f32,
    },

    /// Signals need a positive sample rate.
    #[error("sample rate must be positive")]
    InvalidSampleRate,

    /// A sample is NaN or infinite.
    #[error("sample {index} is not a finite number")]
    NonFiniteSample {
        /// Position of the first offending sample.
        index: usize,
    },

    /// The configured RMS window rounds down to zero samples at the signal's rate.
    #[error("RMS window of {window_ms} ms is shorter than one sample at {sample_rate} Hz")]
    WindowShorterThanSample {
        /// Configured window length.
        window_ms: f32,
        /// Rate of the signal being analyzed.
        sample_rate: u32,
    },

    /// The duration cap left nothing to compare after alignment.
    #[error("max duration of {max_duration_ms} ms leaves no aligned samples to compare")]
    EmptyAlignment {
        /// Configured comparison cap.
        max_duration_ms: f32,
    },
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
