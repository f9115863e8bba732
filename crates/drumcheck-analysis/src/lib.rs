//! Drumcheck Analysis - envelope and transient comparison for drum samples
//!
//! This crate measures a drum hit and compares a synthesized hit against a
//! reference recording:
//!
//! - [`envelope`] - Peak detection, attack start, decay times at dB thresholds
//! - [`dynamics`] - RMS level, windowed RMS profile, early RMS levels
//! - [`transient`] - Absolute-threshold onsets and pair alignment
//! - [`shape`] - Slope spread around a sample (linear vs curved)
//! - [`compare`] - Aligned A/B comparison built from the above
//! - [`export`] - Optional curve output for plotting
//!
//! Every analysis is a pure function over an immutable [`Signal`]. Outcomes
//! that legitimately never happen (a decay threshold that is never crossed,
//! an onset that never fires) are returned as [`DecayOutcome::NotReached`]
//! and [`Onset::NotFound`]; precondition violations are [`AnalysisError`]s.
//!
//! ## Example Workflow
//!
//! ```rust,ignore
//! use drumcheck_analysis::{ComparisonSettings, Signal, compare_signals};
//!
//! // 1. Load both recordings (see drumcheck-io)
//! let reference = Signal::new(reference_samples, 44100)?;
//! let candidate = Signal::new(candidate_samples, 48000)?;
//!
//! // 2. Align at the transient and compare
//! let report = compare_signals(&reference, &candidate, &ComparisonSettings::default())?;
//!
//! for decay in &report.decay_diffs {
//!     println!("{} dB: {:?}", decay.threshold_db, decay.diff_ms);
//! }
//! ```

pub mod compare;
pub mod dynamics;
pub mod envelope;
pub mod error;
pub mod export;
pub mod math;
pub mod shape;
pub mod signal;
pub mod transient;

// Re-export main types
pub use compare::{
    ComparisonReport, ComparisonSettings, ShapeProbe, SignalSummary, compare_signals, summarize,
};
pub use dynamics::{RmsWindow, prefix_rms, rms, rms_db, windowed_rms};
pub use envelope::{
    AnalysisResult, AnalysisSettings, Attack, DecayOutcome, Peak, Threshold, analyze,
    attack_time, decay_time, find_peak,
};
pub use error::{AnalysisError, Result, Side};
pub use export::{CsvCurveSink, CurveSink};
pub use shape::{LocalShape, ShapeStatistic, classify_local_shape};
pub use signal::Signal;
pub use transient::{AlignmentResult, Onset, align, detect_onset};
