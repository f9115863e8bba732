//! Level measurements over time.
//!
//! - [`rms`] / [`rms_db`] - RMS level of a slice
//! - [`windowed_rms`] - Non-overlapping RMS energy profile
//! - [`prefix_rms`] - RMS of the first N samples, for several N

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::math::linear_to_db;

/// Compute RMS (Root Mean Square) level of a signal
///
/// Returns RMS value in linear scale (not dB). An empty slice has RMS 0.
pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = signal.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    (sum_sq / signal.len() as f64).sqrt() as f32
}

/// Compute RMS level in dB
pub fn rms_db(signal: &[f32]) -> f32 {
    linear_to_db(rms(signal))
}

/// RMS of one window of an energy profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RmsWindow {
    /// Index of the first sample in the window.
    pub start: usize,
    /// Number of samples the RMS was computed over.
    pub len: usize,
    /// Linear RMS level.
    pub rms: f32,
}

/// Partition a signal into consecutive non-overlapping windows and compute
/// the RMS of each.
///
/// The last window holds whatever samples remain and is never zero-padded,
/// so a quiet tail is not biased low by padding.
///
/// # Arguments
/// * `signal` - Input signal
/// * `window_len` - Window length in samples (must be > 0)
pub fn windowed_rms(signal: &[f32], window_len: usize) -> Result<Vec<RmsWindow>> {
    if window_len == 0 {
        return Err(AnalysisError::InvalidWindow);
    }

    Ok(signal
        .chunks(window_len)
        .enumerate()
        .map(|(i, chunk)| RmsWindow {
            start: i * window_len,
            len: chunk.len(),
            rms: rms(chunk),
        })
        .collect())
}

/// RMS over the start of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrefixRms {
    /// Requested prefix length in samples.
    pub requested: usize,
    /// Samples actually measured (clamped to the signal length).
    pub measured: usize,
    /// Linear RMS level.
    pub rms: f32,
}

/// RMS of the first `n` samples for every `n` in `lengths`.
///
/// Prefixes longer than the signal are clamped to its length.
pub fn prefix_rms(signal: &[f32], lengths: &[usize]) -> Vec<PrefixRms> {
    lengths
        .iter()
        .map(|&requested| {
            let measured = requested.min(signal.len());
            PrefixRms {
                requested,
                measured,
                rms: rms(&signal[..measured]),
            }
        })
        .collect()
}
