//! Immutable mono sample buffer paired with its sample rate.

use std::time::Duration;

use crate::error::{AnalysisError, Result};
use crate::math::{ms_to_samples, samples_to_ms};

/// A decoded mono recording.
///
/// Built once by the loader and never mutated; every analysis borrows the
/// samples and returns derived values. Sample values are normalized to the
/// range implied by the source bit depth (PCM16 divides by 32768).
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Signal {
    /// Wrap decoded samples. Fails if `sample_rate` is zero or any sample is
    /// NaN or infinite.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate);
        }
        if let Some(index) = samples.iter().position(|x| !x.is_finite()) {
            return Err(AnalysisError::NonFiniteSample { index });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Borrow the samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the signal holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Convert a sample count at this signal's rate to milliseconds.
    pub fn samples_to_ms(&self, samples: usize) -> f32 {
        samples_to_ms(samples, self.sample_rate)
    }

    /// Convert milliseconds to a sample count at this signal's rate (floor).
    pub fn ms_to_samples(&self, ms: f32) -> usize {
        ms_to_samples(ms, self.sample_rate)
    }

    /// Convert a duration to a sample count at this signal's rate (floor).
    pub fn duration_to_samples(&self, duration: Duration) -> usize {
        let samples = duration.as_secs_f64() * f64::from(self.sample_rate);
        // Guard against 440.99999 style products landing one sample short
        (samples + 1e-9).floor() as usize
    }

    /// Copy `len` samples starting at `start` into a new signal with the same rate.
    ///
    /// The range is clamped to the signal's extent.
    pub fn slice(&self, start: usize, len: usize) -> Signal {
        let start = start.min(self.samples.len());
        let end = start.saturating_add(len).min(self.samples.len());
        Signal {
            samples: self.samples[start..end].to_vec(),
            sample_rate: self.sample_rate,
        }
    }
}

impl AsRef<[f32]> for Signal {
    fn as_ref(&self) -> &[f32] {
        &self.samples
    }
}
