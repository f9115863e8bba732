//! Level and time conversions shared by the analyzers.
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear ratio
//! - [`ms_to_samples`] / [`samples_to_ms`] - Time conversions at a given rate
//! - [`duration_ms`] - A [`Duration`] in milliseconds for reports

use std::time::Duration;

/// Convert decibels to a linear amplitude ratio (`10^(db/20)`).
///
/// # Example
/// ```rust
/// use drumcheck_analysis::math::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert a linear amplitude to decibels.
///
/// Values at or below 1e-10 are reported as -200 dB (silence).
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear > 1e-10 {
        20.0 * linear.log10()
    } else {
        -200.0
    }
}

/// Convert milliseconds to a whole number of samples (floor).
///
/// Negative or non-finite inputs yield 0.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: u32) -> usize {
    let samples = f64::from(ms) * f64::from(sample_rate) / 1000.0;
    if samples.is_finite() && samples > 0.0 {
        (samples + 1e-9).floor() as usize
    } else {
        0
    }
}

/// Convert a sample count to milliseconds.
#[inline]
pub fn samples_to_ms(samples: usize, sample_rate: u32) -> f32 {
    (samples as f64 * 1000.0 / f64::from(sample_rate)) as f32
}

/// Express a duration in milliseconds.
#[inline]
pub fn duration_ms(duration: Duration) -> f32 {
    (duration.as_nanos() as f64 / 1e6) as f32
}
