//! Local waveform-shape statistics.
//!
//! A piecewise-linear (triangle) segment has constant slope, so the spread
//! of its first differences is near zero; a curved (sine-like) segment has a
//! slope that changes sample to sample. [`classify_local_shape`] returns
//! that spread and leaves the linear/curved decision to a caller-supplied
//! cutoff, since "low" depends on the signal's scale.

use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Linear/curved label produced by [`ShapeStatistic::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalShape {
    /// Slope is near constant (triangle-like).
    Linear,
    /// Slope varies (sine-like or otherwise non-linear).
    Curved,
}

/// First-difference statistics of a window around a sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeStatistic {
    /// Window centre.
    pub center: usize,
    /// Samples taken on each side of the centre.
    pub half_width: usize,
    /// Differences between consecutive samples in the window.
    pub slopes: Vec<f32>,
    /// Mean of `slopes`.
    pub mean_slope: f32,
    /// Population standard deviation of `slopes`.
    pub slope_std_dev: f32,
}

impl ShapeStatistic {
    /// Label the window as linear when its slope spread is at or below `cutoff`.
    pub fn classify(&self, cutoff: f32) -> LocalShape {
        if self.slope_std_dev <= cutoff {
            LocalShape::Linear
        } else {
            LocalShape::Curved
        }
    }
}

/// Compute slope statistics over `signal[center - half_width .. center + half_width]`.
///
/// Fails with [`AnalysisError::OutOfBounds`] when the window does not fit in
/// the signal or `half_width` is zero.
pub fn classify_local_shape(
    signal: &[f32],
    center: usize,
    half_width: usize,
) -> Result<ShapeStatistic> {
    let out_of_bounds = AnalysisError::OutOfBounds {
        center,
        half_width,
        len: signal.len(),
    };
    if half_width == 0 {
        return Err(out_of_bounds);
    }
    let start = center.checked_sub(half_width).ok_or(out_of_bounds.clone())?;
    let end = center
        .checked_add(half_width)
        .filter(|&end| end <= signal.len())
        .ok_or(out_of_bounds)?;

    let slopes: Vec<f32> = signal[start..end].windows(2).map(|w| w[1] - w[0]).collect();

    let n = slopes.len() as f64;
    let mean = slopes.iter().map(|&d| f64::from(d)).sum::<f64>() / n;
    let variance = slopes
        .iter()
        .map(|&d| (f64::from(d) - mean).powi(2))
        .sum::<f64>()
        / n;

    Ok(ShapeStatistic {
        center,
        half_width,
        slopes,
        mean_slope: mean as f32,
        slope_std_dev: variance.sqrt() as f32,
    })
}

/// Index of the largest-magnitude sample in `signal[start .. start + len]`.
///
/// Returns `None` if the range is empty after clamping to the signal.
pub fn loudest_in(signal: &[f32], start: usize, len: usize) -> Option<usize> {
    let end = start.saturating_add(len).min(signal.len());
    let range = signal.get(start..end)?;
    let mut best: Option<(usize, f32)> = None;
    for (i, x) in range.iter().enumerate() {
        if best.is_none_or(|(_, m)| x.abs() > m) {
            best = Some((i, x.abs()));
        }
    }
    best.map(|(i, _)| start + i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn triangle(len: usize, period: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let phase = (i % period) as f32 / period as f32;
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            })
            .collect()
    }

    #[test]
    fn straight_ramp_has_zero_spread() {
        let ramp: Vec<f32> = (0..100).map(|i| i as f32 * 0.01).collect();
        let stat = classify_local_shape(&ramp, 50, 10).unwrap();

        assert_eq!(stat.slopes.len(), 19);
        assert!(stat.slope_std_dev < 1e-6);
        assert!((stat.mean_slope - 0.01).abs() < 1e-6);
        assert_eq!(stat.classify(1e-4), LocalShape::Linear);
    }

    #[test]
    fn sine_is_more_curved_than_triangle() {
        let period = 200;
        let sine: Vec<f32> = (0..1000)
            .map(|i| (2.0 * PI * i as f32 / period as f32).sin())
            .collect();
        let tri = triangle(1000, period);

        // Centre on a rising zero crossing of the triangle, away from its corners
        let tri_stat = classify_local_shape(&tri, 250, 10).unwrap();
        // Sine peak at a quarter period, where curvature is largest
        let sine_stat = classify_local_shape(&sine, 250, 10).unwrap();

        assert!(tri_stat.slope_std_dev < 1e-5);
        assert!(sine_stat.slope_std_dev > 10.0 * tri_stat.slope_std_dev);
        assert_eq!(sine_stat.classify(1e-3), LocalShape::Curved);
    }

    #[test]
    fn window_must_fit() {
        let signal = [0.0; 20];
        assert!(classify_local_shape(&signal, 10, 10).is_ok());
        assert_eq!(
            classify_local_shape(&signal, 5, 10),
            Err(AnalysisError::OutOfBounds {
                center: 5,
                half_width: 10,
                len: 20
            })
        );
        assert!(classify_local_shape(&signal, 15, 10).is_err());
        assert!(classify_local_shape(&signal, 10, 0).is_err());
    }

    #[test]
    fn loudest_in_clamps_range() {
        let signal = [0.1, -0.8, 0.3, 0.9, 0.2];
        assert_eq!(loudest_in(&signal, 0, 3), Some(1));
        assert_eq!(loudest_in(&signal, 2, 100), Some(3));
        assert_eq!(loudest_in(&signal, 9, 3), None);
    }
}
