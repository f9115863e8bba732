//! Integration tests for drumcheck-analysis.
//!
//! Exercise the public API with synthetic drum-like signals whose timing is
//! known analytically: exponential decays, impulses after silence, and the
//! same hit shifted in time or recorded at a different rate.

use std::time::Duration;

use drumcheck_analysis::compare::{ComparisonSettings, compare_signals, point_compare};
use drumcheck_analysis::envelope::{AnalysisSettings, DecayOutcome, Threshold, analyze};
use drumcheck_analysis::{
    AnalysisError, Onset, Signal, align, decay_time, detect_onset, find_peak, windowed_rms,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `s[i] = exp(-i / tau)`.
fn exp_decay(len: usize, tau: f32) -> Vec<f32> {
    (0..len).map(|i| (-(i as f32) / tau).exp()).collect()
}

/// A decaying 60 Hz body with a short click, like a synthesized kick.
fn kick_body(len: usize, sample_rate: u32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let click = if i < 8 { 0.4 } else { 0.0 };
            0.9 * (-t * 12.0).exp() * (2.0 * std::f32::consts::PI * 60.0 * t).sin() + click
        })
        .collect()
}

fn with_lead(lead: usize, body: &[f32]) -> Vec<f32> {
    let mut samples = vec![0.0; lead];
    samples.extend_from_slice(body);
    samples
}

// ===========================================================================
// 1. Envelope scenarios
// ===========================================================================

#[test]
fn exponential_decay_minus_6_db() {
    let tau = 200.0;
    let signal = Signal::new(exp_decay(2000, tau), 44100).unwrap();
    let settings = AnalysisSettings::default();
    let result = analyze(&signal, &settings).unwrap();

    let expected = (tau * std::f32::consts::LN_2).round() as i64;
    let measured = result.decay(-6.0).unwrap().samples().unwrap() as i64;
    assert!(
        (measured - expected).abs() <= 1,
        "measured {measured}, expected {expected}"
    );
}

#[test]
fn exponential_decay_deeper_than_floor() {
    let signal = exp_decay(2000, 200.0);
    let threshold = Threshold::decay(-200.0).unwrap();
    assert_eq!(
        decay_time(&signal, 0, signal[0], threshold).unwrap(),
        DecayOutcome::NotReached
    );
}

#[test]
fn impulse_after_silence() {
    let mut samples = vec![0.0; 1000];
    samples[500] = 1.0;

    assert_eq!(detect_onset(&samples, 0.05), Onset::At(500));
    let peak = find_peak(&samples).unwrap();
    assert_eq!((peak.index, peak.value), (500, 1.0));
}

#[test]
fn silence_reports_every_threshold_not_reached() {
    let signal = Signal::new(vec![0.0; 4410], 44100).unwrap();
    let result = analyze(&signal, &AnalysisSettings::default()).unwrap();

    assert!(result.decays.iter().all(|d| d.outcome == DecayOutcome::NotReached));
    assert!(result.decays.iter().all(|d| d.ms.is_none()));
    assert!(result.rms_profile.iter().all(|w| w.rms == 0.0));
}

#[test]
fn empty_signal_is_an_error() {
    let signal = Signal::new(Vec::new(), 44100).unwrap();
    assert_eq!(
        analyze(&signal, &AnalysisSettings::default()),
        Err(AnalysisError::EmptySignal)
    );
}

// ===========================================================================
// 2. RMS profile
// ===========================================================================

#[test]
fn sine_rms_matches_amplitude_over_root_two() {
    let amplitude = 0.5;
    let sine: Vec<f32> = (0..4410 * 4)
        .map(|i| amplitude * (2.0 * std::f32::consts::PI * 10.0 * i as f32 / 44100.0).sin())
        .collect();

    for window in windowed_rms(&sine, 4410).unwrap() {
        assert!((window.rms - amplitude / 2.0_f32.sqrt()).abs() < 1e-3);
    }
}

// ===========================================================================
// 3. Alignment
// ===========================================================================

#[test]
fn self_alignment_is_idempotent() {
    let signal = Signal::new(kick_body(10_000, 44100), 44100).unwrap();
    let alignment = align(&signal, &signal, 0.05, Some(Duration::from_millis(100))).unwrap();

    assert_eq!((alignment.onset_a, alignment.onset_b), (0, 0));
    assert_eq!(alignment.length, 4410);
    let (a, b) = alignment.slices(&signal, &signal);
    assert_eq!(a, b);
}

#[test]
fn shifted_copy_aligns_sample_for_sample() {
    let body = kick_body(6000, 44100);
    let a = Signal::new(with_lead(40, &body), 44100).unwrap();
    let b = Signal::new(with_lead(277, &body), 44100).unwrap();

    let alignment = align(&a, &b, 0.05, None).unwrap();
    assert_eq!(alignment.onset_b - alignment.onset_a, 237);
    assert_eq!(alignment.length, a.len() - alignment.onset_a);

    let (x, y) = alignment.slices(&a, &b);
    assert_eq!(x, y);
}

#[test]
fn stretched_copy_matches_by_time() {
    // Same hit at 22.05 kHz and at 44.1 kHz (each sample held twice),
    // with different amounts of leading silence.
    let body = kick_body(3000, 22050);
    let stretched: Vec<f32> = body.iter().flat_map(|&x| [x, x]).collect();

    let reference = Signal::new(with_lead(100, &body), 22050).unwrap();
    let candidate = Signal::new(with_lead(900, &stretched), 44100).unwrap();

    let alignment = align(&reference, &candidate, 0.05, None).unwrap();
    assert_eq!(alignment.onset_a, 100);
    assert_eq!(alignment.onset_b, 900);

    let (r, c) = alignment.slices(&reference, &candidate);
    for (k, &x) in r.iter().enumerate().take(c.len() / 2) {
        assert_eq!(c[2 * k], x, "sample {k} differs");
    }

    let (ref_slice, cand_slice) = alignment.aligned_signals(&reference, &candidate);
    let points = point_compare(&ref_slice, &cand_slice, Duration::from_millis(6), 20);
    assert!(!points.is_empty());
    assert!(points.iter().all(|p| p.diff == 0.0));
}

#[test]
fn alignment_fails_without_transient() {
    let loud = Signal::new(kick_body(1000, 44100), 44100).unwrap();
    let quiet = Signal::new(vec![0.01; 1000], 44100).unwrap();

    assert!(matches!(
        align(&loud, &quiet, 0.05, None),
        Err(AnalysisError::NoTransient { .. })
    ));
}

// ===========================================================================
// 4. Full comparison
// ===========================================================================

#[test]
fn comparison_of_shifted_copy_matches() {
    let body = kick_body(30_000, 44100);
    let reference = Signal::new(with_lead(0, &body), 44100).unwrap();
    let candidate = Signal::new(with_lead(512, &body), 44100).unwrap();

    let report = compare_signals(&reference, &candidate, &ComparisonSettings::default()).unwrap();

    assert_eq!(report.alignment.onset_b - report.alignment.onset_a, 512);
    assert_eq!(report.peak_time_diff_ms, 0.0);
    for decay in &report.decay_diffs {
        assert_eq!(decay.reference_ms, decay.candidate_ms);
    }
    for ratio in &report.rms_ratios {
        assert!((ratio.ratio.unwrap() - 1.0).abs() < 1e-6);
    }
    let shape = report.reference.shape.as_ref().unwrap();
    assert_eq!(Some(shape), report.candidate.shape.as_ref());
    assert!(report.similarity.unwrap().mse == 0.0);
}

#[test]
fn comparison_detects_slower_decay() {
    let rate = 44100;
    let fast: Vec<f32> = exp_decay(20_000, 400.0);
    let slow: Vec<f32> = exp_decay(20_000, 800.0);
    let reference = Signal::new(fast, rate).unwrap();
    let candidate = Signal::new(slow, rate).unwrap();

    let report = compare_signals(&reference, &candidate, &ComparisonSettings::default()).unwrap();

    for decay in &report.decay_diffs {
        let diff = decay.diff_ms.unwrap();
        assert!(diff > 0.0, "{} dB decay should be slower", decay.threshold_db);
    }
}

#[test]
fn comparison_across_rates_skips_sample_similarity() {
    let reference = Signal::new(kick_body(20_000, 44100), 44100).unwrap();
    let candidate = Signal::new(kick_body(20_000, 48000), 48000).unwrap();

    let report = compare_signals(&reference, &candidate, &ComparisonSettings::default()).unwrap();
    assert!(report.similarity.is_none());
    assert_eq!(report.reference.sample_rate, 44100);
    assert_eq!(report.candidate.sample_rate, 48000);
}
