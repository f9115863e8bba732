//! Property-based tests for the envelope, RMS and alignment invariants.

use drumcheck_analysis::{
    Signal, Threshold, align, attack_time, decay_time, find_peak, windowed_rms,
};
use proptest::prelude::*;

fn samples() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1.0f32..=1.0f32, 1..400)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A deeper attenuation can never be reached earlier than a shallower one.
    #[test]
    fn decay_is_monotonic_in_threshold(
        signal in samples(),
        a in -90.0f32..=0.0,
        b in -90.0f32..=0.0,
    ) {
        let (deep, shallow) = if a < b { (a, b) } else { (b, a) };
        let peak = find_peak(&signal).unwrap();

        let decay = |db: f32| {
            decay_time(&signal, peak.index, peak.value, Threshold::decay(db).unwrap()).unwrap()
        };
        let (deep_t, shallow_t) = (decay(deep), decay(shallow));

        if let (Some(d), Some(s)) = (deep_t.samples(), shallow_t.samples()) {
            prop_assert!(d >= s, "{deep} dB at {d} but {shallow} dB at {s}");
        }
        if deep_t.is_reached() {
            prop_assert!(shallow_t.is_reached());
        }
    }

    /// Peak lies inside the signal, attack starts at or before it, and any
    /// crossing lies between the peak and the end.
    #[test]
    fn peak_and_attack_bounds(signal in samples(), db in -90.0f32..=0.0) {
        let threshold = Threshold::decay(db).unwrap();
        let peak = find_peak(&signal).unwrap();
        prop_assert!(peak.index < signal.len());

        let attack = attack_time(&signal, peak.index, peak.value, threshold).unwrap();
        prop_assert!(attack.start <= peak.index);
        prop_assert_eq!(attack.start + attack.samples, peak.index);

        if let Some(n) = decay_time(&signal, peak.index, peak.value, threshold).unwrap().samples() {
            prop_assert!(peak.index + n < signal.len());
        }
    }

    /// RMS windows cover the whole signal and are never negative.
    #[test]
    fn rms_profile_covers_signal(signal in samples(), window in 1usize..64) {
        let profile = windowed_rms(&signal, window).unwrap();
        prop_assert_eq!(profile.len(), signal.len().div_ceil(window));
        prop_assert_eq!(profile.iter().map(|w| w.len).sum::<usize>(), signal.len());
        prop_assert!(profile.iter().all(|w| w.rms >= 0.0));
    }

    /// Aligning a signal with itself gives equal onsets and identical slices.
    #[test]
    fn self_alignment_is_idempotent(mut signal in samples(), spike in 0usize..400) {
        let spike = spike % signal.len();
        signal[spike] = 1.0;
        let signal = Signal::new(signal, 44100).unwrap();

        let alignment = align(&signal, &signal, 0.5, None).unwrap();
        prop_assert_eq!(alignment.onset_a, alignment.onset_b);
        let (a, b) = alignment.slices(&signal, &signal);
        prop_assert_eq!(a, b);
    }
}
