//! Integration tests for drumcheck-cli.
//!
//! Each test runs the `drumcheck` binary against WAV or raw files written to
//! a temporary directory. `XDG_CONFIG_HOME` and `HOME` point into that
//! directory so a real user profile never leaks into the results.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use drumcheck_io::{WavSpec, write_raw_f32, write_wav};
use tempfile::TempDir;

/// Helper to get the `drumcheck` binary with an isolated config directory.
fn drumcheck(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_drumcheck"));
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("HOME", home)
        .env_remove("RUST_LOG");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run drumcheck")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Decaying 60 Hz kick after `lead` samples of silence.
fn kick(sample_rate: u32, lead: usize) -> Vec<f32> {
    let mut samples = vec![0.0; lead];
    samples.extend((0..sample_rate as usize / 2).map(|i| {
        let t = i as f32 / sample_rate as f32;
        let click = if i < 6 { 0.3 } else { 0.0 };
        0.8 * (-t * 10.0).exp() * (2.0 * std::f32::consts::PI * 60.0 * t).sin() + click
    }));
    samples
}

fn write_kick(dir: &Path, name: &str, sample_rate: u32, lead: usize) -> PathBuf {
    let path = dir.join(name);
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
    };
    write_wav(&path, &kick(sample_rate, lead), spec).unwrap();
    path
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// drumcheck info
// ---------------------------------------------------------------------------

#[test]
fn info_shows_header_and_onset() {
    let dir = TempDir::new().unwrap();
    let wav = write_kick(dir.path(), "kick.wav", 48000, 480);

    let output = run(drumcheck(dir.path()).arg("info").arg(&wav));
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Sample Rate: 48000 Hz"), "{text}");
    assert!(text.contains("PCM 16-bit"), "{text}");
    assert!(text.contains("Onset:       10.00 ms"), "{text}");
}

// ---------------------------------------------------------------------------
// drumcheck analyze
// ---------------------------------------------------------------------------

#[test]
fn analyze_prints_report_and_writes_json() {
    let dir = TempDir::new().unwrap();
    let wav = write_kick(dir.path(), "kick.wav", 44100, 441);
    let json = dir.path().join("report.json");

    let output = run(drumcheck(dir.path())
        .arg("analyze")
        .arg(&wav)
        .arg("--json")
        .arg(&json));
    assert!(output.status.success(), "{output:?}");

    let text = stdout(&output);
    assert!(text.contains("Decay:"), "{text}");
    assert!(text.contains("-40 dB"), "{text}");

    let report = read_json(&json);
    assert_eq!(report["profile"], "default");
    assert_eq!(report["summary"]["sample_rate"], 44100);
    assert_eq!(report["summary"]["onset"]["index"], 441);
    assert_eq!(report["summary"]["analysis"]["decays"].as_array().unwrap().len(), 4);
}

#[test]
fn analyze_raw_input_uses_given_rate() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("render.f32");
    write_raw_f32(&raw, &kick(48000, 0)).unwrap();
    let json = dir.path().join("raw.json");

    let output = run(drumcheck(dir.path())
        .args(["analyze", "--raw", "--sample-rate", "48000"])
        .arg(&raw)
        .arg("--json")
        .arg(&json));
    assert!(output.status.success(), "{output:?}");
    assert_eq!(read_json(&json)["summary"]["sample_rate"], 48000);
}

#[test]
fn analyze_raw_without_rate_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = run(drumcheck(dir.path()).args(["analyze", "--raw", "x.f32"]));
    assert!(!output.status.success());
}

#[test]
fn analyze_writes_curves() {
    let dir = TempDir::new().unwrap();
    let wav = write_kick(dir.path(), "kick.wav", 44100, 0);
    let curves = dir.path().join("curves");

    let output = run(drumcheck(dir.path())
        .arg("analyze")
        .arg(&wav)
        .arg("--curves")
        .arg(&curves));
    assert!(output.status.success(), "{output:?}");
    assert!(curves.join("input_waveform.csv").is_file());
    assert!(curves.join("input_rms.csv").is_file());
}

#[test]
fn analyze_uses_explicit_profile() {
    let dir = TempDir::new().unwrap();
    let wav = write_kick(dir.path(), "kick.wav", 44100, 0);
    let profile = dir.path().join("snare.toml");
    std::fs::write(&profile, "name = \"snare\"\ndecay_thresholds_db = [-3.0]\n").unwrap();
    let json = dir.path().join("out.json");

    let output = run(drumcheck(dir.path())
        .arg("analyze")
        .arg(&wav)
        .arg("--config")
        .arg(&profile)
        .arg("--json")
        .arg(&json));
    assert!(output.status.success(), "{output:?}");

    let report = read_json(&json);
    assert_eq!(report["profile"], "snare");
    assert_eq!(report["summary"]["analysis"]["decays"].as_array().unwrap().len(), 1);
}

#[test]
fn analyze_rejects_invalid_profile() {
    let dir = TempDir::new().unwrap();
    let wav = write_kick(dir.path(), "kick.wav", 44100, 0);
    let profile = dir.path().join("bad.toml");
    std::fs::write(&profile, "decay_thresholds_db = [6.0]\n").unwrap();

    let output = run(drumcheck(dir.path())
        .arg("analyze")
        .arg(&wav)
        .arg("--config")
        .arg(&profile));
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// drumcheck compare
// ---------------------------------------------------------------------------

#[test]
fn compare_aligns_shifted_copy() {
    let dir = TempDir::new().unwrap();
    let reference = write_kick(dir.path(), "reference.wav", 44100, 100);
    let candidate = write_kick(dir.path(), "candidate.wav", 44100, 1000);
    let json = dir.path().join("compare.json");

    let output = run(drumcheck(dir.path())
        .arg("compare")
        .arg(&reference)
        .arg(&candidate)
        .arg("--json")
        .arg(&json));
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("Alignment"));

    let report = read_json(&json);
    assert_eq!(report["comparison"]["status"], "completed");
    let report = &report["comparison"]["report"];
    assert_eq!(report["alignment"]["onset_a"], 100);
    assert_eq!(report["alignment"]["onset_b"], 1000);
    assert_eq!(report["peak_time_diff_ms"], 0.0);
    assert_eq!(report["similarity"]["mse"], 0.0);
}

#[test]
fn compare_across_rates_skips_similarity() {
    let dir = TempDir::new().unwrap();
    let reference = write_kick(dir.path(), "reference.wav", 44100, 0);
    let candidate = write_kick(dir.path(), "candidate.wav", 48000, 0);
    let json = dir.path().join("compare.json");

    let output = run(drumcheck(dir.path())
        .arg("compare")
        .arg(&reference)
        .arg(&candidate)
        .arg("--json")
        .arg(&json));
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("sample rates differ"));

    let report = read_json(&json);
    assert!(report["comparison"]["report"]["similarity"].is_null());
    assert!(!report["comparison"]["report"]["points"].as_array().unwrap().is_empty());
}

#[test]
fn compare_wav_reference_with_raw_candidate() {
    let dir = TempDir::new().unwrap();
    let reference = write_kick(dir.path(), "reference.wav", 44100, 441);
    let candidate = dir.path().join("render.f32");
    write_raw_f32(&candidate, &kick(48000, 0)).unwrap();
    let json = dir.path().join("compare.json");

    let output = run(drumcheck(dir.path())
        .arg("compare")
        .arg(&reference)
        .arg(&candidate)
        .args(["--candidate-raw", "--candidate-rate", "48000"])
        .arg("--json")
        .arg(&json));
    assert!(output.status.success(), "{output:?}");

    let report = &read_json(&json)["comparison"]["report"];
    assert_eq!(report["reference"]["sample_rate"], 44100);
    assert_eq!(report["candidate"]["sample_rate"], 48000);
    assert_eq!(report["alignment"]["onset_a"], 441);
    assert_eq!(report["alignment"]["onset_b"], 0);
    assert!(report["similarity"].is_null());
}

#[test]
fn compare_raw_pair_at_different_rates() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("reference.f32");
    let candidate = dir.path().join("candidate.f32");
    write_raw_f32(&reference, &kick(44100, 0)).unwrap();
    write_raw_f32(&candidate, &kick(96000, 0)).unwrap();

    let output = run(drumcheck(dir.path())
        .arg("compare")
        .arg(&reference)
        .arg(&candidate)
        .args(["--reference-raw", "--reference-rate", "44100"])
        .args(["--candidate-raw", "--candidate-rate", "96000"]));
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("sample rates differ"));
}

#[test]
fn compare_raw_side_without_rate_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = run(drumcheck(dir.path()).args(["compare", "a.wav", "b.f32", "--candidate-raw"]));
    assert!(!output.status.success());
}

#[test]
fn compare_with_sub_sample_cap_names_the_cap() {
    let dir = TempDir::new().unwrap();
    let reference = write_kick(dir.path(), "reference.wav", 44100, 0);
    let profile = dir.path().join("tiny.toml");
    std::fs::write(&profile, "max_duration_ms = 0.01\n").unwrap();

    let output = run(drumcheck(dir.path())
        .arg("compare")
        .arg(&reference)
        .arg(&reference)
        .arg("--config")
        .arg(&profile));
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max duration of 0.01 ms"), "{stderr}");
}

#[test]
fn compare_with_missing_reference_still_analyzes_candidate() {
    let dir = TempDir::new().unwrap();
    let candidate = write_kick(dir.path(), "candidate.wav", 44100, 0);
    let json = dir.path().join("compare.json");

    let output = run(drumcheck(dir.path())
        .arg("compare")
        .arg(dir.path().join("missing.wav"))
        .arg(&candidate)
        .arg("--json")
        .arg(&json));
    assert!(output.status.success(), "{output:?}");

    let text = stdout(&output);
    assert!(text.contains("Comparison skipped"), "{text}");
    assert!(text.contains("Decay:"), "{text}");

    let report = read_json(&json);
    assert_eq!(report["comparison"]["status"], "skipped");
    assert!(report["comparison"]["candidate"]["analysis"]["peak"].is_object());
}

#[test]
fn compare_with_silent_candidate_fails() {
    let dir = TempDir::new().unwrap();
    let reference = write_kick(dir.path(), "reference.wav", 44100, 0);
    let silent = dir.path().join("silent.wav");
    write_wav(&silent, &[0.0; 4410], WavSpec::default()).unwrap();

    let output = run(drumcheck(dir.path())
        .arg("compare")
        .arg(&reference)
        .arg(&silent));
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no transient"), "{stderr}");
}

// ---------------------------------------------------------------------------
// drumcheck profile
// ---------------------------------------------------------------------------

#[test]
fn profile_prints_defaults_as_toml() {
    let dir = TempDir::new().unwrap();
    let output = run(drumcheck(dir.path()).arg("profile"));
    assert!(output.status.success(), "{output:?}");

    let text = stdout(&output);
    assert!(text.contains("decay_thresholds_db"), "{text}");
    assert!(text.contains("onset_threshold = 0.05"), "{text}");
}

#[test]
fn profile_write_then_reuse() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profiles/mine.toml");

    let output = run(drumcheck(dir.path())
        .args(["profile", "--write"])
        .arg(&path));
    assert!(output.status.success(), "{output:?}");
    assert!(path.is_file());

    let output = run(drumcheck(dir.path()).arg("profile").arg("--config").arg(&path));
    assert!(output.status.success());
    assert!(stdout(&output).contains("name = \"default\""));
}
