//! Header details and a quick level readout for one WAV file.

use clap::Args;
use drumcheck_analysis::math::linear_to_db;
use drumcheck_analysis::transient::DEFAULT_ONSET_THRESHOLD;
use drumcheck_analysis::{detect_onset, find_peak};
use drumcheck_io::{WavFormat, read_wav, read_wav_info};
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// WAV file to inspect
    #[arg(value_name = "INPUT")]
    input: PathBuf,
}

pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.input)?;
    let encoding = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", args.input.display());
    println!("Format:      {encoding} {}-bit", info.spec.bits_per_sample);
    println!("Channels:    {}", info.spec.channels);
    println!("Sample Rate: {} Hz", info.spec.sample_rate);
    println!(
        "Duration:    {:.1} ms ({} frames)",
        info.duration_secs() * 1000.0,
        info.frames
    );

    // Levels are read from the mono mixdown the analyses see
    let (signal, _) = read_wav(&args.input)?;
    match find_peak(signal.samples()) {
        Ok(peak) => println!(
            "Peak:        {:.1} dBFS at {:.2} ms",
            linear_to_db(peak.magnitude()),
            signal.samples_to_ms(peak.index)
        ),
        Err(_) => println!("Peak:        n/a (no samples)"),
    }
    match detect_onset(signal.samples(), DEFAULT_ONSET_THRESHOLD).index() {
        Some(i) => println!("Onset:       {:.2} ms", signal.samples_to_ms(i)),
        None => println!("Onset:       none above {DEFAULT_ONSET_THRESHOLD}"),
    }

    Ok(())
}
