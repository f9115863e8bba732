//! WAV decoding into mono signals, and a small writer for fixtures.

use crate::{Error, Result};
use drumcheck_analysis::Signal;
use hound::{SampleFormat, WavReader, WavWriter};
use std::io::Read;
use std::path::Path;

/// Sample encoding of a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Integer PCM.
    Pcm,
    /// IEEE float.
    IeeeFloat,
}

impl From<SampleFormat> for WavFormat {
    fn from(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Int => WavFormat::Pcm,
            SampleFormat::Float => WavFormat::IeeeFloat,
        }
    }
}

/// Channel count, rate and depth of a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Interleaved channels.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
    /// Bits per sample. Writing uses float at 32 bits and PCM below that.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
        }
    }
}

/// Header summary, read without decoding any samples.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Layout of the file.
    pub spec: WavSpec,
    /// Sample encoding.
    pub format: WavFormat,
    /// Frames (samples per channel).
    pub frames: u64,
}

impl WavInfo {
    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / f64::from(self.spec.sample_rate)
    }
}

fn spec_of(spec: hound::WavSpec) -> WavSpec {
    WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
    }
}

/// Read the header of a WAV file.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    Ok(WavInfo {
        spec: spec_of(reader.spec()),
        format: reader.spec().sample_format.into(),
        frames: u64::from(reader.duration()),
    })
}

/// Full-scale value of `bits`-bit PCM.
fn pcm_scale(bits: u16) -> Result<f32> {
    match bits {
        1..=32 => Ok((1u64 << (bits - 1)) as f32),
        _ => Err(Error::UnsupportedFormat(format!("{bits}-bit PCM"))),
    }
}

/// Decode every interleaved sample to `f32` in `[-1, 1)`.
fn decode<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    match spec.sample_format {
        SampleFormat::Float => Ok(reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()?),
        SampleFormat::Int => {
            let scale = pcm_scale(spec.bits_per_sample)?;
            Ok(reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?)
        }
    }
}

/// Average each frame of `channels` interleaved samples.
fn mixdown(samples: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Load a WAV file as a mono [`Signal`] at the file's sample rate.
///
/// Also returns the file layout so callers can report what was mixed down.
///
/// # Example
/// ```ignore
/// let (signal, spec) = read_wav("kick.wav")?;
/// println!("{} samples at {} Hz", signal.len(), signal.sample_rate());
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Signal, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = spec_of(reader.spec());
    let samples = decode(reader)?;

    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        samples = samples.len(),
        "decoded WAV"
    );
    if spec.channels > 1 {
        tracing::warn!(
            path = %path.display(),
            channels = spec.channels,
            "mixing multi-channel WAV down to mono"
        );
    }

    let mono = mixdown(samples, usize::from(spec.channels));
    Ok((Signal::new(mono, spec.sample_rate)?, spec))
}

/// Write interleaved `samples` with the given layout.
///
/// Only 8, 16, 24 (PCM) and 32 (float) bit depths are written.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let sample_format = match spec.bits_per_sample {
        32 => SampleFormat::Float,
        8 | 16 | 24 => SampleFormat::Int,
        bits => return Err(Error::UnsupportedFormat(format!("{bits}-bit output"))),
    };
    let mut writer = WavWriter::create(
        path,
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format,
        },
    )?;

    match sample_format {
        SampleFormat::Float => {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
        }
        SampleFormat::Int => {
            let scale = pcm_scale(spec.bits_per_sample)?;
            for &sample in samples {
                writer.write_sample((sample * scale).clamp(-scale, scale - 1.0) as i32)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}
