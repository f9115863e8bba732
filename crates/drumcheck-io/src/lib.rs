//! Audio loading for drumcheck.
//!
//! This crate turns recordings on disk into [`Signal`]s:
//!
//! - **WAV files**: [`read_wav`] decodes PCM or float WAV and mixes
//!   multi-channel audio down to mono; [`read_wav_info`] reads the header only
//! - **Raw float32**: [`read_raw_f32`] loads a headerless little-endian
//!   `f32` array at a caller-supplied sample rate
//! - **Dispatch**: [`load_signal`] picks the decoder from a [`SourceFormat`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use drumcheck_io::{SourceFormat, load_signal};
//!
//! let reference = load_signal("reference.wav", SourceFormat::Wav)?;
//! let candidate = load_signal("render.f32", SourceFormat::RawF32 { sample_rate: 48000 })?;
//! ```

mod raw;
mod wav;

use std::path::Path;

use drumcheck_analysis::{AnalysisError, Signal};

pub use raw::{decode_raw_f32, read_raw_f32, write_raw_f32};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio loading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// A raw float32 file whose size is not a whole number of samples.
    #[error("Raw float32 data is {len} bytes, not a multiple of 4")]
    RawLength {
        /// Byte length of the data.
        len: usize,
    },

    /// Decoded audio could not form a valid signal.
    #[error("Invalid signal: {0}")]
    Analysis(#[from] AnalysisError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio loading.
pub type Result<T> = std::result::Result<T, Error>;

/// How a recording is encoded on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// RIFF/WAVE container; the sample rate comes from the header.
    Wav,
    /// Headerless little-endian float32 samples.
    RawF32 {
        /// Sample rate in Hz.
        sample_rate: u32,
    },
}

/// Load a mono [`Signal`] from `path`.
pub fn load_signal<P: AsRef<Path>>(path: P, format: SourceFormat) -> Result<Signal> {
    match format {
        SourceFormat::Wav => read_wav(path).map(|(signal, _)| signal),
        SourceFormat::RawF32 { sample_rate } => read_raw_f32(path, sample_rate),
    }
}
