//! Headerless little-endian float32 sample files.

use std::fs;
use std::path::Path;

use drumcheck_analysis::Signal;

use crate::{Error, Result};

/// Decode little-endian `f32` samples from raw bytes.
///
/// Fails with [`Error::RawLength`] if the byte count is not a multiple of 4.
pub fn decode_raw_f32(bytes: &[u8]) -> Result<Vec<f32>> {
    let chunks = bytes.chunks_exact(4);
    if !chunks.remainder().is_empty() {
        return Err(Error::RawLength { len: bytes.len() });
    }
    Ok(chunks
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Load a raw float32 file as a [`Signal`] at `sample_rate`.
pub fn read_raw_f32<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Signal> {
    let path = path.as_ref();
    let samples = decode_raw_f32(&fs::read(path)?)?;
    tracing::debug!(
        path = %path.display(),
        sample_rate,
        samples = samples.len(),
        "decoded raw float32"
    );
    Ok(Signal::new(samples, sample_rate)?)
}

/// Write samples as a raw little-endian float32 file.
pub fn write_raw_f32<P: AsRef<Path>>(path: P, samples: &[f32]) -> Result<()> {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    fs::write(path, bytes)?;
    Ok(())
}
