//! 16-bit PCM mono WAV files via `hound`.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::Result;

/// File name of the scratch recording in the temp directory.
pub const TEMP_WAV_NAME: &str = "maid_san_input.wav";

/// Default scratch path: `<tmp>/maid_san_input.wav`.
pub fn temp_wav_path() -> PathBuf {
    std::env::temp_dir().join(TEMP_WAV_NAME)
}

/// Write mono `[-1.0, 1.0]` samples as 16-bit PCM.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(to_i16(sample))?;
    }
    writer.finalize()?;
    Ok(())
}

/// Read a WAV file as mono f32 samples plus its sample rate.
///
/// Multi-channel files are averaged down to mono.
pub fn read_wav(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };
    Ok((crate::dsp::to_mono(&interleaved, spec.channels), spec.sample_rate))
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
