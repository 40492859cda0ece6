use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::audio::AudioStream;
use crate::error::{Result, UnsupportedFormat};

/// Load a WAV file from disk into a mono analysis stream.
///
/// See [`load_from_reader`] for the format rules.
pub fn load(path: impl AsRef<Path>) -> Result<AudioStream> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        std::io::Error::new(
            err.kind(),
            format!("could not open '{}': {err}", path.display()),
        )
    })?;

    let stream = load_from_reader(BufReader::new(file))?;
    tracing::debug!(
        path = %path.display(),
        sample_rate = stream.sample_rate(),
        source_channels = stream.source_channels(),
        samples = stream.len(),
        "loaded wav"
    );
    Ok(stream)
}

/// Decode WAV data from a reader into a mono analysis stream.
///
/// Format requirements:
/// - integer PCM, 16 bits per sample
/// - 1 or 2 channels (stereo keeps the left channel)
///
/// The format is checked from the header before any sample is read, so an unsupported file
/// fails fast without decoding its data chunk.
pub fn load_from_reader<R>(reader: R) -> Result<AudioStream>
where
    R: Read + Seek,
{
    let mut reader = WavReader::new(reader)?;
    let spec = reader.spec();

    if spec.sample_format == SampleFormat::Float {
        return Err(UnsupportedFormat::FloatSamples {
            bits: spec.bits_per_sample,
        }
        .into());
    }

    if spec.bits_per_sample != 16 {
        return Err(UnsupportedFormat::BitDepth {
            bits: spec.bits_per_sample,
        }
        .into());
    }

    if spec.channels != 1 && spec.channels != 2 {
        return Err(UnsupportedFormat::Channels {
            channels: spec.channels,
        }
        .into());
    }

    // A short data chunk surfaces here as an `UnexpectedEof` I/O error.
    let interleaved = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    AudioStream::from_interleaved(spec.sample_rate, spec.channels, interleaved)
}
