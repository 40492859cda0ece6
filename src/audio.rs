//! The in-memory analysis stream.
//!
//! Whatever the source container looked like, the pipeline only ever sees one channel of
//! signed 16-bit samples at a known rate.

use crate::error::{Result, UnsupportedFormat};

/// A single-channel run of `i16` samples, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStream {
    sample_rate: u32,
    source_channels: u16,
    samples: Vec<i16>,
}

impl AudioStream {
    /// Wrap mono samples.
    pub fn mono(sample_rate: u32, samples: Vec<i16>) -> Result<Self> {
        Self::from_interleaved(sample_rate, 1, samples)
    }

    /// Build an analysis stream from interleaved PCM.
    ///
    /// Stereo is reduced by keeping the left channel (every even-indexed sample). The right
    /// channel is discarded, never averaged in. A trailing incomplete frame still contributes its
    /// left sample.
    pub fn from_interleaved(
        sample_rate: u32,
        channels: u16,
        interleaved: Vec<i16>,
    ) -> Result<Self> {
        if sample_rate == 0 {
            return Err(UnsupportedFormat::ZeroSampleRate.into());
        }

        let samples = match channels {
            1 => interleaved,
            2 => interleaved.into_iter().step_by(2).collect(),
            other => return Err(UnsupportedFormat::Channels { channels: other }.into()),
        };

        Ok(Self {
            sample_rate,
            source_channels: channels,
            samples,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count of the analysis stream. Always 1.
    pub fn channel_count(&self) -> u16 {
        1
    }

    /// Channel count of the container this stream was reduced from.
    pub fn source_channels(&self) -> u16 {
        self.source_channels
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of the full, untruncated sample sequence in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        1000.0 * self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}
