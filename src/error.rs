use std::error::Error as StdError;

use thiserror::Error;

/// hopvad's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// hopvad's crate-wide error type.
///
/// Every variant is fatal to the run that produced it. The pipeline surfaces the first error it
/// sees and never builds a partial report.
#[derive(Debug, Error)]
pub enum Error {
    /// Opening, reading or writing a file failed, or the container is truncated or corrupt.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not 16-bit linear PCM with one or two channels.
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(UnsupportedFormat),

    /// The inference engine could not produce a usable probability for a hop.
    #[error("inference failed at hop {hop_index}: {source}")]
    Inference {
        hop_index: usize,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// A pipeline setting is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Message(String),
}

/// What exactly was wrong with an input's format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedFormat {
    #[error("{bits}-bit samples (only 16-bit PCM is supported)")]
    BitDepth { bits: u16 },

    #[error("{bits}-bit floating-point samples (only 16-bit integer PCM is supported)")]
    FloatSamples { bits: u16 },

    #[error("{channels} channels (only mono or stereo is supported)")]
    Channels { channels: u16 },

    #[error("sample rate must be positive")]
    ZeroSampleRate,

    #[error("expected {expected} Hz sample rate, got {actual} Hz")]
    SampleRate { expected: u32, actual: u32 },
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn inference(
        hop_index: usize,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::Inference {
            hop_index,
            source: source.into(),
        }
    }

    /// The hop index an inference failure happened at, if this is one.
    pub fn hop_index(&self) -> Option<usize> {
        match self {
            Self::Inference { hop_index, .. } => Some(*hop_index),
            _ => None,
        }
    }
}

impl From<UnsupportedFormat> for Error {
    fn from(err: UnsupportedFormat) -> Self {
        Self::UnsupportedFormat(err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.into())
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(err) => Self::Io(err),
            hound::Error::FormatError(reason) => Self::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("malformed WAV data: {reason}"),
            )),
            other => Self::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                other.to_string(),
            )),
        }
    }
}
