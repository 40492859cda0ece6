//! `hopvad` — hop-by-hop voice activity detection over 16-bit PCM audio.
//!
//! This crate provides:
//! - WAV loading and channel reduction into a mono analysis stream
//! - Fixed-size framing into hops
//! - A pluggable inference-engine boundary (plus a built-in energy engine)
//! - Thresholding, timing (RTF) and text/JSON reports
//!
//! The acoustic model is not part of this crate: anything implementing
//! [`engine::InferenceEngine`] can drive the pipeline.

// High-level API (most consumers should start here).
pub mod opts;
pub mod pipeline;

// Audio loading and framing.
pub mod audio;
pub mod framer;
pub mod wav;

// Inference boundary and per-hop decisions.
pub mod decision;
pub mod engine;

// Reports and output formats.
pub mod output_type;
pub mod report;
pub mod text_encoder;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use error::{Error, Result, UnsupportedFormat};
