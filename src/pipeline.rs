//! High-level API for running voice activity detection over a file or stream.
//!
//! [`Pipeline`] owns one inference engine and one validated [`PipelineConfig`], and wires
//! loading -> framing -> inference -> thresholding -> report.
//!
//! The intent is:
//! - Build the engine once (it may be expensive to load).
//! - Reuse the pipeline for many inputs, one at a time.
//! - Keep every stage testable on its own.

use std::path::Path;
use std::time::Instant;

use crate::Result;
use crate::audio::AudioStream;
use crate::decision::{DetectionResult, resolve};
use crate::engine::{EngineSession, InferenceEngine};
use crate::error::UnsupportedFormat;
use crate::framer::{dropped_samples, frame_count, frames};
use crate::opts::PipelineConfig;
use crate::report::{RunReport, rtf};
use crate::wav;

/// The main entry point.
///
/// Runs take `&mut self`: an engine may hold per-stream state, so it is never shared between two
/// streams at once. Processing two streams concurrently needs two pipelines.
pub struct Pipeline<E: InferenceEngine> {
    engine: E,
    config: PipelineConfig,
}

impl<E: InferenceEngine> Pipeline<E> {
    /// Validate `config` and take ownership of `engine`.
    pub fn new(engine: E, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { engine, config })
    }

    /// Load a WAV file and run it.
    ///
    /// Loading happens before the timed section, so file I/O never counts towards the RTF.
    pub fn run(&mut self, path: impl AsRef<Path>) -> Result<RunReport> {
        let stream = wav::load(path)?;
        self.run_stream(&stream)
    }

    /// Run every hop of `stream` through the engine, in order.
    ///
    /// The first failure aborts the run; results from earlier hops are discarded.
    pub fn run_stream(&mut self, stream: &AudioStream) -> Result<RunReport> {
        self.run_stream_with(stream, |_| {})
    }

    /// Like [`Pipeline::run_stream`], calling `on_result` with each hop's result as soon as it
    /// is decided.
    ///
    /// Results seen by `on_result` before a failure are not part of any report.
    pub fn run_stream_with<F>(
        &mut self,
        stream: &AudioStream,
        mut on_result: F,
    ) -> Result<RunReport>
    where
        F: FnMut(&DetectionResult),
    {
        if let Some(expected) = self.config.expected_sample_rate
            && stream.sample_rate() != expected
        {
            return Err(UnsupportedFormat::SampleRate {
                expected,
                actual: stream.sample_rate(),
            }
            .into());
        }

        let PipelineConfig {
            hop_size,
            threshold,
            frame_policy,
            ..
        } = self.config;

        let total_audio_duration_ms = stream.duration_ms();
        let declared = frame_count(stream.len(), hop_size, frame_policy);

        tracing::debug!(
            engine = self.engine.name(),
            sample_rate = stream.sample_rate(),
            samples = stream.len(),
            hop_size,
            threshold,
            frames = declared,
            ?frame_policy,
            "starting run"
        );

        let dropped = dropped_samples(stream.len(), hop_size, frame_policy);
        if dropped > 0 {
            tracing::debug!(
                dropped,
                hop_size,
                "trailing samples do not fill a hop and will not be processed"
            );
        }

        let mut results = Vec::with_capacity(declared);
        let mut session = EngineSession::begin(&mut self.engine);

        let started = Instant::now();
        for hop in frames(stream.samples(), hop_size, frame_policy) {
            let inference = session.infer(hop.index(), hop.samples())?;
            let result = resolve(hop.index(), inference, threshold);

            tracing::trace!(
                index = result.index,
                probability = result.probability,
                is_voice = result.is_voice,
                "hop"
            );
            on_result(&result);
            results.push(result);
        }
        let processing_duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        let report = RunReport {
            total_audio_duration_ms,
            processing_duration_ms,
            rtf: rtf(processing_duration_ms, total_audio_duration_ms),
            sample_rate: stream.sample_rate(),
            frame_count: declared,
            config: self.config.clone(),
            results,
        };

        tracing::debug!(
            frames = report.results.len(),
            voiced = report.voiced_count(),
            processing_ms = report.processing_duration_ms,
            rtf = report.rtf,
            "run finished"
        );

        Ok(report)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Access the engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Access the engine mutably, e.g. to adjust its settings between runs.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Give the engine back.
    pub fn into_engine(self) -> E {
        self.engine
    }
}
