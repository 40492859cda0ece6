use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use hopvad::engine::EnergyEngine;
use hopvad::framer::{FramePolicy, frame_count};
use hopvad::logging;
use hopvad::opts::{DEFAULT_HOP_SIZE, DEFAULT_THRESHOLD, PipelineConfig};
use hopvad::output_type::OutputType;
use hopvad::pipeline::Pipeline;
use hopvad::report::summary_lines;
use hopvad::text_encoder::format_line;
use hopvad::wav;

#[derive(Parser, Debug)]
#[command(name = "hopvad")]
#[command(about = "Hop-by-hop voice activity detection for 16-bit PCM WAV files")]
struct Params {
    /// Input WAV file (mono or stereo, 16-bit PCM).
    input_wav: PathBuf,

    /// Where to write the per-hop results.
    output_path: PathBuf,

    /// Probability at or above which a hop counts as voice.
    #[arg(long = "threshold", default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Hop size in samples.
    #[arg(long = "hop-size", default_value_t = DEFAULT_HOP_SIZE)]
    hop_size: usize,

    #[arg(
        short = 'o',
        long = "output-type",
        value_enum,
        default_value_t = OutputType::Text
    )]
    output_type: OutputType,

    /// Process a trailing partial hop (zero-padded) instead of dropping it.
    #[arg(long = "pad-final-hop", default_value_t = false)]
    pad_final_hop: bool,

    /// Reject input at any other sample rate.
    #[arg(long = "sample-rate")]
    sample_rate: Option<u32>,
}

impl Params {
    fn config(&self) -> PipelineConfig {
        let policy = if self.pad_final_hop {
            FramePolicy::Pad
        } else {
            FramePolicy::Truncate
        };

        let cfg = PipelineConfig::default()
            .with_hop_size(self.hop_size)
            .with_threshold(self.threshold)
            .with_frame_policy(policy);

        match self.sample_rate {
            Some(rate) => cfg.with_expected_sample_rate(rate),
            None => cfg,
        }
    }
}

fn main() -> Result<()> {
    logging::init();
    let params = Params::parse();

    let mut pipeline = Pipeline::new(EnergyEngine::default(), params.config())?;

    let stream = wav::load(&params.input_wav)
        .with_context(|| format!("failed to read '{}'", params.input_wav.display()))?;

    let cfg = pipeline.config();
    let frames = frame_count(stream.len(), cfg.hop_size, cfg.frame_policy);
    for line in summary_lines(stream.duration_ms(), frames, cfg.threshold) {
        println!("{line}");
    }

    let report = pipeline
        .run_stream_with(&stream, |result| println!("{}", format_line(result)))
        .context("voice activity detection failed")?;
    println!("{}", report.timing_line());

    report
        .write_results_to_path(&params.output_path, params.output_type)
        .with_context(|| format!("failed to write '{}'", params.output_path.display()))?;
    println!("Results written to {}", params.output_path.display());

    Ok(())
}
