use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::Result;
use crate::decision::DetectionResult;
use crate::opts::PipelineConfig;
use crate::output_type::OutputType;
use crate::text_encoder::TextEncoder;

/// Everything a finished run produced.
///
/// Only built when every hop succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Duration of the full input, including any samples the framer dropped.
    pub total_audio_duration_ms: f64,

    /// Wall-clock time spent in the hop loop.
    pub processing_duration_ms: f64,

    /// `processing_duration_ms / total_audio_duration_ms`.
    pub rtf: f64,

    pub sample_rate: u32,

    /// Number of hops the framer declared for this stream.
    pub frame_count: usize,

    /// The settings this run used.
    pub config: PipelineConfig,

    pub results: Vec<DetectionResult>,
}

impl RunReport {
    /// Number of hops flagged as voice.
    pub fn voiced_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_voice).count()
    }

    /// The header lines printed before the per-hop results.
    pub fn summary(&self) -> Vec<String> {
        summary_lines(
            self.total_audio_duration_ms,
            self.frame_count,
            self.config.threshold,
        )
    }

    /// The closing line with processing time, audio time and RTF.
    pub fn timing_line(&self) -> String {
        format!(
            "Took: {:.1}ms  Audio: {:.1}ms  ==>  RTF: {:.6}",
            self.processing_duration_ms, self.total_audio_duration_ms, self.rtf
        )
    }

    /// Write the report into `w` in the requested format.
    ///
    /// Text carries only the per-hop lines. JSON carries the whole report.
    pub fn write_results<W: Write>(&self, mut w: W, output_type: OutputType) -> Result<()> {
        match output_type {
            OutputType::Text => {
                let mut encoder = TextEncoder::new(w);
                for result in &self.results {
                    encoder.write_result(result)?;
                }
                encoder.close()
            }
            OutputType::Json => {
                serde_json::to_writer_pretty(&mut w, self)?;
                writeln!(w)?;
                w.flush()?;
                Ok(())
            }
        }
    }

    /// Write the report to a file at `path`, creating or truncating it.
    pub fn write_results_to_path(
        &self,
        path: impl AsRef<Path>,
        output_type: OutputType,
    ) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|err| {
            std::io::Error::new(
                err.kind(),
                format!("could not create '{}': {err}", path.display()),
            )
        })?;
        self.write_results(BufWriter::new(file), output_type)
    }
}

/// Summary lines for a stream, available before any hop has run.
pub fn summary_lines(audio_ms: f64, frame_count: usize, threshold: f32) -> Vec<String> {
    vec![
        format!("Total audio time:  {audio_ms:.0} ms"),
        format!("Audio frame count: {frame_count}"),
        format!("Using threshold:   {threshold}"),
    ]
}

/// Real-time factor. Empty audio has an RTF of zero.
pub fn rtf(processing_ms: f64, audio_ms: f64) -> f64 {
    if audio_ms > 0.0 {
        processing_ms / audio_ms
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framer::FramePolicy;

    fn report() -> RunReport {
        RunReport {
            total_audio_duration_ms: 1000.0,
            processing_duration_ms: 12.34,
            rtf: 0.01234,
            sample_rate: 16_000,
            frame_count: 2,
            config: PipelineConfig::default(),
            results: vec![
                DetectionResult {
                    index: 0,
                    probability: 0.1,
                    is_voice: false,
                },
                DetectionResult {
                    index: 1,
                    probability: 0.9,
                    is_voice: true,
                },
            ],
        }
    }

    #[test]
    fn summary_line_format() {
        assert_eq!(
            report().summary(),
            vec![
                "Total audio time:  1000 ms",
                "Audio frame count: 2",
                "Using threshold:   0.5",
            ]
        );
    }

    #[test]
    fn timing_line_format() {
        assert_eq!(
            report().timing_line(),
            "Took: 12.3ms  Audio: 1000.0ms  ==>  RTF: 0.012340"
        );
    }

    #[test]
    fn writes_text_results() -> anyhow::Result<()> {
        let mut out = Vec::new();
        report().write_results(&mut out, OutputType::Text)?;
        assert_eq!(
            std::str::from_utf8(&out)?,
            "[0] 0.100000, 0\n[1] 0.900000, 1\n"
        );
        Ok(())
    }

    #[test]
    fn json_report_carries_timing_config_and_results() -> anyhow::Result<()> {
        let mut report = report();
        report.config = report
            .config
            .clone()
            .with_hop_size(512)
            .with_frame_policy(FramePolicy::Pad)
            .with_expected_sample_rate(16_000);

        let mut out = Vec::new();
        report.write_results(&mut out, OutputType::Json)?;
        let parsed: serde_json::Value = serde_json::from_slice(&out)?;

        assert_eq!(parsed["total_audio_duration_ms"], 1000.0);
        assert_eq!(parsed["rtf"], 0.01234);
        assert_eq!(parsed["frame_count"], 2);
        assert_eq!(parsed["config"]["hop_size"], 512);
        assert_eq!(parsed["config"]["threshold"], 0.5);
        assert_eq!(parsed["config"]["frame_policy"], "pad");
        assert_eq!(parsed["config"]["expected_sample_rate"], 16_000);

        let results = parsed["results"].as_array().expect("results array");
        assert_eq!(results.len(), 2);
        assert_eq!(results[1]["index"], 1);
        assert_eq!(results[1]["is_voice"], true);
        Ok(())
    }

    #[test]
    fn writes_results_to_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.json");
        report().write_results_to_path(&path, OutputType::Json)?;
        let parsed: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(parsed["results"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let err = report()
            .write_results_to_path("no/such/dir/out.txt", OutputType::Text)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn voiced_count_counts_flags() {
        assert_eq!(report().voiced_count(), 1);
    }

    #[test]
    fn rtf_is_ratio_and_zero_for_empty_audio() {
        assert_eq!(rtf(50.0, 1000.0), 0.05);
        assert_eq!(rtf(100.0, 1000.0), 2.0 * rtf(50.0, 1000.0));
        assert_eq!(rtf(5.0, 0.0), 0.0);
    }
}
