use serde::Serialize;

use crate::error::{Error, Result};
use crate::framer::FramePolicy;

pub const DEFAULT_HOP_SIZE: usize = 256;
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Settings that control one pipeline.
///
/// Serialized into JSON reports so a results file records how it was produced.
///
/// This struct represents *library-level configuration*, not CLI flags directly. The CLI maps
/// user input into this type so other frontends (tests, batch jobs) can build it
/// programmatically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineConfig {
    /// Samples per hop.
    pub hop_size: usize,

    /// Probability at or above which a hop counts as voice.
    pub threshold: f32,

    /// What to do with a trailing partial hop.
    pub frame_policy: FramePolicy,

    /// Reject streams at any other sample rate.
    ///
    /// When `None`, any positive rate is accepted and the engine is trusted to cope.
    pub expected_sample_rate: Option<u32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            hop_size: DEFAULT_HOP_SIZE,
            threshold: DEFAULT_THRESHOLD,
            frame_policy: FramePolicy::default(),
            expected_sample_rate: None,
        }
    }
}

impl PipelineConfig {
    pub fn with_hop_size(mut self, hop_size: usize) -> Self {
        self.hop_size = hop_size;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_frame_policy(mut self, frame_policy: FramePolicy) -> Self {
        self.frame_policy = frame_policy;
        self
    }

    pub fn with_expected_sample_rate(mut self, sample_rate: u32) -> Self {
        self.expected_sample_rate = Some(sample_rate);
        self
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<()> {
        if self.hop_size == 0 {
            return Err(Error::InvalidConfig("hop size must be positive".into()));
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }

        if self.expected_sample_rate == Some(0) {
            return Err(Error::InvalidConfig(
                "expected sample rate must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() -> anyhow::Result<()> {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.hop_size, 256);
        assert_eq!(cfg.threshold, 0.5);
        assert_eq!(cfg.frame_policy, FramePolicy::Truncate);
        cfg.validate()?;
        Ok(())
    }

    #[test]
    fn rejects_zero_hop_size() {
        let err = PipelineConfig::default().with_hop_size(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        for t in [-0.01f32, 1.01, f32::NAN, f32::INFINITY] {
            let err = PipelineConfig::default().with_threshold(t).validate().unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)), "threshold {t}");
        }
    }

    #[test]
    fn accepts_threshold_bounds() -> anyhow::Result<()> {
        PipelineConfig::default().with_threshold(0.0).validate()?;
        PipelineConfig::default().with_threshold(1.0).validate()?;
        Ok(())
    }
}
