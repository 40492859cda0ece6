use serde::Serialize;

use crate::engine::Inference;

/// The outcome for one hop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionResult {
    /// Zero-based hop index.
    pub index: usize,

    /// Voice probability in `[0.0, 1.0]`.
    pub probability: f32,

    /// The decision used for reporting.
    pub is_voice: bool,
}

impl DetectionResult {
    /// `1` for voice, `0` otherwise, as printed in reports.
    pub fn flag(&self) -> u8 {
        u8::from(self.is_voice)
    }
}

/// Threshold test. Inclusive: a probability equal to the threshold counts as voice.
pub fn decide(probability: f32, threshold: f32) -> bool {
    probability >= threshold
}

/// Combine an engine's output with the threshold test.
///
/// The threshold test always runs. When the engine also returned a decision, that decision is
/// the one reported; the two are allowed to disagree.
pub fn resolve(index: usize, inference: Inference, threshold: f32) -> DetectionResult {
    let by_threshold = decide(inference.probability, threshold);

    let is_voice = match inference.decision {
        Some(engine_decision) => {
            if engine_decision != by_threshold {
                tracing::trace!(
                    index,
                    probability = inference.probability,
                    threshold,
                    engine_decision,
                    "engine decision differs from threshold test"
                );
            }
            engine_decision
        }
        None => by_threshold,
    };

    DetectionResult {
        index,
        probability: inference.probability,
        is_voice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert!(decide(0.5, 0.5));
        assert!(decide(0.500_001, 0.5));
        assert!(!decide(0.499_999, 0.5));
        assert!(decide(0.0, 0.0));
        assert!(!decide(0.999, 1.0));
        assert!(decide(1.0, 1.0));
    }

    #[test]
    fn threshold_drives_flag_without_engine_decision() {
        let r = resolve(3, Inference::probability(0.7), 0.5);
        assert_eq!(r.index, 3);
        assert!(r.is_voice);
        assert_eq!(r.flag(), 1);

        let r = resolve(4, Inference::probability(0.2), 0.5);
        assert!(!r.is_voice);
        assert_eq!(r.flag(), 0);
    }

    #[test]
    fn engine_decision_wins_when_present() {
        let r = resolve(0, Inference::with_decision(0.9, false), 0.5);
        assert!(!r.is_voice);
        assert_eq!(r.probability, 0.9);

        let r = resolve(1, Inference::with_decision(0.1, true), 0.5);
        assert!(r.is_voice);
    }
}
