//! The boundary to whatever turns a hop of samples into a voice probability.
//!
//! The acoustic model itself lives outside this crate. The pipeline only needs
//! [`InferenceEngine`], which keeps it testable with deterministic stand-ins and lets callers
//! plug in a neural model, a native library binding, or the built-in [`EnergyEngine`].

use anyhow::{Result, ensure};

use crate::error::Error;

/// What an engine reports for one hop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inference {
    /// Voice probability in `[0.0, 1.0]`.
    pub probability: f32,

    /// The engine's own voice decision, when it makes one.
    pub decision: Option<bool>,
}

impl Inference {
    /// A bare probability with no engine-side decision.
    pub fn probability(probability: f32) -> Self {
        Self {
            probability,
            decision: None,
        }
    }

    pub fn with_decision(probability: f32, decision: bool) -> Self {
        Self {
            probability,
            decision: Some(decision),
        }
    }
}

/// A (possibly stateful) hop-to-probability engine.
///
/// Calls for one stream always arrive in increasing hop order, exactly once per hop, and never
/// concurrently. Engines may therefore carry temporal state (smoothing, recurrent hidden state)
/// between calls without synchronization.
pub trait InferenceEngine {
    /// Produce a voice probability for one `hop_size`-long block of samples.
    fn infer(&mut self, hop: &[i16]) -> Result<Inference>;

    /// Clear any state tied to the previous stream.
    ///
    /// The pipeline calls this before feeding the first hop of a new stream.
    fn reset(&mut self) {}

    /// Short name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn infer(&mut self, hop: &[i16]) -> Result<Inference> {
        (**self).infer(hop)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Exclusive, ordered access to an engine for the duration of one stream.
///
/// The session holds the only `&mut` to the engine, and it rejects any hop index other than the
/// next expected one. Engine failures and out-of-range probabilities are reported against the
/// hop they happened at.
pub struct EngineSession<'a, E: InferenceEngine + ?Sized> {
    engine: &'a mut E,
    next_index: usize,
}

impl<'a, E: InferenceEngine + ?Sized> EngineSession<'a, E> {
    /// Reset `engine` and start a new stream at hop 0.
    pub fn begin(engine: &'a mut E) -> Self {
        engine.reset();
        Self {
            engine,
            next_index: 0,
        }
    }

    /// The index the next call must carry.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Run the engine on hop `index`.
    pub fn infer(&mut self, index: usize, hop: &[i16]) -> crate::Result<Inference> {
        if index != self.next_index {
            return Err(Error::inference(
                index,
                format!(
                    "hop issued out of order (expected hop {})",
                    self.next_index
                ),
            ));
        }

        let inference = self
            .engine
            .infer(hop)
            .map_err(|err| Error::inference(index, err))?;

        if !(0.0..=1.0).contains(&inference.probability) {
            return Err(Error::inference(
                index,
                format!(
                    "{} returned probability {} outside [0, 1]",
                    self.engine.name(),
                    inference.probability
                ),
            ));
        }

        self.next_index += 1;
        Ok(inference)
    }
}

/// Defaults for [`EnergyEngine`].
pub const DEFAULT_ENERGY_FLOOR_DBFS: f32 = -60.0;
pub const DEFAULT_ENERGY_CEILING_DBFS: f32 = -20.0;
pub const DEFAULT_ENERGY_SMOOTHING: f32 = 0.5;

/// A model-free engine that scores hops by signal level.
///
/// Algorithm:
/// 1. Compute the RMS of the hop relative to full scale and convert it to dBFS.
/// 2. Map `[floor_dbfs, ceiling_dbfs]` linearly onto `[0.0, 1.0]`, clamping outside it.
/// 3. Blend with the previous hop's probability: `p = a * raw + (1 - a) * prev`.
///
/// It makes no decision of its own; thresholding is left to the pipeline.
#[derive(Debug, Clone)]
pub struct EnergyEngine {
    floor_dbfs: f32,
    ceiling_dbfs: f32,
    smoothing: f32,
    previous: Option<f32>,
}

impl EnergyEngine {
    /// `smoothing` is the weight of the current hop, in `(0.0, 1.0]`. `1.0` disables smoothing.
    pub fn new(floor_dbfs: f32, ceiling_dbfs: f32, smoothing: f32) -> Result<Self> {
        ensure!(
            floor_dbfs.is_finite() && ceiling_dbfs.is_finite() && floor_dbfs < ceiling_dbfs,
            "energy floor ({floor_dbfs} dBFS) must be below ceiling ({ceiling_dbfs} dBFS)"
        );
        ensure!(
            smoothing > 0.0 && smoothing <= 1.0,
            "smoothing weight must be in (0, 1], got {smoothing}"
        );

        Ok(Self {
            floor_dbfs,
            ceiling_dbfs,
            smoothing,
            previous: None,
        })
    }

    fn rms_dbfs(hop: &[i16]) -> f32 {
        if hop.is_empty() {
            return f32::NEG_INFINITY;
        }

        let full_scale = -f64::from(i16::MIN);
        let sum_sq: f64 = hop
            .iter()
            .map(|&s| {
                let x = f64::from(s) / full_scale;
                x * x
            })
            .sum();
        let rms = (sum_sq / hop.len() as f64).sqrt();

        if rms == 0.0 {
            f32::NEG_INFINITY
        } else {
            (20.0 * rms.log10()) as f32
        }
    }

    fn level_to_probability(&self, dbfs: f32) -> f32 {
        ((dbfs - self.floor_dbfs) / (self.ceiling_dbfs - self.floor_dbfs)).clamp(0.0, 1.0)
    }
}

impl Default for EnergyEngine {
    fn default() -> Self {
        Self {
            floor_dbfs: DEFAULT_ENERGY_FLOOR_DBFS,
            ceiling_dbfs: DEFAULT_ENERGY_CEILING_DBFS,
            smoothing: DEFAULT_ENERGY_SMOOTHING,
            previous: None,
        }
    }
}

impl InferenceEngine for EnergyEngine {
    fn infer(&mut self, hop: &[i16]) -> Result<Inference> {
        ensure!(!hop.is_empty(), "cannot score an empty hop");

        let raw = self.level_to_probability(Self::rms_dbfs(hop));
        let probability = match self.previous {
            Some(prev) => self.smoothing * raw + (1.0 - self.smoothing) * prev,
            None => raw,
        }
        .clamp(0.0, 1.0);

        self.previous = Some(probability);
        Ok(Inference::probability(probability))
    }

    fn reset(&mut self) {
        self.previous = None;
    }

    fn name(&self) -> &str {
        "energy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f32);

    impl InferenceEngine for Fixed {
        fn infer(&mut self, _hop: &[i16]) -> Result<Inference> {
            Ok(Inference::probability(self.0))
        }
    }

    #[test]
    fn session_enforces_increasing_order() -> anyhow::Result<()> {
        let mut engine = Fixed(0.3);
        let mut session = EngineSession::begin(&mut engine);
        session.infer(0, &[0; 4])?;
        session.infer(1, &[0; 4])?;

        let err = session.infer(3, &[0; 4]).unwrap_err();
        assert_eq!(err.hop_index(), Some(3));
        assert!(err.to_string().contains("expected hop 2"), "{err}");

        let err = session.infer(1, &[0; 4]).unwrap_err();
        assert_eq!(err.hop_index(), Some(1));
        assert_eq!(session.next_index(), 2);
        Ok(())
    }

    #[test]
    fn session_rejects_out_of_range_probability() {
        for bad in [1.5f32, -0.1, f32::NAN] {
            let mut engine = Fixed(bad);
            let mut session = EngineSession::begin(&mut engine);
            let err = session.infer(0, &[0; 4]).unwrap_err();
            assert_eq!(err.hop_index(), Some(0));
        }
    }

    #[test]
    fn silence_scores_zero() -> anyhow::Result<()> {
        let mut engine = EnergyEngine::default();
        let out = engine.infer(&[0; 256])?;
        assert_eq!(out.probability, 0.0);
        assert_eq!(out.decision, None);
        Ok(())
    }

    #[test]
    fn full_scale_scores_one_without_smoothing() -> anyhow::Result<()> {
        let mut engine = EnergyEngine::new(-60.0, -20.0, 1.0)?;
        let out = engine.infer(&[i16::MAX; 256])?;
        assert!((out.probability - 1.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn smoothing_carries_state_until_reset() -> anyhow::Result<()> {
        let mut engine = EnergyEngine::new(-60.0, -20.0, 0.5)?;
        engine.infer(&[i16::MAX; 256])?;
        let after_silence = engine.infer(&[0; 256])?;
        assert!((after_silence.probability - 0.5).abs() < 1e-6);

        engine.reset();
        let fresh = engine.infer(&[0; 256])?;
        assert_eq!(fresh.probability, 0.0);
        Ok(())
    }

    #[test]
    fn mid_level_maps_linearly() -> anyhow::Result<()> {
        // A constant at 1% of full scale sits at -40 dBFS, halfway between floor and ceiling.
        let mut engine = EnergyEngine::new(-60.0, -20.0, 1.0)?;
        let out = engine.infer(&[328; 256])?;
        assert!((out.probability - 0.5).abs() < 0.01, "{}", out.probability);
        Ok(())
    }

    #[test]
    fn rejects_inverted_levels() {
        assert!(EnergyEngine::new(-20.0, -60.0, 0.5).is_err());
        assert!(EnergyEngine::new(-60.0, -20.0, 0.0).is_err());
    }
}
