//! `ScriptedModel` — deterministic probability source without real inference.
//!
//! Feeds a fixed probability sequence to the trigger, one value per window,
//! so the segmentation state machine can be exercised without an ONNX
//! runtime. Past the end of the script it reports silence.

use crate::error::Result;
use crate::inference::{RecurrentState, SpeechProbabilityModel};

/// Replays a fixed list of per-window probabilities.
#[derive(Debug, Clone)]
pub struct ScriptedModel {
    probs: Vec<f32>,
    cursor: usize,
}

impl ScriptedModel {
    pub fn new(probs: Vec<f32>) -> Self {
        Self { probs, cursor: 0 }
    }
}

impl SpeechProbabilityModel for ScriptedModel {
    fn infer(&mut self, _window: &[f32], _state: &mut RecurrentState) -> Result<f32> {
        let prob = self.probs.get(self.cursor).copied().unwrap_or(0.0);
        self.cursor += 1;
        Ok(prob)
    }

    /// Rewind the script, so a reset detector replays identical output.
    fn reset(&mut self) {
        self.cursor = 0;
    }
}
