//! Speech probability model abstraction.
//!
//! The `SpeechProbabilityModel` trait decouples the detector from any
//! specific backend (ONNX Silero, scripted test source, future models).
//!
//! `&mut self` on `infer` intentionally expresses that backends are
//! stateful — the Silero model carries a context prefix between windows.
//! The recurrent state itself is owned by the detector and passed in, so a
//! `reset` on the detector controls everything that influences output.

pub mod scripted;

#[cfg(feature = "onnx")]
pub mod silero;

pub use scripted::ScriptedModel;

#[cfg(feature = "onnx")]
pub use silero::SileroModel;

use crate::error::Result;

/// Recurrent state length: 2 layers × 1 batch × 128 units.
pub const STATE_LEN: usize = 2 * 1 * 128;

/// The model's opaque recurrent state, shape `[2, 1, 128]` row-major.
///
/// Owned exclusively by the detector; updated in place on every inference
/// call and zeroed on reset.
#[derive(Debug, Clone)]
pub struct RecurrentState {
    data: [f32; STATE_LEN],
}

impl Default for RecurrentState {
    fn default() -> Self {
        Self {
            data: [0.0; STATE_LEN],
        }
    }
}

impl RecurrentState {
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Overwrite the state from a freshly inferred blob.
    ///
    /// # Panics
    /// If `data` is not exactly `STATE_LEN` floats (model output mismatch).
    pub fn copy_from_slice(&mut self, data: &[f32]) {
        self.data.copy_from_slice(data);
    }

    pub fn zero(&mut self) {
        self.data = [0.0; STATE_LEN];
    }
}

/// Contract for speech probability backends.
pub trait SpeechProbabilityModel: Send + 'static {
    /// Run one fixed-size window through the model.
    ///
    /// # Parameters
    /// - `window`: exactly one inference window of mono f32 samples.
    /// - `state`: the recurrent state, updated in place as a side effect.
    ///
    /// # Returns
    /// The speech probability in [0, 1].
    ///
    /// # Errors
    /// Any backend failure; the detector propagates it without retrying.
    fn infer(&mut self, window: &[f32], state: &mut RecurrentState) -> Result<f32>;

    /// Clear backend-local carry-over (context prefix, script cursor).
    fn reset(&mut self);
}
