//! Silero VAD neural backend via the `ort` crate.
//!
//! Wraps the Silero VAD v5 ONNX model published at
//! <https://github.com/snakers4/silero-vad>.
//!
//! ## Model I/O
//!
//! | Name     | Shape              | DType | Direction |
//! |----------|--------------------|-------|-----------|
//! | `input`  | `[1, 64 + window]` | f32   | in        |
//! | `sr`     | `[1]`              | i64   | in        |
//! | `state`  | `[2,1,128]`        | f32   | in        |
//! | `output` | `[1, 1]`           | f32   | out       |
//! | `stateN` | `[2,1,128]`        | f32   | out       |
//!
//! The model expects each window to be preceded by a 64-sample context
//! prefix taken from the previous window; the prefix is carried between
//! calls and cleared on reset.

use std::path::Path;

use ndarray::{Array1, Array2, Array3};
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::{Session, SessionInputValue};
use ort::value::Value;
use tracing::info;

use crate::config::window_size_for_sample_rate;
use crate::error::{Result, VoxsegError};
use crate::inference::{RecurrentState, SpeechProbabilityModel, STATE_LEN};

/// Context samples prepended to every window.
const CONTEXT_LEN: usize = 64;

/// Neural speech probability model backed by the Silero VAD ONNX session.
pub struct SileroModel {
    session: Session,
    sample_rate: u32,
    window_size: usize,
    /// `[context | window]`; the context half persists between calls.
    input_buf: Vec<f32>,
}

impl SileroModel {
    /// Load the Silero VAD ONNX model from `path` for the given sample rate.
    ///
    /// The session runs single-threaded with full graph optimization; the
    /// native resources are released when the model is dropped.
    pub fn new(path: impl AsRef<Path>, sample_rate: u32) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VoxsegError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        let session = SessionBuilder::new()
            .map_err(|e| VoxsegError::OnnxSession(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::All)
            .map_err(|e| VoxsegError::OnnxSession(e.to_string()))?
            .with_intra_threads(1)
            .map_err(|e| VoxsegError::OnnxSession(e.to_string()))?
            .with_inter_threads(1)
            .map_err(|e| VoxsegError::OnnxSession(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| VoxsegError::OnnxSession(e.to_string()))?;

        let window_size = window_size_for_sample_rate(sample_rate);
        info!(path = %path.display(), sample_rate, window_size, "Silero VAD model loaded");

        Ok(Self {
            session,
            sample_rate,
            window_size,
            input_buf: vec![0.0; CONTEXT_LEN + window_size],
        })
    }
}

impl SpeechProbabilityModel for SileroModel {
    fn infer(&mut self, window: &[f32], state: &mut RecurrentState) -> Result<f32> {
        if window.len() != self.window_size {
            return Err(VoxsegError::Inference(format!(
                "invalid window length: expected {}, got {}",
                self.window_size,
                window.len()
            )));
        }

        self.input_buf[CONTEXT_LEN..].copy_from_slice(window);

        let input_arr =
            Array2::<f32>::from_shape_vec((1, self.input_buf.len()), self.input_buf.clone())
                .map_err(|e| VoxsegError::OnnxSession(e.to_string()))?;
        let input_val = Value::from_array(input_arr)
            .map_err(|e: ort::Error| VoxsegError::OnnxSession(e.to_string()))?;

        let state_arr = Array3::<f32>::from_shape_vec((2, 1, 128), state.as_slice().to_vec())
            .map_err(|e| VoxsegError::OnnxSession(e.to_string()))?;
        let state_val = Value::from_array(state_arr)
            .map_err(|e: ort::Error| VoxsegError::OnnxSession(e.to_string()))?;

        let sr_arr = Array1::<i64>::from_elem(1, i64::from(self.sample_rate));
        let sr_val = Value::from_array(sr_arr)
            .map_err(|e: ort::Error| VoxsegError::OnnxSession(e.to_string()))?;

        let input_values: Vec<(String, SessionInputValue<'_>)> = vec![
            ("input".to_string(), input_val.into()),
            ("state".to_string(), state_val.into()),
            ("sr".to_string(), sr_val.into()),
        ];

        let outputs = self
            .session
            .run(input_values)
            .map_err(|e| VoxsegError::OnnxSession(e.to_string()))?;

        let prob_output = outputs
            .get("output")
            .ok_or_else(|| VoxsegError::OnnxSession("model has no 'output' tensor".into()))?;
        let (_, prob_data) = prob_output
            .try_extract_tensor::<f32>()
            .map_err(|e| VoxsegError::OnnxSession(e.to_string()))?;
        let prob = prob_data.first().copied().unwrap_or(0.0);

        let state_output = outputs
            .get("stateN")
            .ok_or_else(|| VoxsegError::OnnxSession("model has no 'stateN' tensor".into()))?;
        let (_, state_data) = state_output
            .try_extract_tensor::<f32>()
            .map_err(|e| VoxsegError::OnnxSession(e.to_string()))?;
        if state_data.len() != STATE_LEN {
            return Err(VoxsegError::OnnxSession(format!(
                "unexpected stateN length: expected {STATE_LEN}, got {}",
                state_data.len()
            )));
        }
        state.copy_from_slice(state_data);

        // Carry the tail of this input as the next window's context prefix.
        self.input_buf.copy_within(self.window_size.., 0);

        Ok(prob)
    }

    fn reset(&mut self) {
        self.input_buf.fill(0.0);
    }
}
