//! `Detector` — the public facade over windowing, inference and the trigger.
//!
//! ## Lifecycle
//!
//! ```text
//! Detector::new(config)        → model loaded, state zeroed
//!     └─► detect(samples)      → whole recording, finished segment list
//!     └─► detect_stream(chunk) → incremental, only this call's events
//!         └─► reset()          → required between batch/stream use and
//!                                between unrelated recordings
//! ```
//!
//! A detector is not safe for concurrent use — every operation takes
//! `&mut self` and mutates the recurrent state, trigger state and carry-over
//! buffer in place. Use one detector per stream.

use tracing::debug;

use crate::buffering::WindowBuffer;
use crate::config::DetectorConfig;
use crate::error::{Result, VoxsegError};
use crate::inference::{RecurrentState, SpeechProbabilityModel};
use crate::segment::{self, Segment};
use crate::trigger::{TriggerParams, TriggerState, WindowEvent};

#[cfg(feature = "onnx")]
use crate::inference::SileroModel;

/// Segments a stream of mono f32 samples into speech intervals.
pub struct Detector {
    config: DetectorConfig,
    model: Box<dyn SpeechProbabilityModel>,
    state: RecurrentState,
    trigger: TriggerState,
    stream_buf: WindowBuffer,
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Detector {
    /// Create a detector backed by the Silero ONNX model named in `config`.
    ///
    /// # Errors
    /// - `VoxsegError::InvalidConfig` describing the first invalid field.
    /// - `VoxsegError::ModelNotFound` / `VoxsegError::OnnxSession` from
    ///   session creation.
    #[cfg(feature = "onnx")]
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        let model = SileroModel::new(&config.model_path, config.sample_rate)?;
        Self::with_model(config, model)
    }

    /// Create a detector with an injected probability backend.
    pub fn with_model<M: SpeechProbabilityModel>(
        config: DetectorConfig,
        model: M,
    ) -> Result<Self> {
        config.validate()?;
        let window_size = config.window_size();

        Ok(Self {
            config,
            model: Box::new(model),
            state: RecurrentState::default(),
            trigger: TriggerState::default(),
            stream_buf: WindowBuffer::new(window_size),
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Inference window size in samples.
    pub fn window_size(&self) -> usize {
        self.config.window_size()
    }

    /// Detect speech segments in a complete recording.
    ///
    /// Trailing samples that do not fill a whole window are dropped. A
    /// segment still open at end of input is returned with
    /// `speech_end_at == 0`. Does not reset state — call [`Self::reset`]
    /// first for a fresh run.
    ///
    /// # Errors
    /// - `VoxsegError::InsufficientInput` when fewer samples than one window
    ///   are supplied.
    /// - Inference failures, discarding any segments from this call.
    pub fn detect(&mut self, pcm: &[f32]) -> Result<Vec<Segment>> {
        let window_size = self.config.window_size();
        if pcm.len() < window_size {
            return Err(VoxsegError::InsufficientInput {
                needed: window_size,
                got: pcm.len(),
            });
        }

        debug!(samples = pcm.len(), "starting speech detection");

        let mut segments = Vec::new();
        for window in pcm.chunks_exact(window_size) {
            let event = self.process_window(window)?;
            log_event(&event);
            segment::apply_batch(&mut segments, event);
        }

        debug!(segments = segments.len(), "speech detection done");

        Ok(segments)
    }

    /// Process one streaming chunk and return only the events it produced.
    ///
    /// Tolerates chunks smaller than, equal to, or larger than one window;
    /// an empty chunk is a no-op. A start event arrives as an open segment,
    /// the matching end later as a closed segment carrying the same start.
    pub fn detect_stream(&mut self, pcm: &[f32]) -> Result<Vec<Segment>> {
        if pcm.is_empty() {
            return Ok(Vec::new());
        }

        let mut segments = Vec::new();
        self.stream_buf.extend(pcm);
        while let Some(window) = self.stream_buf.pop_window() {
            let event = self.process_window(&window)?;
            log_event(&event);
            segment::apply_stream(&mut segments, event);
        }

        Ok(segments)
    }

    /// Zero the recurrent state, trigger state, carry-over buffer and the
    /// backend's own carry. Call between batch and streaming usage and
    /// between unrelated recordings.
    pub fn reset(&mut self) {
        self.trigger.reset();
        self.stream_buf.clear();
        self.state.zero();
        self.model.reset();
    }

    /// Live-update the speech probability threshold. Takes effect on the
    /// next window; no other state changes.
    pub fn set_threshold(&mut self, value: f32) {
        self.config.threshold = value;
    }

    fn process_window(&mut self, window: &[f32]) -> Result<WindowEvent> {
        let prob = self.model.infer(window, &mut self.state)?;
        self.trigger.advance(prob, &self.params())
    }

    fn params(&self) -> TriggerParams {
        TriggerParams {
            threshold: self.config.threshold,
            sample_rate: self.config.sample_rate,
            window_size: self.config.window_size(),
            min_silence_samples: self.config.min_silence_samples(),
            speech_pad_samples: self.config.speech_pad_samples(),
        }
    }
}

fn log_event(event: &WindowEvent) {
    if let Some(start_at) = event.start_at {
        debug!(start_at, "speech start");
    }
    if let Some(close) = event.end {
        debug!(end_at = close.end_at, start_at = close.start_at, "speech end");
    }
}
