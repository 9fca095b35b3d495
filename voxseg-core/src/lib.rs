//! # voxseg-core
//!
//! Streaming speech segmentation on top of the Silero VAD model.
//!
//! ## Data flow
//!
//! ```text
//! samples → WindowBuffer → fixed windows → SpeechProbabilityModel::infer
//!                                                │ probability
//!                                          TriggerState::advance
//!                                                │ start/end events
//!                                         segment assembly → Vec<Segment>
//! ```
//!
//! Both [`Detector::detect`] (batch) and [`Detector::detect_stream`]
//! (incremental) drive the same per-window trigger state machine, so segment
//! boundaries are identical regardless of how the caller chunks the input.
//! Only a partial window of carry-over is held between streaming calls.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod buffering;
pub mod config;
pub mod detector;
pub mod error;
pub mod inference;
pub mod segment;
mod trigger;

// Convenience re-exports for downstream crates
pub use config::DetectorConfig;
pub use detector::Detector;
pub use error::{Result, VoxsegError};
pub use inference::{RecurrentState, ScriptedModel, SpeechProbabilityModel};
pub use segment::Segment;

#[cfg(feature = "onnx")]
pub use inference::SileroModel;
