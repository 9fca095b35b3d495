//! Hysteresis trigger — the per-window speech state machine.
//!
//! ## Algorithm (evaluated in this order on every window)
//!
//! 1. Advance the sample counter by one window.
//! 2. Probability back above the threshold while a release is pending →
//!    cancel the release.
//! 3. Probability at or above the threshold while not triggered → enter the
//!    triggered state and emit a padded, clamped start timestamp.
//! 4. Probability below `threshold − RELEASE_GAP` while triggered → record a
//!    candidate release point, hold it through the minimum-silence debounce,
//!    then finalize the segment with a padded end timestamp.

use crate::error::{Result, VoxsegError};

/// Fixed probability margin below the trigger threshold required before a
/// release is even considered. Not configurable.
pub(crate) const RELEASE_GAP: f32 = 0.15;

/// Per-call tunables the trigger evaluates against, derived from
/// [`crate::DetectorConfig`] so that live threshold updates take effect on
/// the next window.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TriggerParams {
    pub threshold: f32,
    pub sample_rate: u32,
    pub window_size: usize,
    pub min_silence_samples: usize,
    pub speech_pad_samples: usize,
}

/// Zero, one or two boundary events produced by a single window.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WindowEvent {
    /// Speech started at this timestamp (seconds).
    pub start_at: Option<f64>,
    /// Speech ended; carries the matching start for correlation.
    pub end: Option<SegmentClose>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SegmentClose {
    /// Start timestamp of the segment being closed (seconds).
    pub start_at: f64,
    /// End timestamp (seconds).
    pub end_at: f64,
}

/// Mutable trigger state, one instance per detector.
#[derive(Debug, Default)]
pub(crate) struct TriggerState {
    /// Total samples consumed; a multiple of the window size after each window.
    curr_sample: usize,
    /// True while inside a candidate speech region.
    triggered: bool,
    /// Sample index of the first below-gap window since triggering, 0 if none.
    temp_end: usize,
    /// Timestamp of the open segment's start; valid only with the flag below.
    pending_start: f64,
    pending_start_valid: bool,
}

impl TriggerState {
    /// Consume one window's probability, mutate the state, and report any
    /// boundary events.
    ///
    /// # Errors
    /// `VoxsegError::UnexpectedSpeechEnd` if a segment is finalized with no
    /// pending start, which indicates a sequencing bug.
    pub fn advance(&mut self, prob: f32, params: &TriggerParams) -> Result<WindowEvent> {
        self.curr_sample += params.window_size;

        let mut event = WindowEvent::default();

        if prob >= params.threshold && self.temp_end != 0 {
            // Speech resumed before the silence debounce elapsed.
            self.temp_end = 0;
        }

        if prob >= params.threshold && !self.triggered {
            self.triggered = true;

            // Padding can push the start before the beginning of the stream.
            let raw = self.curr_sample as i64
                - params.window_size as i64
                - params.speech_pad_samples as i64;
            let start_at = raw.max(0) as f64 / f64::from(params.sample_rate);

            self.pending_start = start_at;
            self.pending_start_valid = true;
            event.start_at = Some(start_at);
        }

        if prob < params.threshold - RELEASE_GAP && self.triggered {
            if self.temp_end == 0 {
                self.temp_end = self.curr_sample;
            }

            // Not enough silence yet to split, we continue.
            if self.curr_sample - self.temp_end < params.min_silence_samples {
                return Ok(event);
            }

            let end_at = (self.temp_end + params.speech_pad_samples) as f64
                / f64::from(params.sample_rate);
            self.temp_end = 0;
            self.triggered = false;

            if !self.pending_start_valid {
                return Err(VoxsegError::UnexpectedSpeechEnd);
            }

            event.end = Some(SegmentClose {
                start_at: self.pending_start,
                end_at,
            });
            self.pending_start_valid = false;
        }

        Ok(event)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
