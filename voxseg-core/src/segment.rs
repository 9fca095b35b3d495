//! Speech segments and the assembly of trigger events into them.
//!
//! Batch mode accumulates a flat ordered list across the whole input; a
//! still-open segment at end of input is returned as is. Streaming mode
//! returns only the current call's events — a start becomes an open segment,
//! an end becomes a closed one, and the caller correlates the two through
//! the shared start timestamp.

use serde::{Deserialize, Serialize};

use crate::trigger::WindowEvent;

/// Timing information of a speech segment, in seconds from stream start.
///
/// `speech_end_at == 0.0` denotes an open segment: in streaming output a
/// start-only event, in batch output a segment still open at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// When the speech segment begins.
    pub speech_start_at: f64,
    /// When the speech segment ends, or 0 while it is still open.
    pub speech_end_at: f64,
}

impl Segment {
    pub(crate) fn open(start_at: f64) -> Self {
        Self {
            speech_start_at: start_at,
            speech_end_at: 0.0,
        }
    }

    pub(crate) fn closed(start_at: f64, end_at: f64) -> Self {
        Self {
            speech_start_at: start_at,
            speech_end_at: end_at,
        }
    }

    /// Whether the end of this segment is not yet known.
    pub fn is_open(&self) -> bool {
        self.speech_end_at == 0.0
    }

    /// Duration in seconds; 0 for an open segment.
    pub fn duration_secs(&self) -> f64 {
        if self.is_open() {
            0.0
        } else {
            self.speech_end_at - self.speech_start_at
        }
    }
}

/// Fold one window's events into a batch segment list.
///
/// An end event closes the most recently opened still-open segment when its
/// recorded start matches; otherwise it appends a standalone closed segment.
pub(crate) fn apply_batch(segments: &mut Vec<Segment>, event: WindowEvent) {
    if let Some(start_at) = event.start_at {
        segments.push(Segment::open(start_at));
    }

    if let Some(close) = event.end {
        match segments.last_mut() {
            Some(last) if last.is_open() && last.speech_start_at == close.start_at => {
                last.speech_end_at = close.end_at;
            }
            _ => segments.push(Segment::closed(close.start_at, close.end_at)),
        }
    }
}

/// Append one window's events as standalone streaming segments.
pub(crate) fn apply_stream(out: &mut Vec<Segment>, event: WindowEvent) {
    if let Some(start_at) = event.start_at {
        out.push(Segment::open(start_at));
    }

    if let Some(close) = event.end {
        out.push(Segment::closed(close.start_at, close.end_at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::SegmentClose;

    fn start(at: f64) -> WindowEvent {
        WindowEvent {
            start_at: Some(at),
            end: None,
        }
    }

    fn end(start_at: f64, end_at: f64) -> WindowEvent {
        WindowEvent {
            start_at: None,
            end: Some(SegmentClose { start_at, end_at }),
        }
    }

    #[test]
    fn batch_end_closes_the_matching_open_segment() {
        let mut segments = Vec::new();
        apply_batch(&mut segments, start(0.5));
        apply_batch(&mut segments, end(0.5, 1.25));

        assert_eq!(segments, vec![Segment::closed(0.5, 1.25)]);
    }

    #[test]
    fn batch_mismatched_end_appends_a_standalone_segment() {
        let mut segments = Vec::new();
        apply_batch(&mut segments, start(0.5));
        apply_batch(&mut segments, end(0.7, 1.25));

        assert_eq!(
            segments,
            vec![Segment::open(0.5), Segment::closed(0.7, 1.25)]
        );
    }

    #[test]
    fn batch_end_after_closed_segment_appends() {
        let mut segments = Vec::new();
        apply_batch(&mut segments, start(0.5));
        apply_batch(&mut segments, end(0.5, 1.0));
        apply_batch(&mut segments, end(1.5, 2.0));

        assert_eq!(
            segments,
            vec![Segment::closed(0.5, 1.0), Segment::closed(1.5, 2.0)]
        );
    }

    #[test]
    fn batch_trailing_open_segment_is_kept() {
        let mut segments = Vec::new();
        apply_batch(&mut segments, start(0.5));
        apply_batch(&mut segments, end(0.5, 1.0));
        apply_batch(&mut segments, start(2.0));

        assert_eq!(segments.len(), 2);
        assert!(segments[1].is_open());
    }

    #[test]
    fn stream_events_stay_standalone() {
        let mut out = Vec::new();
        apply_stream(&mut out, start(0.5));
        apply_stream(&mut out, end(0.5, 1.0));

        assert_eq!(
            out,
            vec![Segment::open(0.5), Segment::closed(0.5, 1.0)]
        );
    }

    #[test]
    fn duration_is_zero_while_open() {
        assert_eq!(Segment::open(1.0).duration_secs(), 0.0);
        assert_eq!(Segment::closed(1.0, 2.5).duration_secs(), 1.5);
    }

    #[test]
    fn segment_serializes_with_camel_case_fields() {
        let segment = Segment::closed(0.064, 0.16);

        let json = serde_json::to_value(segment).expect("serialize segment");
        let start = json["speechStartAt"].as_f64().expect("start as number");
        let end = json["speechEndAt"].as_f64().expect("end as number");
        assert!((start - 0.064).abs() < 1e-9);
        assert!((end - 0.16).abs() < 1e-9);

        let round_trip: Segment = serde_json::from_value(json).expect("deserialize segment");
        assert_eq!(round_trip, segment);
    }
}
