//! Carry-over buffering of partial inference windows.
//!
//! Streaming callers hand the detector arbitrarily sized chunks; the model
//! only accepts fixed windows. `WindowBuffer` absorbs chunks and yields
//! complete, non-overlapping windows in arrival order, holding at most one
//! partial window between calls.

/// Accumulates samples until a full inference window is available.
#[derive(Debug)]
pub struct WindowBuffer {
    window_size: usize,
    pending: Vec<f32>,
}

impl WindowBuffer {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            pending: Vec::with_capacity(window_size),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Append new samples to the pending buffer.
    pub fn extend(&mut self, samples: &[f32]) {
        self.pending.extend_from_slice(samples);
    }

    /// Take the next complete window, if one is available.
    ///
    /// After draining all available windows the pending remainder is always
    /// shorter than one window.
    pub fn pop_window(&mut self) -> Option<Vec<f32>> {
        if self.pending.len() < self.window_size {
            return None;
        }
        let window = self.pending[..self.window_size].to_vec();
        self.pending.drain(..self.window_size);
        Some(window)
    }

    /// Number of buffered samples not yet forming a complete window.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_yields_no_window() {
        let mut buf = WindowBuffer::new(512);
        buf.extend(&[0.0; 100]);
        assert!(buf.pop_window().is_none());
        assert_eq!(buf.pending_len(), 100);
    }

    #[test]
    fn windows_come_out_in_arrival_order() {
        let mut buf = WindowBuffer::new(4);
        buf.extend(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);

        assert_eq!(buf.pop_window().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(buf.pop_window().unwrap(), vec![5.0, 6.0, 7.0, 8.0]);
        assert!(buf.pop_window().is_none());
        assert_eq!(buf.pending_len(), 1);
    }

    #[test]
    fn carry_over_tops_up_across_calls() {
        let mut buf = WindowBuffer::new(4);
        buf.extend(&[1.0, 2.0, 3.0]);
        assert!(buf.pop_window().is_none());

        buf.extend(&[4.0, 5.0]);
        assert_eq!(buf.pop_window().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(buf.pop_window().is_none());
        assert_eq!(buf.pending_len(), 1);
    }

    #[test]
    fn empty_extend_is_a_noop() {
        let mut buf = WindowBuffer::new(4);
        buf.extend(&[]);
        assert!(buf.pop_window().is_none());
        assert_eq!(buf.pending_len(), 0);
    }

    #[test]
    fn clear_discards_pending_samples() {
        let mut buf = WindowBuffer::new(4);
        buf.extend(&[1.0, 2.0, 3.0]);
        buf.clear();
        assert_eq!(buf.pending_len(), 0);
        buf.extend(&[4.0, 5.0, 6.0, 7.0]);
        assert_eq!(buf.pop_window().unwrap(), vec![4.0, 5.0, 6.0, 7.0]);
    }
}
