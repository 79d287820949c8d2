use serde::Serialize;

/// A maximal contiguous time range over which every observed frame was silent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SilentInterval {
    pub start: f64,
    pub end: f64,
}

impl SilentInterval {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Coalesces below-threshold frames into silent intervals.
///
/// Frames must arrive in non-decreasing timestamp order. At most one interval
/// is open at any time; it closes on the first loud frame, or at `flush` when
/// the stream ends while still silent.
#[derive(Debug)]
pub struct SilenceTracker {
    threshold: f64,
    open_start: Option<f64>,
    last_timestamp: f64,
}

impl SilenceTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            open_start: None,
            last_timestamp: f64::NEG_INFINITY,
        }
    }

    /// Classify one frame and return the silent interval it closed, if any.
    ///
    /// A frame with energy equal to the threshold counts as silent.
    pub fn observe(&mut self, timestamp: f64, energy: f64) -> Option<SilentInterval> {
        debug_assert!(
            timestamp >= self.last_timestamp,
            "frame timestamps must be non-decreasing ({timestamp} after {})",
            self.last_timestamp
        );
        debug_assert!(energy >= 0.0, "frame energy must be non-negative");
        self.last_timestamp = timestamp;

        if energy <= self.threshold {
            // Keep the start of an already-open interval.
            if self.open_start.is_none() {
                self.open_start = Some(timestamp);
            }
            None
        } else {
            self.open_start
                .take()
                .map(|start| SilentInterval { start, end: timestamp })
        }
    }

    /// Close a still-open interval at the stream's total duration.
    ///
    /// Called once after the last frame has been observed.
    pub fn flush(&mut self, end_of_stream: f64) -> Option<SilentInterval> {
        self.open_start.take().map(|start| SilentInterval {
            start,
            end: end_of_stream,
        })
    }
}
