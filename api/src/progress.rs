//! Upload progress bookkeeping shared by both transports.

/// Converts byte counts into whole percentages, emitting each value at most once
/// and never going backwards.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: u64,
    sent: u64,
    last: Option<u8>,
}

impl ProgressTracker {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            sent: 0,
            last: None,
        }
    }

    /// Record `bytes` more handed to the transport. Returns the new percentage
    /// if it differs from the last one reported.
    pub fn advance(&mut self, bytes: u64) -> Option<u8> {
        self.sent = self.sent.saturating_add(bytes).min(self.total);
        let pct = if self.total == 0 {
            100
        } else {
            ((self.sent as f64 / self.total as f64) * 100.0).round() as u8
        };
        self.emit(pct)
    }

    /// Force a specific percentage (used where the transport has no byte
    /// counters). Lower values than already reported are ignored.
    pub fn emit(&mut self, pct: u8) -> Option<u8> {
        let pct = pct.min(100);
        match self.last {
            Some(prev) if pct <= prev => None,
            _ => {
                self.last = Some(pct);
                Some(pct)
            }
        }
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }
}
