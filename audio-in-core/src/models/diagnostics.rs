use serde::Serialize;

/// Counters for debugging the capture path.
///
/// Owned by the completion handler (plus the kick-off counters, which only the
/// periodic task touches), so it needs no synchronization of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CaptureDiagnostics {
    pub completions: u64,
    pub completion_errors: u64,
    pub transfers_issued: u64,
    pub transfers_rejected: u64,
    pub dma_rearm_failures: u64,
    pub grow_decisions: u64,
    pub shrink_decisions: u64,
    pub hold_decisions: u64,
    pub clamped_decisions: u64,
    pub sessions_started: u64,
    pub kickoff_rejections: u64,
    pub last_occupancy: usize,
    pub min_transfer_count: Option<usize>,
    pub max_transfer_count: Option<usize>,
}

impl CaptureDiagnostics {
    pub(crate) fn record_transfer(&mut self, count: usize) {
        self.transfers_issued += 1;
        self.min_transfer_count = Some(self.min_transfer_count.map_or(count, |m| m.min(count)));
        self.max_transfer_count = Some(self.max_transfer_count.map_or(count, |m| m.max(count)));
    }
}
