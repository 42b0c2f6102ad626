use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use audio_in_core::CaptureDiagnostics;

use crate::bench::BenchStats;

/// Summary of one simulated run, serializable for the bench app.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub drift_ppm: f64,
    pub producer_samples_per_frame: f64,
    /// Average samples per delivered transfer while recording.
    pub delivered_samples_per_frame: f64,
    pub bench: BenchStats,
    pub capture: CaptureDiagnostics,
}

impl RunReport {
    pub fn new(
        started_at: DateTime<Utc>,
        drift_ppm: f64,
        producer_samples_per_frame: f64,
        bench: BenchStats,
        capture: CaptureDiagnostics,
    ) -> Self {
        let delivered_samples_per_frame = if bench.recorded_transfers == 0 {
            0.0
        } else {
            bench.recorded_samples as f64 / bench.recorded_transfers as f64
        };

        Self {
            id: Uuid::new_v4(),
            started_at,
            drift_ppm,
            producer_samples_per_frame,
            delivered_samples_per_frame,
            bench,
            capture,
        }
    }

    /// Whether the FIFO neither dropped samples nor let a stale block out.
    pub fn is_clean(&self) -> bool {
        self.bench.fifo_overflows == 0 && self.bench.stale_transfers == 0
    }
}
