use std::path::Path;

use serde::{Deserialize, Serialize};

use audio_in_core::{CaptureConfiguration, MAX_FRAME_SAMPLES};

use crate::error::SimError;

/// A simulated capture run: clocks, FIFO depth, session timing and faults.
///
/// Frame numbers count USB frames from the start of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftScenario {
    pub capture: CaptureConfiguration,

    /// PDM sample clock error relative to the USB frame clock, in ppm.
    pub drift_ppm: f64,

    /// PCM receive FIFO depth in samples.
    pub fifo_depth: usize,

    pub frames: u64,
    pub start_frame: u64,
    pub stop_frame: Option<u64>,

    /// Frames on which the host does not poll the endpoint.
    pub skipped_polls: Vec<u64>,

    /// Frames on which the next DMA re-arm is refused.
    pub dma_faults: Vec<u64>,

    /// Frames whose completion reports a non-zero error code.
    pub error_frames: Vec<u64>,
}

impl DriftScenario {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.capture
            .validate(MAX_FRAME_SAMPLES)
            .map_err(SimError::InvalidScenario)?;

        if !self.drift_ppm.is_finite() || self.drift_ppm.abs() >= 100_000.0 {
            return Err(SimError::InvalidScenario(format!(
                "drift of {} ppm is out of range",
                self.drift_ppm
            )));
        }
        let largest = self.capture.nominal_frame_size + self.capture.adjust_step;
        if self.fifo_depth < 2 * largest {
            return Err(SimError::InvalidScenario(format!(
                "FIFO depth {} cannot hold two frames of {} samples",
                self.fifo_depth, largest
            )));
        }
        if self.start_frame >= self.frames {
            return Err(SimError::InvalidScenario(
                "session starts after the run ends".into(),
            ));
        }
        if let Some(stop) = self.stop_frame {
            if stop <= self.start_frame {
                return Err(SimError::InvalidScenario(
                    "session stops before it starts".into(),
                ));
            }
        }
        Ok(())
    }

    /// Samples the PDM block converts per USB frame.
    pub fn producer_samples_per_frame(&self) -> f64 {
        self.capture.samples_per_frame() * (1.0 + self.drift_ppm / 1_000_000.0)
    }
}

impl Default for DriftScenario {
    fn default() -> Self {
        Self {
            capture: CaptureConfiguration::default(),
            drift_ppm: 0.0,
            fifo_depth: 254,
            frames: 10_000,
            start_frame: 1,
            stop_frame: None,
            skipped_polls: Vec::new(),
            dma_faults: Vec::new(),
            error_frames: Vec::new(),
        }
    }
}
