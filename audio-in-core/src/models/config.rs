use serde::{Deserialize, Serialize};

/// Configuration for a capture session.
///
/// Fixed for the lifetime of a session; audio format negotiation happens
/// elsewhere and only its outcome lands here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfiguration {
    /// Audio sample rate in Hz (default: 48000).
    pub sample_rate_hz: u32,

    /// USB frame period in microseconds (default: 1000, full-speed).
    pub frame_period_us: u32,

    /// Samples moved per cycle when producer and consumer agree (default: 48).
    pub nominal_frame_size: usize,

    /// Fixed rate-justification step in samples (default: 4).
    pub adjust_step: usize,

    /// PCM FIFO trigger level in samples. Occupancy above this grows the
    /// next transfer (default: 56).
    pub fifo_trigger_level: usize,

    /// Keep re-arming DMA from the completion handler while not recording
    /// (default: true).
    pub rearm_while_idle: bool,
}

impl CaptureConfiguration {
    /// Check the configuration against the sample buffer `capacity`.
    pub fn validate(&self, capacity: usize) -> Result<(), String> {
        if self.sample_rate_hz == 0 {
            return Err("sample rate must be positive".into());
        }
        if self.frame_period_us == 0 {
            return Err("frame period must be positive".into());
        }
        if self.nominal_frame_size == 0 {
            return Err("nominal frame size must be positive".into());
        }
        if self.adjust_step == 0 || self.adjust_step >= self.nominal_frame_size {
            return Err(format!(
                "adjust step {} must be in 1..{}",
                self.adjust_step, self.nominal_frame_size
            ));
        }
        if self.nominal_frame_size + self.adjust_step > capacity {
            return Err(format!(
                "largest frame {} exceeds buffer capacity {}",
                self.nominal_frame_size + self.adjust_step,
                capacity
            ));
        }
        if self.fifo_trigger_level < self.nominal_frame_size {
            return Err(format!(
                "FIFO trigger level {} is below the nominal frame size {}",
                self.fifo_trigger_level, self.nominal_frame_size
            ));
        }
        Ok(())
    }

    /// Samples the producer delivers per USB frame at the nominal clock.
    pub fn samples_per_frame(&self) -> f64 {
        self.sample_rate_hz as f64 * self.frame_period_us as f64 / 1_000_000.0
    }
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            sample_rate_hz: 48_000,
            frame_period_us: 1_000,
            nominal_frame_size: 48,
            adjust_step: 4,
            fifo_trigger_level: 56,
            rearm_while_idle: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_for_max_frame() {
        let config = CaptureConfiguration::default();
        assert!(config.validate(64).is_ok());
        assert_eq!(config.samples_per_frame(), 48.0);
    }

    #[test]
    fn rejects_frame_larger_than_buffer() {
        let config = CaptureConfiguration::default();
        let err = config.validate(50).unwrap_err();
        assert!(err.contains("exceeds buffer capacity"));
    }

    #[test]
    fn rejects_step_not_smaller_than_nominal() {
        let config = CaptureConfiguration {
            adjust_step: 48,
            ..Default::default()
        };
        assert!(config.validate(128).is_err());

        let config = CaptureConfiguration {
            adjust_step: 0,
            ..Default::default()
        };
        assert!(config.validate(128).is_err());
    }

    #[test]
    fn rejects_trigger_below_nominal() {
        let config = CaptureConfiguration {
            fifo_trigger_level: 40,
            ..Default::default()
        };
        assert!(config.validate(64).is_err());
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let config: CaptureConfiguration =
            serde_json::from_str(r#"{ "adjust_step": 2, "rearm_while_idle": false }"#).unwrap();
        assert_eq!(config.adjust_step, 2);
        assert!(!config.rearm_while_idle);
        assert_eq!(config.nominal_frame_size, 48);
    }
}
