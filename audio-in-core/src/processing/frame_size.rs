use crate::models::config::CaptureConfiguration;
use crate::processing::occupancy::OccupancyReading;

/// Direction of the rate-justification step chosen for the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// FIFO above the trigger level: the host is lagging, drain more.
    Grow,
    /// FIFO below one nominal frame: the host is ahead, drain less.
    Shrink,
    /// Occupancy inside the band.
    Hold,
}

/// Outcome of one controller evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDecision {
    /// Samples for the next DMA transfer and the USB write after it.
    pub count: usize,
    pub adjustment: Adjustment,
    /// The stepped count fell outside `0..=capacity` and was replaced by the
    /// nominal frame size.
    pub clamped: bool,
}

/// Three-way hysteresis controller for the transfer length.
///
/// Bridges the PDM sample clock and the USB frame clock without a PLL by
/// moving one fixed step more or fewer samples per frame. Every decision is
/// taken relative to the nominal size, so the result stays within
/// `nominal ± step` no matter how many same-direction decisions follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSizeController {
    nominal: usize,
    step: usize,
    trigger_level: usize,
    capacity: usize,
}

impl FrameSizeController {
    pub fn new(nominal: usize, step: usize, trigger_level: usize, capacity: usize) -> Self {
        Self {
            nominal,
            step,
            trigger_level,
            capacity,
        }
    }

    pub fn from_config(config: &CaptureConfiguration, capacity: usize) -> Self {
        Self::new(
            config.nominal_frame_size,
            config.adjust_step,
            config.fifo_trigger_level,
            capacity,
        )
    }

    /// Decide the next transfer length from the current FIFO occupancy.
    pub fn decide(&self, occupancy: OccupancyReading) -> FrameDecision {
        let occupancy = occupancy.samples();

        let (adjustment, candidate) = if occupancy > self.trigger_level {
            (Adjustment::Grow, self.nominal.checked_add(self.step))
        } else if occupancy < self.nominal {
            (Adjustment::Shrink, self.nominal.checked_sub(self.step))
        } else {
            (Adjustment::Hold, Some(self.nominal))
        };

        match candidate.filter(|&count| count <= self.capacity) {
            Some(count) => FrameDecision {
                count,
                adjustment,
                clamped: false,
            },
            None => FrameDecision {
                count: self.nominal.min(self.capacity),
                adjustment,
                clamped: true,
            },
        }
    }
}
