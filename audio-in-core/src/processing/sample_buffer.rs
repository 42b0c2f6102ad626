use crate::models::error::CaptureError;

/// One 16-bit PCM sample word as produced by the PDM/PCM block.
pub type Sample = i16;

/// Fixed-capacity landing zone for one transfer's worth of samples.
///
/// Written by DMA, read by the USB transmit path. Capacity is the largest
/// frame the session can ever issue, fixed at compile time; every access is
/// bounds-checked against it.
#[derive(Debug, Clone)]
pub struct SampleBuffer<const N: usize> {
    samples: [Sample; N],
}

impl<const N: usize> SampleBuffer<N> {
    pub const fn new() -> Self {
        Self { samples: [0; N] }
    }

    /// The total capacity of the buffer.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Zero-fill the whole buffer so a new session never streams stale audio.
    pub fn clear(&mut self) {
        self.samples.fill(0);
    }

    /// Whether every sample is silent.
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0)
    }

    /// The first `count` samples, i.e. what one transfer of `count` carries.
    pub fn filled(&self, count: usize) -> Result<&[Sample], CaptureError> {
        self.samples
            .get(..count)
            .ok_or(CaptureError::CapacityExceeded {
                requested: count,
                capacity: N,
            })
    }

    /// Copy `samples` into the buffer starting at `offset`.
    ///
    /// Fails without writing anything if the copy would run past capacity.
    pub fn write_at(&mut self, offset: usize, samples: &[Sample]) -> Result<(), CaptureError> {
        let end = offset
            .checked_add(samples.len())
            .filter(|&end| end <= N)
            .ok_or(CaptureError::CapacityExceeded {
                requested: offset.saturating_add(samples.len()),
                capacity: N,
            })?;
        self.samples[offset..end].copy_from_slice(samples);
        Ok(())
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_silent() {
        let buf = SampleBuffer::<8>::new();
        assert_eq!(buf.capacity(), 8);
        assert!(buf.is_silent());
    }

    #[test]
    fn write_then_filled() {
        let mut buf = SampleBuffer::<8>::new();
        buf.write_at(0, &[1, 2, 3]).unwrap();
        buf.write_at(3, &[4]).unwrap();

        assert_eq!(buf.filled(4).unwrap(), &[1, 2, 3, 4]);
        assert_eq!(buf.filled(0).unwrap(), &[] as &[Sample]);
    }

    #[test]
    fn write_past_capacity_is_rejected_untouched() {
        let mut buf = SampleBuffer::<4>::new();
        let err = buf.write_at(2, &[7, 7, 7]).unwrap_err();

        assert_eq!(
            err,
            CaptureError::CapacityExceeded {
                requested: 5,
                capacity: 4
            }
        );
        assert!(buf.is_silent());
    }

    #[test]
    fn write_with_overflowing_offset() {
        let mut buf = SampleBuffer::<4>::new();
        assert!(buf.write_at(usize::MAX, &[1]).is_err());
    }

    #[test]
    fn filled_past_capacity() {
        let buf = SampleBuffer::<4>::new();
        assert!(buf.filled(4).is_ok());
        assert!(buf.filled(5).is_err());
    }

    #[test]
    fn clear_silences_buffer() {
        let mut buf = SampleBuffer::<4>::new();
        buf.write_at(0, &[9, -9, 9, -9]).unwrap();
        assert!(!buf.is_silent());

        buf.clear();
        assert!(buf.is_silent());
    }
}
