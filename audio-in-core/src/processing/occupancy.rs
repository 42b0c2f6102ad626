use crate::traits::pcm_fifo::PcmFifo;

/// Fill level of the PCM FIFO, sampled once inside the completion handler.
///
/// Only meaningful at the instant it was taken; never carried into the next
/// cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OccupancyReading(usize);

impl OccupancyReading {
    /// Read the instantaneous FIFO level.
    pub fn sample<P: PcmFifo + ?Sized>(fifo: &P) -> Self {
        Self(fifo.fifo_level())
    }

    pub const fn from_samples(samples: usize) -> Self {
        Self(samples)
    }

    pub const fn samples(self) -> usize {
        self.0
    }
}
