use audio_in_core::Sample;

/// Bounded receive FIFO of the PDM/PCM block.
///
/// Unlike a software ring buffer it cannot overwrite unread entries: once
/// full, newly converted samples are lost and counted as overflow.
#[derive(Debug)]
pub struct PcmFifoModel {
    buffer: Vec<Sample>,
    write_index: usize,
    read_index: usize,
    available: usize,
    capacity: usize,
    overflows: u64,
}

impl PcmFifoModel {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0; capacity],
            write_index: 0,
            read_index: 0,
            available: 0,
            capacity,
            overflows: 0,
        }
    }

    /// Queue one converted sample. Returns false if it was dropped.
    pub fn push(&mut self, sample: Sample) -> bool {
        if self.available == self.capacity {
            self.overflows += 1;
            return false;
        }
        self.buffer[self.write_index] = sample;
        self.write_index = (self.write_index + 1) % self.capacity;
        self.available += 1;
        true
    }

    /// Queue `samples`, returning how many fit.
    pub fn write(&mut self, samples: &[Sample]) -> usize {
        samples.iter().filter(|&&s| self.push(s)).count()
    }

    /// Read and remove up to `count` samples.
    pub fn read(&mut self, count: usize) -> Vec<Sample> {
        let to_read = count.min(self.available);
        if to_read == 0 {
            return Vec::new();
        }
        let mut result = Vec::with_capacity(to_read);
        for i in 0..to_read {
            result.push(self.buffer[(self.read_index + i) % self.capacity]);
        }
        self.read_index = (self.read_index + to_read) % self.capacity;
        self.available -= to_read;
        result
    }

    /// Number of samples currently queued.
    pub fn count(&self) -> usize {
        self.available
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    /// Drop everything queued. The overflow counter survives.
    pub fn reset(&mut self) {
        self.write_index = 0;
        self.read_index = 0;
        self.available = 0;
    }

    /// Samples lost to a full FIFO since creation.
    pub fn overflows(&self) -> u64 {
        self.overflows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_write_read() {
        let mut fifo = PcmFifoModel::new(10);
        assert_eq!(fifo.write(&[1, 2, 3]), 3);

        assert_eq!(fifo.count(), 3);
        assert_eq!(fifo.read(3), vec![1, 2, 3]);
        assert!(fifo.is_empty());
    }

    #[test]
    fn read_partial() {
        let mut fifo = PcmFifoModel::new(10);
        fifo.write(&[1, 2, 3, 4, 5]);

        assert_eq!(fifo.read(3), vec![1, 2, 3]);
        assert_eq!(fifo.read(10), vec![4, 5]);
        assert!(fifo.is_empty());
    }

    #[test]
    fn overflow_drops_newest() {
        let mut fifo = PcmFifoModel::new(4);
        fifo.write(&[1, 2, 3, 4]);
        assert_eq!(fifo.write(&[5, 6]), 0);

        assert_eq!(fifo.overflows(), 2);
        assert_eq!(fifo.read(4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn wraparound() {
        let mut fifo = PcmFifoModel::new(4);
        fifo.write(&[1, 2, 3]);
        fifo.read(2);
        fifo.write(&[4, 5, 6]);

        assert_eq!(fifo.count(), 4);
        assert_eq!(fifo.read(4), vec![3, 4, 5, 6]);
    }

    #[test]
    fn zero_depth_drops_everything() {
        let mut fifo = PcmFifoModel::new(0);
        assert_eq!(fifo.write(&[1, 2]), 0);

        assert!(fifo.read(1).is_empty());
        assert_eq!(fifo.overflows(), 2);
    }

    #[test]
    fn reset_keeps_overflow_count() {
        let mut fifo = PcmFifoModel::new(2);
        fifo.write(&[1, 2, 3]);
        fifo.reset();

        assert!(fifo.is_empty());
        assert!(fifo.read(2).is_empty());
        assert_eq!(fifo.overflows(), 1);
    }
}
