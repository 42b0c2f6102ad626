//! Simulated capture hardware.
//!
//! One `SimHardware` holds the register-level state of the PCM FIFO, the DMA
//! channel and the IN endpoint. The three collaborator handles handed to the
//! capture session and the `SimBench` driving the clocks all share it through
//! `Arc<parking_lot::Mutex<_>>`.

use std::sync::Arc;

use parking_lot::Mutex;

use audio_in_core::{CaptureDma, CaptureError, IsoInEndpoint, PcmFifo, Sample};

use crate::fifo::PcmFifoModel;

/// Largest block one DMA descriptor can move.
pub const DMA_MAX_TRANSFER: usize = 256;

pub type SharedHardware = Arc<Mutex<SimHardware>>;

#[derive(Debug, Default)]
pub struct DmaChannelState {
    pub length: usize,
    pub transferred: usize,
    pub enabled: bool,
    pub completed_blocks: u64,
    /// Upcoming `set_transfer_length` calls to refuse with `DmaBusy`.
    pub reject_rearms: u32,
}

impl DmaChannelState {
    /// Samples still owed to the current block.
    pub fn remaining(&self) -> usize {
        if self.enabled {
            self.length - self.transferred
        } else {
            0
        }
    }
}

#[derive(Debug, Default)]
pub struct EndpointState {
    /// Completion callback registered; without it the host still drains
    /// transfers but nobody is told.
    pub registered: bool,
    pub in_flight: Option<Vec<Sample>>,
    pub delivered: Vec<Vec<Sample>>,
    pub rejected_writes: u64,
}

#[derive(Debug)]
pub struct SimHardware {
    pub fifo: PcmFifoModel,
    pub pcm_initialized: bool,
    pub pcm_enabled: bool,
    pub dma: DmaChannelState,
    pub endpoint: EndpointState,
}

impl SimHardware {
    pub fn new(fifo_depth: usize) -> Self {
        Self {
            fifo: PcmFifoModel::new(fifo_depth),
            pcm_initialized: false,
            pcm_enabled: false,
            dma: DmaChannelState::default(),
            endpoint: EndpointState::default(),
        }
    }

    pub fn shared(fifo_depth: usize) -> SharedHardware {
        Arc::new(Mutex::new(Self::new(fifo_depth)))
    }
}

/// DMA channel handle.
#[derive(Debug, Clone)]
pub struct SimDma {
    hardware: SharedHardware,
}

impl SimDma {
    pub fn new(hardware: SharedHardware) -> Self {
        Self { hardware }
    }
}

impl CaptureDma for SimDma {
    fn set_transfer_length(&mut self, samples: usize) -> Result<(), CaptureError> {
        let mut hw = self.hardware.lock();
        if hw.dma.reject_rearms > 0 {
            hw.dma.reject_rearms -= 1;
            return Err(CaptureError::DmaBusy);
        }
        if samples > DMA_MAX_TRANSFER {
            return Err(CaptureError::CapacityExceeded {
                requested: samples,
                capacity: DMA_MAX_TRANSFER,
            });
        }
        hw.dma.length = samples;
        Ok(())
    }

    fn enable_channel(&mut self) -> Result<(), CaptureError> {
        let mut hw = self.hardware.lock();
        hw.dma.transferred = 0;
        hw.dma.enabled = true;
        Ok(())
    }
}

/// PDM/PCM block handle.
#[derive(Debug, Clone)]
pub struct SimPcm {
    hardware: SharedHardware,
}

impl SimPcm {
    pub fn new(hardware: SharedHardware) -> Self {
        Self { hardware }
    }
}

impl PcmFifo for SimPcm {
    fn init(&mut self) -> Result<(), CaptureError> {
        self.hardware.lock().pcm_initialized = true;
        Ok(())
    }

    fn fifo_level(&self) -> usize {
        self.hardware.lock().fifo.count()
    }

    fn clear_fifo(&mut self) {
        self.hardware.lock().fifo.reset();
    }

    fn enable(&mut self) {
        let mut hw = self.hardware.lock();
        if !hw.pcm_initialized {
            log::warn!("PCM enabled before init");
        }
        hw.pcm_enabled = true;
    }
}

/// Isochronous IN endpoint handle.
#[derive(Debug, Clone)]
pub struct SimEndpoint {
    hardware: SharedHardware,
}

impl SimEndpoint {
    pub fn new(hardware: SharedHardware) -> Self {
        Self { hardware }
    }
}

impl IsoInEndpoint for SimEndpoint {
    fn register_completion(&mut self) -> Result<(), CaptureError> {
        self.hardware.lock().endpoint.registered = true;
        Ok(())
    }

    fn write_non_blocking(&mut self, samples: &[Sample]) -> Result<(), CaptureError> {
        let mut hw = self.hardware.lock();
        if hw.endpoint.in_flight.is_some() {
            hw.endpoint.rejected_writes += 1;
            return Err(CaptureError::EndpointBusy);
        }
        hw.endpoint.in_flight = Some(samples.to_vec());
        Ok(())
    }
}
