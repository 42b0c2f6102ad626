use crate::models::error::CaptureError;
use crate::processing::sample_buffer::Sample;
use crate::traits::dma::CaptureDma;
use crate::traits::iso_endpoint::IsoInEndpoint;

/// Couples the DMA channel and the IN endpoint so that both are driven from
/// the same completion, with the same transfer count.
#[derive(Debug)]
pub struct TransferPump<D, U> {
    dma: D,
    endpoint: U,
}

impl<D: CaptureDma, U: IsoInEndpoint> TransferPump<D, U> {
    pub fn new(dma: D, endpoint: U) -> Self {
        Self { dma, endpoint }
    }

    pub fn register(&mut self) -> Result<(), CaptureError> {
        self.endpoint.register_completion()
    }

    /// Queue one outbound transfer. Never retried here.
    pub fn issue(&mut self, samples: &[Sample]) -> Result<(), CaptureError> {
        self.endpoint.write_non_blocking(samples)
    }

    /// Program the next DMA block length and re-enable the channel.
    pub fn rearm(&mut self, count: usize) -> Result<(), CaptureError> {
        self.dma.set_transfer_length(count)?;
        self.dma.enable_channel()
    }

    pub fn dma_mut(&mut self) -> &mut D {
        &mut self.dma
    }

    pub fn endpoint_mut(&mut self) -> &mut U {
        &mut self.endpoint
    }
}
