use crate::models::error::CaptureError;

/// DMA channel moving samples from the PCM FIFO into the session's sample
/// buffer.
///
/// Implemented by:
/// - `SimDma` (host simulation)
/// - Target HALs wrapping their DMA descriptor and channel registers
///
/// Both methods are called from the endpoint-complete interrupt and must not
/// block.
pub trait CaptureDma {
    /// Program the number of samples the next transfer moves.
    fn set_transfer_length(&mut self, samples: usize) -> Result<(), CaptureError>;

    /// (Re-)enable the channel so the next block lands at the start of the
    /// sample buffer.
    fn enable_channel(&mut self) -> Result<(), CaptureError>;
}
