use crate::models::error::CaptureError;

/// PDM-to-PCM converter and its receive FIFO.
///
/// Implemented by:
/// - `SimPcm` (host simulation)
/// - Target HALs wrapping the PDM/PCM block
pub trait PcmFifo {
    /// Bring the block up; called once from `CaptureSession::init`.
    fn init(&mut self) -> Result<(), CaptureError>;

    /// Samples currently queued in the receive FIFO.
    fn fifo_level(&self) -> usize;

    /// Drop everything queued in the receive FIFO.
    fn clear_fifo(&mut self);

    /// Start converting samples into the FIFO.
    fn enable(&mut self);
}
