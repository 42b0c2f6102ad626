use crate::models::error::CaptureError;
use crate::processing::sample_buffer::Sample;

/// Isochronous IN endpoint of the USB device stack.
///
/// Implemented by:
/// - `SimEndpoint` (host simulation)
/// - Target USB stacks wrapping their endpoint write call
pub trait IsoInEndpoint {
    /// Route this endpoint's transfer-complete event to the capture session.
    ///
    /// The integrator's interrupt handler is expected to call
    /// `CaptureSession::on_endpoint_complete` for every completion once this
    /// succeeds.
    fn register_completion(&mut self) -> Result<(), CaptureError>;

    /// Queue `samples` for the next IN token without waiting.
    ///
    /// The endpoint copies the samples before returning. Returns
    /// `CaptureError::EndpointBusy` when a previous transfer is still queued.
    fn write_non_blocking(&mut self, samples: &[Sample]) -> Result<(), CaptureError>;
}
