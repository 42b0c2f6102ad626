use thiserror::Error;

/// Errors surfaced by the capture path and its hardware collaborators.
///
/// At run time only the transfer-rejected class (`EndpointBusy`, `DmaBusy`)
/// reaches the core, and the core never escalates it: the next completion
/// event is the retry point.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("endpoint busy, transfer rejected")]
    EndpointBusy,

    #[error("DMA channel busy, re-arm rejected")]
    DmaBusy,

    #[error("transfer of {requested} samples exceeds buffer capacity of {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),
}
