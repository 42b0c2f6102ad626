//! # audio-in-core
//!
//! Platform-agnostic USB audio IN capture core.
//!
//! Moves PCM samples from a PDM microphone FIFO through a DMA block into an
//! isochronous IN endpoint, and keeps the two unsynchronized clocks (PDM
//! sample clock, USB frame clock) from drifting apart by varying each
//! transfer by one fixed step around the nominal frame size.
//!
//! Hardware backends implement `CaptureDma`, `PcmFifo` and `IsoInEndpoint`
//! and plug into the generic `CaptureSession`.
//!
//! ## Architecture
//!
//! ```text
//! audio-in-core (this crate)
//! ├── traits/       ← CaptureDma, PcmFifo, IsoInEndpoint
//! ├── models/       ← CaptureError, SessionState, CaptureConfiguration, CaptureDiagnostics
//! ├── processing/   ← SampleBuffer, OccupancyReading, FrameSizeController
//! └── session/      ← CaptureSession, CaptureControl, TransferPump
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::CaptureConfiguration;
pub use models::diagnostics::CaptureDiagnostics;
pub use models::error::CaptureError;
pub use models::state::SessionState;
pub use processing::frame_size::{Adjustment, FrameDecision, FrameSizeController};
pub use processing::occupancy::OccupancyReading;
pub use processing::sample_buffer::{Sample, SampleBuffer};
pub use session::capture::CaptureSession;
pub use session::control::CaptureControl;
pub use session::pump::TransferPump;
pub use traits::dma::CaptureDma;
pub use traits::iso_endpoint::IsoInEndpoint;
pub use traits::pcm_fifo::PcmFifo;

/// Largest frame a full-speed 48 kHz mono endpoint carries: nominal 48 plus
/// headroom for the rate-justification step.
pub const MAX_FRAME_SAMPLES: usize = 64;
