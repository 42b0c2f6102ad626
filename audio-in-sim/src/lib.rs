//! # audio-in-sim
//!
//! Simulated hardware backend for audio-in.
//!
//! Provides:
//! - `SimDma`, `SimPcm`, `SimEndpoint` — collaborator implementations over a
//!   shared `SimHardware` register model
//! - `PcmFifoModel` — bounded PDM/PCM receive FIFO
//! - `SimBench` — steps an independent PDM sample clock against the USB frame
//!   clock and drives the session's completion handler
//! - `DriftScenario` / `run_scenario` / `RunReport` — scripted runs with clock
//!   drift and injected faults
//!
//! ## Usage
//! ```
//! use audio_in_sim::{SimBench, SimSession};
//! use audio_in_core::CaptureConfiguration;
//!
//! let mut bench = SimBench::new(48.0, 254);
//! let mut session: SimSession = bench.session(CaptureConfiguration::default()).unwrap();
//! session.init().unwrap();
//! session.enable();
//! for _ in 0..100 {
//!     session.process();
//!     bench.step(&mut session);
//! }
//! assert_eq!(bench.stats().fifo_overflows, 0);
//! ```

pub mod bench;
pub mod error;
pub mod fifo;
pub mod hardware;
pub mod report;
pub mod scenario;

pub use bench::{run_scenario, BenchStats, SimBench, SimSession};
pub use error::SimError;
pub use fifo::PcmFifoModel;
pub use hardware::{SharedHardware, SimDma, SimEndpoint, SimHardware, SimPcm};
pub use report::RunReport;
pub use scenario::DriftScenario;
