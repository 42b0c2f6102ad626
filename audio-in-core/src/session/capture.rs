use std::sync::Arc;

use crate::models::config::CaptureConfiguration;
use crate::models::diagnostics::CaptureDiagnostics;
use crate::models::error::CaptureError;
use crate::models::state::SessionState;
use crate::processing::frame_size::{Adjustment, FrameSizeController};
use crate::processing::occupancy::OccupancyReading;
use crate::processing::sample_buffer::SampleBuffer;
use crate::session::control::{CaptureControl, SessionFlags};
use crate::session::pump::TransferPump;
use crate::traits::dma::CaptureDma;
use crate::traits::iso_endpoint::IsoInEndpoint;
use crate::traits::pcm_fifo::PcmFifo;

/// USB audio IN capture session.
///
/// Generic over the DMA channel, the PCM FIFO and the IN endpoint via the
/// collaborator traits, and over the sample buffer capacity `N`.
///
/// Data flow per USB frame:
/// ```text
/// [PDM/PCM FIFO] ──DMA──▶ [SampleBuffer] ──write──▶ [ISO IN endpoint] ──▶ host
///        │                                                 │
///        └──── occupancy ──▶ [FrameSizeController] ◀── endpoint complete
/// ```
///
/// Two entry points drive it: `process()` from a low-priority periodic task,
/// and `on_endpoint_complete()` from the endpoint-complete interrupt. Neither
/// blocks.
pub struct CaptureSession<D, P, U, const N: usize> {
    config: CaptureConfiguration,
    controller: FrameSizeController,
    flags: Arc<SessionFlags>,
    pcm: P,
    pump: TransferPump<D, U>,
    buffer: SampleBuffer<N>,
    // Handler-owned from here down.
    transfer_count: usize,
    was_recording: bool,
    diagnostics: CaptureDiagnostics,
}

impl<D, P, U, const N: usize> CaptureSession<D, P, U, N>
where
    D: CaptureDma,
    P: PcmFifo,
    U: IsoInEndpoint,
{
    pub fn new(
        config: CaptureConfiguration,
        dma: D,
        pcm: P,
        endpoint: U,
    ) -> Result<Self, CaptureError> {
        config.validate(N).map_err(CaptureError::ConfigurationFailed)?;

        Ok(Self {
            controller: FrameSizeController::from_config(&config, N),
            transfer_count: config.nominal_frame_size,
            config,
            flags: Arc::new(SessionFlags::default()),
            pcm,
            pump: TransferPump::new(dma, endpoint),
            buffer: SampleBuffer::new(),
            was_recording: false,
            diagnostics: CaptureDiagnostics::default(),
        })
    }

    /// Register for endpoint completions, arm the first DMA block and bring
    /// up the PCM block.
    pub fn init(&mut self) -> Result<(), CaptureError> {
        self.pump.register()?;

        self.transfer_count = self.config.nominal_frame_size;
        self.pump.rearm(self.transfer_count)?;

        self.pcm.init()?;

        log::debug!(
            "audio in ready: {} samples/frame ±{}, trigger {}, capacity {}",
            self.config.nominal_frame_size,
            self.config.adjust_step,
            self.config.fifo_trigger_level,
            N
        );
        Ok(())
    }

    /// Handle for `enable()`/`disable()` from other contexts.
    pub fn control(&self) -> CaptureControl {
        CaptureControl::new(Arc::clone(&self.flags))
    }

    pub fn enable(&self) {
        self.control().enable();
    }

    pub fn disable(&self) {
        self.control().disable();
    }

    pub fn state(&self) -> SessionState {
        self.flags.state()
    }

    /// Periodic task: promotes a pending start request into a recording
    /// session.
    ///
    /// Kick-off order: silence the buffer, clear the FIFO, enable the PCM
    /// block, then issue the first (silent) transfer of one nominal frame.
    /// DMA and the transfer count stay with the completion handler.
    pub fn process(&mut self) {
        if !self.flags.take_start_request() || self.flags.is_recording() {
            return;
        }

        self.buffer.clear();
        self.pcm.clear_fifo();
        self.pcm.enable();
        self.flags.begin_recording();

        let first = self.config.nominal_frame_size;
        let result = match self.buffer.filled(first) {
            Ok(silence) => self.pump.issue(silence),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.diagnostics.sessions_started += 1;
                self.diagnostics.record_transfer(first);
                log::debug!("capture session started");
            }
            Err(e) => {
                self.diagnostics.kickoff_rejections += 1;
                if self.flags.retry_start() {
                    log::warn!("first transfer rejected ({}), retrying on next tick", e);
                } else {
                    log::debug!("first transfer rejected ({}) after disable", e);
                }
            }
        }
    }

    /// Endpoint-complete interrupt: re-issue the IN transfer, then size and
    /// re-arm the next DMA block.
    ///
    /// `error_code` comes straight from the USB stack and is only counted.
    pub fn on_endpoint_complete(&mut self, error_code: u32) {
        self.diagnostics.completions += 1;
        if error_code != 0 {
            self.diagnostics.completion_errors += 1;
        }

        let recording = self.flags.is_recording();
        if recording {
            self.was_recording = true;
            self.issue_transfer();
        } else if self.was_recording {
            self.was_recording = false;
            log::debug!(
                "capture session stopped after {} transfers",
                self.diagnostics.transfers_issued
            );
        }

        if recording || self.config.rearm_while_idle {
            self.adjust_and_rearm();
        }
    }

    // Sends the block sized by the previous completion.
    fn issue_transfer(&mut self) {
        let count = self.transfer_count;
        let result = match self.buffer.filled(count) {
            Ok(samples) => self.pump.issue(samples),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => self.diagnostics.record_transfer(count),
            Err(e) => {
                self.diagnostics.transfers_rejected += 1;
                log::trace!("transfer of {} samples rejected: {}", count, e);
            }
        }
    }

    fn adjust_and_rearm(&mut self) {
        let occupancy = OccupancyReading::sample(&self.pcm);
        let decision = self.controller.decide(occupancy);

        self.diagnostics.last_occupancy = occupancy.samples();
        match decision.adjustment {
            Adjustment::Grow => self.diagnostics.grow_decisions += 1,
            Adjustment::Shrink => self.diagnostics.shrink_decisions += 1,
            Adjustment::Hold => self.diagnostics.hold_decisions += 1,
        }
        if decision.clamped {
            self.diagnostics.clamped_decisions += 1;
            log::warn!(
                "{:?} step out of bounds at occupancy {}, holding {} samples",
                decision.adjustment,
                occupancy.samples(),
                decision.count
            );
        } else {
            log::trace!(
                "occupancy {} -> {:?}, next transfer {} samples",
                occupancy.samples(),
                decision.adjustment,
                decision.count
            );
        }

        // The next write must match the block the DMA actually runs.
        match self.pump.rearm(decision.count) {
            Ok(()) => self.transfer_count = decision.count,
            Err(e) => {
                self.diagnostics.dma_rearm_failures += 1;
                log::trace!(
                    "DMA re-arm to {} rejected: {}, keeping {}",
                    decision.count,
                    e,
                    self.transfer_count
                );
            }
        }
    }

    /// Samples the next USB write will carry.
    pub fn transfer_count(&self) -> usize {
        self.transfer_count
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        self.diagnostics
    }

    pub fn buffer(&self) -> &SampleBuffer<N> {
        &self.buffer
    }

    /// Destination of the DMA channel. Only the bus master writes here.
    pub fn dma_target(&mut self) -> &mut SampleBuffer<N> {
        &mut self.buffer
    }

    pub fn dma_mut(&mut self) -> &mut D {
        self.pump.dma_mut()
    }

    pub fn pcm(&self) -> &P {
        &self.pcm
    }

    pub fn pcm_mut(&mut self) -> &mut P {
        &mut self.pcm
    }

    pub fn endpoint_mut(&mut self) -> &mut U {
        self.pump.endpoint_mut()
    }
}
