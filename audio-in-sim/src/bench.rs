use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use audio_in_core::{
    CaptureConfiguration, CaptureError, CaptureSession, Sample, MAX_FRAME_SAMPLES,
};

use crate::error::SimError;
use crate::hardware::{SharedHardware, SimDma, SimEndpoint, SimHardware, SimPcm};
use crate::report::RunReport;
use crate::scenario::DriftScenario;

/// Capture session wired to the simulated hardware.
pub type SimSession<const N: usize = MAX_FRAME_SAMPLES> =
    CaptureSession<SimDma, SimPcm, SimEndpoint, N>;

/// Counters gathered by the bench while stepping the clocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BenchStats {
    pub frames: u64,
    pub samples_produced: u64,
    /// Samples the FIFO dropped while a session was recording.
    pub fifo_overflows: u64,
    /// Recording transfers that went out without a fresh, complete DMA block.
    pub stale_transfers: u64,
    pub skipped_polls: u64,
    pub recorded_transfers: u64,
    pub recorded_samples: u64,
    pub peak_fifo_level: usize,
    pub min_completion_occupancy: Option<usize>,
    pub max_completion_occupancy: Option<usize>,
}

/// Drives the two clock domains against a capture session.
///
/// Each `step` is one USB frame:
/// ```text
/// PDM clock  ──▶ FIFO  (samples_per_frame, fractional carry)
/// DMA        ──▶ FIFO → session sample buffer
/// host poll  ──▶ in-flight transfer completes → on_endpoint_complete()
/// ```
pub struct SimBench {
    hardware: SharedHardware,
    samples_per_frame: f64,
    phase: f64,
    next_value: Sample,
    skip_next_poll: bool,
    next_error_code: u32,
    last_sent_block: u64,
    stats: BenchStats,
}

impl SimBench {
    pub fn new(samples_per_frame: f64, fifo_depth: usize) -> Self {
        Self {
            hardware: SimHardware::shared(fifo_depth),
            samples_per_frame,
            phase: 0.0,
            next_value: 0,
            skip_next_poll: false,
            next_error_code: 0,
            last_sent_block: 0,
            stats: BenchStats::default(),
        }
    }

    /// Build a session whose collaborators are this bench's hardware.
    pub fn session<const N: usize>(
        &self,
        config: CaptureConfiguration,
    ) -> Result<SimSession<N>, CaptureError> {
        CaptureSession::new(
            config,
            SimDma::new(Arc::clone(&self.hardware)),
            SimPcm::new(Arc::clone(&self.hardware)),
            SimEndpoint::new(Arc::clone(&self.hardware)),
        )
    }

    pub fn hardware(&self) -> SharedHardware {
        Arc::clone(&self.hardware)
    }

    pub fn stats(&self) -> BenchStats {
        self.stats
    }

    /// Every transfer the host has received so far, in order.
    pub fn delivered(&self) -> Vec<Vec<Sample>> {
        self.hardware.lock().endpoint.delivered.clone()
    }

    /// The host misses the next poll; the in-flight transfer stays queued.
    pub fn skip_next_poll(&mut self) {
        self.skip_next_poll = true;
    }

    /// Refuse the next DMA re-arm with `DmaBusy`.
    pub fn reject_next_rearm(&mut self) {
        self.hardware.lock().dma.reject_rearms += 1;
    }

    /// Report `code` with the next completion.
    pub fn complete_next_with_error(&mut self, code: u32) {
        self.next_error_code = code;
    }

    /// Advance both clocks by one USB frame.
    pub fn step<const N: usize>(&mut self, session: &mut SimSession<N>) {
        self.stats.frames += 1;
        let recording = session.state().is_recording();

        self.produce(recording);
        self.service_dma(session);

        if std::mem::take(&mut self.skip_next_poll) {
            self.stats.skipped_polls += 1;
            return;
        }

        let completed = {
            let mut hw = self.hardware.lock();
            match hw.endpoint.in_flight.take() {
                Some(samples) => {
                    let len = samples.len();
                    hw.endpoint.delivered.push(samples);
                    let fresh = hw.dma.remaining() == 0
                        && hw.dma.completed_blocks > self.last_sent_block;
                    let block = hw.dma.completed_blocks;
                    Some((len, hw.fifo.count(), fresh, block, hw.endpoint.registered))
                }
                None => None,
            }
        };

        // The lock is released before the handler runs; its collaborators take it again.
        if let Some((len, occupancy, fresh, block, registered)) = completed {
            if !registered {
                log::trace!("{} samples completed with no callback registered", len);
                return;
            }
            if session.state().is_recording() {
                self.stats.recorded_transfers += 1;
                self.stats.recorded_samples += len as u64;
                self.stats.min_completion_occupancy = Some(
                    self.stats
                        .min_completion_occupancy
                        .map_or(occupancy, |m| m.min(occupancy)),
                );
                self.stats.max_completion_occupancy = Some(
                    self.stats
                        .max_completion_occupancy
                        .map_or(occupancy, |m| m.max(occupancy)),
                );
                if !fresh {
                    self.stats.stale_transfers += 1;
                }
                self.last_sent_block = block;
            }
            session.on_endpoint_complete(std::mem::take(&mut self.next_error_code));
        }
    }

    fn produce(&mut self, recording: bool) {
        self.phase += self.samples_per_frame;
        let count = self.phase.floor() as usize;
        self.phase -= count as f64;

        let mut hw = self.hardware.lock();
        if !hw.pcm_enabled {
            return;
        }

        let overflows_before = hw.fifo.overflows();
        for _ in 0..count {
            hw.fifo.push(self.next_value);
            self.next_value = self.next_value.wrapping_add(1);
        }
        self.stats.samples_produced += count as u64;
        if recording {
            self.stats.fifo_overflows += hw.fifo.overflows() - overflows_before;
        }
        self.stats.peak_fifo_level = self.stats.peak_fifo_level.max(hw.fifo.count());
    }

    fn service_dma<const N: usize>(&self, session: &mut SimSession<N>) {
        let mut hw = self.hardware.lock();
        let remaining = hw.dma.remaining();
        if remaining == 0 {
            return;
        }

        let samples = hw.fifo.read(remaining);
        let offset = hw.dma.transferred;
        match session.dma_target().write_at(offset, &samples) {
            Ok(()) => {
                hw.dma.transferred += samples.len();
                if hw.dma.transferred == hw.dma.length {
                    hw.dma.enabled = false;
                    hw.dma.completed_blocks += 1;
                }
            }
            Err(e) => {
                log::error!("DMA block ran past the sample buffer: {}", e);
                hw.dma.enabled = false;
            }
        }
    }
}

/// Run a whole scenario against a fresh bench and session.
pub fn run_scenario(scenario: &DriftScenario) -> Result<RunReport, SimError> {
    scenario.validate()?;

    let started_at = Utc::now();
    let producer_rate = scenario.producer_samples_per_frame();
    let mut bench = SimBench::new(producer_rate, scenario.fifo_depth);
    let mut session: SimSession = bench.session(scenario.capture.clone())?;
    session.init()?;
    let control = session.control();

    for frame in 0..scenario.frames {
        if frame == scenario.start_frame {
            control.enable();
        }
        if scenario.stop_frame == Some(frame) {
            control.disable();
        }
        if scenario.skipped_polls.contains(&frame) {
            bench.skip_next_poll();
        }
        if scenario.dma_faults.contains(&frame) {
            bench.reject_next_rearm();
        }
        if scenario.error_frames.contains(&frame) {
            bench.complete_next_with_error(1);
        }

        session.process();
        bench.step(&mut session);
    }

    let stats = bench.stats();
    log::debug!(
        "{} frames at {:+} ppm: {} transfers, {} overflows, {} stale",
        stats.frames,
        scenario.drift_ppm,
        stats.recorded_transfers,
        stats.fifo_overflows,
        stats.stale_transfers
    );

    Ok(RunReport::new(
        started_at,
        scenario.drift_ppm,
        producer_rate,
        stats,
        session.diagnostics(),
    ))
}
