use approx::assert_abs_diff_eq;

use audio_in_core::{CaptureConfiguration, Sample, SessionState, MAX_FRAME_SAMPLES};
use audio_in_sim::{run_scenario, DriftScenario, SimBench, SimSession};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn bench_and_session(samples_per_frame: f64) -> (SimBench, SimSession) {
    init_logging();
    let bench = SimBench::new(samples_per_frame, 254);
    let mut session: SimSession = bench.session(CaptureConfiguration::default()).unwrap();
    session.init().unwrap();
    (bench, session)
}

fn run(bench: &mut SimBench, session: &mut SimSession, frames: usize) {
    for _ in 0..frames {
        session.process();
        bench.step(session);
    }
}

fn assert_contiguous(transfers: &[Vec<Sample>]) {
    let flat: Vec<Sample> = transfers.iter().flatten().copied().collect();
    for (i, pair) in flat.windows(2).enumerate() {
        assert_eq!(
            pair[1],
            pair[0].wrapping_add(1),
            "stream breaks at sample {i}"
        );
    }
}

#[test]
fn zero_drift_stream_is_contiguous() {
    let (mut bench, mut session) = bench_and_session(48.0);
    session.enable();
    run(&mut bench, &mut session, 2_000);

    let delivered = bench.delivered();
    assert_eq!(delivered[0], vec![0; 48], "first transfer is silence");
    assert_eq!(delivered[1][0], 0);
    assert_contiguous(&delivered[1..]);

    let stats = bench.stats();
    assert_eq!(stats.fifo_overflows, 0);
    assert_eq!(stats.stale_transfers, 0);
    assert!(stats.max_completion_occupancy.unwrap() <= 56);
    assert_eq!(session.diagnostics().sessions_started, 1);
}

#[test]
fn session_start_is_silent_with_empty_fifo() {
    let (mut bench, mut session) = bench_and_session(48.0);
    session.enable();
    run(&mut bench, &mut session, 50);
    session.disable();
    run(&mut bench, &mut session, 20);
    assert!(!session.buffer().is_silent());

    session.enable();
    session.process();

    assert_eq!(session.state(), SessionState::Recording);
    assert!(session.buffer().is_silent());
    let hw = bench.hardware();
    let hw = hw.lock();
    assert!(hw.fifo.is_empty());
    assert!(hw.pcm_enabled);
}

#[test]
fn positive_drift_is_absorbed() {
    init_logging();
    let report = run_scenario(&DriftScenario {
        drift_ppm: 500.0,
        frames: 20_000,
        ..Default::default()
    })
    .unwrap();

    assert!(report.is_clean());
    assert!(report.capture.grow_decisions > 0);
    assert_eq!(report.capture.clamped_decisions, 0);
    assert!(report.bench.max_completion_occupancy.unwrap() <= 60);
    assert_abs_diff_eq!(
        report.delivered_samples_per_frame,
        report.producer_samples_per_frame,
        epsilon = 0.01
    );
}

#[test]
fn negative_drift_is_absorbed() {
    init_logging();
    let report = run_scenario(&DriftScenario {
        drift_ppm: -500.0,
        frames: 20_000,
        ..Default::default()
    })
    .unwrap();

    assert!(report.is_clean());
    assert!(report.capture.shrink_decisions > 0);
    assert!(report.capture.min_transfer_count.unwrap() >= 44);
    assert!(report.capture.max_transfer_count.unwrap() <= 52);
    assert_abs_diff_eq!(
        report.delivered_samples_per_frame,
        report.producer_samples_per_frame,
        epsilon = 0.01
    );
}

#[test]
fn drift_beyond_one_step_overflows() {
    init_logging();
    let report = run_scenario(&DriftScenario {
        drift_ppm: 90_000.0,
        frames: 2_000,
        ..Default::default()
    })
    .unwrap();

    assert!(report.bench.fifo_overflows > 0);
    assert!(!report.is_clean());
    assert!(report.capture.max_transfer_count.unwrap() <= MAX_FRAME_SAMPLES);
}

#[test]
fn drift_below_one_step_starves() {
    init_logging();
    let report = run_scenario(&DriftScenario {
        drift_ppm: -90_000.0,
        frames: 2_000,
        ..Default::default()
    })
    .unwrap();

    assert!(report.bench.stale_transfers > 0);
    assert!(report.capture.min_transfer_count.unwrap() >= 44);
}

#[test]
fn skipped_polls_are_drained_without_loss() {
    let (mut bench, mut session) = bench_and_session(48.0);
    session.enable();
    run(&mut bench, &mut session, 500);

    for _ in 0..3 {
        bench.skip_next_poll();
        run(&mut bench, &mut session, 1);
    }
    run(&mut bench, &mut session, 500);

    let stats = bench.stats();
    assert_eq!(stats.skipped_polls, 3);
    assert_eq!(stats.fifo_overflows, 0);
    assert_eq!(stats.stale_transfers, 0);
    assert!(stats.max_completion_occupancy.unwrap() > 56);

    let diag = session.diagnostics();
    assert!(diag.grow_decisions > 0);
    assert!(diag.max_transfer_count.unwrap() <= MAX_FRAME_SAMPLES);
    assert_contiguous(&bench.delivered()[1..]);
}

#[test]
fn enable_then_disable_before_process_sends_nothing() {
    let (mut bench, mut session) = bench_and_session(48.0);
    let control = session.control();
    control.enable();
    control.disable();
    run(&mut bench, &mut session, 100);

    assert!(bench.delivered().is_empty());
    assert!(session.state().is_idle());
    assert_eq!(session.diagnostics().transfers_issued, 0);
}

#[test]
fn stop_lets_last_transfer_finish_then_goes_quiet() {
    let (mut bench, mut session) = bench_and_session(48.0);
    session.enable();
    run(&mut bench, &mut session, 200);

    let in_flight_before_stop = bench.delivered().len() + 1;
    session.disable();
    run(&mut bench, &mut session, 20);

    assert_eq!(bench.delivered().len(), in_flight_before_stop);
    assert!(session.state().is_idle());
    assert!(bench.hardware().lock().endpoint.in_flight.is_none());
}

#[test]
fn restart_begins_a_fresh_session() {
    let (mut bench, mut session) = bench_and_session(48.0);
    session.enable();
    run(&mut bench, &mut session, 200);
    session.disable();
    run(&mut bench, &mut session, 20);

    let first_session = bench.delivered().len();
    session.enable();
    run(&mut bench, &mut session, 200);

    let delivered = bench.delivered();
    assert_eq!(delivered[first_session], vec![0; 48]);
    // The block armed by the last completion filled while idle and was
    // silenced at kick-off, so the first data write is silent too.
    assert_eq!(delivered[first_session + 1], vec![0; 48]);
    assert_contiguous(&delivered[first_session + 2..]);
    assert_eq!(session.diagnostics().sessions_started, 2);
    assert_eq!(bench.stats().stale_transfers, 0);
}

#[test]
fn restart_while_last_transfer_in_flight_retries_kickoff() {
    let (mut bench, mut session) = bench_and_session(48.0);
    session.enable();
    run(&mut bench, &mut session, 100);

    session.disable();
    session.enable();
    session.process();
    assert_eq!(session.state(), SessionState::Starting);
    assert_eq!(session.diagnostics().kickoff_rejections, 1);

    bench.step(&mut session);
    run(&mut bench, &mut session, 100);

    assert_eq!(session.state(), SessionState::Recording);
    assert_eq!(session.diagnostics().sessions_started, 2);
}

#[test]
fn completions_are_only_handled_once_registered() {
    init_logging();
    let mut bench = SimBench::new(48.0, 254);
    let mut session: SimSession = bench.session(CaptureConfiguration::default()).unwrap();
    session.enable();
    run(&mut bench, &mut session, 10);

    assert_eq!(bench.delivered(), vec![vec![0; 48]]);
    assert_eq!(session.diagnostics().completions, 0);
    assert_eq!(bench.stats().recorded_transfers, 0);
}

#[test]
fn dma_fault_costs_one_stale_block() {
    init_logging();
    let report = run_scenario(&DriftScenario {
        frames: 1_000,
        dma_faults: vec![300],
        ..Default::default()
    })
    .unwrap();

    assert_eq!(report.capture.dma_rearm_failures, 1);
    assert_eq!(report.bench.stale_transfers, 1);
    assert!(report.capture.max_transfer_count.unwrap() <= 52);
    assert_eq!(report.bench.fifo_overflows, 0);
}

#[test]
fn completion_errors_are_counted_only() {
    init_logging();
    let report = run_scenario(&DriftScenario {
        frames: 500,
        error_frames: vec![10, 20, 30],
        ..Default::default()
    })
    .unwrap();

    assert_eq!(report.capture.completion_errors, 3);
    assert!(report.is_clean());
}

#[test]
fn stop_frame_ends_recording() {
    init_logging();
    let report = run_scenario(&DriftScenario {
        frames: 1_000,
        stop_frame: Some(400),
        ..Default::default()
    })
    .unwrap();

    assert!(report.bench.recorded_transfers < 400);
    assert!(report.is_clean());
}

#[test]
fn report_serializes() {
    init_logging();
    let report = run_scenario(&DriftScenario {
        frames: 100,
        ..Default::default()
    })
    .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["id"].is_string());
    assert!(json["bench"]["stale_transfers"].is_number());
    assert!(json["capture"]["transfers_issued"].is_number());
}
