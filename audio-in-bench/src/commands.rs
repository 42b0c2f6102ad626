use std::path::PathBuf;

use serde::Serialize;

use audio_in_sim::{run_scenario, DriftScenario, RunReport, SimError};

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run one scenario, from a JSON file or the defaults.
    Run {
        scenario: Option<PathBuf>,
        drift_ppm: Option<f64>,
    },
    /// Run the default scenario across a range of drifts.
    Sweep { max_ppm: f64, points: u32 },
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, String> {
        match args.first().map(String::as_str) {
            Some("sweep") => {
                let max_ppm = parse_number(args.get(1), 2_000.0, "max ppm")?;
                let points = parse_number(args.get(2), 9, "points")?;
                if points < 2 {
                    return Err("sweep needs at least 2 points".into());
                }
                Ok(Self::Sweep { max_ppm, points })
            }
            _ => {
                let mut scenario = None;
                let mut drift_ppm = None;
                let mut iter = args.iter();
                while let Some(arg) = iter.next() {
                    if arg == "--drift" {
                        drift_ppm = Some(parse_number(iter.next(), 0.0, "drift")?);
                    } else {
                        scenario = Some(PathBuf::from(arg));
                    }
                }
                Ok(Self::Run {
                    scenario,
                    drift_ppm,
                })
            }
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    arg: Option<&String>,
    default: T,
    what: &str,
) -> Result<T, String> {
    match arg {
        Some(s) => s.parse().map_err(|_| format!("invalid {}: {}", what, s)),
        None => Ok(default),
    }
}

/// One row of a drift sweep.
#[derive(Clone, Serialize)]
pub struct SweepPoint {
    pub drift_ppm: f64,
    pub clean: bool,
    pub fifo_overflows: u64,
    pub stale_transfers: u64,
    pub peak_fifo_level: usize,
}

impl From<&RunReport> for SweepPoint {
    fn from(report: &RunReport) -> Self {
        Self {
            drift_ppm: report.drift_ppm,
            clean: report.is_clean(),
            fifo_overflows: report.bench.fifo_overflows,
            stale_transfers: report.bench.stale_transfers,
            peak_fifo_level: report.bench.peak_fifo_level,
        }
    }
}

pub fn run(scenario: Option<PathBuf>, drift_ppm: Option<f64>) -> Result<RunReport, SimError> {
    let mut scenario = match scenario {
        Some(path) => DriftScenario::load(path)?,
        None => DriftScenario::default(),
    };
    if let Some(ppm) = drift_ppm {
        scenario.drift_ppm = ppm;
    }
    run_scenario(&scenario)
}

pub fn sweep(max_ppm: f64, points: u32) -> Result<Vec<SweepPoint>, SimError> {
    let step = 2.0 * max_ppm / (points - 1) as f64;
    (0..points)
        .map(|i| {
            let scenario = DriftScenario {
                drift_ppm: -max_ppm + step * i as f64,
                ..Default::default()
            };
            run_scenario(&scenario).map(|report| SweepPoint::from(&report))
        })
        .collect()
}
