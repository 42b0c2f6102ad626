mod commands;

use std::process::ExitCode;

use commands::Command;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            log::error!("{}", e);
            eprintln!(
                "usage: audio-in-bench [SCENARIO.json] [--drift PPM] | sweep [MAX_PPM] [POINTS]"
            );
            return ExitCode::FAILURE;
        }
    };

    let output = match command {
        Command::Run {
            scenario,
            drift_ppm,
        } => commands::run(scenario, drift_ppm).and_then(|report| {
            if !report.is_clean() {
                log::warn!(
                    "stream was not clean: {} overflows, {} stale transfers",
                    report.bench.fifo_overflows,
                    report.bench.stale_transfers
                );
            }
            Ok(serde_json::to_string_pretty(&report)?)
        }),
        Command::Sweep { max_ppm, points } => commands::sweep(max_ppm, points)
            .and_then(|rows| Ok(serde_json::to_string_pretty(&rows)?)),
    };

    match output {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
