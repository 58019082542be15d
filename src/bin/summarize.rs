use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file.tlog> [--json]", args[0]);
        return ExitCode::FAILURE;
    }

    let file_path = &args[1];
    let json = args.contains(&"--json".to_string());

    let summary = match tlogsum::parse_file(file_path) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Failed to parse {}: {}", file_path, e);
            return ExitCode::FAILURE;
        }
    };

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Failed to serialize summary: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("messages:  {}", summary.message_count);
        if let Some(start) = summary.start_time {
            println!("start:     {}", start);
        }
        if let Some(end) = summary.end_time {
            println!("end:       {}", end);
        }
        if let Some(duration) = summary.duration_seconds {
            println!("duration:  {:.1}s", duration);
        }
        println!("track:     {} points", summary.gps_track.len());
        println!("incidents: {}", summary.incidents.len());
        for incident in &summary.incidents {
            println!("  [{:?}] {}", incident.severity, incident.description);
        }
    }

    ExitCode::SUCCESS
}
