use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

// Prints the GPS track as "lat,lon,alt" lines, one per fix.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file.tlog>", args[0]);
        return ExitCode::FAILURE;
    }

    let summary = match tlogsum::parse_file(&args[1]) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Failed to parse {}: {}", args[1], e);
            return ExitCode::FAILURE;
        }
    };

    for point in &summary.gps_track {
        match point.alt {
            Some(alt) => println!("{:.7},{:.7},{:.3}", point.lat, point.lon, alt),
            None => println!("{:.7},{:.7},", point.lat, point.lon),
        }
    }

    ExitCode::SUCCESS
}
