#[macro_use]
extern crate log;

use dashboard::{RefreshCoordinator, StressReadout};
use risknodes::RiskNodeAPI;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use strategist::StrategistAPI;
use telemetry::{City, LiveTelemetryAPI};

const WATCH_INTERVAL: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    info!("Starting resilience dashboard...");

    let args: Vec<String> = env::args().collect();
    let watch = args.iter().any(|a| a == "--watch");
    let city: Option<City> = match args.get(1) {
        Some(a) if !a.starts_with("--") => Some(a.parse()?),
        _ => None,
    };

    let coordinator = Arc::new(RefreshCoordinator::new(
        Arc::new(LiveTelemetryAPI::new()),
        Arc::new(RiskNodeAPI::new()),
        Arc::new(StrategistAPI::new()),
    ));

    let cities: Vec<City> = match city {
        Some(c) => vec![c],
        None => City::all().to_vec(),
    };

    for &c in &cities {
        coordinator.refresh(c, true).await;
        print_snapshot(&coordinator, c)?;
    }

    if watch {
        let mut interval = tokio::time::interval(WATCH_INTERVAL);
        interval.tick().await; // Skip immediate first trigger
        loop {
            interval.tick().await;
            for &c in &cities {
                coordinator.refresh(c, false).await;
                print_snapshot(&coordinator, c)?;
            }
        }
    }

    Ok(())
}

fn print_snapshot(
    coordinator: &RefreshCoordinator,
    city: City,
) -> Result<(), anyhow::Error> {
    let state = coordinator.snapshot();

    println!("=== {} ===", city);
    println!("{}", serde_json::to_string_pretty(&state)?);

    match StressReadout::from_metrics(&state.metrics) {
        Ok(readout) => {
            println!(
                "compound risk {}/100 ({}), heat {:.0}%, rain {:.0}%",
                readout.compound_risk,
                readout.classification,
                readout.heat_stress.floor(),
                readout.rain_stress.floor()
            );
        }
        Err(e) => warn!("no stress readout for {}: {}", city, e),
    }

    Ok(())
}
