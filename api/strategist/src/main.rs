use std::env;
use strategist::{DashboardModule, StrategistAPI};
use telemetry::{City, LiveTelemetryAPI};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <city>", args[0]);
        eprintln!("Cities: 'Singapore', 'Hong Kong'");
        std::process::exit(1);
    }

    let city: City = args[1].parse()?;

    let metrics = LiveTelemetryAPI::new().fetch_live_metrics(city).await?;
    let insight = StrategistAPI::new()
        .derive_insight(city, &metrics, DashboardModule::Overview)
        .await?;

    println!("{}", serde_json::to_string_pretty(&insight)?);

    Ok(())
}
