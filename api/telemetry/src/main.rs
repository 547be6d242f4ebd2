use std::env;
use telemetry::{City, LiveTelemetryAPI};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <city> [nodes]", args[0]);
        eprintln!("Cities: 'Singapore', 'Hong Kong'");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} Singapore", args[0]);
        eprintln!("  {} 'Hong Kong' nodes", args[0]);
        std::process::exit(1);
    }

    let city: City = args[1].parse()?;
    let api = LiveTelemetryAPI::new();

    let metrics = api.fetch_live_metrics(city).await?;

    if args.get(2).map(String::as_str) == Some("nodes") {
        let nodes = api.sensor_nodes(&metrics)?;
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    }

    Ok(())
}
