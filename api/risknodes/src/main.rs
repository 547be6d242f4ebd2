use risknodes::RiskNodeAPI;
use std::env;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <lat> <lng> [query]", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} 1.3521 103.8198", args[0]);
        eprintln!("  {} 22.3193 114.1694 'heat, flooding, and grid stability'", args[0]);
        std::process::exit(1);
    }

    let lat: f64 = args[1].parse()?;
    let lng: f64 = args[2].parse()?;
    let query = args
        .get(3)
        .map(String::as_str)
        .unwrap_or("heat, flooding, and grid stability");

    let api = RiskNodeAPI::new();
    let nodes = api.nearby_nodes(lat, lng, query).await?;

    println!("{}", serde_json::to_string_pretty(&nodes)?);

    Ok(())
}
