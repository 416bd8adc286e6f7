// Walk-through of a small rental shop: add bikes, rent, list, return and
// switch notification channel on the same catalog.

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use bike_rental::{
    BikeData, BikeRepository, InMemoryBikeRepository, NotificationChannel, RentalConfig,
    RentalService, ReturnOutcome,
};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bike-rental", version, about = "In-memory bike rental demo")]
struct Cli {
    #[arg(long, help = "JSON file with a rental configuration")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, help = "Notification channel, overrides the config file")]
    channel: Option<NotificationChannel>,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn initialize_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // stdout carries the demo output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<RentalConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            RentalConfig::from_json_str(&text)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => RentalConfig::default(),
    };

    if let Some(channel) = cli.channel {
        config.notification_channel = channel;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level);

    let config = load_config(&cli)?;
    tracing::debug!(?config, "configuration loaded");

    let repo = Arc::new(InMemoryBikeRepository::new());
    let service = RentalService::from_config(repo.clone(), config.clone());

    let inputs = vec![
        json!({"type": "mountain", "model": "Trek Marlin", "price_per_hour": 10.0}),
        json!({"type": "road", "model": "Specialized Allez", "price_per_hour": 12.0}),
        json!({
            "type": "electric",
            "model": "Rad Power",
            "price_per_hour": 15.0,
            "battery_capacity": 500
        }),
        json!({
            "type": "water bike",
            "model": "Ris Power",
            "price_per_hour": 30.0,
            "battery_capacity": 300
        }),
    ];

    let mut bike_ids = Vec::new();
    for input in inputs {
        let data: BikeData = serde_json::from_value(input).context("bike data must be an object")?;
        match service.add_bike(&data) {
            Ok(bike_id) => {
                if let Some(bike) = repo.find_by_id(&bike_id) {
                    println!("Added: {}", bike.description());
                }
                bike_ids.push(bike_id);
            }
            Err(err) => println!("Skipped: {err}"),
        }
    }

    let (Some(first), Some(second)) = (bike_ids.first(), bike_ids.get(1)) else {
        anyhow::bail!("expected at least two bikes in the catalog");
    };

    println!("\nRenting bikes...");
    service.rent_bike(first, "customer_123");
    service.rent_bike(second, "customer_456");

    println!("\nAvailable bikes:");
    for bike in service.available_bikes() {
        println!("  - {}", bike.description());
    }

    println!("\nReturning bike...");
    match service.settle_return(first) {
        Some(ReturnOutcome::Returned(receipt)) => println!("Return cost: ${:.2}", receipt.cost),
        Some(ReturnOutcome::NotRented) => println!("Bike {first} was not rented"),
        None => println!("Bike {first} is not in the catalog"),
    }

    println!("\nSwitching to SMS notifications...");
    let sms_service = RentalService::from_config(
        repo,
        RentalConfig {
            notification_channel: NotificationChannel::Sms,
            ..config
        },
    );
    sms_service.rent_bike(first, "customer_789");

    tracing::info!(
        first = ?service.stats(),
        second = ?sms_service.stats(),
        "rental statistics"
    );

    Ok(())
}
