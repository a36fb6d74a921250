//! Gateway bus simulator 'main'
//! Registers the six gateway modules and runs the seed scenarios

use anyhow::Result;
use config::{Config, Environment, File};
use gateway_modules::{scenarios, GatewayModule};
use gateway_process::Process;
use gateway_sdk::Scenario;
use std::sync::Arc;
use tracing::info;

/// Standard main
pub fn main() -> Result<()> {

    // Initialise tracing - stdout is kept for the bus trace
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    info!("Gateway message bus simulator");

    // Read the config
    let config = Arc::new(Config::builder()
        .add_source(File::with_name("gateway").required(false))
        .add_source(Environment::with_prefix("GATEWAY"))
        .build()?);

    let scenarios = Scenario::from_config(&config)?
        .unwrap_or_else(scenarios::defaults);

    // Create the process
    let mut process = Process::create(config);

    // Register modules
    GatewayModule::register_all(&mut process);

    // Run it
    process.run(&scenarios)?;

    // Bye!
    info!("Exiting");
    Ok(())
}
