//! Cascade recorder - writes each scenario's events to a JSON file
use anyhow::{Error, Result};
use gateway_sdk::{Cascade, Scenario};
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Deserialize)]
pub struct RecordConfig {
    path: PathBuf,
}

pub struct Recorder {
    path: PathBuf,
}

impl Recorder {
    pub fn new(config: RecordConfig) -> Result<Self> {
        if !config.path.is_dir() {
            error!("Path does not exist or is not directory for recorder");
            return Err(Error::msg("Path does not exist or is not directory for recorder"));
        }
        info!("Recording cascades to {}", config.path.display());
        Ok(Self { path: config.path })
    }

    /// Record a cascade as `<number>-<scenario slug>.json`
    pub fn record(&self, number: usize, scenario: &Scenario, cascade: &Cascade) {
        let filename = self.path.join(format!("{number}-{}.json", scenario.slug()));
        match File::create(&filename) {
            Ok(file) => {
                if let Err(error) = serde_json::to_writer_pretty(file, cascade) {
                    error!("Failed to record cascade to file {:?}: {}", &filename, error);
                }
            }
            Err(error) => {
                error!("Failed to record cascade to file {:?}: {}", &filename, error);
            }
        }
    }
}
