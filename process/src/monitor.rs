//! Per-module statistics, optionally written out as JSON
use anyhow::Result;
use gateway_sdk::message_bus::{BusEvent, Subscriber};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleStats {
    pub published: u64,
    pub received: u64,
    pub rejected: u64,
}

#[derive(Deserialize)]
pub struct MonitorConfig {
    output: PathBuf,
}

pub struct Monitor {
    modules: Mutex<BTreeMap<String, ModuleStats>>,
    output_path: Option<PathBuf>,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Arc<Self> {
        Arc::new(Self {
            modules: Mutex::new(BTreeMap::new()),
            output_path: Some(config.output),
        })
    }

    /// Monitor which only counts in memory
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self {
            modules: Mutex::new(BTreeMap::new()),
            output_path: None,
        })
    }

    fn record(&self, event: &BusEvent) {
        let Ok(mut modules) = self.modules.lock() else {
            return;
        };
        match event {
            BusEvent::Published(p) => {
                modules.entry(p.sender_name.clone()).or_default().published += 1
            }
            BusEvent::Received(r) => {
                modules.entry(r.receiver_name.clone()).or_default().received += 1
            }
            BusEvent::Rejected(r) => {
                modules.entry(r.sender_name.clone()).or_default().rejected += 1
            }
        }
    }

    pub fn subscriber(self: &Arc<Self>) -> Arc<Subscriber> {
        let monitor = self.clone();
        Arc::new(move |event: &BusEvent| monitor.record(event))
    }

    pub fn stats(&self) -> BTreeMap<String, ModuleStats> {
        self.modules.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Write the statistics to the configured output, if any
    pub fn write(&self) -> Result<()> {
        let Some(path) = &self.output_path else {
            return Ok(());
        };
        let serialized = serde_json::to_vec_pretty(&self.stats())?;
        fs::write(path, serialized)?;
        info!("Wrote module statistics to {}", path.display());
        Ok(())
    }
}
