//! Main process for a gateway bus simulation
//! Owns the bus, registers modules and runs seed scenarios

use anyhow::{anyhow, Result};
use config::Config;
use gateway_sdk::config::get_sub_config;
use gateway_sdk::{Cascade, Message, MessageBus, Module, ModuleId, ModuleRegistry, Scenario};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tracing::{error, info, warn};

pub mod broadcast_bus;
use broadcast_bus::BroadcastBus;

pub mod console;
pub use console::ConsoleReporter;

pub mod monitor;
use monitor::{Monitor, MonitorConfig};

pub mod recorder;
use recorder::{RecordConfig, Recorder};

/// Main Process structure
pub struct Process {
    /// Global configuration
    config: Arc<Config>,

    /// The bus - owned here, never global
    bus: BroadcastBus,

    /// Module identities by name; a later registration wins
    modules: HashMap<String, ModuleId>,

    console: Option<Arc<ConsoleReporter<io::Stdout>>>,
    monitor: Option<Arc<Monitor>>,
    recorder: Option<Recorder>,
}

impl Process {
    /// Create a process with the given config
    pub fn create(config: Arc<Config>) -> Self {
        let mut bus = BroadcastBus::new(&get_sub_config(&config, "bus"));

        let console = if config.get_bool("console.enabled").unwrap_or(true) {
            let console = ConsoleReporter::stdout();
            bus.register_subscriber(console.subscriber());
            Some(console)
        } else {
            None
        };

        let monitor = match config.get::<MonitorConfig>("monitor") {
            Ok(monitor_config) => {
                let monitor = Monitor::new(monitor_config);
                bus.register_subscriber(monitor.subscriber());
                Some(monitor)
            }
            Err(_) => None,
        };

        let recorder = match config.get::<RecordConfig>("record") {
            Ok(record_config) => match Recorder::new(record_config) {
                Ok(recorder) => Some(recorder),
                Err(e) => {
                    warn!("Cascades will not be recorded: {e}");
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            config,
            bus,
            modules: HashMap::new(),
            console,
            monitor,
            recorder,
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn bus(&self) -> &BroadcastBus {
        &self.bus
    }

    /// Identity of the last module registered with this name
    pub fn module_id(&self, name: &str) -> Option<ModuleId> {
        self.modules.get(name).copied()
    }

    /// Publish a message as the named module
    pub fn publish_as(&self, sender: &str, message: Message) -> Result<Cascade> {
        let id = self.module_id(sender)
            .ok_or_else(|| anyhow!("No module named {sender} is registered"))?;
        Ok(self.bus.publish(id, message))
    }

    /// Run one scenario; `number` is its position in the run
    pub fn run_scenario(&self, number: usize, scenario: &Scenario) -> Result<Cascade> {
        info!("Running scenario '{}' as {}", scenario.name, scenario.sender);

        let cascade = self.publish_as(&scenario.sender, scenario.message.clone())?;
        if !cascade.is_complete() {
            warn!("Scenario '{}' was cut short by the hop limit", scenario.name);
        }
        info!("Scenario '{}' finished after {} publishes, reaching hop {}",
              scenario.name, cascade.publications().count(), cascade.max_hop());

        if let Some(recorder) = &self.recorder {
            recorder.record(number, scenario, &cascade);
        }

        Ok(cascade)
    }

    /// Run the scenarios in order, with a heading before each
    pub fn run(&self, scenarios: &[Scenario]) -> Result<Vec<Cascade>> {
        info!("Running {} scenarios...", scenarios.len());

        let mut cascades = Vec::with_capacity(scenarios.len());
        for (number, scenario) in scenarios.iter().enumerate() {
            if let Some(console) = &self.console {
                console.heading(&scenario.name);
            }
            cascades.push(self.run_scenario(number, scenario)?);
        }

        if let Some(monitor) = &self.monitor {
            monitor.write()
                .unwrap_or_else(|e| error!("Failed to write module statistics: {e}"));
        }

        Ok(cascades)
    }
}

/// Module registry implementation
impl ModuleRegistry for Process {
    /// Register a module
    fn register(&mut self, module: Arc<dyn Module>) -> ModuleId {
        let name = module.get_name().to_string();
        info!("Registering module {name}");
        let id = self.bus.register(module);
        self.modules.insert(name, id);
        id
    }
}

// -- Tests --
#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use gateway_sdk::{Field, Reaction};
    use tracing::Level;

    fn create(toml: &str) -> Process {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .try_init();

        let config = Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap();
        Process::create(Arc::new(config))
    }

    /// Strips `uuid`, reports anything that has one
    struct Stripper(&'static str);

    impl Module for Stripper {
        fn get_name(&self) -> &str {
            self.0
        }

        fn receive(&self, message: &Message) -> Vec<Reaction> {
            if message.has(Field::Uuid) {
                vec![Reaction::republish("strip", message.clone().without(Field::Uuid))]
            } else {
                Vec::new()
            }
        }
    }

    const QUIET: &str = "[console]\nenabled = false\n";

    #[test]
    fn hop_limit_comes_from_bus_section() {
        let process = create("[console]\nenabled = false\n[bus]\nhop-limit = 2\n");
        assert_eq!(process.bus().hop_limit(), 2);
    }

    #[test]
    fn publish_as_unknown_module_is_an_error() {
        let process = create(QUIET);
        let err = process.publish_as("nobody", Message::new()).unwrap_err();
        assert!(err.to_string().contains("nobody"));
    }

    #[test]
    fn later_registration_wins_name_lookup() {
        let mut process = create(QUIET);
        let first = process.register(Arc::new(Stripper("dup")));
        let second = process.register(Arc::new(Stripper("dup")));

        assert_ne!(first, second);
        assert_eq!(process.module_id("dup"), Some(second));

        // Publishing as the second still reaches the first
        let cascade = process.publish_as("dup", Message::new().with(Field::Uuid, "UUID")).unwrap();
        let receivers: Vec<_> = cascade.receipts().map(|r| r.receiver).collect();
        assert_eq!(receivers, vec![first]);
    }

    #[test]
    fn run_records_and_monitors_each_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let stats = dir.path().join("stats.json");
        let toml = format!(
            "{QUIET}[record]\npath = {:?}\n[monitor]\noutput = {:?}\n",
            dir.path().display().to_string(),
            stats.display().to_string()
        );
        let mut process = create(&toml);
        process.register(Arc::new(Stripper("a")));
        process.register(Arc::new(Stripper("b")));

        let scenarios = vec![
            Scenario::new("first one", "a", Message::new().with(Field::Uuid, "UUID")),
            Scenario::new("second", "b", Message::new()),
        ];
        let cascades = process.run(&scenarios).unwrap();

        assert_eq!(cascades.len(), 2);
        assert_eq!(cascades[0].publications().count(), 2);
        assert_eq!(cascades[1].publications().count(), 1);
        assert!(dir.path().join("0-first-one.json").is_file());
        assert!(dir.path().join("1-second.json").is_file());

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&stats).unwrap()).unwrap();
        assert_eq!(json["a"]["published"], 1);
        assert_eq!(json["b"]["published"], 2);
        assert_eq!(json["b"]["received"], 1);
    }

    #[test]
    fn run_stops_at_unknown_sender() {
        let process = create(QUIET);
        let scenarios = vec![Scenario::new("lost", "ghost", Message::new())];
        assert!(process.run(&scenarios).is_err());
    }
}
