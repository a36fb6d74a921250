//! Gateway modules
//!
//! The six adapters that sit on the bus, as a fixed set of variants. Each
//! module's rules live in its own file; this enum only dispatches to them.
use anyhow::{anyhow, Error, Result};
use gateway_sdk::{Message, Module, ModuleId, ModuleRegistry, Reaction};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

mod dm_hub;
mod dm_worker;
mod id_map;
mod iot_hub;
mod router;
mod sim_ble;
pub mod scenarios;

pub mod rules {
    //! Rule labels carried on receipts
    pub use crate::dm_worker::{DM_REQUEST_TO_BLE, FORWARD_TO_DM_HUB};
    pub use crate::id_map::{DEVICE_ID_TO_MAC, MAC_TO_DEVICE_ID};
    pub use crate::iot_hub::TERMINAL;
    pub use crate::router::ROUTE_TO_IOT_HUB;
    pub use crate::sim_ble::ADVERTISE;
}

pub const IOT_HUB: &str = "IoTHub";
pub const ROUTER: &str = "Router";
pub const ID_MAP: &str = "IDMAP";
pub const SIM_BLE: &str = "SIM_BLE";
pub const DM_HUB: &str = "DMHUB";
pub const DM_WORKER: &str = "DMWORKER";

/// Source name the simulated BLE transport uses
pub const BLE: &str = "BLE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayModule {
    IoTHub,
    Router,
    IdMap,
    SimBle,
    DmHub,
    DmWorker,
}

impl GatewayModule {
    /// All modules, in bus registration order
    pub const ALL: [GatewayModule; 6] = [
        GatewayModule::IoTHub,
        GatewayModule::Router,
        GatewayModule::IdMap,
        GatewayModule::SimBle,
        GatewayModule::DmHub,
        GatewayModule::DmWorker,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GatewayModule::IoTHub => IOT_HUB,
            GatewayModule::Router => ROUTER,
            GatewayModule::IdMap => ID_MAP,
            GatewayModule::SimBle => SIM_BLE,
            GatewayModule::DmHub => DM_HUB,
            GatewayModule::DmWorker => DM_WORKER,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GatewayModule::IoTHub => "Cloud hub, accepts routed device messages",
            GatewayModule::Router => "Swaps device credentials for hub credentials",
            GatewayModule::IdMap => "Maps device ids to and from MAC addresses",
            GatewayModule::SimBle => "Simulated BLE transport",
            GatewayModule::DmHub => "Device management hub",
            GatewayModule::DmWorker => "Device management worker",
        }
    }

    /// Register all six modules in order, returning their identities
    pub fn register_all(registry: &mut impl ModuleRegistry) -> Vec<(GatewayModule, ModuleId)> {
        GatewayModule::ALL
            .into_iter()
            .map(|module| (module, registry.register(Arc::new(module))))
            .collect()
    }
}

impl Module for GatewayModule {
    fn get_name(&self) -> &str {
        self.name()
    }

    fn get_description(&self) -> &str {
        self.description()
    }

    fn receive(&self, message: &Message) -> Vec<Reaction> {
        let reactions = match self {
            GatewayModule::IoTHub => iot_hub::receive(self.name(), message),
            GatewayModule::Router => router::receive(message),
            GatewayModule::IdMap => id_map::receive(message),
            GatewayModule::SimBle => sim_ble::receive(message),
            GatewayModule::DmHub => dm_hub::receive(self.name(), message),
            GatewayModule::DmWorker => dm_worker::receive(self.name(), message),
        };
        if !reactions.is_empty() {
            debug!("{} matched {} rule(s)", self.name(), reactions.len());
        }
        reactions
    }
}

impl fmt::Display for GatewayModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GatewayModule {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        GatewayModule::ALL
            .into_iter()
            .find(|module| module.name() == name)
            .ok_or_else(|| anyhow!("Unknown gateway module {name}"))
    }
}
