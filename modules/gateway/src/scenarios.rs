//! Built-in seed scenarios
use crate::{BLE, DM_HUB, IOT_HUB, SIM_BLE};
use gateway_sdk::{Field, Message, Scenario};

pub const DM_PATH: &str = "DM path";
pub const IOT_HUB_D2C: &str = "IoTHub D2C path";
pub const IOT_HUB_C2D: &str = "IoTHub C2D path";

/// Device management request from the hub, out to the device and back
pub fn dm_path() -> Scenario {
    Scenario::new(
        DM_PATH,
        DM_HUB,
        Message::new()
            .with(Field::Dest, BLE)
            .with(Field::DmId, "name")
            .with(Field::Src, DM_HUB)
            .with(Field::Request, "a DM request"),
    )
}

/// Device to cloud: a BLE advertisement routed up to IoTHub
pub fn iot_hub_d2c() -> Scenario {
    Scenario::new(
        IOT_HUB_D2C,
        SIM_BLE,
        Message::new()
            .with(Field::Src, BLE)
            .with(Field::MacAddress, "01:01")
            .with(Field::Uuid, "UUID"),
    )
}

/// Cloud to device: IoTHub addresses a device, which answers back
pub fn iot_hub_c2d() -> Scenario {
    Scenario::new(
        IOT_HUB_C2D,
        IOT_HUB,
        Message::new()
            .with(Field::Src, IOT_HUB)
            .with(Field::Dest, "device")
            .with(Field::Uuid, "UUID")
            .with(Field::DeviceId, "a device name"),
    )
}

/// The three seeds, in the order they are run
pub fn defaults() -> Vec<Scenario> {
    vec![dm_path(), iot_hub_d2c(), iot_hub_c2d()]
}
