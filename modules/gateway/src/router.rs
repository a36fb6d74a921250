//! Router - turns device credentials into IoTHub credentials
use crate::IOT_HUB;
use gateway_sdk::{Field, Message, Reaction};

pub const ROUTE_TO_IOT_HUB: &str = "route-to-iothub";

pub(crate) fn receive(message: &Message) -> Vec<Reaction> {
    let unaddressed_or_hub = !message.has(Field::Dest) || message.is(Field::Dest, IOT_HUB);

    if unaddressed_or_hub && message.has(Field::DeviceId) && message.has(Field::DeviceKey) {
        let routed = message
            .clone()
            .with(Field::Dest, IOT_HUB)
            .with(Field::IotId, IOT_HUB)
            .with(Field::IotKey, IOT_HUB)
            .without(Field::DeviceId)
            .without(Field::DeviceKey);
        return vec![Reaction::republish(ROUTE_TO_IOT_HUB, routed)];
    }
    Vec::new()
}
