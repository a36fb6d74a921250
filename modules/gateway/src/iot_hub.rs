//! IoTHub - cloud side of the field gateway
use gateway_sdk::{Field, Message, Reaction};

pub const TERMINAL: &str = "terminal";

/// Accepts messages addressed to it that carry IoT credentials
pub(crate) fn receive(name: &str, message: &Message) -> Vec<Reaction> {
    if message.is(Field::Dest, name)
        && message.has(Field::IotId)
        && message.has(Field::IotKey)
    {
        return vec![Reaction::report(TERMINAL)];
    }
    Vec::new()
}
