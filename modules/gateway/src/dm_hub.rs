//! DMHUB - device management hub
use gateway_sdk::{Field, Message, Reaction};

pub const TERMINAL: &str = "terminal";

pub(crate) fn receive(name: &str, message: &Message) -> Vec<Reaction> {
    if message.is(Field::Dest, name)
        && message.has(Field::DeviceId)
        && message.has(Field::DeviceKey)
    {
        return vec![Reaction::report(TERMINAL)];
    }
    Vec::new()
}
