//! IDMAP - maps between device ids and MAC addresses
//!
//! The two rules are independent. A message carrying both a device id and a
//! MAC address matches both and is mapped twice, device id first.
use gateway_sdk::{Field, Message, Reaction};

pub const DEVICE_ID_TO_MAC: &str = "device-id-to-mac";
pub const MAC_TO_DEVICE_ID: &str = "mac-to-device-id";

const MAC_ADDRESS: &str = "01:01";
const DEVICE_NAME: &str = "name";
const DEVICE_KEY: &str = "key";

pub(crate) fn receive(message: &Message) -> Vec<Reaction> {
    let mut reactions = Vec::new();

    if message.has(Field::DeviceId) {
        let mapped = message
            .clone()
            .without(Field::DeviceId)
            .with(Field::MacAddress, MAC_ADDRESS);
        reactions.push(Reaction::republish(DEVICE_ID_TO_MAC, mapped));
    }

    if message.has(Field::MacAddress) {
        let mapped = message
            .clone()
            .without(Field::MacAddress)
            .with(Field::DeviceId, DEVICE_NAME)
            .with(Field::DeviceKey, DEVICE_KEY);
        reactions.push(Reaction::republish(MAC_TO_DEVICE_ID, mapped));
    }

    reactions
}
