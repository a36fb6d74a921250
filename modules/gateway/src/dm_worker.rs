//! DMWORKER - carries device management requests to devices and replies
//! back to the hub
use crate::{BLE, DM_HUB};
use gateway_sdk::{Field, Message, Reaction};

pub const FORWARD_TO_DM_HUB: &str = "forward-to-dmhub";
pub const DM_REQUEST_TO_BLE: &str = "dm-request-to-ble";

const CHARACTERISTIC_UUID: &str = "UUID";

pub(crate) fn receive(name: &str, message: &Message) -> Vec<Reaction> {
    let mut reactions = Vec::new();

    // Device reply addressed to us - pass it on to the hub
    if message.is(Field::Dest, name)
        && message.has(Field::DeviceId)
        && message.has(Field::DeviceKey)
    {
        let reply = message
            .clone()
            .with(Field::Dest, DM_HUB)
            .with(Field::Src, name)
            .without(Field::Uuid);
        reactions.push(Reaction::republish(FORWARD_TO_DM_HUB, reply));
    }

    // Hub request for a device
    if message.is(Field::Dest, BLE) && message.has(Field::Request) {
        if let Some(dm_id) = message.get(Field::DmId) {
            let request = message
                .clone()
                .with(Field::Dest, BLE)
                .with(Field::Src, name)
                .with(Field::DeviceId, dm_id)
                .with(Field::Uuid, CHARACTERISTIC_UUID)
                .without(Field::Request)
                .without(Field::DmId);
            reactions.push(Reaction::republish(DM_REQUEST_TO_BLE, request));
        }
    }

    reactions
}
