//! SIM_BLE - simulated BLE transport
//!
//! Answers any message naming a MAC address and characteristic with a fresh
//! advertisement, addressed back to whoever sent the original.
use crate::BLE;
use gateway_sdk::{Field, Message, Reaction};

pub const ADVERTISE: &str = "advertise";

const CHARACTERISTIC_UUID: &str = "UUID";

pub(crate) fn receive(message: &Message) -> Vec<Reaction> {
    if !message.has(Field::Uuid) {
        return Vec::new();
    }
    let Some(mac_address) = message.get(Field::MacAddress) else {
        return Vec::new();
    };

    let mut advert = Message::new()
        .with(Field::Src, BLE)
        .with(Field::MacAddress, mac_address)
        .with(Field::Uuid, CHARACTERISTIC_UUID);

    // An empty src names nobody to reply to
    if let Some(src) = message.get(Field::Src).filter(|src| !src.is_empty()) {
        advert = advert.with(Field::Dest, src);
    }

    vec![Reaction::republish(ADVERTISE, advert)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_to_the_original_source() {
        let message = Message::new()
            .with(Field::Src, "IoTHub")
            .with(Field::Dest, "device")
            .with(Field::Uuid, "something else")
            .with(Field::MacAddress, "01:01");

        let reactions = receive(&message);
        assert_eq!(
            reactions,
            vec![Reaction::republish(
                ADVERTISE,
                Message::new()
                    .with(Field::Src, "BLE")
                    .with(Field::Dest, "IoTHub")
                    .with(Field::MacAddress, "01:01")
                    .with(Field::Uuid, "UUID")
            )]
        );
    }

    #[test]
    fn unaddressed_without_source() {
        let message = Message::new().with(Field::Uuid, "UUID").with(Field::MacAddress, "02:02");

        let advert = receive(&message).remove(0).republish.unwrap();
        assert!(!advert.has(Field::Dest));
        assert!(advert.is(Field::MacAddress, "02:02"));
    }

    #[test]
    fn empty_source_is_not_a_destination() {
        let message = Message::new()
            .with(Field::Src, "")
            .with(Field::Uuid, "UUID")
            .with(Field::MacAddress, "01:01");

        let advert = receive(&message).remove(0).republish.unwrap();
        assert!(!advert.has(Field::Dest));
    }

    #[test]
    fn needs_uuid_and_mac_address() {
        assert!(receive(&Message::new().with(Field::Uuid, "UUID")).is_empty());
        assert!(receive(&Message::new().with(Field::MacAddress, "01:01")).is_empty());
    }
}
