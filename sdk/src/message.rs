//! Gateway message record
//!
//! A message is a set of optional named fields. Modules only ever test a
//! field's presence or compare its value, so every field is an
//! `Option<String>` and absent fields are left out of the JSON form.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the fields a message can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Src,
    Dest,
    DeviceId,
    DeviceKey,
    IotId,
    IotKey,
    MacAddress,
    Uuid,
    DmId,
    Request,
}

impl Field {
    /// All fields, in serialization order
    pub const ALL: [Field; 10] = [
        Field::Src,
        Field::Dest,
        Field::DeviceId,
        Field::DeviceKey,
        Field::IotId,
        Field::IotKey,
        Field::MacAddress,
        Field::Uuid,
        Field::DmId,
        Field::Request,
    ];

    /// Key used on the wire
    pub fn key(self) -> &'static str {
        match self {
            Field::Src => "src",
            Field::Dest => "dest",
            Field::DeviceId => "deviceId",
            Field::DeviceKey => "deviceKey",
            Field::IotId => "iotId",
            Field::IotKey => "iotKey",
            Field::MacAddress => "macAddress",
            Field::Uuid => "uuid",
            Field::DmId => "dmId",
            Field::Request => "request",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A message in flight on the bus
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iot_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iot_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dm_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Src => &self.src,
            Field::Dest => &self.dest,
            Field::DeviceId => &self.device_id,
            Field::DeviceKey => &self.device_key,
            Field::IotId => &self.iot_id,
            Field::IotKey => &self.iot_key,
            Field::MacAddress => &self.mac_address,
            Field::Uuid => &self.uuid,
            Field::DmId => &self.dm_id,
            Field::Request => &self.request,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Src => &mut self.src,
            Field::Dest => &mut self.dest,
            Field::DeviceId => &mut self.device_id,
            Field::DeviceKey => &mut self.device_key,
            Field::IotId => &mut self.iot_id,
            Field::IotKey => &mut self.iot_key,
            Field::MacAddress => &mut self.mac_address,
            Field::Uuid => &mut self.uuid,
            Field::DmId => &mut self.dm_id,
            Field::Request => &mut self.request,
        }
    }

    /// Value of a field, if present
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Is the field present at all (even if empty)?
    pub fn has(&self, field: Field) -> bool {
        self.slot(field).is_some()
    }

    /// Is the field present with exactly this value?
    pub fn is(&self, field: Field, value: &str) -> bool {
        self.get(field) == Some(value)
    }

    /// Derive a message with the field set
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    /// Derive a message with the field removed
    pub fn without(mut self, field: Field) -> Self {
        *self.slot_mut(field) = None;
        self
    }

    /// Fields present, in serialization order
    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }
}

/// Deterministic JSON rendering used in traces
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
