//! Bus events and the MessageBus trait
use crate::message::Message;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Identity of a registered module, assigned by the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleId(usize);

impl ModuleId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A message put on the bus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Publication {
    /// Position of this publish within its cascade, starting at 0
    pub index: usize,

    /// Hop count of the lineage, seed is 0
    pub hop: u32,

    pub sender: ModuleId,
    pub sender_name: String,
    pub message: Message,
}

/// A module's rule matched a publication
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    /// Index of the publication that was received
    pub publication: usize,
    pub hop: u32,
    pub receiver: ModuleId,
    pub receiver_name: String,
    pub rule: &'static str,
    pub message: Message,
}

/// A derived message dropped because its lineage hit the hop limit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    /// Hop the message would have had
    pub hop: u32,
    pub limit: u32,
    pub sender: ModuleId,
    pub sender_name: String,
    pub message: Message,
}

/// Everything observable on the bus
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum BusEvent {
    Published(Publication),
    Received(Receipt),
    Rejected(Rejection),
}

/// Ordered record of all events produced by one seed publish
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Cascade {
    pub events: Vec<BusEvent>,
}

impl Cascade {
    pub fn publications(&self) -> impl Iterator<Item = &Publication> {
        self.events.iter().filter_map(|event| match event {
            BusEvent::Published(publication) => Some(publication),
            _ => None,
        })
    }

    pub fn receipts(&self) -> impl Iterator<Item = &Receipt> {
        self.events.iter().filter_map(|event| match event {
            BusEvent::Received(receipt) => Some(receipt),
            _ => None,
        })
    }

    pub fn rejections(&self) -> impl Iterator<Item = &Rejection> {
        self.events.iter().filter_map(|event| match event {
            BusEvent::Rejected(rejection) => Some(rejection),
            _ => None,
        })
    }

    /// Receipts at modules with the given name
    pub fn receipts_at<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Receipt> + 'a {
        self.receipts().filter(move |receipt| receipt.receiver_name == name)
    }

    /// Highest hop reached by any publication
    pub fn max_hop(&self) -> u32 {
        self.publications().map(|publication| publication.hop).max().unwrap_or(0)
    }

    /// True if no lineage was cut by the hop limit
    pub fn is_complete(&self) -> bool {
        self.rejections().next().is_none()
    }
}

/// Subscriber function type - called with each event as it happens
pub type Subscriber = dyn Fn(&BusEvent) + Send + Sync + 'static;

/// Generic MessageBus trait
pub trait MessageBus: Send + Sync {
    /// Publish a message as `sender` and run the resulting cascade to completion
    fn publish(&self, sender: ModuleId, message: Message) -> Cascade;

    /// Register a subscriber to be told about every event
    fn register_subscriber(&mut self, subscriber: Arc<Subscriber>);
}
