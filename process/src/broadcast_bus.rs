// Broadcast bus - every publish goes to every other registered module
use config::Config;
use gateway_sdk::message_bus::{
    BusEvent, Cascade, MessageBus, ModuleId, Publication, Receipt, Rejection, Subscriber,
};
use gateway_sdk::{Message, Module, ModuleRegistry};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_HOP_LIMIT: i64 = 16;

/// A message waiting to be dispatched
struct Pending {
    sender: ModuleId,
    message: Message,
    hop: u32,
}

/// Broadcast bus.
///
/// Derived messages are queued and dispatched breadth-first, each carrying
/// the hop count of its lineage. A derived message that would go past the
/// hop limit is rejected instead of queued, so a cyclic rule set ends in a
/// `Rejected` event rather than running forever.
pub struct BroadcastBus {

    // Registered modules, in registration order
    modules: Vec<Arc<dyn Module>>,

    // Told about every event
    subscribers: Vec<Arc<Subscriber>>,

    // Highest hop a derived message may have
    hop_limit: u32,
}

impl BroadcastBus {
    pub fn new(config: &Config) -> Self {
        let hop_limit = config.get_int("hop-limit")
            .unwrap_or(DEFAULT_HOP_LIMIT)
            .clamp(0, u32::MAX as i64) as u32;

        info!("Creating broadcast bus with hop limit {hop_limit}");

        Self::with_hop_limit(hop_limit)
    }

    pub fn with_hop_limit(hop_limit: u32) -> Self {
        Self {
            modules: Vec::new(),
            subscribers: Vec::new(),
            hop_limit,
        }
    }

    pub fn hop_limit(&self) -> u32 {
        self.hop_limit
    }

    /// Registered modules with their identities, in registration order
    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &Arc<dyn Module>)> {
        self.modules.iter().enumerate().map(|(index, module)| (ModuleId::new(index), module))
    }

    fn name_of(&self, id: ModuleId) -> String {
        match self.modules.get(id.index()) {
            Some(module) => module.get_name().to_string(),
            None => id.to_string(),
        }
    }

    fn emit(&self, cascade: &mut Cascade, event: BusEvent) {
        for subscriber in self.subscribers.iter() {
            subscriber(&event);
        }
        cascade.events.push(event);
    }
}

impl ModuleRegistry for BroadcastBus {
    fn register(&mut self, module: Arc<dyn Module>) -> ModuleId {
        let id = ModuleId::new(self.modules.len());
        debug!("Registering module {} as {id}", module.get_name());
        self.modules.push(module);
        id
    }
}

impl MessageBus for BroadcastBus {

    /// Publish a message and dispatch everything it leads to
    fn publish(&self, sender: ModuleId, message: Message) -> Cascade {
        let mut cascade = Cascade::default();
        let mut queue = VecDeque::from([Pending { sender, message, hop: 0 }]);
        let mut next_index = 0;

        while let Some(Pending { sender, message, hop }) = queue.pop_front() {
            let index = next_index;
            next_index += 1;

            debug!("Dispatching publish {index} from {sender} at hop {hop}");
            self.emit(&mut cascade, BusEvent::Published(Publication {
                index,
                hop,
                sender,
                sender_name: self.name_of(sender),
                message: message.clone(),
            }));

            for (id, module) in self.modules() {
                if id == sender {
                    continue;
                }

                for reaction in module.receive(&message) {
                    self.emit(&mut cascade, BusEvent::Received(Receipt {
                        publication: index,
                        hop,
                        receiver: id,
                        receiver_name: module.get_name().to_string(),
                        rule: reaction.rule,
                        message: message.clone(),
                    }));

                    let Some(derived) = reaction.republish else {
                        continue;
                    };

                    if hop >= self.hop_limit {
                        warn!("Hop limit {} exceeded - dropping message from {}",
                              self.hop_limit, module.get_name());
                        self.emit(&mut cascade, BusEvent::Rejected(Rejection {
                            hop: hop + 1,
                            limit: self.hop_limit,
                            sender: id,
                            sender_name: module.get_name().to_string(),
                            message: derived,
                        }));
                    } else {
                        queue.push_back(Pending { sender: id, message: derived, hop: hop + 1 });
                    }
                }
            }
        }

        cascade
    }

    fn register_subscriber(&mut self, subscriber: Arc<Subscriber>) {
        self.subscribers.push(subscriber);
    }
}

// -- Tests --
#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use gateway_sdk::{Field, Reaction};
    use std::sync::Mutex;
    use tracing::Level;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    /// Reports every message it sees, republishing with its own name as src
    struct Echo {
        name: &'static str,
        seen: Mutex<Vec<Message>>,
    }

    impl Echo {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self { name, seen: Mutex::new(Vec::new()) })
        }
    }

    impl Module for Echo {
        fn get_name(&self) -> &str {
            self.name
        }

        fn receive(&self, message: &Message) -> Vec<Reaction> {
            self.seen.lock().unwrap().push(message.clone());
            vec![Reaction::republish("echo", message.clone().with(Field::Src, self.name))]
        }
    }

    /// Reports messages with the given field, never republishes
    struct Sink {
        name: &'static str,
        field: Field,
    }

    impl Module for Sink {
        fn get_name(&self) -> &str {
            self.name
        }

        fn receive(&self, message: &Message) -> Vec<Reaction> {
            if message.has(self.field) {
                vec![Reaction::report("sink")]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn hop_limit_is_read_from_config() {
        let config = Config::builder()
            .add_source(config::File::from_str("hop-limit = 3", FileFormat::Toml))
            .build()
            .unwrap();
        assert_eq!(BroadcastBus::new(&config).hop_limit(), 3);
        assert_eq!(BroadcastBus::new(&Config::default()).hop_limit(), DEFAULT_HOP_LIMIT as u32);
    }

    #[test]
    fn sender_does_not_receive_its_own_publish() {
        init_tracing();
        let mut bus = BroadcastBus::with_hop_limit(0);
        let a = bus.register(Arc::new(Sink { name: "a", field: Field::Uuid }));
        let b = bus.register(Arc::new(Sink { name: "b", field: Field::Uuid }));

        let cascade = bus.publish(a, Message::new().with(Field::Uuid, "UUID"));

        let receivers: Vec<_> = cascade.receipts().map(|r| r.receiver).collect();
        assert_eq!(receivers, vec![b]);
    }

    #[test]
    fn exclusion_is_by_identity_not_name() {
        let mut bus = BroadcastBus::with_hop_limit(0);
        let first = bus.register(Arc::new(Sink { name: "twin", field: Field::Uuid }));
        let second = bus.register(Arc::new(Sink { name: "twin", field: Field::Uuid }));

        let cascade = bus.publish(first, Message::new().with(Field::Uuid, "UUID"));

        let receivers: Vec<_> = cascade.receipts().map(|r| r.receiver).collect();
        assert_eq!(receivers, vec![second]);
    }

    #[test]
    fn unmatched_message_produces_only_the_publish() {
        let mut bus = BroadcastBus::with_hop_limit(4);
        let a = bus.register(Arc::new(Sink { name: "a", field: Field::Uuid }));
        bus.register(Arc::new(Sink { name: "b", field: Field::Uuid }));

        let cascade = bus.publish(a, Message::new().with(Field::Dest, "nowhere"));

        assert_eq!(cascade.events.len(), 1);
        assert_eq!(cascade.publications().count(), 1);
        assert!(cascade.is_complete());
    }

    #[test]
    fn derived_messages_are_dispatched_breadth_first() {
        init_tracing();
        let mut bus = BroadcastBus::with_hop_limit(1);
        let seed = bus.register(Arc::new(Sink { name: "seed", field: Field::Request }));
        bus.register(Echo::new("x"));
        bus.register(Echo::new("y"));

        let cascade = bus.publish(seed, Message::new());

        let order: Vec<_> = cascade
            .publications()
            .map(|p| (p.sender_name.as_str(), p.hop))
            .collect();
        assert_eq!(order, vec![("seed", 0), ("x", 1), ("y", 1)]);
    }

    #[test]
    fn cyclic_modules_are_cut_at_the_hop_limit() {
        init_tracing();
        let mut bus = BroadcastBus::with_hop_limit(5);
        let ping = Echo::new("ping");
        let pong = Echo::new("pong");
        let ping_id = bus.register(ping.clone());
        bus.register(pong.clone());

        let cascade = bus.publish(ping_id, Message::new());

        // ping and pong bounce one lineage back and forth
        assert_eq!(cascade.max_hop(), 5);
        assert_eq!(cascade.publications().count(), 6);
        assert!(!cascade.is_complete());

        let rejections: Vec<_> = cascade.rejections().collect();
        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].hop, 6);
        assert_eq!(rejections[0].limit, 5);

        assert_eq!(ping.seen.lock().unwrap().len(), 3);
        assert_eq!(pong.seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn subscribers_see_events_in_cascade_order() {
        let mut bus = BroadcastBus::with_hop_limit(2);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.register_subscriber(Arc::new(move |event: &BusEvent| {
            sink.lock().unwrap().push(event.clone());
        }));
        let a = bus.register(Echo::new("a"));
        bus.register(Echo::new("b"));

        let cascade = bus.publish(a, Message::new());

        assert_eq!(*seen.lock().unwrap(), cascade.events);
    }

    #[test]
    fn receivers_get_independent_copies() {
        let mut bus = BroadcastBus::with_hop_limit(3);
        let a = Echo::new("a");
        let b = Echo::new("b");
        let a_id = bus.register(a.clone());
        bus.register(b.clone());

        let seed = Message::new().with(Field::Uuid, "UUID");
        let cascade = bus.publish(a_id, seed.clone());

        // later hops rewrote src, but what b saw first is still the seed
        assert_eq!(b.seen.lock().unwrap()[0], seed);
        let first = cascade.publications().next().unwrap();
        assert_eq!(first.message, seed);
    }
}
