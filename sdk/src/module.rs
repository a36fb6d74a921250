// Definition of a gateway module

use crate::message::Message;

/// One matched rule's decision about an incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    /// Label of the rule that matched
    pub rule: &'static str,

    /// Derived message to publish, if the rule is not terminal
    pub republish: Option<Message>,
}

impl Reaction {
    /// Report receipt only
    pub fn report(rule: &'static str) -> Self {
        Self { rule, republish: None }
    }

    /// Report receipt and publish a derived message
    pub fn republish(rule: &'static str, message: Message) -> Self {
        Self { rule, republish: Some(message) }
    }
}

/// A named participant on the bus.
///
/// `receive` must be a pure function of the message: it returns one
/// `Reaction` per matching rule, in rule order, and an empty list when
/// nothing matches. Reporting and publishing are left to the bus.
pub trait Module: Send + Sync {
    fn get_name(&self) -> &str;

    fn get_description(&self) -> &str {
        ""
    }

    fn receive(&self, message: &Message) -> Vec<Reaction>;
}
