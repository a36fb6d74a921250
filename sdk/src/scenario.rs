//! Seed scenarios - a named message published on behalf of a module
use crate::config::config_from_value;
use crate::message::Message;
use anyhow::{anyhow, Context, Result};
use config::Config;
use tracing::debug;

/// A seed publish to start a cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,

    /// Name of the module the seed is published as
    pub sender: String,

    pub message: Message,
}

impl Scenario {
    pub fn new(name: impl Into<String>, sender: impl Into<String>, message: Message) -> Self {
        Self {
            name: name.into(),
            sender: sender.into(),
            message,
        }
    }

    /// Read `[[scenario]]` tables from config.
    /// Returns None if there are none, so the caller can fall back to its own
    /// defaults. Each table needs `name`, `sender` and `message`, the last
    /// being a JSON object in wire form.
    pub fn from_config(config: &Config) -> Result<Option<Vec<Scenario>>> {
        let Ok(tables) = config.get_array("scenario") else {
            return Ok(None);
        };

        let mut scenarios = Vec::new();
        for (index, value) in tables.into_iter().enumerate() {
            let table = value
                .into_table()
                .map_err(|e| anyhow!("Bad [[scenario]] entry {index}: {e}"))?;
            let sc = config_from_value(table)?;

            let name = sc.get_string("name").unwrap_or(format!("scenario {index}"));
            let sender = sc
                .get_string("sender")
                .with_context(|| format!("No sender given for scenario '{name}'"))?;
            let json = sc
                .get_string("message")
                .with_context(|| format!("No message given for scenario '{name}'"))?;
            let message: Message = serde_json::from_str(&json)
                .with_context(|| format!("Bad message JSON in scenario '{name}'"))?;

            debug!("Read scenario '{name}' sent as {sender}");
            scenarios.push(Scenario::new(name, sender, message));
        }

        Ok(Some(scenarios))
    }

    /// File-name friendly form of the name
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('-') {
                slug.push('-');
            }
        }
        slug.trim_matches('-').to_string()
    }
}
