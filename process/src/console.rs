//! Console trace of bus events
use gateway_sdk::message_bus::{BusEvent, Subscriber};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::error;

/// Render one event as a trace line
pub fn format_event(event: &BusEvent) -> String {
    match event {
        BusEvent::Published(publication) => format!(
            "PUBLISHED by {}\tContent: {}",
            publication.sender_name, publication.message
        ),
        BusEvent::Received(receipt) => format!(
            "RECEIVED at {}\tContent: {}",
            receipt.receiver_name, receipt.message
        ),
        BusEvent::Rejected(rejection) => format!(
            "REJECTED from {}\tHop limit {} exceeded\tContent: {}",
            rejection.sender_name, rejection.limit, rejection.message
        ),
    }
}

/// Writes a line per event to the given output
pub struct ConsoleReporter<W: Write + Send + 'static> {
    out: Mutex<W>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Arc<Self> {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> ConsoleReporter<W> {
    pub fn new(out: W) -> Arc<Self> {
        Arc::new(Self { out: Mutex::new(out) })
    }

    fn write_line(&self, line: &str) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = writeln!(out, "{line}") {
            error!("Failed to write trace: {e}");
        }
    }

    /// Scenario header, followed by a blank line
    pub fn heading(&self, name: &str) {
        self.write_line(&format!("\n{name}\n"));
    }

    pub fn report(&self, event: &BusEvent) {
        self.write_line(&format_event(event));
    }

    /// Subscriber function for the bus
    pub fn subscriber(self: &Arc<Self>) -> Arc<Subscriber> {
        let reporter = self.clone();
        Arc::new(move |event: &BusEvent| reporter.report(event))
    }

    /// Recover the output, e.g. to inspect it in tests
    pub fn into_inner(self) -> Option<W> {
        self.out.into_inner().ok()
    }
}
