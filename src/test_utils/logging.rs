//! In-memory capture of `tracing` events for assertions in tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;

static CAPTURED: OnceLock<Arc<Mutex<LogStorage>>> = OnceLock::new();

/// Ring buffer of captured events.
#[derive(Debug, Default)]
pub struct LogStorage {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogStorage {
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn storage() -> Arc<Mutex<LogStorage>> {
    CAPTURED
        .get_or_init(|| Arc::new(Mutex::new(LogStorage::new(1000))))
        .clone()
}

/// Snapshot of every captured event.
#[must_use]
pub fn captured() -> Vec<LogEntry> {
    storage()
        .lock()
        .map(|guard| guard.entries.iter().cloned().collect())
        .unwrap_or_default()
}

/// Captured events emitted under `target`.
#[must_use]
pub fn captured_for(target: &str) -> Vec<LogEntry> {
    captured()
        .into_iter()
        .filter(|entry| entry.target == target)
        .collect()
}

#[must_use]
pub fn logs_contain(message: &str) -> bool {
    captured().iter().any(|entry| entry.message.contains(message))
}

struct CaptureLayer {
    storage: Arc<Mutex<LogStorage>>,
}

#[derive(Default)]
struct EntryVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = rendered;
        } else {
            self.fields.push((field.name().to_string(), rendered));
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);
        let metadata = event.metadata();
        let entry = LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        };
        if let Ok(mut guard) = self.storage.lock() {
            guard.push(entry);
        }
    }
}

/// Install the capture layer as the global subscriber.
///
/// Later calls are no-ops; events from every test in the binary land in the
/// same buffer, so assert on presence rather than on exact counts.
pub fn init_test_logging(level: &str) {
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(CaptureLayer { storage: storage() });
    let _ = tracing::subscriber::set_global_default(subscriber);
}
