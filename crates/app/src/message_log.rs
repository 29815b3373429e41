//! Application message log.
//!
//! Any thread may append. Messages are kept in append order; observers are
//! called after the log lock has been released, so an observer is free to
//! read the log (or append to it) from its callback.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Trace,
    Info,
    Warning,
    Error,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Trace => "trace",
            MessageType::Info => "info",
            MessageType::Warning => "warning",
            MessageType::Error => "error",
        }
    }

    fn log_level(&self) -> log::Level {
        match self {
            MessageType::Trace => log::Level::Trace,
            MessageType::Info => log::Level::Info,
            MessageType::Warning => log::Level::Warn,
            MessageType::Error => log::Level::Error,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub message_type: MessageType,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Receives log events. Called on the thread that appended or cleared.
pub trait MessageLogObserver: Send + Sync {
    fn on_message(&self, message: &Message);

    fn on_cleared(&self) {}
}

/// Handle returned by `MessageLog::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Sink for user-facing messages
pub trait Messenger {
    fn emit_message(&self, message_type: MessageType, text: &str);

    fn emit_trace(&self, text: &str) {
        self.emit_message(MessageType::Trace, text);
    }

    fn emit_info(&self, text: &str) {
        self.emit_message(MessageType::Info, text);
    }

    fn emit_warning(&self, text: &str) {
        self.emit_message(MessageType::Warning, text);
    }

    fn emit_error(&self, text: &str) {
        self.emit_message(MessageType::Error, text);
    }
}

#[derive(Default)]
struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Arc<dyn MessageLogObserver>)>,
}

#[derive(Default)]
pub struct MessageLog {
    messages: Mutex<VecDeque<Message>>,
    /// Maximum retained messages, oldest dropped first. None is unbounded.
    capacity: Option<usize>,
    observers: Mutex<Observers>,
}

impl fmt::Debug for MessageLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageLog")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log retaining at most `capacity` messages (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn append(&self, message_type: MessageType, text: impl Into<String>) {
        let message = Message {
            message_type,
            text: text.into(),
            timestamp: Utc::now(),
        };
        {
            let mut messages = self.messages.lock();
            if let Some(capacity) = self.capacity {
                while messages.len() >= capacity {
                    messages.pop_front();
                }
            }
            messages.push_back(message.clone());
        }
        for observer in self.observer_list() {
            observer.on_message(&message);
        }
    }

    /// Remove every message and fire a single cleared event
    pub fn clear(&self) {
        self.messages.lock().clear();
        for observer in self.observer_list() {
            observer.on_cleared();
        }
    }

    /// Copy of the current messages, oldest first
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn subscribe(&self, observer: Arc<dyn MessageLogObserver>) -> SubscriptionId {
        let mut observers = self.observers.lock();
        let id = SubscriptionId(observers.next_id);
        observers.next_id += 1;
        observers.entries.push((id, observer));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.entries.len();
        observers.entries.retain(|(sid, _)| *sid != id);
        observers.entries.len() != before
    }

    fn observer_list(&self) -> Vec<Arc<dyn MessageLogObserver>> {
        self.observers
            .lock()
            .entries
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect()
    }
}

impl Messenger for MessageLog {
    fn emit_message(&self, message_type: MessageType, text: &str) {
        log::log!(message_type.log_level(), "{}", text);
        self.append(message_type, text);
    }
}
