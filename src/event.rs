//! Inbound `showToast` events and the bus that carries them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

use crate::error::EventError;
use crate::types::Level;

pub const SHOW_TOAST: &str = "showToast";

const DEFAULT_BUS_CAPACITY: usize = 16;

/// Payload of a `showToast` event. The level stays raw so unknown names can
/// fall back to info instead of being rejected.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ShowToast {
    #[serde(default)]
    pub level: String,
    pub message: String,
}

impl ShowToast {
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            message: message.into(),
        }
    }

    /// Decode one JSON line.
    ///
    /// Accepts either a bare payload (`{"level":..,"message":..}`) or an
    /// `HX-Trigger` style object keyed by event name
    /// (`{"showToast":{..},"otherEvent":..}`). Triggers without a
    /// `showToast` key yield `Ok(None)`; their other keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidPayload`] when the input is not a JSON
    /// object, or when the payload lacks a string `message`.
    pub fn from_json(raw: &str) -> Result<Option<Self>, EventError> {
        let Value::Object(mut fields) = serde_json::from_str::<Value>(raw)? else {
            return Err(EventError::InvalidPayload(
                "expected a JSON object".to_string(),
            ));
        };
        if let Some(payload) = fields.remove(SHOW_TOAST) {
            return Ok(Some(serde_json::from_value(payload)?));
        }
        if fields.contains_key("message") || fields.contains_key("level") {
            return Ok(Some(serde_json::from_value(Value::Object(fields))?));
        }
        Ok(None)
    }

    /// Encode as a trigger object: `{"showToast":{"level":..,"message":..}}`.
    #[must_use]
    pub fn to_trigger(&self) -> String {
        let mut payload = Map::new();
        payload.insert("level".to_string(), Value::String(self.level.clone()));
        payload.insert("message".to_string(), Value::String(self.message.clone()));
        let mut trigger = Map::new();
        trigger.insert(SHOW_TOAST.to_string(), Value::Object(payload));
        Value::Object(trigger).to_string()
    }

    #[must_use]
    pub fn trigger_event(level: Level, message: &str) -> String {
        Self::new(level.as_str(), message).to_trigger()
    }
}

/// Page-wide publish/subscribe channel for toast events.
///
/// Cloning yields another publisher on the same bus. The bus closes once
/// every clone has been dropped.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<ShowToast>,
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Deliver an event to every live subscriber and return how many saw it.
    pub fn publish(&self, event: ShowToast) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                debug!(level = %event.level, "no subscriber for {SHOW_TOAST} event");
                0
            }
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<ShowToast>,
}

impl Subscription {
    /// Next queued event without waiting. `None` when nothing is queued or the
    /// bus is closed.
    pub fn try_next(&mut self) -> Option<ShowToast> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "toast subscriber lagged behind the bus");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next event. `None` once the bus is closed.
    pub async fn next(&mut self) -> Option<ShowToast> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "toast subscriber lagged behind the bus");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
