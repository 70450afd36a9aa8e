//! Box events and their content normalization.
//!
//! # Design
//! An event batch is decoded in two steps. The wire form (`RawBoxEventBatch`)
//! keeps each event's content as an untyped document. A
//! `BoxEventTypeRegistry` then maps each event-type tag to a decoder that
//! reshapes that document into the family's content enum. Event types with
//! no decoder, and content a decoder rejects, become the family's explicit
//! "no content" value so the rest of the batch is still delivered.

pub mod message_box;
pub mod transformer;

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::types::serde_helpers::null_as_default;

pub use message_box::{MessageBoxEventContent, MessageBoxEventType};
pub use transformer::{TransformerConnectorBoxEventType, TransformerConnectorEventContent};

/// Decodes the untyped content of one event type.
pub type ContentDecoder<C> = fn(Value) -> Result<C, serde_json::Error>;

/// Content enum of an event family.
pub trait EventContent: Sized {
    /// The value used when content is missing, unsupported or malformed.
    fn no_content() -> Self;
}

/// Event as received on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawBoxEvent<T> {
    pub event_id: String,
    pub event_date_time: DateTime<Utc>,
    pub event_type: T,
    #[serde(default)]
    pub event_content: Value,
    pub box_id: Option<String>,
    pub party_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct RawBoxEventBatch<T> {
    pub box_id: Option<String>,
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub events: Vec<RawBoxEvent<T>>,
    pub last_event_id: Option<String>,
}

/// Event whose content has been reshaped to its type-specific form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoxEvent<T, C> {
    pub event_id: String,
    pub event_date_time: DateTime<Utc>,
    pub event_type: T,
    pub event_content: C,
    pub box_id: Option<String>,
    pub party_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoxEventBatch<T, C> {
    pub box_id: Option<String>,
    pub events: Vec<BoxEvent<T, C>>,
    pub last_event_id: Option<String>,
}

/// Maps event-type tags to content decoders.
#[derive(Debug, Clone)]
pub struct BoxEventTypeRegistry<T, C> {
    decoders: HashMap<T, ContentDecoder<C>>,
}

impl<T, C> Default for BoxEventTypeRegistry<T, C> {
    fn default() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }
}

impl<T, C> BoxEventTypeRegistry<T, C>
where
    T: Copy + Eq + Hash + std::fmt::Debug,
    C: EventContent,
{
    pub fn register(mut self, event_type: T, decoder: ContentDecoder<C>) -> Self {
        self.decoders.insert(event_type, decoder);
        self
    }

    pub fn is_supported(&self, event_type: T) -> bool {
        self.decoders.contains_key(&event_type)
    }

    /// Reshapes one event's untyped content.
    pub fn decode_content(&self, event_id: &str, event_type: T, content: Value) -> C {
        let Some(decoder) = self.decoders.get(&event_type) else {
            return C::no_content();
        };
        match decoder(content) {
            Ok(content) => content,
            Err(error) => {
                warn!(%event_id, ?event_type, %error, "dropping malformed box event content");
                C::no_content()
            }
        }
    }

    pub fn normalize_event(&self, event: RawBoxEvent<T>) -> BoxEvent<T, C> {
        let event_content = self.decode_content(&event.event_id, event.event_type, event.event_content);
        BoxEvent {
            event_id: event.event_id,
            event_date_time: event.event_date_time,
            event_type: event.event_type,
            event_content,
            box_id: event.box_id,
            party_id: event.party_id,
        }
    }

    pub fn normalize_batch(&self, batch: RawBoxEventBatch<T>) -> BoxEventBatch<T, C> {
        BoxEventBatch {
            box_id: batch.box_id,
            events: batch
                .events
                .into_iter()
                .map(|event| self.normalize_event(event))
                .collect(),
            last_event_id: batch.last_event_id,
        }
    }
}

/// Decoder for a content variant that wraps one deserializable struct.
pub(crate) fn decode_as<P, C>(content: Value, wrap: fn(P) -> C) -> Result<C, serde_json::Error>
where
    P: serde::de::DeserializeOwned,
{
    serde_json::from_value(content).map(wrap)
}
