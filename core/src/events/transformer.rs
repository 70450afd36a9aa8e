//! Events delivered to transformer connector boxes.

use serde::{Deserialize, Serialize};

use super::{decode_as, BoxEvent, BoxEventBatch, BoxEventTypeRegistry, EventContent, RawBoxEventBatch};
use crate::types::{DocumentType, MessageMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformerConnectorBoxEventType {
    /// A message was routed to the connector and awaits transformation.
    NewMessage,
    #[serde(other)]
    Unknown,
}

/// Content of a `NewMessage` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransformerConnectorNewMessageEventContent {
    /// Identifies this transformation in every lifecycle call that follows.
    pub connector_interaction_id: String,
    pub message_meta: MessageMeta,
    pub output_document_type: Option<DocumentType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TransformerConnectorEventContent {
    NewMessage(TransformerConnectorNewMessageEventContent),
    NoContent,
}

impl EventContent for TransformerConnectorEventContent {
    fn no_content() -> Self {
        TransformerConnectorEventContent::NoContent
    }
}

pub type TransformerConnectorBoxEvent =
    BoxEvent<TransformerConnectorBoxEventType, TransformerConnectorEventContent>;

pub type TransformerConnectorBoxEventBatch =
    BoxEventBatch<TransformerConnectorBoxEventType, TransformerConnectorEventContent>;

pub type RawTransformerConnectorBoxEventBatch = RawBoxEventBatch<TransformerConnectorBoxEventType>;

pub type TransformerConnectorBoxEventTypeRegistry =
    BoxEventTypeRegistry<TransformerConnectorBoxEventType, TransformerConnectorEventContent>;

impl TransformerConnectorBoxEventType {
    pub fn registry() -> TransformerConnectorBoxEventTypeRegistry {
        BoxEventTypeRegistry::default().register(TransformerConnectorBoxEventType::NewMessage, |content| {
            decode_as(content, TransformerConnectorEventContent::NewMessage)
        })
    }
}
