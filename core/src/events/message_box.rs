//! Events delivered to ordinary message boxes.

use serde::{Deserialize, Serialize};

use super::{decode_as, BoxEvent, BoxEventBatch, BoxEventTypeRegistry, EventContent, RawBoxEventBatch};
use crate::types::serde_helpers::null_as_default;
use crate::types::{DiadocUrls, InboxMessageMeta, OutboxMessageMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageBoxEventType {
    NewOutboxMessage,
    NewInboxMessage,
    RecognizeMessage,
    MessageDelivered,
    MessageUndelivered,
    MessageReadByPartner,
    MessageCheckingOk,
    MessageCheckingFail,
    DraftOfDocumentPackagePostedIntoDiadoc,
    DraftOfDocumentPackageSignedByMe,
    DraftOfDocumentPackageSignedBySender,
    DraftOfDocumentPackageDeletedFromDiadoc,
    ReceivedDiadocRoamingError,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutboxMessageEventContent {
    pub outbox_message_meta: OutboxMessageMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InboxMessageEventContent {
    pub inbox_message_meta: InboxMessageMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageUndeliveredEventContent {
    pub outbox_message_meta: OutboxMessageMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message_undelivery_reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageCheckingEventContent {
    pub outbox_message_meta: OutboxMessageMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecognizeMessageEventContent {
    pub inbox_message_meta: InboxMessageMeta,
    pub recognized_document_number: Option<String>,
}

/// Shared content of the Diadoc document-package events.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageDiadocEventContent {
    pub outbox_message_meta: Option<OutboxMessageMeta>,
    pub diadoc_box_id: Option<String>,
    pub invoice_id: Option<String>,
    pub message_id: Option<String>,
    pub torg12_id: Option<String>,
    pub invoice_correction_id: Option<String>,
    pub universal_transfer_document_id: Option<String>,
    pub universal_correction_document_id: Option<String>,
    pub price_list_document_id: Option<String>,
    pub diadoc_urls: Option<DiadocUrls>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiadocRoamingErrorEventContent {
    pub outbox_message_meta: OutboxMessageMeta,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MessageBoxEventContent {
    NewOutboxMessage(OutboxMessageEventContent),
    NewInboxMessage(InboxMessageEventContent),
    RecognizeMessage(RecognizeMessageEventContent),
    MessageDelivered(OutboxMessageEventContent),
    MessageUndelivered(MessageUndeliveredEventContent),
    MessageReadByPartner(OutboxMessageEventContent),
    MessageChecking(MessageCheckingEventContent),
    Diadoc(MessageDiadocEventContent),
    DiadocRoamingError(DiadocRoamingErrorEventContent),
    NoContent,
}

impl EventContent for MessageBoxEventContent {
    fn no_content() -> Self {
        MessageBoxEventContent::NoContent
    }
}

pub type MessageBoxEvent = BoxEvent<MessageBoxEventType, MessageBoxEventContent>;

pub type MessageBoxEventBatch = BoxEventBatch<MessageBoxEventType, MessageBoxEventContent>;

pub type RawMessageBoxEventBatch = RawBoxEventBatch<MessageBoxEventType>;

pub type MessageBoxEventTypeRegistry = BoxEventTypeRegistry<MessageBoxEventType, MessageBoxEventContent>;

impl MessageBoxEventType {
    pub fn registry() -> MessageBoxEventTypeRegistry {
        use MessageBoxEventContent as Content;
        use MessageBoxEventType as Type;

        BoxEventTypeRegistry::default()
            .register(Type::NewOutboxMessage, |c| decode_as(c, Content::NewOutboxMessage))
            .register(Type::NewInboxMessage, |c| decode_as(c, Content::NewInboxMessage))
            .register(Type::RecognizeMessage, |c| decode_as(c, Content::RecognizeMessage))
            .register(Type::MessageDelivered, |c| decode_as(c, Content::MessageDelivered))
            .register(Type::MessageUndelivered, |c| decode_as(c, Content::MessageUndelivered))
            .register(Type::MessageReadByPartner, |c| decode_as(c, Content::MessageReadByPartner))
            .register(Type::MessageCheckingOk, |c| decode_as(c, Content::MessageChecking))
            .register(Type::MessageCheckingFail, |c| decode_as(c, Content::MessageChecking))
            .register(Type::DraftOfDocumentPackagePostedIntoDiadoc, |c| decode_as(c, Content::Diadoc))
            .register(Type::DraftOfDocumentPackageSignedByMe, |c| decode_as(c, Content::Diadoc))
            .register(Type::DraftOfDocumentPackageSignedBySender, |c| decode_as(c, Content::Diadoc))
            .register(Type::DraftOfDocumentPackageDeletedFromDiadoc, |c| decode_as(c, Content::Diadoc))
            .register(Type::ReceivedDiadocRoamingError, |c| decode_as(c, Content::DiadocRoamingError))
    }
}
