//! Messages and their metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::base64_bytes;

/// Business document kind carried by a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentType {
    Any,
    Orders,
    Ordrsp,
    Desadv,
    Recadv,
    Invoic,
    Coinvoic,
    Alcrpt,
    Stsmsg,
    Retann,
    Retins,
    Retdes,
    Retrec,
    Retinv,
    POrders,
    Pricat,
    PriceList,
    Partin,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Metadata of a message stored in a box.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageMeta {
    pub id: String,
    pub box_id: String,
    pub message_file_name: Option<String>,
    #[serde(default)]
    pub document_type: DocumentType,
    pub document_circulation_id: Option<String>,
    pub creation_date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InboxMessageMeta {
    pub box_id: String,
    pub message_id: String,
    #[serde(default)]
    pub document_type: DocumentType,
    pub document_circulation_id: Option<String>,
    pub sender_gln: Option<String>,
    pub message_file_name: Option<String>,
    pub creation_date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutboxMessageMeta {
    pub box_id: String,
    pub message_id: String,
    #[serde(default)]
    pub document_type: DocumentType,
    pub document_circulation_id: Option<String>,
    pub recipient_gln: Option<String>,
    pub message_file_name: Option<String>,
    pub creation_date_time: Option<DateTime<Utc>>,
}

/// Links to a document package in the Diadoc web interface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiadocUrls {
    pub document_package_url: Option<String>,
    pub invoice_url: Option<String>,
    pub torg12_url: Option<String>,
    pub invoice_correction_url: Option<String>,
}

/// A message file to upload. The body is sent as raw bytes, the file name
/// as a query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageData {
    pub message_file_name: String,
    pub message_body: Vec<u8>,
}

/// A service message (status notification) sent when processing stops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceMessageData {
    pub message_id: String,
    pub message_details: Option<String>,
    pub recipient_gln: String,
    pub message_body: Vec<u8>,
}

/// A message together with its content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageEntity {
    pub meta: MessageMeta,
    #[serde(default, with = "base64_bytes")]
    pub message_body: Vec<u8>,
}
