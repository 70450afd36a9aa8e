//! Message boxes: the API endpoints through which a party exchanges documents.

use serde::{Deserialize, Serialize};

use super::serde_helpers::null_as_default;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoxInfo {
    pub id: String,
    pub party_id: String,
    pub gln: Option<String>,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub is_test: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoxesInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub boxes: Vec<BoxInfo>,
}

/// A box attached to an integration connector rather than to a party's
/// own mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectorBoxInfo {
    pub id: String,
    pub party_id: String,
    pub connector_name: Option<String>,
    pub gln: Option<String>,
    #[serde(default)]
    pub is_test: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectorBoxesInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub connector_boxes: Vec<ConnectorBoxInfo>,
}
