//! Users with access to a party.

use serde::{Deserialize, Serialize};

use super::serde_helpers::null_as_default;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserInfo {
    pub id: String,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UsersInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<UserInfo>,
}
