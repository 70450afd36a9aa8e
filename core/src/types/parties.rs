//! Parties (legal entities) visible to the authenticated user.

use serde::{Deserialize, Serialize};

use super::serde_helpers::null_as_default;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartyInfo {
    pub id: String,
    pub name: Option<String>,
    pub gln: Option<String>,
    pub inn: Option<String>,
    pub kpp: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartiesInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub parties: Vec<PartyInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_names() {
        let party: PartyInfo = serde_json::from_str(
            r#"{"Id":"P1","Name":"Roga i Kopyta","Gln":"4607000000001","Inn":"6600000001","Kpp":null,"IsActive":true}"#,
        )
        .unwrap();
        assert_eq!(party.id, "P1");
        assert_eq!(party.gln.as_deref(), Some("4607000000001"));
        assert_eq!(party.kpp, None);
        assert_eq!(party.department, None);
        assert!(party.is_active);
    }

    #[test]
    fn minimal_and_full_round_trip() {
        let minimal = PartiesInfo::default();
        let json = serde_json::to_string(&minimal).unwrap();
        assert_eq!(serde_json::from_str::<PartiesInfo>(&json).unwrap(), minimal);

        let full = PartiesInfo {
            parties: vec![PartyInfo {
                id: "P1".to_string(),
                name: Some("Shop".to_string()),
                gln: Some("4600000000001".to_string()),
                inn: Some("7700000001".to_string()),
                kpp: Some("770001001".to_string()),
                department: Some("Moscow".to_string()),
                is_active: true,
            }],
        };
        let json = serde_json::to_string(&full).unwrap();
        assert_eq!(serde_json::from_str::<PartiesInfo>(&json).unwrap(), full);
    }

    #[test]
    fn null_parties_decode_as_empty() {
        let info: PartiesInfo = serde_json::from_str(r#"{"Parties":null}"#).unwrap();
        assert!(info.parties.is_empty());
    }
}
