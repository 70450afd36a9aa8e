//! Field-level serde adapters shared by the DTOs.

use serde::{Deserialize, Deserializer};

/// Decodes `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Binary payloads travel as base64 strings.
pub(crate) mod base64_bytes {
    use base64ct::{Base64, Encoding};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&Base64::encode_string(bytes))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Base64::decode_vec(&encoded).map_err(|e| D::Error::custom(format!("invalid base64: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "super::null_as_default")]
        items: Vec<String>,
        #[serde(default, with = "super::base64_bytes")]
        body: Vec<u8>,
    }

    #[test]
    fn null_collection_becomes_empty() {
        let holder: Holder = serde_json::from_str(r#"{"items":null,"body":""}"#).unwrap();
        assert!(holder.items.is_empty());
    }

    #[test]
    fn missing_collection_becomes_empty() {
        let holder: Holder = serde_json::from_str(r#"{"body":null}"#).unwrap();
        assert!(holder.items.is_empty());
    }

    #[test]
    fn bytes_are_base64() {
        let holder = Holder {
            items: vec!["a".to_string()],
            body: b"UNB+UNOC".to_vec(),
        };
        let json = serde_json::to_value(&holder).unwrap();
        assert_eq!(json["body"], "VU5CK1VOT0M=");
        let back: Holder = serde_json::from_value(json).unwrap();
        assert_eq!(back, holder);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert!(serde_json::from_str::<Holder>(r#"{"body":"***"}"#).is_err());
    }
}
