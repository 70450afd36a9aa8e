//! Payload serializers.
//!
//! # Design
//! A serializer translates between wire bytes and a generic document tree
//! (`serde_json::Value`). Typed DTOs are converted to and from that tree by
//! the pipeline, which keeps the trait object safe so a client can hold any
//! serializer behind an `Arc<dyn PayloadSerializer>`. The same tree is what
//! event normalization reshapes into a type-specific content value.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const JSON_CONTENT_TYPE: &str = "application/json";

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Failure to move a payload between wire bytes and a typed value.
#[derive(Debug, Error)]
pub enum SerializerError {
    #[error("cannot encode payload: {0}")]
    Encode(#[source] Cause),

    #[error("cannot decode payload: {0}")]
    Decode(#[source] Cause),
}

impl SerializerError {
    pub fn encode(cause: impl Into<Cause>) -> Self {
        SerializerError::Encode(cause.into())
    }

    pub fn decode(cause: impl Into<Cause>) -> Self {
        SerializerError::Decode(cause.into())
    }
}

pub trait PayloadSerializer: Send + Sync + fmt::Debug {
    /// Media type sent as `Accept` and, for serialized payloads, `Content-Type`.
    fn content_type(&self) -> &str;

    fn to_bytes(&self, document: &Value) -> Result<Vec<u8>, SerializerError>;

    fn parse(&self, body: &str) -> Result<Value, SerializerError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl PayloadSerializer for JsonSerializer {
    fn content_type(&self) -> &str {
        JSON_CONTENT_TYPE
    }

    fn to_bytes(&self, document: &Value) -> Result<Vec<u8>, SerializerError> {
        serde_json::to_vec(document).map_err(SerializerError::encode)
    }

    fn parse(&self, body: &str) -> Result<Value, SerializerError> {
        serde_json::from_str(body).map_err(SerializerError::decode)
    }
}

/// Encodes a typed value with the given serializer.
pub fn serialize<T: Serialize + ?Sized>(
    serializer: &dyn PayloadSerializer,
    value: &T,
) -> Result<Vec<u8>, SerializerError> {
    let document = serde_json::to_value(value).map_err(SerializerError::encode)?;
    serializer.to_bytes(&document)
}

/// Decodes a response body into a typed value with the given serializer.
pub fn deserialize<T: DeserializeOwned>(
    serializer: &dyn PayloadSerializer,
    body: &str,
) -> Result<T, SerializerError> {
    let document = serializer.parse(body)?;
    normalize(document)
}

/// Reshapes an already-parsed generic document into a concrete type.
pub fn normalize<T: DeserializeOwned>(document: Value) -> Result<T, SerializerError> {
    serde_json::from_value(document).map_err(SerializerError::decode)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Sample {
        party_id: String,
        count: Option<u32>,
    }

    #[test]
    fn json_round_trip() {
        let value = Sample {
            party_id: "P1".to_string(),
            count: Some(3),
        };
        let bytes = serialize(&JsonSerializer, &value).unwrap();
        assert_eq!(bytes, br#"{"Count":3,"PartyId":"P1"}"#);
        let back: Sample = deserialize(&JsonSerializer, std::str::from_utf8(&bytes).unwrap()).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn malformed_body_is_reported() {
        let result: Result<Sample, _> = deserialize(&JsonSerializer, "<xml/>");
        assert!(matches!(result, Err(SerializerError::Decode(_))));
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let err = deserialize::<Sample>(&JsonSerializer, r#"{"Count":1}"#).unwrap_err();
        assert!(matches!(err, SerializerError::Decode(_)));
        assert!(err.to_string().contains("PartyId"));
    }

    #[test]
    fn unencodable_value_is_reported() {
        use std::collections::HashMap;

        let mut keyed_by_tuple = HashMap::new();
        keyed_by_tuple.insert((1, 2), "x");
        let err = serialize(&JsonSerializer, &keyed_by_tuple).unwrap_err();
        assert!(matches!(err, SerializerError::Encode(_)));
        assert!(err.to_string().starts_with("cannot encode payload"));
    }
}
