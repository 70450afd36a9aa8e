//! Request pipeline shared by every client.
//!
//! # Design
//! `RequestPipeline` turns a (method, uri, auth token, optional body) tuple
//! into a response body or a classified `ApiError`. Request construction is
//! a pure function (`build_request`) so the exact headers and body bytes can
//! be checked without a network; `perform` then runs one blocking round-trip
//! through the configured `HttpTransport`. There are no retries and no
//! state carried between calls.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, debug_span, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};
use crate::serializer::{self, JsonSerializer, PayloadSerializer};

pub const AUTH_SCHEME: &str = "KonturEdiAuth";

/// Marker header sent with POST requests that intentionally carry no payload.
pub const BODYLESS_MARKER_HEADER: (&str, &str) = ("Content", "no");

/// Single byte sent in place of an empty POST body.
pub const BODYLESS_PLACEHOLDER: u8 = 1;

/// Builds the `Authorization` header value. The token segment is omitted
/// when the token is empty.
pub fn build_authorization_header(api_client_id: &str, auth_token: &str) -> String {
    let mut header = format!("{AUTH_SCHEME} konturediauth_api_client_id={api_client_id}");
    if !auth_token.is_empty() {
        header.push_str(",konturediauth_token=");
        header.push_str(auth_token);
    }
    header
}

/// Payload of a POST request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Bytes produced by the configured serializer; sent with `Content-Type`.
    Serialized(Vec<u8>),
    /// Opaque message bytes forwarded as-is.
    Raw(Vec<u8>),
}

impl RequestBody {
    fn bytes(&self) -> &[u8] {
        match self {
            RequestBody::Serialized(bytes) | RequestBody::Raw(bytes) => bytes,
        }
    }
}

#[derive(Clone)]
pub struct RequestPipeline {
    config: Arc<ClientConfig>,
    transport: Arc<dyn HttpTransport>,
    serializer: Arc<dyn PayloadSerializer>,
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("config", &self.config)
            .field("serializer", &self.serializer)
            .finish_non_exhaustive()
    }
}

impl RequestPipeline {
    /// Pipeline over the blocking `ureq` transport and the JSON serializer.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = UreqTransport::new(&config)?;
        Ok(Self::with_parts(
            config,
            Arc::new(transport),
            Arc::new(JsonSerializer),
        ))
    }

    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        serializer: Arc<dyn PayloadSerializer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            serializer,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn serializer(&self) -> &dyn PayloadSerializer {
        self.serializer.as_ref()
    }

    /// Builds the outgoing request without sending it.
    ///
    /// `extra_credentials` is appended to the `Authorization` header after a
    /// comma; it is only used by the authenticate calls.
    pub fn build_request(
        &self,
        method: HttpMethod,
        uri: &str,
        auth_token: &str,
        body: Option<RequestBody>,
        extra_credentials: Option<&str>,
    ) -> HttpRequest {
        let mut authorization = build_authorization_header(self.config.api_client_id(), auth_token);
        if let Some(credentials) = extra_credentials {
            authorization.push(',');
            authorization.push_str(credentials);
        }

        let content_type = self.serializer.content_type().to_string();
        let mut headers = vec![
            ("Accept".to_string(), content_type.clone()),
            ("Authorization".to_string(), authorization),
        ];

        let body = match method {
            HttpMethod::Get => None,
            HttpMethod::Post => match body {
                Some(body) if !body.bytes().is_empty() => {
                    if let RequestBody::Serialized(_) = body {
                        headers.push(("Content-Type".to_string(), content_type));
                    }
                    Some(match body {
                        RequestBody::Serialized(bytes) | RequestBody::Raw(bytes) => bytes,
                    })
                }
                _ => {
                    let (name, value) = BODYLESS_MARKER_HEADER;
                    headers.push((name.to_string(), value.to_string()));
                    Some(vec![BODYLESS_PLACEHOLDER])
                }
            },
        };

        HttpRequest {
            method,
            uri: uri.to_string(),
            headers,
            body,
        }
    }

    /// Executes one blocking round-trip and returns the raw response body.
    pub fn perform(
        &self,
        method: HttpMethod,
        uri: &str,
        auth_token: &str,
        body: Option<RequestBody>,
        extra_credentials: Option<&str>,
    ) -> Result<String> {
        let request = self.build_request(method, uri, auth_token, body, extra_credentials);
        let span = debug_span!(
            "edi_api_request",
            client = %self.config.api_client_id(),
            method = %method,
            uri = %uri
        );
        let _entered = span.enter();

        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(source) => {
                warn!(error = %source, "EDI API request failed");
                return Err(ApiError::Transport {
                    uri: uri.to_string(),
                    source,
                });
            }
        };

        check_status(uri, response)
    }

    pub fn get<R: DeserializeOwned>(&self, uri: &str, auth_token: &str) -> Result<R> {
        let body = self.get_raw(uri, auth_token)?;
        self.decode(uri, &body)
    }

    pub fn get_raw(&self, uri: &str, auth_token: &str) -> Result<String> {
        self.perform(HttpMethod::Get, uri, auth_token, None, None)
    }

    /// POST with no payload; the response body is ignored.
    pub fn post_empty(&self, uri: &str, auth_token: &str) -> Result<()> {
        self.perform(HttpMethod::Post, uri, auth_token, None, None)
            .map(|_| ())
    }

    /// POST a serializer-encoded payload; the response body is ignored.
    pub fn post_serialized<B: Serialize + ?Sized>(
        &self,
        uri: &str,
        auth_token: &str,
        payload: &B,
    ) -> Result<()> {
        let bytes = serializer::serialize(self.serializer(), payload).map_err(|source| {
            ApiError::Serialization {
                uri: uri.to_string(),
                source,
            }
        })?;
        self.perform(
            HttpMethod::Post,
            uri,
            auth_token,
            Some(RequestBody::Serialized(bytes)),
            None,
        )
        .map(|_| ())
    }

    /// POST raw bytes; the response body is ignored.
    pub fn post_bytes(&self, uri: &str, auth_token: &str, content: &[u8]) -> Result<()> {
        self.perform(
            HttpMethod::Post,
            uri,
            auth_token,
            Some(RequestBody::Raw(content.to_vec())),
            None,
        )
        .map(|_| ())
    }

    /// POST raw bytes and decode the response.
    pub fn post_bytes_for<R: DeserializeOwned>(
        &self,
        uri: &str,
        auth_token: &str,
        content: &[u8],
    ) -> Result<R> {
        let body = self.perform(
            HttpMethod::Post,
            uri,
            auth_token,
            Some(RequestBody::Raw(content.to_vec())),
            None,
        )?;
        self.decode(uri, &body)
    }

    fn decode<R: DeserializeOwned>(&self, uri: &str, body: &str) -> Result<R> {
        serializer::deserialize(self.serializer(), body).map_err(|source| {
            warn!(%uri, error = %source, "unexpected EDI API response shape");
            ApiError::Deserialization {
                uri: uri.to_string(),
                source,
            }
        })
    }
}

fn check_status(uri: &str, response: HttpResponse) -> Result<String> {
    if response.is_success() {
        debug!(status = response.status, bytes = response.body.len(), "EDI API request completed");
        return Ok(response.body);
    }
    warn!(status = response.status, "EDI API returned an error status");
    Err(ApiError::HttpStatus {
        uri: uri.to_string(),
        status: response.status,
        body: response.body,
    })
}
