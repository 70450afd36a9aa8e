//! Blocking client for the Kontur EDI web API.
//!
//! # Overview
//! Builds authenticated requests against the fixed EDI API endpoints, runs
//! each one as a single blocking round-trip, and maps JSON payloads to and
//! from typed DTOs.
//!
//! # Design
//! - `RequestPipeline` is the only place that touches HTTP: it builds the
//!   `HttpRequest` (headers, bodyless-POST marker), sends it through an
//!   `HttpTransport`, and classifies failures into `ApiError`.
//! - Clients (`EdiApiClient`, `TransformerConnectorClient`,
//!   `MessagesClient`) compose a pipeline and expose one method per remote
//!   operation; shared operations live on the `EdiApi` trait.
//! - Box event batches are normalized through a `BoxEventTypeRegistry` so
//!   every event carries either its typed content or an explicit
//!   "no content" value.
//! - Nothing is retried or cached. The configuration is immutable, so one
//!   client can be shared by concurrent callers.

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod pipeline;
pub mod serializer;
pub mod types;
pub mod url;

pub use client::{EdiApi, EdiApiClient, MessagesClient, TransformerConnectorClient};
pub use config::ClientConfig;
pub use error::{ApiError, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};
pub use pipeline::{build_authorization_header, RequestBody, RequestPipeline};
pub use serializer::{JsonSerializer, PayloadSerializer, SerializerError};
