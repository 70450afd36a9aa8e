//! Client for transformer connectors.
//!
//! A transformer connector polls its connector box for `NewMessage` events,
//! converts each message between formats and reports the lifecycle of that
//! conversion back to the service. Every lifecycle call is keyed by the
//! connector box and the connector interaction id from the event.

use chrono::{DateTime, Utc};

use super::{format_date_time, EdiApi};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::events::transformer::{
    RawTransformerConnectorBoxEventBatch, TransformerConnectorBoxEventBatch,
    TransformerConnectorBoxEventTypeRegistry,
};
use crate::events::TransformerConnectorBoxEventType;
use crate::pipeline::RequestPipeline;
use crate::types::{ConnectorBoxesInfo, MessageData, MessageEntity, MessageMeta, ServiceMessageData};
use crate::url::UrlBuilder;

const RELATIVE_URL: &str = "V1/Connectors/Transformers/";
const BOX_ID_PARAMETER: &str = "connectorBoxId";
const INTERACTION_ID_PARAMETER: &str = "connectorInteractionId";

#[derive(Debug, Clone)]
pub struct TransformerConnectorClient {
    pipeline: RequestPipeline,
    registry: TransformerConnectorBoxEventTypeRegistry,
}

impl TransformerConnectorClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_pipeline(RequestPipeline::new(config)?))
    }

    pub fn from_pipeline(pipeline: RequestPipeline) -> Self {
        Self {
            pipeline,
            registry: TransformerConnectorBoxEventType::registry(),
        }
    }

    fn interaction(&self, operation: &str, connector_box_id: &str, connector_interaction_id: &str) -> UrlBuilder {
        self.endpoint(&format!("{RELATIVE_URL}{operation}"))
            .add_parameter(BOX_ID_PARAMETER, connector_box_id)
            .add_parameter(INTERACTION_ID_PARAMETER, connector_interaction_id)
    }

    pub fn transformation_started(
        &self,
        auth_token: &str,
        connector_box_id: &str,
        connector_interaction_id: &str,
    ) -> Result<()> {
        let url = self
            .interaction("TransformationStarted", connector_box_id, connector_interaction_id)
            .build();
        self.pipeline.post_empty(&url, auth_token)
    }

    /// The optional reason is sent as a serialized string payload.
    pub fn transformation_paused(
        &self,
        auth_token: &str,
        connector_box_id: &str,
        connector_interaction_id: &str,
        reason: Option<&str>,
    ) -> Result<()> {
        let url = self
            .interaction("TransformationPaused", connector_box_id, connector_interaction_id)
            .build();
        match reason {
            Some(reason) => self.pipeline.post_serialized(&url, auth_token, reason),
            None => self.pipeline.post_empty(&url, auth_token),
        }
    }

    pub fn transformation_resumed(
        &self,
        auth_token: &str,
        connector_box_id: &str,
        connector_interaction_id: &str,
    ) -> Result<()> {
        let url = self
            .interaction("TransformationResumed", connector_box_id, connector_interaction_id)
            .build();
        self.pipeline.post_empty(&url, auth_token)
    }

    /// Uploads the transformation result and returns the stored message's metadata.
    pub fn transformed_successfully(
        &self,
        auth_token: &str,
        connector_box_id: &str,
        connector_interaction_id: &str,
        result_message_data: &MessageData,
    ) -> Result<MessageMeta> {
        let url = self
            .interaction("TransformedSuccessfully", connector_box_id, connector_interaction_id)
            .add_parameter("messageFileName", &result_message_data.message_file_name)
            .build();
        self.pipeline
            .post_bytes_for(&url, auth_token, &result_message_data.message_body)
    }

    pub fn transformed_unsuccessfully(
        &self,
        auth_token: &str,
        connector_box_id: &str,
        connector_interaction_id: &str,
        errors: Option<&[String]>,
    ) -> Result<()> {
        let url = self
            .interaction("TransformedUnsuccessfully", connector_box_id, connector_interaction_id)
            .build();
        match errors {
            Some(errors) => self.pipeline.post_serialized(&url, auth_token, errors),
            None => self.pipeline.post_empty(&url, auth_token),
        }
    }

    /// Ends processing of the interaction and sends a service message to the partner.
    pub fn stop_processing(
        &self,
        auth_token: &str,
        connector_box_id: &str,
        connector_interaction_id: &str,
        service_message_data: &ServiceMessageData,
    ) -> Result<()> {
        let url = self
            .interaction("StopProcessing", connector_box_id, connector_interaction_id)
            .add_parameter("messageId", &service_message_data.message_id)
            .add_optional_parameter("messageDetails", service_message_data.message_details.as_deref())
            .add_parameter("recipientGln", &service_message_data.recipient_gln)
            .build();
        self.pipeline
            .post_bytes(&url, auth_token, &service_message_data.message_body)
    }

    /// Events after `exclusive_event_id`, or from the start of the box when absent.
    pub fn get_events(
        &self,
        auth_token: &str,
        connector_box_id: &str,
        exclusive_event_id: Option<&str>,
        count: Option<u32>,
    ) -> Result<TransformerConnectorBoxEventBatch> {
        let url = self
            .endpoint(&format!("{RELATIVE_URL}GetEvents"))
            .add_parameter(BOX_ID_PARAMETER, connector_box_id)
            .add_optional_parameter("exclusiveEventId", exclusive_event_id)
            .add_optional_parameter("count", count.map(|c| c.to_string()));
        self.fetch_events(auth_token, url)
    }

    /// Events that occurred at or after `from_date_time`.
    pub fn get_events_from(
        &self,
        auth_token: &str,
        connector_box_id: &str,
        from_date_time: DateTime<Utc>,
        count: Option<u32>,
    ) -> Result<TransformerConnectorBoxEventBatch> {
        let url = self
            .endpoint(&format!("{RELATIVE_URL}GetEventsFrom"))
            .add_parameter(BOX_ID_PARAMETER, connector_box_id)
            .add_parameter("fromDateTime", format_date_time(&from_date_time))
            .add_optional_parameter("count", count.map(|c| c.to_string()));
        self.fetch_events(auth_token, url)
    }

    fn fetch_events(&self, auth_token: &str, url: UrlBuilder) -> Result<TransformerConnectorBoxEventBatch> {
        let url = url.build();
        let raw: RawTransformerConnectorBoxEventBatch = self.pipeline.get(&url, auth_token)?;
        Ok(self.registry.normalize_batch(raw))
    }

    pub fn get_message(
        &self,
        auth_token: &str,
        connector_box_id: &str,
        message_id: &str,
    ) -> Result<MessageEntity> {
        let url = self
            .endpoint(&format!("{RELATIVE_URL}GetMessage"))
            .add_parameter(BOX_ID_PARAMETER, connector_box_id)
            .add_parameter("messageId", message_id)
            .build();
        self.pipeline.get(&url, auth_token)
    }

    pub fn get_connector_boxes_info(&self, auth_token: &str) -> Result<ConnectorBoxesInfo> {
        let url = self.endpoint("V1/Boxes/GetConnectorBoxesInfo").build();
        self.pipeline.get(&url, auth_token)
    }
}

impl EdiApi for TransformerConnectorClient {
    fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }
}
