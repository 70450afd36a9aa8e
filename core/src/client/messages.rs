//! Client for ordinary message boxes: sending messages, reading inbox and
//! outbox messages, and polling box events.

use chrono::{DateTime, Utc};

use super::{format_date_time, EdiApi};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::events::message_box::{MessageBoxEventBatch, MessageBoxEventTypeRegistry, RawMessageBoxEventBatch};
use crate::events::MessageBoxEventType;
use crate::pipeline::RequestPipeline;
use crate::types::{MessageData, MessageEntity, OutboxMessageMeta};
use crate::url::UrlBuilder;

const RELATIVE_URL: &str = "V1/Messages/";
const BOX_ID_PARAMETER: &str = "boxId";

#[derive(Debug, Clone)]
pub struct MessagesClient {
    pipeline: RequestPipeline,
    registry: MessageBoxEventTypeRegistry,
}

impl MessagesClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_pipeline(RequestPipeline::new(config)?))
    }

    pub fn from_pipeline(pipeline: RequestPipeline) -> Self {
        Self {
            pipeline,
            registry: MessageBoxEventType::registry(),
        }
    }

    fn operation(&self, name: &str, box_id: &str) -> UrlBuilder {
        self.endpoint(&format!("{RELATIVE_URL}{name}"))
            .add_parameter(BOX_ID_PARAMETER, box_id)
    }

    pub fn send_message(
        &self,
        auth_token: &str,
        box_id: &str,
        message_data: &MessageData,
    ) -> Result<OutboxMessageMeta> {
        let url = self
            .operation("SendMessage", box_id)
            .add_parameter("messageFileName", &message_data.message_file_name)
            .build();
        self.pipeline
            .post_bytes_for(&url, auth_token, &message_data.message_body)
    }

    pub fn get_inbox_message(&self, auth_token: &str, box_id: &str, message_id: &str) -> Result<MessageEntity> {
        let url = self
            .operation("GetInboxMessage", box_id)
            .add_parameter("messageId", message_id)
            .build();
        self.pipeline.get(&url, auth_token)
    }

    pub fn get_outbox_message(&self, auth_token: &str, box_id: &str, message_id: &str) -> Result<MessageEntity> {
        let url = self
            .operation("GetOutboxMessage", box_id)
            .add_parameter("messageId", message_id)
            .build();
        self.pipeline.get(&url, auth_token)
    }

    pub fn get_events(
        &self,
        auth_token: &str,
        box_id: &str,
        exclusive_event_id: Option<&str>,
        count: Option<u32>,
    ) -> Result<MessageBoxEventBatch> {
        let url = self
            .operation("GetEvents", box_id)
            .add_optional_parameter("exclusiveEventId", exclusive_event_id)
            .add_optional_parameter("count", count.map(|c| c.to_string()));
        self.fetch_events(auth_token, url)
    }

    pub fn get_events_from(
        &self,
        auth_token: &str,
        box_id: &str,
        from_date_time: DateTime<Utc>,
        count: Option<u32>,
    ) -> Result<MessageBoxEventBatch> {
        let url = self
            .operation("GetEventsFrom", box_id)
            .add_parameter("fromDateTime", format_date_time(&from_date_time))
            .add_optional_parameter("count", count.map(|c| c.to_string()));
        self.fetch_events(auth_token, url)
    }

    fn fetch_events(&self, auth_token: &str, url: UrlBuilder) -> Result<MessageBoxEventBatch> {
        let raw: RawMessageBoxEventBatch = self.pipeline.get(&url.build(), auth_token)?;
        Ok(self.registry.normalize_batch(raw))
    }
}

impl EdiApi for MessagesClient {
    fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }
}
