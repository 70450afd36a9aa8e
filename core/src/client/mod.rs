//! Typed client facade over the request pipeline.
//!
//! # Design
//! Each client owns a `RequestPipeline` and exposes one method per remote
//! operation. Operations every client supports (authentication, party,
//! box, organization and user lookups) are provided methods of the `EdiApi`
//! trait, so connector clients get them by implementing `pipeline()` rather
//! than by wrapping a base client. Clients are stateless: the auth token is
//! passed in on every call and never stored.

mod messages;
mod transformer;

pub use messages::MessagesClient;
pub use transformer::TransformerConnectorClient;

use chrono::{DateTime, Utc};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::pipeline::RequestPipeline;
use crate::types::{BoxInfo, BoxesInfo, OrganizationCatalogueInfo, PartiesInfo, PartyInfo, UsersInfo};
use crate::url::UrlBuilder;

/// Operations shared by every EDI API client.
pub trait EdiApi {
    fn pipeline(&self) -> &RequestPipeline;

    /// Starts a URL for an endpoint relative to the configured base URI.
    fn endpoint(&self, relative_path: &str) -> UrlBuilder {
        UrlBuilder::new(self.pipeline().config().base_uri(), relative_path)
    }

    /// Exchanges a portal session id for an auth token.
    fn authenticate_by_portal_sid(&self, portal_sid: &str) -> Result<String> {
        authenticate_with(self, &format!("konturediauth_portalsid={portal_sid}"))
    }

    /// Exchanges login and password for an auth token.
    fn authenticate(&self, login: &str, password: &str) -> Result<String> {
        authenticate_with(
            self,
            &format!("konturediauth_login={login},konturediauth_password={password}"),
        )
    }

    fn get_accessible_parties_info(&self, auth_token: &str) -> Result<PartiesInfo> {
        let url = self.endpoint("V1/Parties/GetAccessiblePartiesInfo").build();
        self.pipeline().get(&url, auth_token)
    }

    fn get_party_info(&self, auth_token: &str, party_id: &str) -> Result<PartyInfo> {
        let url = self
            .endpoint("V1/Parties/GetPartyInfo")
            .add_parameter("partyId", party_id)
            .build();
        self.pipeline().get(&url, auth_token)
    }

    fn get_boxes_info(&self, auth_token: &str) -> Result<BoxesInfo> {
        let url = self.endpoint("V1/Boxes/GetBoxesInfo").build();
        self.pipeline().get(&url, auth_token)
    }

    fn get_main_api_box(&self, auth_token: &str, party_id: &str) -> Result<BoxInfo> {
        let url = self
            .endpoint("V1/Boxes/GetMainApiBox")
            .add_parameter("partyId", party_id)
            .build();
        self.pipeline().get(&url, auth_token)
    }

    fn get_organization_catalogue_info(
        &self,
        auth_token: &str,
        party_id: &str,
    ) -> Result<OrganizationCatalogueInfo> {
        let url = self
            .endpoint("V1/Organizations/GetOrganizationCatalogueInfo")
            .add_parameter("partyId", party_id)
            .build();
        self.pipeline().get(&url, auth_token)
    }

    fn get_users_info(&self, auth_token: &str, party_id: &str) -> Result<UsersInfo> {
        let url = self
            .endpoint("V1/Users/GetUsersInfo")
            .add_parameter("partyId", party_id)
            .build();
        self.pipeline().get(&url, auth_token)
    }
}

/// The token is returned as the raw response text.
fn authenticate_with<A: EdiApi + ?Sized>(api: &A, credentials: &str) -> Result<String> {
    let url = api.endpoint("V1/Authenticate").build();
    api.pipeline()
        .perform(HttpMethod::Post, &url, "", None, Some(credentials))
}

/// Formats a timestamp for the `fromDateTime` query parameter.
pub(crate) fn format_date_time(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Client for the operations every API user has.
#[derive(Debug, Clone)]
pub struct EdiApiClient {
    pipeline: RequestPipeline,
}

impl EdiApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_pipeline(RequestPipeline::new(config)?))
    }

    pub fn from_pipeline(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }
}

impl EdiApi for EdiApiClient {
    fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }
}
