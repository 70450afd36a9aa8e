//! Data-transfer objects for the EDI API.
//!
//! # Design
//! Plain serde records. Wire names are PascalCase and enums travel as their
//! variant names; enum values this crate does not know decode to `Unknown`
//! instead of failing the whole response. Optional wire fields are `Option`,
//! and collections that the service may send as `null` decode to empty.

pub mod boxes;
pub mod goods;
pub mod messages;
pub mod organization;
pub mod parties;
pub mod users;

pub(crate) mod serde_helpers;

pub use boxes::{BoxInfo, BoxesInfo, ConnectorBoxInfo, ConnectorBoxesInfo};
pub use goods::{ManufacturerInfo, Price, PricatGoodItemStatus, PriceListGoodItem};
pub use messages::{
    DiadocUrls, DocumentType, InboxMessageMeta, MessageData, MessageEntity,
    MessageMeta, OutboxMessageMeta, ServiceMessageData,
};
pub use organization::{Address, OrganizationCatalogueInfo, Quantity};
pub use parties::{PartiesInfo, PartyInfo};
pub use users::{UserInfo, UsersInfo};
