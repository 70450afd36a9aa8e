//! Organization catalogue records and shared measurement types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub country_code: Option<String>,
    pub region_code: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    /// Free-form address used when the structured fields are not filled.
    pub address_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrganizationCatalogueInfo {
    pub party_id: String,
    pub organization_name: Option<String>,
    pub gln: Option<String>,
    pub inn: Option<String>,
    pub kpp: Option<String>,
    pub okpo: Option<String>,
    pub legal_address: Option<Address>,
    pub actual_address: Option<Address>,
    pub chief_name: Option<String>,
    pub accountant_name: Option<String>,
}

/// An amount together with its measurement unit (OKEI/UN-ECE code).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Quantity {
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub value: Option<Decimal>,
    pub measurement_unit_code: Option<String>,
}
