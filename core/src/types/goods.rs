//! Price-list goods items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::organization::Quantity;
use super::serde_helpers::null_as_default;

/// Processing status of a price-list line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PricatGoodItemStatus {
    #[default]
    Empty,
    Added,
    NotFound,
    NoAction,
    Changed,
    Deleted,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Price {
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub value: Option<Decimal>,
    pub measurement_unit_code: Option<String>,
}

/// Manufacturer details attached to a goods item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManufacturerInfo {
    pub gln: Option<String>,
    pub name: Option<String>,
    pub inn: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceListGoodItem {
    pub line_number: Option<u32>,
    pub gtin: Option<String>,
    pub buyer_code: Option<String>,
    pub supplier_code: Option<String>,
    pub pricat_good_item_status: Option<PricatGoodItemStatus>,
    #[serde(default)]
    pub is_variable_quantity_product: bool,
    pub name: Option<String>,
    pub buyer_name: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub brand_name: Option<String>,
    pub calculation_group: Option<String>,
    pub height: Option<Quantity>,
    pub width: Option<Quantity>,
    pub depth: Option<Quantity>,
    pub net_content: Option<Quantity>,
    pub gross_weight: Option<Quantity>,
    pub price_quantity: Option<Quantity>,
    pub one_place_quantity: Option<Quantity>,
    pub incremental_order_quantity: Option<Quantity>,
    pub quantity_in_package: Option<Quantity>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub countries_of_origin_code: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_declaration_numbers: Vec<String>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub excise_tax: Option<Decimal>,
    #[serde(rename = "VATRate")]
    pub vat_rate: Option<String>,
    pub price: Option<Price>,
    #[serde(rename = "OldPriceWithVAT")]
    pub old_price_with_vat: Option<Price>,
    #[serde(rename = "PriceWithVAT")]
    pub price_with_vat: Option<Price>,
    pub cost_of_installation: Option<Price>,
    pub package: Option<String>,
    pub package_type: Option<String>,
    pub manufacturer: Option<ManufacturerInfo>,
    pub comment: Option<String>,
    #[serde(default)]
    pub development_mode: bool,
}
