// 🛒 Store Entities - retail chains and Paxi pickup points
//
// Store shapes vary per sub-dataset (hardware, clothing, supermarkets,
// insurance). Known fields are typed; everything else is kept in an open bag
// so nothing is lost on load or export.

use super::{EntityKind, FieldValue, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// STORE CATEGORY
// ============================================================================

/// Source sub-dataset a store was loaded from.
///
/// Order matters: it is the concatenation order of the composite store list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreCategory {
    Hardware,
    Clothing,
    Supermarket,
    Insurance,
}

impl StoreCategory {
    pub const ALL: [StoreCategory; 4] = [
        StoreCategory::Hardware,
        StoreCategory::Clothing,
        StoreCategory::Supermarket,
        StoreCategory::Insurance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreCategory::Hardware => "hardware",
            StoreCategory::Clothing => "clothing",
            StoreCategory::Supermarket => "supermarket",
            StoreCategory::Insurance => "insurance",
        }
    }
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub store_type: String,
    /// Foreign key → `Province::code`, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    /// Fields this model does not know about, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Store {
    pub fn new(name: impl Into<String>, store_type: impl Into<String>) -> Self {
        Store {
            name: name.into(),
            code: None,
            store_type: store_type.into(),
            province: None,
            city: None,
            address: None,
            coordinates: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    /// Extra string fields, in key order
    pub fn extra_text(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extra
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.as_str(), s)))
    }
}

impl Record for Store {
    const KIND: EntityKind = EntityKind::Store;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code", "city", "address"];
    const FILTER_FIELDS: &'static [&'static str] = &["code", "type", "province", "city"];

    fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(&self.name)),
            "code" => self.code.as_deref().map(FieldValue::Text),
            "type" => Some(FieldValue::Text(&self.store_type)),
            "province" => self.province.as_deref().map(FieldValue::Text),
            "city" => self.city.as_deref().map(FieldValue::Text),
            "address" => self.address.as_deref().map(FieldValue::Text),
            other => self
                .extra
                .get(other)
                .and_then(Value::as_str)
                .map(FieldValue::Text),
        }
    }
}

// ============================================================================
// PAXI POINT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingHours {
    pub day: String,
    pub times: String,
}

/// Pep store acting as a Paxi parcel pickup point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaxiPoint {
    pub id: u64,
    pub name: String,
    pub paxi_code: String,
    #[serde(default)]
    pub trading_hours: Vec<TradingHours>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Record for PaxiPoint {
    const KIND: EntityKind = EntityKind::PaxiPoint;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "paxiCode"];
    const FILTER_FIELDS: &'static [&'static str] = &["paxiCode", "code"];

    fn code(&self) -> Option<&str> {
        Some(&self.paxi_code)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(&self.name)),
            // `code` is an alias so generic code lookups work on Paxi points
            "paxiCode" | "code" => Some(FieldValue::Text(&self.paxi_code)),
            other => self
                .extra
                .get(other)
                .and_then(Value::as_str)
                .map(FieldValue::Text),
        }
    }
}
