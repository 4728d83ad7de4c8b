// 📱 Samsung CSC (Country Specific Code) Entity

use super::{EntityKind, FieldValue, Record};
use serde::{Deserialize, Serialize};

/// Firmware region code, e.g. `XFA` (South Africa, open market)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamsungCsc {
    pub code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    pub region: String,
    pub description: String,
}

impl Record for SamsungCsc {
    const KIND: EntityKind = EntityKind::SamsungCsc;
    const NAME_FIELD: &'static str = "carrier";
    const SEARCH_FIELDS: &'static [&'static str] = &["code", "country", "carrier", "description"];
    const FILTER_FIELDS: &'static [&'static str] = &["code", "country", "carrier", "region"];

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "code" => Some(FieldValue::Text(&self.code)),
            "country" => Some(FieldValue::Text(&self.country)),
            "carrier" => self.carrier.as_deref().map(FieldValue::Text),
            "region" => Some(FieldValue::Text(&self.region)),
            "description" => Some(FieldValue::Text(&self.description)),
            _ => None,
        }
    }
}
