// 📡 Network Provider Entity

use super::{EntityKind, FieldValue, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mobile,
    Fixed,
    Internet,
}

impl NetworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Mobile => "mobile",
            NetworkType::Fixed => "fixed",
            NetworkType::Internet => "internet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkProvider {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub network_type: NetworkType,
    #[serde(default)]
    pub services: Vec<String>,
    /// Province codes (or regions) the provider covers
    #[serde(default)]
    pub coverage: Vec<String>,
}

impl Record for NetworkProvider {
    const KIND: EntityKind = EntityKind::NetworkProvider;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code"];
    const FILTER_FIELDS: &'static [&'static str] = &["code", "type", "services", "coverage"];

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(&self.name)),
            "code" => Some(FieldValue::Text(&self.code)),
            "type" => Some(FieldValue::Text(self.network_type.as_str())),
            "services" => Some(FieldValue::List(&self.services)),
            "coverage" => Some(FieldValue::List(&self.coverage)),
            _ => None,
        }
    }
}
