// 🏛️ Government Department Entity

use super::{EntityKind, FieldValue, LocalizedName, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GovernmentLevel {
    National,
    Provincial,
}

impl GovernmentLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GovernmentLevel::National => "national",
            GovernmentLevel::Provincial => "provincial",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub website: String,
    pub address: String,
}

/// National or provincial department.
///
/// `province` is required iff `level` is provincial. That rule lives in the
/// schema and integrity layers, not in the type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernmentDepartment {
    pub code: String,
    pub name: LocalizedName,
    pub level: GovernmentLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    pub contact: Contact,
}

impl GovernmentDepartment {
    pub fn is_national(&self) -> bool {
        self.level == GovernmentLevel::National
    }
}

impl Record for GovernmentDepartment {
    const KIND: EntityKind = EntityKind::GovernmentDepartment;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code"];
    const FILTER_FIELDS: &'static [&'static str] = &["code", "level", "province"];

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "code" => Some(FieldValue::Text(&self.code)),
            "name" => Some(FieldValue::Localized(&self.name)),
            "level" => Some(FieldValue::Text(self.level.as_str())),
            "province" => self.province.as_deref().map(FieldValue::Text),
            "email" => Some(FieldValue::Text(&self.contact.email)),
            "website" => Some(FieldValue::Text(&self.contact.website)),
            _ => None,
        }
    }
}
