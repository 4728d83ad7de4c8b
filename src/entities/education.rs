// 🎓 Education Entities - universities and schools
//
// Both share the { name, code, province, type } shape; schools add a district
// and the languages of instruction.

use super::{EntityKind, FieldValue, Record};
use serde::{Deserialize, Serialize};

// ============================================================================
// UNIVERSITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniversityType {
    University,
    UniversityOfTechnology,
    Comprehensive,
}

impl UniversityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniversityType::University => "university",
            UniversityType::UniversityOfTechnology => "university_of_technology",
            UniversityType::Comprehensive => "comprehensive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub university_type: UniversityType,
    /// Foreign key → `Province::code`
    pub province: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Year of establishment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub established: Option<u16>,
}

impl Record for University {
    const KIND: EntityKind = EntityKind::University;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code", "city"];
    const FILTER_FIELDS: &'static [&'static str] = &["code", "type", "province", "city"];

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(&self.name)),
            "code" => Some(FieldValue::Text(&self.code)),
            "type" => Some(FieldValue::Text(self.university_type.as_str())),
            "province" => Some(FieldValue::Text(&self.province)),
            "city" => Some(FieldValue::Text(&self.city)),
            "website" => self.website.as_deref().map(FieldValue::Text),
            _ => None,
        }
    }
}

// ============================================================================
// SCHOOL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchoolType {
    Primary,
    Secondary,
    Combined,
}

impl SchoolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolType::Primary => "primary",
            SchoolType::Secondary => "secondary",
            SchoolType::Combined => "combined",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    /// EMIS number
    pub code: String,
    #[serde(rename = "type")]
    pub school_type: SchoolType,
    /// Foreign key → `Province::code`
    pub province: String,
    pub district: String,
    /// Languages of instruction
    #[serde(default)]
    pub language: Vec<String>,
}

impl Record for School {
    const KIND: EntityKind = EntityKind::School;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code", "district"];
    const FILTER_FIELDS: &'static [&'static str] = &["code", "type", "province", "district", "language"];

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(&self.name)),
            "code" => Some(FieldValue::Text(&self.code)),
            "type" => Some(FieldValue::Text(self.school_type.as_str())),
            "province" => Some(FieldValue::Text(&self.province)),
            "district" => Some(FieldValue::Text(&self.district)),
            "language" => Some(FieldValue::List(&self.language)),
            _ => None,
        }
    }
}
