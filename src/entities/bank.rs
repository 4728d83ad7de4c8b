// 🏦 Bank Entity
//
// Registered banks. Looked up by code, by partial name, or matched in free-text
// search against name, code and SWIFT/BIC.

use super::{EntityKind, FieldValue, Record};
use serde::{Deserialize, Serialize};

// ============================================================================
// BANK TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankType {
    /// Retail / commercial bank
    Commercial,

    /// Mutual bank (member owned)
    Mutual,

    /// Investment bank
    Investment,

    /// State development finance institution
    Development,
}

impl BankType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BankType::Commercial => "commercial",
            BankType::Mutual => "mutual",
            BankType::Investment => "investment",
            BankType::Development => "development",
        }
    }
}

// ============================================================================
// BANK ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    pub name: String,

    /// Short code (e.g. "FNB"), unique across banks
    pub code: String,

    /// Universal branch code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,

    /// SWIFT / BIC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(rename = "type")]
    pub bank_type: BankType,
}

impl Bank {
    pub fn new(name: impl Into<String>, code: impl Into<String>, bank_type: BankType) -> Self {
        Bank {
            name: name.into(),
            code: code.into(),
            branch_code: None,
            swift_code: None,
            website: None,
            bank_type,
        }
    }

    pub fn with_swift(mut self, swift: impl Into<String>) -> Self {
        self.swift_code = Some(swift.into());
        self
    }

    pub fn with_branch_code(mut self, branch_code: impl Into<String>) -> Self {
        self.branch_code = Some(branch_code.into());
        self
    }
}

impl Record for Bank {
    const KIND: EntityKind = EntityKind::Bank;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code", "swiftCode"];
    const FILTER_FIELDS: &'static [&'static str] = &["code", "type", "branchCode", "swiftCode"];

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(&self.name)),
            "code" => Some(FieldValue::Text(&self.code)),
            "branchCode" => self.branch_code.as_deref().map(FieldValue::Text),
            "swiftCode" => self.swift_code.as_deref().map(FieldValue::Text),
            "website" => self.website.as_deref().map(FieldValue::Text),
            "type" => Some(FieldValue::Text(self.bank_type.as_str())),
            _ => None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
