// 🗺️ Province & Municipality Entities
//
// Provinces carry their municipalities nested; municipalities are also loaded
// independently (metros + locals) and point back at their province by code.

use super::{EntityKind, FieldValue, LocalizedName, Record};
use serde::{Deserialize, Serialize};

// ============================================================================
// MUNICIPALITY TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MunicipalityType {
    /// Category A - metropolitan municipality
    Metropolitan,

    /// Category C - district municipality
    District,

    /// Category B - local municipality
    Local,
}

impl MunicipalityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MunicipalityType::Metropolitan => "metropolitan",
            MunicipalityType::District => "district",
            MunicipalityType::Local => "local",
        }
    }
}

// ============================================================================
// MUNICIPALITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    pub code: String,
    pub name: LocalizedName,
    #[serde(rename = "type")]
    pub municipality_type: MunicipalityType,
    /// Foreign key → `Province::code`
    pub province: String,
}

impl Municipality {
    pub fn new(
        code: impl Into<String>,
        name: LocalizedName,
        municipality_type: MunicipalityType,
        province: impl Into<String>,
    ) -> Self {
        Municipality {
            code: code.into(),
            name,
            municipality_type,
            province: province.into(),
        }
    }

    pub fn is_metro(&self) -> bool {
        self.municipality_type == MunicipalityType::Metropolitan
    }
}

impl Record for Municipality {
    const KIND: EntityKind = EntityKind::Municipality;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code"];
    const FILTER_FIELDS: &'static [&'static str] = &["code", "province", "type"];

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "code" => Some(FieldValue::Text(&self.code)),
            "name" => Some(FieldValue::Localized(&self.name)),
            "type" => Some(FieldValue::Text(self.municipality_type.as_str())),
            "province" => Some(FieldValue::Text(&self.province)),
            _ => None,
        }
    }
}

// ============================================================================
// PROVINCE
// ============================================================================

/// One of the nine provinces.
///
/// `municipalities` defaults to empty when absent on load; the schema layer
/// reports the missing field separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Province {
    /// Two-letter code (e.g. "GP")
    pub code: String,
    pub name: LocalizedName,
    pub capital: String,
    pub geographic_code: String,
    #[serde(default)]
    pub municipalities: Vec<Municipality>,
}

impl Province {
    pub fn new(
        code: impl Into<String>,
        name: LocalizedName,
        capital: impl Into<String>,
        geographic_code: impl Into<String>,
    ) -> Self {
        Province {
            code: code.into(),
            name,
            capital: capital.into(),
            geographic_code: geographic_code.into(),
            municipalities: Vec::new(),
        }
    }

    pub fn with_municipality(mut self, municipality: Municipality) -> Self {
        self.municipalities.push(municipality);
        self
    }

    /// Nested municipalities whose `province` does not point back here
    pub fn mismatched_municipalities(&self) -> impl Iterator<Item = &Municipality> {
        self.municipalities
            .iter()
            .filter(move |m| m.province != self.code)
    }
}

impl Record for Province {
    const KIND: EntityKind = EntityKind::Province;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code"];
    const FILTER_FIELDS: &'static [&'static str] = &["code", "capital", "geographicCode"];

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "code" => Some(FieldValue::Text(&self.code)),
            "name" => Some(FieldValue::Localized(&self.name)),
            "capital" => Some(FieldValue::Text(&self.capital)),
            "geographicCode" => Some(FieldValue::Text(&self.geographic_code)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_province_deserializes_camel_case() {
        let json = r#"{
            "code": "GP",
            "name": {"en": "Gauteng"},
            "capital": "Johannesburg",
            "geographicCode": "ZA-GP",
            "municipalities": [
                {"code": "JHB", "name": {"en": "City of Johannesburg"}, "type": "metropolitan", "province": "GP"}
            ]
        }"#;

        let province: Province = serde_json::from_str(json).unwrap();

        assert_eq!(province.code, "GP");
        assert_eq!(province.geographic_code, "ZA-GP");
        assert_eq!(province.municipalities.len(), 1);
        assert!(province.municipalities[0].is_metro());
    }

    #[test]
    fn test_province_without_municipalities_still_loads() {
        let json = r#"{"code":"EC","name":{"en":"Eastern Cape"},"capital":"Bhisho","geographicCode":"ZA-EC"}"#;
        let province: Province = serde_json::from_str(json).unwrap();
        assert!(province.municipalities.is_empty());
    }

    #[test]
    fn test_mismatched_municipalities() {
        let province = Province::new("WC", LocalizedName::new("Western Cape"), "Cape Town", "ZA-WC")
            .with_municipality(Municipality::new(
                "CPT",
                LocalizedName::new("City of Cape Town"),
                MunicipalityType::Metropolitan,
                "WC",
            ))
            .with_municipality(Municipality::new(
                "TSH",
                LocalizedName::new("City of Tshwane"),
                MunicipalityType::Metropolitan,
                "GP",
            ));

        let bad: Vec<&str> = province
            .mismatched_municipalities()
            .map(|m| m.code.as_str())
            .collect();
        assert_eq!(bad, vec!["TSH"]);
    }

    #[test]
    fn test_municipality_type_field_uses_wire_name() {
        let m = Municipality::new("BUF", LocalizedName::new("Buffalo City"), MunicipalityType::Metropolitan, "EC");
        assert_eq!(m.field("type"), Some(FieldValue::Text("metropolitan")));
        assert_eq!(m.field("municipality_type"), None);
    }
}
