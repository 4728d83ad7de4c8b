// Entity Models - typed reference records
//
// Each entity kind is an immutable value record loaded once at startup.
// Every kind implements `Record`, the seam that lets lookup, search, grouping
// and filtering work generically over all collections.

pub mod android;
pub mod bank;
pub mod education;
pub mod government;
pub mod network;
pub mod province;
pub mod store;

pub use android::SamsungCsc;
pub use bank::{Bank, BankType};
pub use education::{School, SchoolType, University, UniversityType};
pub use government::{Contact, GovernmentDepartment, GovernmentLevel};
pub use network::{NetworkProvider, NetworkType};
pub use province::{Municipality, MunicipalityType, Province};
pub use store::{Coordinates, PaxiPoint, Store, StoreCategory, TradingHours};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ENTITY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Province,
    Municipality,
    GovernmentDepartment,
    Bank,
    University,
    School,
    NetworkProvider,
    Store,
    PaxiPoint,
    SamsungCsc,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Province,
        EntityKind::Municipality,
        EntityKind::GovernmentDepartment,
        EntityKind::Bank,
        EntityKind::University,
        EntityKind::School,
        EntityKind::NetworkProvider,
        EntityKind::Store,
        EntityKind::PaxiPoint,
        EntityKind::SamsungCsc,
    ];

    /// Human-readable singular name
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Province => "Province",
            EntityKind::Municipality => "Municipality",
            EntityKind::GovernmentDepartment => "Government Department",
            EntityKind::Bank => "Bank",
            EntityKind::University => "University",
            EntityKind::School => "School",
            EntityKind::NetworkProvider => "Network Provider",
            EntityKind::Store => "Store",
            EntityKind::PaxiPoint => "Paxi Point",
            EntityKind::SamsungCsc => "Samsung CSC",
        }
    }

    /// Collection key used in URLs, exports and the CLI
    pub fn slug(&self) -> &'static str {
        match self {
            EntityKind::Province => "provinces",
            EntityKind::Municipality => "municipalities",
            EntityKind::GovernmentDepartment => "government",
            EntityKind::Bank => "banks",
            EntityKind::University => "universities",
            EntityKind::School => "schools",
            EntityKind::NetworkProvider => "networks",
            EntityKind::Store => "stores",
            EntityKind::PaxiPoint => "paxi",
            EntityKind::SamsungCsc => "csc",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownKind;

    /// Accepts the collection slug ("banks") or the singular snake_case name ("bank").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        EntityKind::ALL
            .into_iter()
            .find(|kind| {
                kind.slug() == wanted
                    || serde_json::to_value(kind)
                        .ok()
                        .and_then(|v| v.as_str().map(|s| s == wanted))
                        .unwrap_or(false)
            })
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

// ============================================================================
// LOCALIZED NAME
// ============================================================================

/// English name plus an optional name in a local official language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
}

impl LocalizedName {
    pub fn new(en: impl Into<String>) -> Self {
        LocalizedName {
            en: en.into(),
            local: None,
        }
    }

    pub fn with_local(mut self, local: impl Into<String>) -> Self {
        self.local = Some(local.into());
        self
    }

    /// Case-insensitive containment against `en` or `local`
    pub fn contains_ignore_case(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.en.to_lowercase().contains(&term)
            || self
                .local
                .as_ref()
                .map(|l| l.to_lowercase().contains(&term))
                .unwrap_or(false)
    }
}

// ============================================================================
// FIELD VALUE
// ============================================================================

/// Borrowed view of a record field, as seen by the generic query layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Localized(&'a LocalizedName),
    List(&'a [String]),
}

impl<'a> FieldValue<'a> {
    /// Case-insensitive substring match. Lists match if any element matches.
    pub fn contains_ignore_case(&self, term: &str) -> bool {
        match self {
            FieldValue::Text(s) => s.to_lowercase().contains(&term.to_lowercase()),
            FieldValue::Localized(name) => name.contains_ignore_case(term),
            FieldValue::List(items) => {
                let term = term.to_lowercase();
                items.iter().any(|i| i.to_lowercase().contains(&term))
            }
        }
    }

    /// Exact, case-sensitive equality. Lists match on membership.
    pub fn equals(&self, value: &str) -> bool {
        match self {
            FieldValue::Text(s) => *s == value,
            FieldValue::Localized(name) => {
                name.en == value || name.local.as_deref() == Some(value)
            }
            FieldValue::List(items) => items.iter().any(|i| i == value),
        }
    }

    /// Keys a record is grouped under
    pub fn group_keys(&self) -> Vec<&'a str> {
        match *self {
            FieldValue::Text(s) => vec![s],
            FieldValue::Localized(name) => vec![name.en.as_str()],
            FieldValue::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

// ============================================================================
// RECORD TRAIT
// ============================================================================

/// Common surface of every reference entity.
///
/// Foreign keys are plain string fields reachable through [`Record::field`];
/// nothing here checks that they resolve. See `integrity` for that.
pub trait Record: Serialize {
    const KIND: EntityKind;

    /// Field searched by `search_by_name` and `get_by_name`
    const NAME_FIELD: &'static str = "name";

    /// Fields scanned by the free-text `search` constraint
    const SEARCH_FIELDS: &'static [&'static str];

    /// Fields accepted as exact-match constraints
    const FILTER_FIELDS: &'static [&'static str];

    /// Natural key, if the record carries one
    fn code(&self) -> Option<&str>;

    /// Look up a field by its wire name (camelCase, as serialized)
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_slug_and_singular() {
        assert_eq!("banks".parse::<EntityKind>().unwrap(), EntityKind::Bank);
        assert_eq!("bank".parse::<EntityKind>().unwrap(), EntityKind::Bank);
        assert_eq!(
            "government_department".parse::<EntityKind>().unwrap(),
            EntityKind::GovernmentDepartment
        );
        assert_eq!("Samsung-CSC".parse::<EntityKind>().unwrap(), EntityKind::SamsungCsc);
        assert!("planets".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_localized_name_matches_either_language() {
        let name = LocalizedName::new("Western Cape").with_local("Wes-Kaap");

        assert!(name.contains_ignore_case("western"));
        assert!(name.contains_ignore_case("KAAP"));
        assert!(!name.contains_ignore_case("gauteng"));
    }

    #[test]
    fn test_localized_name_local_is_optional_on_the_wire() {
        let name: LocalizedName = serde_json::from_str(r#"{"en":"Gauteng"}"#).unwrap();
        assert_eq!(name.local, None);

        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, r#"{"en":"Gauteng"}"#);
    }

    #[test]
    fn test_field_value_list_semantics() {
        let coverage = vec!["GP".to_string(), "WC".to_string()];
        let value = FieldValue::List(&coverage);

        assert!(value.equals("WC"));
        assert!(!value.equals("w"));
        assert!(value.contains_ignore_case("w"));
        assert_eq!(value.group_keys(), vec!["GP", "WC"]);
    }
}
