// 🔎 Lookup Accessors - point queries by natural key
//
// Linear scans over the loaded collections. Collections hold thousands of
// records at most; no index is built.

use crate::dataset::{CollectionVisitor, ReferenceDataset};
use crate::entities::{
    Bank, BankType, EntityKind, GovernmentDepartment, GovernmentLevel, Municipality,
    MunicipalityType, NetworkProvider, NetworkType, Province, Record, SamsungCsc, School,
    SchoolType, Store, University,
};
use serde_json::Value;

// ============================================================================
// GENERIC LOOKUPS
// ============================================================================

/// Exact match on `code`. First match wins if codes are duplicated.
pub fn get_by_code<'a, T: Record>(items: &'a [T], code: &str) -> Option<&'a T> {
    items.iter().find(|item| item.code() == Some(code))
}

/// Case-insensitive containment on the kind's name field. First match wins.
pub fn get_by_name<'a, T: Record>(items: &'a [T], partial_name: &str) -> Option<&'a T> {
    items.iter().find(|item| {
        item.field(T::NAME_FIELD)
            .map(|name| name.contains_ignore_case(partial_name))
            .unwrap_or(false)
    })
}

/// Exact match on a foreign-key (or any) field, source order preserved
pub fn get_by_foreign_key<'a, T: Record>(items: &'a [T], field: &str, value: &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| item.field(field).map(|v| v.equals(value)).unwrap_or(false))
        .collect()
}

// ============================================================================
// KIND-DISPATCHED LOOKUPS
// ============================================================================

struct ByCode<'q>(&'q str);

impl CollectionVisitor for ByCode<'_> {
    type Output = Option<Value>;

    fn visit<T: Record>(self, items: &[T]) -> Option<Value> {
        get_by_code(items, self.0).and_then(|item| serde_json::to_value(item).ok())
    }
}

struct ByName<'q>(&'q str);

impl CollectionVisitor for ByName<'_> {
    type Output = Option<Value>;

    fn visit<T: Record>(self, items: &[T]) -> Option<Value> {
        get_by_name(items, self.0).and_then(|item| serde_json::to_value(item).ok())
    }
}

struct ByForeignKey<'q> {
    field: &'q str,
    value: &'q str,
}

impl CollectionVisitor for ByForeignKey<'_> {
    type Output = Vec<Value>;

    fn visit<T: Record>(self, items: &[T]) -> Vec<Value> {
        get_by_foreign_key(items, self.field, self.value)
            .into_iter()
            .filter_map(|item| serde_json::to_value(item).ok())
            .collect()
    }
}

impl ReferenceDataset {
    pub fn lookup_code(&self, kind: EntityKind, code: &str) -> Option<Value> {
        self.visit(kind, ByCode(code))
    }

    pub fn lookup_name(&self, kind: EntityKind, partial_name: &str) -> Option<Value> {
        self.visit(kind, ByName(partial_name))
    }

    pub fn lookup_foreign_key(&self, kind: EntityKind, field: &str, value: &str) -> Vec<Value> {
        self.visit(kind, ByForeignKey { field, value })
    }

    // ------------------------------------------------------------------------
    // Provinces & municipalities
    // ------------------------------------------------------------------------

    pub fn province_by_code(&self, code: &str) -> Option<&Province> {
        get_by_code(self.provinces(), code)
    }

    /// Whole-name match (English or local), case-insensitive
    pub fn province_by_name(&self, name: &str) -> Option<&Province> {
        let wanted = name.to_lowercase();
        self.provinces().iter().find(|p| {
            p.name.en.to_lowercase() == wanted
                || p.name.local.as_ref().map(|l| l.to_lowercase()) == Some(wanted.clone())
        })
    }

    pub fn province_codes(&self) -> Vec<&str> {
        self.provinces().iter().map(|p| p.code.as_str()).collect()
    }

    pub fn province_names(&self) -> Vec<&str> {
        self.provinces().iter().map(|p| p.name.en.as_str()).collect()
    }

    pub fn is_province_code(&self, code: &str) -> bool {
        self.province_by_code(code).is_some()
    }

    pub fn municipality_by_code(&self, code: &str) -> Option<&Municipality> {
        get_by_code(self.municipalities(), code)
    }

    pub fn is_municipality_code(&self, code: &str) -> bool {
        self.municipality_by_code(code).is_some()
    }

    pub fn municipalities_in(&self, province_code: &str) -> Vec<&Municipality> {
        get_by_foreign_key(self.municipalities(), "province", province_code)
    }

    pub fn municipalities_of_type(&self, municipality_type: MunicipalityType) -> Vec<&Municipality> {
        get_by_foreign_key(self.municipalities(), "type", municipality_type.as_str())
    }

    // ------------------------------------------------------------------------
    // Government
    // ------------------------------------------------------------------------

    pub fn department_by_code(&self, code: &str) -> Option<&GovernmentDepartment> {
        get_by_code(self.government_departments(), code)
    }

    pub fn departments_at(&self, level: GovernmentLevel) -> Vec<&GovernmentDepartment> {
        get_by_foreign_key(self.government_departments(), "level", level.as_str())
    }

    pub fn departments_in(&self, province_code: &str) -> Vec<&GovernmentDepartment> {
        get_by_foreign_key(self.government_departments(), "province", province_code)
    }

    // ------------------------------------------------------------------------
    // Banks
    // ------------------------------------------------------------------------

    pub fn bank_by_code(&self, code: &str) -> Option<&Bank> {
        get_by_code(self.banks(), code)
    }

    pub fn bank_by_name(&self, partial_name: &str) -> Option<&Bank> {
        get_by_name(self.banks(), partial_name)
    }

    pub fn banks_of_type(&self, bank_type: BankType) -> Vec<&Bank> {
        get_by_foreign_key(self.banks(), "type", bank_type.as_str())
    }

    // ------------------------------------------------------------------------
    // Education
    // ------------------------------------------------------------------------

    pub fn university_by_code(&self, code: &str) -> Option<&University> {
        get_by_code(self.universities(), code)
    }

    pub fn universities_in(&self, province_code: &str) -> Vec<&University> {
        get_by_foreign_key(self.universities(), "province", province_code)
    }

    pub fn schools_in(&self, province_code: &str) -> Vec<&School> {
        get_by_foreign_key(self.schools(), "province", province_code)
    }

    pub fn schools_of_type(&self, school_type: SchoolType) -> Vec<&School> {
        get_by_foreign_key(self.schools(), "type", school_type.as_str())
    }

    // ------------------------------------------------------------------------
    // Networks
    // ------------------------------------------------------------------------

    pub fn network_by_code(&self, code: &str) -> Option<&NetworkProvider> {
        get_by_code(self.network_providers(), code)
    }

    pub fn networks_of_type(&self, network_type: NetworkType) -> Vec<&NetworkProvider> {
        get_by_foreign_key(self.network_providers(), "type", network_type.as_str())
    }

    pub fn mobile_providers(&self) -> Vec<&NetworkProvider> {
        self.networks_of_type(NetworkType::Mobile)
    }

    pub fn internet_providers(&self) -> Vec<&NetworkProvider> {
        self.networks_of_type(NetworkType::Internet)
    }

    // ------------------------------------------------------------------------
    // Stores
    // ------------------------------------------------------------------------

    pub fn store_by_code(&self, code: &str) -> Option<&Store> {
        get_by_code(self.all_stores(), code)
    }

    pub fn stores_of_type(&self, store_type: &str) -> Vec<&Store> {
        get_by_foreign_key(self.all_stores(), "type", store_type)
    }

    pub fn stores_in(&self, province_code: &str) -> Vec<&Store> {
        get_by_foreign_key(self.all_stores(), "province", province_code)
    }

    // ------------------------------------------------------------------------
    // Samsung CSC
    // ------------------------------------------------------------------------

    pub fn csc_by_code(&self, code: &str) -> Option<&SamsungCsc> {
        get_by_code(self.samsung_csc(), code)
    }

    /// Partial, case-insensitive carrier match; codes without a carrier never match
    pub fn csc_by_carrier(&self, carrier: &str) -> Vec<&SamsungCsc> {
        self.samsung_csc()
            .iter()
            .filter(|csc| {
                csc.field("carrier")
                    .map(|v| v.contains_ignore_case(carrier))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn south_african_csc(&self) -> Vec<&SamsungCsc> {
        get_by_foreign_key(self.samsung_csc(), "country", "South Africa")
    }
}

// ============================================================================
// TESTS
// ============================================================================
