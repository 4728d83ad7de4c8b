// ✅ Data Integrity Checks
// Uniqueness and referential integrity across the loaded collections
//
// Foreign keys are never enforced at load time. This pass is what tests and
// tooling run to surface violations.

use crate::dataset::ReferenceDataset;
use crate::entities::{EntityKind, GovernmentLevel, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// ISSUES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Key is missing or ambiguous
    Warning,  // Reference does not resolve
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityIssue {
    pub severity: Severity,
    pub kind: EntityKind,
    /// Code of the offending record ("" when it has none)
    pub code: String,
    pub field: String,
    pub issue: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub checked_records: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }

    pub fn issues_for(&self, kind: EntityKind) -> impl Iterator<Item = &IntegrityIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    pub fn summary(&self) -> String {
        let critical = self
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count();
        format!(
            "{} records checked: {} issues ({} critical, {} warnings)",
            self.checked_records,
            self.issues.len(),
            critical,
            self.issues.len() - critical
        )
    }

    fn push(&mut self, severity: Severity, kind: EntityKind, code: &str, field: &str, issue: String) {
        self.issues.push(IntegrityIssue {
            severity,
            kind,
            code: code.to_string(),
            field: field.to_string(),
            issue,
        });
    }
}

// ============================================================================
// CHECKS
// ============================================================================

/// Run every integrity check over `dataset`
pub fn check(dataset: &ReferenceDataset) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    check_codes(dataset.provinces(), &mut report);
    check_codes(dataset.municipalities(), &mut report);
    check_codes(dataset.government_departments(), &mut report);
    check_codes(dataset.banks(), &mut report);
    check_codes(dataset.universities(), &mut report);
    check_codes(dataset.schools(), &mut report);
    check_codes(dataset.network_providers(), &mut report);
    check_codes(dataset.paxi_points(), &mut report);
    check_codes(dataset.samsung_csc(), &mut report);
    check_optional_codes(dataset, &mut report);

    let provinces: HashSet<&str> = dataset.provinces().iter().map(|p| p.code.as_str()).collect();

    check_province_refs(dataset.municipalities(), &provinces, &mut report);
    check_province_refs(dataset.government_departments(), &provinces, &mut report);
    check_province_refs(dataset.universities(), &provinces, &mut report);
    check_province_refs(dataset.schools(), &provinces, &mut report);
    check_province_refs(dataset.all_stores(), &provinces, &mut report);
    check_province_refs(dataset.paxi_points(), &provinces, &mut report);

    for province in dataset.provinces() {
        for m in province.mismatched_municipalities() {
            report.push(
                Severity::Critical,
                EntityKind::Province,
                &province.code,
                "municipalities",
                format!("nested municipality {} belongs to province '{}'", m.code, m.province),
            );
        }
    }

    for dept in dataset.government_departments() {
        if dept.level == GovernmentLevel::Provincial && dept.province.is_none() {
            report.push(
                Severity::Critical,
                EntityKind::GovernmentDepartment,
                &dept.code,
                "province",
                "provincial department has no province".to_string(),
            );
        }
    }

    report.checked_records = dataset.counts().iter().map(|(_, n)| n).sum();
    report
}

/// Every code non-empty and unique within its collection
fn check_codes<T: Record>(items: &[T], report: &mut IntegrityReport) {
    let mut seen = HashSet::new();

    for item in items {
        match item.code() {
            Some(code) if code.trim().is_empty() => {
                report.push(Severity::Critical, T::KIND, code, "code", "code is empty".to_string());
            }
            Some(code) => {
                if !seen.insert(code) {
                    report.push(
                        Severity::Critical,
                        T::KIND,
                        code,
                        "code",
                        format!("duplicate {} code '{}'", T::KIND.label().to_lowercase(), code),
                    );
                }
            }
            None => {
                report.push(Severity::Critical, T::KIND, "", "code", "record has no code".to_string());
            }
        }
    }
}

/// Stores may lack a code; only present codes must be unique
fn check_optional_codes(dataset: &ReferenceDataset, report: &mut IntegrityReport) {
    let mut seen = HashSet::new();
    for store in dataset.all_stores() {
        if let Some(code) = store.code.as_deref() {
            if code.trim().is_empty() {
                report.push(Severity::Critical, EntityKind::Store, code, "code", "code is empty".to_string());
            } else if !seen.insert(code) {
                report.push(
                    Severity::Critical,
                    EntityKind::Store,
                    code,
                    "code",
                    format!("duplicate store code '{}'", code),
                );
            }
        }
    }
}

fn check_province_refs<T: Record>(items: &[T], provinces: &HashSet<&str>, report: &mut IntegrityReport) {
    for item in items {
        if let Some(value) = item.field("province") {
            for province in value.group_keys() {
                if !provinces.contains(province) {
                    report.push(
                        Severity::Warning,
                        T::KIND,
                        item.code().unwrap_or_default(),
                        "province",
                        format!("province '{}' does not exist", province),
                    );
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
