// 🧰 Filter Composition
// One predicate chain (exact-match fields + free-text search) for every collection
//
// Constraints are ANDed. An absent constraint does not filter. At the
// query-parameter boundary an empty or whitespace-only value counts as absent.

use crate::dataset::{CollectionVisitor, ReferenceDataset};
use crate::entities::{EntityKind, Record};
use crate::error::FilterError;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Query parameter holding the free-text term
pub const SEARCH_PARAM: &str = "search";

// ============================================================================
// CONSTRAINTS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    exact: Vec<(String, String)>,
    search: Option<String>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value` exactly
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.exact.push((field.into(), value.into()));
        self
    }

    /// Free-text term matched against the kind's search fields
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Build from raw query parameters.
    ///
    /// `search` becomes the free-text term, every other key an exact-match
    /// constraint. Blank values are dropped.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut constraints = Constraints::new();
        for (key, value) in params {
            let (key, value) = (key.as_ref().trim(), value.as_ref());
            if value.trim().is_empty() {
                continue;
            }
            if key == SEARCH_PARAM {
                constraints.search = Some(value.to_string());
            } else {
                constraints.exact.push((key.to_string(), value.to_string()));
            }
        }
        constraints
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.search.is_none()
    }

    pub fn exact(&self) -> &[(String, String)] {
        &self.exact
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

// ============================================================================
// APPLY
// ============================================================================

/// Narrow `items` to the records matching every constraint, in source order
pub fn apply<'a, T: Record>(items: &'a [T], constraints: &Constraints) -> Result<Vec<&'a T>, FilterError> {
    if let Some((field, _)) = constraints
        .exact
        .iter()
        .find(|(field, _)| !T::FILTER_FIELDS.contains(&field.as_str()))
    {
        return Err(FilterError::UnknownField {
            kind: T::KIND.label().to_string(),
            field: field.clone(),
        });
    }

    let term = constraints.search.as_ref().map(|t| t.to_lowercase());

    Ok(items
        .iter()
        .filter(|item| {
            constraints
                .exact
                .iter()
                .all(|(field, value)| item.field(field).map(|v| v.equals(value)).unwrap_or(false))
        })
        .filter(|item| match &term {
            Some(term) => T::SEARCH_FIELDS.iter().any(|field| {
                item.field(field)
                    .map(|v| v.contains_ignore_case(term))
                    .unwrap_or(false)
            }),
            None => true,
        })
        .collect())
}

// ============================================================================
// FILTER RESULT
// ============================================================================

/// Response envelope consumed verbatim by the HTTP layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> FilterResult<T> {
    pub fn ok(data: Vec<T>, total: usize) -> Self {
        FilterResult {
            success: true,
            count: Some(data.len()),
            data: Some(data),
            total: Some(total),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        FilterResult {
            success: false,
            data: None,
            count: None,
            total: None,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Typed query: filter and wrap in a `FilterResult`
pub fn query<'a, T: Record>(items: &'a [T], constraints: &Constraints) -> FilterResult<&'a T> {
    match apply(items, constraints) {
        Ok(data) => FilterResult::ok(data, items.len()),
        Err(e) => FilterResult::failure(e.to_string()),
    }
}

struct QueryVisitor<'c>(&'c Constraints);

impl CollectionVisitor for QueryVisitor<'_> {
    type Output = Result<(Vec<Value>, usize), String>;

    fn visit<T: Record>(self, items: &[T]) -> Self::Output {
        let matched = apply(items, self.0).map_err(|e| e.to_string())?;
        let data = matched
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.to_string())?;
        Ok((data, items.len()))
    }
}

impl ReferenceDataset {
    /// Kind-dispatched query for the HTTP / CLI boundary.
    ///
    /// Fails when the kind's data could not be loaded or a constraint names a
    /// field the kind does not support. No matches is a success with `count: 0`.
    pub fn query(&self, kind: EntityKind, constraints: &Constraints) -> FilterResult<Value> {
        if !self.is_available(kind) {
            let e = FilterError::Unavailable(kind.slug().to_string());
            debug!(kind = kind.slug(), error = %e, "query failed");
            return FilterResult::failure(e.to_string());
        }

        match self.visit(kind, QueryVisitor(constraints)) {
            Ok((data, total)) => {
                debug!(kind = kind.slug(), matched = data.len(), total, "query evaluated");
                FilterResult::ok(data, total)
            }
            Err(message) => {
                debug!(kind = kind.slug(), error = %message, "query failed");
                FilterResult::failure(message)
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Source;
    use crate::entities::{
        Bank, BankType, LocalizedName, Municipality, MunicipalityType, Province,
    };
    use proptest::prelude::*;

    fn dataset() -> ReferenceDataset {
        ReferenceDataset::builder()
            .provinces(vec![
                Province::new("EC", LocalizedName::new("Eastern Cape"), "Bhisho", "ZA-EC"),
                Province::new("GP", LocalizedName::new("Gauteng"), "Johannesburg", "ZA-GP"),
            ])
            .metros(vec![
                Municipality::new("BUF", LocalizedName::new("Buffalo City"), MunicipalityType::Metropolitan, "EC"),
                Municipality::new("TSH", LocalizedName::new("City of Tshwane"), MunicipalityType::Metropolitan, "GP"),
            ])
            .locals(vec![
                Municipality::new("GP423", LocalizedName::new("Lesedi"), MunicipalityType::Local, "GP"),
                Municipality::new("EC441", LocalizedName::new("Matatiele"), MunicipalityType::Local, "EC"),
            ])
            .banks(vec![
                Bank::new("First National Bank", "FNB", BankType::Commercial).with_swift("FIRNZAJJ"),
                Bank::new("Standard Bank", "SBSA", BankType::Commercial).with_swift("SBZAZAJJ"),
                Bank::new("Land Bank", "LB", BankType::Development),
            ])
            .build()
    }

    fn codes(result: &FilterResult<Value>) -> Vec<String> {
        result
            .data
            .as_ref()
            .map(|d| d.iter().map(|v| v["code"].as_str().unwrap_or_default().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_query_province_by_code() {
        let result = dataset().query(EntityKind::Province, &Constraints::new().with("code", "GP"));

        assert!(result.is_success());
        assert_eq!(codes(&result), vec!["GP"]);
        assert_eq!(result.count, Some(1));
        assert_eq!(result.total, Some(2));
    }

    #[test]
    fn test_query_bank_search_hits_swift() {
        let result = dataset().query(EntityKind::Bank, &Constraints::new().search("firn"));

        assert_eq!(codes(&result), vec!["FNB"]);
        assert_eq!(result.data.unwrap()[0]["name"], "First National Bank");
    }

    #[test]
    fn test_constraints_are_anded() {
        let constraints = Constraints::new().with("province", "GP").with("type", "local");
        let result = dataset().query(EntityKind::Municipality, &constraints);
        assert_eq!(codes(&result), vec!["GP423"]);

        let constraints = Constraints::new().with("province", "GP").search("city");
        let result = dataset().query(EntityKind::Municipality, &constraints);
        assert_eq!(codes(&result), vec!["TSH"]);
    }

    #[test]
    fn test_no_constraints_returns_everything() {
        let result = dataset().query(EntityKind::Municipality, &Constraints::new());
        assert_eq!(codes(&result), vec!["BUF", "TSH", "GP423", "EC441"]);
    }

    #[test]
    fn test_empty_match_is_success_with_zero_count() {
        let result = dataset().query(EntityKind::Bank, &Constraints::new().search("xyz"));

        assert!(result.is_success());
        assert_eq!(result.count, Some(0));
        assert_eq!(result.total, Some(3));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["data"], serde_json::json!([]));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_unknown_field_is_failure() {
        let result = dataset().query(EntityKind::Bank, &Constraints::new().with("colour", "blue"));

        assert!(!result.is_success());
        assert!(result.error.as_deref().unwrap().contains("colour"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_unavailable_collection_is_failure() {
        let dataset = ReferenceDataset::builder()
            .failed_source(Source::Banks, "missing")
            .build();

        let result = dataset.query(EntityKind::Bank, &Constraints::new());
        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("Failed to fetch banks data"));
        assert_eq!(result.error, Some(FilterError::Unavailable("banks".to_string()).to_string()));
    }

    #[test]
    fn test_from_params_blank_values_are_absent() {
        let params = vec![("province", ""), ("type", "  "), ("search", "tsh")];
        let constraints = Constraints::from_params(params);

        assert!(constraints.exact().is_empty());
        assert_eq!(constraints.search_term(), Some("tsh"));

        let result = dataset().query(EntityKind::Municipality, &constraints);
        assert_eq!(codes(&result), vec!["TSH"]);
    }

    #[test]
    fn test_explicit_empty_search_passes_through() {
        // Built programmatically, an empty term is a substring of everything
        let result = dataset().query(EntityKind::Bank, &Constraints::new().search(""));
        assert_eq!(result.count, Some(3));
    }

    #[test]
    fn test_typed_query_borrows_records() {
        let dataset = dataset();
        let result = query(dataset.banks(), &Constraints::new().with("type", "development"));

        assert_eq!(result.count, Some(1));
        assert!(std::ptr::eq(result.data.unwrap()[0], &dataset.banks()[2]));
    }

    #[test]
    fn test_apply_never_mutates_base() {
        let dataset = dataset();
        let before = dataset.municipalities().to_vec();
        let _ = apply(dataset.municipalities(), &Constraints::new().with("province", "EC"));
        assert_eq!(dataset.municipalities(), before.as_slice());
    }

    proptest! {
        #[test]
        fn prop_filter_is_idempotent(
            province in prop::sample::select(vec!["EC", "GP", "WC"]),
            term in "[a-z]{0,3}",
        ) {
            let dataset = dataset();
            let once = Constraints::new().with("province", province).search(term.clone());
            let twice = once.clone().with("province", province).search(term);

            let first = dataset.query(EntityKind::Municipality, &once);
            let second = dataset.query(EntityKind::Municipality, &twice);
            prop_assert_eq!(&first, &second);

            // filtering the filtered output again changes nothing
            let narrowed = apply(dataset.municipalities(), &once).unwrap();
            let owned: Vec<Municipality> = narrowed.iter().map(|m| (*m).clone()).collect();
            let again = apply(&owned, &once).unwrap();
            prop_assert_eq!(narrowed.len(), again.len());
        }
    }
}
