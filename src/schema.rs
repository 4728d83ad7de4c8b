// 📐 Shape Layer - Schema Validation
// Validates raw (untyped) records against each entity kind's structural contract
//
// Validation never fails fast: every defect in a record is collected in one
// pass so a whole dataset can be audited at once.

use crate::entities::EntityKind;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `municipalities[2].name.en`
    pub path: String,
    pub message: String,
}

impl ValidationError {
    fn new(path: &str, message: impl Into<String>) -> Self {
        ValidationError {
            path: if path.is_empty() { "$".to_string() } else { path.to_string() },
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "errors", rename_all = "lowercase")]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<ValidationError>),
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }

    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(errors) => Err(errors),
        }
    }
}

// ============================================================================
// FIELD RULES
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Format {
    Email,
    Url,
    Swift,
}

#[derive(Debug, Clone, Copy)]
enum FieldType {
    Str {
        non_empty: bool,
        exact_len: Option<usize>,
        format: Option<Format>,
    },
    /// Inclusive bounds match the typed field the loader deserializes into
    Integer { min: i128, max: i128 },
    Number { min: f64, max: f64 },
    Enum(&'static [&'static str]),
    StrList,
    Object(&'static [FieldSpec]),
    ObjectList(&'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    name: &'static str,
    required: bool,
    ty: FieldType,
}

const fn req(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, required: true, ty }
}

const fn opt(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, required: false, ty }
}

const TEXT: FieldType = FieldType::Str { non_empty: false, exact_len: None, format: None };
const NON_EMPTY: FieldType = FieldType::Str { non_empty: true, exact_len: None, format: None };
const EMAIL: FieldType = FieldType::Str { non_empty: true, exact_len: None, format: Some(Format::Email) };
const URL: FieldType = FieldType::Str { non_empty: true, exact_len: None, format: Some(Format::Url) };
const SWIFT: FieldType = FieldType::Str { non_empty: true, exact_len: None, format: Some(Format::Swift) };
const YEAR: FieldType = FieldType::Integer { min: 0, max: u16::MAX as i128 };
const UNSIGNED: FieldType = FieldType::Integer { min: 0, max: u64::MAX as i128 };
const PROVINCE_CODE: FieldType = FieldType::Str { non_empty: true, exact_len: Some(2), format: None };

const LOCALIZED_NAME: &[FieldSpec] = &[req("en", NON_EMPTY), opt("local", TEXT)];

const MUNICIPALITY: &[FieldSpec] = &[
    req("code", NON_EMPTY),
    req("name", FieldType::Object(LOCALIZED_NAME)),
    req("type", FieldType::Enum(&["metropolitan", "district", "local"])),
    req("province", NON_EMPTY),
];

const PROVINCE: &[FieldSpec] = &[
    req("code", PROVINCE_CODE),
    req("name", FieldType::Object(LOCALIZED_NAME)),
    req("capital", TEXT),
    req("municipalities", FieldType::ObjectList(MUNICIPALITY)),
    req("geographicCode", TEXT),
];

const CONTACT: &[FieldSpec] = &[
    req("phone", TEXT),
    req("email", EMAIL),
    req("website", URL),
    req("address", TEXT),
];

const GOVERNMENT_DEPARTMENT: &[FieldSpec] = &[
    req("code", NON_EMPTY),
    req("name", FieldType::Object(LOCALIZED_NAME)),
    req("level", FieldType::Enum(&["national", "provincial"])),
    opt("province", NON_EMPTY),
    req("contact", FieldType::Object(CONTACT)),
];

const BANK: &[FieldSpec] = &[
    req("name", NON_EMPTY),
    req("code", NON_EMPTY),
    opt("branchCode", TEXT),
    opt("swiftCode", SWIFT),
    opt("website", URL),
    req("type", FieldType::Enum(&["commercial", "mutual", "investment", "development"])),
];

const UNIVERSITY: &[FieldSpec] = &[
    req("name", NON_EMPTY),
    req("code", NON_EMPTY),
    req("type", FieldType::Enum(&["university", "university_of_technology", "comprehensive"])),
    req("province", NON_EMPTY),
    req("city", TEXT),
    opt("website", URL),
    opt("established", YEAR),
];

const SCHOOL: &[FieldSpec] = &[
    req("name", NON_EMPTY),
    req("code", NON_EMPTY),
    req("type", FieldType::Enum(&["primary", "secondary", "combined"])),
    req("province", NON_EMPTY),
    req("district", TEXT),
    req("language", FieldType::StrList),
];

const NETWORK_PROVIDER: &[FieldSpec] = &[
    req("name", NON_EMPTY),
    req("code", NON_EMPTY),
    req("type", FieldType::Enum(&["mobile", "fixed", "internet"])),
    req("services", FieldType::StrList),
    req("coverage", FieldType::StrList),
];

const COORDINATES: &[FieldSpec] = &[
    req("latitude", FieldType::Number { min: -90.0, max: 90.0 }),
    req("longitude", FieldType::Number { min: -180.0, max: 180.0 }),
];

const STORE: &[FieldSpec] = &[
    req("name", NON_EMPTY),
    opt("code", NON_EMPTY),
    req("type", NON_EMPTY),
    opt("province", NON_EMPTY),
    opt("city", TEXT),
    opt("address", TEXT),
    opt("coordinates", FieldType::Object(COORDINATES)),
];

const TRADING_HOURS: &[FieldSpec] = &[req("day", NON_EMPTY), req("times", TEXT)];

const PAXI_POINT: &[FieldSpec] = &[
    req("id", UNSIGNED),
    req("name", NON_EMPTY),
    req("paxiCode", NON_EMPTY),
    req("tradingHours", FieldType::ObjectList(TRADING_HOURS)),
];

const SAMSUNG_CSC: &[FieldSpec] = &[
    req("code", NON_EMPTY),
    req("country", NON_EMPTY),
    opt("carrier", TEXT),
    req("region", TEXT),
    req("description", TEXT),
];

fn spec_for(kind: EntityKind) -> &'static [FieldSpec] {
    match kind {
        EntityKind::Province => PROVINCE,
        EntityKind::Municipality => MUNICIPALITY,
        EntityKind::GovernmentDepartment => GOVERNMENT_DEPARTMENT,
        EntityKind::Bank => BANK,
        EntityKind::University => UNIVERSITY,
        EntityKind::School => SCHOOL,
        EntityKind::NetworkProvider => NETWORK_PROVIDER,
        EntityKind::Store => STORE,
        EntityKind::PaxiPoint => PAXI_POINT,
        EntityKind::SamsungCsc => SAMSUNG_CSC,
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate one raw record against the contract of `kind`.
///
/// Extra fields are always allowed. `null` on an optional field counts as absent.
pub fn validate(kind: EntityKind, record: &Value) -> ValidationResult {
    let mut errors = Vec::new();

    match record.as_object() {
        Some(object) => {
            check_object(object, spec_for(kind), "", &mut errors);
            check_cross_field(kind, object, &mut errors);
        }
        None => errors.push(ValidationError::new("", format!("expected object, got {}", type_name(record)))),
    }

    ValidationResult::from_errors(errors)
}

/// Outcome of validating a whole raw collection
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub kind: EntityKind,
    pub total: usize,
    /// (record index, defects) for every invalid record
    pub invalid: Vec<(usize, Vec<ValidationError>)>,
}

impl CollectionReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.invalid.iter().map(|(_, errors)| errors.len()).sum()
    }
}

/// Validate every record of a raw JSON array
pub fn validate_collection(kind: EntityKind, records: &Value) -> CollectionReport {
    let Some(items) = records.as_array() else {
        return CollectionReport {
            kind,
            total: 0,
            invalid: vec![(0, vec![ValidationError::new("", "expected an array of records")])],
        };
    };

    let invalid = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match validate(kind, item) {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(errors) => Some((i, errors)),
        })
        .collect();

    CollectionReport {
        kind,
        total: items.len(),
        invalid,
    }
}

fn check_object(object: &Map<String, Value>, spec: &[FieldSpec], prefix: &str, errors: &mut Vec<ValidationError>) {
    for field in spec {
        let path = join(prefix, field.name);
        match object.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    errors.push(ValidationError::new(&path, "required field is missing"));
                }
            }
            Some(value) => check_value(value, field.ty, &path, errors),
        }
    }
}

fn check_value(value: &Value, ty: FieldType, path: &str, errors: &mut Vec<ValidationError>) {
    match ty {
        FieldType::Str { non_empty, exact_len, format } => {
            let Some(s) = value.as_str() else {
                errors.push(ValidationError::new(path, format!("expected string, got {}", type_name(value))));
                return;
            };
            if non_empty && s.trim().is_empty() {
                errors.push(ValidationError::new(path, "must not be empty"));
                return;
            }
            if let Some(len) = exact_len {
                let actual = s.chars().count();
                if actual != len {
                    errors.push(ValidationError::new(
                        path,
                        format!("must be exactly {} characters, got {}", len, actual),
                    ));
                }
            }
            if let Some(format) = format {
                check_format(s, format, path, errors);
            }
        }
        FieldType::Integer { min, max } => {
            let n = value.as_i64().map(i128::from).or_else(|| value.as_u64().map(i128::from));
            match n {
                Some(n) if n < min || n > max => errors.push(ValidationError::new(
                    path,
                    format!("must be between {} and {}, got {}", min, max, n),
                )),
                Some(_) => {}
                None => errors.push(ValidationError::new(path, format!("expected integer, got {}", type_name(value)))),
            }
        }
        FieldType::Number { min, max } => match value.as_f64() {
            Some(n) if n < min || n > max => errors.push(ValidationError::new(
                path,
                format!("must be between {} and {}, got {}", min, max, n),
            )),
            Some(_) => {}
            None => errors.push(ValidationError::new(path, format!("expected number, got {}", type_name(value)))),
        },
        FieldType::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            Some(s) => errors.push(ValidationError::new(
                path,
                format!("'{}' is not one of: {}", s, allowed.join(", ")),
            )),
            None => errors.push(ValidationError::new(path, format!("expected string, got {}", type_name(value)))),
        },
        FieldType::StrList => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        errors.push(ValidationError::new(
                            &format!("{}[{}]", path, i),
                            format!("expected string, got {}", type_name(item)),
                        ));
                    }
                }
            }
            None => errors.push(ValidationError::new(path, format!("expected array, got {}", type_name(value)))),
        },
        FieldType::Object(spec) => match value.as_object() {
            Some(object) => check_object(object, spec, path, errors),
            None => errors.push(ValidationError::new(path, format!("expected object, got {}", type_name(value)))),
        },
        FieldType::ObjectList(spec) => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, i);
                    match item.as_object() {
                        Some(object) => check_object(object, spec, &item_path, errors),
                        None => errors.push(ValidationError::new(
                            &item_path,
                            format!("expected object, got {}", type_name(item)),
                        )),
                    }
                }
            }
            None => errors.push(ValidationError::new(path, format!("expected array, got {}", type_name(value)))),
        },
    }
}

fn check_format(s: &str, format: Format, path: &str, errors: &mut Vec<ValidationError>) {
    let ok = match format {
        Format::Email => email_regex().is_match(s),
        Format::Url => url::Url::parse(s)
            .map(|u| u.has_host())
            .unwrap_or(false),
        Format::Swift => swift_regex().is_match(s),
    };

    if !ok {
        let what = match format {
            Format::Email => "e-mail address",
            Format::Url => "absolute URL",
            Format::Swift => "SWIFT/BIC code",
        };
        errors.push(ValidationError::new(path, format!("'{}' is not a valid {}", s, what)));
    }
}

/// Rules that span more than one field
fn check_cross_field(kind: EntityKind, object: &Map<String, Value>, errors: &mut Vec<ValidationError>) {
    if kind == EntityKind::GovernmentDepartment {
        let provincial = object.get("level").and_then(Value::as_str) == Some("provincial");
        let has_province = matches!(object.get("province"), Some(v) if !v.is_null());
        if provincial && !has_province {
            errors.push(ValidationError::new("province", "required when level is provincial"));
        }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

fn swift_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{6}[A-Z0-9]{2}([A-Z0-9]{3})?$").expect("swift pattern is valid"))
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_province() -> Value {
        json!({
            "code": "GP",
            "name": {"en": "Gauteng"},
            "capital": "Johannesburg",
            "geographicCode": "ZA-GP",
            "municipalities": [
                {"code": "JHB", "name": {"en": "City of Johannesburg"}, "type": "metropolitan", "province": "GP"}
            ]
        })
    }

    fn paths(result: &ValidationResult) -> Vec<&str> {
        result.errors().iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_valid_province() {
        assert!(validate(EntityKind::Province, &valid_province()).is_valid());
    }

    #[test]
    fn test_province_code_must_be_two_characters() {
        let mut record = valid_province();
        record["code"] = json!("GAU");

        let result = validate(EntityKind::Province, &record);
        assert_eq!(paths(&result), vec!["code"]);
        assert!(result.errors()[0].message.contains("exactly 2"));
    }

    #[test]
    fn test_collects_every_defect_in_one_pass() {
        let record = json!({
            "code": "G",
            "name": {"local": "Gauteng"},
            "capital": 12,
            "geographicCode": "ZA-GP",
            "municipalities": [
                {"code": "", "name": {"en": "Somewhere"}, "type": "village", "province": "GP"},
                "not a record"
            ]
        });

        let result = validate(EntityKind::Province, &record);
        let got = paths(&result);

        assert_eq!(
            got,
            vec![
                "code",
                "name.en",
                "capital",
                "municipalities[0].code",
                "municipalities[0].type",
                "municipalities[1]",
            ]
        );
    }

    #[test]
    fn test_non_object_record_is_reported_not_panicked() {
        let result = validate(EntityKind::Bank, &json!([1, 2, 3]));
        assert_eq!(paths(&result), vec!["$"]);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_optional_fields_accept_null_and_absence() {
        let bank = json!({"name": "Absa", "code": "ABSA", "swiftCode": null, "type": "commercial"});
        assert!(validate(EntityKind::Bank, &bank).is_valid());
    }

    #[test]
    fn test_bank_formats() {
        let bank = json!({
            "name": "First National Bank",
            "code": "FNB",
            "swiftCode": "firnzajj",
            "website": "fnb.co.za",
            "type": "retail"
        });

        let result = validate(EntityKind::Bank, &bank);
        assert_eq!(paths(&result), vec!["swiftCode", "website", "type"]);
    }

    #[test]
    fn test_provincial_department_requires_province() {
        let mut dept = json!({
            "code": "EC-EDU",
            "name": {"en": "Eastern Cape Department of Education"},
            "level": "provincial",
            "contact": {
                "phone": "040 608 4200",
                "email": "info@ecdoe.gov.za",
                "website": "https://www.ecdoe.gov.za",
                "address": "Zwelitsha"
            }
        });

        let result = validate(EntityKind::GovernmentDepartment, &dept);
        assert_eq!(paths(&result), vec!["province"]);

        dept["province"] = json!("EC");
        assert!(validate(EntityKind::GovernmentDepartment, &dept).is_valid());

        dept["contact"]["email"] = json!("not-an-email");
        let result = validate(EntityKind::GovernmentDepartment, &dept);
        assert_eq!(paths(&result), vec!["contact.email"]);
    }

    #[test]
    fn test_store_tolerates_extra_fields_and_checks_coordinates() {
        let store = json!({
            "name": "Cashbuild Polokwane",
            "type": "hardware",
            "coordinates": {"latitude": -123.9, "longitude": 29.45},
            "openSundays": true
        });

        let result = validate(EntityKind::Store, &store);
        assert_eq!(paths(&result), vec!["coordinates.latitude"]);
    }

    #[test]
    fn test_string_list_elements_checked() {
        let provider = json!({
            "name": "Vodacom",
            "code": "VOD",
            "type": "mobile",
            "services": ["voice", 5],
            "coverage": "national"
        });

        let result = validate(EntityKind::NetworkProvider, &provider);
        assert_eq!(paths(&result), vec!["services[1]", "coverage"]);
    }

    #[test]
    fn test_validate_collection_reports_indexes() {
        let records = json!([
            {"code": "XFA", "country": "South Africa", "region": "Africa", "description": "Open market"},
            {"code": "", "country": "South Africa", "region": "Africa", "description": "Broken"},
            {"code": "XFV", "country": "South Africa", "carrier": "Vodacom", "region": "Africa", "description": "Vodacom"}
        ]);

        let report = validate_collection(EntityKind::SamsungCsc, &records);
        assert_eq!(report.total, 3);
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.invalid[0].0, 1);
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn test_validate_collection_rejects_non_array() {
        let report = validate_collection(EntityKind::Bank, &json!({"banks": []}));
        assert!(!report.is_valid());
    }

    #[test]
    fn test_validation_result_serializes_with_status() {
        let value = serde_json::to_value(ValidationResult::Valid).unwrap();
        assert_eq!(value, json!({"status": "valid"}));

        let invalid = ValidationResult::Invalid(vec![ValidationError::new("code", "must not be empty")]);
        let value = serde_json::to_value(invalid).unwrap();
        assert_eq!(value["status"], "invalid");
        assert_eq!(value["errors"][0]["path"], "code");
    }

    #[test]
    fn test_integer_bounds_agree_with_typed_load() {
        use crate::entities::{PaxiPoint, University};

        let university = |established: Value| {
            json!({
                "name": "University of Cape Town",
                "code": "UCT",
                "type": "university",
                "province": "WC",
                "city": "Cape Town",
                "established": established
            })
        };
        let paxi = |id: Value| json!({"id": id, "name": "PEP Khayelitsha", "paxiCode": "P1002", "tradingHours": []});

        for year in [json!(1829), json!(70000), json!(-1)] {
            let record = university(year.clone());
            let valid = validate(EntityKind::University, &record).is_valid();
            let loads = serde_json::from_value::<University>(record).is_ok();
            assert_eq!(valid, loads, "established = {}", year);
        }
        assert_eq!(
            paths(&validate(EntityKind::University, &university(json!(70000)))),
            vec!["established"]
        );

        for id in [json!(7), json!(-1), json!(u64::MAX)] {
            let record = paxi(id.clone());
            let valid = validate(EntityKind::PaxiPoint, &record).is_valid();
            let loads = serde_json::from_value::<PaxiPoint>(record).is_ok();
            assert_eq!(valid, loads, "id = {}", id);
        }
    }
}
