// 📦 Export & Catalog
// Serializes loaded collections for download, with per-dataset metadata
//
// Dataset keys are the entity kind slugs ("provinces", "banks", "paxi", ...).

use crate::dataset::ReferenceDataset;
use crate::entities::EntityKind;
use crate::error::ExportError;
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub key: String,
    pub name: String,
    pub description: String,
    pub count: usize,
    /// Size of the pretty-printed JSON export, in KiB (one decimal)
    pub size_kb: f64,
    /// Hex SHA-256 of the pretty-printed JSON export
    pub sha256: String,
}

/// Every exportable dataset key, in catalog order
pub fn dataset_keys() -> impl Iterator<Item = &'static str> {
    EntityKind::ALL.iter().map(|kind| kind.slug())
}

/// Resolve a dataset key to the kind it exports
pub fn resolve_key(key: &str) -> Result<EntityKind, ExportError> {
    EntityKind::ALL
        .iter()
        .copied()
        .find(|kind| kind.slug() == key)
        .ok_or_else(|| ExportError::UnknownDataset(key.to_string()))
}

fn describe(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Province => "The nine provinces with capitals and ISO 3166-2 codes",
        EntityKind::Municipality => "Metropolitan and local municipalities",
        EntityKind::GovernmentDepartment => "National and provincial government departments",
        EntityKind::Bank => "Registered banks with branch and SWIFT codes",
        EntityKind::University => "Public universities and universities of technology",
        EntityKind::School => "Public and independent schools",
        EntityKind::NetworkProvider => "Mobile, fixed and ISP network operators",
        EntityKind::Store => "Hardware, clothing, supermarket and insurance retailers",
        EntityKind::PaxiPoint => "PEP Paxi parcel pickup points",
        EntityKind::SamsungCsc => "Samsung firmware country/carrier codes",
    }
}

/// Metadata for every exportable dataset
pub fn catalog(dataset: &ReferenceDataset) -> Result<Vec<DatasetInfo>, ExportError> {
    EntityKind::ALL
        .iter()
        .map(|&kind| -> Result<DatasetInfo, ExportError> {
            let records = dataset.list(kind);
            let bytes = serde_json::to_vec_pretty(&records)?;

            let mut hasher = Sha256::new();
            hasher.update(&bytes);

            Ok(DatasetInfo {
                key: kind.slug().to_string(),
                name: kind.label().to_string(),
                description: describe(kind).to_string(),
                count: records.len(),
                size_kb: (bytes.len() as f64 / 1024.0 * 10.0).round() / 10.0,
                sha256: format!("{:x}", hasher.finalize()),
            })
        })
        .collect()
}

// ============================================================================
// EXPORT
// ============================================================================

/// Pretty JSON object `{key: [records...]}` for the given keys.
///
/// An empty key list exports every dataset.
pub fn export_json(dataset: &ReferenceDataset, keys: &[&str]) -> Result<String, ExportError> {
    let kinds: Vec<EntityKind> = if keys.is_empty() {
        EntityKind::ALL.to_vec()
    } else {
        keys.iter().map(|key| resolve_key(key)).collect::<Result<_, _>>()?
    };

    let mut out = Map::new();
    for kind in kinds {
        out.insert(kind.slug().to_string(), Value::Array(dataset.list(kind)));
    }

    tracing::debug!(datasets = out.len(), "exporting JSON bundle");
    Ok(serde_json::to_string_pretty(&Value::Object(out))?)
}

/// Single dataset rendered in `format`
pub fn export_dataset(
    dataset: &ReferenceDataset,
    key: &str,
    format: ExportFormat,
) -> Result<String, ExportError> {
    let kind = resolve_key(key)?;
    let records = dataset.list(kind);

    tracing::debug!(dataset = key, %format, records = records.len(), "exporting dataset");

    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(&records)?),
        ExportFormat::Csv => to_csv(&records),
    }
}

/// One CSV row per record. Nested objects become dotted columns, string
/// lists are joined with ';'. Columns appear in first-seen order.
fn to_csv(records: &[Value]) -> Result<String, ExportError> {
    let rows: Vec<BTreeMap<String, String>> = records
        .iter()
        .map(|record| {
            let mut row = BTreeMap::new();
            flatten("", record, &mut row);
            row
        })
        .collect();

    let mut headers: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        collect_headers("", record, &mut headers, &mut seen);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    if !headers.is_empty() {
        writer.write_record(&headers)?;
    }
    for row in &rows {
        writer.write_record(headers.iter().map(|h| row.get(h).map(String::as_str).unwrap_or("")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn column(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn collect_headers(prefix: &str, value: &Value, headers: &mut Vec<String>, seen: &mut HashSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                collect_headers(&column(prefix, key), nested, headers, seen);
            }
        }
        _ => {
            if seen.insert(prefix.to_string()) {
                headers.push(prefix.to_string());
            }
        }
    }
}

fn flatten(prefix: &str, value: &Value, row: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(&column(prefix, key), nested, row);
            }
        }
        Value::Null => {
            row.insert(prefix.to_string(), String::new());
        }
        Value::String(s) => {
            row.insert(prefix.to_string(), s.clone());
        }
        Value::Array(items) if items.iter().all(Value::is_string) => {
            let joined: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            row.insert(prefix.to_string(), joined.join(";"));
        }
        other => {
            row.insert(prefix.to_string(), other.to_string());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        Bank, BankType, LocalizedName, NetworkProvider, NetworkType, Province, Store, StoreCategory,
    };

    fn dataset() -> ReferenceDataset {
        ReferenceDataset::builder()
            .provinces(vec![
                Province::new("GP", LocalizedName::new("Gauteng"), "Johannesburg", "ZA-GP"),
                Province::new(
                    "EC",
                    LocalizedName::new("Eastern Cape").with_local("iMpuma-Koloni"),
                    "Bhisho",
                    "ZA-EC",
                ),
            ])
            .banks(vec![
                Bank::new("Absa Bank", "ABSA", BankType::Commercial).with_swift("ABSAZAJJ"),
                Bank::new("First National Bank", "FNB", BankType::Commercial),
            ])
            .networks(vec![NetworkProvider {
                name: "Vodacom".to_string(),
                code: "VOD".to_string(),
                network_type: NetworkType::Mobile,
                services: vec!["voice".to_string(), "data".to_string()],
                coverage: vec!["GP".to_string(), "WC".to_string()],
            }])
            .stores(StoreCategory::Hardware, vec![Store::new("Builders, Centurion", "hardware")])
            .build()
    }

    #[test]
    fn test_catalog_covers_every_dataset() {
        let catalog = catalog(&dataset()).unwrap();

        assert_eq!(catalog.len(), 10);
        let keys: Vec<&str> = catalog.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, dataset_keys().collect::<Vec<_>>());

        let provinces = &catalog[0];
        assert_eq!(provinces.key, "provinces");
        assert_eq!(provinces.count, 2);
        assert_eq!(provinces.sha256.len(), 64);

        let paxi = catalog.iter().find(|d| d.key == "paxi").unwrap();
        assert_eq!(paxi.count, 0);
    }

    #[test]
    fn test_catalog_checksum_is_stable() {
        let first = catalog(&dataset()).unwrap();
        let second = catalog(&dataset()).unwrap();
        assert_eq!(first, second);
        assert_ne!(first[0].sha256, first[3].sha256);
    }

    #[test]
    fn test_export_json_selected_keys() {
        let json = export_json(&dataset(), &["banks"]).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();

        let object = parsed.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["banks"].as_array().unwrap().len(), 2);
        assert_eq!(object["banks"][0]["swiftCode"], "ABSAZAJJ");
    }

    #[test]
    fn test_export_json_all_keys_when_empty() {
        let json = export_json(&dataset(), &[]).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_object().unwrap().len(), 10);
    }

    #[test]
    fn test_export_unknown_key() {
        let err = export_json(&dataset(), &["banks", "casinos"]).unwrap_err();
        assert!(matches!(err, ExportError::UnknownDataset(ref k) if k == "casinos"));
        assert!(export_dataset(&dataset(), "casinos", ExportFormat::Csv).is_err());
    }

    #[test]
    fn test_csv_flattens_nested_objects() {
        let csv = export_dataset(&dataset(), "provinces", ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.contains("name.en"));
        assert!(header.contains("name.local"));
        assert!(header.contains("geographicCode"));

        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].contains("iMpuma-Koloni"));
    }

    #[test]
    fn test_csv_joins_string_lists_and_quotes() {
        let networks = export_dataset(&dataset(), "networks", ExportFormat::Csv).unwrap();
        assert!(networks.contains("voice;data"));
        assert!(networks.contains("GP;WC"));

        let stores = export_dataset(&dataset(), "stores", ExportFormat::Csv).unwrap();
        assert!(stores.contains("\"Builders, Centurion\""));
    }

    #[test]
    fn test_csv_empty_dataset() {
        let csv = export_dataset(&dataset(), "csc", ExportFormat::Csv).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
