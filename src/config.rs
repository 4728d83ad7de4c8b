// ⚙️ Dataset Configuration
// Where each reference source lives on disk

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "ZA_DATA_DIR";

/// Data directory used when nothing else is configured
pub const DEFAULT_DATA_DIR: &str = "data";

// ============================================================================
// SOURCES
// ============================================================================

/// One primitively loaded dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    Provinces,
    Metros,
    Locals,
    GovernmentEntities,
    Banks,
    Universities,
    Schools,
    Networks,
    HardwareStores,
    ClothingStores,
    Supermarkets,
    InsuranceProviders,
    PaxiPoints,
    SamsungCsc,
}

impl Source {
    pub const ALL: [Source; 14] = [
        Source::Provinces,
        Source::Metros,
        Source::Locals,
        Source::GovernmentEntities,
        Source::Banks,
        Source::Universities,
        Source::Schools,
        Source::Networks,
        Source::HardwareStores,
        Source::ClothingStores,
        Source::Supermarkets,
        Source::InsuranceProviders,
        Source::PaxiPoints,
        Source::SamsungCsc,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Source::Provinces => "provinces",
            Source::Metros => "metros",
            Source::Locals => "locals",
            Source::GovernmentEntities => "government",
            Source::Banks => "banks",
            Source::Universities => "universities",
            Source::Schools => "schools",
            Source::Networks => "networks",
            Source::HardwareStores => "hardware",
            Source::ClothingStores => "clothing",
            Source::Supermarkets => "supermarkets",
            Source::InsuranceProviders => "insurance",
            Source::PaxiPoints => "pep-paxi",
            Source::SamsungCsc => "samsung-csc",
        }
    }

    /// Path relative to the data directory
    pub fn default_path(&self) -> &'static str {
        match self {
            Source::Provinces => "gov/provinces/index.json",
            Source::Metros => "gov/municipalities/metros.json",
            Source::Locals => "gov/municipalities/locals.json",
            Source::GovernmentEntities => "gov/entities/index.json",
            Source::Banks => "banks/index.json",
            Source::Universities => "education/universities/index.json",
            Source::Schools => "education/schools/index.json",
            Source::Networks => "networks/index.json",
            Source::HardwareStores => "stores/hardware/index.json",
            Source::ClothingStores => "stores/clothing/index.json",
            Source::Supermarkets => "stores/supermarkets/index.json",
            Source::InsuranceProviders => "stores/insurance/index.json",
            Source::PaxiPoints => "stores/store-codes/pep-paxi-store-codes.json",
            Source::SamsungCsc => "android/samsung/csc/index.json",
        }
    }
}

// ============================================================================
// DATASET CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    pub data_dir: PathBuf,
    overrides: Vec<(Source, PathBuf)>,
}

impl DatasetConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        DatasetConfig {
            data_dir: data_dir.into(),
            overrides: Vec::new(),
        }
    }

    /// Read the data directory from `ZA_DATA_DIR`, falling back to `./data`
    pub fn from_env() -> Self {
        let dir = env::var(DATA_DIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        DatasetConfig::new(dir)
    }

    /// Point one source at a different file (absolute, or relative to `data_dir`)
    pub fn with_source_path(mut self, source: Source, path: impl Into<PathBuf>) -> Self {
        self.overrides.retain(|(s, _)| *s != source);
        self.overrides.push((source, path.into()));
        self
    }

    /// Resolved path of a source file
    pub fn path_for(&self, source: Source) -> PathBuf {
        let relative = self
            .overrides
            .iter()
            .find(|(s, _)| *s == source)
            .map(|(_, p)| p.clone())
            .unwrap_or_else(|| PathBuf::from(source.default_path()));

        if relative.is_absolute() {
            relative
        } else {
            self.data_dir.join(relative)
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig::new(DEFAULT_DATA_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = DatasetConfig::new("/srv/za");
        assert_eq!(
            config.path_for(Source::Metros),
            PathBuf::from("/srv/za/gov/municipalities/metros.json")
        );
        assert_eq!(
            config.path_for(Source::PaxiPoints),
            PathBuf::from("/srv/za/stores/store-codes/pep-paxi-store-codes.json")
        );
    }

    #[test]
    fn test_source_override() {
        let config = DatasetConfig::new("/srv/za")
            .with_source_path(Source::Banks, "custom/banks.json")
            .with_source_path(Source::Schools, "/tmp/schools.json");

        assert_eq!(config.path_for(Source::Banks), PathBuf::from("/srv/za/custom/banks.json"));
        assert_eq!(config.path_for(Source::Schools), PathBuf::from("/tmp/schools.json"));
        assert_eq!(config.path_for(Source::Provinces), PathBuf::from("/srv/za/gov/provinces/index.json"));
    }

    #[test]
    fn test_every_source_has_distinct_path() {
        let mut paths: Vec<&str> = Source::ALL.iter().map(|s| s.default_path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), Source::ALL.len());
    }
}
