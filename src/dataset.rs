// 🗄️ Reference Dataset Store
// Load-once, read-only collections for every entity kind
//
// A source that is missing or corrupt becomes an empty collection and is
// recorded in the `LoadReport`; other sources are unaffected. After
// construction nothing mutates, so the dataset can be shared behind an `Arc`
// and read concurrently without locks.

use crate::config::{DatasetConfig, Source};
use crate::entities::{
    Bank, EntityKind, GovernmentDepartment, Municipality, NetworkProvider, PaxiPoint, Province,
    Record, SamsungCsc, School, Store, StoreCategory, University,
};
use crate::error::LoadError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ============================================================================
// LOAD REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub source: &'static str,
    pub path: PathBuf,
    pub reason: String,
}

/// A record skipped because it could not be read as its entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub source: &'static str,
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub loaded_at: DateTime<Utc>,
    /// (source name, records loaded)
    pub loaded: Vec<(&'static str, usize)>,
    pub rejected: Vec<RejectedRecord>,
    pub failures: Vec<LoadFailure>,
    #[serde(skip)]
    failed_sources: Vec<Source>,
}

impl LoadReport {
    fn new() -> Self {
        LoadReport {
            loaded_at: Utc::now(),
            loaded: Vec::new(),
            rejected: Vec::new(),
            failures: Vec::new(),
            failed_sources: Vec::new(),
        }
    }

    fn record_failure(&mut self, source: Source, path: PathBuf, reason: String) {
        self.failed_sources.push(source);
        self.failures.push(LoadFailure {
            source: source.name(),
            path,
            reason,
        });
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.rejected.is_empty()
    }

    pub fn source_failed(&self, source: Source) -> bool {
        self.failed_sources.contains(&source)
    }

    pub fn summary(&self) -> String {
        let records: usize = self.loaded.iter().map(|(_, n)| n).sum();
        format!(
            "{} records from {} sources | {} failed sources, {} rejected records",
            records,
            self.loaded.len(),
            self.failures.len(),
            self.rejected.len()
        )
    }
}

// ============================================================================
// REFERENCE DATASET
// ============================================================================

#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    provinces: Vec<Province>,
    /// metros ++ locals
    municipalities: Vec<Municipality>,
    metro_count: usize,
    government: Vec<GovernmentDepartment>,
    banks: Vec<Bank>,
    universities: Vec<University>,
    schools: Vec<School>,
    networks: Vec<NetworkProvider>,
    /// hardware ++ clothing ++ supermarkets ++ insurance
    stores: Vec<Store>,
    /// End offset of each category inside `stores`, in `StoreCategory::ALL` order
    store_ends: [usize; 4],
    paxi_points: Vec<PaxiPoint>,
    samsung_csc: Vec<SamsungCsc>,
    report: LoadReport,
}

impl ReferenceDataset {
    /// Load every configured source.
    ///
    /// Never fails as a whole; inspect [`ReferenceDataset::report`] for sources
    /// that degraded to empty collections.
    pub fn load(config: &DatasetConfig) -> Self {
        info!(data_dir = %config.data_dir().display(), "loading reference dataset");

        let mut report = LoadReport::new();
        let mut builder = DatasetBuilder::new()
            .provinces(load_source(config, Source::Provinces, &mut report))
            .metros(load_source(config, Source::Metros, &mut report))
            .locals(load_source(config, Source::Locals, &mut report))
            .government(load_source(config, Source::GovernmentEntities, &mut report))
            .banks(load_source(config, Source::Banks, &mut report))
            .universities(load_source(config, Source::Universities, &mut report))
            .schools(load_source(config, Source::Schools, &mut report))
            .networks(load_source(config, Source::Networks, &mut report))
            .stores(StoreCategory::Hardware, load_source(config, Source::HardwareStores, &mut report))
            .stores(StoreCategory::Clothing, load_source(config, Source::ClothingStores, &mut report))
            .stores(StoreCategory::Supermarket, load_source(config, Source::Supermarkets, &mut report))
            .stores(StoreCategory::Insurance, load_source(config, Source::InsuranceProviders, &mut report))
            .paxi_points(load_source(config, Source::PaxiPoints, &mut report))
            .samsung_csc(load_source(config, Source::SamsungCsc, &mut report));

        info!("{}", report.summary());
        builder.report = report;
        builder.build()
    }

    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::new()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    // ------------------------------------------------------------------------
    // Primitive collections
    // ------------------------------------------------------------------------

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn government_departments(&self) -> &[GovernmentDepartment] {
        &self.government
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn universities(&self) -> &[University] {
        &self.universities
    }

    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    pub fn network_providers(&self) -> &[NetworkProvider] {
        &self.networks
    }

    pub fn paxi_points(&self) -> &[PaxiPoint] {
        &self.paxi_points
    }

    pub fn samsung_csc(&self) -> &[SamsungCsc] {
        &self.samsung_csc
    }

    // ------------------------------------------------------------------------
    // Composite collections
    // ------------------------------------------------------------------------

    /// Metros followed by locals
    pub fn municipalities(&self) -> &[Municipality] {
        &self.municipalities
    }

    pub fn metros(&self) -> &[Municipality] {
        &self.municipalities[..self.metro_count]
    }

    pub fn locals(&self) -> &[Municipality] {
        &self.municipalities[self.metro_count..]
    }

    /// Hardware, clothing, supermarkets, then insurance
    pub fn all_stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn stores(&self, category: StoreCategory) -> &[Store] {
        let idx = StoreCategory::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or(0);
        let start = if idx == 0 { 0 } else { self.store_ends[idx - 1] };
        &self.stores[start..self.store_ends[idx]]
    }

    // ------------------------------------------------------------------------
    // Kind-level helpers
    // ------------------------------------------------------------------------

    /// Number of records per entity kind
    pub fn counts(&self) -> Vec<(EntityKind, usize)> {
        EntityKind::ALL
            .iter()
            .map(|kind| (*kind, self.visit(*kind, CountVisitor)))
            .collect()
    }

    /// False when every source feeding `kind` failed to load
    pub fn is_available(&self, kind: EntityKind) -> bool {
        !sources_for(kind)
            .iter()
            .all(|source| self.report.source_failed(*source))
    }

    /// Every record of `kind` as JSON, in collection order
    pub fn list(&self, kind: EntityKind) -> Vec<Value> {
        self.visit(kind, ListVisitor)
    }

    /// Run `visitor` over the collection that backs `kind`
    pub fn visit<V: CollectionVisitor>(&self, kind: EntityKind, visitor: V) -> V::Output {
        match kind {
            EntityKind::Province => visitor.visit(self.provinces()),
            EntityKind::Municipality => visitor.visit(self.municipalities()),
            EntityKind::GovernmentDepartment => visitor.visit(self.government_departments()),
            EntityKind::Bank => visitor.visit(self.banks()),
            EntityKind::University => visitor.visit(self.universities()),
            EntityKind::School => visitor.visit(self.schools()),
            EntityKind::NetworkProvider => visitor.visit(self.network_providers()),
            EntityKind::Store => visitor.visit(self.all_stores()),
            EntityKind::PaxiPoint => visitor.visit(self.paxi_points()),
            EntityKind::SamsungCsc => visitor.visit(self.samsung_csc()),
        }
    }
}

/// Operation that can run over any typed collection.
///
/// Lets kind-dispatched APIs (HTTP, CLI) reuse the generic, typed code paths.
pub trait CollectionVisitor {
    type Output;

    fn visit<T: Record>(self, items: &[T]) -> Self::Output;
}

struct CountVisitor;

impl CollectionVisitor for CountVisitor {
    type Output = usize;

    fn visit<T: Record>(self, items: &[T]) -> usize {
        items.len()
    }
}

struct ListVisitor;

impl CollectionVisitor for ListVisitor {
    type Output = Vec<Value>;

    fn visit<T: Record>(self, items: &[T]) -> Vec<Value> {
        items
            .iter()
            .filter_map(|item| serde_json::to_value(item).ok())
            .collect()
    }
}

/// Sources that feed an entity kind
pub fn sources_for(kind: EntityKind) -> &'static [Source] {
    match kind {
        EntityKind::Province => &[Source::Provinces],
        EntityKind::Municipality => &[Source::Metros, Source::Locals],
        EntityKind::GovernmentDepartment => &[Source::GovernmentEntities],
        EntityKind::Bank => &[Source::Banks],
        EntityKind::University => &[Source::Universities],
        EntityKind::School => &[Source::Schools],
        EntityKind::NetworkProvider => &[Source::Networks],
        EntityKind::Store => &[
            Source::HardwareStores,
            Source::ClothingStores,
            Source::Supermarkets,
            Source::InsuranceProviders,
        ],
        EntityKind::PaxiPoint => &[Source::PaxiPoints],
        EntityKind::SamsungCsc => &[Source::SamsungCsc],
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Read a source file as a raw JSON array
pub fn read_source(path: &Path) -> Result<Vec<Value>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(LoadError::NotAnArray(path.to_path_buf())),
    }
}

fn load_source<T: DeserializeOwned>(config: &DatasetConfig, source: Source, report: &mut LoadReport) -> Vec<T> {
    let path = config.path_for(source);

    let raw = match read_source(&path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(source = source.name(), error = %e, "dataset source unavailable, using empty collection");
            report.record_failure(source, path, e.to_string());
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!(source = source.name(), index, error = %e, "rejected record");
                report.rejected.push(RejectedRecord {
                    source: source.name(),
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(source = source.name(), records = records.len(), "loaded dataset source");
    report.loaded.push((source.name(), records.len()));
    records
}

// ============================================================================
// BUILDER
// ============================================================================

/// Assembles a dataset from in-memory collections (fixtures, tooling)
#[derive(Debug)]
pub struct DatasetBuilder {
    provinces: Vec<Province>,
    metros: Vec<Municipality>,
    locals: Vec<Municipality>,
    government: Vec<GovernmentDepartment>,
    banks: Vec<Bank>,
    universities: Vec<University>,
    schools: Vec<School>,
    networks: Vec<NetworkProvider>,
    stores: [Vec<Store>; 4],
    paxi_points: Vec<PaxiPoint>,
    samsung_csc: Vec<SamsungCsc>,
    report: LoadReport,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        DatasetBuilder {
            provinces: Vec::new(),
            metros: Vec::new(),
            locals: Vec::new(),
            government: Vec::new(),
            banks: Vec::new(),
            universities: Vec::new(),
            schools: Vec::new(),
            networks: Vec::new(),
            stores: Default::default(),
            paxi_points: Vec::new(),
            samsung_csc: Vec::new(),
            report: LoadReport::new(),
        }
    }

    pub fn provinces(mut self, provinces: Vec<Province>) -> Self {
        self.provinces = provinces;
        self
    }

    pub fn metros(mut self, metros: Vec<Municipality>) -> Self {
        self.metros = metros;
        self
    }

    pub fn locals(mut self, locals: Vec<Municipality>) -> Self {
        self.locals = locals;
        self
    }

    pub fn government(mut self, departments: Vec<GovernmentDepartment>) -> Self {
        self.government = departments;
        self
    }

    pub fn banks(mut self, banks: Vec<Bank>) -> Self {
        self.banks = banks;
        self
    }

    pub fn universities(mut self, universities: Vec<University>) -> Self {
        self.universities = universities;
        self
    }

    pub fn schools(mut self, schools: Vec<School>) -> Self {
        self.schools = schools;
        self
    }

    pub fn networks(mut self, networks: Vec<NetworkProvider>) -> Self {
        self.networks = networks;
        self
    }

    pub fn stores(mut self, category: StoreCategory, stores: Vec<Store>) -> Self {
        let idx = StoreCategory::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or(0);
        self.stores[idx] = stores;
        self
    }

    pub fn paxi_points(mut self, points: Vec<PaxiPoint>) -> Self {
        self.paxi_points = points;
        self
    }

    pub fn samsung_csc(mut self, codes: Vec<SamsungCsc>) -> Self {
        self.samsung_csc = codes;
        self
    }

    /// Mark a source as failed, as if its file were missing
    pub fn failed_source(mut self, source: Source, reason: impl Into<String>) -> Self {
        self.report
            .record_failure(source, PathBuf::from(source.default_path()), reason.into());
        self
    }

    pub fn build(self) -> ReferenceDataset {
        let metro_count = self.metros.len();
        let mut municipalities = self.metros;
        municipalities.extend(self.locals);

        let mut store_ends = [0usize; 4];
        let mut stores = Vec::new();
        for (i, group) in self.stores.into_iter().enumerate() {
            stores.extend(group);
            store_ends[i] = stores.len();
        }

        ReferenceDataset {
            provinces: self.provinces,
            municipalities,
            metro_count,
            government: self.government,
            banks: self.banks,
            universities: self.universities,
            schools: self.schools,
            networks: self.networks,
            stores,
            store_ends,
            paxi_points: self.paxi_points,
            samsung_csc: self.samsung_csc,
            report: self.report,
        }
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BankType, LocalizedName, MunicipalityType};
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn municipality(code: &str, kind: MunicipalityType) -> Municipality {
        Municipality::new(code, LocalizedName::new(code), kind, "GP")
    }

    fn write(dir: &TempDir, relative: &str, content: &str) {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_municipalities_are_metros_then_locals() {
        let dataset = ReferenceDataset::builder()
            .metros(vec![municipality("JHB", MunicipalityType::Metropolitan)])
            .locals(vec![
                municipality("GP421", MunicipalityType::Local),
                municipality("GP422", MunicipalityType::Local),
            ])
            .build();

        let codes: Vec<&str> = dataset.municipalities().iter().map(|m| m.code.as_str()).collect();
        assert_eq!(codes, vec!["JHB", "GP421", "GP422"]);
        assert_eq!(dataset.metros().len(), 1);
        assert_eq!(dataset.locals().len(), 2);
    }

    #[test]
    fn test_all_stores_concatenates_categories_in_order() {
        let dataset = ReferenceDataset::builder()
            .stores(StoreCategory::Insurance, vec![Store::new("Old Mutual", "insurance")])
            .stores(StoreCategory::Hardware, vec![Store::new("Builders", "hardware")])
            .stores(StoreCategory::Supermarket, vec![
                Store::new("Shoprite", "supermarket"),
                Store::new("Spar", "supermarket"),
            ])
            .build();

        let names: Vec<&str> = dataset.all_stores().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Builders", "Shoprite", "Spar", "Old Mutual"]);
        assert!(dataset.stores(StoreCategory::Clothing).is_empty());
        assert_eq!(dataset.stores(StoreCategory::Supermarket).len(), 2);
        assert_eq!(dataset.stores(StoreCategory::Insurance)[0].name, "Old Mutual");
    }

    #[test]
    fn test_accessors_return_same_collection_every_call() {
        let dataset = ReferenceDataset::builder()
            .banks(vec![Bank::new("Absa", "ABSA", BankType::Commercial)])
            .build();

        let first = dataset.banks().as_ptr();
        let second = dataset.banks().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_degrades_missing_and_corrupt_sources() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "banks/index.json",
            r#"[{"name":"Absa","code":"ABSA","type":"commercial"}]"#,
        );
        write(&dir, "gov/provinces/index.json", "{ not json");
        write(&dir, "networks/index.json", r#"{"providers": []}"#);

        let dataset = ReferenceDataset::load(&DatasetConfig::new(dir.path()));

        assert_eq!(dataset.banks().len(), 1);
        assert!(dataset.provinces().is_empty());
        assert!(dataset.network_providers().is_empty());

        let report = dataset.report();
        assert!(report.source_failed(Source::Provinces));
        assert!(report.source_failed(Source::Networks));
        assert!(report.source_failed(Source::Metros));
        assert!(!report.source_failed(Source::Banks));
        assert_eq!(report.failures.len(), Source::ALL.len() - 1);

        assert!(dataset.is_available(EntityKind::Bank));
        assert!(!dataset.is_available(EntityKind::Province));
    }

    #[test]
    fn test_load_rejects_bad_records_but_keeps_the_rest() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "banks/index.json",
            r#"[
                {"name":"Absa","code":"ABSA","type":"commercial"},
                {"name":"Mystery","code":"MYS","type":"shadow"},
                {"name":"Land Bank","code":"LB","type":"development"}
            ]"#,
        );

        let dataset = ReferenceDataset::load(&DatasetConfig::new(dir.path()));

        let codes: Vec<&str> = dataset.banks().iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes, vec!["ABSA", "LB"]);
        assert_eq!(dataset.report().rejected.len(), 1);
        assert_eq!(dataset.report().rejected[0].index, 1);
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "gov/municipalities/metros.json",
            r#"[{"code":"CPT","name":{"en":"City of Cape Town"},"type":"metropolitan","province":"WC"}]"#,
        );
        let config = DatasetConfig::new(dir.path());

        let a = ReferenceDataset::load(&config);
        let b = ReferenceDataset::load(&config);

        assert_eq!(a.municipalities(), b.municipalities());
        assert_eq!(a.report().failures, b.report().failures);
    }

    #[test]
    fn test_municipalities_available_if_any_source_loaded() {
        let dataset = ReferenceDataset::builder()
            .failed_source(Source::Metros, "missing")
            .build();
        assert!(dataset.is_available(EntityKind::Municipality));

        let dataset = ReferenceDataset::builder()
            .failed_source(Source::Metros, "missing")
            .failed_source(Source::Locals, "missing")
            .build();
        assert!(!dataset.is_available(EntityKind::Municipality));
    }

    #[test]
    fn test_list_and_counts_by_kind() {
        let dataset = ReferenceDataset::builder()
            .banks(vec![
                Bank::new("Absa", "ABSA", BankType::Commercial),
                Bank::new("Nedbank", "NED", BankType::Commercial),
            ])
            .build();

        let banks = dataset.list(EntityKind::Bank);
        assert_eq!(banks.len(), 2);
        assert_eq!(banks[1]["code"], "NED");

        let counts = dataset.counts();
        assert!(counts.contains(&(EntityKind::Bank, 2)));
        assert!(counts.contains(&(EntityKind::Province, 0)));
    }

    proptest! {
        #[test]
        fn prop_composite_length_and_order(metros in 0usize..20, locals in 0usize..20) {
            let dataset = ReferenceDataset::builder()
                .metros((0..metros).map(|i| municipality(&format!("M{}", i), MunicipalityType::Metropolitan)).collect())
                .locals((0..locals).map(|i| municipality(&format!("L{}", i), MunicipalityType::Local)).collect())
                .build();

            prop_assert_eq!(dataset.municipalities().len(), metros + locals);
            prop_assert_eq!(dataset.metros(), &dataset.municipalities()[..metros]);
            prop_assert!(dataset.locals().iter().all(|m| m.code.starts_with('L')));
        }
    }
}
