// South African Public Reference Data - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod dataset;
pub mod entities;
pub mod error;
pub mod export;    // Catalog and JSON/CSV downloads
pub mod filter;    // Query-parameter driven filtering
pub mod integrity; // Uniqueness and foreign-key checks
pub mod lookup;
pub mod query;
pub mod schema;

// Re-export commonly used types
pub use config::{DatasetConfig, Source};
pub use dataset::{
    CollectionVisitor, DatasetBuilder, LoadFailure, LoadReport, ReferenceDataset,
};
pub use entities::{
    Bank, BankType, EntityKind, GovernmentDepartment, GovernmentLevel, LocalizedName,
    Municipality, MunicipalityType, NetworkProvider, NetworkType, PaxiPoint, Province, Record,
    SamsungCsc, School, SchoolType, Store, StoreCategory, University, UniversityType,
};
pub use error::{ExportError, FilterError, LoadError};
pub use export::{catalog, export_dataset, export_json, DatasetInfo, ExportFormat};
pub use filter::{Constraints, FilterResult};
pub use integrity::{IntegrityIssue, IntegrityReport, Severity};
pub use lookup::{get_by_code, get_by_foreign_key, get_by_name};
pub use query::{group_by_field, search, search_by_name};
pub use schema::{validate, ValidationError, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
