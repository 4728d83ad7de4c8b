// South African Public Reference Data - CLI
// Catalog, validate, query and export the bundled datasets

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};
use za_public_data::config::DATA_DIR_ENV;
use za_public_data::dataset::{read_source, sources_for};
use za_public_data::schema::validate_collection;
use za_public_data::{
    catalog, export_dataset, export_json, integrity, Constraints, DatasetConfig, EntityKind,
    ExportFormat, ReferenceDataset,
};

#[derive(Parser)]
#[command(name = "za-data", version, about = "South African public reference data")]
struct Cli {
    /// Root directory of the dataset files
    #[arg(long, global = true, env = DATA_DIR_ENV, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every dataset with record count, size and checksum
    Catalog,

    /// Schema-check every source file and run integrity checks
    Validate,

    /// Filter one entity kind
    Query {
        /// Dataset key, e.g. provinces, banks, paxi
        kind: String,

        /// Return the single record with this code
        #[arg(long)]
        code: Option<String>,

        /// Case-insensitive free-text term
        #[arg(long)]
        search: Option<String>,

        /// Exact match constraint, repeatable
        #[arg(long = "filter", value_name = "FIELD=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },

    /// Write datasets as JSON or CSV
    Export {
        /// Dataset key, repeatable (default: all)
        #[arg(long = "dataset")]
        datasets: Vec<String>,

        #[arg(long, default_value = "json")]
        format: ExportFormat,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{}'", raw)),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DatasetConfig::new(&cli.data_dir);

    match cli.command {
        Command::Catalog => run_catalog(&config),
        Command::Validate => run_validate(&config),
        Command::Query { kind, code, search, filters } => run_query(&config, &kind, code, search, filters),
        Command::Export { datasets, format, out } => run_export(&config, &datasets, format, out),
    }
}

fn run_catalog(config: &DatasetConfig) -> Result<()> {
    let dataset = ReferenceDataset::load(config);

    println!("{:<16} {:>8} {:>10}  {}", "DATASET", "RECORDS", "SIZE (KB)", "SHA-256");
    for info in catalog(&dataset)? {
        println!("{:<16} {:>8} {:>10.1}  {}", info.key, info.count, info.size_kb, info.sha256);
    }

    Ok(())
}

fn run_validate(config: &DatasetConfig) -> Result<()> {
    let mut schema_errors = 0;

    for kind in EntityKind::ALL {
        for source in sources_for(kind) {
            let path = config.path_for(*source);
            let records = match read_source(&path) {
                Ok(records) => records,
                Err(e) => {
                    warn!(source = source.name(), error = %e, "source skipped");
                    continue;
                }
            };

            let report = validate_collection(kind, &Value::Array(records));
            if report.is_valid() {
                info!(source = source.name(), records = report.total, "schema ok");
                continue;
            }

            schema_errors += report.error_count();
            for (index, errors) in &report.invalid {
                for error in errors {
                    println!("{}[{}] {}", source.name(), index, error);
                }
            }
        }
    }

    let dataset = ReferenceDataset::load(config);
    let integrity = integrity::check(&dataset);
    for issue in &integrity.issues {
        println!("{:?} {} {} {}: {}", issue.severity, issue.kind.slug(), issue.code, issue.field, issue.issue);
    }

    println!("schema: {} errors", schema_errors);
    println!("integrity: {}", integrity.summary());

    if schema_errors > 0 || integrity.has_critical_issues() {
        bail!("validation failed");
    }
    Ok(())
}

fn run_query(
    config: &DatasetConfig,
    kind: &str,
    code: Option<String>,
    search: Option<String>,
    filters: Vec<(String, String)>,
) -> Result<()> {
    let kind: EntityKind = kind.parse()?;
    let dataset = ReferenceDataset::load(config);

    if let Some(code) = code {
        let record = dataset
            .lookup_code(kind, &code)
            .with_context(|| format!("no {} with code '{}'", kind.label().to_lowercase(), code))?;
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let mut constraints = Constraints::from_params(filters);
    if let Some(term) = search {
        constraints = constraints.search(term);
    }

    let result = dataset.query(kind, &constraints);
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_success() {
        bail!(result.error.unwrap_or_default());
    }
    Ok(())
}

fn run_export(
    config: &DatasetConfig,
    datasets: &[String],
    format: ExportFormat,
    out: Option<PathBuf>,
) -> Result<()> {
    let dataset = ReferenceDataset::load(config);

    let body = match (format, datasets) {
        (ExportFormat::Json, _) => {
            let keys: Vec<&str> = datasets.iter().map(String::as_str).collect();
            export_json(&dataset, &keys)?
        }
        (ExportFormat::Csv, [key]) => export_dataset(&dataset, key, format)?,
        (ExportFormat::Csv, _) => bail!("CSV export takes exactly one --dataset"),
    };

    match out {
        Some(path) => {
            std::fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), %format, "export written");
        }
        None => println!("{}", body),
    }

    Ok(())
}
