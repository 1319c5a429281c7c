use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use octofhir_yaml2fhir::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "yaml2fhir")]
#[command(about = "Convert hand-authored YAML documents into FHIR resources")]
#[command(version)]
struct Cli {
    /// Directory of StructureDefinition JSON files or bundles (searched recursively)
    #[arg(short, long)]
    schemas: PathBuf,

    /// Resource configuration YAML (aliases, defaults, patient field)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// FHIR version of the schemas and output (e.g. 1.0.2, 3.0.1, stu3)
    #[arg(short = 'f', long, default_value = "3.0.1")]
    fhir_version: String,

    /// Patient id reused by Patient documents and referenced by the others
    #[arg(short, long)]
    patient_id: Option<String>,

    /// YAML input holding one document, a sequence of documents, or a
    /// multi-document stream. Unquoted dates are read as plain text and are
    /// emitted as written, not expanded to full timestamps.
    input: PathBuf,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let generation = FhirGeneration::from_version(&cli.fhir_version)?;

    let mut provider = InMemorySchemaProvider::new();
    let loaded = load_schemas(&mut provider, generation, &cli.schemas)?;
    tracing::info!(
        "Loaded {} StructureDefinitions from {}",
        loaded,
        cli.schemas.display()
    );

    if let Some(config_path) = &cli.config {
        let content = std::fs::read_to_string(config_path)?;
        let count = provider.add_config_yaml(generation, &content)?;
        tracing::info!("Loaded {} resource configurations", count);
    }

    let documents = read_documents(&cli.input)?;
    let transformer = FhirTransformer::new(Arc::new(provider));
    let mut resources =
        transformer.convert_all(&documents, cli.patient_id.as_deref(), &cli.fhir_version)?;

    let output = if resources.len() == 1 {
        resources.remove(0)
    } else {
        serde_json::Value::Array(resources)
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn load_schemas(
    provider: &mut InMemorySchemaProvider,
    generation: FhirGeneration,
    dir: &Path,
) -> Result<usize> {
    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            count += load_schemas(provider, generation, &path)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            let content = std::fs::read_to_string(&path)?;
            match provider.add_json(generation, &content) {
                Ok(n) => count += n,
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }
    }
    Ok(count)
}

fn read_documents(path: &Path) -> Result<Vec<SourceDocument>> {
    let content = std::fs::read_to_string(path)?;
    documents_from_yaml(&content)
}
