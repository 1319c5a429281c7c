pub mod memory;

pub use memory::InMemorySchemaProvider;

use crate::error::{FhirConversionError, Result};
use crate::types::{FhirGeneration, ResourceConfig, StructureDefinition};

/// Read-only source of schema metadata and resource configuration.
///
/// Implementations must be immutable once handed to a transformer; every
/// conversion borrows them without locking.
pub trait SchemaProvider: Send + Sync {
    /// Whether schema data is available for `generation`.
    fn supports(&self, generation: FhirGeneration) -> bool;

    /// Top-level definition for a resource kind (`kind == "resource"` only).
    fn find_resource(
        &self,
        generation: FhirGeneration,
        resource_type: &str,
    ) -> Option<&StructureDefinition>;

    /// Definition of a nested complex type by type code.
    fn find_type(&self, generation: FhirGeneration, type_code: &str)
    -> Option<&StructureDefinition>;

    fn find_config(&self, generation: FhirGeneration, resource_type: &str)
    -> Option<&ResourceConfig>;

    /// Maps a version string to a generation this provider can serve.
    fn resolve_version(&self, version: &str) -> Result<FhirGeneration> {
        let generation = FhirGeneration::from_version(version)?;
        if self.supports(generation) {
            Ok(generation)
        } else {
            Err(FhirConversionError::unsupported_version(version))
        }
    }
}
