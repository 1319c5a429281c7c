//! # OctoFHIR YAML2FHIR
//!
//! Converts loosely-typed, hand-authored documents (typically YAML) into FHIR
//! resources, driven entirely by StructureDefinition snapshots.
//!
//! ## Features
//!
//! - **Schema-driven**: every field is resolved against the element
//!   definitions of the resource, including `[x]` choice elements
//! - **Cardinality**: repeating elements always become arrays, scalar
//!   elements reject arrays
//! - **Nested types**: backbone elements and complex types are expanded
//!   recursively
//! - **Compact literals**: `LOINC#29463-7 Body Weight`, `70 kg`,
//!   `2020-01-01 - 2020-01-05`, `John Q Public`
//! - **Conditional values**: `{ $if-present: field, $then: a, $else: b }`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use octofhir_yaml2fhir::*;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<()> {
//! let mut provider = InMemorySchemaProvider::new();
//! provider.add_json(FhirGeneration::Stu3, "{}")?;
//!
//! let transformer = FhirTransformer::new(Arc::new(provider));
//! let document = document_from_json(serde_json::json!({
//!     "resourceType": "Observation",
//!     "code": "LOINC#29463-7 Body Weight",
//!     "valueQuantity": "70 kg"
//! }));
//! let resource = transformer.convert(&document, Some("patient-1"), "3.0.1")?;
//! # Ok(())
//! # }
//! ```

pub mod converter;
pub mod error;
pub mod provider;
pub mod types;

pub use converter::{ConversionContext, FhirTransformer, SUBJECT_RESOURCE_TYPE, resolve_element};
pub use error::Result;
pub use error::FhirConversionError;
pub use provider::{InMemorySchemaProvider, SchemaProvider};
pub use types::*;
