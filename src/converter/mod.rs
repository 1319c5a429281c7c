pub mod complex_types;
mod context;
mod element_resolver;
pub mod primitives;
mod value_dispatcher;

pub use context::ConversionContext;
pub use element_resolver::resolve_element;

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::error::{FhirConversionError, Result};
use crate::provider::SchemaProvider;
use crate::types::{SourceDocument, SourceValue};

/// Resource kind whose identifier may be supplied by the caller.
pub const SUBJECT_RESOURCE_TYPE: &str = "Patient";

/// Converts hand-authored documents into FHIR resources using the schema
/// metadata of a [`SchemaProvider`].
#[derive(Clone)]
pub struct FhirTransformer {
    provider: Arc<dyn SchemaProvider>,
}

impl FhirTransformer {
    pub fn new(provider: Arc<dyn SchemaProvider>) -> Self {
        Self { provider }
    }

    /// Converts one document.
    ///
    /// The output is seeded with `resourceType` and `id`. A `Patient` reuses
    /// `subject_id` as its id when given; everything else gets a fresh UUID.
    /// An empty `subject_id` counts as absent.
    /// When the resource configuration names a patient field and a subject id
    /// is given, that field receives a `Patient/<id>` reference. Defaults from
    /// the configuration are merged beneath the document's own fields.
    pub fn convert(
        &self,
        document: &SourceDocument,
        subject_id: Option<&str>,
        fhir_version: &str,
    ) -> Result<Value> {
        let generation = self.provider.resolve_version(fhir_version)?;
        let subject_id = subject_id.filter(|id| !id.is_empty());

        let resource_type = match document.get("resourceType") {
            None | Some(SourceValue::Null) => {
                return Err(FhirConversionError::MissingResourceType);
            }
            Some(value) => primitives::text(value),
        };
        let definition = self
            .provider
            .find_resource(generation, &resource_type)
            .ok_or_else(|| FhirConversionError::unsupported_resource_type(&resource_type))?;
        let config = self.provider.find_config(generation, &resource_type);

        tracing::debug!(
            "Converting {} document against {} schema",
            resource_type,
            generation
        );

        let input: Cow<'_, SourceDocument> = match config.and_then(|c| c.defaults.as_ref()) {
            Some(defaults) => {
                let mut merged = defaults.clone();
                for (key, value) in document {
                    merged.insert(key.clone(), value.clone());
                }
                Cow::Owned(merged)
            }
            None => Cow::Borrowed(document),
        };

        let kind = definition.key().unwrap_or(resource_type.as_str());
        let id = match subject_id {
            Some(subject_id) if kind == SUBJECT_RESOURCE_TYPE => subject_id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };

        let mut result = Map::new();
        result.insert("resourceType".to_string(), json!(kind));
        result.insert("id".to_string(), json!(id));

        if let (Some(field), Some(subject_id)) =
            (config.and_then(|c| c.patient.as_deref()), subject_id)
        {
            result.insert(field.to_string(), subject_reference(subject_id));
        }

        let scope: Vec<_> = definition.elements().iter().collect();
        let context = ConversionContext::new(self.provider.as_ref(), generation, document);
        context.assign_properties(&input, &scope, config, &mut result)?;

        Ok(Value::Object(result))
    }

    /// Converts a batch of documents for the same subject, stopping at the
    /// first failure.
    pub fn convert_all<'d, I>(
        &self,
        documents: I,
        subject_id: Option<&str>,
        fhir_version: &str,
    ) -> Result<Vec<Value>>
    where
        I: IntoIterator<Item = &'d SourceDocument>,
    {
        documents
            .into_iter()
            .map(|document| self.convert(document, subject_id, fhir_version))
            .collect()
    }
}

pub fn subject_reference(subject_id: &str) -> Value {
    json!({ "reference": format!("{SUBJECT_RESOURCE_TYPE}/{subject_id}") })
}
