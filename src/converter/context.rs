use crate::provider::SchemaProvider;
use crate::types::{FhirGeneration, SourceDocument};

/// State shared by every step of a single conversion call.
pub struct ConversionContext<'a> {
    pub(crate) provider: &'a dyn SchemaProvider,
    pub(crate) generation: FhirGeneration,
    /// Document as supplied by the caller, before defaults were merged in.
    /// Conditional values test field presence here regardless of how deep
    /// they are nested.
    pub(crate) root: &'a SourceDocument,
}

impl<'a> ConversionContext<'a> {
    pub fn new(
        provider: &'a dyn SchemaProvider,
        generation: FhirGeneration,
        root: &'a SourceDocument,
    ) -> Self {
        Self {
            provider,
            generation,
            root,
        }
    }

    /// Whether the root document carries a non-null `field`.
    pub fn root_has(&self, field: &str) -> bool {
        self.root.get(field).is_some_and(|value| !value.is_null())
    }
}
