use std::collections::HashMap;

use serde::Deserialize;

use super::value::SourceDocument;

/// Per-resource-kind conversion settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ResourceConfig {
    /// Source field name to schema field name.
    #[serde(default)]
    pub aliases: HashMap<String, String>,

    /// Values merged under every document of this kind.
    #[serde(default)]
    pub defaults: Option<SourceDocument>,

    /// Field that receives the subject reference.
    #[serde(default)]
    pub patient: Option<String>,
}

impl ResourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.insert(from.into(), to.into());
        self
    }

    pub fn with_defaults(mut self, defaults: SourceDocument) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn with_patient_field(mut self, field: impl Into<String>) -> Self {
        self.patient = Some(field.into());
        self
    }

    pub fn alias_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.aliases.get(field).map(String::as_str).unwrap_or(field)
    }
}

/// Resource configurations keyed by resource kind, as loaded from YAML.
pub type ResourceConfigs = HashMap<String, ResourceConfig>;
