use std::collections::HashMap;

use crate::error::{FhirConversionError, Result};
use crate::types::{FhirGeneration, ResourceConfig, ResourceConfigs, StructureDefinition};

use super::SchemaProvider;

#[derive(Debug, Default, Clone)]
struct GenerationSchemas {
    definitions: HashMap<String, StructureDefinition>,
    configs: ResourceConfigs,
}

/// Schema provider holding already-parsed StructureDefinitions and resource
/// configurations in memory, grouped by generation.
#[derive(Debug, Default, Clone)]
pub struct InMemorySchemaProvider {
    generations: HashMap<FhirGeneration, GenerationSchemas>,
}

impl InMemorySchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition under its `id` (or `type`).
    pub fn add_structure_definition(
        &mut self,
        generation: FhirGeneration,
        definition: StructureDefinition,
    ) -> Result<()> {
        let key = definition
            .key()
            .ok_or_else(|| {
                FhirConversionError::invalid_schema(
                    "StructureDefinition has neither an id nor a type",
                )
            })?
            .to_string();
        tracing::debug!("Registered {} StructureDefinition {}", generation, key);
        self.generations
            .entry(generation)
            .or_default()
            .definitions
            .insert(key, definition);
        Ok(())
    }

    pub fn with_structure_definition(
        mut self,
        generation: FhirGeneration,
        definition: StructureDefinition,
    ) -> Result<Self> {
        self.add_structure_definition(generation, definition)?;
        Ok(self)
    }

    /// Parses JSON holding either a single StructureDefinition or a Bundle of
    /// them. Non-StructureDefinition entries are skipped. Returns the number
    /// of definitions registered.
    pub fn add_json(&mut self, generation: FhirGeneration, json: &str) -> Result<usize> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        self.add_json_value(generation, value)
    }

    pub fn add_json_value(
        &mut self,
        generation: FhirGeneration,
        value: serde_json::Value,
    ) -> Result<usize> {
        let resource_type = value
            .get("resourceType")
            .and_then(|rt| rt.as_str())
            .map(str::to_string);
        match resource_type.as_deref() {
            Some("StructureDefinition") => {
                let definition: StructureDefinition = serde_json::from_value(value)?;
                self.add_structure_definition(generation, definition)?;
                Ok(1)
            }
            Some("Bundle") => {
                let entries = value
                    .get("entry")
                    .and_then(|entries| entries.as_array())
                    .cloned()
                    .unwrap_or_default();
                let mut count = 0;
                for mut entry in entries {
                    if let Some(resource) = entry.get_mut("resource").map(serde_json::Value::take)
                    {
                        count += self.add_json_value(generation, resource)?;
                    }
                }
                Ok(count)
            }
            _ => Ok(0),
        }
    }

    pub fn add_config(
        &mut self,
        generation: FhirGeneration,
        resource_type: impl Into<String>,
        config: ResourceConfig,
    ) {
        self.generations
            .entry(generation)
            .or_default()
            .configs
            .insert(resource_type.into(), config);
    }

    pub fn with_config(
        mut self,
        generation: FhirGeneration,
        resource_type: impl Into<String>,
        config: ResourceConfig,
    ) -> Self {
        self.add_config(generation, resource_type, config);
        self
    }

    /// Parses resource configurations keyed by resource kind from YAML (JSON
    /// is accepted as a YAML subset).
    pub fn add_config_yaml(&mut self, generation: FhirGeneration, yaml: &str) -> Result<usize> {
        let configs: ResourceConfigs = serde_yaml::from_str(yaml)?;
        let count = configs.len();
        for (resource_type, config) in configs {
            self.add_config(generation, resource_type, config);
        }
        Ok(count)
    }

    pub fn definition_count(&self, generation: FhirGeneration) -> usize {
        self.generations
            .get(&generation)
            .map(|schemas| schemas.definitions.len())
            .unwrap_or(0)
    }
}

impl SchemaProvider for InMemorySchemaProvider {
    fn supports(&self, generation: FhirGeneration) -> bool {
        self.generations
            .get(&generation)
            .is_some_and(|schemas| !schemas.definitions.is_empty())
    }

    fn find_resource(
        &self,
        generation: FhirGeneration,
        resource_type: &str,
    ) -> Option<&StructureDefinition> {
        self.find_type(generation, resource_type)
            .filter(|definition| definition.is_resource())
    }

    fn find_type(
        &self,
        generation: FhirGeneration,
        type_code: &str,
    ) -> Option<&StructureDefinition> {
        self.generations.get(&generation)?.definitions.get(type_code)
    }

    fn find_config(
        &self,
        generation: FhirGeneration,
        resource_type: &str,
    ) -> Option<&ResourceConfig> {
        self.generations.get(&generation)?.configs.get(resource_type)
    }
}
