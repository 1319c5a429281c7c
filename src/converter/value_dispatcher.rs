use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::complex_types;
use super::context::ConversionContext;
use super::element_resolver::resolve_element;
use super::primitives;
use crate::error::{FhirConversionError, Result};
use crate::types::{ElementDefinition, ResourceConfig, SourceValue};

const RESOURCE_TYPE_FIELD: &str = "resourceType";

impl<'a> ConversionContext<'a> {
    /// Converts every field of `input` (except `resourceType`) against
    /// `scope` and writes it into `result` under its schema field name.
    /// Aliases are only consulted when `config` is given.
    pub fn assign_properties(
        &self,
        input: &IndexMap<String, SourceValue>,
        scope: &[&'a ElementDefinition],
        config: Option<&ResourceConfig>,
        result: &mut Map<String, Value>,
    ) -> Result<()> {
        for (key, value) in input {
            if key == RESOURCE_TYPE_FIELD {
                continue;
            }
            let field = config.map_or(key.as_str(), |config| config.alias_for(key));
            let element = resolve_element(scope, field)?;
            let converted = self.convert_value(value, &element, scope, false)?;
            result.insert(field.to_string(), converted);
        }
        Ok(())
    }

    /// Converts one raw value for `element`. Checks run in a fixed order:
    /// null, cardinality, conditional construct, nested structure, leaf type.
    pub fn convert_value(
        &self,
        value: &SourceValue,
        element: &ElementDefinition,
        scope: &[&'a ElementDefinition],
        skip_cardinality: bool,
    ) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        if !skip_cardinality {
            match element.max() {
                "0" => {
                    return Err(FhirConversionError::UnsupportedCardinality {
                        path: element.path.clone(),
                    });
                }
                "1" => {
                    if matches!(value, SourceValue::List(_)) {
                        return Err(FhirConversionError::CardinalityViolation {
                            path: element.path.clone(),
                        });
                    }
                }
                _ => {
                    let items = match value {
                        SourceValue::List(items) => items.as_slice(),
                        single => std::slice::from_ref(single),
                    };
                    return items
                        .iter()
                        .map(|item| self.convert_value(item, element, scope, true))
                        .collect::<Result<Vec<_>>>()
                        .map(Value::Array);
                }
            }
        }

        if let Some(conditional) = value.as_conditional() {
            let branch = if self.root_has(conditional.field) {
                conditional.then_value
            } else {
                conditional.else_value
            };
            return match branch {
                Some(branch) => self.convert_value(branch, element, scope, skip_cardinality),
                None => Ok(Value::Null),
            };
        }

        // Sequences only make sense at the cardinality step.
        if matches!(value, SourceValue::List(_)) {
            return Err(FhirConversionError::CardinalityViolation {
                path: element.path.clone(),
            });
        }

        if let SourceValue::Map(fields) = value {
            if let Some(nested) = self.convert_structure(fields, element, scope)? {
                return Ok(nested);
            }
        }

        self.convert_leaf(value, element)
    }

    /// Expands a structured value either inline (the element has children in
    /// the current scope, e.g. a backbone element) or through the definition
    /// of its declared complex type. `None` when neither applies.
    fn convert_structure(
        &self,
        fields: &IndexMap<String, SourceValue>,
        element: &ElementDefinition,
        scope: &[&'a ElementDefinition],
    ) -> Result<Option<Value>> {
        let inline_scope: Vec<&'a ElementDefinition> = scope
            .iter()
            .copied()
            .filter(|e| element.contains_path(&e.path))
            .collect();

        let nested_scope = if inline_scope.len() > 1 {
            inline_scope
        } else {
            let Some(type_code) = single_type_code(element) else {
                return Ok(None);
            };
            match self.provider.find_type(self.generation, type_code) {
                Some(definition) if !definition.elements().is_empty() => {
                    tracing::debug!("Expanding {} through type {}", element.path, type_code);
                    definition.elements().iter().collect()
                }
                _ => return Ok(None),
            }
        };

        let mut nested = Map::new();
        self.assign_properties(fields, &nested_scope, None, &mut nested)?;
        Ok(Some(Value::Object(nested)))
    }

    fn convert_leaf(&self, value: &SourceValue, element: &ElementDefinition) -> Result<Value> {
        let type_code = single_type_code(element).ok_or_else(|| {
            FhirConversionError::invalid_schema(format!(
                "{} does not declare exactly one type",
                element.path
            ))
        })?;

        match type_code {
            "boolean" => Ok(primitives::boolean(value)),
            "integer" | "unsignedInt" | "positiveInt" => Ok(primitives::integer(value)),
            "decimal" => Ok(primitives::decimal(value)),
            "instant" | "dateTime" => Ok(primitives::date_time(value)),
            "date" => Ok(primitives::date(value)),
            "time" => Ok(primitives::time(value)),
            "string" | "code" | "id" | "markdown" | "uri" | "oid" | "base64Binary" => {
                Ok(primitives::string(value))
            }
            "Annotation" => Ok(complex_types::annotation(value)),
            "CodeableConcept" => complex_types::codeable_concept(value),
            "Coding" => complex_types::coding(value),
            "HumanName" => Ok(complex_types::human_name(value, self.generation)),
            "Quantity" => complex_types::quantity(value),
            "Period" => Ok(complex_types::period(value)),
            // Address, Attachment, BackboneElement, ContactPoint, Element,
            // Identifier, Range, Ratio, Repeat, SampledData, Signature, Timing
            // have no literal grammar.
            other => Err(FhirConversionError::unsupported_type(other)),
        }
    }
}

fn single_type_code(element: &ElementDefinition) -> Option<&str> {
    match element.types() {
        [only] => Some(only.code.as_str()),
        _ => None,
    }
}
