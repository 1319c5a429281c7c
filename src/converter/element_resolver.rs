use std::borrow::Cow;

use crate::error::{FhirConversionError, Result};
use crate::types::ElementDefinition;

/// Resolves `field` against a scope of element definitions whose first entry
/// is the scope root (`Observation`, `Observation.component`, `Quantity`...).
///
/// An exact path match wins. Otherwise every choice element in the scope is
/// tried in order, and within it every declared type in order, until
/// `root.path + "." + field` equals the choice path with `[x]` replaced by
/// the capitalized type code. The matched choice element is returned
/// narrowed to that single type.
pub fn resolve_element<'a>(
    scope: &[&'a ElementDefinition],
    field: &str,
) -> Result<Cow<'a, ElementDefinition>> {
    let root = scope.first().ok_or_else(|| {
        FhirConversionError::invalid_schema(format!("No elements in scope for field {field}"))
    })?;
    let wanted_path = format!("{}.{}", root.path, field);

    if let Some(element) = scope.iter().find(|e| e.path == wanted_path) {
        return Ok(Cow::Borrowed(*element));
    }

    for choice in scope.iter().filter(|e| e.is_choice()) {
        let matched = choice
            .types()
            .iter()
            .find(|t| choice.choice_path(&t.code).as_deref() == Some(wanted_path.as_str()));
        if let Some(element_type) = matched {
            return Ok(Cow::Owned(choice.narrowed_to(element_type)));
        }
    }

    Err(FhirConversionError::path_not_found(wanted_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation() -> Vec<ElementDefinition> {
        vec![
            ElementDefinition::new("Observation").with_cardinality(0, "*"),
            ElementDefinition::new("Observation.status")
                .with_cardinality(1, "1")
                .with_types(["code"]),
            ElementDefinition::new("Observation.effective[x]")
                .with_cardinality(0, "1")
                .with_types(["dateTime", "Period"]),
            ElementDefinition::new("Observation.value[x]")
                .with_cardinality(0, "1")
                .with_types(["Quantity", "CodeableConcept", "string"]),
        ]
    }

    #[test]
    fn test_exact_match_is_borrowed() {
        let elements = observation();
        let scope: Vec<_> = elements.iter().collect();
        let element = resolve_element(&scope, "status").unwrap();
        assert!(matches!(element, Cow::Borrowed(_)));
        assert_eq!(element.path, "Observation.status");
    }

    #[test]
    fn test_choice_resolution_narrows_type() {
        let elements = observation();
        let scope: Vec<_> = elements.iter().collect();
        let element = resolve_element(&scope, "valueCodeableConcept").unwrap();
        assert_eq!(element.path, "Observation.value[x]");
        assert_eq!(element.types().len(), 1);
        assert_eq!(element.types()[0].code, "CodeableConcept");

        let element = resolve_element(&scope, "effectivePeriod").unwrap();
        assert_eq!(element.types()[0].code, "Period");
    }

    #[test]
    fn test_choice_tie_break_follows_scan_order() {
        let elements = vec![
            ElementDefinition::new("Thing"),
            ElementDefinition::new("Thing.value[x]").with_types(["string", "String"]),
            ElementDefinition::new("Thing.value[x]").with_types(["code"]),
        ];
        let scope: Vec<_> = elements.iter().collect();
        let element = resolve_element(&scope, "valueString").unwrap();
        assert_eq!(element.types()[0].code, "string");
    }

    #[test]
    fn test_path_not_found() {
        let elements = observation();
        let scope: Vec<_> = elements.iter().collect();
        let err = resolve_element(&scope, "valueBanana").unwrap_err();
        match err {
            FhirConversionError::PathNotFound { path } => {
                assert_eq!(path, "Observation.valueBanana")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unmatched_choice_base_name() {
        let elements = observation();
        let scope: Vec<_> = elements.iter().collect();
        assert!(resolve_element(&scope, "value").is_err());
    }
}
