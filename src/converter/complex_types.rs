//! Parsers for the compact literal grammars accepted for complex FHIR types.
//!
//! | Type              | Grammar                                   |
//! |-------------------|-------------------------------------------|
//! | `Coding`          | `[SYSTEM #CODE] [DISPLAY]`                |
//! | `CodeableConcept` | as `Coding`                               |
//! | `Quantity`        | `VALUE [UNIT]`                            |
//! | `Period`          | `START [ - END]`                          |
//! | `HumanName`       | `GIVEN... FAMILY`                         |
//! | `Annotation`      | `{ author, time, text }`                  |

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value, json};

use super::primitives::{self, number_value};
use crate::error::{FhirConversionError, Result};
use crate::types::{FhirGeneration, SourceValue};

/// Optional `SYSTEM #CODE` prefix followed by free display text. The system
/// is only recognised together with a `#`; `.` excludes newlines, so a
/// multi-line literal does not match.
static CODING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\S+)?\s*#\s*([^#\s]+))?\s*(.*)$").expect("valid coding pattern")
});

/// Leading magnitude, then an optional whitespace-separated unit.
static QUANTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)(?:\s+(.+))?").expect("valid quantity pattern")
});

/// Dash between start and end, surrounded by whitespace so date hyphens survive.
static PERIOD_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+-\s+").expect("valid period separator"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coding {
    pub system: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
}

impl Coding {
    pub fn parse(literal: &str) -> Result<Self> {
        let captures = CODING_PATTERN.captures(literal).ok_or_else(|| {
            FhirConversionError::parse_error(format!("Couldn't parse code: {literal}"))
        })?;
        let component = |i: usize| {
            captures
                .get(i)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let system = component(1).map(|token| match canonical_system(&token) {
            Some(uri) => uri.to_string(),
            None => {
                if !token.contains("://") && !token.starts_with("urn:") {
                    tracing::warn!("Unrecognized code system: {}", token);
                }
                token
            }
        });

        Ok(Self {
            system,
            code: component(2),
            display: component(3),
        })
    }

    pub fn to_json(&self) -> Value {
        let mut coding = Map::new();
        if let Some(system) = &self.system {
            coding.insert("system".to_string(), json!(system));
        }
        if let Some(code) = &self.code {
            coding.insert("code".to_string(), json!(code));
        }
        if let Some(display) = &self.display {
            coding.insert("display".to_string(), json!(display));
        }
        Value::Object(coding)
    }
}

/// Canonical URI for a well-known code system alias, case-insensitively.
pub fn canonical_system(alias: &str) -> Option<&'static str> {
    let uri = match alias.to_ascii_uppercase().as_str() {
        "SNOMED" | "SNOMEDCT" | "SNOMED-CT" | "SCT" => "http://snomed.info/sct",
        "LOINC" => "http://loinc.org",
        "RXNORM" | "RXN" | "RX" => "http://www.nlm.nih.gov/research/umls/rxnorm",
        "UCUM" => "http://unitsofmeasure.org",
        "CPT" => "http://www.ama-assn.org/go/cpt",
        "CVX" => "http://hl7.org/fhir/sid/cvx",
        "ICD-10" | "ICD10" => "http://hl7.org/fhir/sid/icd-10",
        "ICD-10-CM" | "ICD10CM" => "http://hl7.org/fhir/sid/icd-10-cm",
        "ICD-10-PCS" | "ICD10PCS" => "http://www.icd10data.com/icd10pcs",
        "ICD-9-D" | "ICD9D" | "ICD-9-CM-D" | "ICD9CMD" => {
            "http://hl7.org/fhir/sid/icd-9-cm/diagnosis"
        }
        "ICD-9-P" | "ICD9P" | "ICD-9-CM-P" | "ICD9CMP" => {
            "http://hl7.org/fhir/sid/icd-9-cm/procedure"
        }
        "OBS-CAT" | "OBSCAT" => "http://hl7.org/fhir/observation-category",
        "V3-ROLE-CODE" => "http://hl7.org/fhir/v3/RoleCode",
        "V3-RACE" => "http://hl7.org/fhir/v3/Race",
        "V3-ETHNICITY" => "http://hl7.org/fhir/v3/Ethnicity",
        _ => return None,
    };
    Some(uri)
}

pub fn coding(value: &SourceValue) -> Result<Value> {
    Ok(Coding::parse(&primitives::text(value))?.to_json())
}

pub fn codeable_concept(value: &SourceValue) -> Result<Value> {
    let coding = Coding::parse(&primitives::text(value))?;
    let mut concept = Map::new();
    if coding.code.is_some() {
        concept.insert("coding".to_string(), json!([coding.to_json()]));
    }
    if let Some(display) = &coding.display {
        concept.insert("text".to_string(), json!(display));
    }
    Ok(Value::Object(concept))
}

pub fn annotation(value: &SourceValue) -> Value {
    let mut annotation = Map::new();
    match value {
        SourceValue::Map(fields) => {
            if let Some(author) = fields.get("author").filter(|v| !v.is_null()) {
                annotation.insert("authorString".to_string(), primitives::string(author));
            }
            if let Some(time) = fields.get("time").filter(|v| !v.is_null()) {
                annotation.insert("time".to_string(), primitives::date_time(time));
            }
            let text = fields
                .get("text")
                .filter(|v| !v.is_null())
                .map(primitives::string)
                .unwrap_or_else(|| json!(""));
            annotation.insert("text".to_string(), text);
        }
        _ => {
            annotation.insert("text".to_string(), json!(""));
        }
    }
    Value::Object(annotation)
}

/// Splits a full name on whitespace: the last token is the family name, the
/// rest are given names. A single token yields no family and an empty `given`.
/// The legacy generation repeats `family`.
pub fn human_name(value: &SourceValue, generation: FhirGeneration) -> Value {
    let literal = primitives::text(value);
    let parts: Vec<&str> = literal.split_whitespace().collect();
    let mut name = Map::new();
    match parts.split_last() {
        None => {}
        Some((_, [])) => {
            name.insert("given".to_string(), json!([]));
        }
        Some((family, given)) => {
            name.insert("given".to_string(), json!(given));
            let family = if generation.is_legacy() {
                json!([family])
            } else {
                json!(family)
            };
            name.insert("family".to_string(), family);
        }
    }
    Value::Object(name)
}

pub fn quantity(value: &SourceValue) -> Result<Value> {
    match value {
        SourceValue::Integer(_) | SourceValue::Decimal(_) => {
            Ok(json!({ "value": primitives::decimal(value) }))
        }
        other => {
            let literal = primitives::text(other);
            let captures = QUANTITY_PATTERN.captures(&literal).ok_or_else(|| {
                FhirConversionError::parse_error(format!("Couldn't parse quantity: {literal}"))
            })?;
            let magnitude: f64 = captures[1].parse().map_err(|_| {
                FhirConversionError::parse_error(format!("Couldn't parse quantity: {literal}"))
            })?;

            let mut quantity = Map::new();
            quantity.insert("value".to_string(), number_value(magnitude));
            if let Some(unit) = captures.get(2).map(|m| m.as_str()).filter(|u| !u.is_empty()) {
                quantity.insert("unit".to_string(), json!(unit));
            }
            Ok(Value::Object(quantity))
        }
    }
}

/// `Null` for blank text.
pub fn period(value: &SourceValue) -> Value {
    let mut period = Map::new();
    match value {
        SourceValue::Text(literal) if literal.trim().is_empty() => return Value::Null,
        SourceValue::Text(literal) => {
            let mut bounds = PERIOD_SEPARATOR.split(literal);
            if let Some(start) = bounds.next() {
                period.insert("start".to_string(), json!(start));
            }
            if let Some(end) = bounds.next().filter(|end| !end.is_empty()) {
                period.insert("end".to_string(), json!(end));
            }
        }
        other => {
            period.insert("start".to_string(), primitives::date_time(other));
        }
    }
    Value::Object(period)
}
