use octofhir_yaml2fhir::*;
use serde_json::{Value, json};
use std::sync::Arc;

fn element(path: &str, min: u32, max: &str, types: &[&str]) -> Value {
    let mut element = json!({ "path": path, "min": min, "max": max });
    if !types.is_empty() {
        let types: Vec<Value> = types.iter().map(|code| json!({ "code": code })).collect();
        element["type"] = Value::Array(types);
    }
    element
}

fn structure_definition(id: &str, kind: &str, elements: Vec<Value>) -> Value {
    json!({
        "resourceType": "StructureDefinition",
        "id": id,
        "url": format!("http://hl7.org/fhir/StructureDefinition/{id}"),
        "name": id,
        "kind": kind,
        "type": id,
        "snapshot": { "element": elements }
    })
}

#[allow(dead_code)]
pub fn patient_definition(legacy: bool) -> Value {
    structure_definition(
        "Patient",
        "resource",
        vec![
            element("Patient", 0, "*", &[]),
            element("Patient.id", 0, "1", &["id"]),
            element("Patient.active", 0, "1", &["boolean"]),
            element("Patient.name", 0, "*", &["HumanName"]),
            element("Patient.gender", 0, "1", &["code"]),
            element("Patient.birthDate", 0, "1", &["date"]),
            element("Patient.deceased[x]", 0, "1", &["boolean", "dateTime"]),
            element("Patient.multipleBirth[x]", 0, "1", &["boolean", "integer"]),
            element("Patient.address", 0, "*", &["Address"]),
            element(
                "Patient.animal",
                0,
                if legacy { "1" } else { "0" },
                &["BackboneElement"],
            ),
            element("Patient.contact", 0, "*", &["BackboneElement"]),
            element("Patient.contact.relationship", 0, "*", &["CodeableConcept"]),
            element("Patient.contact.name", 0, "1", &["HumanName"]),
            element("Patient.contact.gender", 0, "1", &["code"]),
            element("Patient.contact.period", 0, "1", &["Period"]),
        ],
    )
}

#[allow(dead_code)]
pub fn observation_definition() -> Value {
    structure_definition(
        "Observation",
        "resource",
        vec![
            element("Observation", 0, "*", &[]),
            element("Observation.id", 0, "1", &["id"]),
            element("Observation.status", 1, "1", &["code"]),
            element("Observation.category", 0, "*", &["CodeableConcept"]),
            element("Observation.code", 1, "1", &["CodeableConcept"]),
            element("Observation.subject", 0, "1", &["Reference"]),
            element("Observation.effective[x]", 0, "1", &["dateTime", "Period"]),
            element("Observation.issued", 0, "1", &["instant"]),
            element(
                "Observation.value[x]",
                0,
                "1",
                &[
                    "Quantity",
                    "CodeableConcept",
                    "string",
                    "boolean",
                    "Range",
                    "Ratio",
                    "SampledData",
                    "Attachment",
                    "time",
                    "dateTime",
                    "Period",
                ],
            ),
            element("Observation.interpretation", 0, "1", &["CodeableConcept"]),
            element("Observation.comment", 0, "1", &["string"]),
            element("Observation.note", 0, "*", &["Annotation"]),
            element("Observation.component", 0, "*", &["BackboneElement"]),
            element("Observation.component.code", 1, "1", &["CodeableConcept"]),
            element(
                "Observation.component.value[x]",
                0,
                "1",
                &["Quantity", "CodeableConcept", "string"],
            ),
        ],
    )
}

#[allow(dead_code)]
pub fn condition_definition() -> Value {
    structure_definition(
        "Condition",
        "resource",
        vec![
            element("Condition", 0, "*", &[]),
            element("Condition.id", 0, "1", &["id"]),
            element("Condition.clinicalStatus", 0, "1", &["code"]),
            element("Condition.verificationStatus", 0, "1", &["code"]),
            element("Condition.code", 0, "1", &["CodeableConcept"]),
            element("Condition.subject", 1, "1", &["Reference"]),
            element(
                "Condition.onset[x]",
                0,
                "1",
                &["dateTime", "Age", "Period", "Range", "string"],
            ),
            element("Condition.abatement[x]", 0, "1", &["dateTime", "boolean", "string"]),
            element("Condition.note", 0, "*", &["Annotation"]),
        ],
    )
}

#[allow(dead_code)]
pub fn medication_request_definition() -> Value {
    structure_definition(
        "MedicationRequest",
        "resource",
        vec![
            element("MedicationRequest", 0, "*", &[]),
            element("MedicationRequest.status", 0, "1", &["code"]),
            element("MedicationRequest.medication[x]", 1, "1", &["CodeableConcept", "Reference"]),
            element("MedicationRequest.subject", 1, "1", &["Reference"]),
            element("MedicationRequest.authoredOn", 0, "1", &["dateTime"]),
            element("MedicationRequest.dosageInstruction", 0, "*", &["Dosage"]),
        ],
    )
}

#[allow(dead_code)]
pub fn quantity_definition() -> Value {
    structure_definition(
        "Quantity",
        "complex-type",
        vec![
            element("Quantity", 0, "*", &[]),
            element("Quantity.value", 0, "1", &["decimal"]),
            element("Quantity.comparator", 0, "1", &["code"]),
            element("Quantity.unit", 0, "1", &["string"]),
            element("Quantity.system", 0, "1", &["uri"]),
            element("Quantity.code", 0, "1", &["code"]),
        ],
    )
}

#[allow(dead_code)]
pub fn reference_definition() -> Value {
    structure_definition(
        "Reference",
        "complex-type",
        vec![
            element("Reference", 0, "*", &[]),
            element("Reference.reference", 0, "1", &["string"]),
            element("Reference.display", 0, "1", &["string"]),
        ],
    )
}

#[allow(dead_code)]
pub fn dosage_definition() -> Value {
    structure_definition(
        "Dosage",
        "complex-type",
        vec![
            element("Dosage", 0, "*", &[]),
            element("Dosage.sequence", 0, "1", &["integer"]),
            element("Dosage.text", 0, "1", &["string"]),
            element("Dosage.timing", 0, "1", &["Timing"]),
            element("Dosage.asNeeded[x]", 0, "1", &["boolean", "CodeableConcept"]),
            element("Dosage.dose[x]", 0, "1", &["Range", "Quantity"]),
        ],
    )
}

#[allow(dead_code)]
pub fn test_provider() -> InMemorySchemaProvider {
    let mut provider = InMemorySchemaProvider::new();
    let stu3 = [
        patient_definition(false),
        observation_definition(),
        condition_definition(),
        medication_request_definition(),
        quantity_definition(),
        reference_definition(),
        dosage_definition(),
    ];
    for definition in stu3 {
        provider
            .add_json_value(FhirGeneration::Stu3, definition)
            .unwrap();
    }
    provider
        .add_json_value(FhirGeneration::Dstu2, patient_definition(true))
        .unwrap();

    provider
        .add_config_yaml(
            FhirGeneration::Stu3,
            r#"
Observation:
  patient: subject
  aliases:
    value: valueQuantity
    effective: effectiveDateTime
  defaults:
    status: final
Condition:
  patient: subject
  aliases:
    onset: onsetDateTime
  defaults:
    clinicalStatus: active
    verificationStatus: confirmed
MedicationRequest:
  patient: subject
  aliases:
    medication: medicationCodeableConcept
"#,
        )
        .unwrap();
    provider
}

#[allow(dead_code)]
pub fn test_transformer() -> FhirTransformer {
    FhirTransformer::new(Arc::new(test_provider()))
}

#[allow(dead_code)]
pub fn doc(value: Value) -> SourceDocument {
    document_from_json(value)
}
