use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FhirConversionError, Result};

static DSTU2_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^1\.0\.\d$").expect("valid DSTU2 version pattern")
});
static STU3_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^3\.0\.\d$").expect("valid STU3 version pattern")
});

/// Schema generation a document is converted against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FhirGeneration {
    /// Legacy generation (FHIR 1.0.x).
    #[serde(rename = "dstu2")]
    Dstu2,
    /// Current generation (FHIR 3.0.x).
    #[serde(rename = "stu3")]
    Stu3,
}

impl FhirGeneration {
    /// Normalizes a numeric FHIR version (`3.0.1`) or a generation tag
    /// (`stu3`) to a generation.
    pub fn from_version(version: &str) -> Result<Self> {
        if DSTU2_VERSION.is_match(version) || version.eq_ignore_ascii_case("dstu2") {
            Ok(FhirGeneration::Dstu2)
        } else if STU3_VERSION.is_match(version) || version.eq_ignore_ascii_case("stu3") {
            Ok(FhirGeneration::Stu3)
        } else {
            Err(FhirConversionError::unsupported_version(version))
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            FhirGeneration::Dstu2 => "dstu2",
            FhirGeneration::Stu3 => "stu3",
        }
    }

    /// Whether `HumanName.family` is repeating in this generation.
    pub fn is_legacy(&self) -> bool {
        matches!(self, FhirGeneration::Dstu2)
    }
}

impl fmt::Display for FhirGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
