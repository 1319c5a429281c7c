use serde::{Deserialize, Serialize};
use url::Url;

/// Wildcard suffix marking a choice element, e.g. `Observation.value[x]`.
pub const CHOICE_SUFFIX: &str = "[x]";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructureDefinition {
    #[serde(rename = "resourceType", default = "structure_definition_resource_type")]
    pub resource_type: String,

    pub id: Option<String>,
    pub url: Option<Url>,
    pub version: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,

    #[serde(default)]
    pub kind: String,

    #[serde(rename = "abstract")]
    pub abstract_: Option<bool>,

    #[serde(rename = "type")]
    pub type_name: Option<String>,

    #[serde(rename = "baseDefinition")]
    pub base_definition: Option<String>,

    pub derivation: Option<String>,

    pub snapshot: Option<StructureDefinitionSnapshot>,
}

fn structure_definition_resource_type() -> String {
    "StructureDefinition".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructureDefinitionSnapshot {
    pub element: Vec<ElementDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDefinition {
    pub id: Option<String>,
    pub path: String,
    pub short: Option<String>,
    pub definition: Option<String>,

    pub min: Option<u32>,
    pub max: Option<String>,

    #[serde(rename = "type")]
    pub element_type: Option<Vec<ElementDefinitionType>>,

    #[serde(rename = "contentReference")]
    pub content_reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDefinitionType {
    pub code: String,
    pub profile: Option<serde_json::Value>,

    #[serde(rename = "targetProfile")]
    pub target_profile: Option<serde_json::Value>,
}

impl StructureDefinition {
    /// Name under which this definition is looked up: its `id`, else its `type`.
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.type_name.as_deref())
    }

    pub fn is_resource(&self) -> bool {
        self.kind == "resource"
    }

    /// Ordered snapshot elements, empty when the definition carries no snapshot.
    pub fn elements(&self) -> &[ElementDefinition] {
        self.snapshot
            .as_ref()
            .map(|snapshot| snapshot.element.as_slice())
            .unwrap_or_default()
    }
}

impl ElementDefinition {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: None,
            path: path.into(),
            short: None,
            definition: None,
            min: None,
            max: None,
            element_type: None,
            content_reference: None,
        }
    }

    pub fn with_cardinality(mut self, min: u32, max: impl Into<String>) -> Self {
        self.min = Some(min);
        self.max = Some(max.into());
        self
    }

    pub fn with_types<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.element_type = Some(codes.into_iter().map(ElementDefinitionType::new).collect());
        self
    }

    /// Upper cardinality bound; an element without one is treated as unbounded.
    pub fn max(&self) -> &str {
        self.max.as_deref().unwrap_or("*")
    }

    pub fn types(&self) -> &[ElementDefinitionType] {
        self.element_type.as_deref().unwrap_or_default()
    }

    pub fn is_choice(&self) -> bool {
        self.path.ends_with(CHOICE_SUFFIX)
    }

    /// Concrete field path realised by a choice element for `type_code`:
    /// `value[x]` + `Quantity` gives `valueQuantity`.
    pub fn choice_path(&self, type_code: &str) -> Option<String> {
        let base = self.path.strip_suffix(CHOICE_SUFFIX)?;
        Some(format!("{base}{}", capitalize_first(type_code)))
    }

    /// Whether `path` is this element or lies beneath it.
    pub fn contains_path(&self, path: &str) -> bool {
        path == self.path
            || path
                .strip_prefix(self.path.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    }

    /// Copy of a choice element narrowed to a single declared type.
    pub fn narrowed_to(&self, element_type: &ElementDefinitionType) -> Self {
        let mut narrowed = self.clone();
        narrowed.element_type = Some(vec![element_type.clone()]);
        narrowed
    }
}

impl ElementDefinitionType {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            profile: None,
            target_profile: None,
        }
    }
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
