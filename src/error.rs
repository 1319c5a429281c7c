use thiserror::Error;

#[derive(Error, Debug)]
pub enum FhirConversionError {
    #[error("Unsupported version of FHIR: {version}")]
    UnsupportedVersion { version: String },

    #[error("Each data object must specify its \"resourceType\"")]
    MissingResourceType,

    #[error("Unsupported resourceType: {resource_type}")]
    UnsupportedResourceType { resource_type: String },

    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Cannot set {path} because its max is 0")]
    UnsupportedCardinality { path: String },

    #[error("{path} does not allow multiple values")]
    CardinalityViolation { path: String },

    #[error("Unsupported type: {type_code}")]
    UnsupportedType { type_code: String },

    #[error("Parsing error: {message}")]
    Parse { message: String },

    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FhirConversionError {
    pub fn unsupported_version(version: impl Into<String>) -> Self {
        Self::UnsupportedVersion {
            version: version.into(),
        }
    }

    pub fn unsupported_resource_type(resource_type: impl Into<String>) -> Self {
        Self::UnsupportedResourceType {
            resource_type: resource_type.into(),
        }
    }

    pub fn path_not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    pub fn unsupported_type(type_code: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_code: type_code.into(),
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FhirConversionError>;
