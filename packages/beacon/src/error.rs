//! Error types for the BEACON/RDF exporter.
//!
//! Only fatal conditions are errors. Recoverable data problems (unknown
//! authority types, unconfigured prefixes, malformed `idno` elements) are
//! logged and skipped where they occur.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the exporter library.
#[derive(Debug, Error)]
pub enum BeaconError {
    /// The input TEI document does not exist or is not a file.
    #[error("No .xml file located at {}", .0.display())]
    InputNotFound(PathBuf),

    /// A required configuration key is missing or inconsistent.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The configuration file could not be read.
    #[error("Failed to read configuration {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected shape.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml_ng::Error),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// A register's selector matched no container element.
    #[error("No container found for register '{register}' (selector {selector})")]
    ContainerNotFound { register: String, selector: String },

    /// A register's selector matched more than one container element.
    #[error("Selector {selector} for register '{register}' matched {count} containers, expected one")]
    AmbiguousContainer {
        register: String,
        selector: String,
        count: usize,
    },

    /// A qualified name used a prefix missing from the namespace map.
    #[error("Unknown namespace prefix '{0}'")]
    UnknownNamespacePrefix(String),

    /// A graph can't be written in the requested RDF syntax.
    #[error("RDF serialization failed: {0}")]
    RdfSerialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BeaconError {
    /// Process exit status used by the binary for this error.
    ///
    /// A missing input document exits with 2 so scripts can tell it apart
    /// from every other failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputNotFound(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for exporter operations.
pub type Result<T> = std::result::Result<T, BeaconError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BeaconError::Configuration("missing key 'authority_files'".to_string());
        assert!(err.to_string().contains("authority_files"));
    }

    #[test]
    fn test_container_not_found_display() {
        let err = BeaconError::ContainerNotFound {
            register: "persons".to_string(),
            selector: "tei:listPerson".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No container found for register 'persons' (selector tei:listPerson)"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BeaconError::InputNotFound(PathBuf::from("x.xml")).exit_code(), 2);
        assert_eq!(BeaconError::Configuration(String::new()).exit_code(), 1);
    }
}
