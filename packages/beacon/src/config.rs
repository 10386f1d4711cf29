//! Configuration types, loading and validation.
//!
//! The configuration is a YAML file. Maps whose order is significant
//! (authority files, register types, namespaces) deserialize into
//! [`IndexMap`] so the order written in the file is the order outputs are
//! generated in.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::beacon::{beacon_file_name, missing_log_file_name};
use crate::error::{BeaconError, Result};
use crate::rdf::{default_prefixes, EntityMapping};

/// TEI namespace URI.
pub const TEI_NAMESPACE: &str = "http://www.tei-c.org/ns/1.0";

/// XML namespace URI (always bound to the `xml` prefix).
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Sub-directory of the output directory holding missing-authority logs.
pub const NOIDS_DIR: &str = "noids";

/// Placeholder written to the `#PREFIX` header when no prefix is configured.
pub const MISSING_PREFIX_SENTINEL: &str = "url-not-given";

/// Default file stem for RDF output.
pub const DEFAULT_RDF_STEM: &str = "output";

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_rdf_stem() -> String {
    DEFAULT_RDF_STEM.to_string()
}

/// Treat the legacy string `"None"` the same as an absent value.
fn none_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| v != "None" && !v.is_empty()))
}

/// Namespace prefix to URI map used for element and attribute lookups.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Namespaces(IndexMap<String, String>);

impl Namespaces {
    /// Create a namespace map from `(prefix, uri)` pairs.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up the URI bound to a prefix.
    ///
    /// The `xml` prefix is always bound, whether or not the map lists it.
    #[must_use]
    pub fn uri(&self, prefix: &str) -> Option<&str> {
        match self.0.get(prefix) {
            Some(uri) => Some(uri.as_str()),
            None if prefix == "xml" => Some(XML_NAMESPACE),
            None => None,
        }
    }

    /// Namespace applied to unprefixed element names.
    ///
    /// This is the `tei` binding when present.
    #[must_use]
    pub fn default_element_namespace(&self) -> Option<&str> {
        self.0.get("tei").map(String::as_str)
    }

    /// Iterate over `(prefix, uri)` pairs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::new([("tei", TEI_NAMESPACE), ("xml", XML_NAMESPACE)])
    }
}

/// Static header fields shared by every BEACON file of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeaderMetadata {
    pub name: String,
    pub target: String,
    pub contact: String,
    pub message: String,
}

/// Location of a register's container element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Element name, optionally prefixed (`listPerson` or `tei:listPerson`).
    pub element: String,
    /// Optional `(attribute name, attribute value)` filter.
    pub attribute: Option<(String, String)>,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.element)?;
        if let Some((name, value)) = &self.attribute {
            write!(f, "[@{name}='{value}']")?;
        }
        Ok(())
    }
}

/// One register / item-type section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterConfig {
    /// Container element name.
    pub element: String,

    /// Container attribute name used to disambiguate containers.
    #[serde(default, deserialize_with = "none_string")]
    pub attribute_type: Option<String>,

    /// Required value for `attribute_type`.
    #[serde(default, deserialize_with = "none_string")]
    pub attribute_value: Option<String>,

    /// Item element name; every element child is an item when absent.
    #[serde(default, deserialize_with = "none_string")]
    pub item_element: Option<String>,

    /// Required `@type` of item elements.
    #[serde(default, deserialize_with = "none_string")]
    pub item_type: Option<String>,

    /// Plain `#TARGET` for this register.
    #[serde(default, deserialize_with = "none_string")]
    pub target: Option<String>,

    /// Suffix appended to the shared header target.
    #[serde(default, deserialize_with = "none_string")]
    pub target_suffix: Option<String>,
}

impl RegisterConfig {
    /// Create a register that selects the first `element` container.
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            attribute_type: None,
            attribute_value: None,
            item_element: None,
            item_type: None,
            target: None,
            target_suffix: None,
        }
    }

    /// Require the container to carry `name="value"`.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute_type = Some(name.into());
        self.attribute_value = Some(value.into());
        self
    }

    /// Only treat `element` children as items.
    #[must_use]
    pub fn with_item_element(mut self, element: impl Into<String>) -> Self {
        self.item_element = Some(element.into());
        self
    }

    /// Only treat items with a matching `@type` as items.
    #[must_use]
    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Append `suffix` to the header target for this register.
    #[must_use]
    pub fn with_target_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.target_suffix = Some(suffix.into());
        self
    }

    /// The container selector for this register.
    #[must_use]
    pub fn selector(&self) -> Selector {
        let attribute = match (&self.attribute_type, &self.attribute_value) {
            (Some(name), Some(value)) => Some((name.clone(), value.clone())),
            _ => None,
        };
        Selector {
            element: self.element.clone(),
            attribute,
        }
    }
}

/// RDF export section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RdfConfig {
    /// File stem for `.ttl` and `.rdf` output.
    #[serde(default = "default_rdf_stem")]
    pub output_stem: String,

    /// Prefixes bound in the serialized graph.
    #[serde(default = "default_prefixes")]
    pub prefixes: IndexMap<String, String>,

    /// Entity kind to ontology mappings.
    #[serde(default)]
    pub entities: Vec<EntityMapping>,
}

impl Default for RdfConfig {
    fn default() -> Self {
        Self {
            output_stem: default_rdf_stem(),
            prefixes: default_prefixes(),
            entities: Vec::new(),
        }
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Path of the TEI document.
    pub file_location: PathBuf,

    /// Directory that receives all output files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub namespaces: Namespaces,

    pub header_data: HeaderMetadata,

    /// Authority name to URL prefix. `null` means no prefix is known.
    pub authority_files: IndexMap<String, Option<String>>,

    pub register_types: IndexMap<String, RegisterConfig>,

    #[serde(default)]
    pub rdf: Option<RdfConfig>,
}

impl Config {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Read and parse a configuration file.
    ///
    /// The result is not validated; call [`Config::validate`] before use.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path).map_err(|source| BeaconError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Check that every key the pipeline relies on is present and consistent.
    pub fn validate(&self) -> Result<()> {
        if self.authority_files.is_empty() {
            return Err(BeaconError::Configuration(
                "'authority_files' must list at least one authority".to_string(),
            ));
        }
        if self.register_types.is_empty() {
            return Err(BeaconError::Configuration(
                "'register_types' must list at least one register".to_string(),
            ));
        }

        for (name, register) in &self.register_types {
            if register.element.trim().is_empty() {
                return Err(BeaconError::Configuration(format!(
                    "register_types.{name}.element is missing"
                )));
            }
            match (&register.attribute_type, &register.attribute_value) {
                (Some(_), None) => {
                    return Err(BeaconError::Configuration(format!(
                        "register_types.{name}.attribute_value is missing"
                    )))
                }
                (None, Some(_)) => {
                    return Err(BeaconError::Configuration(format!(
                        "register_types.{name}.attribute_type is missing"
                    )))
                }
                _ => {}
            }
            crate::xml::resolve_element_name(&self.namespaces, &register.element)?;
            if let Some(item_element) = &register.item_element {
                crate::xml::resolve_element_name(&self.namespaces, item_element)?;
            }
        }

        self.check_output_names()?;

        if let Some(rdf) = &self.rdf {
            for entity in &rdf.entities {
                if !self.register_types.contains_key(&entity.register) {
                    return Err(BeaconError::Configuration(format!(
                        "rdf entity refers to unknown register '{}'",
                        entity.register
                    )));
                }
                if let Some(authority) = entity
                    .identifiers
                    .keys()
                    .find(|authority| !self.is_known_authority(authority))
                {
                    return Err(BeaconError::Configuration(format!(
                        "rdf entity for register '{}' maps identifiers.{authority}, \
                         which is not listed in authority_files",
                        entity.register
                    )));
                }
            }
        }

        Ok(())
    }

    /// Fail when two registers or authorities would write the same file.
    ///
    /// Names are compared case-insensitively.
    fn check_output_names(&self) -> Result<()> {
        let mut beacon_files: IndexMap<String, String> = IndexMap::new();
        let mut missing_logs: IndexMap<String, &str> = IndexMap::new();

        for register in self.register_types.keys() {
            for authority in self.authority_types() {
                let file = beacon_file_name(register, authority);
                let owner = format!("register_types.{register} with authority_files.{authority}");
                if let Some(previous) = beacon_files.insert(file.to_lowercase(), owner.clone()) {
                    return Err(BeaconError::Configuration(format!(
                        "{previous} and {owner} both write {file}"
                    )));
                }
            }

            let log = missing_log_file_name(register);
            if let Some(previous) = missing_logs.insert(log.to_lowercase(), register) {
                return Err(BeaconError::Configuration(format!(
                    "register_types.{previous} and register_types.{register} both write {NOIDS_DIR}/{log}"
                )));
            }
        }
        Ok(())
    }

    /// Fail with [`BeaconError::InputNotFound`] unless the TEI file exists.
    pub fn check_input(&self) -> Result<()> {
        if self.file_location.is_file() {
            Ok(())
        } else {
            Err(BeaconError::InputNotFound(self.file_location.clone()))
        }
    }

    /// Configured authority names, in configuration order.
    pub fn authority_types(&self) -> impl Iterator<Item = &str> {
        self.authority_files.keys().map(String::as_str)
    }

    /// Whether `name` is a configured authority.
    #[must_use]
    pub fn is_known_authority(&self, name: &str) -> bool {
        self.authority_files.contains_key(name)
    }

    /// URL prefix of an authority, if one is configured and non-empty.
    #[must_use]
    pub fn authority_prefix(&self, name: &str) -> Option<&str> {
        self.authority_files
            .get(name)
            .and_then(Option::as_deref)
            .filter(|prefix| !prefix.is_empty())
    }

    /// The authority name when exactly one authority is configured.
    #[must_use]
    pub fn single_authority(&self) -> Option<&str> {
        if self.authority_files.len() == 1 {
            self.authority_types().next()
        } else {
            None
        }
    }

    /// RDF settings, falling back to the person mapping when none are given.
    #[must_use]
    pub fn effective_rdf(&self) -> RdfConfig {
        let mut rdf = self.rdf.clone().unwrap_or_default();
        if rdf.entities.is_empty() {
            if let Some(register) = self.person_register() {
                let mut person = EntityMapping::person(register);
                person
                    .identifiers
                    .retain(|authority, _| self.is_known_authority(authority));
                rdf.entities.push(person);
            }
        }
        rdf
    }

    /// First register whose items are persons.
    fn person_register(&self) -> Option<&str> {
        self.register_types
            .iter()
            .find(|(_, register)| {
                let local = |name: &str| name.rsplit(':').next().unwrap_or(name).to_string();
                register.item_element.as_deref().map(local).as_deref() == Some("person")
                    || local(&register.element) == "listPerson"
            })
            .map(|(name, _)| name.as_str())
    }
}
