//! Qualified names built from the configured namespace map.
//!
//! This is the only place where namespace URIs are paired with local names.

use roxmltree::Node;

use crate::config::Namespaces;
use crate::error::{BeaconError, Result};

/// A namespace URI and local name pair used for element and attribute lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    /// Name without a namespace.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// Name in the given namespace.
    pub fn namespaced(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    /// Check whether `node` is an element with this name.
    #[must_use]
    pub fn matches(&self, node: Node<'_, '_>) -> bool {
        node.is_element()
            && node.tag_name().name() == self.local
            && node.tag_name().namespace() == self.namespace.as_deref()
    }

    /// Read the attribute with this name from `node`.
    #[must_use]
    pub fn attribute_of<'a>(&self, node: Node<'a, '_>) -> Option<&'a str> {
        match &self.namespace {
            Some(ns) => node.attribute((ns.as_str(), self.local.as_str())),
            None => node.attribute(self.local.as_str()),
        }
    }
}

/// Build the lookup key for `prefix:local`.
///
/// # Examples
/// ```
/// use tei_beacon::config::{Namespaces, XML_NAMESPACE};
/// use tei_beacon::xml::qualified_name;
///
/// let ns = Namespaces::default();
/// let id = qualified_name(&ns, Some("xml"), "id").unwrap();
/// assert_eq!(id.namespace.as_deref(), Some(XML_NAMESPACE));
/// assert!(qualified_name(&ns, Some("nope"), "id").is_err());
/// ```
pub fn qualified_name(namespaces: &Namespaces, prefix: Option<&str>, local: &str) -> Result<QName> {
    match prefix {
        Some(prefix) => namespaces
            .uri(prefix)
            .map(|uri| QName::namespaced(uri, local))
            .ok_or_else(|| BeaconError::UnknownNamespacePrefix(prefix.to_string())),
        None => Ok(QName::local(local)),
    }
}

fn split_prefix(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Resolve an element name as written in the configuration.
///
/// Unprefixed names fall into the default element namespace (`tei`).
pub fn resolve_element_name(namespaces: &Namespaces, name: &str) -> Result<QName> {
    match split_prefix(name) {
        (None, local) => Ok(match namespaces.default_element_namespace() {
            Some(uri) => QName::namespaced(uri, local),
            None => QName::local(local),
        }),
        (prefix, local) => qualified_name(namespaces, prefix, local),
    }
}

/// Resolve an attribute name as written in the configuration.
///
/// Unprefixed attribute names have no namespace.
pub fn resolve_attribute_name(namespaces: &Namespaces, name: &str) -> Result<QName> {
    let (prefix, local) = split_prefix(name);
    qualified_name(namespaces, prefix, local)
}
