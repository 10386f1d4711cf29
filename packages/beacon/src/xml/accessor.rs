//! Read-only view over a parsed TEI document.

use roxmltree::{Document, Node};

use super::qname::{qualified_name, resolve_attribute_name, resolve_element_name, QName};
use super::utils::{element_children, find_children, non_empty_text};
use crate::config::{Namespaces, RegisterConfig, Selector};
use crate::error::{BeaconError, Result};

/// An `idno` child of an item, before any authority policy is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubIdentifier<'a> {
    /// Value of the `type` attribute, if present.
    pub authority_type: Option<&'a str>,
    /// Trimmed, non-empty text content.
    pub value: &'a str,
}

/// Which children of a container count as items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFilter {
    /// Required element name; any element qualifies when `None`.
    pub element: Option<QName>,
    /// Required `@type` value.
    pub item_type: Option<String>,
}

/// Locates registers and items in a parsed document.
///
/// Holds no mutable state, so one accessor can be shared by every register
/// processed in a run.
pub struct DocumentAccessor<'a, 'input> {
    doc: &'a Document<'input>,
    namespaces: &'a Namespaces,
    id_attribute: QName,
    type_attribute: QName,
    idno: QName,
}

impl<'a, 'input> DocumentAccessor<'a, 'input> {
    /// Create an accessor over `doc` using the configured namespace map.
    pub fn new(doc: &'a Document<'input>, namespaces: &'a Namespaces) -> Result<Self> {
        Ok(Self {
            doc,
            namespaces,
            id_attribute: qualified_name(namespaces, Some("xml"), "id")?,
            type_attribute: QName::local("type"),
            idno: resolve_element_name(namespaces, "idno")?,
        })
    }

    /// Resolve a configured element name (bare names are TEI elements).
    pub fn element_name(&self, name: &str) -> Result<QName> {
        resolve_element_name(self.namespaces, name)
    }

    /// Find the single container element for a register.
    ///
    /// Fails with [`BeaconError::ContainerNotFound`] when nothing matches and
    /// with [`BeaconError::AmbiguousContainer`] when more than one element does.
    pub fn locate_container(&self, register: &str, selector: &Selector) -> Result<Node<'a, 'input>> {
        let element = self.element_name(&selector.element)?;
        let attribute = match &selector.attribute {
            Some((name, value)) => Some((resolve_attribute_name(self.namespaces, name)?, value)),
            None => None,
        };

        let matches: Vec<Node<'a, 'input>> = self
            .doc
            .descendants()
            .filter(|n| element.matches(*n))
            .filter(|n| match &attribute {
                Some((name, value)) => name.attribute_of(*n) == Some(value.as_str()),
                None => true,
            })
            .collect();

        match matches.as_slice() {
            [container] => Ok(*container),
            [] => Err(BeaconError::ContainerNotFound {
                register: register.to_string(),
                selector: selector.to_string(),
            }),
            many => Err(BeaconError::AmbiguousContainer {
                register: register.to_string(),
                selector: selector.to_string(),
                count: many.len(),
            }),
        }
    }

    /// Build the item filter for a register.
    pub fn item_filter(&self, register: &RegisterConfig) -> Result<ItemFilter> {
        let element = match &register.item_element {
            Some(name) => Some(self.element_name(name)?),
            None => None,
        };
        Ok(ItemFilter {
            element,
            item_type: register.item_type.clone(),
        })
    }

    /// Item elements directly under `container`, in document order.
    ///
    /// An empty result is not an error; the caller decides how to report it.
    pub fn find_items(&self, container: Node<'a, 'input>, filter: &ItemFilter) -> Vec<Node<'a, 'input>> {
        element_children(container)
            .filter(|n| filter.element.as_ref().is_none_or(|name| name.matches(*n)))
            .filter(|n| match &filter.item_type {
                Some(item_type) => self.type_attribute.attribute_of(*n) == Some(item_type.as_str()),
                None => true,
            })
            .collect()
    }

    /// The item's `xml:id`.
    #[must_use]
    pub fn item_local_id(&self, item: Node<'a, 'input>) -> Option<&'a str> {
        self.id_attribute
            .attribute_of(item)
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Every `idno` child with text, typed or not, in document order.
    ///
    /// `idno` elements without text are dropped here.
    pub fn item_sub_identifiers(&self, item: Node<'a, 'input>) -> Vec<SubIdentifier<'a>> {
        find_children(item, &self.idno)
            .filter_map(|idno| {
                let Some(value) = non_empty_text(idno) else {
                    tracing::debug!(
                        item = self.item_local_id(item).unwrap_or("?"),
                        "Skipping idno without text"
                    );
                    return None;
                };
                let authority_type = self
                    .type_attribute
                    .attribute_of(idno)
                    .map(str::trim)
                    .filter(|t| !t.is_empty());
                Some(SubIdentifier {
                    authority_type,
                    value,
                })
            })
            .collect()
    }

    /// Typed `(authority type, value)` pairs of an item, in document order.
    ///
    /// Sub-identifiers missing either the type or the text are excluded.
    pub fn item_authorities(&self, item: Node<'a, 'input>) -> Vec<(&'a str, &'a str)> {
        self.item_sub_identifiers(item)
            .into_iter()
            .filter_map(|sub| sub.authority_type.map(|t| (t, sub.value)))
            .collect()
    }

    /// Text of the first `element` child, optionally restricted by `@type`.
    ///
    /// Later matching children are ignored.
    pub fn item_child_text(
        &self,
        item: Node<'a, 'input>,
        element: &QName,
        type_filter: Option<&str>,
    ) -> Option<&'a str> {
        find_children(item, element)
            .find(|child| match type_filter {
                Some(t) => self.type_attribute.attribute_of(*child) == Some(t),
                None => true,
            })
            .and_then(non_empty_text)
    }
}
