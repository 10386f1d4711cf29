//! Identifier extraction: turns item elements into [`Item`] records.
//!
//! Authority types are validated against the configured authority files.
//! Identifiers with an unknown type are skipped (the rest of the item is
//! kept). An `idno` without a `type` attribute is attributed to the only
//! configured authority when there is exactly one, and rejected otherwise.

use roxmltree::Node;

use crate::config::{Config, RegisterConfig};
use crate::error::Result;
use crate::types::{Item, RegisterExtraction};
use crate::xml::DocumentAccessor;

/// Extracts items and their authority identifiers.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierExtractor<'c> {
    config: &'c Config,
}

impl<'c> IdentifierExtractor<'c> {
    #[must_use]
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// Build the [`Item`] for one item element.
    ///
    /// Returns `None` when the element has no `xml:id`.
    pub fn extract<'a, 'input>(
        &self,
        accessor: &DocumentAccessor<'a, 'input>,
        node: Node<'a, 'input>,
    ) -> Option<Item> {
        let Some(local_id) = accessor.item_local_id(node) else {
            tracing::warn!(
                element = node.tag_name().name(),
                "Skipping item without xml:id"
            );
            return None;
        };

        let mut item = Item::new(local_id);
        for sub in accessor.item_sub_identifiers(node) {
            let authority_type = match sub.authority_type {
                Some(t) if self.config.is_known_authority(t) => t,
                Some(t) => {
                    tracing::warn!(
                        item = local_id,
                        authority_type = t,
                        "Unknown authority type, identifier skipped"
                    );
                    continue;
                }
                None => match self.config.single_authority() {
                    Some(only) => only,
                    None => {
                        tracing::warn!(
                            item = local_id,
                            value = sub.value,
                            "idno without type attribute rejected: several authorities are configured"
                        );
                        continue;
                    }
                },
            };
            item = item.with_authority(authority_type, sub.value);
        }

        Some(item)
    }

    /// Extract every item of a register.
    ///
    /// Container lookup errors are returned to the caller, which decides
    /// whether to skip the register.
    pub fn extract_register<'a, 'input>(
        &self,
        accessor: &DocumentAccessor<'a, 'input>,
        register_name: &str,
        register: &RegisterConfig,
    ) -> Result<RegisterExtraction> {
        let container = accessor.locate_container(register_name, &register.selector())?;
        let filter = accessor.item_filter(register)?;
        let nodes = accessor.find_items(container, &filter);

        let mut extraction = RegisterExtraction::default();
        if nodes.is_empty() {
            tracing::info!(register = register_name, "No items found");
            return Ok(extraction);
        }

        for node in nodes {
            let Some(item) = self.extract(accessor, node) else {
                continue;
            };
            if !item.has_authorities() {
                extraction.missing.push(item.local_id.clone());
            }
            extraction.items.push(item);
        }

        tracing::info!(
            register = register_name,
            items = extraction.items.len(),
            missing = extraction.missing.len(),
            "Extracted register"
        );
        Ok(extraction)
    }
}
