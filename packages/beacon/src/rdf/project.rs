//! Project extracted items onto an RDF graph.
//!
//! Identifiers come from the same [`IdentifierExtractor`] and
//! [`AuthorityGrouper`] used for BEACON output, so both exports agree on
//! which links exist.

use crate::config::{Config, RdfConfig};
use crate::error::{BeaconError, Result};
use crate::extract::IdentifierExtractor;
use crate::group::AuthorityGrouper;
use crate::xml::DocumentAccessor;

use super::graph::{escape_iri, Graph, Term, Triple};
use super::mapping::{EntityMapping, OWL_SAME_AS, RDF_TYPE};

/// Builds a graph from the registers named in the RDF mappings.
#[derive(Debug, Clone)]
pub struct RdfProjector<'c> {
    config: &'c Config,
    rdf: RdfConfig,
}

impl<'c> RdfProjector<'c> {
    #[must_use]
    pub fn new(config: &'c Config) -> Self {
        Self {
            config,
            rdf: config.effective_rdf(),
        }
    }

    /// The RDF settings in effect (configured or default).
    #[must_use]
    pub fn settings(&self) -> &RdfConfig {
        &self.rdf
    }

    /// Project every mapped register into one graph.
    ///
    /// A register whose container can't be located is skipped with a warning.
    pub fn project(&self, accessor: &DocumentAccessor<'_, '_>) -> Result<Graph> {
        let mut graph = Graph::new();
        for (prefix, namespace) in &self.rdf.prefixes {
            graph.bind(prefix.as_str(), namespace.as_str());
        }

        if self.rdf.entities.is_empty() {
            tracing::warn!("No RDF entity mapping configured and no person register found");
        }

        for mapping in &self.rdf.entities {
            match self.project_entity(accessor, mapping, &mut graph) {
                Ok(count) => {
                    tracing::info!(register = %mapping.register, entities = count, "Projected register");
                }
                Err(
                    e @ (BeaconError::ContainerNotFound { .. }
                    | BeaconError::AmbiguousContainer { .. }),
                ) => {
                    tracing::warn!("Skipping RDF for register '{}': {e}", mapping.register);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(graph)
    }

    fn project_entity(
        &self,
        accessor: &DocumentAccessor<'_, '_>,
        mapping: &EntityMapping,
        graph: &mut Graph,
    ) -> Result<usize> {
        let register = self
            .config
            .register_types
            .get(&mapping.register)
            .ok_or_else(|| {
                BeaconError::Configuration(format!(
                    "rdf entity refers to unknown register '{}'",
                    mapping.register
                ))
            })?;

        let extractor = IdentifierExtractor::new(self.config);
        let grouper = AuthorityGrouper::new(self.config);

        let container = accessor.locate_container(&mapping.register, &register.selector())?;
        let filter = accessor.item_filter(register)?;
        let name = match &mapping.name {
            Some(name) => Some((name, accessor.element_name(&name.element)?)),
            None => None,
        };
        let fields = mapping
            .fields
            .iter()
            .map(|field| Ok((field, accessor.element_name(&field.element)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut count = 0;
        for node in accessor.find_items(container, &filter) {
            let Some(item) = extractor.extract(accessor, node) else {
                continue;
            };
            let subject = format!("{}{}", mapping.base_uri, escape_iri(&item.local_id));

            graph.add(Triple::new(
                subject.as_str(),
                RDF_TYPE,
                Term::Iri(mapping.class.clone()),
            ));

            let label = name.as_ref().and_then(|(name, element)| {
                accessor.item_child_text(node, element, name.name_type.as_deref())
            });
            if let (Some((name, _)), Some(label)) = (&name, label) {
                graph.add(Triple::new(
                    subject.as_str(),
                    name.predicate.as_str(),
                    Term::Literal(label.to_string()),
                ));
            }

            for authority in &item.authority_ids {
                let Some(namespace) = mapping.identifiers.get(&authority.authority_type) else {
                    continue;
                };
                let pair = grouper.link(&item, authority);
                let encoded = escape_iri(&pair.authority_id);
                if encoded != pair.authority_id.as_str() {
                    tracing::warn!(
                        item = %item.local_id,
                        authority = %pair.authority_type,
                        value = %pair.authority_id,
                        "Identifier is not a valid IRI segment, percent-encoded"
                    );
                }
                graph.add(Triple::new(
                    subject.as_str(),
                    OWL_SAME_AS,
                    Term::Iri(format!("{namespace}{encoded}")),
                ));
            }

            for (field, element) in &fields {
                if let Some(value) =
                    accessor.item_child_text(node, element, field.field_type.as_deref())
                {
                    graph.add(Triple::new(
                        subject.as_str(),
                        field.predicate.as_str(),
                        Term::Literal(value.to_string()),
                    ));
                }
            }

            tracing::debug!(
                id = %item.local_id,
                name = label.unwrap_or("No Name"),
                "Processed entity"
            );
            count += 1;
        }

        Ok(count)
    }
}
