//! RDF export of register entities.
//!
//! Entities are projected onto a [`Graph`] through configurable
//! [`EntityMapping`]s and written as Turtle and RDF/XML.

mod graph;
mod mapping;
mod project;
mod serialize;

use std::path::{Path, PathBuf};

pub use graph::{escape_iri, Graph, Term, Triple};
pub use mapping::{
    default_prefixes, EntityMapping, FieldMapping, NameMapping, CRM, FOAF, GND, OWL,
    OWL_SAME_AS, PD_PERIODICAL, PD_PERSON, PD_PUBLICATION, RDF, RDF_TYPE, VIAF, WIKIDATA,
};
pub use project::RdfProjector;
pub use serialize::{to_rdf_xml, to_turtle};

use crate::beacon::write_atomic;
use crate::error::Result;

/// Write `graph` as `{stem}.ttl` and `{stem}.rdf` under `output_dir`.
///
/// Returns the Turtle and RDF/XML paths.
pub fn write_graph(graph: &Graph, output_dir: &Path, stem: &str) -> Result<(PathBuf, PathBuf)> {
    let turtle_path = output_dir.join(format!("{stem}.ttl"));
    let xml_path = output_dir.join(format!("{stem}.rdf"));

    // Both serializations succeed before either file is written
    let turtle = to_turtle(graph);
    let rdf_xml = to_rdf_xml(graph)?;
    write_atomic(&turtle_path, &turtle)?;
    write_atomic(&xml_path, &rdf_xml)?;

    tracing::info!(
        triples = graph.len(),
        turtle = %turtle_path.display(),
        rdf_xml = %xml_path.display(),
        "RDF written"
    );
    Ok((turtle_path, xml_path))
}
