//! TEI Beacon - Publish authority links from TEI registers.
//!
//! This crate reads a TEI XML document, collects the authority file
//! identifiers (VIAF, GND, Wikidata, ...) attached to each register entry and
//! writes them as BEACON link dumps and as RDF (Turtle and RDF/XML).
//!
//! # Example
//!
//! ```
//! use tei_beacon::group::strip_authority_prefix;
//!
//! assert_eq!(strip_authority_prefix("viaf/1", Some("viaf/")), "1");
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`config`]: YAML configuration and validation
//! - [`error`]: Error types and Result alias
//! - [`types`]: Core data types (Item, LinkedPair, AuthorityCollection, etc.)
//! - [`xml`]: Namespace-aware document access
//! - [`extract`]: Authority identifier extraction per register
//! - [`group`]: Grouping of identifiers by authority file
//! - [`beacon`]: BEACON records and file output
//! - [`rdf`]: RDF graph projection and serialization
//! - [`pipeline`]: Export orchestration
//! - [`cli`]: Command-line interface

pub mod beacon;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod group;
pub mod pipeline;
pub mod rdf;
pub mod types;
pub mod xml;

// Re-export main functions
pub use pipeline::{export, process_register, run_beacon, run_rdf, ExportMode, ExportReport};

// Re-export commonly used items
pub use config::{Config, RegisterConfig};
pub use error::{BeaconError, Result};
pub use types::{AuthorityCollection, AuthorityId, Item, LinkedPair, MissingAuthoritySet};
