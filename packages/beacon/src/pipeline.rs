//! Export pipeline that ties all components together.
//!
//! Each register is processed independently: extraction, grouping, record
//! building and writing. A register whose container can't be located is
//! skipped without affecting the others.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use roxmltree::Document;

use crate::beacon::{BeaconWriter, RecordBuilder};
use crate::config::Config;
use crate::error::{BeaconError, Result};
use crate::extract::IdentifierExtractor;
use crate::group::AuthorityGrouper;
use crate::rdf::{write_graph, RdfProjector};
use crate::types::{AuthorityCollection, RegisterExtraction};
use crate::xml::DocumentAccessor;

/// Which outputs to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    Beacon,
    Rdf,
    All,
}

impl ExportMode {
    #[must_use]
    pub fn includes_beacon(self) -> bool {
        matches!(self, Self::Beacon | Self::All)
    }

    #[must_use]
    pub fn includes_rdf(self) -> bool {
        matches!(self, Self::Rdf | Self::All)
    }
}

/// Outcome of processing one register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterReport {
    pub register: String,
    pub items: usize,
    pub missing: usize,
    /// `(authority, pair count)` for every BEACON file written.
    pub authorities: Vec<(String, usize)>,
    pub files: Vec<PathBuf>,
    /// Why the register was skipped, if it was.
    pub skipped: Option<String>,
}

/// Outcome of a whole export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub registers: Vec<RegisterReport>,
    /// Turtle and RDF/XML paths, when RDF was produced.
    pub rdf_files: Option<(PathBuf, PathBuf)>,
    pub triples: usize,
}

/// Extract and group one register without touching the filesystem.
pub fn process_register(
    config: &Config,
    accessor: &DocumentAccessor<'_, '_>,
    register_name: &str,
) -> Result<(RegisterExtraction, AuthorityCollection)> {
    let register = config.register_types.get(register_name).ok_or_else(|| {
        BeaconError::Configuration(format!("register_types.{register_name} is missing"))
    })?;
    let extraction =
        IdentifierExtractor::new(config).extract_register(accessor, register_name, register)?;
    let collection = AuthorityGrouper::new(config).group(&extraction.items);
    Ok((extraction, collection))
}

/// Write BEACON files and missing-authority logs for every register.
pub fn run_beacon(
    config: &Config,
    accessor: &DocumentAccessor<'_, '_>,
    output_dir: &Path,
    timestamp: NaiveDateTime,
) -> Result<Vec<RegisterReport>> {
    let writer = BeaconWriter::new(output_dir);
    writer.prepare()?;
    let builder = RecordBuilder::new(config, timestamp);

    let mut reports = Vec::with_capacity(config.register_types.len());
    for register_name in config.register_types.keys() {
        let mut report = RegisterReport {
            register: register_name.clone(),
            ..RegisterReport::default()
        };

        let (extraction, collection) = match process_register(config, accessor, register_name) {
            Ok(result) => result,
            Err(
                e @ (BeaconError::ContainerNotFound { .. } | BeaconError::AmbiguousContainer { .. }),
            ) => {
                tracing::warn!("Skipping register '{register_name}': {e}");
                report.skipped = Some(e.to_string());
                reports.push(report);
                continue;
            }
            Err(e) => return Err(e),
        };

        report.items = extraction.items.len();
        report.missing = extraction.missing.len();

        for (authority, bucket) in collection.iter() {
            if bucket.is_empty() {
                tracing::debug!(register = %register_name, authority, "No identifiers, no file written");
                continue;
            }
            let header = builder.build_header(register_name, authority);
            let body = builder.build_body(bucket);
            let path = writer.write_beacon(register_name, authority, &header, &body)?;
            report.authorities.push((authority.to_string(), bucket.len()));
            report.files.push(path);
        }

        let missing_lines = builder.build_missing_log(&extraction.missing);
        report
            .files
            .push(writer.write_missing_log(register_name, &missing_lines)?);

        reports.push(report);
    }

    Ok(reports)
}

/// Project the configured entities and write Turtle and RDF/XML.
///
/// Returns the written paths and the number of triples.
pub fn run_rdf(
    config: &Config,
    accessor: &DocumentAccessor<'_, '_>,
    output_dir: &Path,
) -> Result<((PathBuf, PathBuf), usize)> {
    let projector = RdfProjector::new(config);
    let graph = projector.project(accessor)?;
    let paths = write_graph(&graph, output_dir, &projector.settings().output_stem)?;
    Ok((paths, graph.len()))
}

/// Run a complete export.
///
/// Configuration is validated and the input document is located and parsed
/// before any output directory is created.
pub fn export(
    config: &Config,
    mode: ExportMode,
    output_dir: Option<&Path>,
    timestamp: NaiveDateTime,
) -> Result<ExportReport> {
    config.validate()?;
    config.check_input()?;

    let xml = fs::read_to_string(&config.file_location)?;
    let doc = Document::parse(&xml)?;
    let accessor = DocumentAccessor::new(&doc, &config.namespaces)?;
    let output_dir = output_dir.unwrap_or(&config.output_dir);

    let mut report = ExportReport::default();
    if mode.includes_beacon() {
        report.registers = run_beacon(config, &accessor, output_dir, timestamp)?;
    }
    if mode.includes_rdf() {
        let (paths, triples) = run_rdf(config, &accessor, output_dir)?;
        report.rdf_files = Some(paths);
        report.triples = triples;
    }
    Ok(report)
}
