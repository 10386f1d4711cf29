//! In-memory RDF graph with set semantics.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};

/// Characters that may not appear in an IRI reference.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static IRI_FORBIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\x00-\x20<>"{}|^`\\]"#).expect("valid regex"));

/// Percent-encode the characters an IRI may not contain.
///
/// IRIs that are already valid are returned unchanged, so escaping twice is
/// the same as escaping once.
///
/// # Examples
/// ```
/// use tei_beacon::rdf::escape_iri;
///
/// assert_eq!(escape_iri("http://viaf.org/viaf/29010497"), "http://viaf.org/viaf/29010497");
/// assert_eq!(escape_iri("Q42 \"x\">"), "Q42%20%22x%22%3E");
/// ```
#[must_use]
pub fn escape_iri(value: &str) -> Cow<'_, str> {
    IRI_FORBIDDEN.replace_all(value, |caps: &Captures<'_>| {
        let mut encoded = String::new();
        for byte in caps[0].bytes() {
            let _ = write!(encoded, "%{byte:02X}");
        }
        encoded
    })
}

/// Object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    Literal(String),
}

/// A single statement. Subjects and predicates are always IRIs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

/// A set of triples plus the prefixes used when serializing it.
///
/// Adding a triple that is already present does nothing. Iteration is
/// sorted, so serializations are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    prefixes: IndexMap<String, String>,
    triples: BTreeSet<Triple>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a prefix to a namespace URI.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Bound `(prefix, namespace)` pairs in binding order.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// Add a triple; returns `false` if it was already present.
    pub fn add(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Triples about one subject, in sorted order.
    pub fn about<'g, 's>(&'g self, subject: &'s str) -> impl Iterator<Item = &'g Triple> + 's
    where
        'g: 's,
    {
        self.triples.iter().filter(move |t| t.subject == subject)
    }

    /// Distinct subjects, in sorted order.
    #[must_use]
    pub fn subjects(&self) -> Vec<&str> {
        let mut subjects: Vec<&str> = self.triples.iter().map(|t| t.subject.as_str()).collect();
        subjects.dedup();
        subjects
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}
