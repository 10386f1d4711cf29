//! Turtle and RDF/XML serialization of a [`Graph`].

use std::fmt::Write as _;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::graph::{escape_iri, Graph, Term, Triple};
use super::mapping::{RDF, RDF_TYPE};
use crate::error::{BeaconError, Result};

/// Local parts that can be written as `prefix:local` in Turtle.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TURTLE_LOCAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]([A-Za-z0-9_.-]*[A-Za-z0-9_-])?$").expect("valid regex")
});

/// Turtle prefix names.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TURTLE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]([A-Za-z0-9_.-]*[A-Za-z0-9_-])?)?$").expect("valid regex")
});

/// Local parts and prefixes that are valid XML names.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static XML_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9._-]*$").expect("valid regex"));

/// Longest namespace that `iri` starts with and whose remainder is a valid
/// local part, as `(prefix, namespace, local)`.
fn split_by_prefix<'a>(
    prefixes: &[(&'a str, &'a str)],
    iri: &'a str,
    local_ok: &Regex,
) -> Option<(&'a str, &'a str, &'a str)> {
    prefixes
        .iter()
        .filter_map(|&(prefix, ns)| iri.strip_prefix(ns).map(|local| (prefix, ns, local)))
        .filter(|(_, _, local)| local_ok.is_match(local))
        .max_by_key(|(_, ns, _)| ns.len())
}

/// Bound prefixes that can be declared in Turtle.
fn turtle_prefixes(graph: &Graph) -> Vec<(&str, &str)> {
    graph
        .prefixes()
        .filter(|(prefix, ns)| TURTLE_PREFIX.is_match(prefix) && escape_iri(ns) == *ns)
        .collect()
}

fn turtle_iri(prefixes: &[(&str, &str)], iri: &str) -> String {
    match split_by_prefix(prefixes, iri, &TURTLE_LOCAL) {
        Some((prefix, _, local)) => format!("{prefix}:{local}"),
        None => format!("<{}>", escape_iri(iri)),
    }
}

fn turtle_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `rdf:type` statements first, then the rest in sorted order.
fn ordered_statements<'g>(graph: &'g Graph, subject: &str) -> Vec<&'g Triple> {
    let mut statements: Vec<&Triple> = graph.about(subject).collect();
    statements.sort_by_key(|t| t.predicate != RDF_TYPE);
    statements
}

/// Serialize a graph as Turtle.
///
/// Prefixes whose name or namespace can't be written in Turtle are not
/// declared; IRIs in their namespace are written in full.
#[must_use]
pub fn to_turtle(graph: &Graph) -> String {
    let prefixes = turtle_prefixes(graph);
    let mut out = String::new();
    for (prefix, ns) in &prefixes {
        let _ = writeln!(out, "@prefix {prefix}: <{ns}> .");
    }

    for subject in graph.subjects() {
        out.push('\n');
        out.push_str(&turtle_iri(&prefixes, subject));

        let mut previous: Option<&str> = None;
        for triple in ordered_statements(graph, subject) {
            let object = match &triple.object {
                Term::Iri(iri) => turtle_iri(&prefixes, iri),
                Term::Literal(value) => turtle_literal(value),
            };
            if previous == Some(triple.predicate.as_str()) {
                let _ = write!(out, ",\n        {object}");
            } else {
                if previous.is_some() {
                    out.push_str(" ;");
                }
                let predicate = if triple.predicate == RDF_TYPE {
                    "a".to_string()
                } else {
                    turtle_iri(&prefixes, &triple.predicate)
                };
                let _ = write!(out, "\n    {predicate} {object}");
            }
            previous = Some(triple.predicate.as_str());
        }
        out.push_str(" .\n");
    }
    out
}

fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Split `iri` before the longest suffix that is a valid XML name.
///
/// Returns `None` when no such suffix exists (for example an IRI ending in
/// `/` or `#`), since the predicate then has no RDF/XML element form.
fn split_xml_local(iri: &str) -> Option<(&str, &str)> {
    let tail_start = iri
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .last()
        .map(|(i, _)| i)?;
    let offset = iri[tail_start..].find(|c: char| c.is_ascii_alphabetic() || c == '_')?;
    let (ns, local) = iri.split_at(tail_start + offset);
    (!ns.is_empty()).then_some((ns, local))
}

/// First `nsN` name that is neither bound nor already declared.
fn fresh_prefix(declared: &IndexMap<String, String>, bound: &[(&str, &str)]) -> String {
    let mut n = 1;
    loop {
        let prefix = format!("ns{n}");
        if !declared.contains_key(&prefix) && !bound.iter().any(|(b, _)| *b == prefix) {
            return prefix;
        }
        n += 1;
    }
}

/// Declared namespaces and the qualified element name of each predicate.
fn predicate_names(graph: &Graph) -> Result<(IndexMap<String, String>, IndexMap<String, String>)> {
    // rdf is always bound to the RDF namespace; bound prefixes that aren't
    // usable as XML prefixes are left out
    let bound: Vec<(&str, &str)> = std::iter::once(("rdf", RDF))
        .chain(graph.prefixes().filter(|(prefix, _)| {
            XML_NAME.is_match(prefix) && !prefix.to_ascii_lowercase().starts_with("xml")
        }))
        .filter(|(prefix, ns)| *prefix != "rdf" || *ns == RDF)
        .collect();

    let mut declared: IndexMap<String, String> = IndexMap::new();
    declared.insert("rdf".to_string(), RDF.to_string());
    let mut names: IndexMap<String, String> = IndexMap::new();

    for triple in graph.iter() {
        let predicate = triple.predicate.as_str();
        if names.contains_key(predicate) {
            continue;
        }

        let (prefix, local) = match split_by_prefix(&bound, predicate, &XML_NAME) {
            Some((prefix, ns, local)) => {
                declared
                    .entry(prefix.to_string())
                    .or_insert_with(|| ns.to_string());
                (prefix.to_string(), local)
            }
            None => {
                let (ns, local) = split_xml_local(predicate).ok_or_else(|| {
                    BeaconError::RdfSerialization(format!(
                        "predicate <{predicate}> has no valid XML element name"
                    ))
                })?;
                let existing = declared
                    .iter()
                    .find(|(_, uri)| uri.as_str() == ns)
                    .map(|(prefix, _)| prefix.clone());
                let prefix = match existing {
                    Some(prefix) => prefix,
                    None => {
                        let prefix = fresh_prefix(&declared, &bound);
                        declared.insert(prefix.clone(), ns.to_string());
                        prefix
                    }
                };
                (prefix, local)
            }
        };
        names.insert(predicate.to_string(), format!("{prefix}:{local}"));
    }

    Ok((declared, names))
}

fn xml_iri(iri: &str) -> String {
    xml_escape(&escape_iri(iri))
}

/// Serialize a graph as RDF/XML.
///
/// Fails when a predicate can't be written as an XML element name.
pub fn to_rdf_xml(graph: &Graph) -> Result<String> {
    let (namespaces, names) = predicate_names(graph)?;

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<rdf:RDF");
    for (prefix, ns) in &namespaces {
        let _ = write!(out, "\n   xmlns:{prefix}=\"{}\"", xml_iri(ns));
    }
    out.push_str("\n>\n");

    for subject in graph.subjects() {
        let _ = writeln!(out, "  <rdf:Description rdf:about=\"{}\">", xml_iri(subject));
        for triple in ordered_statements(graph, subject) {
            let Some(element) = names.get(&triple.predicate) else {
                continue;
            };
            match &triple.object {
                Term::Iri(iri) => {
                    let _ = writeln!(out, "    <{element} rdf:resource=\"{}\"/>", xml_iri(iri));
                }
                Term::Literal(value) => {
                    let _ = writeln!(out, "    <{element}>{}</{element}>", xml_escape(value));
                }
            }
        }
        out.push_str("  </rdf:Description>\n");
    }
    out.push_str("</rdf:RDF>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::mapping::{default_prefixes, CRM, FOAF, OWL_SAME_AS, PD_PERSON, VIAF};
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    fn graph() -> Graph {
        let mut graph = Graph::new();
        for (prefix, ns) in default_prefixes() {
            graph.bind(prefix, ns);
        }
        let s = format!("{PD_PERSON}P1");
        graph.add(Triple::new(s.as_str(), RDF_TYPE, Term::Iri(format!("{CRM}E21_Person"))));
        graph.add(Triple::new(
            s.as_str(),
            format!("{FOAF}name"),
            Term::Literal("Fernando \"Pessoa\"".to_string()),
        ));
        graph.add(Triple::new(s.as_str(), OWL_SAME_AS, Term::Iri(format!("{VIAF}29010497"))));
        graph.add(Triple::new(
            s.as_str(),
            OWL_SAME_AS,
            Term::Iri("http://d-nb.info/gnd/118592181".to_string()),
        ));
        graph
    }

    /// `(namespace + local, text or resource)` of every property element.
    fn properties(xml: &str) -> Vec<(String, String)> {
        let doc = Document::parse(xml).unwrap();
        doc.descendants()
            .filter(|n| n.is_element() && n.parent().is_some_and(|p| p.has_tag_name((RDF, "Description"))))
            .map(|n| {
                let predicate = format!("{}{}", n.tag_name().namespace().unwrap_or(""), n.tag_name().name());
                let value = n
                    .attribute((RDF, "resource"))
                    .or_else(|| n.text())
                    .unwrap_or("")
                    .to_string();
                (predicate, value)
            })
            .collect()
    }

    #[test]
    fn test_turtle_subject_block() {
        let turtle = to_turtle(&graph());
        assert!(turtle.starts_with("@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .\n"));
        let block = turtle.split("\n\n").nth(1).unwrap();
        assert_eq!(
            block,
            "pdperson:P1\n    a crm:E21_Person ;\n    owl:sameAs gnd:118592181,\n        viaf:29010497 ;\n    foaf:name \"Fernando \\\"Pessoa\\\"\" .\n"
        );
    }

    #[test]
    fn test_turtle_escapes_full_iris() {
        let mut graph = Graph::new();
        graph.bind("wd", "http://www.wikidata.org/entity/");
        graph.add(Triple::new(
            "http://example.org/a b",
            OWL_SAME_AS,
            Term::Iri("http://www.wikidata.org/entity/Q42 \"x\">".to_string()),
        ));
        let turtle = to_turtle(&graph);
        assert!(turtle.contains("<http://example.org/a%20b>"));
        assert!(turtle.contains(
            "<http://www.w3.org/2002/07/owl#sameAs> <http://www.wikidata.org/entity/Q42%20%22x%22%3E> ."
        ));
    }

    #[test]
    fn test_turtle_skips_unusable_prefixes() {
        let mut graph = Graph::new();
        graph.bind("1bad", "http://example.org/bad/");
        graph.bind("sp", "http://example.org/with space/");
        graph.add(Triple::new(
            "http://example.org/bad/s",
            "http://example.org/bad/p",
            Term::Literal("x".to_string()),
        ));
        let turtle = to_turtle(&graph);
        assert!(!turtle.contains("@prefix"));
        assert!(turtle.contains("<http://example.org/bad/s>\n    <http://example.org/bad/p> \"x\" ."));
    }

    #[test]
    fn test_rdf_xml_description() {
        let xml = to_rdf_xml(&graph()).unwrap();
        assert!(xml.contains("xmlns:owl=\"http://www.w3.org/2002/07/owl#\""));
        assert!(xml.contains("<rdf:Description rdf:about=\"http://www.pessoadigital.pt/index/names#P1\">"));
        assert!(xml.contains("<rdf:type rdf:resource=\"http://www.cidoc-crm.org/cidoc-crm/E21_Person\"/>"));
        assert!(xml.contains("<foaf:name>Fernando &quot;Pessoa&quot;</foaf:name>"));
        assert!(xml.contains("<owl:sameAs rdf:resource=\"http://viaf.org/viaf/29010497\"/>"));
        assert!(Document::parse(&xml).is_ok());
    }

    #[test]
    fn test_rdf_xml_invents_prefix_for_unbound_predicate() {
        let mut graph = Graph::new();
        graph.add(Triple::new(
            "http://example.org/s",
            "http://example.org/vocab#label",
            Term::Literal("x".to_string()),
        ));
        let xml = to_rdf_xml(&graph).unwrap();
        assert!(xml.contains("xmlns:ns1=\"http://example.org/vocab#\""));
        assert!(xml.contains("<ns1:label>x</ns1:label>"));
        assert!(Document::parse(&xml).is_ok());
    }

    #[test]
    fn test_rdf_xml_invented_prefix_avoids_bound_names() {
        let mut graph = Graph::new();
        graph.bind("ns1", "http://a.example/#");
        graph.bind("ns2", "http://c.example/#");
        graph.add(Triple::new(
            "http://example.org/s",
            "http://b.example/x",
            Term::Literal("1".to_string()),
        ));
        graph.add(Triple::new(
            "http://example.org/s",
            "http://a.example/#y",
            Term::Literal("2".to_string()),
        ));

        let xml = to_rdf_xml(&graph).unwrap();
        assert!(xml.contains("xmlns:ns1=\"http://a.example/#\""));
        assert!(xml.contains("xmlns:ns3=\"http://b.example/\""));

        let mut found = properties(&xml);
        found.sort();
        assert_eq!(
            found,
            vec![
                ("http://a.example/#y".to_string(), "2".to_string()),
                ("http://b.example/x".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_rdf_xml_local_name_starting_with_digit() {
        let mut graph = Graph::new();
        graph.bind("vocab", "http://example.org/vocab/");
        graph.add(Triple::new(
            "http://example.org/s",
            "http://example.org/vocab/2ndName",
            Term::Literal("x".to_string()),
        ));

        let xml = to_rdf_xml(&graph).unwrap();
        assert_eq!(
            properties(&xml),
            vec![("http://example.org/vocab/2ndName".to_string(), "x".to_string())]
        );
    }

    #[test]
    fn test_rdf_xml_escapes_resource_iris() {
        let mut graph = Graph::new();
        graph.add(Triple::new(
            "http://example.org/s",
            OWL_SAME_AS,
            Term::Iri("http://www.wikidata.org/entity/Q42 \"x\">".to_string()),
        ));
        let xml = to_rdf_xml(&graph).unwrap();
        assert_eq!(
            properties(&xml),
            vec![(
                OWL_SAME_AS.to_string(),
                "http://www.wikidata.org/entity/Q42%20%22x%22%3E".to_string()
            )]
        );
    }

    #[test]
    fn test_rdf_xml_rejects_predicate_without_local_name() {
        let mut graph = Graph::new();
        graph.add(Triple::new(
            "http://example.org/s",
            "http://example.org/vocab/",
            Term::Literal("x".to_string()),
        ));
        assert!(matches!(
            to_rdf_xml(&graph),
            Err(BeaconError::RdfSerialization(_))
        ));
    }
}
