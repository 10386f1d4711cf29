//! Entity kind to ontology mapping.
//!
//! A mapping says how the items of one register become RDF resources: the
//! subject namespace, the class, which child element supplies the name,
//! which authority types become `owl:sameAs` links, and any extra literal
//! fields.

use indexmap::IndexMap;
use serde::Deserialize;

/// RDF namespace URI.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// OWL namespace URI.
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";

/// FOAF namespace URI.
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";

/// CIDOC CRM namespace URI.
pub const CRM: &str = "http://www.cidoc-crm.org/cidoc-crm/";

/// Person index namespace of the edition.
pub const PD_PERSON: &str = "http://www.pessoadigital.pt/index/names#";

/// Periodical index namespace of the edition.
pub const PD_PERIODICAL: &str = "http://www.pessoadigital.pt/index/periodicals#";

/// Publication namespace of the edition.
pub const PD_PUBLICATION: &str = "http://www.pessoadigital.pt/pub/";

/// VIAF namespace URI.
pub const VIAF: &str = "http://viaf.org/viaf/";

/// Wikidata entity namespace URI.
pub const WIKIDATA: &str = "http://www.wikidata.org/entity/";

/// GND namespace URI.
pub const GND: &str = "http://d-nb.info/gnd/";

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// `owl:sameAs`.
pub const OWL_SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";

/// Prefixes bound in serialized graphs unless configured otherwise.
#[must_use]
pub fn default_prefixes() -> IndexMap<String, String> {
    [
        ("rdf", RDF),
        ("pdperson", PD_PERSON),
        ("pdperiodical", PD_PERIODICAL),
        ("pdpublication", PD_PUBLICATION),
        ("crm", CRM),
        ("viaf", VIAF),
        ("wd", WIKIDATA),
        ("gnd", GND),
        ("foaf", FOAF),
        ("owl", OWL),
    ]
    .into_iter()
    .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
    .collect()
}

/// Where an entity's name literal comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameMapping {
    /// Child element holding the name (e.g. `persName`).
    pub element: String,
    /// Required `@type` of that element (e.g. `main`).
    #[serde(default, rename = "type")]
    pub name_type: Option<String>,
    /// Predicate IRI for the name literal.
    pub predicate: String,
}

/// An extra literal property read from a child element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldMapping {
    pub element: String,
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    pub predicate: String,
}

/// Ontology mapping for the items of one register.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityMapping {
    /// Register (key of `register_types`) whose items are projected.
    pub register: String,
    /// Subject IRIs are `base_uri + local_id`.
    pub base_uri: String,
    /// Class IRI for `rdf:type`.
    pub class: String,
    #[serde(default)]
    pub name: Option<NameMapping>,
    /// Authority type to `owl:sameAs` object namespace.
    #[serde(default)]
    pub identifiers: IndexMap<String, String>,
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
}

impl EntityMapping {
    /// The person mapping: `crm:E21_Person`, `foaf:name` from the main
    /// `persName`, VIAF/Wikidata/GND links and `foaf:gender` from `sex`.
    pub fn person(register: impl Into<String>) -> Self {
        Self {
            register: register.into(),
            base_uri: PD_PERSON.to_string(),
            class: format!("{CRM}E21_Person"),
            name: Some(NameMapping {
                element: "persName".to_string(),
                name_type: Some("main".to_string()),
                predicate: format!("{FOAF}name"),
            }),
            identifiers: [("viaf", VIAF), ("wd", WIKIDATA), ("gnd", GND)]
                .into_iter()
                .map(|(authority, uri)| (authority.to_string(), uri.to_string()))
                .collect(),
            fields: vec![FieldMapping {
                element: "sex".to_string(),
                field_type: None,
                predicate: format!("{FOAF}gender"),
            }],
        }
    }
}
