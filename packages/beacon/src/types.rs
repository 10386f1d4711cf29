//! Core data types for authority extraction.
//!
//! An [`Item`] is one entity of a register. Grouping items by authority
//! produces an [`AuthorityCollection`] of [`LinkedPair`]s; items without any
//! authority identifier end up in a [`MissingAuthoritySet`].

use indexmap::IndexMap;

/// One authority identifier of an item, as found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityId {
    /// Configured authority name (e.g. `viaf`).
    pub authority_type: String,
    /// Raw identifier value, possibly carrying the authority's URL prefix.
    pub value: String,
}

impl AuthorityId {
    pub fn new(authority_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            authority_type: authority_type.into(),
            value: value.into(),
        }
    }
}

/// One entity of a register (a person, a periodical, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The entity's `xml:id`.
    pub local_id: String,

    /// Authority identifiers in document order.
    ///
    /// Repeated identifiers are kept as they appear.
    pub authority_ids: Vec<AuthorityId>,
}

impl Item {
    pub fn new(local_id: impl Into<String>) -> Self {
        Self {
            local_id: local_id.into(),
            authority_ids: Vec::new(),
        }
    }

    /// Add an authority identifier (builder style).
    #[must_use]
    pub fn with_authority(mut self, authority_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.authority_ids.push(AuthorityId::new(authority_type, value));
        self
    }

    /// Whether the item carries at least one authority identifier.
    #[must_use]
    pub fn has_authorities(&self) -> bool {
        !self.authority_ids.is_empty()
    }
}

/// A resolved `(authority id, local id)` correspondence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedPair {
    pub local_id: String,
    /// Authority identifier with the configured prefix stripped.
    pub authority_id: String,
    pub authority_type: String,
}

impl LinkedPair {
    pub fn new(
        local_id: impl Into<String>,
        authority_id: impl Into<String>,
        authority_type: impl Into<String>,
    ) -> Self {
        Self {
            local_id: local_id.into(),
            authority_id: authority_id.into(),
            authority_type: authority_type.into(),
        }
    }

    /// The BEACON body line for this pair.
    ///
    /// # Examples
    /// ```
    /// use tei_beacon::types::LinkedPair;
    ///
    /// let pair = LinkedPair::new("P1", "29010497", "viaf");
    /// assert_eq!(pair.to_beacon_line(), "29010497||P1");
    /// ```
    #[must_use]
    pub fn to_beacon_line(&self) -> String {
        format!("{}||{}", self.authority_id, self.local_id)
    }
}

/// Linked pairs of one register, bucketed by authority type.
///
/// Buckets keep the order in which they were created; pairs within a bucket
/// keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorityCollection {
    buckets: IndexMap<String, Vec<LinkedPair>>,
}

impl AuthorityCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection whose bucket order is fixed up front.
    pub fn with_authority_order<I, S>(authority_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            buckets: authority_types
                .into_iter()
                .map(|t| (t.into(), Vec::new()))
                .collect(),
        }
    }

    /// Append a pair to the bucket of its own authority type.
    pub fn push(&mut self, pair: LinkedPair) {
        self.buckets
            .entry(pair.authority_type.clone())
            .or_default()
            .push(pair);
    }

    /// Pairs for one authority type (empty when unknown).
    #[must_use]
    pub fn get(&self, authority_type: &str) -> &[LinkedPair] {
        self.buckets
            .get(authority_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All buckets in order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[LinkedPair])> {
        self.buckets
            .iter()
            .map(|(t, pairs)| (t.as_str(), pairs.as_slice()))
    }

    /// Buckets that received at least one pair.
    pub fn non_empty(&self) -> impl Iterator<Item = (&str, &[LinkedPair])> {
        self.iter().filter(|(_, pairs)| !pairs.is_empty())
    }

    /// Bucket keys in order.
    pub fn authority_types(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Total number of pairs across buckets.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pair_count() == 0
    }
}

/// Local ids of items without any authority identifier, in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingAuthoritySet(Vec<String>);

impl MissingAuthoritySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, local_id: impl Into<String>) {
        self.0.push(local_id.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything extracted from one register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterExtraction {
    pub items: Vec<Item>,
    pub missing: MissingAuthoritySet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_push_keys_by_pair_type() {
        let mut collection = AuthorityCollection::new();
        collection.push(LinkedPair::new("A", "1", "viaf"));
        collection.push(LinkedPair::new("C", "4", "gnd"));
        collection.push(LinkedPair::new("D", "2", "viaf"));

        let viaf: Vec<_> = collection.get("viaf").iter().map(|p| p.local_id.as_str()).collect();
        assert_eq!(viaf, vec!["A", "D"]);
        assert!(collection
            .iter()
            .all(|(t, pairs)| pairs.iter().all(|p| p.authority_type == t)));
        assert_eq!(collection.pair_count(), 3);
    }

    #[test]
    fn test_collection_first_seen_order() {
        let mut collection = AuthorityCollection::new();
        collection.push(LinkedPair::new("A", "1", "gnd"));
        collection.push(LinkedPair::new("B", "2", "viaf"));
        let order: Vec<_> = collection.authority_types().collect();
        assert_eq!(order, vec!["gnd", "viaf"]);
    }

    #[test]
    fn test_collection_fixed_order() {
        let mut collection = AuthorityCollection::with_authority_order(["viaf", "gnd", "wd"]);
        collection.push(LinkedPair::new("A", "1", "gnd"));
        let order: Vec<_> = collection.authority_types().collect();
        assert_eq!(order, vec!["viaf", "gnd", "wd"]);

        let populated: Vec<_> = collection.non_empty().map(|(t, _)| t).collect();
        assert_eq!(populated, vec!["gnd"]);
        assert!(collection.get("wd").is_empty());
        assert!(collection.get("isni").is_empty());
    }

    #[test]
    fn test_missing_set_order() {
        let mut missing = MissingAuthoritySet::new();
        assert!(missing.is_empty());
        missing.push("B");
        missing.push("E");
        assert_eq!(missing.iter().collect::<Vec<_>>(), vec!["B", "E"]);
        assert_eq!(missing.len(), 2);
    }

    #[test]
    fn test_item_has_authorities() {
        assert!(!Item::new("B").has_authorities());
        assert!(Item::new("A").with_authority("viaf", "1").has_authorities());
    }
}
