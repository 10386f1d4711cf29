//! Pivot extracted items into per-authority buckets.

use crate::config::Config;
use crate::types::{AuthorityCollection, AuthorityId, Item, LinkedPair};

/// Remove `prefix` from the front of an authority identifier.
///
/// Values that don't start with the prefix are returned unchanged, as is a
/// value that consists of nothing but the prefix.
///
/// # Examples
/// ```
/// use tei_beacon::group::strip_authority_prefix;
///
/// assert_eq!(strip_authority_prefix("viaf/12345", Some("viaf/")), "12345");
/// assert_eq!(strip_authority_prefix("12345", Some("viaf/")), "12345");
/// assert_eq!(strip_authority_prefix("12345", None), "12345");
/// ```
#[must_use]
pub fn strip_authority_prefix<'v>(value: &'v str, prefix: Option<&str>) -> &'v str {
    match prefix.and_then(|p| value.strip_prefix(p)) {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => value,
    }
}

/// Groups the items of one register by authority type.
#[derive(Debug, Clone, Copy)]
pub struct AuthorityGrouper<'c> {
    config: &'c Config,
}

impl<'c> AuthorityGrouper<'c> {
    #[must_use]
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// Resolve one authority identifier of `item` into a linked pair.
    #[must_use]
    pub fn link(&self, item: &Item, authority: &AuthorityId) -> LinkedPair {
        let prefix = self.config.authority_prefix(&authority.authority_type);
        LinkedPair::new(
            item.local_id.as_str(),
            strip_authority_prefix(&authority.value, prefix),
            authority.authority_type.as_str(),
        )
    }

    /// Build the authority collection for a register.
    ///
    /// Buckets follow the configured authority order; pairs follow item order.
    #[must_use]
    pub fn group(&self, items: &[Item]) -> AuthorityCollection {
        let mut collection = AuthorityCollection::with_authority_order(self.config.authority_types());
        for item in items {
            for authority in &item.authority_ids {
                collection.push(self.link(item, authority));
            }
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        Config::from_yaml_str(
            r#"
file_location: index.xml
header_data: { name: n, target: t, contact: c, message: m }
authority_files:
  viaf: "viaf/"
  gnd: http://d-nb.info/gnd/
  wd: ~
register_types:
  persons: { element: listPerson }
"#,
        )
        .unwrap()
    }

    fn lines(collection: &AuthorityCollection, authority: &str) -> Vec<String> {
        collection
            .get(authority)
            .iter()
            .map(LinkedPair::to_beacon_line)
            .collect()
    }

    #[test]
    fn test_strip_prefix_only_when_present() {
        assert_eq!(strip_authority_prefix("viaf/12345", Some("viaf/")), "12345");
        assert_eq!(strip_authority_prefix("12345", Some("viaf/")), "12345");
        assert_eq!(strip_authority_prefix("viaf/", Some("viaf/")), "viaf/");
    }

    #[test]
    fn test_group_pivots_by_authority() {
        let config = config();
        let items = vec![
            Item::new("A").with_authority("viaf", "viaf/1"),
            Item::new("B"),
            Item::new("C").with_authority("gnd", "http://d-nb.info/gnd/4"),
            Item::new("D")
                .with_authority("gnd", "7")
                .with_authority("viaf", "2")
                .with_authority("wd", "Q1"),
        ];
        let collection = AuthorityGrouper::new(&config).group(&items);

        assert_eq!(lines(&collection, "viaf"), vec!["1||A", "2||D"]);
        assert_eq!(lines(&collection, "gnd"), vec!["4||C", "7||D"]);
        assert_eq!(lines(&collection, "wd"), vec!["Q1||D"]);
        assert_eq!(
            collection.authority_types().collect::<Vec<_>>(),
            vec!["viaf", "gnd", "wd"]
        );
    }

    #[test]
    fn test_group_keeps_duplicates() {
        let config = config();
        let items = vec![
            Item::new("A").with_authority("viaf", "1"),
            Item::new("A").with_authority("viaf", "1"),
        ];
        let collection = AuthorityGrouper::new(&config).group(&items);
        assert_eq!(lines(&collection, "viaf"), vec!["1||A", "1||A"]);
    }

    #[test]
    fn test_group_is_deterministic() {
        let config = config();
        let items = vec![
            Item::new("X").with_authority("wd", "Q5"),
            Item::new("Y").with_authority("viaf", "3"),
        ];
        let grouper = AuthorityGrouper::new(&config);
        assert_eq!(grouper.group(&items), grouper.group(&items));
    }
}
