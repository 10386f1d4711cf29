//! BEACON header and body formatting.

use chrono::NaiveDateTime;

use crate::config::{Config, MISSING_PREFIX_SENTINEL};
use crate::types::{LinkedPair, MissingAuthoritySet};

/// Value of the `#FORMAT` field.
pub const BEACON_FORMAT: &str = "BEACON";

/// Value of the `#RELATION` field.
pub const BEACON_RELATION: &str = "http://www.w3.org/2002/07/owl#sameAs";

/// `#TIMESTAMP` format, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// First line of every missing-authority log.
pub const MISSING_LOG_TITLE: &str = "items with no associated authority file:";

/// The eight-field BEACON header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    pub format: String,
    pub name: String,
    pub prefix: String,
    pub target: String,
    pub contact: String,
    pub message: String,
    pub relation: String,
    pub timestamp: String,
}

impl HeaderBlock {
    /// `(key, value)` pairs in output order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("FORMAT", self.format.as_str()),
            ("NAME", self.name.as_str()),
            ("PREFIX", self.prefix.as_str()),
            ("TARGET", self.target.as_str()),
            ("CONTACT", self.contact.as_str()),
            ("MESSAGE", self.message.as_str()),
            ("RELATION", self.relation.as_str()),
            ("TIMESTAMP", self.timestamp.as_str()),
        ]
    }

    /// Header lines, `#KEY: value`.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        self.fields()
            .iter()
            .map(|(key, value)| format!("#{key}: {value}"))
            .collect()
    }
}

/// Builds the text records handed to the file writer.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'c> {
    config: &'c Config,
    timestamp: NaiveDateTime,
}

impl<'c> RecordBuilder<'c> {
    /// Create a builder stamping every header with `timestamp`.
    #[must_use]
    pub fn new(config: &'c Config, timestamp: NaiveDateTime) -> Self {
        Self { config, timestamp }
    }

    /// `#TARGET` for a register.
    ///
    /// A configured suffix is appended to the shared header target; otherwise
    /// the register's own target is used, falling back to the shared one.
    #[must_use]
    pub fn target_for(&self, register_name: &str) -> String {
        let header_target = &self.config.header_data.target;
        let Some(register) = self.config.register_types.get(register_name) else {
            return header_target.clone();
        };
        match (&register.target_suffix, &register.target) {
            (Some(suffix), _) => format!("{header_target}{suffix}"),
            (None, Some(target)) => target.clone(),
            (None, None) => header_target.clone(),
        }
    }

    /// Header block for one `(register, authority)` file.
    #[must_use]
    pub fn build_header(&self, register_name: &str, authority_type: &str) -> HeaderBlock {
        let header = &self.config.header_data;
        let prefix = match self.config.authority_prefix(authority_type) {
            Some(prefix) => prefix.to_string(),
            None => {
                tracing::warn!(
                    authority = authority_type,
                    "No URL prefix configured, writing '{MISSING_PREFIX_SENTINEL}'"
                );
                MISSING_PREFIX_SENTINEL.to_string()
            }
        };

        HeaderBlock {
            format: BEACON_FORMAT.to_string(),
            name: header.name.clone(),
            prefix,
            target: self.target_for(register_name),
            contact: header.contact.clone(),
            message: header.message.clone(),
            relation: BEACON_RELATION.to_string(),
            timestamp: self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Body lines, one `authority_id||local_id` per pair.
    #[must_use]
    pub fn build_body(&self, bucket: &[LinkedPair]) -> Vec<String> {
        bucket.iter().map(LinkedPair::to_beacon_line).collect()
    }

    /// Missing-authority lines: `None`, or one `local_id,` per item.
    #[must_use]
    pub fn build_missing_log(&self, missing: &MissingAuthoritySet) -> Vec<String> {
        if missing.is_empty() {
            vec!["None".to_string()]
        } else {
            missing.iter().map(|id| format!("{id},")).collect()
        }
    }
}

/// Full BEACON file text: header, blank line, body.
#[must_use]
pub fn render_beacon(header: &HeaderBlock, body: &[String]) -> String {
    let mut out = String::new();
    for line in header.to_lines() {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');
    for line in body {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Full missing-authority log text.
#[must_use]
pub fn render_missing_log(lines: &[String]) -> String {
    let mut out = String::from(MISSING_LOG_TITLE);
    out.push('\n');
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
