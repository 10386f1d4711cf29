//! BEACON link-dump output: record building and file writing.

mod record;
mod writer;

pub use record::{
    render_beacon, render_missing_log, HeaderBlock, RecordBuilder, BEACON_FORMAT,
    BEACON_RELATION, MISSING_LOG_TITLE, TIMESTAMP_FORMAT,
};
pub use writer::{
    beacon_file_name, missing_log_file_name, sanitize_file_component, write_atomic, BeaconWriter,
};
