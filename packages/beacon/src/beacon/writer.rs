//! Output file naming and atomic writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::record::{render_beacon, render_missing_log, HeaderBlock};
use crate::config::NOIDS_DIR;
use crate::error::Result;

/// Characters not allowed in output file name components.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid regex"));

/// Make a register or authority key safe for use in a file name.
///
/// # Examples
/// ```
/// use tei_beacon::beacon::sanitize_file_component;
///
/// assert_eq!(sanitize_file_component("persons"), "persons");
/// assert_eq!(sanitize_file_component("list/person name"), "list_person_name");
/// ```
#[must_use]
pub fn sanitize_file_component(key: &str) -> String {
    UNSAFE_FILE_CHARS.replace_all(key, "_").into_owned()
}

/// File name of the BEACON file for a `(register, authority)` pair.
#[must_use]
pub fn beacon_file_name(register: &str, authority: &str) -> String {
    format!(
        "BEACON_{}_{}.txt",
        sanitize_file_component(register),
        sanitize_file_component(authority)
    )
}

/// File name of the missing-authority log for a register.
#[must_use]
pub fn missing_log_file_name(register: &str) -> String {
    format!("{}_noids.txt", sanitize_file_component(register))
}

/// Write `content` to `path` through a temp file in the same directory.
///
/// The temp file is synced and renamed over the target, so a crash never
/// leaves a half-written output file behind.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = dir.join(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}

/// Writes BEACON files and missing-authority logs under one output directory.
#[derive(Debug, Clone)]
pub struct BeaconWriter {
    output_dir: PathBuf,
}

impl BeaconWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Create the output directory and its `noids` sub-directory.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(self.output_dir.join(NOIDS_DIR))?;
        Ok(())
    }

    /// Write one BEACON file and return its path.
    pub fn write_beacon(
        &self,
        register: &str,
        authority: &str,
        header: &HeaderBlock,
        body: &[String],
    ) -> Result<PathBuf> {
        let path = self.output_dir.join(beacon_file_name(register, authority));
        write_atomic(&path, &render_beacon(header, body))?;
        tracing::info!(
            register,
            authority,
            pairs = body.len(),
            path = %path.display(),
            "BEACON file written"
        );
        Ok(path)
    }

    /// Write the missing-authority log of a register and return its path.
    pub fn write_missing_log(&self, register: &str, lines: &[String]) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(NOIDS_DIR)
            .join(missing_log_file_name(register));
        write_atomic(&path, &render_missing_log(lines))?;
        tracing::info!(register, path = %path.display(), "Missing-authority log written");
        Ok(path)
    }
}
