//! Persistent route log storage.
//!
//! The route log is a plain CSV file, append-only during normal
//! operation: appending writes just the new row at the end, so prior
//! rows survive an interruption mid-write. Every write path goes
//! through [`RouteStore::ensure_initialized`]
//! so a missing file or parent directory is never an error. Fields are
//! written quoted; embedded quotes are not escaped, which matches the
//! tolerant parser in [`crate::route`].

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::route::RoutePoint;

/// Header row of the route log, also used for column lookup when parsing.
pub const HEADER: &str = "latitude,longitude,timestamp,location_type,city,region,country";

/// File-backed store for the route log.
#[derive(Debug, Clone)]
pub struct RouteStore {
    path: PathBuf,
}

impl RouteStore {
    /// Create a store for the log file at `path`. No I/O happens here.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the log file with its header row if it does not exist yet.
    ///
    /// Parent directories are created as needed. Calling this on an
    /// existing file is a no-op, whatever its contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn ensure_initialized(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        if !self.path.exists() {
            fs::write(&self.path, format!("{HEADER}\n"))?;
            tracing::info!(path = %self.path.display(), "created route log");
        }

        Ok(())
    }

    /// Append a single point to the log.
    ///
    /// Initializes the file first if needed. Only the new row is
    /// written, through an append-mode handle, so existing rows are
    /// never rewritten; a missing trailing newline on the last existing
    /// row is repaired by prefixing one to the new row.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn append(&self, point: &RoutePoint) -> Result<()> {
        self.ensure_initialized()?;

        let mut file = fs::OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)?;

        let mut row = String::new();
        if !ends_with_newline(&mut file)? {
            row.push('\n');
        }
        row.push_str(&csv_line(point));
        row.push('\n');
        file.write_all(row.as_bytes())?;

        tracing::debug!(
            latitude = point.latitude,
            longitude = point.longitude,
            "appended route point"
        );
        Ok(())
    }

    /// Read the raw contents of the log, initializing it first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_all(&self) -> Result<String> {
        self.ensure_initialized()?;
        Ok(fs::read_to_string(&self.path)?)
    }

    /// Reset the log to just its header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn clear(&self) -> Result<()> {
        self.ensure_initialized()?;
        fs::write(&self.path, format!("{HEADER}\n"))?;
        tracing::info!(path = %self.path.display(), "cleared route log");
        Ok(())
    }
}

/// Whether the file's last byte is a newline.
///
/// Empty files count as terminated so no separator is prefixed.
fn ends_with_newline(file: &mut fs::File) -> Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Format a point as one quoted CSV row, without the trailing newline.
fn csv_line(point: &RoutePoint) -> String {
    format!(
        "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"",
        point.latitude,
        point.longitude,
        point.timestamp,
        point.location_type,
        point.city,
        point.region,
        point.country
    )
}
