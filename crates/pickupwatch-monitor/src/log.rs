//! Append-only CSV log of availability transitions.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono_tz::Tz;
use thiserror::Error;

use pickupwatch_core::{AvailabilityState, TransitionEvent};

const HEADER: &str = "timestamp,location_id,location_name,sku,previous_state,new_state\n";

/// Errors raised while writing the transition log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("log write error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only CSV transition log.
///
/// The file is created with a header on first use and only ever appended to
/// afterwards. Each record is one complete open-write-flush-close so an
/// external termination between cycles cannot leave a half-written row
/// behind.
pub struct CsvLog {
    path: PathBuf,
    tz: Tz,
}

impl CsvLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, tz: Tz) -> Self {
        Self {
            path: path.into(),
            tz,
        }
    }

    /// Creates the file with its header if it does not exist yet, including
    /// any missing parent directories. An existing file is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] on filesystem failure.
    pub fn ensure_header(&self) -> Result<(), LogError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&self.path)?;
        file.write_all(HEADER.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Appends one row for `event`. Never truncates or rewrites existing
    /// content.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] on filesystem failure; the caller logs the
    /// loss and continues.
    pub fn append(&self, event: &TransitionEvent) -> Result<(), LogError> {
        self.ensure_header()?;
        let row = self.render_row(event);
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(row.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn render_row(&self, event: &TransitionEvent) -> String {
        let timestamp = event
            .observed_at
            .with_timezone(&self.tz)
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string();
        format!(
            "{},{},{},{},{},{}\n",
            csv_field(&timestamp),
            csv_field(&event.store_number),
            csv_field(&event.store_name),
            csv_field(&event.sku),
            csv_field(&event.previous_state.to_string()),
            csv_field(&AvailabilityState::Available.to_string()),
        )
    }
}

/// Quotes a field when it contains the delimiter, a quote, or a line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
