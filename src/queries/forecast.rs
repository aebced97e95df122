//! Three-scenario cost forecasts from `/v1/vendors-forecast`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{ForecastData, Vendor};

// ---------------------------------------------------------------------------
// ForecastQuery
// ---------------------------------------------------------------------------

/// Query interface for a vendor's forecast (best case, trend, worst case).
pub struct ForecastQuery<'a> {
    conn: &'a Connection,
}

impl<'a> ForecastQuery<'a> {
    /// Create a new `ForecastQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Forecast for `vendor` under the connection's default identifier.
    pub fn get(&self, vendor: Vendor) -> Result<ForecastData> {
        self.get_for(vendor, self.conn.identifier())
    }

    pub fn get_for(&self, vendor: Vendor, identifier: &str) -> Result<ForecastData> {
        self.conn.get_json(
            &config::forecast_path(vendor.as_str()),
            &[("identifier", identifier)],
        )
    }

    /// The forecast rendered as CSV by the server.
    pub fn csv(&self, vendor: Vendor) -> Result<String> {
        self.conn.get_text(
            &config::forecast_path(vendor.as_str()),
            &[("identifier", self.conn.identifier()), ("format", "csv")],
        )
    }

    /// Download the CSV forecast into `dir` (or the platform download
    /// directory) as `<vendor>-forecast.csv`.
    ///
    /// Writes to a temp file first and renames on success, so an
    /// interrupted download never leaves a partial file behind.
    pub fn download_csv(&self, vendor: Vendor, dir: Option<&Path>) -> Result<PathBuf> {
        let dir = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(config::default_export_dir);
        fs::create_dir_all(&dir)?;

        let dest = dir.join(format!("{}-forecast.csv", vendor.as_str()));
        let tmp_dest = dest.with_extension("csv.tmp");

        let result = (|| -> Result<()> {
            let body = self.csv(vendor)?;
            fs::write(&tmp_dest, body.as_bytes())?;
            fs::rename(&tmp_dest, &dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }
        result?;

        tracing::info!(vendor = %vendor, path = %dest.display(), "forecast CSV saved");
        Ok(dest)
    }
}
