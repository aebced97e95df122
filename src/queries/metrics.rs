//! Historical monthly cost queries against `/v1/vendors-metrics`.

use crate::config;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{MetricsResponse, MonthlyMetric, Vendor};

// ---------------------------------------------------------------------------
// MetricsQuery
// ---------------------------------------------------------------------------

/// Query interface for a vendor's historical monthly costs.
pub struct MetricsQuery<'a> {
    conn: &'a Connection,
}

impl<'a> MetricsQuery<'a> {
    /// Create a new `MetricsQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Monthly costs for `vendor` under the connection's default identifier.
    pub fn get(&self, vendor: Vendor) -> Result<Vec<MonthlyMetric>> {
        self.get_for(vendor, self.conn.identifier())
    }

    /// Monthly costs for `vendor` under a specific credential identifier.
    ///
    /// Rows are returned in chronological order regardless of the order
    /// the server sent them in.
    pub fn get_for(&self, vendor: Vendor, identifier: &str) -> Result<Vec<MonthlyMetric>> {
        let resp: MetricsResponse = self.conn.get_json(
            &config::metrics_path(vendor.as_str()),
            &[("identifier", identifier)],
        )?;
        let mut data = resp.data;
        data.sort_by_key(|m| m.month);
        Ok(data)
    }

    /// Most recent monthly cost, or `None` when there is no history yet.
    pub fn latest(&self, vendor: Vendor) -> Result<Option<MonthlyMetric>> {
        Ok(self.get(vendor)?.pop())
    }
}
