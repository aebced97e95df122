//! Vendor credential configuration via `/v1/configuration`.

use std::collections::BTreeSet;

use crate::config;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{ApiConfigResponse, ApiConfiguration, Envelope, Vendor, VendorCredentials};

// ---------------------------------------------------------------------------
// ConfigurationQuery
// ---------------------------------------------------------------------------

pub struct ConfigurationQuery<'a> {
    conn: &'a Connection,
}

impl<'a> ConfigurationQuery<'a> {
    /// Create a new `ConfigurationQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Every stored credential configuration for the current user.
    pub fn list(&self) -> Result<Vec<ApiConfiguration>> {
        let resp: Envelope<Vec<ApiConfiguration>> =
            self.conn.get_json(&config::configuration_list_path(), &[])?;
        Ok(resp.into_inner())
    }

    /// Vendors with at least one stored configuration. Unknown types are skipped.
    pub fn configured_vendors(&self) -> Result<BTreeSet<Vendor>> {
        Ok(self
            .list()?
            .iter()
            .filter_map(|c| c.type_field.parse::<Vendor>().ok())
            .collect())
    }

    /// Store credentials under the connection's identifier.
    pub fn configure(&self, credentials: &VendorCredentials) -> Result<ApiConfigResponse> {
        self.configure_as(credentials, self.conn.identifier())
    }

    pub fn configure_as(
        &self,
        credentials: &VendorCredentials,
        identifier: &str,
    ) -> Result<ApiConfigResponse> {
        let vendor = credentials.vendor();
        let body = credentials.to_body(identifier);
        let resp = self
            .conn
            .post_json(&config::configuration_path(vendor.as_str()), &body)?;
        tracing::info!(vendor = %vendor, identifier, "vendor credentials stored");
        Ok(resp)
    }
}
