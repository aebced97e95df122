use crate::error::CostPlanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Vendor: closed set of tracked cost providers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Datadog,
    Aws,
}

impl Vendor {
    pub const ALL: [Vendor; 2] = [Vendor::Datadog, Vendor::Aws];

    /// Lowercase key used in URLs and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Datadog => "datadog",
            Vendor::Aws => "aws",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::Datadog => "Datadog",
            Vendor::Aws => "AWS",
        }
    }

    /// The credential-entry form this vendor is configured through.
    pub fn credential_form(&self) -> CredentialForm {
        match self {
            Vendor::Datadog => CredentialForm {
                vendor: *self,
                fields: &[
                    CredentialField {
                        name: "api_key",
                        label: "API Key",
                        secret: true,
                        required: false,
                    },
                    CredentialField {
                        name: "app_key",
                        label: "Application Key",
                        secret: true,
                        required: false,
                    },
                ],
            },
            Vendor::Aws => CredentialForm {
                vendor: *self,
                fields: &[
                    CredentialField {
                        name: "aws_access_key_id",
                        label: "Access Key ID",
                        secret: false,
                        required: true,
                    },
                    CredentialField {
                        name: "aws_secret_access_key",
                        label: "Secret Access Key",
                        secret: true,
                        required: true,
                    },
                ],
            },
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = CostPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "datadog" => Ok(Vendor::Datadog),
            "aws" => Ok(Vendor::Aws),
            other => Err(CostPlanError::InvalidArgument(format!(
                "Invalid vendor: {}",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// CredentialForm: field layout for a vendor's credential component
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialField {
    pub name: &'static str,
    pub label: &'static str,
    pub secret: bool,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialForm {
    pub vendor: Vendor,
    pub fields: &'static [CredentialField],
}

// ---------------------------------------------------------------------------
// VendorCredentials: payload for POST /v1/configuration/{vendor}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorCredentials {
    Datadog {
        api_key: Option<String>,
        app_key: Option<String>,
    },
    Aws {
        access_key_id: String,
        secret_access_key: String,
    },
}

impl VendorCredentials {
    pub fn vendor(&self) -> Vendor {
        match self {
            VendorCredentials::Datadog { .. } => Vendor::Datadog,
            VendorCredentials::Aws { .. } => Vendor::Aws,
        }
    }

    /// Request body for the configuration endpoint, tagged with `identifier`.
    pub fn to_body(&self, identifier: &str) -> serde_json::Value {
        match self {
            VendorCredentials::Datadog { api_key, app_key } => serde_json::json!({
                "api_key": api_key,
                "app_key": app_key,
                "identifier": identifier,
            }),
            VendorCredentials::Aws {
                access_key_id,
                secret_access_key,
            } => serde_json::json!({
                "aws_access_key_id": access_key_id,
                "aws_secret_access_key": secret_access_key,
                "identifier": identifier,
            }),
        }
    }
}
