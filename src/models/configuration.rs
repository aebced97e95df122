use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ApiConfiguration: GET /v1/configuration/list entry
// ---------------------------------------------------------------------------

/// A stored credential configuration. `type_field` is kept as a string so
/// that vendors this SDK does not know about still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfiguration {
    pub id: i64,
    #[serde(rename = "type")]
    pub type_field: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

// ---------------------------------------------------------------------------
// ApiConfigResponse: POST /v1/configuration/{vendor}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfigResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub type_field: String,
    pub message: String,
}
