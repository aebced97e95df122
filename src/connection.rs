//! Authenticated JSON transport to the cost backend.
//!
//! Every request carries a bearer token from a [`TokenProvider`]. Non-2xx
//! responses become [`CostPlanError::Http`]; requests that never get a
//! response become [`CostPlanError::Connection`].

use crate::error::{CostPlanError, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// TokenProvider
// ---------------------------------------------------------------------------

/// Source of bearer tokens, normally backed by an external identity provider.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Result<String>;
}

/// A fixed, pre-issued token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

impl<F> TokenProvider for F
where
    F: Fn() -> Result<String> + Send + Sync,
{
    fn access_token(&self) -> Result<String> {
        self()
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Blocking HTTP connection bound to one backend and one credential identifier.
pub struct Connection {
    base_url: String,
    identifier: String,
    client: Client,
    tokens: Arc<dyn TokenProvider>,
}

impl Connection {
    /// Create a connection. `base_url` may carry a trailing slash.
    pub fn new(
        base_url: &str,
        identifier: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CostPlanError::InvalidArgument(format!(
                "base URL must start with http:// or https://, got {:?}",
                base_url
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| {
                CostPlanError::InvalidArgument(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self {
            base_url,
            identifier: identifier.to_string(),
            client,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Credential configuration name sent as `?identifier=`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` and decode the JSON body.
    pub fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let resp = self.send(self.client.get(self.url(path)).query(query), "GET", path)?;
        decode(resp)
    }

    /// GET `path` and return the raw body text.
    pub fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let resp = self.send(self.client.get(self.url(path)).query(query), "GET", path)?;
        Ok(resp.text()?)
    }

    /// POST a JSON body to `path` and decode the JSON response.
    pub fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.client.post(self.url(path)).json(body), "POST", path)?;
        decode(resp)
    }

    /// PUT a JSON body to `path` and decode the JSON response.
    pub fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.client.put(self.url(path)).json(body), "PUT", path)?;
        decode(resp)
    }

    /// DELETE `path`, returning whatever JSON the server sent back.
    pub fn delete(&self, path: &str) -> Result<serde_json::Value> {
        let resp = self.send(self.client.delete(self.url(path)), "DELETE", path)?;
        let bytes = resp.bytes()?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn send(&self, req: RequestBuilder, method: &str, path: &str) -> Result<Response> {
        let token = self.tokens.access_token()?;
        tracing::debug!(method, path, "sending request");

        let resp = req.bearer_auth(token).send().map_err(|e| {
            tracing::warn!(method, path, error = %e, "request failed without a response");
            CostPlanError::from(e)
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let reason = status.canonical_reason().map(str::to_string);
        let detail = resp
            .text()
            .ok()
            .and_then(|body| server_message(&body))
            .or(reason);
        tracing::warn!(method, path, status = status.as_u16(), detail = ?detail, "request rejected");
        Err(CostPlanError::from_status(status.as_u16(), detail))
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("base_url", &self.base_url)
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let bytes = resp.bytes()?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Pull `message` or `detail` out of an error body.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "detail", "error"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| match v {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        })
}
