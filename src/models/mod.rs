pub mod budget;
pub mod configuration;
pub mod forecast;
pub mod metrics;
pub mod vendor;

pub use budget::*;
pub use configuration::*;
pub use forecast::*;
pub use metrics::*;
pub use vendor::*;

use serde::{Deserialize, Serialize};

/// Response body that may or may not be wrapped in `{ "data": ..., "status": ... }`.
///
/// Some endpoints wrap their payload and some return it bare; callers decode
/// into `Envelope<T>` and take [`Envelope::into_inner`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped {
        data: T,
        #[serde(default)]
        status: Option<String>,
    },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data, .. } => data,
            Envelope::Bare(value) => value,
        }
    }
}
