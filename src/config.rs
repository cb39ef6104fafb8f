//! Configuration types for kaspa-rest-client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client configuration (API address, timeouts, paging behavior)
///
/// Works out of the box with zero configuration against the public explorer
/// API. All fields have serde defaults so partial config files deserialize
/// cleanly.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base address of the explorer REST API (default: "https://api.kaspa.org/")
    ///
    /// A trailing slash is tolerated; request URIs are joined with exactly
    /// one slash either way.
    #[serde(default = "default_api_address")]
    pub api_address: String,

    /// Per-call HTTP timeout in seconds (default: 120)
    ///
    /// Applied freshly to every request and every body read, linked with the
    /// caller's cancellation token.
    #[serde(default = "default_timeout", with = "duration_secs_serde")]
    pub timeout: Duration,

    /// Delay between consecutive page requests in milliseconds (default: 350)
    ///
    /// Bounds the request rate of paginated retrievals. Callers exposing this
    /// to users should enforce a floor of 100 ms.
    #[serde(default = "default_page_delay", with = "duration_millis_serde")]
    pub page_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_address: default_api_address(),
            timeout: default_timeout(),
            page_delay: default_page_delay(),
        }
    }
}

fn default_api_address() -> String {
    "https://api.kaspa.org/".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_page_delay() -> Duration {
    Duration::from_millis(350)
}

// Duration serialization helper (whole seconds)
mod duration_secs_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration serialization helper (milliseconds)
mod duration_millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
