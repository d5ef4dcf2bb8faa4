use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the contacts module (`modules.contacts` in the app config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactsConfig {
    /// Retrieval endpoint (GET).
    #[serde(default = "default_list_url")]
    pub list_url: String,
    /// Upload endpoint (multipart POST); `?format=<ext>` is appended per request.
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Extra attempts for retrieval on transient failures. Uploads are never retried.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Picture sent when the user did not pick one; built-in PNG when unset.
    #[serde(default)]
    pub placeholder_image: Option<String>,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            list_url: default_list_url(),
            upload_url: default_upload_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            placeholder_image: None,
        }
    }
}

impl ContactsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_policy(&self) -> httpkit::RetryPolicy {
        httpkit::RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_backoff_ms))
    }
}

fn default_list_url() -> String {
    "http://contacts.local/api/contacts".to_string()
}

fn default_upload_url() -> String {
    "http://contacts.local/api/contacts/upload".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    200
}
