use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How to reach the browser and which tab to drive.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CdpConfig {
    /// `http://host:port` of the debugger endpoint, or a `ws://` browser URL
    pub debugger_url: String,
    /// Substring the tab URL must contain; first tab when unset
    pub page_url_contains: Option<String>,
    /// Budget for connecting and finding the tab
    pub connect_timeout: Duration,
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            debugger_url: "http://127.0.0.1:9222".to_string(),
            page_url_contains: None,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl CdpConfig {
    pub fn matches_url(&self, url: &str) -> bool {
        match &self.page_url_contains {
            Some(fragment) => url.contains(fragment.as_str()),
            None => true,
        }
    }
}
