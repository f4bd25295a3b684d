use crate::constants;
use crate::error::Result;
use serde::de::DeserializeOwned;

/// Shared runtime configuration: one HTTP client, the CORS relay prefix, and
/// whether raw upstream errors should be echoed to stderr.
#[derive(Clone)]
pub struct AppConfig {
    pub client: reqwest::Client,
    pub proxy: String,
    pub log_errors: bool,
}

impl AppConfig {
    pub fn new(log_errors: bool) -> Self {
        let proxy = std::env::var("CITEFETCH_PROXY")
            .unwrap_or_else(|_| constants::DEFAULT_PROXY.to_string());
        Self {
            client: reqwest::Client::new(),
            proxy,
            log_errors,
        }
    }

    /// Prefixes an upstream URL with the CORS relay.
    pub fn proxied(&self, url: &str) -> String {
        format!("{}{}", self.proxy, url)
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        Ok(self.client.get(url).send().await?.text().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        Ok(self.client.get(url).send().await?.json::<T>().await?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(false)
    }
}
