//! Retrieving patients and drugs strings from somewhere else.
//!
//! A [`DataSource`] hands back the raw text for an endpoint, or `None` if it
//! could not. Failures are logged by the source and never propagated, so a
//! session treats them the same as missing data.

use crate::log::debug;
use rustc_hash::FxHashMap as HashMap;

pub trait DataSource {
    fn fetch(&self, endpoint: &str) -> Option<String>;
}

/// Serves fixed strings per endpoint.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    data: HashMap<String, String>,
}

impl StaticSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, endpoint: &str, body: &str) -> Self {
        self.data.insert(endpoint.to_string(), body.to_string());
        self
    }
}

impl DataSource for StaticSource {
    fn fetch(&self, endpoint: &str) -> Option<String> {
        let body = self.data.get(endpoint).cloned();
        if body.is_none() {
            debug!("no data for endpoint {endpoint:?}");
        }
        body
    }
}

#[cfg(feature = "fetch")]
pub use remote::HttpSource;

#[cfg(feature = "fetch")]
mod remote {
    use super::DataSource;
    use crate::error::QuarantineError;
    use crate::log::{debug, error};
    use reqwest::blocking::Client;
    use std::time::Duration;

    /// GETs `base_url + endpoint` and returns the response body.
    #[derive(Clone, Debug)]
    pub struct HttpSource {
        base_url: String,
        client: Client,
    }

    impl HttpSource {
        /// # Errors
        ///
        /// Returns an error if the HTTP client cannot be built.
        pub fn new(base_url: &str, timeout: Duration) -> Result<Self, QuarantineError> {
            let client = Client::builder().timeout(timeout).build()?;
            Ok(HttpSource {
                base_url: base_url.to_string(),
                client,
            })
        }

        #[must_use]
        pub fn url(&self, endpoint: &str) -> String {
            format!("{}{}", self.base_url, endpoint)
        }

        fn get(&self, url: &str) -> Result<String, QuarantineError> {
            let response = self.client.get(url).send()?.error_for_status()?;
            Ok(response.text()?)
        }
    }

    impl DataSource for HttpSource {
        fn fetch(&self, endpoint: &str) -> Option<String> {
            let url = self.url(endpoint);
            debug!("fetching {url}");
            match self.get(&url) {
                Ok(body) => Some(body),
                Err(e) => {
                    error!("failed to fetch {url}: {e}");
                    None
                }
            }
        }
    }
}
