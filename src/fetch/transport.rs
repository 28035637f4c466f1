//! The single blocking GET the pipeline needs from the outside world.

use crate::error::PumsError;
use log::{info, warn};
use reqwest::blocking::Client;
use std::time::Duration;

/// Executes a GET and returns the body of a successful response.
///
/// Implementations must turn a non-success status into an error; the pipeline
/// never inspects status codes itself.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Vec<u8>, PumsError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<Vec<u8>, PumsError> {
        (**self).get(url)
    }
}

/// [`Transport`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the client. `timeout` bounds each request; `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self, PumsError> {
        let mut builder = Client::builder().gzip(true).timeout(timeout);
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder.build().map_err(PumsError::ClientBuild)?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, PumsError> {
        info!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| PumsError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    PumsError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    PumsError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let body = response
            .bytes()
            .map_err(|e| PumsError::NetworkRequest(url.to_string(), e))?;
        info!("Received {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_options() {
        assert!(HttpTransport::new(None, None).is_ok());
        assert!(HttpTransport::new(Some(Duration::from_secs(5)), Some("acs-pums-tests")).is_ok());
    }

    #[test]
    #[ignore = "requires network access to api.census.gov"]
    fn test_unknown_variable_is_http_error() {
        let transport = HttpTransport::new(Some(Duration::from_secs(30)), None).unwrap();
        let err = transport
            .get("https://api.census.gov/data/2022/acs/acs1/pums?get=NOT_A_VARIABLE")
            .unwrap_err();
        assert!(matches!(err, PumsError::HttpStatus { .. }), "{err:?}");
    }
}
