//! Live pricing lookups.

use thiserror::Error;

use super::CostBreakdown;
use crate::topology::TopologyConfig;

/// Failure to obtain a live quote. Never escapes the estimator.
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("No pricing endpoint configured")]
    NotConfigured,

    #[error("Invalid pricing endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    #[error("Pricing request timed out after {0}s")]
    Timeout(u64),

    #[error("Pricing request failed: {0}")]
    Http(String),

    #[error("Pricing service answered HTTP {0}")]
    Status(u16),

    #[error("Malformed pricing response: {0}")]
    Response(String),
}

/// Source of live cost quotes.
#[cfg_attr(test, mockall::automock)]
pub trait PricingClient {
    /// Single attempt; no retries.
    fn quote(&self, config: &TopologyConfig) -> Result<CostBreakdown, PricingError>;
}

/// Client that posts the topology as JSON and reads a breakdown back.
#[cfg(feature = "pricing")]
#[derive(Debug, Clone)]
pub struct HttpPricingClient {
    endpoint: url::Url,
    timeout: std::time::Duration,
}

#[cfg(feature = "pricing")]
impl HttpPricingClient {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, PricingError> {
        let parsed = url::Url::parse(endpoint).map_err(|e| PricingError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(PricingError::InvalidEndpoint {
                    endpoint: endpoint.to_string(),
                    message: format!("unsupported scheme '{}'", other),
                })
            }
        }

        Ok(Self {
            endpoint: parsed,
            timeout: std::time::Duration::from_secs(timeout_secs),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[cfg(feature = "pricing")]
impl PricingClient for HttpPricingClient {
    fn quote(&self, config: &TopologyConfig) -> Result<CostBreakdown, PricingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| PricingError::Http(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!(endpoint = %self.endpoint, "Requesting live pricing");
        let response = client
            .post(self.endpoint.clone())
            .json(config)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    PricingError::Timeout(self.timeout.as_secs())
                } else {
                    PricingError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PricingError::Status(status.as_u16()));
        }

        response
            .json::<CostBreakdown>()
            .map_err(|e| PricingError::Response(e.to_string()))
    }
}
