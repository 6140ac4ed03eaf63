//! Cost estimation tests
//!
//! Rate-table figures for common topologies, live quotes through a stub
//! client, and the HTTP client against a one-shot local server.

mod common;

use std::cell::Cell;

use pretty_assertions::assert_eq;

use common::{full_topology, TopologyBuilder};
use netform::cost::{CostBreakdown, CostEstimator, CostSource, PricingClient, PricingError};
use netform::topology::{CloudProvider, ConnectionType, Redundancy, TopologyConfig, WorkloadKind};

/// Answers with a fixed result and counts calls.
struct StubClient {
    answer: fn() -> Result<CostBreakdown, PricingError>,
    calls: Cell<usize>,
}

impl StubClient {
    fn new(answer: fn() -> Result<CostBreakdown, PricingError>) -> Self {
        Self {
            answer,
            calls: Cell::new(0),
        }
    }
}

impl PricingClient for StubClient {
    fn quote(&self, _config: &TopologyConfig) -> Result<CostBreakdown, PricingError> {
        self.calls.set(self.calls.get() + 1);
        (self.answer)()
    }
}

// ============================================================================
// Rate table
// ============================================================================

#[test]
fn test_minimal_topology_costs_infrastructure_only() {
    let cost = CostEstimator::new().estimate(&TopologyBuilder::new("shop").build());
    assert_eq!(
        cost,
        CostBreakdown {
            infrastructure: 100,
            total: 100,
            ..Default::default()
        }
    );
}

#[test]
fn test_vpn_with_two_workloads() {
    let config = TopologyBuilder::new("shop")
        .on_prem(ConnectionType::Vpn, Redundancy::High)
        .workload("web", WorkloadKind::Compute, "us-central1")
        .workload("api", WorkloadKind::Serverless, "us-central1")
        .build();

    let cost = CostEstimator::new().estimate(&config);
    assert_eq!(cost.on_prem, 100);
    assert_eq!(cost.workloads, 100);
    assert_eq!(cost.total, 300);
}

#[test]
fn test_full_topology_categories() {
    let cost = CostEstimator::new().estimate(&full_topology());
    assert_eq!(cost.infrastructure, 100);
    assert_eq!(cost.workloads, 150);
    assert_eq!(cost.on_prem, 100);
    assert_eq!(cost.multi_cloud, 300);
    assert_eq!(cost.data_transfer, 200);
    assert_eq!(cost.total, 850);
    assert_eq!(Some(cost.total), cost.sum());
}

#[test]
fn test_disabled_features_are_free() {
    let mut config = TopologyBuilder::new("shop")
        .on_prem(ConnectionType::Dedicated, Redundancy::High)
        .provider(CloudProvider::Oracle)
        .site_to_site(true)
        .build();
    config.connectivity.on_prem.enabled = false;
    config.connectivity.multi_cloud.enabled = false;
    config.connectivity.site_to_site.enabled = false;

    assert_eq!(CostEstimator::new().estimate(&config).total, 100);
}

#[test]
fn test_site_to_site_without_transfer() {
    let config = TopologyBuilder::new("shop").site_to_site(false).build();
    assert_eq!(CostEstimator::new().estimate(&config).data_transfer, 0);
}

// ============================================================================
// Live quotes
// ============================================================================

#[test]
fn test_live_quote_is_used_once() {
    let client = StubClient::new(|| {
        Ok(CostBreakdown {
            infrastructure: 120,
            workloads: 80,
            total: 0,
            ..Default::default()
        })
    });

    let cost = CostEstimator::new().estimate_with(&full_topology(), &client);
    assert_eq!(client.calls.get(), 1);
    assert_eq!(cost.source, CostSource::Live);
    assert_eq!(cost.total, 200);
}

#[test]
fn test_every_failure_falls_back() {
    let failures: [fn() -> Result<CostBreakdown, PricingError>; 4] = [
        || Err(PricingError::NotConfigured),
        || Err(PricingError::Timeout(5)),
        || Err(PricingError::Status(500)),
        || Err(PricingError::Response("missing field `total`".into())),
    ];
    let config = full_topology();
    let expected = CostEstimator::new().estimate(&config);

    for answer in failures {
        let client = StubClient::new(answer);
        let cost = CostEstimator::new().estimate_with(&config, &client);
        assert_eq!(client.calls.get(), 1);
        assert_eq!(cost, expected);
    }
}

#[test]
fn test_overflowing_live_quote_falls_back() {
    let client = StubClient::new(|| {
        Ok(CostBreakdown {
            infrastructure: u64::MAX,
            workloads: 1,
            ..Default::default()
        })
    });
    let config = full_topology();

    let cost = CostEstimator::new().estimate_with(&config, &client);
    assert_eq!(client.calls.get(), 1);
    assert_eq!(cost, CostEstimator::new().estimate(&config));
    assert_eq!(cost.total, 850);
}

// ============================================================================
// HTTP client
// ============================================================================

#[cfg(feature = "pricing")]
mod http {
    use super::*;
    use pretty_assertions::assert_eq;
    use netform::cost::HttpPricingClient;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one request with `status` and `body`, returning the request body.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/quote", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut request = vec![0; content_length];
            reader.read_exact(&mut request).unwrap();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            reader.get_mut().write_all(response.as_bytes()).unwrap();
            String::from_utf8(request).unwrap()
        });

        (url, handle)
    }

    #[test]
    fn test_http_quote() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"infrastructure":110,"workloads":0,"onPrem":0,"multiCloud":0,"dataTransfer":0,"total":110}"#,
        );
        let client = HttpPricingClient::new(&url, 5).unwrap();
        let config = TopologyBuilder::new("shop").build();

        let cost = CostEstimator::new().estimate_with(&config, &client);
        let request = server.join().unwrap();

        assert_eq!(cost.total, 110);
        assert_eq!(cost.source, CostSource::Live);
        let posted: serde_json::Value = serde_json::from_str(&request).unwrap();
        assert_eq!(posted["identity"]["applicationName"], "shop");
    }

    #[test]
    fn test_http_error_status() {
        let (url, server) = serve_once("503 Service Unavailable", "{}");
        let client = HttpPricingClient::new(&url, 5).unwrap();

        let err = client.quote(&TopologyBuilder::new("shop").build()).unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, PricingError::Status(503)));
    }

    #[test]
    fn test_http_malformed_body() {
        let (url, server) = serve_once("200 OK", r#"{"total":"a lot"}"#);
        let client = HttpPricingClient::new(&url, 5).unwrap();

        let err = client.quote(&TopologyBuilder::new("shop").build()).unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, PricingError::Response(_)));
    }
}
