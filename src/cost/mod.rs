//! Monthly cost estimate for a topology.
//!
//! The estimate is a flat-rate lookup keyed by enabled features. It is
//! advisory: when a live pricing endpoint is configured and answers, its
//! figures are used; any failure falls back to the local table.

pub mod pricing;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::topology::{ConnectionType, TopologyConfig};

pub use pricing::{PricingClient, PricingError};

#[cfg(feature = "pricing")]
pub use pricing::HttpPricingClient;

/// Base network infrastructure, per month.
pub const INFRASTRUCTURE_RATE: u64 = 100;
/// Per workload, per month.
pub const WORKLOAD_RATE: u64 = 50;
/// Per multi-cloud provider link, per month.
pub const MULTI_CLOUD_RATE: u64 = 150;
/// Site-to-site data transfer, per month.
pub const DATA_TRANSFER_RATE: u64 = 200;

/// Monthly on-premises connectivity rate by link type.
pub fn on_prem_rate(connection_type: ConnectionType) -> u64 {
    match connection_type {
        ConnectionType::Vpn => 100,
        ConnectionType::Partner => 500,
        ConnectionType::Dedicated => 1000,
    }
}

/// Where the figures came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostSource {
    /// Local rate table
    #[default]
    Estimate,
    /// Live pricing service
    Live,
}

/// Monthly cost per category, in whole US dollars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub infrastructure: u64,
    pub workloads: u64,
    pub on_prem: u64,
    pub multi_cloud: u64,
    pub data_transfer: u64,
    pub total: u64,
    #[serde(default)]
    pub source: CostSource,
}

impl CostBreakdown {
    /// Sum of the categories, or `None` if it does not fit in a `u64`.
    /// Live responses are re-totalled with this.
    pub fn sum(&self) -> Option<u64> {
        self.infrastructure
            .checked_add(self.workloads)?
            .checked_add(self.on_prem)?
            .checked_add(self.multi_cloud)?
            .checked_add(self.data_transfer)
    }

    /// `(label, amount)` per category, total excluded.
    pub fn categories(&self) -> [(&'static str, u64); 5] {
        [
            ("Infrastructure", self.infrastructure),
            ("Workloads", self.workloads),
            ("On-premises connectivity", self.on_prem),
            ("Multi-cloud connectivity", self.multi_cloud),
            ("Data transfer", self.data_transfer),
        ]
    }
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, amount) in self.categories() {
            writeln!(f, "{:<26} ${:>7}", label, amount)?;
        }
        write!(f, "{:<26} ${:>7}", "Total (monthly)", self.total)
    }
}

/// Computes cost breakdowns.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostEstimator;

impl CostEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate from the local rate table.
    pub fn estimate(&self, config: &TopologyConfig) -> CostBreakdown {
        let conn = &config.connectivity;

        let on_prem = if conn.on_prem.enabled {
            on_prem_rate(conn.on_prem.connection_type)
        } else {
            0
        };
        let providers = conn.multi_cloud.active_providers().len() as u64;

        let mut breakdown = CostBreakdown {
            infrastructure: INFRASTRUCTURE_RATE,
            workloads: WORKLOAD_RATE.saturating_mul(config.workloads.len() as u64),
            on_prem,
            multi_cloud: MULTI_CLOUD_RATE.saturating_mul(providers),
            data_transfer: if conn.site_to_site.transfers_data() {
                DATA_TRANSFER_RATE
            } else {
                0
            },
            total: 0,
            source: CostSource::Estimate,
        };
        breakdown.total = breakdown.sum().unwrap_or(u64::MAX);
        debug!(total = breakdown.total, "Estimated cost from rate table");
        breakdown
    }

    /// Ask `client` first; on any failure use the local table.
    pub fn estimate_with(&self, config: &TopologyConfig, client: &dyn PricingClient) -> CostBreakdown {
        let quote = client.quote(config).and_then(|mut breakdown| {
            breakdown.total = breakdown
                .sum()
                .ok_or_else(|| PricingError::Response("total overflows".to_string()))?;
            breakdown.source = CostSource::Live;
            Ok(breakdown)
        });

        match quote {
            Ok(breakdown) => breakdown,
            Err(e) => {
                warn!(error = %e, "Pricing service unavailable, using local estimate");
                self.estimate(config)
            }
        }
    }
}
