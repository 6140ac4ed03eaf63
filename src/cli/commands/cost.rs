//! Cost command

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use super::CommandContext;
use netform::cost::{CostBreakdown, CostEstimator, CostSource};

/// Arguments for the cost command
#[derive(Parser, Debug, Clone)]
pub struct CostArgs {
    /// Topology document (YAML, JSON or TOML)
    pub topology: PathBuf,

    /// Skip the live pricing service even when one is configured
    #[arg(long)]
    pub offline: bool,
}

impl CostArgs {
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let config = ctx.load_topology(&self.topology)?;
        let breakdown = self.breakdown(ctx, &config);

        ctx.output.document(&breakdown)?;

        let rows: Vec<Vec<String>> = breakdown
            .categories()
            .iter()
            .map(|(label, amount)| vec![label.to_string(), format!("${}", amount)])
            .chain(std::iter::once(vec![
                "Total (monthly)".to_string(),
                format!("${}", breakdown.total),
            ]))
            .collect();

        ctx.output
            .section(&format!("Estimated monthly cost for {}", config.application_name()));
        ctx.output.table(&["Category", "USD"], &rows);
        if breakdown.source == CostSource::Estimate {
            ctx.output
                .hint("Figures come from a flat rate table and are not a quote");
        }
        Ok(0)
    }

    #[cfg(feature = "pricing")]
    fn breakdown(
        &self,
        ctx: &CommandContext,
        config: &netform::topology::TopologyConfig,
    ) -> CostBreakdown {
        let estimator = CostEstimator::new();
        let endpoint = match (&ctx.settings.pricing.endpoint, self.offline) {
            (Some(endpoint), false) => endpoint,
            _ => return estimator.estimate(config),
        };

        match netform::cost::HttpPricingClient::new(endpoint, ctx.settings.pricing.timeout_secs) {
            Ok(client) => estimator.estimate_with(config, &client),
            Err(e) => {
                ctx.output.warning(&e.to_string());
                estimator.estimate(config)
            }
        }
    }

    #[cfg(not(feature = "pricing"))]
    fn breakdown(
        &self,
        _ctx: &CommandContext,
        config: &netform::topology::TopologyConfig,
    ) -> CostBreakdown {
        CostEstimator::new().estimate(config)
    }
}
