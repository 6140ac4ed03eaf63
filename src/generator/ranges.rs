//! Secondary range allocation for orchestrated workloads.
//!
//! Each cluster gets its own pod and service ranges plus a control-plane
//! block. Ranges are picked deterministically from fixed pools, skipping
//! anything that overlaps the VPC, a subnet, or a range handed out earlier
//! in the same run.

use std::net::Ipv4Addr;

use crate::error::{Error, Result};
use crate::topology::{Ipv4Cidr, NetworkConfig};

/// Pools of /16 blocks for pods and services, tried in order.
const WIDE_POOLS: &[(u8, u8, u8)] = &[
    // (first octet, second octet from, second octet to)
    (10, 96, 255),
    (100, 64, 127),
];

/// Control-plane blocks are /28s carved from 172.16.0.0/16.
const CONTROL_PLANE_BASE: Ipv4Addr = Ipv4Addr::new(172, 16, 0, 0);
const CONTROL_PLANE_SLOTS: u32 = 4096;

/// Ranges assigned to one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterRanges {
    pub pods: Ipv4Cidr,
    pub services: Ipv4Cidr,
    pub control_plane: Ipv4Cidr,
}

/// Hands out non-overlapping cluster ranges for one generation run.
#[derive(Debug, Clone)]
pub struct RangeAllocator {
    taken: Vec<Ipv4Cidr>,
}

impl RangeAllocator {
    /// Seed the allocator with every range the network already uses.
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let mut taken = Vec::new();
        let declared = std::iter::once(("network.vpcCidr".to_string(), network.vpc_cidr.as_str()))
            .chain(std::iter::once((
                "network.primarySubnetCidr".to_string(),
                network.primary_subnet_cidr.as_str(),
            )))
            .chain(
                network
                    .subnet_cidrs
                    .iter()
                    .map(|(region, cidr)| (format!("network.subnetCidrs.{}", region), cidr.as_str())),
            );

        for (path, cidr) in declared {
            let parsed = cidr
                .parse::<Ipv4Cidr>()
                .map_err(|message| Error::configuration(path, message))?;
            taken.push(parsed);
        }

        Ok(Self { taken })
    }

    fn is_free(&self, candidate: &Ipv4Cidr) -> bool {
        !self.taken.iter().any(|t| t.overlaps(candidate))
    }

    fn next_wide(&mut self, workload: &str, purpose: &str) -> Result<Ipv4Cidr> {
        let found = WIDE_POOLS
            .iter()
            .flat_map(|&(first, from, to)| {
                (from..=to).filter_map(move |second| Ipv4Cidr::new(Ipv4Addr::new(first, second, 0, 0), 16))
            })
            .find(|candidate| self.is_free(candidate));

        match found {
            Some(cidr) => {
                self.taken.push(cidr);
                Ok(cidr)
            }
            None => Err(Error::CidrExhausted {
                workload: workload.to_string(),
                purpose: purpose.to_string(),
            }),
        }
    }

    fn next_control_plane(&mut self, workload: &str) -> Result<Ipv4Cidr> {
        let base = u32::from(CONTROL_PLANE_BASE);
        let found = (0..CONTROL_PLANE_SLOTS)
            .filter_map(|slot| Ipv4Cidr::new(Ipv4Addr::from(base + slot * 16), 28))
            .find(|candidate| self.is_free(candidate));

        match found {
            Some(cidr) => {
                self.taken.push(cidr);
                Ok(cidr)
            }
            None => Err(Error::CidrExhausted {
                workload: workload.to_string(),
                purpose: "control plane".to_string(),
            }),
        }
    }

    /// Allocate pod, service and control-plane ranges for a cluster.
    pub fn allocate(&mut self, workload: &str) -> Result<ClusterRanges> {
        let pods = self.next_wide(workload, "pods")?;
        let services = self.next_wide(workload, "services")?;
        let control_plane = self.next_control_plane(workload)?;
        Ok(ClusterRanges {
            pods,
            services,
            control_plane,
        })
    }
}
