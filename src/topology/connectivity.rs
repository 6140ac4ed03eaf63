//! Connectivity section: on-premises links, multi-cloud hubs, site-to-site.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three independent connectivity sub-configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectivityConfig {
    /// Link back to an on-premises data centre.
    #[serde(alias = "onPremConnectivity")]
    pub on_prem: OnPremConnectivity,

    /// Hubs towards other cloud providers.
    #[serde(alias = "multiCloudConnectivity")]
    pub multi_cloud: MultiCloudConnectivity,

    /// Site-to-site transfer over Google's backbone.
    #[serde(alias = "siteToSiteConnectivity")]
    pub site_to_site: SiteToSiteConnectivity,
}

/// How the on-premises network is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// Classic Cloud VPN over the internet
    #[default]
    #[serde(alias = "cloud-vpn")]
    Vpn,
    /// Dedicated Interconnect attachment
    #[serde(alias = "dedicated-interconnect")]
    Dedicated,
    /// Partner Interconnect attachment
    #[serde(alias = "partner-interconnect")]
    Partner,
}

impl ConnectionType {
    /// Whether this type is provisioned through an interconnect attachment.
    pub fn is_attachment(&self) -> bool {
        matches!(self, ConnectionType::Dedicated | ConnectionType::Partner)
    }

    /// Lower-case identifier, as accepted in input documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Vpn => "vpn",
            ConnectionType::Dedicated => "dedicated",
            ConnectionType::Partner => "partner",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionType::Vpn => "Cloud VPN",
            ConnectionType::Dedicated => "Dedicated Interconnect",
            ConnectionType::Partner => "Partner Interconnect",
        };
        write!(f, "{}", name)
    }
}

/// Redundancy level for a link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Redundancy {
    /// Links spread across availability domains
    High,
    /// Single availability domain
    #[default]
    Low,
}

impl Redundancy {
    /// Lower-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Redundancy::High => "high",
            Redundancy::Low => "low",
        }
    }
}

/// On-premises connectivity settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OnPremConnectivity {
    pub enabled: bool,

    #[serde(rename = "type", alias = "connectionType")]
    pub connection_type: ConnectionType,

    pub redundancy: Redundancy,

    /// Encrypt attachment traffic (MACsec / IPsec over interconnect).
    #[serde(alias = "macSecEnabled")]
    pub encryption: bool,
}

/// External cloud providers that can be linked through a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
    Oracle,
}

impl CloudProvider {
    /// Lower-case identifier, used as the naming dimension for hubs and spokes.
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
            CloudProvider::Oracle => "oracle",
        }
    }

    /// Upper-case display label.
    pub fn label(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "AWS",
            CloudProvider::Azure => "AZURE",
            CloudProvider::Oracle => "ORACLE",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One external provider to connect to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderLink {
    pub name: CloudProvider,

    /// Provider-side regions, informational only.
    #[serde(default)]
    pub regions: Vec<String>,

    #[serde(default)]
    pub redundancy: Redundancy,
}

/// Multi-cloud connectivity settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MultiCloudConnectivity {
    pub enabled: bool,
    pub providers: Vec<ProviderLink>,
}

impl MultiCloudConnectivity {
    /// Providers that will receive a hub: all of them when enabled, none otherwise.
    pub fn active_providers(&self) -> &[ProviderLink] {
        if self.enabled {
            &self.providers
        } else {
            &[]
        }
    }
}

/// Site-to-site settings. Only affects documentation and cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteToSiteConnectivity {
    pub enabled: bool,

    #[serde(alias = "enableDataTransfer")]
    pub data_transfer: bool,
}

impl SiteToSiteConnectivity {
    /// Data transfer is only billed and documented when the link itself is on.
    pub fn transfers_data(&self) -> bool {
        self.enabled && self.data_transfer
    }
}
