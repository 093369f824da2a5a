//! API endpoint regions

use std::fmt;
use std::str::FromStr;

use crate::error::OvhError;

/// OVH API regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endpoint {
    /// OVH Europe (default)
    #[default]
    OvhEu,
    /// OVH North America
    OvhCa,
    /// OVH US
    OvhUs,
    /// Kimsufi Europe
    KimsufiEu,
    /// Kimsufi North America
    KimsufiCa,
    /// So you Start Europe
    SoyoustartEu,
    /// So you Start North America
    SoyoustartCa,
    /// RunAbove
    Runabove,
}

impl Endpoint {
    /// Every known region
    pub const ALL: [Endpoint; 8] = [
        Self::OvhEu,
        Self::OvhCa,
        Self::OvhUs,
        Self::KimsufiEu,
        Self::KimsufiCa,
        Self::SoyoustartEu,
        Self::SoyoustartCa,
        Self::Runabove,
    ];

    /// Get the base URL for this region, without a trailing slash
    pub fn url(&self) -> &'static str {
        match self {
            Self::OvhEu => "https://eu.api.ovh.com/1.0",
            Self::OvhCa => "https://ca.api.ovh.com/1.0",
            Self::OvhUs => "https://api.us.ovhcloud.com/1.0",
            Self::KimsufiEu => "https://eu.api.kimsufi.com/1.0",
            Self::KimsufiCa => "https://ca.api.kimsufi.com/1.0",
            Self::SoyoustartEu => "https://eu.api.soyoustart.com/1.0",
            Self::SoyoustartCa => "https://ca.api.soyoustart.com/1.0",
            Self::Runabove => "https://api.runabove.com/1.0",
        }
    }

    /// Get the region name used in configuration (`ovh-eu`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            Self::OvhEu => "ovh-eu",
            Self::OvhCa => "ovh-ca",
            Self::OvhUs => "ovh-us",
            Self::KimsufiEu => "kimsufi-eu",
            Self::KimsufiCa => "kimsufi-ca",
            Self::SoyoustartEu => "soyoustart-eu",
            Self::SoyoustartCa => "soyoustart-ca",
            Self::Runabove => "runabove",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = OvhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|endpoint| endpoint.name() == s)
            .ok_or_else(|| OvhError::InvalidEndpoint(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        assert_eq!(Endpoint::OvhEu.url(), "https://eu.api.ovh.com/1.0");
        assert_eq!(Endpoint::OvhCa.url(), "https://ca.api.ovh.com/1.0");
        assert_eq!(Endpoint::Runabove.url(), "https://api.runabove.com/1.0");
    }

    #[test]
    fn test_names_round_trip() {
        for endpoint in Endpoint::ALL {
            assert_eq!(endpoint.to_string().parse::<Endpoint>().unwrap(), endpoint);
            assert!(!endpoint.url().ends_with('/'));
        }
    }

    #[test]
    fn test_unknown_region() {
        let err = "ovh-mars".parse::<Endpoint>().unwrap_err();
        assert!(matches!(err, OvhError::InvalidEndpoint(name) if name == "ovh-mars"));
    }
}
