//! Records produced by the internet-facing checks

use serde::{Deserialize, Serialize};

/// Public address as seen by an echo service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIpInfo {
    pub ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl GeoLocation {
    /// `City, Region, Country` from whichever parts are known
    pub fn place(&self) -> String {
        [&self.city, &self.region, &self.country]
            .iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of the startup reachability check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    pub internet_available: bool,
    pub dns_working: bool,
    pub http_working: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_skips_missing_parts() {
        let geo = GeoLocation {
            city: Some("Lisbon".to_string()),
            region: None,
            country: Some("Portugal".to_string()),
            ..GeoLocation::default()
        };
        assert_eq!(geo.place(), "Lisbon, Portugal");
        assert_eq!(GeoLocation::default().place(), "");
    }
}
