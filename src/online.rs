//! Internet-facing checks: public IP, geolocation and reachability

use crate::models::{ConnectivityReport, GeoLocation, PublicIpInfo};
use crate::types::{AppError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use trust_dns_resolver::{system_conf, TokioAsyncResolver};

/// Remote services used by [`OnlineChecker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlineEndpoints {
    /// Returns `{"ip": "..."}`
    pub public_ip_url: String,
    /// ip-api style endpoint; an IP may be appended
    pub geolocation_url: String,
    /// Fetched to prove HTTPS reachability
    pub connectivity_url: String,
    /// Resolved through the system resolver; `None` skips the DNS check
    pub dns_probe_host: Option<String>,
}

impl Default for OnlineEndpoints {
    fn default() -> Self {
        Self {
            public_ip_url: "https://api.ipify.org?format=json".to_string(),
            geolocation_url: "http://ip-api.com/json/".to_string(),
            connectivity_url: "https://www.google.com".to_string(),
            dns_probe_host: Some("google.com".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    country: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    city: Option<String>,
    isp: Option<String>,
    org: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// HTTP and DNS client for the online checks
#[derive(Debug, Clone)]
pub struct OnlineChecker {
    client: Client,
    endpoints: OnlineEndpoints,
    timeout: Duration,
}

impl OnlineChecker {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_endpoints(timeout, OnlineEndpoints::default())
    }

    pub fn with_endpoints(timeout: Duration, endpoints: OnlineEndpoints) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("network-health-analyzer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoints,
            timeout,
        })
    }

    /// Public address of this host
    pub async fn public_ip(&self) -> Result<PublicIpInfo> {
        let response = self
            .client
            .get(&self.endpoints.public_ip_url)
            .send()
            .await
            .map_err(|e| AppError::network(format!("Failed to get public IP: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::network(format!("Public IP service error: {}", e)))?;

        response
            .json::<PublicIpInfo>()
            .await
            .map_err(|e| AppError::parse(format!("Invalid public IP response: {}", e)))
    }

    /// Location of `ip`, or of this host when `ip` is `None`.
    ///
    /// `Ok(None)` when the service answered but could not locate the address.
    pub async fn geolocation(&self, ip: Option<&str>) -> Result<Option<GeoLocation>> {
        let url = format!("{}{}", self.endpoints.geolocation_url, ip.unwrap_or_default());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::network(format!("Failed to get geolocation: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::network(format!("Geolocation service error: {}", e)))?;

        let data = response
            .json::<IpApiResponse>()
            .await
            .map_err(|e| AppError::parse(format!("Invalid geolocation response: {}", e)))?;

        if data.status != "success" {
            return Ok(None);
        }

        Ok(Some(GeoLocation {
            country: data.country,
            region: data.region_name,
            city: data.city,
            isp: data.isp,
            org: data.org,
            lat: data.lat,
            lon: data.lon,
        }))
    }

    /// Check name resolution and HTTPS reachability.
    ///
    /// The internet counts as available when either check passes.
    pub async fn connectivity(&self) -> ConnectivityReport {
        let dns_working = match &self.endpoints.dns_probe_host {
            Some(host) => self.resolves(host).await,
            None => false,
        };

        let http_working = self
            .client
            .get(&self.endpoints.connectivity_url)
            .send()
            .await
            .map(|r| r.status().is_success() || r.status().is_redirection())
            .unwrap_or(false);

        ConnectivityReport {
            internet_available: dns_working || http_working,
            dns_working,
            http_working,
        }
    }

    async fn resolves(&self, host: &str) -> bool {
        let Ok((config, opts)) = system_conf::read_system_conf() else {
            return false;
        };
        let resolver = TokioAsyncResolver::tokio(config, opts);

        match tokio::time::timeout(self.timeout, resolver.lookup_ip(host)).await {
            Ok(Ok(lookup)) => lookup.iter().next().is_some(),
            _ => false,
        }
    }
}
