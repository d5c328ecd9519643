//! Data models shared by parsers, probes and the scoring engine

pub mod config;
pub mod health;
pub mod interface;
pub mod network;
pub mod online;
pub mod probe;
pub mod report;
pub mod wifi;

// Re-export main model types
pub use config::Config;
pub use health::{HealthCategory, HealthStatus, ALL_CHECKS_PASSED};
pub use interface::{InterfaceInfo, InterfaceStatus, NetworkMetrics};
pub use network::{DhcpInfo, DnsConfiguration, DnsResolverEntry, RouteEntry, RoutingInfo};
pub use online::{ConnectivityReport, GeoLocation, PublicIpInfo};
pub use probe::{DnsReliabilityResult, IperfResult, PingResult, SpeedTestResult};
pub use report::{AnalysisReport, StepRecord};
pub use wifi::{Band, NetworkScan, SignalQuality, WiFiInfo};
