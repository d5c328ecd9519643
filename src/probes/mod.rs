//! Active probes
//!
//! Each probe runs one or more external tools through a
//! [`CommandRunner`] and returns a typed result or a [`ProbeError`]. The
//! probes never run concurrently with each other; the caller awaits one
//! before starting the next so they do not skew each other's numbers.
//!
//! [`ProbeError`]: crate::error::ProbeError

pub mod dns;
pub mod iperf;
pub mod ping;
pub mod speedtest;

pub use dns::{DOMAIN_CORPUS, SYSTEM_DEFAULT_RESOLVER};
pub use ping::GLOBAL_PING_TARGETS;

use crate::process::CommandRunner;
use std::sync::Arc;
use std::time::Duration;

/// Tunables shared by all probes
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSettings {
    /// Echo requests per ping run
    pub ping_count: u32,
    /// Extra seconds granted to ping on top of one second per echo
    pub ping_grace_seconds: u64,
    /// `+time=` passed to dig
    pub dns_query_timeout_seconds: u32,
    /// Hard deadline for one dig process
    pub dns_process_timeout: Duration,
    pub speedtest_timeout: Duration,
    pub iperf3_port: u16,
    pub iperf3_duration_seconds: u32,
    /// Extra seconds granted to each iperf3 direction
    pub iperf3_grace_seconds: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            ping_count: crate::defaults::DEFAULT_PING_COUNT,
            ping_grace_seconds: 10,
            dns_query_timeout_seconds: crate::defaults::DEFAULT_DNS_QUERY_TIMEOUT_SECS,
            dns_process_timeout: crate::defaults::DEFAULT_DNS_PROCESS_TIMEOUT,
            speedtest_timeout: crate::defaults::DEFAULT_SPEEDTEST_TIMEOUT,
            iperf3_port: crate::defaults::DEFAULT_IPERF3_PORT,
            iperf3_duration_seconds: crate::defaults::DEFAULT_IPERF3_DURATION_SECS,
            iperf3_grace_seconds: 30,
        }
    }
}

/// Runs active probes through a shared command runner
#[derive(Clone)]
pub struct Prober {
    runner: Arc<dyn CommandRunner>,
    settings: ProbeSettings,
}

impl Prober {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: ProbeSettings) -> Self {
        Self { runner, settings }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }
}

impl std::fmt::Debug for Prober {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prober").field("settings", &self.settings).finish_non_exhaustive()
    }
}
