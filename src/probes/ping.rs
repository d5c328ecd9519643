//! ICMP echo probe

use super::Prober;
use crate::error::ProbeError;
use crate::models::PingResult;
use crate::parsers::parse_ping_output;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Public resolvers used as internet latency references
pub const GLOBAL_PING_TARGETS: [(&str, &str); 3] = [
    ("8.8.8.8", "Google DNS"),
    ("1.1.1.1", "Cloudflare DNS"),
    ("9.9.9.9", "Quad9 DNS"),
];

impl Prober {
    /// Ping `host` with the configured count
    pub async fn ping(&self, host: &str) -> Result<PingResult, ProbeError> {
        self.ping_with_count(host, self.settings.ping_count).await
    }

    /// Ping `host` `count` times.
    ///
    /// A parsed summary is returned whatever the exit code, so 100% loss
    /// is a result and not an error.
    pub async fn ping_with_count(&self, host: &str, count: u32) -> Result<PingResult, ProbeError> {
        let count_arg = count.to_string();
        let timeout = Duration::from_secs(u64::from(count) + self.settings.ping_grace_seconds);
        let output = self.runner.run("ping", &["-c", &count_arg, host], timeout).await?;

        match parse_ping_output(&output.stdout, host) {
            Some(result) => Ok(result),
            None if !output.success() => Err(ProbeError::failure("ping", output.exit_code, output.stderr.trim())),
            None => Err(ProbeError::parse_miss("ping", "no statistics summary in output")),
        }
    }

    /// Ping each global target in order, keeping the ones that answered.
    ///
    /// No further target is pinged once `cancel` is set.
    pub async fn global_pings(&self, cancel: &AtomicBool) -> Vec<PingResult> {
        let mut results = Vec::with_capacity(GLOBAL_PING_TARGETS.len());
        for (host, _name) in GLOBAL_PING_TARGETS {
            if cancel.load(Ordering::SeqCst) {
                break;
            }
            if let Ok(result) = self.ping(host).await {
                results.push(result);
            }
        }
        results
    }
}
