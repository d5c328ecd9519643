//! OS throughput test (`networkQuality`)

use super::Prober;
use crate::error::ProbeError;
use crate::models::SpeedTestResult;
use crate::parsers::parse_network_quality;

const TOOL: &str = "networkQuality";

impl Prober {
    /// Run the OS speed test bound to `interface`.
    ///
    /// A missing executable surfaces as `ToolUnavailable` so the caller can
    /// print "unavailable" rather than a zero reading.
    pub async fn speed_test(&self, interface: &str) -> Result<SpeedTestResult, ProbeError> {
        let output = self
            .runner
            .run(TOOL, &["-I", interface, "-v"], self.settings.speedtest_timeout)
            .await?;

        if !output.success() {
            return Err(ProbeError::failure(TOOL, output.exit_code, output.stderr.trim()));
        }

        parse_network_quality(&output.stdout).ok_or_else(|| ProbeError::parse_miss(TOOL, "no capacity lines in summary"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::testing::ScriptedRunner;
    use crate::probes::ProbeSettings;
    use crate::process::CommandOutput;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_speed_test_success() {
        let summary = "==== SUMMARY ====\nUplink capacity: 40.5 Mbps\nDownlink capacity: 310.2 Mbps\nResponsiveness: High (1800 RPM)\nIdle Latency: 2400 RPM (25.0 milliseconds)\n";
        let runner = Arc::new(ScriptedRunner::new().on(TOOL, "-I en0", Ok(CommandOutput::ok(summary))));
        let prober = Prober::new(runner.clone(), ProbeSettings::default());

        let result = prober.speed_test("en0").await.unwrap();
        assert_eq!(result.download_mbps, 310.2);
        assert_eq!(result.upload_mbps, 40.5);
        assert_eq!(result.responsiveness, 1800);
        assert_eq!(runner.calls()[0].2, Duration::from_secs(90));
    }

    #[tokio::test]
    async fn test_missing_tool_is_unavailable() {
        let prober = Prober::new(Arc::new(ScriptedRunner::new()), ProbeSettings::default());
        let error = prober.speed_test("en0").await.unwrap_err();
        assert!(error.is_unavailable());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_failure() {
        let runner = ScriptedRunner::new().on(TOOL, "-v", Ok(CommandOutput::failed(1, "Error: no network\n")));
        let prober = Prober::new(Arc::new(runner), ProbeSettings::default());
        let error = prober.speed_test("en0").await.unwrap_err();
        assert_eq!(error.kind(), "probe_failure");
        assert!(error.to_string().contains("Error: no network"));
    }

    #[tokio::test]
    async fn test_empty_summary_is_parse_miss() {
        let runner = ScriptedRunner::new().on(TOOL, "-v", Ok(CommandOutput::ok("==== SUMMARY ====\n")));
        let prober = Prober::new(Arc::new(runner), ProbeSettings::default());
        let error = prober.speed_test("en0").await.unwrap_err();
        assert_eq!(error.kind(), "parse_miss");
    }
}
