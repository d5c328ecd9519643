//! iperf3 bidirectional bandwidth probe

use super::Prober;
use crate::error::ProbeError;
use crate::models::IperfResult;
use crate::parsers::{iperf_error_message, parse_iperf_json, IperfSummary};
use crate::process::CommandOutput;
use std::time::Duration;

const TOOL: &str = "iperf3";

impl Prober {
    /// Measure upload, then download with `-R`, against `server`.
    ///
    /// An upload failure sets `error` and skips the download run. A
    /// download failure only sets `download_error`; upload numbers stay.
    pub async fn iperf3(&self, server: &str) -> IperfResult {
        let duration = self.settings.iperf3_duration_seconds;
        let mut result = IperfResult::new(server, duration);

        match self.iperf3_direction(server, false).await {
            Ok(upload) => {
                result.upload_mbps = upload.mbps;
                result.upload_retransmits = upload.retransmits;
            }
            Err(message) => {
                result.error = Some(message);
                return result;
            }
        }

        match self.iperf3_direction(server, true).await {
            Ok(download) => {
                result.download_mbps = download.mbps;
                result.download_retransmits = download.retransmits;
            }
            Err(message) => {
                result.download_error = Some(message);
            }
        }

        result
    }

    /// Describe a download failure for structured logs
    pub fn iperf3_partial_failure(result: &IperfResult) -> Option<ProbeError> {
        result.download_error.as_ref().map(|detail| ProbeError::PartialProbeFailure {
            tool: TOOL.to_string(),
            detail: format!("download test failed: {}", detail),
        })
    }

    async fn iperf3_direction(&self, server: &str, reverse: bool) -> Result<IperfSummary, String> {
        let port = self.settings.iperf3_port.to_string();
        let duration = self.settings.iperf3_duration_seconds.to_string();
        let mut args = vec!["-c", server, "-p", port.as_str(), "-t", duration.as_str()];
        if reverse {
            args.push("-R");
        }
        args.push("-J");

        let timeout =
            Duration::from_secs(u64::from(self.settings.iperf3_duration_seconds) + self.settings.iperf3_grace_seconds);

        let output = self.runner.run(TOOL, &args, timeout).await.map_err(|e| e.to_string())?;
        if !output.success() {
            return Err(failure_message(&output, reverse));
        }

        parse_iperf_json(&output.stdout).map_err(|e| e.to_string())
    }
}

fn failure_message(output: &CommandOutput, reverse: bool) -> String {
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    if let Some(message) = iperf_error_message(&output.stdout) {
        return message;
    }
    if reverse {
        "Download test failed".to_string()
    } else {
        "Upload test failed".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::testing::ScriptedRunner;
    use crate::probes::ProbeSettings;
    use crate::process::ProcessError;
    use std::sync::Arc;

    const UPLOAD: &str = r#"{"end": {"sum_sent": {"bits_per_second": 94456789.0, "retransmits": 7}}}"#;
    const DOWNLOAD: &str = r#"{"end": {"sum_sent": {"bits_per_second": 512000000.0, "retransmits": 2}}}"#;

    fn prober(runner: ScriptedRunner) -> (Prober, Arc<ScriptedRunner>) {
        let runner = Arc::new(runner);
        (Prober::new(runner.clone(), ProbeSettings::default()), runner)
    }

    #[tokio::test]
    async fn test_both_directions() {
        let (prober, runner) = prober(
            ScriptedRunner::new()
                .on(TOOL, "-R", Ok(CommandOutput::ok(DOWNLOAD)))
                .on(TOOL, "-J", Ok(CommandOutput::ok(UPLOAD))),
        );

        let result = prober.iperf3("iperf.example.net").await;
        assert!(result.error.is_none());
        assert_eq!(result.upload_mbps, 94.46);
        assert_eq!(result.upload_retransmits, 7);
        assert_eq!(result.download_mbps, 512.0);
        assert_eq!(result.download_retransmits, 2);

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, vec!["-c", "iperf.example.net", "-p", "5201", "-t", "10", "-J"]);
        assert_eq!(calls[1].1, vec!["-c", "iperf.example.net", "-p", "5201", "-t", "10", "-R", "-J"]);
        assert_eq!(calls[0].2, Duration::from_secs(40));
    }

    #[tokio::test]
    async fn test_upload_failure_short_circuits() {
        let (prober, runner) = prober(ScriptedRunner::new().on(
            TOOL,
            "-J",
            Ok(CommandOutput::failed(1, "iperf3: error - unable to connect to server: Connection refused\n")),
        ));

        let result = prober.iperf3("iperf.example.net").await;
        assert_eq!(
            result.error.as_deref(),
            Some("iperf3: error - unable to connect to server: Connection refused")
        );
        assert_eq!(result.download_mbps, 0.0);
        assert_eq!(result.download_retransmits, 0);
        assert_eq!(runner.call_count(TOOL), 1);
    }

    #[tokio::test]
    async fn test_upload_failure_without_stderr() {
        let (prober, _) = prober(ScriptedRunner::new().on(TOOL, "-J", Ok(CommandOutput::failed(1, ""))));
        let result = prober.iperf3("iperf.example.net").await;
        assert_eq!(result.error.as_deref(), Some("Upload test failed"));
    }

    #[tokio::test]
    async fn test_upload_failure_uses_json_error() {
        let output = CommandOutput {
            stdout: r#"{"start": {}, "error": "the server is busy running a test. try again later"}"#.to_string(),
            stderr: String::new(),
            exit_code: Some(1),
        };
        let (prober, _) = prober(ScriptedRunner::new().on(TOOL, "-J", Ok(output)));
        let result = prober.iperf3("iperf.example.net").await;
        assert_eq!(result.error.as_deref(), Some("the server is busy running a test. try again later"));
    }

    #[tokio::test]
    async fn test_download_failure_is_partial() {
        let (prober, _) = prober(
            ScriptedRunner::new()
                .on(
                    TOOL,
                    "-R",
                    Err(ProcessError::Timeout {
                        program: TOOL.to_string(),
                        timeout: Duration::from_secs(40),
                    }),
                )
                .on(TOOL, "-J", Ok(CommandOutput::ok(UPLOAD))),
        );

        let result = prober.iperf3("iperf.example.net").await;
        assert!(result.error.is_none());
        assert!(result.is_partial());
        assert_eq!(result.upload_mbps, 94.46);
        assert_eq!(result.download_mbps, 0.0);
        assert_eq!(result.download_retransmits, 0);

        let partial = Prober::iperf3_partial_failure(&result).unwrap();
        assert_eq!(partial.kind(), "partial_probe_failure");
    }
}
