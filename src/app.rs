//! Analysis pipeline orchestration
//!
//! Runs the collectors and probes for one interface strictly in order,
//! records each step and scores whatever was gathered. A shared
//! cancellation flag is checked before every step; once it is set no
//! further probe starts and the partial report is still scored.

use crate::collectors::{network_dns_servers, Collector};
use crate::error::{AppError, ProbeError, Result};
use crate::health::{self, HealthInputs};
use crate::logging::ProbeLogger;
use crate::models::{AnalysisReport, Config, ConnectivityReport, InterfaceInfo, StepRecord};
use crate::online::OnlineChecker;
use crate::probes::Prober;
use crate::process::CommandRunner;
use crate::types::{RunMode, StepStatus};
use chrono::Utc;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Nearby networks kept from one scan
pub const WIFI_SCAN_LIMIT: usize = 15;

/// Sequential analyzer for one or more interfaces
pub struct Analyzer {
    config: Config,
    collector: Collector,
    prober: Prober,
    online: OnlineChecker,
    probes: ProbeLogger,
    cancel: Arc<AtomicBool>,
    completed: Mutex<Vec<AnalysisReport>>,
}

impl Analyzer {
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>, online: OnlineChecker, probes: ProbeLogger) -> Self {
        let prober = Prober::new(runner.clone(), config.probe_settings());
        Self {
            collector: Collector::new(runner),
            prober,
            online,
            probes,
            config,
            cancel: Arc::new(AtomicBool::new(false)),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Share an externally owned cancellation flag
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Reports finished so far by `run`, removed from the analyzer.
    ///
    /// Lets a caller that abandons `run` still print what was done.
    pub fn take_completed(&self) -> Vec<AnalysisReport> {
        std::mem::take(&mut *self.completed_reports())
    }

    fn completed_reports(&self) -> MutexGuard<'_, Vec<AnalysisReport>> {
        match self.completed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Turn `auto` into online or offline with a connectivity check
    pub async fn resolve_mode(&self) -> (RunMode, Option<ConnectivityReport>) {
        match self.config.mode {
            RunMode::Auto => {
                let report = self.online.connectivity().await;
                let mode = if report.internet_available {
                    RunMode::Online
                } else {
                    RunMode::Offline
                };
                self.probes
                    .logger()
                    .info(&format!("Connectivity check selected {} mode", mode))
                    .field("dns_working", report.dns_working)
                    .field("http_working", report.http_working)
                    .log()
                    .await;
                (mode, Some(report))
            }
            mode => (mode, None),
        }
    }

    /// Every interface the OS reports
    pub async fn list_interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        self.collector
            .get_all_interfaces()
            .await
            .map_err(|e| AppError::no_interfaces(format!("Could not enumerate interfaces: {}", e)))
    }

    /// Interfaces this run will analyze.
    ///
    /// A named interface must exist; otherwise the active ones are used,
    /// all of them with `all_interfaces`, else the first.
    pub async fn select_interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        let interfaces = self.list_interfaces().await?;

        if let Some(name) = &self.config.interface {
            return interfaces
                .into_iter()
                .find(|i| &i.name == name)
                .map(|i| vec![i])
                .ok_or_else(|| AppError::interface_not_found(name.clone()));
        }

        let mut active: Vec<InterfaceInfo> = interfaces.into_iter().filter(InterfaceInfo::is_active).collect();
        if active.is_empty() {
            return Err(AppError::no_interfaces("No active network interfaces found"));
        }
        if !self.config.all_interfaces {
            active.truncate(1);
        }
        Ok(active)
    }

    /// Select interfaces, resolve the mode and analyze each interface in turn
    pub async fn run(&self) -> Result<Vec<AnalysisReport>> {
        let interfaces = self.select_interfaces().await?;
        let (mode, connectivity) = self.resolve_mode().await;

        for interface in interfaces {
            if self.is_cancelled() && !self.completed_reports().is_empty() {
                break;
            }
            let report = self.analyze_interface(interface, mode, connectivity).await;
            self.completed_reports().push(report);
        }
        Ok(self.take_completed())
    }

    /// Collect, probe and score one interface
    pub async fn analyze_interface(
        &self,
        interface: InterfaceInfo,
        mode: RunMode,
        connectivity: Option<ConnectivityReport>,
    ) -> AnalysisReport {
        let name = interface.name.clone();
        let online = mode != RunMode::Offline;
        let mut run = StepRun::new(&self.cancel, &self.probes);

        let dhcp = run.step("dhcp", self.collector.get_dhcp_info(&name)).await.flatten();
        let routing = run.step("routing", self.collector.get_routing_info()).await;
        let dns_configuration = run.step("dns_configuration", self.collector.get_dns_configuration()).await;
        let network_dns_servers = network_dns_servers(&name, dhcp.as_ref(), dns_configuration.as_ref());

        let metrics = run.step("interface_metrics", self.collector.get_interface_metrics(&name)).await;
        let wifi = run.step("wifi_info", self.collector.get_wifi_info()).await.flatten();

        let wifi_scan = if self.config.skip_wifi_scan {
            run.skip("wifi_scan", "disabled by configuration").await;
            Vec::new()
        } else if wifi.is_none() {
            run.skip("wifi_scan", "interface is not associated").await;
            Vec::new()
        } else {
            run.step("wifi_scan", self.collector.get_wifi_scan(WIFI_SCAN_LIMIT))
                .await
                .unwrap_or_default()
        };

        let gateway = routing
            .as_ref()
            .and_then(|r| r.default_gateway.clone())
            .or_else(|| dhcp.as_ref().and_then(|d| d.routers.first().cloned()));
        let gateway_ping = match &gateway {
            Some(gateway) => run.step("gateway_ping", self.prober.ping(gateway)).await,
            None => {
                run.skip("gateway_ping", "no default gateway").await;
                None
            }
        };

        let mut public_ip = None;
        let mut geolocation = None;
        let mut global_pings = Vec::new();
        let mut speed_test = None;
        let mut iperf = None;
        let mut dns_reliability = None;

        if online {
            public_ip = run.online_step("public_ip", self.online.public_ip()).await;
            if let Some(ip) = &public_ip {
                geolocation = run
                    .online_step("geolocation", self.online.geolocation(Some(&ip.ip)))
                    .await
                    .flatten();
            }

            global_pings = run
                .step("global_pings", async {
                    Ok::<_, ProbeError>(self.prober.global_pings(&self.cancel).await)
                })
                .await
                .unwrap_or_default();

            speed_test = run.step("speed_test", self.prober.speed_test(&name)).await;

            match &self.config.iperf3_server {
                Some(server) => {
                    iperf = run.iperf_step(self.prober.iperf3(server)).await;
                }
                None => run.skip("iperf3", "no server configured").await,
            }

            if self.config.skip_dns_test {
                run.skip("dns_reliability", "disabled by configuration").await;
            } else {
                let server = self.config.dns_server.as_deref();
                let count = self.config.dns_domains;
                dns_reliability = run
                    .step("dns_reliability", async {
                        Ok::<_, ProbeError>(self.prober.dns_reliability(server, count, &self.cancel).await)
                    })
                    .await;
            }
        } else {
            for step in ["public_ip", "global_pings", "speed_test", "iperf3", "dns_reliability"] {
                run.skip(step, "offline mode").await;
            }
        }

        // an interrupt during the last step is only visible here
        run.note_cancellation();

        let pings: Vec<_> = gateway_ping.iter().chain(global_pings.iter()).cloned().collect();
        let inputs = HealthInputs::new()
            .metrics(metrics.as_ref())
            .wifi(wifi.as_ref())
            .pings(&pings)
            .speed_test(speed_test.as_ref())
            .dns(dns_reliability.as_ref())
            .iperf(iperf.as_ref());
        let health = health::assess(&inputs, &self.config.scoring);

        self.probes
            .logger()
            .info(&format!("{} scored {} ({})", name, health.score, health.overall))
            .field("interface", &name)
            .field("score", health.score)
            .field("errors", health.errors.len())
            .field("warnings", health.warnings.len())
            .field("interrupted", run.interrupted)
            .log()
            .await;

        AnalysisReport {
            timestamp: Utc::now(),
            mode,
            interface,
            connectivity,
            metrics,
            wifi,
            wifi_scan,
            routing,
            dhcp,
            dns_configuration,
            network_dns_servers,
            gateway_ping,
            public_ip,
            geolocation,
            global_pings,
            speed_test,
            iperf,
            dns_reliability,
            health,
            interrupted: run.interrupted,
            steps: run.steps,
        }
    }
}

/// Step bookkeeping for one interface
struct StepRun<'a> {
    cancel: &'a AtomicBool,
    log: &'a ProbeLogger,
    steps: Vec<StepRecord>,
    interrupted: bool,
}

impl<'a> StepRun<'a> {
    fn new(cancel: &'a AtomicBool, log: &'a ProbeLogger) -> Self {
        Self {
            cancel,
            log,
            steps: Vec::new(),
            interrupted: false,
        }
    }

    fn note_cancellation(&mut self) -> bool {
        if self.cancel.load(Ordering::SeqCst) {
            self.interrupted = true;
        }
        self.interrupted
    }

    /// False once cancellation was requested; the step future is then dropped unpolled
    fn may_start(&mut self) -> bool {
        !self.note_cancellation()
    }

    fn record(&mut self, name: &str, status: StepStatus, detail: Option<String>, started: Instant) {
        self.steps.push(StepRecord {
            name: name.to_string(),
            status,
            detail,
            duration_ms: started.elapsed().as_millis() as u64,
        });
    }

    async fn step<T>(&mut self, name: &str, probe: impl Future<Output = std::result::Result<T, ProbeError>>) -> Option<T> {
        if !self.may_start() {
            return None;
        }

        let started = Instant::now();
        match probe.await {
            Ok(value) => {
                self.log.completed(name, started.elapsed()).await;
                self.record(name, StepStatus::Completed, None, started);
                Some(value)
            }
            Err(error) => {
                self.log.failed(name, &error, started.elapsed()).await;
                let status = if error.is_unavailable() {
                    StepStatus::Unavailable
                } else {
                    StepStatus::Failed
                };
                self.record(name, status, Some(error.to_string()), started);
                None
            }
        }
    }

    async fn online_step<T>(&mut self, name: &str, check: impl Future<Output = Result<T>>) -> Option<T> {
        if !self.may_start() {
            return None;
        }

        let started = Instant::now();
        match check.await {
            Ok(value) => {
                self.log.completed(name, started.elapsed()).await;
                self.record(name, StepStatus::Completed, None, started);
                Some(value)
            }
            Err(error) => {
                self.log
                    .logger()
                    .warn(&format!("{} failed: {}", name, error))
                    .field("probe", name)
                    .field("status", StepStatus::Failed)
                    .error_info(&error)
                    .duration(started.elapsed())
                    .log()
                    .await;
                self.record(name, StepStatus::Failed, Some(error.to_string()), started);
                None
            }
        }
    }

    /// iperf3 always yields a result; an upload error marks the step failed
    async fn iperf_step(&mut self, probe: impl Future<Output = crate::models::IperfResult>) -> Option<crate::models::IperfResult> {
        if !self.may_start() {
            return None;
        }

        let started = Instant::now();
        let result = probe.await;
        match &result.error {
            Some(message) => {
                let error = ProbeError::failure("iperf3", None, message.clone());
                self.log.failed("iperf3", &error, started.elapsed()).await;
                self.record("iperf3", StepStatus::Failed, Some(message.clone()), started);
            }
            None => {
                if let Some(partial) = Prober::iperf3_partial_failure(&result) {
                    self.log.failed("iperf3", &partial, started.elapsed()).await;
                    self.record("iperf3", StepStatus::Completed, Some(partial.to_string()), started);
                } else {
                    self.log.completed("iperf3", started.elapsed()).await;
                    self.record("iperf3", StepStatus::Completed, None, started);
                }
            }
        }
        Some(result)
    }

    async fn skip(&mut self, name: &str, reason: &str) {
        if self.interrupted {
            return;
        }
        self.log.skipped(name, reason).await;
        self.steps.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::Skipped,
            detail: Some(reason.to_string()),
            duration_ms: 0,
        });
    }
}
