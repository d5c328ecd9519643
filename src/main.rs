//! Network Health Analyzer - Main CLI Application

use clap::Parser;
use network_health_analyzer::{
    app::Analyzer,
    cli::Cli,
    config::{display_config_summary, load_config},
    error::{AppError, Result},
    logging::{Logger, LoggerFactory},
    online::OnlineChecker,
    output::ReportFormatter,
    process::{CommandRunner, SystemCommandRunner},
    PKG_NAME, VERSION,
};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();
    let use_color = cli.use_colors();

    let result = match cli.validate() {
        Ok(()) => run_application(cli).await,
        Err(message) => Err(AppError::validation(message)),
    };

    if let Err(e) = result {
        eprintln!("{}", e.format_for_console(use_color));
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    let list_only = cli.list;
    let config = load_config(cli)?;
    colored::control::set_override(config.enable_color);

    let factory = LoggerFactory::new(config.clone());
    let logger = factory.create_logger("MAIN").await;
    logger
        .debug(&format!("{} v{} starting", PKG_NAME, VERSION))
        .field("config", display_config_summary(&config))
        .log()
        .await;

    let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner::new());
    let online = OnlineChecker::new(config.http_timeout())?;
    let analyzer = Analyzer::new(config.clone(), runner, online, factory.create_probe_logger().await);
    let formatter = ReportFormatter::new(&config);

    if list_only {
        let interfaces = analyzer.list_interfaces().await?;
        print!("{}", formatter.format_interfaces(&interfaces));
        return Ok(());
    }

    let run = analyzer.run();
    tokio::pin!(run);

    // The first Ctrl-C lets the running step finish and scores what was
    // gathered; a second one drops the run, which kills any child process.
    // Interfaces already analyzed are still printed.
    let reports = tokio::select! {
        result = &mut run => result?,
        _ = wait_for_interrupts(analyzer.cancel_flag(), logger.clone()) => {
            let completed = analyzer.take_completed();
            if !completed.is_empty() {
                println!("{}", formatter.format_reports(&completed)?);
            }
            return Err(AppError::Interrupted);
        }
    };

    println!("{}", formatter.format_reports(&reports)?);

    if reports.iter().any(|r| r.interrupted) {
        return Err(AppError::Interrupted);
    }

    Ok(())
}

/// Set the cancellation flag on the first interrupt and resolve on the second
async fn wait_for_interrupts(cancel: Arc<AtomicBool>, logger: Logger) {
    if tokio::signal::ctrl_c().await.is_err() {
        return std::future::pending().await;
    }
    cancel.store(true, Ordering::SeqCst);
    logger
        .warn("Interrupt received; finishing the current step. Press Ctrl-C again to abort.")
        .log()
        .await;

    if tokio::signal::ctrl_c().await.is_err() {
        return std::future::pending().await;
    }
    logger.warn("Second interrupt received; aborting").log().await;
}
