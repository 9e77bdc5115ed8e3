use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use synthload::error;
use synthload::logging::{self, LogSink, StderrSink};
use synthload::shutdown;
use synthload_config::{generator_from_config, ConfigOptions};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("synthload: {e:#}");
            log::logger().flush();
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let options = ConfigOptions::from_env()?;
    let level = options
        .log_level
        .as_deref()
        .and_then(logging::parse_level)
        .unwrap_or(log::LevelFilter::Info);
    logging::ensure_logger(level).context("install logger")?;
    let sink: Arc<dyn LogSink> = Arc::new(StderrSink);
    logging::set_sink("stderr", Some(sink));

    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("build tokio runtime")?,
    );
    let (watcher, broadcaster) = shutdown::signal();
    shutdown::listen_for_termination(rt.handle(), broadcaster);

    let (generator, applied) = generator_from_config(&options, Some(Arc::clone(&rt)))
        .map_err(|e| anyhow::anyhow!(error::report(&e)))?;
    let cfg = generator.config();
    log::info!("log group: {}", cfg.log_group_locator);
    log::info!("kms key: {}", cfg.key_id);
    log::info!("storage: {}", cfg.storage_locator);
    log::info!("log stream: {}", cfg.stream_name);
    log::debug!(
        "backend {:?}, sleep {:?}..{:?}, on error {:?}",
        applied.backend,
        cfg.schedule.min(),
        cfg.schedule.max(),
        cfg.on_error
    );

    let summary = generator
        .run(&watcher)
        .map_err(|e| anyhow::anyhow!(error::report(&e)))?;
    log::info!(
        "stopped after {} iterations ({} failed){}",
        summary.attempted(),
        summary.failed,
        if summary.shutdown_requested {
            ", shutdown requested"
        } else {
            ""
        }
    );
    log::logger().flush();
    Ok(())
}
