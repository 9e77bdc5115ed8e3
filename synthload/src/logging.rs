use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::sync::Once;

static SUBSCRIBERS: once_cell::sync::Lazy<RwLock<HashMap<&'static str, Arc<dyn LogSink>>>> =
    once_cell::sync::Lazy::new(|| RwLock::new(HashMap::new()));
static LOGGER: MultiplexLogger = MultiplexLogger;
static LOGGER_ONCE: Once = Once::new();

struct MultiplexLogger;

impl log::Log for MultiplexLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        log::max_level() >= metadata.level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let subscribers = SUBSCRIBERS.read();
        for sink in subscribers.values() {
            sink.log(record);
        }
    }

    fn flush(&self) {
        for sink in SUBSCRIBERS.read().values() {
            sink.flush();
        }
    }
}

pub trait LogSink: Send + Sync + 'static {
    fn log(&self, record: &log::Record<'_>);
    fn flush(&self) {}
}

/// Installs the multiplexing logger once and sets the global level filter.
pub fn ensure_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    let mut result = Ok(());
    LOGGER_ONCE.call_once(|| {
        result = log::set_logger(&LOGGER);
    });
    log::set_max_level(level);
    result
}

pub fn set_sink(name: &'static str, sink: Option<Arc<dyn LogSink>>) {
    let mut guard = SUBSCRIBERS.write();
    match sink {
        Some(s) => {
            guard.insert(name, s);
        }
        None => {
            guard.remove(name);
        }
    }
}

pub fn parse_level(value: &str) -> Option<log::LevelFilter> {
    match value.to_lowercase().as_str() {
        "off" => Some(log::LevelFilter::Off),
        "error" => Some(log::LevelFilter::Error),
        "warn" | "warning" => Some(log::LevelFilter::Warn),
        "info" => Some(log::LevelFilter::Info),
        "debug" => Some(log::LevelFilter::Debug),
        "trace" => Some(log::LevelFilter::Trace),
        _ => None,
    }
}

// One line per record: `<unix millis> <LEVEL> <target> <message>`
#[derive(Debug, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn log(&self, record: &log::Record<'_>) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(
            err,
            "{} {:<5} {} {}",
            crate::types::now_millis(),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
