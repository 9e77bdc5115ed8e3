use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Timers {
    pub count: AtomicU64,
    pub total_ns: AtomicU64,
}
impl Timers {
    pub const fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            total_ns: AtomicU64::new(0),
        }
    }

    fn observe(&self, d: Duration) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_ns
            .fetch_add(d.as_nanos() as u64, Ordering::Relaxed);
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}

pub static ENCRYPT_TIMER: Timers = Timers::new();
pub static DELIVER_TIMER: Timers = Timers::new();
pub static APPEND_TIMER: Timers = Timers::new();
pub static ITERATIONS_OK: AtomicU64 = AtomicU64::new(0);
pub static ITERATIONS_FAILED: AtomicU64 = AtomicU64::new(0);

pub trait MetricsSink: Send + Sync + 'static {
    fn encrypt(&self, _dur: Duration) {}
    fn deliver(&self, _dur: Duration) {}
    fn append(&self, _dur: Duration) {}
    fn iteration(&self, _ok: bool) {}
}

struct NoopSink;
impl MetricsSink for NoopSink {}

static SINK: Lazy<RwLock<Box<dyn MetricsSink>>> = Lazy::new(|| RwLock::new(Box::new(NoopSink)));

pub fn set_sink<T: MetricsSink>(sink: T) {
    if let Ok(mut guard) = SINK.write() {
        *guard = Box::new(sink);
    }
}

pub fn clear_sink() {
    if let Ok(mut guard) = SINK.write() {
        *guard = Box::new(NoopSink);
    }
}
fn with_sink<R>(f: impl FnOnce(&dyn MetricsSink) -> R) -> R {
    match SINK.read() {
        Ok(guard) => f(&**guard),
        Err(_) => f(&NoopSink),
    }
}

pub fn record_encrypt(start: Instant) {
    let d = start.elapsed();
    ENCRYPT_TIMER.observe(d);
    with_sink(|sink| sink.encrypt(d));
}
pub fn record_deliver(start: Instant) {
    let d = start.elapsed();
    DELIVER_TIMER.observe(d);
    with_sink(|sink| sink.deliver(d));
}
pub fn record_append(start: Instant) {
    let d = start.elapsed();
    APPEND_TIMER.observe(d);
    with_sink(|sink| sink.append(d));
}
pub fn record_iteration(ok: bool) {
    if ok {
        ITERATIONS_OK.fetch_add(1, Ordering::Relaxed);
    } else {
        ITERATIONS_FAILED.fetch_add(1, Ordering::Relaxed);
    }
    with_sink(|sink| sink.iteration(ok));
}
