//! Shutdown signalling for the generator loop.
//!
//! A `Broadcaster` flips a one-shot flag and wakes every `Watcher`. The loop
//! only ever waits in `Watcher::wait_timeout`, so that sleep is the single
//! point where a termination request is observed.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Shared {
    fired: Mutex<bool>,
    cond: Condvar,
}

/// Construct a `Watcher` and `Broadcaster` pair.
#[must_use]
pub fn signal() -> (Watcher, Broadcaster) {
    let shared = Arc::new(Shared::default());
    (
        Watcher {
            shared: Arc::clone(&shared),
        },
        Broadcaster { shared },
    )
}

#[derive(Debug, Clone)]
pub struct Watcher {
    shared: Arc<Shared>,
}

impl Watcher {
    pub fn is_signaled(&self) -> bool {
        *self.shared.fired.lock()
    }

    /// Sleeps up to `timeout`. Returns true if shutdown was signaled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut fired = self.shared.fired.lock();
        while !*fired {
            if self
                .shared
                .cond
                .wait_until(&mut fired, deadline)
                .timed_out()
            {
                break;
            }
        }
        *fired
    }
}

#[derive(Debug, Clone)]
pub struct Broadcaster {
    shared: Arc<Shared>,
}

impl Broadcaster {
    pub fn signal(&self) {
        let mut fired = self.shared.fired.lock();
        *fired = true;
        self.shared.cond.notify_all();
    }
}

/// Spawns a task on `handle` that fires `broadcaster` on SIGINT or SIGTERM.
pub fn listen_for_termination(handle: &tokio::runtime::Handle, broadcaster: Broadcaster) {
    handle.spawn(async move {
        wait_for_termination().await;
        log::info!("termination requested, stopping after the current step");
        broadcaster.signal();
    });
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            log::warn!("unable to listen for SIGTERM: {e}");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn wait_times_out_without_signal() {
        let (watcher, _broadcaster) = signal();
        let start = Instant::now();
        assert!(!watcher.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn signal_wakes_sleeper_early() {
        let (watcher, broadcaster) = signal();
        let sleeper = thread::spawn(move || {
            let start = Instant::now();
            let fired = watcher.wait_timeout(Duration::from_secs(30));
            (fired, start.elapsed())
        });
        thread::sleep(Duration::from_millis(20));
        broadcaster.signal();
        let (fired, elapsed) = sleeper.join().unwrap();
        assert!(fired);
        assert!(elapsed < Duration::from_secs(30));
    }

    #[test]
    fn signal_is_sticky() {
        let (watcher, broadcaster) = signal();
        broadcaster.signal();
        assert!(watcher.is_signaled());
        assert!(watcher.wait_timeout(Duration::from_secs(30)));
        assert!(watcher.clone().wait_timeout(Duration::ZERO));
    }
}
