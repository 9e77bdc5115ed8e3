//! The generator loop: generate, encrypt, deliver, append, sleep.

use crate::builders::Services;
use crate::config::{Config, ErrorPolicy};
use crate::error::{self, Error};
use crate::gateway::EncryptionGateway;
use crate::logs::{Delivered, LogDelivery};
use crate::metrics;
use crate::sentence::SentenceGenerator;
use crate::shutdown::Watcher;
use crate::storage::{Appended, StorageEngine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    pub message: String,
    pub ciphertext: String,
    pub delivered: Delivered,
    pub appended: Appended,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: u64,
    pub failed: u64,
    pub shutdown_requested: bool,
}

impl RunSummary {
    pub fn attempted(&self) -> u64 {
        self.succeeded + self.failed
    }
}

#[allow(missing_debug_implementations)]
pub struct Generator {
    config: Config,
    sentences: SentenceGenerator,
    gateway: EncryptionGateway,
    logs: LogDelivery,
    storage: StorageEngine,
}

impl Generator {
    pub fn new(config: Config, services: Services) -> Self {
        let sentences = SentenceGenerator::new(config.words_per_sentence);
        let gateway = EncryptionGateway::new(services.kms, config.key_id.clone());
        let logs = LogDelivery::new(services.logs);
        let storage = StorageEngine::new(services.objects, services.table)
            .with_object_key(config.object_key.clone());
        Self {
            config,
            sentences,
            gateway,
            logs,
            storage,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one iteration with a freshly generated sentence.
    pub fn run_once(&self) -> Result<Iteration, Error> {
        let message = self.sentences.generate();
        log::info!("the message is generated: {message}");
        self.process(message)
    }

    /// Encrypts `message`, ships the ciphertext to the log stream and the
    /// plaintext to storage, in that order.
    pub fn process(&self, message: String) -> Result<Iteration, Error> {
        let ciphertext = self.gateway.encrypt(&message)?;
        log::info!("encrypted message: {ciphertext}");

        let delivered = self.logs.deliver(
            &self.config.log_group_locator,
            &self.config.stream_name,
            &ciphertext,
        )?;

        let appended = self
            .storage
            .append_to(&self.config.storage_locator, &message)?;
        match &appended {
            Appended::Object { bucket, key, size } => {
                log::debug!("wrote {size} bytes to s3://{bucket}/{key}")
            }
            Appended::Row { table, id } => log::debug!("inserted row {id} into {table}"),
        }

        Ok(Iteration {
            message,
            ciphertext,
            delivered,
            appended,
        })
    }

    /// Loops until the iteration limit, a shutdown signal, or (under
    /// `ErrorPolicy::Halt`) the first failed iteration.
    pub fn run(&self, shutdown: &Watcher) -> Result<RunSummary, Error> {
        let mut summary = RunSummary::default();
        loop {
            if shutdown.is_signaled() {
                summary.shutdown_requested = true;
                break;
            }
            if self.reached_limit(&summary) {
                break;
            }
            match self.run_once() {
                Ok(_) => {
                    summary.succeeded += 1;
                    metrics::record_iteration(true);
                }
                Err(e) => {
                    metrics::record_iteration(false);
                    match self.config.on_error {
                        ErrorPolicy::Halt => {
                            log::error!("{} stage failed: {}", e.stage(), error::report(&e));
                            return Err(e);
                        }
                        ErrorPolicy::LogAndContinue => {
                            summary.failed += 1;
                            log::warn!(
                                "{} stage failed, continuing: {}",
                                e.stage(),
                                error::report(&e)
                            );
                        }
                    }
                }
            }
            if self.reached_limit(&summary) {
                break;
            }
            let delay = self.config.schedule.next_delay();
            log::info!("sleeping for {delay:?}");
            if shutdown.wait_timeout(delay) {
                summary.shutdown_requested = true;
                break;
            }
        }
        Ok(summary)
    }

    fn reached_limit(&self, summary: &RunSummary) -> bool {
        self.config
            .max_iterations
            .is_some_and(|max| summary.attempted() >= max)
    }
}
