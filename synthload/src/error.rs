use std::fmt::Write as _;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("unsupported destination: {locator}")]
    UnsupportedDestination { locator: String },
    #[error("invalid storage target {locator}: {reason}")]
    InvalidStorageTarget {
        locator: String,
        reason: &'static str,
    },
    #[error("invalid log group locator {locator}: {reason}")]
    InvalidLogGroup {
        locator: String,
        reason: &'static str,
    },
    #[error("failed to encrypt message with key {key_id}")]
    EncryptionFailed {
        key_id: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to read s3://{bucket}/{key}")]
    StorageReadFailed {
        bucket: String,
        key: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to write message to {target}")]
    StorageWriteFailed {
        target: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to create log stream {group}/{stream}")]
    LogStreamCreateFailed {
        group: String,
        stream: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to write encrypted message to log stream {group}/{stream}")]
    LogDeliveryFailed {
        group: String,
        stream: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    /// Short name of the pipeline stage that produced the error.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "configuration",
            Error::UnsupportedDestination { .. } | Error::InvalidStorageTarget { .. } => "resolve",
            Error::InvalidLogGroup { .. } => "resolve",
            Error::EncryptionFailed { .. } => "encrypt",
            Error::StorageReadFailed { .. } | Error::StorageWriteFailed { .. } => "storage",
            Error::LogStreamCreateFailed { .. } | Error::LogDeliveryFailed { .. } => "log",
        }
    }
}

/// Renders an error followed by its source chain on a single line.
pub fn report(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut cur = err.source();
    while let Some(cause) = cur {
        let _ = write!(out, ": {cause}");
        cur = cause.source();
    }
    out
}
