//! Synthetic traffic generator.
//!
//! Each iteration fabricates a sentence, encrypts it with a managed key,
//! writes the ciphertext to a log stream and appends the plaintext to an
//! object-store object or a key-value table.

#[cfg(feature = "aws")]
pub mod aws_runtime;
pub mod builders;
pub mod config;
pub mod driver;
pub mod error;
pub mod gateway;
pub mod id;
#[cfg(feature = "aws")]
pub mod kms_aws;
pub mod kms_static;
pub mod locator;
pub mod logging;
pub mod logs;
#[cfg(feature = "aws")]
pub mod logs_cloudwatch;
pub mod memory;
pub mod metrics;
pub mod schedule;
pub mod sentence;
pub mod shutdown;
pub mod storage;
#[cfg(feature = "aws")]
pub mod store_s3;
#[cfg(feature = "aws")]
pub mod table_dynamodb;
pub mod traits;
pub mod types;

pub use builders::{Backend, KmsChoice, Services};
pub use config::{Config, ErrorPolicy};
pub use driver::{Generator, Iteration, RunSummary};
pub use error::Error;
pub use locator::{log_group_name, resolve, StorageDestination};
pub use traits::{KeyManagementService, KeyValueTable, LogService, ObjectStore};
pub use types::{LogEvent, Row};
