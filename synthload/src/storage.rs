//! Appending generated messages to a storage sink.
//!
//! The object-store path is a read-modify-write on a single object: fetch,
//! concatenate `"\n" + message`, overwrite. It is not atomic. Two writers on
//! the same object will lose updates, so one generator per destination is
//! assumed. The first append to a missing object still writes the leading
//! newline.

use std::sync::Arc;
use std::time::Instant;

use crate::error::Error;
use crate::id;
use crate::locator::{self, StorageDestination};
use crate::metrics;
use crate::traits::{KeyValueTable, ObjectStore};
use crate::types::Row;

pub const DEFAULT_OBJECT_KEY: &str = "index.html";
pub const OBJECT_CONTENT_TYPE: &str = "text/html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Appended {
    Object {
        bucket: String,
        key: String,
        size: usize,
    },
    Row {
        table: String,
        id: String,
    },
}

#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct StorageEngine {
    objects: Arc<dyn ObjectStore>,
    table: Arc<dyn KeyValueTable>,
    object_key: String,
}

impl StorageEngine {
    pub fn new(objects: Arc<dyn ObjectStore>, table: Arc<dyn KeyValueTable>) -> Self {
        Self {
            objects,
            table,
            object_key: DEFAULT_OBJECT_KEY.to_string(),
        }
    }

    pub fn with_object_key(mut self, key: impl Into<String>) -> Self {
        self.object_key = key.into();
        self
    }

    /// Resolves `locator` and appends `message` to it.
    pub fn append_to(&self, locator: &str, message: &str) -> Result<Appended, Error> {
        let destination = locator::resolve(locator)?;
        self.append(&destination, message)
    }

    pub fn append(
        &self,
        destination: &StorageDestination,
        message: &str,
    ) -> Result<Appended, Error> {
        let start = Instant::now();
        let out = match destination {
            StorageDestination::ObjectStore { bucket } => self.append_object(bucket, message),
            StorageDestination::KeyValueTable { table } => self.insert_row(table, message),
        }?;
        metrics::record_append(start);
        Ok(out)
    }

    fn append_object(&self, bucket: &str, message: &str) -> Result<Appended, Error> {
        let key = self.object_key.as_str();
        let existing = self
            .objects
            .get_object(bucket, key)
            .map_err(|source| Error::StorageReadFailed {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            })?
            .unwrap_or_default();
        log::debug!(
            "current s3://{bucket}/{key} content is: {}",
            String::from_utf8_lossy(&existing)
        );

        let mut body = existing;
        body.reserve(message.len() + 1);
        body.push(b'\n');
        body.extend_from_slice(message.as_bytes());
        let size = body.len();

        self.objects
            .put_object(bucket, key, body, OBJECT_CONTENT_TYPE)
            .map_err(|source| Error::StorageWriteFailed {
                target: format!("s3://{bucket}/{key}"),
                source,
            })?;
        Ok(Appended::Object {
            bucket: bucket.to_string(),
            key: key.to_string(),
            size,
        })
    }

    fn insert_row(&self, table: &str, message: &str) -> Result<Appended, Error> {
        let row = Row {
            id: id::new_row_id(),
            message: message.to_string(),
        };
        self.table
            .put_item(table, &row)
            .map_err(|source| Error::StorageWriteFailed {
                target: format!("dynamodb table {table}"),
                source,
            })?;
        Ok(Appended::Row {
            table: table.to_string(),
            id: row.id,
        })
    }
}
