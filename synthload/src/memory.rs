use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::traits::{KeyValueTable, LogService, ObjectStore};
use crate::types::{LogEvent, Row};

type ObjectMap = HashMap<(String, String), (Vec<u8>, String)>;

#[derive(Clone, Debug, Default)]
pub struct InMemoryObjectStore {
    inner: Arc<Mutex<ObjectMap>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.inner.lock().insert(
            (bucket.to_string(), key.to_string()),
            (body, "application/octet-stream".to_string()),
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(body, _)| body.clone())
    }

    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.inner
            .lock()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(_, ct)| ct.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>, anyhow::Error> {
        Ok(self.object(bucket, key))
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), anyhow::Error> {
        log::trace!("memory put s3://{bucket}/{key} len={}", body.len());
        self.inner.lock().insert(
            (bucket.to_string(), key.to_string()),
            (body, content_type.to_string()),
        );
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryTable {
    // table -> id -> row; BTreeMap keeps iteration stable for tests
    inner: Arc<Mutex<HashMap<String, BTreeMap<String, Row>>>>,
}

impl InMemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, table: &str, id: &str) -> Option<Row> {
        self.inner
            .lock()
            .get(table)
            .and_then(|rows| rows.get(id))
            .cloned()
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.inner
            .lock()
            .get(table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl KeyValueTable for InMemoryTable {
    fn put_item(&self, table: &str, row: &Row) -> Result<(), anyhow::Error> {
        log::trace!("memory put_item table={table} id={}", row.id);
        // PutItem semantics: same id replaces the row
        self.inner
            .lock()
            .entry(table.to_string())
            .or_default()
            .insert(row.id.clone(), row.clone());
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryLogs {
    streams: Arc<Mutex<HashMap<(String, String), Vec<LogEvent>>>>,
}

impl InMemoryLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_stream(&self, group: &str, stream: &str) -> bool {
        self.streams
            .lock()
            .contains_key(&(group.to_string(), stream.to_string()))
    }

    pub fn events(&self, group: &str, stream: &str) -> Vec<LogEvent> {
        self.streams
            .lock()
            .get(&(group.to_string(), stream.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

impl LogService for InMemoryLogs {
    fn create_log_stream(&self, group: &str, stream: &str) -> Result<bool, anyhow::Error> {
        let mut m = self.streams.lock();
        let key = (group.to_string(), stream.to_string());
        if m.contains_key(&key) {
            return Ok(false);
        }
        m.insert(key, Vec::new());
        Ok(true)
    }

    fn put_log_event(
        &self,
        group: &str,
        stream: &str,
        event: &LogEvent,
    ) -> Result<(), anyhow::Error> {
        let mut m = self.streams.lock();
        let events = m
            .get_mut(&(group.to_string(), stream.to_string()))
            .ok_or_else(|| {
                anyhow::anyhow!("ResourceNotFoundException: log stream {group}/{stream}")
            })?;
        events.push(event.clone());
        Ok(())
    }
}
