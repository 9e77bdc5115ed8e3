use crate::types::{LogEvent, Row};

pub trait KeyManagementService: Send + Sync {
    fn encrypt(&self, key_id: &str, plaintext: &[u8]) -> Result<Vec<u8>, anyhow::Error>;
}

pub trait ObjectStore: Send + Sync {
    // Ok(None) means the object does not exist
    fn get_object(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>, anyhow::Error>;
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), anyhow::Error>;
}

pub trait KeyValueTable: Send + Sync {
    fn put_item(&self, table: &str, row: &Row) -> Result<(), anyhow::Error>;
}

pub trait LogService: Send + Sync {
    // Ok(false) means the stream already existed
    fn create_log_stream(&self, group: &str, stream: &str) -> Result<bool, anyhow::Error>;
    fn put_log_event(&self, group: &str, stream: &str, event: &LogEvent)
        -> Result<(), anyhow::Error>;
}
