use std::sync::Arc;
use std::time::Instant;

use base64::Engine;

use crate::error::Error;
use crate::metrics;
use crate::traits::KeyManagementService;

/// Encrypts plaintext with a managed key and returns standard base64.
///
/// One remote call per invocation; nothing about the key is retained.
pub fn encrypt(
    kms: &dyn KeyManagementService,
    key_id: &str,
    plaintext: &str,
) -> Result<String, Error> {
    let start = Instant::now();
    let blob = kms
        .encrypt(key_id, plaintext.as_bytes())
        .map_err(|source| Error::EncryptionFailed {
            key_id: key_id.to_string(),
            source,
        })?;
    metrics::record_encrypt(start);
    Ok(base64::engine::general_purpose::STANDARD.encode(blob))
}

#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct EncryptionGateway {
    kms: Arc<dyn KeyManagementService>,
    key_id: String,
}

impl EncryptionGateway {
    pub fn new(kms: Arc<dyn KeyManagementService>, key_id: impl Into<String>) -> Self {
        Self {
            kms,
            key_id: key_id.into(),
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, Error> {
        encrypt(self.kms.as_ref(), &self.key_id, plaintext)
    }
}
