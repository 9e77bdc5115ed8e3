use rand::RngCore;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};

use crate::traits::KeyManagementService;

const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

/// Local stand-in for a managed key: AES-256-GCM under a fixed master key.
///
/// Output layout is `ciphertext || tag || nonce`. The key id is bound as
/// additional authenticated data so a blob only opens under the id it was
/// sealed for.
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct StaticKms {
    master_key: [u8; 32],
}

impl StaticKms {
    pub fn new(master_key: [u8; 32]) -> Self {
        Self { master_key }
    }

    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        let hex = hex.trim();
        if hex.len() != 64 || !hex.is_ascii() {
            return Err(anyhow::anyhow!(
                "static master key must be 64 hex characters"
            ));
        }
        let mut key = [0_u8; 32];
        for (i, slot) in key.iter_mut().enumerate() {
            *slot = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16)
                .map_err(|e| anyhow::anyhow!("invalid static master key: {e}"))?;
        }
        Ok(Self::new(key))
    }

    fn key(&self) -> anyhow::Result<LessSafeKey> {
        let unbound = UnboundKey::new(&AES_256_GCM, &self.master_key)
            .map_err(|_| anyhow::anyhow!("invalid key"))?;
        Ok(LessSafeKey::new(unbound))
    }

    pub fn decrypt(&self, key_id: &str, blob: &[u8]) -> anyhow::Result<Vec<u8>> {
        if blob.len() < NONCE_SIZE + TAG_SIZE {
            return Err(anyhow::anyhow!("ciphertext too short"));
        }
        let (sealed, nonce_bytes) = blob.split_at(blob.len() - NONCE_SIZE);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| anyhow::anyhow!("nonce error"))?;
        let mut in_out = sealed.to_vec();
        let pt = self
            .key()?
            .open_in_place(nonce, Aad::from(key_id.as_bytes()), &mut in_out)
            .map_err(|_| anyhow::anyhow!("decrypt error"))?;
        Ok(pt.to_vec())
    }
}

impl Default for StaticKms {
    fn default() -> Self {
        Self::new([0_u8; 32])
    }
}

impl KeyManagementService for StaticKms {
    fn encrypt(&self, key_id: &str, plaintext: &[u8]) -> Result<Vec<u8>, anyhow::Error> {
        let key = self.key()?;
        let mut nonce = [0_u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce);
        let mut in_out = Vec::with_capacity(plaintext.len() + TAG_SIZE + NONCE_SIZE);
        in_out.extend_from_slice(plaintext);
        key.seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce),
            Aad::from(key_id.as_bytes()),
            &mut in_out,
        )
        .map_err(|_| anyhow::anyhow!("encrypt error"))?;
        in_out.extend_from_slice(&nonce);
        Ok(in_out)
    }
}
