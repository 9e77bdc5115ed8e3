use aws_sdk_kms::{primitives::Blob, Client};

use crate::aws_runtime::AwsContext;
use crate::traits::KeyManagementService;

#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct AwsKms {
    client: Client,
    ctx: AwsContext,
}

impl AwsKms {
    pub fn new(ctx: &AwsContext) -> Self {
        let mut b = aws_sdk_kms::config::Builder::from(ctx.sdk_config());
        if let Some(url) = ctx.endpoint_url() {
            b = b.endpoint_url(url);
        }
        Self {
            client: Client::from_conf(b.build()),
            ctx: ctx.clone(),
        }
    }
}

impl KeyManagementService for AwsKms {
    fn encrypt(&self, key_id: &str, plaintext: &[u8]) -> Result<Vec<u8>, anyhow::Error> {
        let resp = self.ctx.block_on(async {
            self.client
                .encrypt()
                .key_id(key_id)
                .plaintext(Blob::new(plaintext.to_vec()))
                .send()
                .await
        })?;
        let ct = resp
            .ciphertext_blob()
            .ok_or_else(|| anyhow::anyhow!("missing ciphertext_blob"))?;
        Ok(ct.as_ref().to_vec())
    }
}
