use aws_sdk_s3::{primitives::ByteStream, Client};

use crate::aws_runtime::AwsContext;
use crate::traits::ObjectStore;

#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct S3ObjectStore {
    client: Client,
    ctx: AwsContext,
}

impl S3ObjectStore {
    pub fn new(ctx: &AwsContext) -> Self {
        let mut b = aws_sdk_s3::config::Builder::from(ctx.sdk_config());
        if let Some(url) = ctx.endpoint_url() {
            // emulators serve buckets by path, not by virtual host
            b = b.endpoint_url(url).force_path_style(true);
        }
        Self {
            client: Client::from_conf(b.build()),
            ctx: ctx.clone(),
        }
    }
}

impl ObjectStore for S3ObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>, anyhow::Error> {
        self.ctx.block_on(async {
            let out = self.client.get_object().bucket(bucket).key(key).send().await;
            match out {
                Ok(resp) => {
                    let body = resp.body.collect().await?;
                    Ok::<_, anyhow::Error>(Some(body.into_bytes().to_vec()))
                }
                Err(e) => {
                    let missing = e
                        .as_service_error()
                        .map(|se| se.is_no_such_key())
                        .unwrap_or(false);
                    if missing {
                        Ok(None)
                    } else {
                        Err(anyhow::anyhow!(e))
                    }
                }
            }
        })
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), anyhow::Error> {
        self.ctx.block_on(async {
            self.client
                .put_object()
                .bucket(bucket)
                .key(key)
                .content_type(content_type)
                .body(ByteStream::from(body))
                .send()
                .await
        })?;
        Ok(())
    }
}
