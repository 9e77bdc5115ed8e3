use std::future::Future;
use std::sync::Arc;

use aws_config::meta::region::RegionProviderChain;
use aws_config::Region;

/// Shared SDK configuration plus the runtime every adapter blocks on.
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct AwsContext {
    rt: Arc<tokio::runtime::Runtime>,
    sdk: aws_config::SdkConfig,
    endpoint_url: Option<String>,
}

impl AwsContext {
    pub fn new(
        rt: Option<Arc<tokio::runtime::Runtime>>,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let rt = match rt {
            Some(rt) => rt,
            None => Arc::new(tokio::runtime::Runtime::new()?),
        };
        let region_provider = if let Some(r) = region {
            RegionProviderChain::first_try(Region::new(r))
        } else {
            RegionProviderChain::default_provider()
        };
        let sdk = block_on(&rt, async {
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(region_provider)
                .load()
                .await
        });
        log::debug!(
            "aws context region={:?} endpoint={:?}",
            sdk.region().map(|r| r.to_string()),
            endpoint_url
        );
        Ok(Self {
            rt,
            sdk,
            endpoint_url,
        })
    }

    pub fn sdk_config(&self) -> &aws_config::SdkConfig {
        &self.sdk
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        block_on(&self.rt, fut)
    }
}

fn block_on<F: Future>(rt: &tokio::runtime::Runtime, fut: F) -> F::Output {
    match tokio::runtime::Handle::try_current() {
        // already inside a runtime worker: step off it before blocking
        Ok(handle) => tokio::task::block_in_place(|| handle.block_on(fut)),
        Err(_) => rt.block_on(fut),
    }
}
