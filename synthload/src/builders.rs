use std::sync::Arc;

use crate::kms_static::StaticKms;
use crate::memory::{InMemoryLogs, InMemoryObjectStore, InMemoryTable};
use crate::traits::{KeyManagementService, KeyValueTable, LogService, ObjectStore};

/// The four service clients the generator talks to.
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct Services {
    pub kms: Arc<dyn KeyManagementService>,
    pub objects: Arc<dyn ObjectStore>,
    pub table: Arc<dyn KeyValueTable>,
    pub logs: Arc<dyn LogService>,
}

impl Services {
    /// In-process services; nothing leaves the process.
    pub fn in_memory(kms: Arc<dyn KeyManagementService>) -> Self {
        Self {
            kms,
            objects: Arc::new(InMemoryObjectStore::new()),
            table: Arc::new(InMemoryTable::new()),
            logs: Arc::new(InMemoryLogs::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Aws,
    Memory,
}

impl Backend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "aws" => Some(Backend::Aws),
            "memory" | "mem" | "local" => Some(Backend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KmsChoice {
    Aws,
    Static { master_key_hex: Option<String> },
}

impl KmsChoice {
    pub fn parse(value: &str, master_key_hex: Option<String>) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "aws" => Some(KmsChoice::Aws),
            "static" => Some(KmsChoice::Static { master_key_hex }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AwsOptions {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

pub fn static_kms(master_key_hex: Option<&str>) -> anyhow::Result<Arc<dyn KeyManagementService>> {
    let kms = match master_key_hex {
        Some(hex) => StaticKms::from_hex(hex)?,
        None => StaticKms::default(),
    };
    Ok(Arc::new(kms))
}

// Build the service set for a backend.
//  Backend::Memory: in-memory store/table/logs; KMS per `kms` (AWS KMS still
//  reachable if asked for explicitly)
//  Backend::Aws: S3, DynamoDB, CloudWatch Logs and KMS over one runtime
pub fn build_services(
    backend: Backend,
    kms: &KmsChoice,
    aws: &AwsOptions,
    rt: Option<Arc<tokio::runtime::Runtime>>,
) -> anyhow::Result<Services> {
    let static_or_aws = |ctx: Option<&AwsContextRef>| -> anyhow::Result<DynKms> {
        match kms {
            KmsChoice::Static { master_key_hex } => static_kms(master_key_hex.as_deref()),
            KmsChoice::Aws => aws_kms(ctx),
        }
    };
    match backend {
        Backend::Memory => {
            let ctx = match kms {
                KmsChoice::Aws => Some(aws_context(aws, rt)?),
                KmsChoice::Static { .. } => None,
            };
            let kms = static_or_aws(ctx.as_ref())?;
            Ok(Services::in_memory(kms))
        }
        Backend::Aws => {
            let ctx = aws_context(aws, rt)?;
            let kms = static_or_aws(Some(&ctx))?;
            aws_services(&ctx, kms)
        }
    }
}

type DynKms = Arc<dyn KeyManagementService>;

#[cfg(feature = "aws")]
type AwsContextRef = crate::aws_runtime::AwsContext;
#[cfg(not(feature = "aws"))]
type AwsContextRef = ();

#[cfg(feature = "aws")]
fn aws_context(
    aws: &AwsOptions,
    rt: Option<Arc<tokio::runtime::Runtime>>,
) -> anyhow::Result<AwsContextRef> {
    crate::aws_runtime::AwsContext::new(rt, aws.region.clone(), aws.endpoint_url.clone())
}

#[cfg(not(feature = "aws"))]
fn aws_context(
    _aws: &AwsOptions,
    _rt: Option<Arc<tokio::runtime::Runtime>>,
) -> anyhow::Result<AwsContextRef> {
    anyhow::bail!("Enable feature 'aws' to use AWS services")
}

#[cfg(feature = "aws")]
fn aws_kms(ctx: Option<&AwsContextRef>) -> anyhow::Result<Arc<dyn KeyManagementService>> {
    let ctx = ctx.ok_or_else(|| anyhow::anyhow!("AWS KMS requires an AWS context"))?;
    Ok(Arc::new(crate::kms_aws::AwsKms::new(ctx)))
}

#[cfg(not(feature = "aws"))]
fn aws_kms(_ctx: Option<&AwsContextRef>) -> anyhow::Result<Arc<dyn KeyManagementService>> {
    anyhow::bail!("Enable feature 'aws' to use AWS KMS")
}

#[cfg(feature = "aws")]
fn aws_services(
    ctx: &AwsContextRef,
    kms: Arc<dyn KeyManagementService>,
) -> anyhow::Result<Services> {
    Ok(Services {
        kms,
        objects: Arc::new(crate::store_s3::S3ObjectStore::new(ctx)),
        table: Arc::new(crate::table_dynamodb::DynamoDbTable::new(ctx)),
        logs: Arc::new(crate::logs_cloudwatch::CloudWatchLogs::new(ctx)),
    })
}

#[cfg(not(feature = "aws"))]
fn aws_services(
    _ctx: &AwsContextRef,
    _kms: Arc<dyn KeyManagementService>,
) -> anyhow::Result<Services> {
    anyhow::bail!("Enable feature 'aws' to use AWS services")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_backend_and_kms() {
        assert_eq!(Backend::parse("AWS"), Some(Backend::Aws));
        assert_eq!(Backend::parse("memory"), Some(Backend::Memory));
        assert_eq!(Backend::parse("gcp"), None);
        assert_eq!(KmsChoice::parse("aws", None), Some(KmsChoice::Aws));
        assert_eq!(
            KmsChoice::parse("static", Some("00".repeat(32))),
            Some(KmsChoice::Static {
                master_key_hex: Some("00".repeat(32))
            })
        );
        assert_eq!(KmsChoice::parse("vault", None), None);
    }

    #[test]
    fn memory_backend_with_static_kms_needs_no_runtime() {
        let services = build_services(
            Backend::Memory,
            &KmsChoice::Static {
                master_key_hex: None,
            },
            &AwsOptions::default(),
            None,
        )
        .unwrap();
        let blob = services.kms.encrypt("k", b"x").unwrap();
        assert!(!blob.is_empty());
        assert!(services.objects.get_object("b", "k").unwrap().is_none());
    }

    #[test]
    fn bad_static_key_is_rejected() {
        let res = build_services(
            Backend::Memory,
            &KmsChoice::Static {
                master_key_hex: Some("abcd".into()),
            },
            &AwsOptions::default(),
            None,
        );
        assert!(res.is_err());
    }
}
