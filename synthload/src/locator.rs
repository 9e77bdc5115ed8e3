//! Resource locator parsing.
//!
//! Locators are ARN-shaped strings,
//! `arn:{partition}:{service}:{region}:{account}:{resource...}`. Only the
//! segment positions matter here: storage names live at segment 5 and the
//! log group name at segment 6. Everything is parsed fresh on every call.

use crate::error::Error;

const MIN_SEGMENTS: usize = 6;
const RESOURCE_SEGMENT: usize = 5;
const LOG_GROUP_SEGMENT: usize = 6;
const TABLE_PREFIX: &str = "table/";
const PARTITIONS: &[&str] = &["aws", "aws-cn", "aws-us-gov"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    ObjectStore,
    KeyValueTable,
    LogGroup,
}

impl ServiceKind {
    fn from_service(service: &str) -> Option<Self> {
        match service {
            "s3" => Some(ServiceKind::ObjectStore),
            "dynamodb" => Some(ServiceKind::KeyValueTable),
            "logs" => Some(ServiceKind::LogGroup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageDestination {
    ObjectStore { bucket: String },
    KeyValueTable { table: String },
}

impl StorageDestination {
    pub fn name(&self) -> &str {
        match self {
            StorageDestination::ObjectStore { bucket } => bucket,
            StorageDestination::KeyValueTable { table } => table,
        }
    }
}

impl std::fmt::Display for StorageDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageDestination::ObjectStore { bucket } => write!(f, "s3 bucket {bucket}"),
            StorageDestination::KeyValueTable { table } => write!(f, "dynamodb table {table}"),
        }
    }
}

/// A borrowed view over the colon-delimited segments of a locator.
#[derive(Debug, Clone)]
pub struct ResourceLocator<'a> {
    raw: &'a str,
    segments: Vec<&'a str>,
    kind: ServiceKind,
}

impl<'a> ResourceLocator<'a> {
    /// Returns `None` when the string does not start with a recognized
    /// `arn:{partition}:{service}` prefix.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let segments: Vec<&'a str> = raw.split(':').collect();
        if segments.len() < 3 || segments[0] != "arn" || !PARTITIONS.contains(&segments[1]) {
            return None;
        }
        let kind = ServiceKind::from_service(segments[2])?;
        Some(Self {
            raw,
            segments,
            kind,
        })
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn partition(&self) -> &'a str {
        self.segments[1]
    }

    pub fn region(&self) -> Option<&'a str> {
        self.segment(3)
    }

    pub fn account(&self) -> Option<&'a str> {
        self.segment(4)
    }

    pub fn resource(&self) -> Option<&'a str> {
        self.segment(RESOURCE_SEGMENT)
    }

    pub fn segment(&self, idx: usize) -> Option<&'a str> {
        self.segments.get(idx).copied()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }
}

/// Resolves a storage locator to the bucket or table it names.
pub fn resolve(locator: &str) -> Result<StorageDestination, Error> {
    let parsed = ResourceLocator::parse(locator).ok_or_else(|| Error::UnsupportedDestination {
        locator: locator.to_string(),
    })?;
    let invalid = |reason| Error::InvalidStorageTarget {
        locator: locator.to_string(),
        reason,
    };
    let resource = match parsed.resource() {
        _ if parsed.kind() == ServiceKind::LogGroup => "",
        Some(r) if parsed.segment_count() >= MIN_SEGMENTS => r,
        _ => return Err(invalid("expected at least 6 colon-delimited segments")),
    };
    let destination = match parsed.kind() {
        ServiceKind::ObjectStore => StorageDestination::ObjectStore {
            bucket: resource.to_string(),
        },
        ServiceKind::KeyValueTable => StorageDestination::KeyValueTable {
            table: resource
                .strip_prefix(TABLE_PREFIX)
                .unwrap_or(resource)
                .to_string(),
        },
        ServiceKind::LogGroup => {
            return Err(Error::UnsupportedDestination {
                locator: locator.to_string(),
            })
        }
    };
    if destination.name().is_empty() {
        return Err(invalid("empty resource name"));
    }
    Ok(destination)
}

/// Extracts the log group name (segment 6) from a log group locator.
pub fn log_group_name(locator: &str) -> Result<String, Error> {
    let invalid = |reason| Error::InvalidLogGroup {
        locator: locator.to_string(),
        reason,
    };
    let parsed = ResourceLocator::parse(locator).ok_or_else(|| invalid("not a log group ARN"))?;
    if parsed.kind() != ServiceKind::LogGroup {
        return Err(invalid("not a log group ARN"));
    }
    match parsed.segment(LOG_GROUP_SEGMENT) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        Some(_) => Err(invalid("empty log group name")),
        None => Err(invalid("expected at least 7 colon-delimited segments")),
    }
}
