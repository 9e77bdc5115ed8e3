use std::sync::Arc;
use std::time::Instant;

use crate::error::Error;
use crate::locator;
use crate::metrics;
use crate::traits::LogService;
use crate::types::LogEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub group: String,
    pub stream: String,
    pub stream_created: bool,
    pub timestamp_ms: i64,
}

/// `{pod_ip}-POD-{pod_namespace}`; absent parts render empty.
pub fn stream_name(pod_ip: Option<&str>, pod_namespace: Option<&str>) -> String {
    format!(
        "{}-POD-{}",
        pod_ip.unwrap_or_default(),
        pod_namespace.unwrap_or_default()
    )
}

#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct LogDelivery {
    service: Arc<dyn LogService>,
}

impl LogDelivery {
    pub fn new(service: Arc<dyn LogService>) -> Self {
        Self { service }
    }

    /// Writes `body` as one event to `stream` in the group named by
    /// `log_group_arn`, creating the stream first if it is missing.
    pub fn deliver(
        &self,
        log_group_arn: &str,
        stream: &str,
        body: &str,
    ) -> Result<Delivered, Error> {
        let group = locator::log_group_name(log_group_arn)?;
        let start = Instant::now();

        let stream_created = self
            .service
            .create_log_stream(&group, stream)
            .map_err(|source| {
                log::error!("error creating log stream {group}/{stream}: {source}");
                Error::LogStreamCreateFailed {
                    group: group.clone(),
                    stream: stream.to_string(),
                    source,
                }
            })?;
        if stream_created {
            log::info!("created log stream {group}/{stream}");
        }

        let event = LogEvent::now(body);
        self.service
            .put_log_event(&group, stream, &event)
            .map_err(|source| Error::LogDeliveryFailed {
                group: group.clone(),
                stream: stream.to_string(),
                source,
            })?;
        metrics::record_deliver(start);

        Ok(Delivered {
            group,
            stream: stream.to_string(),
            stream_created,
            timestamp_ms: event.timestamp_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLogs;

    const GROUP_ARN: &str = "arn:aws:logs:us-east-1:123456789012:log-group:synthetic:*";

    struct FailingLogs {
        create: &'static str,
    }
    impl LogService for FailingLogs {
        fn create_log_stream(&self, _g: &str, _s: &str) -> Result<bool, anyhow::Error> {
            match self.create {
                "exists" => Ok(false),
                other => Err(anyhow::anyhow!("{other}")),
            }
        }
        fn put_log_event(&self, _g: &str, _s: &str, _e: &LogEvent) -> Result<(), anyhow::Error> {
            Err(anyhow::anyhow!("ThrottlingException"))
        }
    }

    #[test]
    fn stream_name_template() {
        assert_eq!(
            stream_name(Some("10.0.3.7"), Some("load")),
            "10.0.3.7-POD-load"
        );
        assert_eq!(stream_name(None, None), "-POD-");
    }

    #[test]
    fn second_delivery_reuses_stream() {
        let logs = Arc::new(InMemoryLogs::new());
        let delivery = LogDelivery::new(logs.clone());
        let first = delivery.deliver(GROUP_ARN, "s", "one").unwrap();
        let second = delivery.deliver(GROUP_ARN, "s", "two").unwrap();
        assert!(first.stream_created);
        assert!(!second.stream_created);
        assert_eq!(first.group, "synthetic");

        let events = logs.events("synthetic", "s");
        let bodies: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(bodies, ["one", "two"]);
        assert!(events[0].timestamp_ms <= events[1].timestamp_ms);
    }

    #[test]
    fn create_failure_other_than_exists_is_fatal() {
        let delivery = LogDelivery::new(Arc::new(FailingLogs {
            create: "AccessDeniedException",
        }));
        let err = delivery.deliver(GROUP_ARN, "s", "x").unwrap_err();
        assert!(
            matches!(err, Error::LogStreamCreateFailed { ref group, .. } if group == "synthetic"),
            "{err:?}"
        );
    }

    #[test]
    fn put_failure_is_log_delivery_failed() {
        let delivery = LogDelivery::new(Arc::new(FailingLogs { create: "exists" }));
        let err = delivery.deliver(GROUP_ARN, "s", "x").unwrap_err();
        assert!(matches!(err, Error::LogDeliveryFailed { .. }), "{err:?}");
    }

    #[test]
    fn malformed_group_arn_never_reaches_service() {
        let logs = Arc::new(InMemoryLogs::new());
        let delivery = LogDelivery::new(logs.clone());
        let err = delivery
            .deliver("arn:aws:logs:us-east-1:1", "s", "x")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLogGroup { .. }));
        assert!(!logs.has_stream("", "s"));
    }
}
