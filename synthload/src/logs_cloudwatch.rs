use aws_sdk_cloudwatchlogs::{types::InputLogEvent, Client};

use crate::aws_runtime::AwsContext;
use crate::traits::LogService;
use crate::types::LogEvent;

#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct CloudWatchLogs {
    client: Client,
    ctx: AwsContext,
}

impl CloudWatchLogs {
    pub fn new(ctx: &AwsContext) -> Self {
        let mut b = aws_sdk_cloudwatchlogs::config::Builder::from(ctx.sdk_config());
        if let Some(url) = ctx.endpoint_url() {
            b = b.endpoint_url(url);
        }
        Self {
            client: Client::from_conf(b.build()),
            ctx: ctx.clone(),
        }
    }
}

impl LogService for CloudWatchLogs {
    fn create_log_stream(&self, group: &str, stream: &str) -> Result<bool, anyhow::Error> {
        let out = self.ctx.block_on(async {
            self.client
                .create_log_stream()
                .log_group_name(group)
                .log_stream_name(stream)
                .send()
                .await
        });
        match out {
            Ok(_) => Ok(true),
            Err(e) => {
                let exists = e
                    .as_service_error()
                    .map(|se| se.is_resource_already_exists_exception())
                    .unwrap_or(false);
                if exists {
                    Ok(false)
                } else {
                    Err(anyhow::anyhow!(e))
                }
            }
        }
    }

    fn put_log_event(
        &self,
        group: &str,
        stream: &str,
        event: &LogEvent,
    ) -> Result<(), anyhow::Error> {
        let input = InputLogEvent::builder()
            .timestamp(event.timestamp_ms)
            .message(event.message.clone())
            .build()?;
        self.ctx.block_on(async {
            self.client
                .put_log_events()
                .log_group_name(group)
                .log_stream_name(stream)
                .log_events(input)
                .send()
                .await
        })?;
        Ok(())
    }
}
