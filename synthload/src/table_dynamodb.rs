use aws_sdk_dynamodb::{types::AttributeValue, Client};

use crate::aws_runtime::AwsContext;
use crate::traits::KeyValueTable;
use crate::types::Row;

#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct DynamoDbTable {
    client: Client,
    ctx: AwsContext,
}

impl DynamoDbTable {
    pub fn new(ctx: &AwsContext) -> Self {
        let mut b = aws_sdk_dynamodb::config::Builder::from(ctx.sdk_config());
        if let Some(url) = ctx.endpoint_url() {
            b = b.endpoint_url(url);
        }
        Self {
            client: Client::from_conf(b.build()),
            ctx: ctx.clone(),
        }
    }
}

impl KeyValueTable for DynamoDbTable {
    fn put_item(&self, table: &str, row: &Row) -> Result<(), anyhow::Error> {
        // unconditional put: ids are random and never checked for collisions
        self.ctx.block_on(async {
            self.client
                .put_item()
                .table_name(table)
                .item("id", AttributeValue::S(row.id.clone()))
                .item("message", AttributeValue::S(row.message.clone()))
                .send()
                .await
        })?;
        Ok(())
    }
}
