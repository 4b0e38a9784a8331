use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use futures::{stream, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::{
    error::Result,
    kinesis::{PutReceipt, StreamClient, StreamDescriptor},
    util::retry::{with_retry, FixedCountWithDelayStrategy},
};

const PUT_ATTEMPTS: usize = 5;
const PUT_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Publishes to one stream under a single constant partition key, so every
/// record lands on the same shard in publish order.
pub struct Publisher<C: StreamClient> {
    client: Arc<C>,
    stream: StreamDescriptor,
    partition_key: String,
}

impl<C: StreamClient> Publisher<C> {
    pub fn new(client: Arc<C>, stream: StreamDescriptor, partition_key: impl Into<String>) -> Self {
        Self {
            client,
            stream,
            partition_key: partition_key.into(),
        }
    }

    pub async fn publish(&self, message: &str) -> Result<PutReceipt> {
        let data = Bytes::copy_from_slice(message.as_bytes());
        debug!("> {:?}", data.as_ref());
        with_retry(
            || {
                self.client
                    .put_record(&self.stream, &self.partition_key, data.clone())
            },
            FixedCountWithDelayStrategy::new("put_record", PUT_ATTEMPTS, PUT_RETRY_DELAY),
        )
        .await
    }

    /// Publishes one message at a time; the next put starts only after the previous one returned.
    pub async fn publish_all(&self, messages: &[String]) -> Result<Vec<PutReceipt>> {
        info!("Sending {} messages to {}...", messages.len(), self.stream);
        let receipts: Vec<PutReceipt> = stream::iter(messages)
            .then(|message| self.publish(message))
            .try_collect()
            .await?;
        info!("Send finished.");
        Ok(receipts)
    }
}
