use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    error::Result,
    kinesis::{ShardIteratorPosition, StreamClient, StreamDescriptor},
    record::ReceivedRecord,
    shard::StreamLayout,
};

/// Reads a single-shard stream back from the start of the shard.
pub struct ShardReader<C: StreamClient> {
    client: Arc<C>,
    stream: StreamDescriptor,
    layout: StreamLayout<C>,
    batch_limit: Option<i64>,
}

impl<C: StreamClient> ShardReader<C> {
    pub fn new(client: Arc<C>, stream: StreamDescriptor) -> Self {
        Self {
            layout: StreamLayout::new(stream.clone(), client.clone()),
            client,
            stream,
            batch_limit: None,
        }
    }

    pub fn with_batch_limit(mut self, limit: i64) -> Self {
        self.batch_limit = Some(limit);
        self
    }

    /// Fetches one batch starting at the shard's first sequence number.
    pub async fn read_records(&self) -> Result<Vec<ReceivedRecord>> {
        let shard = self.layout.single_shard().await?;
        let position = ShardIteratorPosition::AtSequenceNumber(
            shard.sequence_number_range.starting_sequence_number,
        );
        let iterator = self
            .client
            .shard_iterator(&self.stream, &shard.shard_id, &position)
            .await?;
        let batch = self.client.get_records(&iterator, self.batch_limit).await?;
        info!("Reading messages yielded {} results.", batch.records.len());

        Ok(batch
            .records
            .into_iter()
            .map(ReceivedRecord::from_record)
            .inspect(|record| debug!("< {:?}", record.data.as_ref()))
            .collect())
    }

    pub async fn read_messages(&self) -> Result<Vec<String>> {
        info!("Reading messages from {}...", self.stream);
        self.read_records()
            .await?
            .iter()
            .map(ReceivedRecord::decode)
            .collect()
    }
}
