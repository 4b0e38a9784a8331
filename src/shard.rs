use std::sync::Arc;

use rusoto_kinesis::Shard;
use tracing::debug;

use crate::{
    error::{Error, Result},
    kinesis::{StreamClient, StreamDescriptor},
};

pub(crate) struct StreamLayout<C: StreamClient> {
    descriptor: StreamDescriptor,
    client: Arc<C>,
}

impl<C: StreamClient> StreamLayout<C> {
    pub(crate) fn new(descriptor: StreamDescriptor, client: Arc<C>) -> Self {
        Self { descriptor, client }
    }

    pub(crate) async fn list_shards(&self) -> Result<Vec<Shard>> {
        let mut page = self.client.list_shards(&self.descriptor, None).await?;
        let mut result = page.shards;
        while let Some(next_token) = page.next_token.take() {
            page = self
                .client
                .list_shards(&self.descriptor, Some(next_token))
                .await?;
            result.append(&mut page.shards);
        }
        debug!("Stream {} has {} shard(s)", self.descriptor, result.len());
        Ok(result)
    }

    /// The only shard of the stream; anything else is an error.
    pub(crate) async fn single_shard(&self) -> Result<Shard> {
        let mut shards = self.list_shards().await?;
        if shards.len() != 1 {
            return Err(Error::ShardCount {
                expected: 1,
                found: shards.len(),
            });
        }
        Ok(shards.remove(0))
    }
}
