use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    activation::wait_for_active,
    config::SmokeConfig,
    error::{Error, Result},
    kinesis::{StreamClient, StreamDescriptor},
    publish::Publisher,
    reader::ShardReader,
};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeReport {
    pub stream_name: String,
    pub activation_polls: usize,
    pub published: Vec<String>,
    pub received: Vec<String>,
}

/// Create, activate, publish, read back and compare, in that order.
pub struct SmokeTest<C: StreamClient> {
    client: Arc<C>,
    config: SmokeConfig,
    stream: StreamDescriptor,
}

impl<C: StreamClient> SmokeTest<C> {
    pub fn new(client: Arc<C>, config: SmokeConfig) -> Self {
        let stream = if config.unique_stream {
            StreamDescriptor::unique(&config.stream_name)
        } else {
            StreamDescriptor::new(config.stream_name.clone())
        };
        Self {
            client,
            config,
            stream,
        }
    }

    pub fn stream(&self) -> &StreamDescriptor {
        &self.stream
    }

    pub async fn run(&self) -> Result<SmokeReport> {
        self.create_stream().await?;
        let outcome = self.verify().await;
        // Once created, the stream is removed whether or not verification passed.
        if self.config.delete_stream_on_finish {
            self.delete_stream().await;
        }
        outcome
    }

    async fn verify(&self) -> Result<SmokeReport> {
        let activation_polls =
            wait_for_active(self.client.as_ref(), &self.stream, self.config.poll).await?;

        let published = self.config.messages();
        Publisher::new(
            self.client.clone(),
            self.stream.clone(),
            self.config.partition_key.clone(),
        )
        .publish_all(&published)
        .await?;

        let received = ShardReader::new(self.client.clone(), self.stream.clone())
            .read_messages()
            .await?;

        if published != received {
            return Err(Error::Mismatch {
                published,
                received,
            });
        }
        info!("Read back all {} messages in order", received.len());
        Ok(SmokeReport {
            stream_name: self.stream.stream_name.clone(),
            activation_polls,
            published,
            received,
        })
    }

    async fn create_stream(&self) -> Result<()> {
        info!(
            "Creating stream {} with {} shard(s)...",
            self.stream, self.config.shard_count
        );
        self.client
            .create_stream(&self.stream, self.config.shard_count)
            .await?;
        info!("Stream created.");
        Ok(())
    }

    async fn delete_stream(&self) {
        match self.client.delete_stream(&self.stream).await {
            Ok(()) => info!("Deleted stream {}", self.stream),
            Err(e) => warn!("Failed to delete stream {}: {}", self.stream, e),
        }
    }
}
