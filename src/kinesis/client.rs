use async_trait::async_trait;
use bytes::Bytes;
use rusoto_core::{credential::StaticProvider, region::Region, request::HttpClient};
use rusoto_kinesis::{
    CreateStreamInput, DeleteStreamInput, DescribeStreamSummaryInput, GetRecordsInput,
    GetShardIteratorInput, Kinesis, KinesisClient, ListShardsInput, ListStreamsInput,
    PutRecordInput,
};
use tracing::debug;

use crate::error::{Error, Result};

use super::{
    PutReceipt, RecordBatch, ShardIteratorPosition, ShardPage, StreamClient, StreamDescriptor,
    StreamStatus,
};

/// Endpoint override plus static credentials, the way an emulator is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

impl EndpointConfig {
    fn region(&self) -> Region {
        Region::Custom {
            name: self.region.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

pub struct KinesisStreamClient {
    kinesis: KinesisClient,
}

impl KinesisStreamClient {
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        let credentials =
            StaticProvider::new_minimal(endpoint.access_key.clone(), endpoint.secret_key.clone());
        let kinesis = KinesisClient::new_with(HttpClient::new()?, credentials, endpoint.region());
        debug!("Kinesis client targeting {}", endpoint.endpoint);
        Ok(Self { kinesis })
    }
}

#[async_trait]
impl StreamClient for KinesisStreamClient {
    async fn create_stream(&self, stream: &StreamDescriptor, shard_count: i64) -> Result<()> {
        let request = CreateStreamInput {
            shard_count,
            stream_name: stream.stream_name.clone(),
            ..Default::default()
        };
        self.kinesis.create_stream(request).await?;
        Ok(())
    }

    async fn delete_stream(&self, stream: &StreamDescriptor) -> Result<()> {
        let request = DeleteStreamInput {
            stream_name: stream.stream_name.clone(),
            ..Default::default()
        };
        self.kinesis.delete_stream(request).await?;
        Ok(())
    }

    async fn stream_status(&self, stream: &StreamDescriptor) -> Result<StreamStatus> {
        let request = DescribeStreamSummaryInput {
            stream_name: stream.stream_name.clone(),
        };
        let response = self.kinesis.describe_stream_summary(request).await?;
        Ok(StreamStatus::parse(
            &response.stream_description_summary.stream_status,
        ))
    }

    async fn list_shards(
        &self,
        stream: &StreamDescriptor,
        next_token: Option<String>,
    ) -> Result<ShardPage> {
        // The service rejects a stream name alongside a continuation token.
        let request = match next_token {
            Some(token) => ListShardsInput {
                next_token: Some(token),
                ..Default::default()
            },
            None => ListShardsInput {
                stream_name: Some(stream.stream_name.clone()),
                ..Default::default()
            },
        };
        let response = self.kinesis.list_shards(request).await?;
        Ok(ShardPage {
            shards: response.shards.unwrap_or_default(),
            next_token: response.next_token,
        })
    }

    async fn shard_iterator(
        &self,
        stream: &StreamDescriptor,
        shard_id: &str,
        position: &ShardIteratorPosition,
    ) -> Result<String> {
        let request = GetShardIteratorInput {
            shard_id: shard_id.to_string(),
            shard_iterator_type: position.iterator_type().to_string(),
            starting_sequence_number: position.sequence_number().map(str::to_string),
            stream_name: stream.stream_name.clone(),
            ..Default::default()
        };
        self.kinesis
            .get_shard_iterator(request)
            .await?
            .shard_iterator
            .ok_or_else(|| Error::MissingShardIterator(shard_id.to_string()))
    }

    async fn get_records(&self, shard_iterator: &str, limit: Option<i64>) -> Result<RecordBatch> {
        let request = GetRecordsInput {
            limit,
            shard_iterator: shard_iterator.to_string(),
        };
        let response = self.kinesis.get_records(request).await?;
        Ok(RecordBatch {
            records: response.records,
        })
    }

    async fn put_record(
        &self,
        stream: &StreamDescriptor,
        partition_key: &str,
        data: Bytes,
    ) -> Result<PutReceipt> {
        let request = PutRecordInput {
            data,
            partition_key: partition_key.to_string(),
            stream_name: stream.stream_name.clone(),
            ..Default::default()
        };
        let response = self.kinesis.put_record(request).await?;
        Ok(PutReceipt {
            shard_id: response.shard_id,
            sequence_number: response.sequence_number,
        })
    }

    async fn list_streams(&self) -> Result<Vec<String>> {
        let response = self
            .kinesis
            .list_streams(ListStreamsInput::default())
            .await?;
        Ok(response.stream_names)
    }
}
