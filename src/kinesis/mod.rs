//! The stream model the harness observes and the client seam it talks through.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use rand::{distributions::Alphanumeric, Rng};
use rusoto_kinesis::{Record, Shard};

use crate::error::Result;

mod client;

pub use client::{EndpointConfig, KinesisStreamClient};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamDescriptor {
    pub stream_name: String,
}

impl StreamDescriptor {
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
        }
    }

    /// A stream name that will not collide with earlier runs against the same endpoint.
    pub fn unique(prefix: &str) -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        Self::new(format!("{}-{}", prefix, suffix))
    }
}

impl fmt::Display for StreamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stream_name)
    }
}

/// Lifecycle status reported by the service. The harness only ever observes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStatus {
    Creating,
    Active,
    Updating,
    Deleting,
    Unknown(String),
}

impl StreamStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "CREATING" => StreamStatus::Creating,
            "ACTIVE" => StreamStatus::Active,
            "UPDATING" => StreamStatus::Updating,
            "DELETING" => StreamStatus::Deleting,
            other => StreamStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StreamStatus::Creating => "CREATING",
            StreamStatus::Active => "ACTIVE",
            StreamStatus::Updating => "UPDATING",
            StreamStatus::Deleting => "DELETING",
            StreamStatus::Unknown(status) => status,
        }
    }

    /// Creating and updating streams settle on their own; everything else is final.
    pub fn is_transitional(&self) -> bool {
        matches!(self, StreamStatus::Creating | StreamStatus::Updating)
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a shard iterator starts reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShardIteratorPosition {
    AtSequenceNumber(String),
    AfterSequenceNumber(String),
    TrimHorizon,
    Latest,
}

impl ShardIteratorPosition {
    pub fn iterator_type(&self) -> &'static str {
        match self {
            ShardIteratorPosition::AtSequenceNumber(_) => "AT_SEQUENCE_NUMBER",
            ShardIteratorPosition::AfterSequenceNumber(_) => "AFTER_SEQUENCE_NUMBER",
            ShardIteratorPosition::TrimHorizon => "TRIM_HORIZON",
            ShardIteratorPosition::Latest => "LATEST",
        }
    }

    pub fn sequence_number(&self) -> Option<&str> {
        match self {
            ShardIteratorPosition::AtSequenceNumber(seq)
            | ShardIteratorPosition::AfterSequenceNumber(seq) => Some(seq),
            ShardIteratorPosition::TrimHorizon | ShardIteratorPosition::Latest => None,
        }
    }
}

/// One page of a shard listing.
#[derive(Debug, Clone, Default)]
pub struct ShardPage {
    pub shards: Vec<Shard>,
    pub next_token: Option<String>,
}

/// One batch of records from a shard iterator.
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub records: Vec<Record>,
}

/// Where the service placed a published record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    pub shard_id: String,
    pub sequence_number: String,
}

#[async_trait]
pub trait StreamClient: Send + Sync {
    async fn create_stream(&self, stream: &StreamDescriptor, shard_count: i64) -> Result<()>;

    async fn delete_stream(&self, stream: &StreamDescriptor) -> Result<()>;

    async fn stream_status(&self, stream: &StreamDescriptor) -> Result<StreamStatus>;

    /// Fetches a single page; `next_token` continues a previous listing.
    async fn list_shards(
        &self,
        stream: &StreamDescriptor,
        next_token: Option<String>,
    ) -> Result<ShardPage>;

    async fn shard_iterator(
        &self,
        stream: &StreamDescriptor,
        shard_id: &str,
        position: &ShardIteratorPosition,
    ) -> Result<String>;

    async fn get_records(&self, shard_iterator: &str, limit: Option<i64>) -> Result<RecordBatch>;

    async fn put_record(
        &self,
        stream: &StreamDescriptor,
        partition_key: &str,
        data: Bytes,
    ) -> Result<PutReceipt>;

    async fn list_streams(&self) -> Result<Vec<String>>;
}
