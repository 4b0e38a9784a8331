//! An in-memory stand-in for the Kinesis API, scripted per test.

#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use kinesis_smoke::{
    Error, PutReceipt, Record, RecordBatch, Result, SequenceNumberRange, Shard,
    ShardIteratorPosition, ShardPage, SmokeConfig, StreamClient, StreamDescriptor, StreamStatus,
};
use rusoto_core::RusotoError;
use rusoto_kinesis::{DescribeStreamSummaryError, PutRecordError};
use tokio::sync::Mutex;

type ReadTransform = Box<dyn Fn(Vec<Record>) -> Vec<Record> + Send + Sync>;

#[derive(Default)]
struct FakeStream {
    shards: Vec<Shard>,
    records: Vec<Record>,
}

#[derive(Default)]
struct State {
    streams: HashMap<String, FakeStream>,
    statuses: VecDeque<StreamStatus>,
    shards_per_page: Option<usize>,
    throttled_puts: usize,
    read_transform: Option<ReadTransform>,
    status_calls: usize,
    put_calls: usize,
    list_shard_calls: usize,
    deleted: Vec<String>,
}

#[derive(Default)]
pub struct FakeKinesis {
    state: Mutex<State>,
}

impl FakeKinesis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statuses reported, in order, before the stream settles on `ACTIVE`.
    pub async fn script_statuses(&self, statuses: impl IntoIterator<Item = StreamStatus>) {
        self.state.lock().await.statuses.extend(statuses);
    }

    pub async fn paginate_shards(&self, per_page: usize) {
        self.state.lock().await.shards_per_page = Some(per_page);
    }

    /// Rejects the next `count` puts with a throughput error.
    pub async fn throttle_puts(&self, count: usize) {
        self.state.lock().await.throttled_puts = count;
    }

    pub async fn transform_reads(
        &self,
        transform: impl Fn(Vec<Record>) -> Vec<Record> + Send + Sync + 'static,
    ) {
        self.state.lock().await.read_transform = Some(Box::new(transform));
    }

    pub async fn status_calls(&self) -> usize {
        self.state.lock().await.status_calls
    }

    pub async fn put_calls(&self) -> usize {
        self.state.lock().await.put_calls
    }

    pub async fn list_shard_calls(&self) -> usize {
        self.state.lock().await.list_shard_calls
    }

    pub async fn deleted(&self) -> Vec<String> {
        self.state.lock().await.deleted.clone()
    }

    pub async fn stored_partition_keys(&self, stream: &str) -> Vec<String> {
        self.state
            .lock()
            .await
            .streams
            .get(stream)
            .map(|s| s.records.iter().map(|r| r.partition_key.clone()).collect())
            .unwrap_or_default()
    }
}

fn not_found(stream: &StreamDescriptor) -> Error {
    Error::DescribeStream(RusotoError::Service(
        DescribeStreamSummaryError::ResourceNotFound(format!("Stream {} not found", stream)),
    ))
}

fn sequence_number(n: usize) -> String {
    format!("4959{:052}", n)
}

#[async_trait]
impl StreamClient for FakeKinesis {
    async fn create_stream(&self, stream: &StreamDescriptor, shard_count: i64) -> Result<()> {
        let shards = (0..shard_count)
            .map(|i| Shard {
                shard_id: format!("shardId-{:012}", i),
                sequence_number_range: SequenceNumberRange {
                    starting_sequence_number: sequence_number(0),
                    ending_sequence_number: None,
                },
                ..Default::default()
            })
            .collect();
        self.state.lock().await.streams.insert(
            stream.stream_name.clone(),
            FakeStream {
                shards,
                records: Vec::new(),
            },
        );
        Ok(())
    }

    async fn delete_stream(&self, stream: &StreamDescriptor) -> Result<()> {
        let mut state = self.state.lock().await;
        state.streams.remove(&stream.stream_name);
        state.deleted.push(stream.stream_name.clone());
        Ok(())
    }

    async fn stream_status(&self, stream: &StreamDescriptor) -> Result<StreamStatus> {
        let mut state = self.state.lock().await;
        state.status_calls += 1;
        if !state.streams.contains_key(&stream.stream_name) {
            return Err(not_found(stream));
        }
        Ok(state.statuses.pop_front().unwrap_or(StreamStatus::Active))
    }

    async fn list_shards(
        &self,
        stream: &StreamDescriptor,
        next_token: Option<String>,
    ) -> Result<ShardPage> {
        let mut state = self.state.lock().await;
        state.list_shard_calls += 1;
        let per_page = state.shards_per_page;
        let shards = &state
            .streams
            .get(&stream.stream_name)
            .ok_or_else(|| not_found(stream))?
            .shards;

        let start: usize = next_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = per_page.map_or(shards.len(), |n| (start + n).min(shards.len()));
        Ok(ShardPage {
            shards: shards[start..end].to_vec(),
            next_token: if end < shards.len() {
                Some(end.to_string())
            } else {
                None
            },
        })
    }

    async fn shard_iterator(
        &self,
        stream: &StreamDescriptor,
        shard_id: &str,
        position: &ShardIteratorPosition,
    ) -> Result<String> {
        let state = self.state.lock().await;
        let records = &state
            .streams
            .get(&stream.stream_name)
            .ok_or_else(|| not_found(stream))?
            .records;
        let offset = match position {
            ShardIteratorPosition::AtSequenceNumber(seq) => records
                .iter()
                .position(|r| r.sequence_number >= *seq)
                .unwrap_or(records.len()),
            ShardIteratorPosition::AfterSequenceNumber(seq) => records
                .iter()
                .position(|r| r.sequence_number > *seq)
                .unwrap_or(records.len()),
            ShardIteratorPosition::TrimHorizon => 0,
            ShardIteratorPosition::Latest => records.len(),
        };
        Ok(format!("{}|{}|{}", stream.stream_name, shard_id, offset))
    }

    async fn get_records(&self, shard_iterator: &str, limit: Option<i64>) -> Result<RecordBatch> {
        let state = self.state.lock().await;
        let mut parts = shard_iterator.split('|');
        let stream = parts.next().unwrap();
        let offset: usize = parts.nth(1).unwrap().parse().unwrap();
        let records = &state.streams[stream].records;
        let end = limit.map_or(records.len(), |l| (offset + l as usize).min(records.len()));
        let batch = records[offset..end].to_vec();
        let batch = match &state.read_transform {
            Some(transform) => transform(batch),
            None => batch,
        };
        Ok(RecordBatch { records: batch })
    }

    async fn put_record(
        &self,
        stream: &StreamDescriptor,
        partition_key: &str,
        data: Bytes,
    ) -> Result<PutReceipt> {
        let mut state = self.state.lock().await;
        state.put_calls += 1;
        if state.throttled_puts > 0 {
            state.throttled_puts -= 1;
            return Err(Error::PutRecord(RusotoError::Service(
                PutRecordError::ProvisionedThroughputExceeded("Rate exceeded".to_string()),
            )));
        }
        let fake = state
            .streams
            .get_mut(&stream.stream_name)
            .ok_or_else(|| not_found(stream))?;
        let sequence_number = sequence_number(fake.records.len() + 1);
        let shard_id = fake.shards[0].shard_id.clone();
        fake.records.push(Record {
            data,
            partition_key: partition_key.to_string(),
            sequence_number: sequence_number.clone(),
            ..Default::default()
        });
        Ok(PutReceipt {
            shard_id,
            sequence_number,
        })
    }

    async fn list_streams(&self) -> Result<Vec<String>> {
        Ok(self.state.lock().await.streams.keys().cloned().collect())
    }
}

/// Defaults with a short poll interval; time is paused in the tests anyway.
pub fn test_config() -> SmokeConfig {
    let mut config = SmokeConfig::default();
    config.poll.interval = Duration::from_millis(10);
    config
}
