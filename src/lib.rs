//! Smoke tests a Kinesis-compatible endpoint: create a stream, wait for it to
//! activate, publish a batch of messages under one partition key and read them
//! back from the start of the single shard.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kinesis_smoke::{Emulator, SmokeConfig, SmokeTest};
//!
//! # async fn example() -> kinesis_smoke::Result<()> {
//! let config = SmokeConfig::from_env();
//! let emulator = Emulator::from_config(&config.emulator).await?;
//! let client = Arc::new(emulator.connect().await?);
//! let report = SmokeTest::new(client, config).run().await?;
//! assert_eq!(report.published, report.received);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod config;
pub mod emulator;
mod error;
pub mod harness;
pub mod kinesis;
pub mod publish;
pub mod reader;
pub mod record;
mod shard;
mod util;

pub use activation::{wait_for_active, PollPolicy};
pub use config::{EmulatorConfig, SmokeConfig};
pub use emulator::Emulator;
pub use error::{Error, Result};
pub use harness::{SmokeReport, SmokeTest};
pub use kinesis::{
    EndpointConfig, KinesisStreamClient, PutReceipt, RecordBatch, ShardIteratorPosition,
    ShardPage, StreamClient, StreamDescriptor, StreamStatus,
};
pub use record::ReceivedRecord;
pub use rusoto_kinesis::{Record, SequenceNumberRange, Shard};
