//! Harness configuration
//!
//! Every setting can be overridden from the environment. Boolean settings
//! accept `true`, `1` or `yes`, in any case.
//!
//! - `KINESIS_SMOKE_STREAM`: stream name (default: `stream`)
//! - `KINESIS_SMOKE_UNIQUE_STREAM`: append a random suffix to the stream name (default: false)
//! - `KINESIS_SMOKE_SHARDS`: shard count (default: 1)
//! - `KINESIS_SMOKE_PARTITION_KEY`: partition key for every record (default: `partition_key`)
//! - `KINESIS_SMOKE_MESSAGES`: number of messages to publish (default: 10)
//! - `KINESIS_SMOKE_MESSAGE_PREFIX`: message prefix (default: `msg_`)
//! - `KINESIS_SMOKE_POLL_INTERVAL_MS`: activation poll delay (default: 1000)
//! - `KINESIS_SMOKE_MAX_POLLS`: activation poll ceiling, `0` for none (default: 120)
//! - `KINESIS_SMOKE_DELETE_STREAM`: delete the stream when the run ends, pass or fail (default: false)
//! - `KINESIS_SMOKE_ENDPOINT`: use a running endpoint instead of starting LocalStack
//! - `KINESIS_SMOKE_REGION`: signing region (default: `us-east-1`)
//! - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`: static credentials (default: `test`)
//! - `KINESIS_SMOKE_LOCALSTACK_TAG`: LocalStack image tag (default: `3.8`)

use std::{str::FromStr, time::Duration};

use crate::activation::PollPolicy;

/// What to create, publish and expect back.
#[derive(Debug, Clone)]
pub struct SmokeConfig {
    pub stream_name: String,
    pub unique_stream: bool,
    pub shard_count: i64,
    pub partition_key: String,
    pub message_count: usize,
    pub message_prefix: String,
    pub poll: PollPolicy,
    pub delete_stream_on_finish: bool,
    pub emulator: EmulatorConfig,
}

/// How to reach the service.
#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    /// A running endpoint; `None` starts a LocalStack container.
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub localstack_tag: String,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            stream_name: "stream".to_string(),
            unique_stream: false,
            shard_count: 1,
            partition_key: "partition_key".to_string(),
            message_count: 10,
            message_prefix: "msg_".to_string(),
            poll: PollPolicy::default(),
            delete_stream_on_finish: false,
            emulator: EmulatorConfig::default(),
        }
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: "us-east-1".to_string(),
            access_key: "test".to_string(),
            secret_key: "test".to_string(),
            localstack_tag: "3.8".to_string(),
        }
    }
}

impl SmokeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let max_polls = parse_or(&lookup, "KINESIS_SMOKE_MAX_POLLS", 120usize);
        Self {
            stream_name: lookup("KINESIS_SMOKE_STREAM").unwrap_or(defaults.stream_name),
            unique_stream: flag(&lookup, "KINESIS_SMOKE_UNIQUE_STREAM"),
            shard_count: parse_or(&lookup, "KINESIS_SMOKE_SHARDS", defaults.shard_count),
            partition_key: lookup("KINESIS_SMOKE_PARTITION_KEY")
                .unwrap_or(defaults.partition_key),
            message_count: parse_or(&lookup, "KINESIS_SMOKE_MESSAGES", defaults.message_count),
            message_prefix: lookup("KINESIS_SMOKE_MESSAGE_PREFIX")
                .unwrap_or(defaults.message_prefix),
            poll: PollPolicy {
                interval: Duration::from_millis(parse_or(
                    &lookup,
                    "KINESIS_SMOKE_POLL_INTERVAL_MS",
                    1000u64,
                )),
                max_attempts: if max_polls == 0 { None } else { Some(max_polls) },
            },
            delete_stream_on_finish: flag(&lookup, "KINESIS_SMOKE_DELETE_STREAM"),
            emulator: EmulatorConfig {
                endpoint: lookup("KINESIS_SMOKE_ENDPOINT").filter(|e| !e.is_empty()),
                region: lookup("KINESIS_SMOKE_REGION").unwrap_or(defaults.emulator.region),
                access_key: lookup("AWS_ACCESS_KEY_ID").unwrap_or(defaults.emulator.access_key),
                secret_key: lookup("AWS_SECRET_ACCESS_KEY")
                    .unwrap_or(defaults.emulator.secret_key),
                localstack_tag: lookup("KINESIS_SMOKE_LOCALSTACK_TAG")
                    .unwrap_or(defaults.emulator.localstack_tag),
            },
        }
    }

    /// `msg_0`, `msg_1`, ... up to `message_count`.
    pub fn messages(&self) -> Vec<String> {
        (0..self.message_count)
            .map(|i| format!("{}{}", self.message_prefix, i))
            .collect()
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}
