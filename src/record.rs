use bytes::Bytes;
use rusoto_kinesis::Record;

use crate::error::{Error, Result};

/// A record as read back from a shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedRecord {
    pub sequence_number: String,
    pub partition_key: String,
    pub data: Bytes,
    pub encryption_type: Option<String>,
}

impl ReceivedRecord {
    pub(crate) fn from_record(record: Record) -> Self {
        Self {
            sequence_number: record.sequence_number,
            partition_key: record.partition_key,
            data: record.data,
            encryption_type: record.encryption_type,
        }
    }

    /// The payload as UTF-8 text.
    pub fn decode(&self) -> Result<String> {
        String::from_utf8(self.data.to_vec()).map_err(|source| Error::Decode {
            sequence_number: self.sequence_number.clone(),
            source,
        })
    }
}
