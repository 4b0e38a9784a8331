use rusoto_core::{request::TlsError, RusotoError};
use rusoto_kinesis::{
    CreateStreamError, DeleteStreamError, DescribeStreamSummaryError, GetRecordsError,
    GetShardIteratorError, ListShardsError, ListStreamsError, PutRecordError,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    CreateStream(#[from] RusotoError<CreateStreamError>),

    #[error(transparent)]
    DeleteStream(#[from] RusotoError<DeleteStreamError>),

    #[error(transparent)]
    DescribeStream(#[from] RusotoError<DescribeStreamSummaryError>),

    #[error(transparent)]
    ListShards(#[from] RusotoError<ListShardsError>),

    #[error(transparent)]
    ListStreams(#[from] RusotoError<ListStreamsError>),

    #[error(transparent)]
    ShardIterator(#[from] RusotoError<GetShardIteratorError>),

    #[error(transparent)]
    GetRecords(#[from] RusotoError<GetRecordsError>),

    #[error(transparent)]
    PutRecord(#[from] RusotoError<PutRecordError>),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("Emulator failed: {0}")]
    Emulator(String),

    #[error("Stream '{0}' is being deleted")]
    StreamDeleting(String),

    #[error("Unhandled stream status: {0}")]
    UnexpectedStatus(String),

    #[error("Stream '{stream}' did not become active after {attempts} polls")]
    ActivationTimeout { stream: String, attempts: usize },

    #[error("Expected {expected} shard(s), but found {found} in the stream")]
    ShardCount { expected: usize, found: usize },

    #[error("Service returned no shard iterator for shard '{0}'")]
    MissingShardIterator(String),

    #[error("Record {sequence_number} is not valid UTF-8: {source}")]
    Decode {
        sequence_number: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Read back {received:?}, but published {published:?}")]
    Mismatch {
        published: Vec<String>,
        received: Vec<String>,
    },
}

impl Error {
    /// Whether the failure is transient and the call may be repeated as-is.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::PutRecord(RusotoError::Service(
                PutRecordError::ProvisionedThroughputExceeded(_),
            )) => true,
            Error::CreateStream(e) => is_dispatch_failure(e),
            Error::DeleteStream(e) => is_dispatch_failure(e),
            Error::DescribeStream(e) => is_dispatch_failure(e),
            Error::ListShards(e) => is_dispatch_failure(e),
            Error::ListStreams(e) => is_dispatch_failure(e),
            Error::ShardIterator(e) => is_dispatch_failure(e),
            Error::GetRecords(e) => is_dispatch_failure(e),
            Error::PutRecord(e) => is_dispatch_failure(e),
            _ => false,
        }
    }
}

// Connection refused and timeouts surface as dispatch failures while the emulator boots.
fn is_dispatch_failure<E>(e: &RusotoError<E>) -> bool {
    matches!(e, RusotoError::HttpDispatch(_))
}
