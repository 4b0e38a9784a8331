use std::time::Duration;

use tracing::info;

use crate::{
    error::{Error, Result},
    kinesis::{StreamClient, StreamDescriptor, StreamStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls for as long as the stream stays transitional.
    pub max_attempts: Option<usize>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: Some(120),
        }
    }
}

/// Polls the stream status until it is active and returns the number of polls taken.
///
/// Creating and updating streams are waited on with a fixed delay. A deleting
/// stream or a status the harness does not know fails immediately.
pub async fn wait_for_active<C: StreamClient + ?Sized>(
    client: &C,
    stream: &StreamDescriptor,
    policy: PollPolicy,
) -> Result<usize> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match client.stream_status(stream).await? {
            StreamStatus::Active => return Ok(attempts),
            status @ (StreamStatus::Creating | StreamStatus::Updating) => {
                if let Some(max_attempts) = policy.max_attempts {
                    if attempts >= max_attempts {
                        return Err(Error::ActivationTimeout {
                            stream: stream.stream_name.clone(),
                            attempts,
                        });
                    }
                }
                info!("Waiting for stream {} to activate ({})...", stream, status);
                tokio::time::sleep(policy.interval).await;
            }
            StreamStatus::Deleting => return Err(Error::StreamDeleting(stream.stream_name.clone())),
            StreamStatus::Unknown(status) => return Err(Error::UnexpectedStatus(status)),
        }
    }
}
