use aws_config::{BehaviorVersion, Region};
use aws_sdk_sqs::Client;

use crate::error::{ErrorKind, IngestResult};
use crate::ingest_error;
use crate::queue::base::{QueueMessage, QueueSource};

/// Long-poll window requested on every fetch, in seconds.
const WAIT_TIME_SECONDS: i32 = 20;

/// An SQS-backed [`QueueSource`].
///
/// Holds the SDK client, which multiplexes all requests over a shared
/// connection pool, so clones are cheap handles.
#[derive(Debug, Clone)]
pub struct SqsQueue {
    client: Client,
}

impl SqsQueue {
    /// Builds a client for `region`, optionally overriding the endpoint for
    /// local queue emulators.
    pub async fn connect(region: &str, endpoint: Option<&str>) -> IngestResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()));
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        Ok(Self {
            client: Client::new(&sdk_config),
        })
    }
}

impl QueueSource for SqsQueue {
    fn name(&self) -> &'static str {
        "sqs"
    }

    async fn fetch(&self, queue_url: &str, max_messages: usize) -> IngestResult<Vec<QueueMessage>> {
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages as i32)
            .wait_time_seconds(WAIT_TIME_SECONDS)
            .send()
            .await
            .map_err(|err| {
                ingest_error!(
                    ErrorKind::QueueFetchFailed,
                    "Failed to receive messages from SQS",
                    format!("queue url '{queue_url}'"),
                    source: err
                )
            })?;

        let messages = output
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|message| {
                // Messages without a body or receipt handle cannot be
                // processed or removed and are left to expire.
                Some(QueueMessage {
                    body: message.body?,
                    receipt_handle: message.receipt_handle?,
                })
            })
            .collect();

        Ok(messages)
    }

    async fn remove(&self, queue_url: &str, receipt_handle: &str) -> IngestResult<()> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|err| {
                ingest_error!(
                    ErrorKind::QueueRemoveFailed,
                    "Failed to delete message from SQS",
                    format!("queue url '{queue_url}'"),
                    source: err
                )
            })?;

        Ok(())
    }
}
