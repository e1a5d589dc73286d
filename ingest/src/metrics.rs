//! Metric definitions for ingestion pipeline monitoring.

/// Label for the message stream in metrics.
pub const STREAM_LABEL: &str = "stream";

/// Counter for messages received from the queue, per stream.
pub const INGEST_MESSAGES_RECEIVED_TOTAL: &str = "ingest_messages_received_total";

/// Counter for messages fully persisted to the store, per stream.
pub const INGEST_MESSAGES_STORED_TOTAL: &str = "ingest_messages_stored_total";

/// Counter for queue fetch cycles that failed, per stream.
pub const INGEST_QUEUE_FETCH_FAILURES_TOTAL: &str = "ingest_queue_fetch_failures_total";

/// Counter for store writes that failed and dropped a message, per stream.
pub const INGEST_STORE_WRITE_FAILURES_TOTAL: &str = "ingest_store_write_failures_total";

/// Counter for messages skipped because their payload could not be parsed, per stream.
pub const INGEST_MALFORMED_MESSAGES_TOTAL: &str = "ingest_malformed_messages_total";
