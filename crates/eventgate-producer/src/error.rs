//! Error types for the producer core and the pipeline facade.

use std::time::Duration;

use eventgate_schema::{EncodeError, SchemaFetchError};
use thiserror::Error;

/// Delivery failure surfaced by the producer core.
///
/// None of these are retried internally — retry policy belongs to the caller,
/// which knows whether a retried send risks duplication under its idempotency
/// model.
#[derive(Debug, Error)]
pub enum ProduceError {
    /// No broker could be reached for the record's topic.
    #[error("broker unreachable: {0}")]
    BrokerUnreachable(String),

    /// The record exceeds the client's configured size limit.
    #[error("record of {size} bytes exceeds the configured limit of {limit} bytes")]
    RecordTooLarge { size: usize, limit: usize },

    /// The deadline elapsed before the broker acknowledged the write.
    ///
    /// Delivery state is genuinely unknown — the record may still land.
    /// Callers must treat this as "maybe sent".
    #[error("timed out after {0:?} awaiting broker acknowledgment (delivery state unknown)")]
    AckTimeout(Duration),

    /// The client was shut down before the delivery outcome was observed.
    #[error("log client closed before delivery was acknowledged")]
    Closed,
}

/// Classified failure of a single `submit` call, preserving which stage of
/// the pipeline failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Schema(#[from] SchemaFetchError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Produce(#[from] ProduceError),
}
