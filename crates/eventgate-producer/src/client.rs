//! Abstract log client boundary.
//!
//! The pipeline does not speak a broker wire protocol itself; it hands
//! records to an injected [`LogClient`]. Batching, compression and linger are
//! the client's concern, configured through [`LogClientConfig`] — the
//! producer's contract is indifferent to whether a given call is physically
//! batched.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::ProduceError;
use crate::record::{DeliveryResult, OutboundRecord};

/// Acknowledgment level required before a write counts as delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckLevel {
    /// Fire and forget.
    None,
    /// Leader replica only.
    Leader,
    /// All in-sync replicas.
    #[default]
    All,
}

/// Delivery-layer knobs passed to the log client at construction.
///
/// These are configuration inputs, not pipeline logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogClientConfig {
    /// Broker addresses, bare `host:port` form.
    pub brokers: Vec<String>,
    /// Required acknowledgment level.
    pub ack_level: AckLevel,
    /// Upper bound on a produce batch, in bytes.
    pub batch_max_bytes: usize,
    /// How long the client may hold records hoping to fill a batch.
    pub linger: Duration,
}

impl Default for LogClientConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            ack_level: AckLevel::All,
            batch_max_bytes: 1_000_000,
            linger: Duration::from_millis(5),
        }
    }
}

/// Resolves exactly once with the delivery outcome of one record.
///
/// Returned by [`LogClient::produce`]; the sender half lives inside the
/// client and fires when the broker acknowledges (or definitively fails) the
/// write.
#[derive(Debug)]
pub struct DeliveryReceipt {
    rx: oneshot::Receiver<Result<DeliveryResult, ProduceError>>,
}

impl DeliveryReceipt {
    /// Create a linked sender/receipt pair. Client implementations keep the
    /// sender and complete it from their delivery path.
    pub fn channel() -> (
        oneshot::Sender<Result<DeliveryResult, ProduceError>>,
        DeliveryReceipt,
    ) {
        let (tx, rx) = oneshot::channel();
        (tx, DeliveryReceipt { rx })
    }

    /// Wait for the delivery outcome. A sender dropped without completing
    /// (client torn down mid-flight) reads as [`ProduceError::Closed`].
    pub async fn wait(self) -> Result<DeliveryResult, ProduceError> {
        self.rx.await.unwrap_or(Err(ProduceError::Closed))
    }
}

/// The underlying partitioned-log client.
///
/// Implementations must be internally synchronized: all pipeline methods call
/// `produce` concurrently and never assume exclusive access.
#[async_trait]
pub trait LogClient: Send + Sync {
    /// Append one record to the client's delivery queue, in call order.
    ///
    /// Enqueue-time failures (oversized record, closed client) are returned
    /// here; anything that happens after handoff — broker errors, the
    /// acknowledgment itself — comes through the receipt. The receipt
    /// resolves exactly once.
    async fn produce(&self, record: OutboundRecord) -> Result<DeliveryReceipt, ProduceError>;
}
