//! Producer core: delivery modes over the abstract log client.
//!
//! Two paths, one contract:
//!
//! - [`ProducerCore::send_sync`] blocks the calling task until the broker
//!   acknowledges the write or the deadline elapses.
//! - [`ProducerCore::send_async`] enqueues and returns a [`DeliveryHandle`]
//!   that resolves exactly once, from a delivery-completion task rather than
//!   the caller's.
//!
//! No retries happen here. Per-key ordering is delegated to the log client's
//! key→partition mapping; the core hands records over in call order and
//! imposes nothing further.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Notify};
use tracing::{debug, warn};

use crate::client::LogClient;
use crate::error::ProduceError;
use crate::record::{DeliveryResult, OutboundRecord};

/// Counter of asynchronous sends whose outcome has not been observed yet.
/// `close` drains against this.
struct InFlight {
    count: AtomicUsize,
    drained: Notify,
}

impl InFlight {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            count: AtomicUsize::new(0),
            drained: Notify::new(),
        })
    }

    fn enter(self: &Arc<Self>) -> InFlightGuard {
        self.count.fetch_add(1, Ordering::AcqRel);
        InFlightGuard {
            inner: self.clone(),
        }
    }

    fn current(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.drained.notified();
            if self.current() == 0 {
                return;
            }
            notified.await;
        }
    }
}

struct InFlightGuard {
    inner: Arc<InFlight>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.inner.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.drained.notify_waiters();
        }
    }
}

/// Resolves exactly once with the outcome of an asynchronous send.
#[derive(Debug)]
pub struct DeliveryHandle {
    rx: oneshot::Receiver<Result<DeliveryResult, ProduceError>>,
}

impl DeliveryHandle {
    /// Wait for the delivery outcome.
    pub async fn wait(self) -> Result<DeliveryResult, ProduceError> {
        self.rx.await.unwrap_or(Err(ProduceError::Closed))
    }
}

/// Delivery front-end over an injected [`LogClient`].
///
/// The client connection is acquired once at construction and released
/// exactly once when the last reference drops after [`ProducerCore::close`]
/// has drained in-flight sends.
pub struct ProducerCore {
    client: Arc<dyn LogClient>,
    in_flight: Arc<InFlight>,
}

impl ProducerCore {
    pub fn new(client: Arc<dyn LogClient>) -> Self {
        Self {
            client,
            in_flight: InFlight::new(),
        }
    }

    /// Send one record and block until the broker acknowledges it or the
    /// deadline elapses.
    ///
    /// On deadline expiry this returns [`ProduceError::AckTimeout`] — which
    /// does NOT imply the send did not happen. The record was already handed
    /// to the client; delivery state is unknown.
    pub async fn send_sync(
        &self,
        record: OutboundRecord,
        timeout: Duration,
    ) -> Result<DeliveryResult, ProduceError> {
        let topic = record.topic.clone();
        let receipt = self.client.produce(record).await?;

        match tokio::time::timeout(timeout, receipt.wait()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    topic = %topic,
                    timeout_ms = timeout.as_millis() as u64,
                    "acknowledgment deadline elapsed, delivery state unknown"
                );
                Err(ProduceError::AckTimeout(timeout))
            }
        }
    }

    /// Enqueue one record for background delivery and return immediately.
    ///
    /// The handoff to the client happens in the caller's context, so records
    /// sent on the same key keep their call order. The returned handle
    /// resolves from a completion task once the broker answers.
    pub async fn send_async(&self, record: OutboundRecord) -> Result<DeliveryHandle, ProduceError> {
        let receipt = self.client.produce(record).await?;

        let guard = self.in_flight.enter();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let outcome = receipt.wait().await;
            // receiver may have been dropped by a fire-and-forget caller
            let _ = tx.send(outcome);
            drop(guard);
        });

        Ok(DeliveryHandle { rx })
    }

    /// Number of asynchronous sends still awaiting their outcome.
    pub fn in_flight(&self) -> usize {
        self.in_flight.current()
    }

    /// Drain in-flight asynchronous sends, waiting at most `grace`, then
    /// release the client.
    pub async fn close(self, grace: Duration) {
        let pending = self.in_flight.current();
        if pending > 0 {
            debug!(pending = pending, "draining in-flight sends");
        }

        if tokio::time::timeout(grace, self.in_flight.wait_idle())
            .await
            .is_err()
        {
            warn!(
                remaining = self.in_flight.current(),
                grace_ms = grace.as_millis() as u64,
                "grace period expired with sends still in flight"
            );
        }
        // dropping self releases the last core-held reference to the client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DeliveryReceipt;
    use async_trait::async_trait;
    use bytes::Bytes;
    use eventgate_schema::Envelope;
    use tokio::sync::Mutex;

    fn record(topic: &str) -> OutboundRecord {
        OutboundRecord::with_key(topic, Bytes::from_static(b"k1"), Envelope::frame(7, b"v"))
    }

    /// Acks every record immediately at offset = call index.
    struct AckingClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LogClient for AckingClient {
        async fn produce(&self, record: OutboundRecord) -> Result<DeliveryReceipt, ProduceError> {
            let offset = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
            let (tx, receipt) = DeliveryReceipt::channel();
            let _ = tx.send(Ok(DeliveryResult {
                topic: record.topic,
                partition: 0,
                offset,
            }));
            Ok(receipt)
        }
    }

    /// Completes receipts with a broker-unreachable failure.
    struct UnreachableClient;

    #[async_trait]
    impl LogClient for UnreachableClient {
        async fn produce(&self, _record: OutboundRecord) -> Result<DeliveryReceipt, ProduceError> {
            let (tx, receipt) = DeliveryReceipt::channel();
            let _ = tx.send(Err(ProduceError::BrokerUnreachable(
                "no broker for topic".to_string(),
            )));
            Ok(receipt)
        }
    }

    /// Accepts records but never acknowledges them. Senders are parked so the
    /// receipt is neither completed nor dropped.
    struct StalledClient {
        parked: Mutex<Vec<oneshot::Sender<Result<DeliveryResult, ProduceError>>>>,
    }

    #[async_trait]
    impl LogClient for StalledClient {
        async fn produce(&self, _record: OutboundRecord) -> Result<DeliveryReceipt, ProduceError> {
            let (tx, receipt) = DeliveryReceipt::channel();
            self.parked.lock().await.push(tx);
            Ok(receipt)
        }
    }

    #[tokio::test]
    async fn send_sync_returns_broker_ack() {
        let core = ProducerCore::new(Arc::new(AckingClient {
            calls: AtomicUsize::new(0),
        }));

        let result = core
            .send_sync(record("expense-topic"), Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(result.topic, "expense-topic");
        assert_eq!(result.offset, 0);
    }

    #[tokio::test]
    async fn send_sync_surfaces_broker_unreachable_within_timeout() {
        let core = ProducerCore::new(Arc::new(UnreachableClient));

        let start = tokio::time::Instant::now();
        let err = core
            .send_sync(record("expense-topic"), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, ProduceError::BrokerUnreachable(_)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn send_sync_times_out_against_stalled_client() {
        let core = ProducerCore::new(Arc::new(StalledClient {
            parked: Mutex::new(Vec::new()),
        }));

        let err = core
            .send_sync(record("expense-topic"), Duration::from_millis(50))
            .await
            .unwrap_err();

        match err {
            ProduceError::AckTimeout(elapsed) => {
                assert_eq!(elapsed, Duration::from_millis(50));
            }
            other => panic!("expected ack timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn async_handle_resolves_with_outcome() {
        let core = ProducerCore::new(Arc::new(AckingClient {
            calls: AtomicUsize::new(0),
        }));

        let handle = core.send_async(record("expense-topic")).await.unwrap();
        let result = handle.wait().await.unwrap();
        assert_eq!(result.offset, 0);
    }

    #[tokio::test]
    async fn sequential_sends_observe_increasing_offsets() {
        let core = ProducerCore::new(Arc::new(AckingClient {
            calls: AtomicUsize::new(0),
        }));

        let first = core
            .send_sync(record("expense-topic"), Duration::from_secs(1))
            .await
            .unwrap();
        let second = core
            .send_sync(record("expense-topic"), Duration::from_secs(1))
            .await
            .unwrap();

        assert!(first.offset < second.offset);
    }

    #[tokio::test]
    async fn close_waits_for_in_flight_sends() {
        struct SlowAckClient;

        #[async_trait]
        impl LogClient for SlowAckClient {
            async fn produce(
                &self,
                record: OutboundRecord,
            ) -> Result<DeliveryReceipt, ProduceError> {
                let (tx, receipt) = DeliveryReceipt::channel();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    let _ = tx.send(Ok(DeliveryResult {
                        topic: record.topic,
                        partition: 0,
                        offset: 0,
                    }));
                });
                Ok(receipt)
            }
        }

        let core = ProducerCore::new(Arc::new(SlowAckClient));
        let handle = core.send_async(record("expense-topic")).await.unwrap();
        assert_eq!(core.in_flight(), 1);

        core.close(Duration::from_secs(1)).await;

        // the drained send still resolved its handle
        assert!(handle.wait().await.is_ok());
    }

    #[tokio::test]
    async fn close_gives_up_after_grace_period() {
        let core = ProducerCore::new(Arc::new(StalledClient {
            parked: Mutex::new(Vec::new()),
        }));

        let _handle = core.send_async(record("expense-topic")).await.unwrap();

        let start = tokio::time::Instant::now();
        core.close(Duration::from_millis(50)).await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
