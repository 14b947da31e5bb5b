//! Pipeline facade: the single "submit business event" entry point.
//!
//! Composes the schema cache, the wire codec and the producer core. The HTTP
//! layer calls [`Pipeline::submit`] with a typed record and a topic name and
//! gets back a [`DeliveryResult`] or a classified error — nothing else
//! crosses that boundary; the facade knows nothing about status codes or
//! request framing.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use eventgate_schema::{codec, RegistryClient, SchemaCache};
use serde::Serialize;
use tracing::debug;

use crate::client::LogClient;
use crate::config::{ConfigError, PipelineConfig};
use crate::error::PipelineError;
use crate::producer::{DeliveryHandle, ProducerCore};
use crate::record::{DeliveryResult, OutboundRecord};

/// The schema-aware encode-and-produce pipeline.
pub struct Pipeline {
    cache: SchemaCache,
    producer: ProducerCore,
    request_timeout: Duration,
    shutdown_grace: Duration,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Submit one business event synchronously: resolve the schema for
    /// `{topic}-value`, encode, and wait for the broker acknowledgment.
    ///
    /// Schema resolution or encoding failure short-circuits before any
    /// network send — a malformed record never reaches the log client.
    pub async fn submit<T: Serialize>(
        &self,
        topic: &str,
        record: &T,
    ) -> Result<DeliveryResult, PipelineError> {
        let outbound = self.prepare(topic, None, record).await?;
        let result = self.producer.send_sync(outbound, self.request_timeout).await?;
        debug!(
            topic = %result.topic,
            partition = result.partition,
            offset = result.offset,
            "event delivered"
        );
        Ok(result)
    }

    /// Submit with a partitioning key. Events sharing a key land on the same
    /// partition and keep their submit order.
    pub async fn submit_with_key<T: Serialize>(
        &self,
        topic: &str,
        key: &[u8],
        record: &T,
    ) -> Result<DeliveryResult, PipelineError> {
        let outbound = self
            .prepare(topic, Some(Bytes::copy_from_slice(key)), record)
            .await?;
        let result = self.producer.send_sync(outbound, self.request_timeout).await?;
        debug!(
            topic = %result.topic,
            partition = result.partition,
            offset = result.offset,
            "event delivered"
        );
        Ok(result)
    }

    /// Fire-and-forget path: the returned handle resolves exactly once with
    /// the delivery outcome, from a completion task.
    pub async fn submit_async<T: Serialize>(
        &self,
        topic: &str,
        record: &T,
    ) -> Result<DeliveryHandle, PipelineError> {
        let outbound = self.prepare(topic, None, record).await?;
        Ok(self.producer.send_async(outbound).await?)
    }

    /// The schema cache, exposed so operators can force a refresh after a
    /// registry-side schema rotation.
    pub fn schema_cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Drain in-flight sends (bounded by the configured grace period) and
    /// release the log client.
    pub async fn close(self) {
        self.producer.close(self.shutdown_grace).await;
    }

    async fn prepare<T: Serialize>(
        &self,
        topic: &str,
        key: Option<Bytes>,
        record: &T,
    ) -> Result<OutboundRecord, PipelineError> {
        let subject = format!("{topic}-value");
        let entry = self.cache.resolve(&subject).await?;
        let envelope = codec::encode(&entry, record)?;

        Ok(match key {
            Some(key) => OutboundRecord::with_key(topic, key, envelope),
            None => OutboundRecord::new(topic, envelope),
        })
    }
}

/// Builder for [`Pipeline`]: configuration plus the injected log client.
pub struct PipelineBuilder {
    config: PipelineConfig,
    log_client: Option<Arc<dyn LogClient>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            log_client: None,
        }
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject the log client. Required; the pipeline never constructs its
    /// own broker connection.
    pub fn log_client(mut self, client: Arc<dyn LogClient>) -> Self {
        self.log_client = Some(client);
        self
    }

    pub fn build(self) -> Result<Pipeline, ConfigError> {
        self.config.validate()?;
        let client = self.log_client.ok_or(ConfigError::MissingLogClient)?;

        let registry = RegistryClient::new(self.config.registry_base_url());

        Ok(Pipeline {
            cache: SchemaCache::new(registry),
            producer: ProducerCore::new(client),
            request_timeout: self.config.request_timeout,
            shutdown_grace: self.config.shutdown_grace,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
