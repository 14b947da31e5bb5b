//! Record types crossing the producer boundary.

use std::time::SystemTime;

use bytes::Bytes;
use eventgate_schema::Envelope;
use serde::{Deserialize, Serialize};

/// One enveloped business event bound for a topic.
///
/// Created once per event by the pipeline facade and moved into the producer;
/// never shared across concurrent requests.
#[derive(Debug)]
pub struct OutboundRecord {
    /// Destination topic.
    pub topic: String,
    /// Optional partitioning key. Same key, same partition — the log client's
    /// key→partition mapping is what gives per-key append ordering.
    pub key: Option<Bytes>,
    /// The enveloped payload bytes.
    pub value: Envelope,
    /// When the facade constructed this record.
    pub created_at: SystemTime,
}

impl OutboundRecord {
    pub fn new(topic: impl Into<String>, value: Envelope) -> Self {
        Self {
            topic: topic.into(),
            key: None,
            value,
            created_at: SystemTime::now(),
        }
    }

    pub fn with_key(topic: impl Into<String>, key: impl Into<Bytes>, value: Envelope) -> Self {
        Self {
            topic: topic.into(),
            key: Some(key.into()),
            value,
            created_at: SystemTime::now(),
        }
    }

    /// Size of the enveloped value on the wire.
    pub fn encoded_len(&self) -> usize {
        self.value.len()
    }
}

/// Where a record landed: topic, partition and offset as acknowledged by the
/// broker. Consumed immediately by the caller; never retained by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub topic: String,
    pub partition: u32,
    pub offset: u64,
}
