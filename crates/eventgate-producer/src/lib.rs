//! Producer core and pipeline facade for the eventgate pipeline.
//!
//! This crate owns the delivery-facing half of the encode-and-produce
//! pipeline:
//!
//! - [`LogClient`]: the abstract boundary to the underlying partitioned log.
//! - [`ProducerCore`]: blocking and fire-and-forget delivery with drain on
//!   close.
//! - [`Pipeline`]: the single public entry point — resolve schema, encode,
//!   produce, classify.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use eventgate_producer::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::builder()
//!     .config(PipelineConfig::default())
//!     .log_client(Arc::new(client))
//!     .build()?;
//!
//! let result = pipeline.submit("expense-topic", &expense).await?;
//! println!("partition {} offset {}", result.partition, result.offset);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod producer;
pub mod record;

pub use client::{AckLevel, DeliveryReceipt, LogClient, LogClientConfig};
pub use config::{ConfigError, PipelineConfig};
pub use error::{PipelineError, ProduceError};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use producer::{DeliveryHandle, ProducerCore};
pub use record::{DeliveryResult, OutboundRecord};
