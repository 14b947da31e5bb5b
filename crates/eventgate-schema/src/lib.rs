//! Schema resolution, caching and wire framing for the eventgate pipeline.
//!
//! This crate owns the schema-facing half of the encode-and-produce pipeline:
//!
//! - [`RegistryClient`]: HTTP lookups against the central schema registry.
//! - [`SchemaCache`]: subject → [`SchemaEntry`] memoization with single-flight
//!   fetch coalescing.
//! - [`Envelope`]: the self-describing binary wrapper
//!   (`0x00` marker + big-endian registry ID + payload).
//! - [`codec`]: pure typed-record ⇄ Avro-datum transformation.
//!
//! # Usage
//!
//! ```ignore
//! use eventgate_schema::{codec, RegistryClient, SchemaCache};
//!
//! let cache = SchemaCache::new(RegistryClient::new("http://localhost:8081"));
//! let entry = cache.resolve("expense-topic-value").await?;
//! let envelope = codec::encode(&entry, &expense)?;
//! ```

pub mod cache;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod registry;

pub use cache::{SchemaCache, SchemaEntry};
pub use envelope::{Envelope, FORMAT_MARKER, HEADER_LEN};
pub use error::{DecodeError, EncodeError, SchemaFetchError};
pub use registry::RegistryClient;

// Re-exported so dependents can name schema types without pinning their own
// version of the avro crate.
pub use apache_avro;
