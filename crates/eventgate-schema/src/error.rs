//! Error types for schema resolution and wire encoding.

use thiserror::Error;

/// Failure to resolve a subject to a usable schema.
///
/// The three kinds are deliberately distinguishable so callers can decide
/// whether a retry makes sense: `Unreachable` is transient, `SubjectNotFound`
/// and `Parse` are not.
#[derive(Debug, Error)]
pub enum SchemaFetchError {
    /// The registry endpoint could not be reached or timed out.
    #[error("schema registry unreachable: {0}")]
    Unreachable(String),

    /// The subject does not exist in the registry.
    #[error("subject '{0}' not found in registry")]
    SubjectNotFound(String),

    /// The registry returned schema text that is not a valid schema.
    #[error("schema for subject '{subject}' failed to parse: {reason}")]
    Parse { subject: String, reason: String },

    /// The registry answered, but not with anything we can use
    /// (unexpected status code or malformed response body).
    #[error("unexpected registry response for subject '{subject}': {reason}")]
    InvalidResponse { subject: String, reason: String },
}

/// Failure to encode a record against a resolved schema.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The record is missing a required non-default field or carries a value
    /// the schema does not accept.
    #[error("record does not conform to schema for subject '{subject}': {reason}")]
    SchemaViolation { subject: String, reason: String },

    /// The record could not be turned into an Avro value at all.
    #[error("avro serialization failed: {0}")]
    Serialization(String),
}

/// Failure to decode an envelope back into a typed record.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Marker byte is not `0x00`. Rejected before any schema decoding.
    #[error("unsupported envelope version: marker byte 0x{0:02x}")]
    UnsupportedEnvelopeVersion(u8),

    /// The envelope is shorter than the 5-byte header.
    #[error("envelope too short: {0} bytes, header needs 5")]
    TruncatedEnvelope(usize),

    /// The envelope carries a different registry ID than the entry it was
    /// decoded with.
    #[error("registry id mismatch: envelope carries {found}, entry resolved {expected}")]
    RegistryIdMismatch { expected: u32, found: u32 },

    /// The payload bytes do not decode under the entry's schema.
    #[error("schema mismatch decoding subject '{subject}': {reason}")]
    SchemaMismatch { subject: String, reason: String },

    /// The payload decoded, but does not map onto the requested Rust type.
    #[error("decoded value does not map to the requested type: {0}")]
    Deserialization(String),
}
