//! Typed record ⇄ enveloped Avro bytes.
//!
//! Pure transformation against a resolved [`SchemaEntry`] — no network, no
//! cache, no blocking. Encode resolves the record against the schema first,
//! so schema defaults fill omitted fields and missing required fields fail
//! before any bytes are written.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::SchemaEntry;
use crate::envelope::Envelope;
use crate::error::{DecodeError, EncodeError};

/// Encode a record into an enveloped Avro datum.
///
/// Fields declared optional/nullable in the schema accept `None`; fields with
/// schema defaults may be omitted from map-like inputs. Any other missing
/// required field is an [`EncodeError::SchemaViolation`].
pub fn encode<T: Serialize>(entry: &SchemaEntry, record: &T) -> Result<Envelope, EncodeError> {
    let value =
        apache_avro::to_value(record).map_err(|e| EncodeError::Serialization(e.to_string()))?;

    let resolved = value
        .resolve(&entry.schema)
        .map_err(|e| EncodeError::SchemaViolation {
            subject: entry.subject.clone(),
            reason: e.to_string(),
        })?;

    let payload = apache_avro::to_avro_datum(&entry.schema, resolved)
        .map_err(|e| EncodeError::Serialization(e.to_string()))?;

    Ok(Envelope::frame(entry.registry_id, &payload))
}

/// Decode an envelope back into a typed record.
///
/// Rejects, in order: a marker byte other than `0x00`, a registry ID that
/// does not match the entry's, and payload bytes that do not decode under the
/// entry's schema. A wrong-subject schema fails as
/// [`DecodeError::SchemaMismatch`] rather than silently producing wrong data.
pub fn decode<T: DeserializeOwned>(
    entry: &SchemaEntry,
    envelope: &Envelope,
) -> Result<T, DecodeError> {
    let (registry_id, payload) = envelope.unframe()?;

    if registry_id != entry.registry_id {
        return Err(DecodeError::RegistryIdMismatch {
            expected: entry.registry_id,
            found: registry_id,
        });
    }

    let value = apache_avro::from_avro_datum(&entry.schema, &mut &payload[..], None).map_err(
        |e| DecodeError::SchemaMismatch {
            subject: entry.subject.clone(),
            reason: e.to_string(),
        },
    )?;

    apache_avro::from_value(&value).map_err(|e| DecodeError::Deserialization(e.to_string()))
}
