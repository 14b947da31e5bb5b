//! Self-describing message envelope.
//!
//! Wire format: `[marker(1)][registry_id(4, big-endian)][payload(N)]`. This is
//! the conventional registry-framed binary layout, so downstream consumers
//! using standard tooling can decode it.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::DecodeError;

/// Format marker. Exists solely for future envelope versioning; decode rejects
/// anything else.
pub const FORMAT_MARKER: u8 = 0x00;

/// Header length: marker byte plus big-endian u32 registry ID.
pub const HEADER_LEN: usize = 5;

/// The wire-level byte sequence for one record. Always at least
/// [`HEADER_LEN`] bytes when produced by [`Envelope::frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope(Bytes);

impl Envelope {
    /// Frame a schema-encoded payload with the 5-byte header.
    pub fn frame(registry_id: u32, payload: &[u8]) -> Self {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
        buf.put_u8(FORMAT_MARKER);
        buf.put_u32(registry_id);
        buf.put_slice(payload);
        Envelope(buf.freeze())
    }

    /// Wrap raw wire bytes without validation. Header checks happen on
    /// [`Envelope::unframe`].
    pub fn from_bytes(bytes: Bytes) -> Self {
        Envelope(bytes)
    }

    /// Split the envelope into its registry ID and payload, validating the
    /// header.
    pub fn unframe(&self) -> Result<(u32, &[u8]), DecodeError> {
        if self.0.len() < HEADER_LEN {
            return Err(DecodeError::TruncatedEnvelope(self.0.len()));
        }
        if self.0[0] != FORMAT_MARKER {
            return Err(DecodeError::UnsupportedEnvelopeVersion(self.0[0]));
        }
        let mut id_bytes = &self.0[1..HEADER_LEN];
        let registry_id = id_bytes.get_u32();
        Ok((registry_id, &self.0[HEADER_LEN..]))
    }

    /// Registry ID embedded in the header.
    pub fn registry_id(&self) -> Result<u32, DecodeError> {
        self.unframe().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}
