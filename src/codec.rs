//! Payload Codec Module
//!
//! Converts memoized results to and from the bytes kept in the cache store.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Status written into every envelope.
pub const ENVELOPE_STATUS: &str = "success";
/// Code written into every envelope.
pub const ENVELOPE_CODE: u16 = 200;

// == Payload Codec Trait ==
/// Encodes results for storage and decodes them on a cache hit.
///
/// Implementations must round-trip: decoding an encoded value yields an equal value.
pub trait PayloadCodec: Send + Sync {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T>;
}

// == Envelope ==
/// JSON envelope around a stored result.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub payload: T,
    pub status: String,
    pub code: u16,
}

// == JSON Envelope Codec ==
/// Stores results as `{"payload": ..., "status": "success", "code": 200}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEnvelopeCodec;

impl PayloadCodec for JsonEnvelopeCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let envelope = Envelope {
            payload: value,
            status: ENVELOPE_STATUS.to_string(),
            code: ENVELOPE_CODE,
        };
        serde_json::to_vec(&envelope).map_err(|e| CacheError::EncodeFailed(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T> {
        let envelope: Envelope<T> =
            serde_json::from_slice(payload).map_err(|e| CacheError::DecodeFailed(e.to_string()))?;

        if envelope.status != ENVELOPE_STATUS || envelope.code != ENVELOPE_CODE {
            return Err(CacheError::DecodeFailed(format!(
                "unexpected envelope status '{}' with code {}",
                envelope.status, envelope.code
            )));
        }

        Ok(envelope.payload)
    }
}
