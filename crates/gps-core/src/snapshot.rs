//! Binary snapshot codec.
//!
//! Every core entity serializes with `serde`; the wire form is `bincode` 2
//! with the standard configuration.  Types that carry structural invariants
//! override [`Snapshot::validate`] so a corrupt snapshot is rejected instead
//! of producing an entity that panics later.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{CoreError, CoreResult};

/// Serialize `value` to bytes.
pub fn encode<T: Serialize>(value: &T) -> CoreResult<Vec<u8>> {
    bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| CoreError::Snapshot(e.to_string()))
}

/// Deserialize a value previously produced by [`encode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CoreResult<T> {
    let (value, _read) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .map_err(|e| CoreError::Snapshot(e.to_string()))?;
    Ok(value)
}

/// Snapshot / restore support for persistent entities.
pub trait Snapshot: Serialize + DeserializeOwned {
    /// Check structural invariants after decoding.
    fn validate(&self) -> CoreResult<()> {
        Ok(())
    }

    fn snapshot(&self) -> CoreResult<Vec<u8>> {
        encode(self)
    }

    fn restore_from_snapshot(bytes: &[u8]) -> CoreResult<Self> {
        let value: Self = decode(bytes)?;
        value.validate()?;
        Ok(value)
    }
}
