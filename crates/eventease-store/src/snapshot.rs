//! JSON snapshot helpers on top of [`KeyValueStore`]

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{KeyValueStore, StoreResult};

/// Read and decode a JSON snapshot.
///
/// Returns `Ok(None)` when the key is absent and `Err(Serialization)` when the
/// stored text does not decode; callers decide how to recover.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> StoreResult<Option<T>> {
    match store.get(key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and write it under `key`
pub fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> StoreResult<()> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}

/// Encode a value for use with [`KeyValueStore::set_many`]
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> StoreResult<String> {
    Ok(serde_json::to_string(value)?)
}
