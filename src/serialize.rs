use serde::Serialize;
use serde::de::DeserializeOwned;

/// Opaque codec failure reported by a [`Serializer`] implementation.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// Pluggable payload codec.
///
/// The store treats payloads as opaque bytes; the codec decides the format.
/// Implementations must be cheap to call per operation since every read and
/// write goes through one.
pub trait Serializer: Send + Sync {
    fn serialize<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized;

    fn deserialize<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned;
}

/// JSON codec, the default.
///
/// Integers encode as plain decimal text, which keeps serialized counters
/// compatible with the backend's DECRBY and the store's integer parsing.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        Ok(serde_json::to_vec(value)?)
    }

    fn deserialize<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_slice(bytes)?)
    }
}
