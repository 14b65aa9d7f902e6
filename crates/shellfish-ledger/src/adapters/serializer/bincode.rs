use crate::domain::entities::{BatchRecord, Counter};
use crate::domain::errors::SerializationError;
use crate::ports::outbound::AccountSerializer;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Account serializer using bincode.
///
/// Bincode's default layout matches the logical record layout: fixed 8-byte
/// integers, one byte per bool, and u64 length-prefixed UTF-8 strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeAccountSerializer;

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    bincode::serialize(value).map_err(|e| SerializationError {
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, SerializationError> {
    bincode::deserialize(data).map_err(|e| SerializationError {
        message: e.to_string(),
    })
}

impl AccountSerializer for BincodeAccountSerializer {
    fn serialize_counter(&self, counter: &Counter) -> Result<Vec<u8>, SerializationError> {
        encode(counter)
    }

    fn deserialize_counter(&self, data: &[u8]) -> Result<Counter, SerializationError> {
        decode(data)
    }

    fn serialize_batch(&self, batch: &BatchRecord) -> Result<Vec<u8>, SerializationError> {
        encode(batch)
    }

    fn deserialize_batch(&self, data: &[u8]) -> Result<BatchRecord, SerializationError> {
        decode(data)
    }
}
