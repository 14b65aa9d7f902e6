//! Serializer Adapters
//!
//! Implementations of the `AccountSerializer` trait.

mod bincode;

pub use self::bincode::BincodeAccountSerializer;
