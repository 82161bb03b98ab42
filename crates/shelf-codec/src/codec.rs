use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, CodecResult};

/// A type the store can archive by itself.
///
/// Implementing `Storable` (usually with an empty impl block) opts a serde
/// type into the store's native archive format, which is bincode.
pub trait Storable: Serialize + DeserializeOwned {
    /// Archive into the native byte form.
    fn archive(&self) -> CodecResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Restore from the native byte form.
    fn unarchive(bytes: &[u8]) -> CodecResult<Self> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

macro_rules! storable {
    ($($ty:ty),* $(,)?) => {
        $(impl Storable for $ty {})*
    };
}

storable!(String, bool, u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, Vec<u8>);

/// An explicit encode/decode pair for `T`.
///
/// Codecs are stateless marker types; both directions are associated
/// functions. `decode(encode(x))` must equal `x` for every well-formed `x`.
pub trait Codec<T> {
    fn encode(value: &T) -> CodecResult<Vec<u8>>;
    fn decode(bytes: &[u8]) -> CodecResult<T>;
}

/// A type stored through an explicit codec rather than native archiving.
pub trait Coded: Sized {
    /// The codec that converts this type to and from bytes.
    type Codec: Codec<Self>;
}

/// JSON codec for any serde type.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec {
    fn encode(value: &T) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> CodecResult<T> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Bincode codec for any serde type.
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeCodec;

impl<T: Serialize + DeserializeOwned> Codec<T> for BincodeCodec {
    fn encode(value: &T) -> CodecResult<Vec<u8>> {
        bincode::serialize(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> CodecResult<T> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// A storable companion object that stands in for a value on disk.
///
/// Useful when the value type cannot (or should not) implement serde itself:
/// the coder holds a serializable mirror of it.
pub trait Coder: Storable {
    /// The value this coder stands in for.
    type Value;

    /// Build a coder from a value.
    fn from_value(value: &Self::Value) -> Self;

    /// Convert back into the value. `None` if the archived state is not a
    /// valid value.
    fn into_value(self) -> Option<Self::Value>;
}

/// Codec that goes through a [`Coder`] object archived natively.
pub struct ViaCoder<K>(PhantomData<fn() -> K>);

impl<K: Coder> Codec<K::Value> for ViaCoder<K> {
    fn encode(value: &K::Value) -> CodecResult<Vec<u8>> {
        K::from_value(value).archive()
    }

    fn decode(bytes: &[u8]) -> CodecResult<K::Value> {
        K::unarchive(bytes)?
            .into_value()
            .ok_or(CodecError::Coder(std::any::type_name::<K>()))
    }
}
