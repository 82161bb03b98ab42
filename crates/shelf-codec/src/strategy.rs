use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

use crate::codec::{Codec, Coded, Storable};
use crate::error::{CodecError, CodecResult};

/// How a value becomes payload bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Archived natively by the store ([`Storable`]).
    DirectlyStorable,
    /// Converted through the type's own codec ([`Coded`]).
    ExplicitlyCoded,
}

/// Whether, and how, metadata accompanies a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    Absent,
    DirectlyStorable,
    ExplicitlyCoded,
}

/// The route bytes take on the way into the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WritePath {
    /// Handed to the store's native archiver.
    Native,
    /// Encoded by an explicit codec, then stored.
    EncodeThenStore,
}

/// One row of the capability table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Strategy {
    pub representation: Representation,
    pub metadata: MetadataKind,
}

impl Strategy {
    /// Every legal combination, one per row.
    pub const ALL: [Strategy; 6] = [
        Strategy::new(Representation::DirectlyStorable, MetadataKind::Absent),
        Strategy::new(Representation::DirectlyStorable, MetadataKind::DirectlyStorable),
        Strategy::new(Representation::DirectlyStorable, MetadataKind::ExplicitlyCoded),
        Strategy::new(Representation::ExplicitlyCoded, MetadataKind::Absent),
        Strategy::new(Representation::ExplicitlyCoded, MetadataKind::DirectlyStorable),
        Strategy::new(Representation::ExplicitlyCoded, MetadataKind::ExplicitlyCoded),
    ];

    pub const fn new(representation: Representation, metadata: MetadataKind) -> Self {
        Self {
            representation,
            metadata,
        }
    }

    /// How the payload is written.
    pub fn payload_path(&self) -> WritePath {
        match self.representation {
            Representation::DirectlyStorable => WritePath::Native,
            Representation::ExplicitlyCoded => WritePath::EncodeThenStore,
        }
    }

    /// How metadata is written, or `None` when the type has no metadata.
    pub fn metadata_path(&self) -> Option<WritePath> {
        match self.metadata {
            MetadataKind::Absent => None,
            MetadataKind::DirectlyStorable => Some(WritePath::Native),
            MetadataKind::ExplicitlyCoded => Some(WritePath::EncodeThenStore),
        }
    }

    /// Returns `true` if values of this strategy carry metadata.
    pub fn carries_metadata(&self) -> bool {
        self.metadata != MetadataKind::Absent
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let representation = match self.representation {
            Representation::DirectlyStorable => "directly storable",
            Representation::ExplicitlyCoded => "explicitly coded",
        };
        let metadata = match self.metadata {
            MetadataKind::Absent => "no metadata",
            MetadataKind::DirectlyStorable => "directly storable metadata",
            MetadataKind::ExplicitlyCoded => "coded metadata",
        };
        write!(f, "{representation} / {metadata}")
    }
}

// ---------------------------------------------------------------------------
// Payload strategies
// ---------------------------------------------------------------------------

/// Converts a value of type `T` to and from payload bytes.
pub trait PayloadStrategy<T> {
    const REPRESENTATION: Representation;

    fn encode(value: &T) -> CodecResult<Vec<u8>>;
    fn decode(bytes: &[u8]) -> CodecResult<T>;
}

/// Payload archived natively by the store.
pub struct Direct;

impl<T: Storable> PayloadStrategy<T> for Direct {
    const REPRESENTATION: Representation = Representation::DirectlyStorable;

    fn encode(value: &T) -> CodecResult<Vec<u8>> {
        value.archive()
    }

    fn decode(bytes: &[u8]) -> CodecResult<T> {
        T::unarchive(bytes)
    }
}

/// Payload converted through the type's own codec.
pub struct Explicit;

impl<T: Coded> PayloadStrategy<T> for Explicit {
    const REPRESENTATION: Representation = Representation::ExplicitlyCoded;

    fn encode(value: &T) -> CodecResult<Vec<u8>> {
        T::Codec::encode(value)
    }

    fn decode(bytes: &[u8]) -> CodecResult<T> {
        T::Codec::decode(bytes)
    }
}

// ---------------------------------------------------------------------------
// Metadata strategies
// ---------------------------------------------------------------------------

/// Converts a type's metadata to and from bytes.
pub trait MetadataStrategy: 'static {
    /// The metadata value type. [`Infallible`] for [`NoMetadata`].
    type Value: Send + 'static;

    const KIND: MetadataKind;

    fn encode(metadata: &Self::Value) -> CodecResult<Vec<u8>>;
    fn decode(bytes: &[u8]) -> CodecResult<Self::Value>;

    /// Encode optional metadata; `None` stays `None`.
    fn encode_optional(metadata: Option<&Self::Value>) -> CodecResult<Option<Vec<u8>>> {
        metadata.map(Self::encode).transpose()
    }
}

/// Marker for strategies that actually carry metadata.
///
/// Metadata-carrying reads and writes are only available for records whose
/// metadata strategy implements this.
pub trait CarriesMetadata: MetadataStrategy {}

/// The type has no metadata.
pub struct NoMetadata;

impl MetadataStrategy for NoMetadata {
    type Value = Infallible;

    const KIND: MetadataKind = MetadataKind::Absent;

    fn encode(metadata: &Infallible) -> CodecResult<Vec<u8>> {
        match *metadata {}
    }

    fn decode(_bytes: &[u8]) -> CodecResult<Infallible> {
        Err(CodecError::NoMetadata)
    }
}

/// Metadata of type `M`, archived natively.
pub struct DirectMetadata<M>(PhantomData<fn() -> M>);

impl<M: Storable + Send + 'static> MetadataStrategy for DirectMetadata<M> {
    type Value = M;

    const KIND: MetadataKind = MetadataKind::DirectlyStorable;

    fn encode(metadata: &M) -> CodecResult<Vec<u8>> {
        metadata.archive()
    }

    fn decode(bytes: &[u8]) -> CodecResult<M> {
        M::unarchive(bytes)
    }
}

impl<M: Storable + Send + 'static> CarriesMetadata for DirectMetadata<M> {}

/// Metadata of type `M`, converted through its own codec.
pub struct CodedMetadata<M>(PhantomData<fn() -> M>);

impl<M: Coded + Send + 'static> MetadataStrategy for CodedMetadata<M> {
    type Value = M;

    const KIND: MetadataKind = MetadataKind::ExplicitlyCoded;

    fn encode(metadata: &M) -> CodecResult<Vec<u8>> {
        M::Codec::encode(metadata)
    }

    fn decode(bytes: &[u8]) -> CodecResult<M> {
        M::Codec::decode(bytes)
    }
}

impl<M: Coded + Send + 'static> CarriesMetadata for CodedMetadata<M> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_has_six_distinct_rows() {
        let rows: HashSet<Strategy> = Strategy::ALL.into_iter().collect();
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn write_paths_follow_table() {
        let paths: Vec<(WritePath, Option<WritePath>)> = Strategy::ALL
            .iter()
            .map(|s| (s.payload_path(), s.metadata_path()))
            .collect();
        assert_eq!(
            paths,
            vec![
                (WritePath::Native, None),
                (WritePath::Native, Some(WritePath::Native)),
                (WritePath::Native, Some(WritePath::EncodeThenStore)),
                (WritePath::EncodeThenStore, None),
                (WritePath::EncodeThenStore, Some(WritePath::Native)),
                (WritePath::EncodeThenStore, Some(WritePath::EncodeThenStore)),
            ]
        );
    }

    #[test]
    fn carries_metadata_only_when_present() {
        let carrying = Strategy::ALL.iter().filter(|s| s.carries_metadata()).count();
        assert_eq!(carrying, 4);
    }

    #[test]
    fn display() {
        let s = Strategy::new(Representation::ExplicitlyCoded, MetadataKind::DirectlyStorable);
        assert_eq!(s.to_string(), "explicitly coded / directly storable metadata");
    }

    #[test]
    fn no_metadata_never_decodes() {
        assert_eq!(NoMetadata::decode(b"anything"), Err(CodecError::NoMetadata));
        assert_eq!(NoMetadata::encode_optional(None), Ok(None));
    }

    #[test]
    fn direct_metadata_roundtrip() {
        let bytes = DirectMetadata::<u32>::encode(&7).unwrap();
        assert_eq!(DirectMetadata::<u32>::decode(&bytes).unwrap(), 7);
        let encoded = DirectMetadata::<u32>::encode_optional(Some(&7)).unwrap();
        assert_eq!(encoded, Some(bytes));
    }
}
