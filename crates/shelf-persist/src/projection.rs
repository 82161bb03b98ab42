use shelf_codec::{CarriesMetadata, MetadataOf, MetadataStrategy, Record};
use shelf_store::ReadTransaction;
use shelf_types::{Index, Item};
use tracing::warn;

use crate::error::PersistResult;

/// The shape a read returns for each record it finds.
pub trait Projection<T: Record>: 'static {
    type Output: Send + 'static;

    /// Fetch and decode the record at `index`. `Ok(None)` when it is absent
    /// or cannot be decoded.
    fn fetch(tx: &dyn ReadTransaction, index: &Index) -> PersistResult<Option<Self::Output>>;
}

/// The value alone.
pub struct Plain;

/// The value paired with its metadata, as an [`Item`].
pub struct WithMetadata;

/// The metadata alone.
pub struct MetadataOnly;

impl<T: Record> Projection<T> for Plain {
    type Output = T;

    fn fetch(tx: &dyn ReadTransaction, index: &Index) -> PersistResult<Option<T>> {
        Ok(tx
            .read_payload(index.collection(), index.key())?
            .and_then(|bytes| decode_value::<T>(index, &bytes)))
    }
}

impl<T> Projection<T> for WithMetadata
where
    T: Record,
    T::Metadata: CarriesMetadata,
{
    type Output = Item<T, MetadataOf<T>>;

    fn fetch(tx: &dyn ReadTransaction, index: &Index) -> PersistResult<Option<Self::Output>> {
        let Some(value) = <Plain as Projection<T>>::fetch(tx, index)? else {
            return Ok(None);
        };
        let metadata = tx
            .read_metadata(index.collection(), index.key())?
            .and_then(|bytes| decode_metadata::<T>(index, &bytes));
        Ok(Some(Item::new(value, metadata)))
    }
}

impl<T> Projection<T> for MetadataOnly
where
    T: Record,
    T::Metadata: CarriesMetadata,
{
    type Output = MetadataOf<T>;

    fn fetch(tx: &dyn ReadTransaction, index: &Index) -> PersistResult<Option<MetadataOf<T>>> {
        Ok(tx
            .read_metadata(index.collection(), index.key())?
            .and_then(|bytes| decode_metadata::<T>(index, &bytes)))
    }
}

fn decode_value<T: Record>(index: &Index, bytes: &[u8]) -> Option<T> {
    match T::decode_payload(bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(%index, error = %err, "undecodable payload treated as absent");
            None
        }
    }
}

fn decode_metadata<T: Record>(index: &Index, bytes: &[u8]) -> Option<MetadataOf<T>> {
    match <T::Metadata as MetadataStrategy>::decode(bytes) {
        Ok(metadata) => Some(metadata),
        Err(err) => {
            warn!(%index, error = %err, "undecodable metadata dropped");
            None
        }
    }
}
