use std::marker::PhantomData;

use shelf_codec::{CarriesMetadata, MetadataOf, MetadataStrategy, Record};
use shelf_store::WriteTransaction;
use shelf_types::Item;

use crate::error::{PersistError, PersistResult};
use crate::op::WriteOp;

/// Writes of record type `T`.
///
/// Every write returns what it was given, unchanged: the store is never
/// re-read. A batch is one transaction; if any element fails to encode, none
/// of the batch is stored.
pub struct Write<T>(PhantomData<fn() -> T>);

impl<T: Record> Write<T> {
    /// Store `value` with no metadata, replacing any existing record and its
    /// metadata.
    pub fn item(value: T) -> WriteOp<T> {
        WriteOp::new(format!("write {}", value.index()), move |tx| {
            store(tx, &value, None)?;
            Ok(value)
        })
    }

    /// Store every value, in order, in one transaction.
    pub fn items(values: Vec<T>) -> WriteOp<Vec<T>> {
        WriteOp::new(
            format!("write {} {}", values.len(), T::COLLECTION),
            move |tx| {
                for value in &values {
                    store(tx, value, None)?;
                }
                Ok(values)
            },
        )
    }
}

impl<T> Write<T>
where
    T: Record,
    T::Metadata: CarriesMetadata,
{
    /// Store `value` together with `metadata`.
    pub fn with_metadata(value: T, metadata: MetadataOf<T>) -> WriteOp<Item<T, MetadataOf<T>>> {
        Self::item_with_metadata(Item::new(value, Some(metadata)))
    }

    /// Store an item; an item without metadata clears any stored metadata.
    pub fn item_with_metadata(item: Item<T, MetadataOf<T>>) -> WriteOp<Item<T, MetadataOf<T>>> {
        WriteOp::new(format!("write {}", item.value().index()), move |tx| {
            store(tx, item.value(), item.metadata())?;
            Ok(item)
        })
    }

    /// Store every item, in order, in one transaction.
    pub fn items_with_metadata(
        items: Vec<Item<T, MetadataOf<T>>>,
    ) -> WriteOp<Vec<Item<T, MetadataOf<T>>>> {
        WriteOp::new(
            format!("write {} {}", items.len(), T::COLLECTION),
            move |tx| {
                for item in &items {
                    store(tx, item.value(), item.metadata())?;
                }
                Ok(items)
            },
        )
    }
}

fn store<T: Record>(
    tx: &mut dyn WriteTransaction,
    value: &T,
    metadata: Option<&MetadataOf<T>>,
) -> PersistResult<()> {
    let index = value.index();
    let payload = match value.encode_payload() {
        Ok(payload) => payload,
        Err(source) => return Err(PersistError::Codec { index, source }),
    };
    let metadata = match <T::Metadata as MetadataStrategy>::encode_optional(metadata) {
        Ok(metadata) => metadata,
        Err(source) => return Err(PersistError::Codec { index, source }),
    };
    tx.write_payload(index.collection(), index.key(), payload, metadata)?;
    Ok(())
}
