use shelf_types::{Index, Persistable};

use crate::op::WriteOp;

/// Removals by identity. Removing a missing record is a no-op.
pub struct Remove;

impl Remove {
    /// Remove the record stored for `value`.
    pub fn item<T: Persistable>(value: &T) -> WriteOp<()> {
        Self::at_index(value.index())
    }

    /// Remove the records stored for `values`, in one transaction.
    pub fn items<T: Persistable>(values: &[T]) -> WriteOp<()> {
        Self::at_indexes(values.iter().map(Persistable::index).collect())
    }

    pub fn at_index(index: Index) -> WriteOp<()> {
        WriteOp::new(format!("remove {index}"), move |tx| {
            tx.remove_payload(index.collection(), index.key())?;
            Ok(())
        })
    }

    pub fn at_indexes(indexes: Vec<Index>) -> WriteOp<()> {
        WriteOp::new(format!("remove {} indexes", indexes.len()), move |tx| {
            tx.remove_payloads(&indexes)?;
            Ok(())
        })
    }

    /// Remove the record stored under `key` in `T`'s collection.
    pub fn by_key<T: Persistable>(key: impl Into<String>) -> WriteOp<()> {
        Self::at_index(T::index_with_key(key))
    }

    pub fn by_keys<T: Persistable>(keys: impl IntoIterator<Item = impl Into<String>>) -> WriteOp<()> {
        Self::at_indexes(T::indexes_with_keys(keys))
    }
}
