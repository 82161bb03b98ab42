use serde::{Deserialize, Serialize};

/// A value paired with its optional metadata.
///
/// Items are produced by metadata-carrying reads and consumed by
/// metadata-carrying writes. They are never mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item<V, M> {
    value: V,
    metadata: Option<M>,
}

impl<V, M> Item<V, M> {
    /// Pair a value with optional metadata.
    pub fn new(value: V, metadata: Option<M>) -> Self {
        Self { value, metadata }
    }

    /// The value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The metadata, if any.
    pub fn metadata(&self) -> Option<&M> {
        self.metadata.as_ref()
    }

    /// Consume the item, returning the value and metadata.
    pub fn into_parts(self) -> (V, Option<M>) {
        (self.value, self.metadata)
    }

    /// Consume the item, returning only the value.
    pub fn into_value(self) -> V {
        self.value
    }
}

impl<V, M> From<(V, Option<M>)> for Item<V, M> {
    fn from((value, metadata): (V, Option<M>)) -> Self {
        Self::new(value, metadata)
    }
}

/// Pair each value with the metadata at the same position.
///
/// Stops at the shorter of the two inputs.
pub fn zip_metadata<V, M, VI, MI>(values: VI, metadata: MI) -> Vec<Item<V, M>>
where
    VI: IntoIterator<Item = V>,
    MI: IntoIterator<Item = Option<M>>,
{
    values
        .into_iter()
        .zip(metadata)
        .map(|(value, metadata)| Item::new(value, metadata))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_and_parts() {
        let item = Item::new("value", Some(7u32));
        assert_eq!(*item.value(), "value");
        assert_eq!(item.metadata(), Some(&7));
        assert_eq!(item.clone().into_value(), "value");
        assert_eq!(item.into_parts(), ("value", Some(7)));
    }

    #[test]
    fn absent_metadata() {
        let item: Item<u8, String> = Item::new(1, None);
        assert!(item.metadata().is_none());
    }

    #[test]
    fn zip_pairs_by_position() {
        let items = zip_metadata(vec!["a", "b", "c"], vec![Some(1), None]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Item::new("a", Some(1)));
        assert_eq!(items[1], Item::new("b", None));
    }
}
