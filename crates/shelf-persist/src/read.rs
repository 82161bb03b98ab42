use std::collections::HashSet;
use std::marker::PhantomData;

use shelf_codec::Record;
use shelf_types::Index;

use crate::op::ReadOp;
use crate::projection::{MetadataOnly, Plain, Projection, WithMetadata};

/// Reads of record type `T`, shaped by projection `P`.
///
/// ```ignore
/// let alice = Read::<Person>::by_key("alice").run(&ctx)?;
/// let tagged = ReadWithMetadata::<Note>::all().run(&ctx)?;
/// ```
pub struct Read<T, P = Plain>(PhantomData<fn() -> (T, P)>);

/// Reads returning each value with its metadata.
pub type ReadWithMetadata<T> = Read<T, WithMetadata>;

/// Reads returning only the metadata.
pub type ReadMetadata<T> = Read<T, MetadataOnly>;

/// Result of [`Read::filter_existing`]: every unique requested key lands in
/// exactly one of the two lists.
#[derive(Clone, Debug, PartialEq)]
pub struct Existing<O> {
    /// Records found, in first-request order.
    pub existing: Vec<O>,
    /// Keys with no record, in first-request order.
    pub missing: Vec<String>,
}

impl<T: Record, P: Projection<T>> Read<T, P> {
    /// The record at `index`, or `None`.
    pub fn at_index(index: Index) -> ReadOp<Option<P::Output>> {
        ReadOp::new(format!("read {index}"), move |tx| P::fetch(tx, &index))
    }

    /// The records at `indexes`, in input order.
    ///
    /// Missing or undecodable records are dropped, so the result can be
    /// shorter than the input. Use
    /// [`at_indexes_paired`](Self::at_indexes_paired) to keep positions.
    pub fn at_indexes(indexes: Vec<Index>) -> ReadOp<Vec<P::Output>> {
        ReadOp::new(format!("read {} indexes", indexes.len()), move |tx| {
            let mut found = Vec::with_capacity(indexes.len());
            for index in &indexes {
                if let Some(output) = P::fetch(tx, index)? {
                    found.push(output);
                }
            }
            Ok(found)
        })
    }

    /// One entry per requested index, with `None` where nothing was found.
    pub fn at_indexes_paired(indexes: Vec<Index>) -> ReadOp<Vec<(Index, Option<P::Output>)>> {
        ReadOp::new(format!("read {} indexes", indexes.len()), move |tx| {
            indexes
                .into_iter()
                .map(|index| {
                    let output = P::fetch(tx, &index)?;
                    Ok((index, output))
                })
                .collect()
        })
    }

    /// The record stored under `key` in `T`'s collection.
    pub fn by_key(key: impl Into<String>) -> ReadOp<Option<P::Output>> {
        Self::at_index(T::index_with_key(key))
    }

    /// The records stored under `keys`; missing keys are dropped.
    pub fn by_keys(keys: impl IntoIterator<Item = impl Into<String>>) -> ReadOp<Vec<P::Output>> {
        Self::at_indexes(T::indexes_with_keys(keys))
    }

    /// Every record in `T`'s collection, in no particular order.
    pub fn all() -> ReadOp<Vec<P::Output>> {
        ReadOp::new(format!("read all {}", T::COLLECTION), |tx| {
            let keys = tx.keys(T::COLLECTION)?;
            let mut found = Vec::with_capacity(keys.len());
            for key in keys {
                if let Some(output) = P::fetch(tx, &T::index_with_key(key))? {
                    found.push(output);
                }
            }
            Ok(found)
        })
    }

    /// Split `keys` into the records that exist and the keys that do not.
    /// Duplicate keys are looked up once.
    pub fn filter_existing(
        keys: impl IntoIterator<Item = impl Into<String>>,
    ) -> ReadOp<Existing<P::Output>> {
        let mut seen = HashSet::new();
        let keys: Vec<String> = keys
            .into_iter()
            .map(Into::into)
            .filter(|key: &String| seen.insert(key.clone()))
            .collect();
        ReadOp::new(format!("filter {} keys", keys.len()), move |tx| {
            let mut result = Existing {
                existing: Vec::new(),
                missing: Vec::new(),
            };
            for key in keys {
                match P::fetch(tx, &T::index_with_key(key.as_str()))? {
                    Some(output) => result.existing.push(output),
                    None => result.missing.push(key),
                }
            }
            Ok(result)
        })
    }
}

impl<T: Record> Read<T> {
    /// Every key in `T`'s collection, in no particular order.
    pub fn keys() -> ReadOp<Vec<String>> {
        ReadOp::new(format!("keys {}", T::COLLECTION), |tx| {
            Ok(tx.keys(T::COLLECTION)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::write::Write;
    use shelf_codec::Storable;
    use shelf_context::{ReadContext, WriteContext};
    use shelf_types::{Item, Persistable};

    fn seed_people(ctx: &impl WriteContext) {
        Write::items(vec![
            Person::new("k1", "Ada"),
            Person::new("k2", "Grace"),
        ])
        .run(ctx)
        .unwrap();
    }

    // -----------------------------------------------------------------------
    // Plain reads
    // -----------------------------------------------------------------------

    #[test]
    fn at_index_present_and_absent() {
        let (_db, ctx) = connection();
        seed_people(&ctx);
        let found = Read::<Person>::at_index(Person::index_with_key("k1"))
            .run(&ctx)
            .unwrap();
        assert_eq!(found, Some(Person::new("k1", "Ada")));
        let absent = Read::<Person>::by_key("nobody").run(&ctx).unwrap();
        assert_eq!(absent, None);
    }

    #[test]
    fn at_indexes_drops_missing() {
        let (_db, ctx) = connection();
        seed_people(&ctx);
        let indexes = Person::indexes_with_keys(["k1", "k3", "k2"]);
        let found = Read::<Person>::at_indexes(indexes).run(&ctx).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, "k1");
        assert_eq!(found[1].id, "k2");
    }

    #[test]
    fn at_indexes_paired_keeps_positions() {
        let (_db, ctx) = connection();
        seed_people(&ctx);
        let indexes = Person::indexes_with_keys(["k1", "k3", "k2"]);
        let found = Read::<Person>::at_indexes_paired(indexes.clone())
            .run(&ctx)
            .unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[1], (indexes[1].clone(), None));
        assert!(found[2].1.is_some());
    }

    #[test]
    fn by_keys_and_all() {
        let (_db, ctx) = connection();
        seed_people(&ctx);
        let found = Read::<Person>::by_keys(["k2", "k1"]).run(&ctx).unwrap();
        assert_eq!(found[0].name, "Grace");

        let mut all = Read::<Person>::all().run(&ctx).unwrap();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(all, vec![Person::new("k1", "Ada"), Person::new("k2", "Grace")]);

        let mut keys = Read::<Person>::keys().run(&ctx).unwrap();
        keys.sort();
        assert_eq!(keys, vec!["k1", "k2"]);
    }

    #[test]
    fn all_is_scoped_to_collection() {
        let (_db, ctx) = connection();
        seed_people(&ctx);
        Write::item(Document {
            id: "k1".into(),
            body: "text".into(),
        })
        .run(&ctx)
        .unwrap();
        assert_eq!(Read::<Person>::all().run(&ctx).unwrap().len(), 2);
        assert_eq!(Read::<Document>::all().run(&ctx).unwrap().len(), 1);
    }

    #[test]
    fn filter_existing_partitions_keys() {
        let (_db, ctx) = connection();
        seed_people(&ctx);
        let result = Read::<Person>::filter_existing(["k1", "k2", "k3"])
            .run(&ctx)
            .unwrap();
        assert_eq!(
            result.existing,
            vec![Person::new("k1", "Ada"), Person::new("k2", "Grace")]
        );
        assert_eq!(result.missing, vec!["k3"]);
    }

    #[test]
    fn filter_existing_collapses_duplicates() {
        let (_db, ctx) = connection();
        seed_people(&ctx);
        let result = Read::<Person>::filter_existing(["k3", "k1", "k3", "k1"])
            .run(&ctx)
            .unwrap();
        assert_eq!(result.existing.len(), 1);
        assert_eq!(result.missing, vec!["k3"]);
    }

    #[test]
    fn undecodable_payload_reads_as_absent() {
        let (_db, ctx) = connection();
        ctx.read_write(|tx| tx.write_payload("documents", "bad", b"not json".to_vec(), None))
            .unwrap();
        let found = Read::<Document>::by_key("bad").run(&ctx).unwrap();
        assert!(found.is_none());
        let result = Read::<Document>::filter_existing(["bad"]).run(&ctx).unwrap();
        assert_eq!(result.missing, vec!["bad"]);
    }

    // -----------------------------------------------------------------------
    // Metadata reads
    // -----------------------------------------------------------------------

    #[test]
    fn with_metadata_returns_items() {
        let (_db, ctx) = connection();
        let note = Note {
            id: "n1".into(),
            text: "hello".into(),
        };
        Write::with_metadata(note.clone(), "pinned".to_string())
            .run(&ctx)
            .unwrap();

        let item = ReadWithMetadata::<Note>::by_key("n1").run(&ctx).unwrap();
        assert_eq!(item, Some(Item::new(note, Some("pinned".to_string()))));

        let tag = ReadMetadata::<Note>::by_key("n1").run(&ctx).unwrap();
        assert_eq!(tag.as_deref(), Some("pinned"));
    }

    #[test]
    fn coded_metadata_roundtrip() {
        let (_db, ctx) = connection();
        let code = Barcode::QrCode("ABCDEFGHIJKLMNOP".into());
        Write::with_metadata(code.clone(), Stamp::new(2, "scanner"))
            .run(&ctx)
            .unwrap();
        let items = ReadWithMetadata::<Barcode>::all().run(&ctx).unwrap();
        assert_eq!(items, vec![Item::new(code, Some(Stamp::new(2, "scanner")))]);
    }

    #[test]
    fn malformed_metadata_keeps_value() {
        let (_db, ctx) = connection();
        let product = Product {
            sku: 7,
            price_cents: 1299,
        };
        let payload = product.archive().unwrap();
        ctx.read_write(|tx| tx.write_payload("products", "7", payload, Some(b"{oops".to_vec())))
            .unwrap();

        let item = ReadWithMetadata::<Product>::by_key("7")
            .run(&ctx)
            .unwrap()
            .unwrap();
        assert_eq!(item.value(), &product);
        assert!(item.metadata().is_none());
        assert_eq!(ReadMetadata::<Product>::by_key("7").run(&ctx).unwrap(), None);
    }

    #[test]
    fn metadata_absent_for_missing_record() {
        let (_db, ctx) = connection();
        let found = ReadWithMetadata::<Page>::by_keys(["p1", "p2"]).run(&ctx).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn reads_share_one_bound_transaction() {
        let (db, ctx) = connection();
        seed_people(&ctx);
        let before = db.stats().read_transactions;
        let (one, two) = ctx
            .with_bound_read(|bound| {
                let one = Read::<Person>::by_key("k1").run(bound)?;
                let two = Read::<Person>::by_key("k2").run(bound)?;
                Ok::<_, crate::PersistError>((one, two))
            })
            .unwrap();
        assert!(one.is_some() && two.is_some());
        assert_eq!(db.stats().read_transactions, before + 1);
    }
}
