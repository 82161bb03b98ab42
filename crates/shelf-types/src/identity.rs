use std::fmt::Display;

use crate::index::Index;

/// Plain string identifiers. Most domain types use this as their
/// [`Identifiable::Id`].
pub type Identifier = String;

/// A type with a stable identifier.
///
/// The identifier's display form becomes the record key, so it must stay the
/// same for as long as the record is stored.
pub trait Identifiable {
    /// The identifier type. Its `Display` output is the store key.
    type Id: Display;

    /// The identifier of this value.
    fn identifier(&self) -> Self::Id;
}

/// An identifiable type whose instances all live in one collection.
pub trait Persistable: Identifiable {
    /// The collection every instance of this type is stored in.
    const COLLECTION: &'static str;

    /// The store key: the identifier's display form.
    fn key(&self) -> String {
        self.identifier().to_string()
    }

    /// The index of this value in the store.
    fn index(&self) -> Index {
        Self::index_with_key(self.key())
    }

    /// The index for `key` in this type's collection.
    fn index_with_key(key: impl Into<String>) -> Index {
        Index::new(Self::COLLECTION, key)
    }

    /// Indexes for each key, in input order, in this type's collection.
    fn indexes_with_keys<I, K>(keys: I) -> Vec<Index>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        keys.into_iter().map(Self::index_with_key).collect()
    }
}

/// The store key of `value`.
pub fn key_for<P: Persistable>(value: &P) -> String {
    value.key()
}

/// The store index of `value`.
pub fn index_for<P: Persistable>(value: &P) -> Index {
    value.index()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Person {
        id: Identifier,
    }

    impl Identifiable for Person {
        type Id = Identifier;
        fn identifier(&self) -> Identifier {
            self.id.clone()
        }
    }

    impl Persistable for Person {
        const COLLECTION: &'static str = "people";
    }

    /// Numeric identifiers are keyed by their decimal display form.
    struct Ticket(u64);

    impl Identifiable for Ticket {
        type Id = u64;
        fn identifier(&self) -> u64 {
            self.0
        }
    }

    impl Persistable for Ticket {
        const COLLECTION: &'static str = "tickets";
    }

    #[test]
    fn key_is_identifier_display() {
        let ticket = Ticket(42);
        assert_eq!(ticket.key(), "42");
        assert_eq!(key_for(&ticket), "42");
    }

    #[test]
    fn index_uses_static_collection() {
        let person = Person { id: "alice".into() };
        assert_eq!(person.index(), Index::new("people", "alice"));
        assert_eq!(index_for(&person), person.index());
    }

    #[test]
    fn indexes_with_keys_keeps_order() {
        let indexes = Person::indexes_with_keys(["b", "a", "c"]);
        let keys: Vec<&str> = indexes.iter().map(Index::key).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert!(indexes.iter().all(|i| i.collection() == "people"));
    }

    proptest! {
        #[test]
        fn rederived_index_is_stable(id in "[a-zA-Z0-9_-]{1,24}") {
            let person = Person { id: id.clone() };
            prop_assert_eq!(person.index(), person.index());
            prop_assert_eq!(person.index(), Person::index_with_key(id));
        }
    }
}
