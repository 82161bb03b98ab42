use shelf_types::Persistable;

use crate::error::CodecResult;
use crate::strategy::{MetadataStrategy, PayloadStrategy, Strategy};

/// A persistable type together with its storage strategy.
///
/// `Payload` picks how the value itself becomes bytes and `Metadata` picks
/// whether metadata accompanies it and how. Every pairing of the two is a
/// valid record; which reads and writes are available follows from them.
///
/// ```ignore
/// impl Record for Person {
///     type Payload = Direct;
///     type Metadata = CodedMetadata<Timestamp>;
/// }
/// ```
pub trait Record: Persistable + Sized + Send + 'static {
    type Payload: PayloadStrategy<Self>;
    type Metadata: MetadataStrategy;

    /// The capability-table row this record occupies.
    fn strategy() -> Strategy {
        Strategy::new(
            <Self::Payload as PayloadStrategy<Self>>::REPRESENTATION,
            <Self::Metadata as MetadataStrategy>::KIND,
        )
    }

    fn encode_payload(&self) -> CodecResult<Vec<u8>> {
        <Self::Payload as PayloadStrategy<Self>>::encode(self)
    }

    fn decode_payload(bytes: &[u8]) -> CodecResult<Self> {
        <Self::Payload as PayloadStrategy<Self>>::decode(bytes)
    }
}

/// The metadata value type of record `T`.
pub type MetadataOf<T> = <<T as Record>::Metadata as MetadataStrategy>::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Coded, JsonCodec, Storable};
    use crate::strategy::{
        CodedMetadata, Direct, DirectMetadata, Explicit, MetadataKind, MetadataStrategy,
        NoMetadata, Representation,
    };
    use serde::{Deserialize, Serialize};
    use shelf_types::{Identifiable, Identifier};

    macro_rules! record {
        ($name:ident, $collection:literal, $payload:ty, $metadata:ty) => {
            #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
            struct $name {
                id: Identifier,
            }

            impl Identifiable for $name {
                type Id = Identifier;
                fn identifier(&self) -> Identifier {
                    self.id.clone()
                }
            }

            impl Persistable for $name {
                const COLLECTION: &'static str = $collection;
            }

            impl Record for $name {
                type Payload = $payload;
                type Metadata = $metadata;
            }
        };
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Stamp(u64);

    impl Coded for Stamp {
        type Codec = JsonCodec;
    }

    record!(Plain, "plain", Direct, NoMetadata);
    record!(Tagged, "tagged", Direct, DirectMetadata<String>);
    record!(Stamped, "stamped", Direct, CodedMetadata<Stamp>);
    record!(Document, "documents", Explicit, NoMetadata);
    record!(TaggedDocument, "tagged_documents", Explicit, DirectMetadata<u32>);
    record!(StampedDocument, "stamped_documents", Explicit, CodedMetadata<Stamp>);

    impl Storable for Plain {}
    impl Storable for Tagged {}
    impl Storable for Stamped {}

    impl Coded for Document {
        type Codec = JsonCodec;
    }
    impl Coded for TaggedDocument {
        type Codec = JsonCodec;
    }
    impl Coded for StampedDocument {
        type Codec = JsonCodec;
    }

    #[test]
    fn each_record_occupies_its_row() {
        let rows = [
            Plain::strategy(),
            Tagged::strategy(),
            Stamped::strategy(),
            Document::strategy(),
            TaggedDocument::strategy(),
            StampedDocument::strategy(),
        ];
        assert_eq!(rows, Strategy::ALL);
    }

    #[test]
    fn explicit_payload_goes_through_codec() {
        let doc = Document { id: "d1".into() };
        let bytes = doc.encode_payload().unwrap();
        assert_eq!(bytes, br#"{"id":"d1"}"#);
        assert_eq!(Document::decode_payload(&bytes).unwrap(), doc);
    }

    #[test]
    fn direct_payload_is_native_archive() {
        let plain = Plain { id: "p1".into() };
        let bytes = plain.encode_payload().unwrap();
        assert_eq!(bytes, plain.archive().unwrap());
        assert_eq!(Plain::decode_payload(&bytes).unwrap(), plain);
    }

    #[test]
    fn metadata_type_follows_strategy() {
        let tag: MetadataOf<Tagged> = "hot".to_string();
        let stamp: MetadataOf<StampedDocument> = Stamp(3);
        let bytes = DirectMetadata::<String>::encode(&tag).unwrap();
        assert_eq!(DirectMetadata::<String>::decode(&bytes).unwrap(), tag);
        assert_eq!(stamp, Stamp(3));
        assert_eq!(
            Stamped::strategy().representation,
            Representation::DirectlyStorable
        );
        assert_eq!(Document::strategy().metadata, MetadataKind::Absent);
    }
}
