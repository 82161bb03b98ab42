//! Sample records, one per capability row, shared by the unit tests.

use serde::{Deserialize, Serialize};
use shelf_codec::{
    BincodeCodec, Codec, CodecError, CodecResult, Coded, CodedMetadata, Coder, Direct,
    DirectMetadata, Explicit, JsonCodec, NoMetadata, Record, Storable, ViaCoder,
};
use shelf_context::{ConnectionContext, DatabaseContext};
use shelf_store::{Database, InMemoryConnection, InMemoryDatabase};
use shelf_types::{Identifiable, Identifier, Persistable};

macro_rules! identified_by {
    ($ty:ty, $field:ident: $id:ty, $collection:literal) => {
        impl Identifiable for $ty {
            type Id = $id;
            fn identifier(&self) -> $id {
                self.$field.clone()
            }
        }

        impl Persistable for $ty {
            const COLLECTION: &'static str = $collection;
        }
    };
}

/// Storable, no metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: Identifier,
    pub name: String,
}

identified_by!(Person, id: Identifier, "people");
impl Storable for Person {}
impl Record for Person {
    type Payload = Direct;
    type Metadata = NoMetadata;
}

impl Person {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Storable, with storable metadata (a tag).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Identifier,
    pub text: String,
}

identified_by!(Note, id: Identifier, "notes");
impl Storable for Note {}
impl Record for Note {
    type Payload = Direct;
    type Metadata = DirectMetadata<String>;
}

/// Explicitly coded metadata shared by several fixtures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stamp {
    pub revision: u32,
    pub author: String,
}

impl Coded for Stamp {
    type Codec = JsonCodec;
}

impl Stamp {
    pub fn new(revision: u32, author: &str) -> Self {
        Self {
            revision,
            author: author.into(),
        }
    }
}

/// Storable, with coded metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: u64,
    pub price_cents: u64,
}

identified_by!(Product, sku: u64, "products");
impl Storable for Product {}
impl Record for Product {
    type Payload = Direct;
    type Metadata = CodedMetadata<Stamp>;
}

/// Coded, no metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Identifier,
    pub body: String,
}

identified_by!(Document, id: Identifier, "documents");
impl Coded for Document {
    type Codec = JsonCodec;
}
impl Record for Document {
    type Payload = Explicit;
    type Metadata = NoMetadata;
}

/// Coded, with storable metadata (a view count).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: Identifier,
    pub title: String,
}

identified_by!(Page, id: Identifier, "pages");
impl Coded for Page {
    type Codec = BincodeCodec;
}
impl Record for Page {
    type Payload = Explicit;
    type Metadata = DirectMetadata<u32>;
}

/// Coded through a companion coder object, with coded metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Barcode {
    UpcA(u8, u32, u32, u8),
    QrCode(String),
}

impl Identifiable for Barcode {
    type Id = String;
    fn identifier(&self) -> String {
        match self {
            Barcode::UpcA(a, b, c, d) => format!("upc-{a}-{b}-{c}-{d}"),
            Barcode::QrCode(text) => format!("qr-{text}"),
        }
    }
}

impl Persistable for Barcode {
    const COLLECTION: &'static str = "barcodes";
}

#[derive(Serialize, Deserialize)]
pub struct BarcodeCoder {
    upc: Option<(u8, u32, u32, u8)>,
    qr: Option<String>,
}

impl Storable for BarcodeCoder {}

impl Coder for BarcodeCoder {
    type Value = Barcode;

    fn from_value(value: &Barcode) -> Self {
        match value {
            Barcode::UpcA(a, b, c, d) => Self {
                upc: Some((*a, *b, *c, *d)),
                qr: None,
            },
            Barcode::QrCode(text) => Self {
                upc: None,
                qr: Some(text.clone()),
            },
        }
    }

    fn into_value(self) -> Option<Barcode> {
        match (self.upc, self.qr) {
            (Some((a, b, c, d)), None) => Some(Barcode::UpcA(a, b, c, d)),
            (None, Some(text)) => Some(Barcode::QrCode(text)),
            _ => None,
        }
    }
}

impl Coded for Barcode {
    type Codec = ViaCoder<BarcodeCoder>;
}

impl Record for Barcode {
    type Payload = Explicit;
    type Metadata = CodedMetadata<Stamp>;
}

/// A coded record whose codec refuses to encode blank values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fragile {
    pub id: Identifier,
    pub content: String,
}

identified_by!(Fragile, id: Identifier, "fragile");

pub struct RejectBlank;

impl Codec<Fragile> for RejectBlank {
    fn encode(value: &Fragile) -> CodecResult<Vec<u8>> {
        if value.content.trim().is_empty() {
            return Err(CodecError::Encode("blank content".into()));
        }
        <JsonCodec as Codec<Fragile>>::encode(value)
    }

    fn decode(bytes: &[u8]) -> CodecResult<Fragile> {
        <JsonCodec as Codec<Fragile>>::decode(bytes)
    }
}

impl Coded for Fragile {
    type Codec = RejectBlank;
}

impl Record for Fragile {
    type Payload = Explicit;
    type Metadata = NoMetadata;
}

pub fn database() -> (InMemoryDatabase, DatabaseContext<InMemoryDatabase>) {
    let db = InMemoryDatabase::new();
    (db.clone(), DatabaseContext::new(db))
}

pub fn connection() -> (InMemoryDatabase, ConnectionContext<InMemoryConnection>) {
    let db = InMemoryDatabase::new();
    let ctx = ConnectionContext::new(db.new_connection().unwrap());
    (db, ctx)
}
