//! High-level SDK for shelf.
//!
//! [`Shelf`] opens a configured store and hands out execution contexts; the
//! [`prelude`] brings the identity, capability and operation types into scope.
//! This is the main entry point for applications embedding shelf.
//!
//! ```ignore
//! use shelf_sdk::prelude::*;
//!
//! let shelf = Shelf::open();
//! let db = shelf.database();
//! Write::item(person.clone()).run(&db)?;
//! let found = Read::<Person>::by_key("alice").run(&db)?;
//! ```

pub mod error;
pub mod shelf;

pub use error::{SdkError, SdkResult};
pub use shelf::Shelf;

pub mod prelude {
    pub use crate::{SdkError, SdkResult, Shelf};
    pub use shelf_codec::{
        BincodeCodec, Codec, Coded, CodedMetadata, Coder, Direct, DirectMetadata, Explicit,
        JsonCodec, MetadataOf, NoMetadata, Record, Storable, ViaCoder,
    };
    pub use shelf_context::{
        AsyncContext, BoundRead, BoundWrite, ConnectionContext, DatabaseContext, DeferredContext,
        DeferredTask, ReadContext, TaskOutcome, WorkQueue, WriteContext,
    };
    pub use shelf_persist::{
        Existing, PersistError, PersistExt, PersistResult, Read, ReadMetadata, ReadWithMetadata,
        Remove, Write,
    };
    pub use shelf_store::StoreConfig;
    pub use shelf_types::{Identifiable, Identifier, Index, Item, Persistable};
}
