//! Capability model for shelf.
//!
//! A domain type is classified along two independent axes, both resolved at
//! compile time through the [`Record`] trait:
//!
//! - **Representation**: how the value itself becomes payload bytes:
//!   [`Direct`] for [`Storable`] types the store archives natively, or
//!   [`Explicit`] for [`Coded`] types that name their own [`Codec`].
//! - **Metadata**: whether a metadata blob travels with the value:
//!   [`NoMetadata`], [`DirectMetadata`] or [`CodedMetadata`].
//!
//! The six legal combinations are listed in [`Strategy::ALL`]. A type picks
//! exactly one, because each associated type has one value per impl.

pub mod codec;
pub mod error;
pub mod record;
pub mod strategy;

pub use codec::{BincodeCodec, Codec, Coded, Coder, JsonCodec, Storable, ViaCoder};
pub use error::{CodecError, CodecResult};
pub use record::{MetadataOf, Record};
pub use strategy::{
    CarriesMetadata, CodedMetadata, Direct, DirectMetadata, Explicit, MetadataKind,
    MetadataStrategy, NoMetadata, PayloadStrategy, Representation, Strategy, WritePath,
};
