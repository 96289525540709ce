//! Content-addressed retrieval for Stow.
//!
//! Given a [`Descriptor`](stow_types::Descriptor) (digest, size, and media
//! type), a [`Store`] produces a random-access [`ReaderAt`] over the matching
//! bytes, or reports that it does not hold them.
//!
//! # Stores
//!
//! All backends implement the [`Store`] trait:
//!
//! - [`MemoryStore`] -- `HashMap`-based store that hashes content on insert
//! - [`MultiStore`] -- probes an ordered list of stores and returns the first
//!   hit, aggregating every miss and failure otherwise
//!
//! # Design Rules
//!
//! 1. The digest is the only lookup key; size and media type are metadata.
//! 2. Absence (`NotFound`) is always distinguishable from a broken backend.
//! 3. Lookups are read-only and safe to run concurrently.
//! 4. A failed lookup never yields a partial reader.
//! 5. Re-hashing content is opt-in ([`verify`], [`MultiStoreConfig`]).
//! 6. Every lookup takes a [`Context`]; blocking backends honor it.

pub mod config;
pub mod context;
pub mod error;
pub mod memory;
pub mod multi;
pub mod reader;
pub mod traits;
pub mod verify;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{FailurePolicy, MultiStoreConfig};
pub use context::Context;
pub use error::{AggregateError, ProbeFailure, StoreError, StoreResult};
pub use memory::{MemoryStore, DEFAULT_BLOB_MEDIA_TYPE};
pub use multi::MultiStore;
pub use reader::{read_all, BytesReader, ReaderAt, ReaderAtCursor};
pub use traits::Store;
