//! Foundation types for Stow content-addressed retrieval.
//!
//! Every other Stow crate depends on `stow-types`.
//!
//! # Key Types
//!
//! - [`Digest`] — Algorithm-tagged content hash (`sha256:<hex>`)
//! - [`DigestAlgorithm`] — Supported hash algorithms
//! - [`Descriptor`] — Digest, size, and media type; the universal lookup key
//! - [`media_type`] — Well-known OCI media types and annotation keys

pub mod descriptor;
pub mod digest;
pub mod error;
pub mod media_type;

pub use descriptor::Descriptor;
pub use digest::{Digest, DigestAlgorithm};
pub use error::TypeError;
