//! Content hashing for Stow.
//!
//! Computes algorithm-tagged [`Digest`](stow_types::Digest)s over byte
//! slices or incrementally through [`std::io::Write`], and verifies content
//! against an expected digest.
//!
//! All hashing wraps established libraries (`sha2`, `blake3`); there is no
//! custom cryptography.

pub mod hasher;

pub use hasher::{ContentHasher, DigestWriter};
