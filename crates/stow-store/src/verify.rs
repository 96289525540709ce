//! Opt-in integrity checks of content against its descriptor.
//!
//! Stores are trusted on the hot path; these helpers re-hash content only
//! when a caller asks for it.

use std::io;

use stow_crypto::ContentHasher;
use stow_types::{Descriptor, Digest};

use crate::error::{StoreError, StoreResult};
use crate::reader::{ReaderAt, ReaderAtCursor};

/// Check in-memory content against `desc` (size first, then digest).
pub fn verify_bytes(desc: &Descriptor, data: &[u8]) -> StoreResult<()> {
    check_size(desc, data.len() as u64)?;
    check_digest(desc, ContentHasher::for_digest(&desc.digest).digest(data))
}

/// Stream a reader's content through the descriptor's hash and check it.
pub fn verify_reader(desc: &Descriptor, reader: &dyn ReaderAt) -> StoreResult<()> {
    check_size(desc, reader.size())?;
    let mut writer = ContentHasher::for_digest(&desc.digest).writer();
    io::copy(&mut ReaderAtCursor::new(reader), &mut writer)?;
    check_size(desc, writer.written())?;
    check_digest(desc, writer.finalize())
}

fn check_size(desc: &Descriptor, actual: u64) -> StoreResult<()> {
    if actual != desc.size {
        return Err(StoreError::SizeMismatch {
            digest: desc.digest.clone(),
            expected: desc.size,
            actual,
        });
    }
    Ok(())
}

fn check_digest(desc: &Descriptor, computed: Digest) -> StoreResult<()> {
    if computed != desc.digest {
        return Err(StoreError::DigestMismatch {
            expected: desc.digest.clone(),
            computed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::BytesReader;
    use stow_types::media_type;

    fn descriptor_of(data: &[u8]) -> Descriptor {
        Descriptor::new(
            media_type::OCTET_STREAM,
            ContentHasher::SHA256.digest(data),
            data.len() as u64,
        )
    }

    #[test]
    fn matching_content_passes() {
        let desc = descriptor_of(b"Hello World!");
        assert!(verify_bytes(&desc, b"Hello World!").is_ok());
        assert!(verify_reader(&desc, &BytesReader::new(&b"Hello World!"[..])).is_ok());
    }

    #[test]
    fn wrong_length_is_size_mismatch() {
        let desc = descriptor_of(b"Hello World!");
        let err = verify_reader(&desc, &BytesReader::new(&b"Hello"[..])).unwrap_err();
        assert!(matches!(
            err,
            StoreError::SizeMismatch {
                expected: 12,
                actual: 5,
                ..
            }
        ));
    }

    #[test]
    fn same_length_different_bytes_is_digest_mismatch() {
        let desc = descriptor_of(b"Hello World!");
        let err = verify_bytes(&desc, b"Hello Wyrld!").unwrap_err();
        assert!(matches!(err, StoreError::DigestMismatch { .. }));
    }

    #[test]
    fn uses_descriptor_algorithm() {
        let data = b"blake3 content";
        let desc = Descriptor::new(
            media_type::OCTET_STREAM,
            ContentHasher::BLAKE3.digest(data),
            data.len() as u64,
        );
        assert!(verify_bytes(&desc, data).is_ok());
    }
}
