use std::io;

use sha2::{Digest as _, Sha256, Sha512};
use stow_types::{Digest, DigestAlgorithm};

/// Content hasher producing algorithm-tagged digests.
///
/// Unlike an object-id hasher, no domain tag is mixed in: a digest must match
/// what any other tool computes over the same raw bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    algorithm: DigestAlgorithm,
}

impl ContentHasher {
    pub const SHA256: Self = Self::new(DigestAlgorithm::Sha256);
    pub const SHA512: Self = Self::new(DigestAlgorithm::Sha512);
    pub const BLAKE3: Self = Self::new(DigestAlgorithm::Blake3);

    pub const fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Hasher matching the algorithm of an existing digest.
    pub fn for_digest(digest: &Digest) -> Self {
        Self::new(digest.algorithm())
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Hash raw bytes.
    pub fn digest(&self, data: &[u8]) -> Digest {
        let mut writer = self.writer();
        writer.update(data);
        writer.finalize()
    }

    /// Start an incremental hash.
    pub fn writer(&self) -> DigestWriter {
        DigestWriter::new(self.algorithm)
    }

    /// Verify that `data` hashes to `expected` under the expected digest's
    /// own algorithm.
    pub fn verify(data: &[u8], expected: &Digest) -> bool {
        Self::for_digest(expected).digest(data) == *expected
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::SHA256
    }
}

enum HashState {
    Sha256(Sha256),
    Sha512(Sha512),
    Blake3(Box<blake3::Hasher>),
}

/// Incremental digest computation.
///
/// Implements [`io::Write`] so content can be fed with `io::copy`.
pub struct DigestWriter {
    state: HashState,
    written: u64,
}

impl DigestWriter {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        let state = match algorithm {
            DigestAlgorithm::Sha256 => HashState::Sha256(Sha256::new()),
            DigestAlgorithm::Sha512 => HashState::Sha512(Sha512::new()),
            DigestAlgorithm::Blake3 => HashState::Blake3(Box::new(blake3::Hasher::new())),
        };
        Self { state, written: 0 }
    }

    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            HashState::Sha256(h) => h.update(data),
            HashState::Sha512(h) => h.update(data),
            HashState::Blake3(h) => {
                h.update(data);
            }
        }
        self.written += data.len() as u64;
    }

    /// Number of bytes hashed so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finalize(self) -> Digest {
        match self.state {
            HashState::Sha256(h) => {
                let mut raw = [0u8; 32];
                raw.copy_from_slice(&h.finalize());
                Digest::sha256(raw)
            }
            HashState::Sha512(h) => {
                let mut raw = [0u8; 64];
                raw.copy_from_slice(&h.finalize());
                Digest::sha512(raw)
            }
            HashState::Blake3(h) => Digest::blake3(*h.finalize().as_bytes()),
        }
    }
}

impl io::Write for DigestWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
