use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Hash algorithm that produced a [`Digest`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256, the default for OCI content.
    #[default]
    Sha256,
    /// SHA-512.
    Sha512,
    /// BLAKE3 (256-bit output).
    Blake3,
}

impl DigestAlgorithm {
    /// The algorithm tag used in the string form of a digest.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Blake3 => "blake3",
        }
    }

    /// Raw digest length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha256 | Self::Blake3 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Length of the hex-encoded portion of a digest.
    pub fn encoded_len(&self) -> usize {
        self.output_len() * 2
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "blake3" => Ok(Self::Blake3),
            other => Err(TypeError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Content-derived identifier of the form `<algorithm>:<hex>`.
///
/// A `Digest` is always validated on construction: the algorithm must be
/// known and the encoded part must be lowercase hex of the algorithm's exact
/// output length. Two equal digests name bit-identical content.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest {
    algorithm: DigestAlgorithm,
    encoded: String,
}

impl Digest {
    /// Build a digest from an algorithm and its hex encoding.
    pub fn new(algorithm: DigestAlgorithm, encoded: impl Into<String>) -> Result<Self, TypeError> {
        let encoded = encoded.into();
        validate_encoded(algorithm, &encoded)?;
        Ok(Self { algorithm, encoded })
    }

    /// Build a digest from raw hash output.
    pub fn from_raw(algorithm: DigestAlgorithm, raw: &[u8]) -> Result<Self, TypeError> {
        Self::new(algorithm, hex::encode(raw))
    }

    pub fn sha256(raw: [u8; 32]) -> Self {
        Self::from_fixed(DigestAlgorithm::Sha256, &raw)
    }

    pub fn sha512(raw: [u8; 64]) -> Self {
        Self::from_fixed(DigestAlgorithm::Sha512, &raw)
    }

    pub fn blake3(raw: [u8; 32]) -> Self {
        Self::from_fixed(DigestAlgorithm::Blake3, &raw)
    }

    // Callers pass arrays of the algorithm's output length.
    fn from_fixed(algorithm: DigestAlgorithm, raw: &[u8]) -> Self {
        Self {
            algorithm,
            encoded: hex::encode(raw),
        }
    }

    /// Parse the `<algorithm>:<hex>` string form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let (algorithm, encoded) = s
            .split_once(':')
            .ok_or_else(|| TypeError::InvalidDigest(s.to_string()))?;
        if algorithm.is_empty() || encoded.is_empty() {
            return Err(TypeError::InvalidDigest(s.to_string()));
        }
        Self::new(algorithm.parse()?, encoded)
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// The hex-encoded hash, without the algorithm tag.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Decode the hex portion back into raw hash bytes.
    pub fn to_raw(&self) -> Vec<u8> {
        // Validated at construction.
        hex::decode(&self.encoded).unwrap_or_default()
    }

    /// Short hex representation (first 12 characters), for logs.
    pub fn short_hex(&self) -> &str {
        &self.encoded[..12]
    }
}

fn validate_encoded(algorithm: DigestAlgorithm, encoded: &str) -> Result<(), TypeError> {
    if encoded.len() != algorithm.encoded_len() {
        return Err(TypeError::InvalidLength {
            algorithm: algorithm.to_string(),
            expected: algorithm.encoded_len(),
            actual: encoded.len(),
        });
    }
    if let Some(c) = encoded
        .chars()
        .find(|c| !matches!(c, '0'..='9' | 'a'..='f'))
    {
        return Err(TypeError::InvalidHex(format!(
            "unexpected character {c:?} in {encoded}"
        )));
    }
    Ok(())
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}:{})", self.algorithm, self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.encoded)
    }
}

impl FromStr for Digest {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Digest {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.to_string()
    }
}
