use std::fmt;

use stow_types::Digest;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested content is not held by this store.
    #[error("content not found: {0}")]
    NotFound(Digest),

    /// A store-specific fault, distinct from plain absence.
    #[error("backend failure in {store}: {source}")]
    Backend {
        store: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// I/O error while reading content.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller's context was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Content length disagrees with the descriptor.
    #[error("size mismatch for {digest}: descriptor declares {expected} bytes, content has {actual}")]
    SizeMismatch {
        digest: Digest,
        expected: u64,
        actual: u64,
    },

    /// Content hash disagrees with the descriptor.
    #[error("digest mismatch: expected {expected}, computed {computed}")]
    DigestMismatch { expected: Digest, computed: Digest },

    /// Invalid store configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// No store in a composer produced the content.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl StoreError {
    /// Wrap an arbitrary cause as a failure of the named store.
    pub fn backend(
        store: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Backend {
            store: store.into(),
            source: source.into(),
        }
    }

    /// `true` for plain absence, including an aggregate in which every store
    /// reported absence.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Aggregate(agg) => agg.is_not_found(),
            _ => false,
        }
    }

    /// `true` when the caller's context ended the operation.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// `true` for content that does not match its descriptor.
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::SizeMismatch { .. } | Self::DigestMismatch { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of probing one store that did not produce the content.
#[derive(Debug)]
pub struct ProbeFailure {
    /// Position of the store in registration order.
    pub index: usize,
    /// The store's name.
    pub store: String,
    pub error: StoreError,
}

/// Composer-level failure carrying every probed store's outcome.
///
/// An aggregate with no failures comes from a composer with no stores and
/// reports as not-found.
#[derive(Debug)]
pub struct AggregateError {
    digest: Digest,
    failures: Vec<ProbeFailure>,
}

impl AggregateError {
    pub fn new(digest: Digest, failures: Vec<ProbeFailure>) -> Self {
        Self { digest, failures }
    }

    /// The digest that was looked up.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Per-store outcomes, in probe order.
    pub fn failures(&self) -> &[ProbeFailure] {
        &self.failures
    }

    /// `true` when every probed store reported plain absence.
    pub fn is_not_found(&self) -> bool {
        self.failures.iter().all(|f| f.error.is_not_found())
    }

    /// `true` when at least one store failed with something other than
    /// absence.
    pub fn is_degraded(&self) -> bool {
        !self.is_not_found()
    }

    /// Failures other than plain absence.
    pub fn backend_failures(&self) -> impl Iterator<Item = &ProbeFailure> {
        self.failures.iter().filter(|f| !f.error.is_not_found())
    }

    pub fn into_failures(self) -> Vec<ProbeFailure> {
        self.failures
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let probed = self.failures.len();
        if self.is_not_found() {
            return write!(
                f,
                "content {} not found in any of {probed} store(s)",
                self.digest
            );
        }
        let failed = self.backend_failures().count();
        write!(
            f,
            "lookup of {} failed: {failed} of {probed} store(s) malfunctioning",
            self.digest
        )?;
        for failure in self.backend_failures() {
            write!(
                f,
                "; [{}] {}: {}",
                failure.index, failure.store, failure.error
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}
