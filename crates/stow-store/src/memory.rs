use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use stow_crypto::ContentHasher;
use stow_types::media_type::{self, ANNOTATION_TITLE};
use stow_types::{Descriptor, Digest, DigestAlgorithm};
use tracing::debug;

use crate::context::Context;
use crate::error::{StoreError, StoreResult};
use crate::reader::{BytesReader, ReaderAt};
use crate::traits::Store;
use crate::verify::verify_bytes;

/// Media type recorded when [`MemoryStore::insert`] is given an empty one.
pub const DEFAULT_BLOB_MEDIA_TYPE: &str = media_type::IMAGE_LAYER;

#[derive(Default)]
struct Inner {
    blobs: HashMap<Digest, Bytes>,
    names: HashMap<String, Descriptor>,
}

/// In-memory, HashMap-based content store.
///
/// Content is keyed by digest; a secondary index maps caller-chosen names to
/// the descriptor of their last insertion. Both maps sit behind one `RwLock`
/// so a lookup sees an insertion either completely or not at all. The store
/// only grows.
///
/// Stored bytes are reference-counted: readers returned by [`Store::open`]
/// share them without copying and stay valid independently of the store.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    hasher: ContentHasher,
    label: Option<String>,
}

impl MemoryStore {
    /// Create an empty store hashing with SHA-256.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            hasher: ContentHasher::default(),
            label: None,
        }
    }

    /// Use `algorithm` for descriptors created by [`insert`](Self::insert).
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.hasher = ContentHasher::new(algorithm);
        self
    }

    /// Name this store in diagnostics.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    // The maps are only ever updated by single inserts, so a poisoned lock
    // still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hash `content`, store it, and return its descriptor.
    ///
    /// A non-empty `name` is indexed for [`get_by_name`](Self::get_by_name)
    /// and recorded as the descriptor's title annotation. Inserting content
    /// already present keeps the existing bytes.
    pub fn insert(
        &self,
        name: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Descriptor {
        let name = name.into();
        let mut media_type = media_type.into();
        if media_type.is_empty() {
            media_type = DEFAULT_BLOB_MEDIA_TYPE.to_string();
        }
        let content = content.into();

        let digest = self.hasher.digest(&content);
        let mut desc = Descriptor::new(media_type, digest, content.len() as u64);
        if !name.is_empty() {
            desc = desc.with_annotation(ANNOTATION_TITLE, name);
        }
        self.put(&desc, content);
        desc
    }

    /// Store `content` under a caller-built descriptor.
    ///
    /// The content is checked against `desc` first, so a descriptor can never
    /// point at bytes it does not describe.
    pub fn set(&self, desc: &Descriptor, content: impl Into<Bytes>) -> StoreResult<()> {
        let content = content.into();
        verify_bytes(desc, &content)?;
        self.put(desc, content);
        Ok(())
    }

    fn put(&self, desc: &Descriptor, content: Bytes) {
        let mut inner = self.write();
        inner
            .blobs
            .entry(desc.digest.clone())
            .or_insert(content);
        if let Some(name) = desc.title().filter(|n| !n.is_empty()) {
            inner.names.insert(name.to_string(), desc.clone());
        }
        debug!(
            digest = %desc.digest,
            size = desc.size,
            name = desc.title().unwrap_or_default(),
            "memory store insert"
        );
    }

    /// Stored bytes for `desc`'s digest.
    pub fn get(&self, desc: &Descriptor) -> Option<Bytes> {
        self.read().blobs.get(&desc.digest).cloned()
    }

    /// Descriptor and bytes of the last insertion under `name`.
    pub fn get_by_name(&self, name: &str) -> Option<(Descriptor, Bytes)> {
        let inner = self.read();
        let desc = inner.names.get(name)?;
        let content = inner.blobs.get(&desc.digest)?;
        Some((desc.clone(), content.clone()))
    }

    pub fn contains(&self, desc: &Descriptor) -> bool {
        self.read().blobs.contains_key(&desc.digest)
    }

    /// Number of distinct pieces of content.
    pub fn len(&self) -> usize {
        self.read().blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().blobs.is_empty()
    }

    /// Total bytes across all stored content.
    pub fn total_bytes(&self) -> u64 {
        self.read().blobs.values().map(|b| b.len() as u64).sum()
    }

    /// Descriptors of all named insertions, sorted by name.
    pub fn named(&self) -> Vec<(String, Descriptor)> {
        let inner = self.read();
        let mut named: Vec<_> = inner
            .names
            .iter()
            .map(|(name, desc)| (name.clone(), desc.clone()))
            .collect();
        named.sort_by(|a, b| a.0.cmp(&b.0));
        named
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    // Nothing here blocks beyond lock contention, so the context is unused.
    fn open(&self, _ctx: &Context, desc: &Descriptor) -> StoreResult<Box<dyn ReaderAt>> {
        match self.get(desc) {
            Some(content) => Ok(Box::new(BytesReader::new(content))),
            None => Err(StoreError::NotFound(desc.digest.clone())),
        }
    }

    fn name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| "MemoryStore".to_string())
    }

    fn exists(&self, _ctx: &Context, desc: &Descriptor) -> StoreResult<bool> {
        Ok(self.contains(desc))
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("MemoryStore")
            .field("label", &self.label)
            .field("algorithm", &self.hasher.algorithm())
            .field("content_count", &inner.blobs.len())
            .field("name_count", &inner.names.len())
            .finish()
    }
}
