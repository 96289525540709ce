use std::sync::Arc;

use stow_types::Descriptor;
use tracing::{debug, warn};

use crate::config::{FailurePolicy, MultiStoreConfig};
use crate::context::Context;
use crate::error::{AggregateError, ProbeFailure, StoreResult};
use crate::reader::ReaderAt;
use crate::traits::Store;
use crate::verify::verify_reader;

/// Store that resolves lookups across an ordered list of other stores.
///
/// Stores are probed in registration order and the first success wins; later
/// stores are not touched. Registration order therefore expresses priority,
/// e.g. a local cache ahead of an archive. Stores are shared references: the
/// composer never copies, reorders, deduplicates, or mutates them, and keeps
/// no cache, so content added to a store later is visible to the next lookup.
///
/// Registration takes `&mut self`; once a `MultiStore` is shared behind an
/// `Arc` its store list is fixed.
#[derive(Default)]
pub struct MultiStore {
    stores: Vec<Arc<dyn Store>>,
    config: MultiStoreConfig,
}

impl MultiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MultiStoreConfig) -> Self {
        Self {
            stores: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &MultiStoreConfig {
        &self.config
    }

    /// Append one store after those already registered.
    pub fn add_store(&mut self, store: Arc<dyn Store>) -> &mut Self {
        self.stores.push(store);
        self
    }

    /// Append stores, in iteration order, after those already registered.
    pub fn register<I>(&mut self, stores: I) -> &mut Self
    where
        I: IntoIterator<Item = Arc<dyn Store>>,
    {
        self.stores.extend(stores);
        self
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Names of registered stores, in probe order.
    pub fn store_names(&self) -> Vec<String> {
        self.stores.iter().map(|s| s.name()).collect()
    }

    fn probe(
        &self,
        store: &dyn Store,
        ctx: &Context,
        desc: &Descriptor,
    ) -> StoreResult<Box<dyn ReaderAt>> {
        let reader = store.open(ctx, desc)?;
        if self.config.verify_content {
            verify_reader(desc, reader.as_ref())?;
        }
        Ok(reader)
    }
}

/// A cancelled or expired context ends the lookup with `Cancelled` or
/// `DeadlineExceeded` directly; failures recorded before that point are dropped.
impl Store for MultiStore {
    fn open(&self, ctx: &Context, desc: &Descriptor) -> StoreResult<Box<dyn ReaderAt>> {
        let mut failures = Vec::new();

        for (index, store) in self.stores.iter().enumerate() {
            ctx.check()?;

            let error = match self.probe(store.as_ref(), ctx, desc) {
                Ok(reader) => {
                    debug!(digest = %desc.digest, store = %store.name(), index, "content resolved");
                    return Ok(reader);
                }
                Err(e) if e.is_cancellation() => return Err(e),
                Err(e) => e,
            };

            let not_found = error.is_not_found();
            if not_found {
                debug!(digest = %desc.digest, store = %store.name(), index, "content not in store");
            } else {
                warn!(
                    digest = %desc.digest,
                    store = %store.name(),
                    index,
                    error = %error,
                    "store failed during lookup"
                );
            }
            failures.push(ProbeFailure {
                index,
                store: store.name(),
                error,
            });

            if !not_found && self.config.failure_policy == FailurePolicy::FailFast {
                break;
            }
        }

        Err(AggregateError::new(desc.digest.clone(), failures).into())
    }

    fn name(&self) -> String {
        format!("MultiStore[{}]", self.store_names().join(", "))
    }
}

impl std::fmt::Debug for MultiStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiStore")
            .field("stores", &self.store_names())
            .field("config", &self.config)
            .finish()
    }
}
