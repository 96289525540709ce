use stow_types::Descriptor;

use crate::context::Context;
use crate::error::StoreResult;
use crate::reader::ReaderAt;

/// Content provider keyed by descriptor digest.
///
/// All implementations must satisfy these invariants:
/// - A returned reader exposes exactly `desc.size` bytes whose hash is
///   `desc.digest`, and stays usable after `open` returns.
/// - Absence is reported as [`crate::StoreError::NotFound`]; every other
///   failure uses a different variant so composers can tell the two apart.
/// - `open` is read-only and safe to call from many threads at once.
/// - Backends that block on I/O honor the [`Context`] and report
///   `Cancelled` or `DeadlineExceeded`.
pub trait Store: Send + Sync {
    /// Open a random-access reader over the content named by `desc`.
    fn open(&self, ctx: &Context, desc: &Descriptor) -> StoreResult<Box<dyn ReaderAt>>;

    /// Label used in diagnostics. Defaults to the implementing type's name.
    fn name(&self) -> String {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base).to_string()
    }

    /// Check whether the store can serve `desc`.
    ///
    /// Default implementation opens and drops a reader. Backends may
    /// override with a cheaper probe.
    fn exists(&self, ctx: &Context, desc: &Descriptor) -> StoreResult<bool> {
        match self.open(ctx, desc) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
