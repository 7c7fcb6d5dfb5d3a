//! Ownership strategies: what copying, assigning and dropping a handle does.
//!
//! | Strategy         | `Clone`          | `clone_from`    | Drop                          |
//! |------------------|------------------|-----------------|-------------------------------|
//! | [`RestrictCopy`] | not implemented  | not implemented | releases                      |
//! | [`RefCounted`]   | count + 1        | copy-and-swap   | count - 1, releases at 0      |
//! | [`Linked`]       | splice into ring | copy-and-swap   | unlink, releases when alone   |
//! | [`Delegate`]     | not implemented  | not implemented | releases unless drained       |
//!
//! [`Delegate`] replaces copying with explicit draining, see
//! [`DelegateOwner::drain`] and [`DelegateOwner::reassign`].

// -----------------------------------------------------------------------------
// Modules

mod counted;
mod delegate;
mod linked;
mod restrict;

// -----------------------------------------------------------------------------
// Exports

pub use counted::{RefCounted, RefCountedOwner};
pub use delegate::{Delegate, DelegateOwner};
pub use linked::{Linked, LinkedOwner};
pub use restrict::{RestrictCopy, RestrictCopyOwner};

use sk_ptr::{Storage, StorageStrategy};

// -----------------------------------------------------------------------------
// Sealing

pub(crate) mod sealed {
    /// Restricts [`Ownership`](super::Ownership) and
    /// [`OwnerState`](super::OwnerState) to the implementations in this crate.
    pub trait Sealed {}
}

// -----------------------------------------------------------------------------
// Traits

/// A family of ownership disciplines, selected at compile time.
///
/// The family is a type-level marker; its per-handle bookkeeping lives in
/// [`State`](Self::State), which is generic over the element type and the
/// storage strategy.
///
/// Sealed: handles trust the bookkeeping of their family, so no family can
/// be added outside this crate.
///
/// ```compile_fail
/// use sk_handle::ownership::RestrictCopyOwner;
/// use sk_handle::{Ownership, StorageStrategy};
///
/// enum Forged {}
///
/// impl Ownership for Forged {
///     type State<T, S: StorageStrategy<T>> = RestrictCopyOwner<T, S>;
///     const NAME: &'static str = "forged";
/// }
/// ```
pub trait Ownership: sealed::Sealed {
    /// Per-handle ownership state wrapping the storage instance.
    type State<T, S: StorageStrategy<T>>: OwnerState<T, S>;

    /// Name used in diagnostics.
    const NAME: &'static str;
}

/// Marker for families where a live, non-null handle is always the sole owner.
///
/// Only these families hand out mutable access through `DerefMut` and `IndexMut`.
pub trait UniqueOwnership: Ownership {}

/// Per-handle ownership state.
///
/// Implementors release the resource from their `Drop` impl according to
/// their discipline. Sealed like [`Ownership`].
pub trait OwnerState<T, S: StorageStrategy<T>>: Sized + sealed::Sealed {
    /// Takes charge of a freshly constructed storage instance.
    fn adopt(storage: Storage<T, S>) -> Self;

    /// The storage instance of this handle.
    fn storage(&self) -> &Storage<T, S>;

    /// The storage instance of this handle, mutably.
    ///
    /// # Safety
    /// The storage must keep denoting the resource this owner was adopted
    /// with: it must not be replaced, swapped with another owner's, or
    /// drained. Only the pointee may be accessed through it, and only while
    /// no co-owner accesses the resource.
    ///
    /// Swapping storages between owners of different families would let
    /// one of them release a resource that a co-owner still denotes, so
    /// safe code cannot do it:
    ///
    /// ```compile_fail
    /// use core::mem;
    /// use sk_handle::ownership::{OwnerState, RefCountedOwner, RestrictCopyOwner};
    /// use sk_handle::{Scalar, Storage};
    ///
    /// let mut shared: RefCountedOwner<i32, Scalar> =
    ///     RefCountedOwner::adopt(Storage::from_box(Box::new(1)));
    /// let survivor = shared.clone();
    /// let mut unique: RestrictCopyOwner<i32, Scalar> =
    ///     RestrictCopyOwner::adopt(Storage::from_box(Box::new(2)));
    ///
    /// mem::swap(shared.storage_mut(), unique.storage_mut());
    /// drop(unique);
    /// assert_eq!(*survivor.storage().get().unwrap(), 1);
    /// ```
    unsafe fn storage_mut(&mut self) -> &mut Storage<T, S>;

    /// Number of live handles sharing the resource, 0 when this handle denotes nothing.
    fn owners(&self) -> usize;

    /// Returns `true` if this handle is the only one denoting its resource.
    #[inline]
    fn is_unique(&self) -> bool {
        self.owners() == 1
    }
}
