//! Pointer-like handles built from a storage strategy and an ownership strategy.
//!
//! [`Handle<T, S, O>`] composes, at compile time:
//!
//! - a storage strategy `S` from [`sk_ptr`]: [`Scalar`] (default) or [`Array`];
//! - an ownership strategy `O` from [`ownership`]: [`RestrictCopy`] (default),
//!   [`RefCounted`], [`Linked`] or [`Delegate`].
//!
//! All copy, assignment and drop behavior is the ownership strategy's; the
//! storage strategy only knows how to release. Each real allocation is
//! released exactly once, by the last owner.
//!
//! ```
//! use core::cell::Cell;
//! use sk_handle::{Array, CountedHandle, Handle, LinkedHandle};
//!
//! let h1: CountedHandle<Cell<i32>> = Handle::from_box(Box::new(Cell::new(5)));
//! let h2 = h1.clone();
//! h2.set(9);
//! assert_eq!(h1.get(), 9);
//!
//! let mut arr: LinkedHandle<i32, Array> = Handle::from_vec(vec![0; 3]);
//! *arr.element_mut(1).unwrap() = 2;
//! assert_eq!(arr[1], 2);
//! ```
//!
//! Nothing here is thread-safe: handles are neither `Send` nor `Sync`.
#![expect(unsafe_code, reason = "Ownership bookkeeping manipulates raw resource and node pointers.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    sk_cfg::define_alias! {
        #[cfg(any(feature = "debug", debug_assertions))] => debug,
    }
}

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod handle;
mod index;

pub mod ownership;

#[cfg(test)]
mod testing;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::AccessError;
pub use handle::{CountedHandle, DelegateHandle, Handle, LinkedHandle, UniqueHandle};
pub use ownership::{
    Delegate, Linked, OwnerState, Ownership, RefCounted, RestrictCopy, UniqueOwnership,
};
pub use sk_ptr::{Array, Scalar, Storage, StorageStrategy};
