//! Storage strategies: how a raw resource pointer is held and released.
//!
//! This crate is the leaf layer of the smart-pointer kit. It does not decide
//! *when* a resource dies, only *how*.
//!
//! **StorageStrategy**
//!
//! [`StorageStrategy<T>`] describes one way of releasing a heap resource.
//! Two strategies exist:
//!
//! - [`Scalar`]: a single boxed `T`, released with a single-object deallocation.
//! - [`Array`]: a boxed `[T]`, released with a slice deallocation. The length
//!   travels with the (fat) pointer.
//!
//! **Storage**
//!
//! [`Storage<T, S>`] is one storage-strategy instance: a nullable resource
//! pointer plus the strategy that knows how to free it. Constructing or
//! dropping a `Storage` never releases anything. The owning strategy above
//! it calls [`release`](Storage::release) at most once per allocation.
//!
//! **ThinSlice** and **ThinSliceMut**
//!
//! [`ThinSlice`] and [`ThinSliceMut`] are data-pointer-only views of an array
//! resource. Indexing through them is unsafe because bounds are not checked
//! outside of debug builds.
#![expect(unsafe_code, reason = "Raw resource pointers are inherently unsafe.")]
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

mod storage;
mod thin_slice;

// -----------------------------------------------------------------------------
// Top-level exports

pub use storage::{Array, Scalar, Storage, StorageStrategy};
pub use thin_slice::{ThinSlice, ThinSliceMut};
