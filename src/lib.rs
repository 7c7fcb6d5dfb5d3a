#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use sk_cfg as cfg;
pub use sk_handle as handle;
pub use sk_ptr as ptr;

/// The handle, its aliases and every strategy, for glob import.
pub mod prelude {
    pub use sk_handle::{
        AccessError, Array, CountedHandle, Delegate, DelegateHandle, Handle, Linked,
        LinkedHandle, RefCounted, RestrictCopy, Scalar, UniqueHandle,
    };
}
