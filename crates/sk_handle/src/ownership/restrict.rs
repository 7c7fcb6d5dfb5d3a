use sk_ptr::{Storage, StorageStrategy};

use super::{OwnerState, Ownership, UniqueOwnership, sealed};

/// Single, non-transferable ownership. Handles can be neither cloned nor assigned.
///
/// This is the default family of [`Handle`](crate::Handle).
///
/// ```compile_fail
/// use sk_handle::UniqueHandle;
///
/// let a: UniqueHandle<i32> = UniqueHandle::from_box(Box::new(1));
/// let b: UniqueHandle<i32> = Clone::clone(&a);
/// ```
///
/// ```compile_fail
/// use sk_handle::UniqueHandle;
///
/// let a: UniqueHandle<i32> = UniqueHandle::from_box(Box::new(1));
/// let mut b: UniqueHandle<i32> = UniqueHandle::from_box(Box::new(2));
/// Clone::clone_from(&mut b, &a);
/// ```
#[derive(Debug, Clone, Copy)]
pub enum RestrictCopy {}

impl Ownership for RestrictCopy {
    type State<T, S: StorageStrategy<T>> = RestrictCopyOwner<T, S>;

    const NAME: &'static str = "restrict-copy";
}

impl UniqueOwnership for RestrictCopy {}

/// Ownership state of [`RestrictCopy`]. Deliberately not `Clone`.
pub struct RestrictCopyOwner<T, S: StorageStrategy<T>> {
    storage: Storage<T, S>,
}

impl sealed::Sealed for RestrictCopy {}

impl<T, S: StorageStrategy<T>> sealed::Sealed for RestrictCopyOwner<T, S> {}

impl<T, S: StorageStrategy<T>> OwnerState<T, S> for RestrictCopyOwner<T, S> {
    #[inline]
    fn adopt(storage: Storage<T, S>) -> Self {
        Self { storage }
    }

    #[inline(always)]
    fn storage(&self) -> &Storage<T, S> {
        &self.storage
    }

    #[inline(always)]
    unsafe fn storage_mut(&mut self) -> &mut Storage<T, S> {
        &mut self.storage
    }

    #[inline]
    fn owners(&self) -> usize {
        usize::from(!self.storage.is_null())
    }
}

impl<T, S: StorageStrategy<T>> Drop for RestrictCopyOwner<T, S> {
    fn drop(&mut self) {
        // SAFETY: this is the only instance that ever denotes the resource.
        unsafe { self.storage.release() };
    }
}
