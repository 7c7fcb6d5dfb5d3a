use alloc::boxed::Box;
use core::cell::Cell;
use core::mem;
use core::ptr::NonNull;

use sk_ptr::{Storage, StorageStrategy};

use super::{OwnerState, Ownership, sealed};

// -----------------------------------------------------------------------------
// RefCounter

/// Out-of-line count shared by every co-owner of one resource.
///
/// Plain, unsynchronized reads and writes.
struct RefCounter {
    count: Cell<usize>,
}

impl RefCounter {
    /// Allocates a counter for a fresh resource, with one owner.
    fn allocate() -> NonNull<RefCounter> {
        NonNull::from(Box::leak(Box::new(RefCounter {
            count: Cell::new(1),
        })))
    }

    #[inline]
    fn get(&self) -> usize {
        self.count.get()
    }

    #[inline]
    fn add_reference(&self) -> usize {
        let count = self.count.get() + 1;
        self.count.set(count);
        count
    }

    /// Returns the count left after this release.
    #[inline]
    fn release(&self) -> usize {
        let count = self.count.get();
        crate::cfg::debug! {
            assert!(count > 0, "reference count released below zero");
        }
        self.count.set(count - 1);
        count - 1
    }
}

// -----------------------------------------------------------------------------
// RefCounted

/// Shared ownership through a detached reference count.
///
/// Every clone increments the count, every drop decrements it. The handle
/// that drives the count to zero releases the resource and the counter.
///
/// # Examples
///
/// ```
/// use core::cell::Cell;
/// use sk_handle::CountedHandle;
///
/// let h1: CountedHandle<Cell<i32>> = CountedHandle::from_box(Box::new(Cell::new(5)));
/// let h2 = h1.clone();
/// assert_eq!(h1.owners(), 2);
///
/// h2.set(9);
/// assert_eq!(h1.get(), 9);
/// ```
///
/// Co-owners never hand out `&mut T` through `DerefMut`:
///
/// ```compile_fail
/// use sk_handle::CountedHandle;
///
/// let mut h: CountedHandle<i32> = CountedHandle::from_box(Box::new(1));
/// *h = 2;
/// ```
#[derive(Debug, Clone, Copy)]
pub enum RefCounted {}

impl Ownership for RefCounted {
    type State<T, S: StorageStrategy<T>> = RefCountedOwner<T, S>;

    const NAME: &'static str = "ref-counted";
}

/// Ownership state of [`RefCounted`].
pub struct RefCountedOwner<T, S: StorageStrategy<T>> {
    storage: Storage<T, S>,
    counter: NonNull<RefCounter>,
}

impl<T, S: StorageStrategy<T>> RefCountedOwner<T, S> {
    #[inline]
    fn counter(&self) -> &RefCounter {
        // SAFETY: the counter lives as long as any owner refers to it.
        unsafe { self.counter.as_ref() }
    }
}

impl sealed::Sealed for RefCounted {}

impl<T, S: StorageStrategy<T>> sealed::Sealed for RefCountedOwner<T, S> {}

impl<T, S: StorageStrategy<T>> OwnerState<T, S> for RefCountedOwner<T, S> {
    fn adopt(storage: Storage<T, S>) -> Self {
        Self {
            storage,
            counter: RefCounter::allocate(),
        }
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
        if self.storage.is_null() {
            0
        } else {
            self.counter().get()
        }
    }
}

impl<T, S: StorageStrategy<T>> Clone for RefCountedOwner<T, S> {
    fn clone(&self) -> Self {
        self.counter().add_reference();
        Self {
            // SAFETY: the shared counter decides which alias releases.
            storage: unsafe { self.storage.alias() },
            counter: self.counter,
        }
    }

    /// Copy-and-swap: the source is cloned before `self` is touched, so the
    /// old resource is only given up once the new one is secured.
    fn clone_from(&mut self, source: &Self) {
        let mut temp = source.clone();
        mem::swap(self, &mut temp);
    }
}

impl<T, S: StorageStrategy<T>> Drop for RefCountedOwner<T, S> {
    fn drop(&mut self) {
        if self.counter().release() != 0 {
            self.storage.clear();
            return;
        }

        // SAFETY: the count reached zero, no other owner is left.
        unsafe {
            self.storage.release();
            drop(Box::from_raw(self.counter.as_ptr()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RefCountedOwner;
    use crate::ownership::OwnerState;
    use crate::testing::Tracked;
    use alloc::boxed::Box;
    use alloc::vec::Vec;
    use sk_ptr::{Scalar, Storage};

    fn owner(value: Tracked) -> RefCountedOwner<Tracked, Scalar> {
        RefCountedOwner::adopt(Storage::from_box(Box::new(value)))
    }

    #[test]
    fn count_follows_clones() {
        let (value, drops) = Tracked::new(1);
        let a = owner(value);
        let b = a.clone();
        let c = b.clone();
        assert_eq!(a.owners(), 3);
        assert!(!a.is_unique());

        drop(b);
        assert_eq!(c.owners(), 2);
        drop(a);
        assert!(c.is_unique());
        assert_eq!(drops.get(), 0);

        drop(c);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn release_once_in_any_order() {
        for order in [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1]] {
            let (value, drops) = Tracked::new(1);
            let first = owner(value);
            let mut owners: Vec<Option<_>> = (0..3).map(|_| Some(first.clone())).collect();
            owners.push(Some(first));

            for i in order {
                assert_eq!(drops.get(), 0);
                owners[i] = None;
            }
            assert_eq!(drops.get(), 1);
        }
    }

    #[test]
    fn clone_from_releases_previous() {
        let (left, left_drops) = Tracked::new(1);
        let (right, right_drops) = Tracked::new(2);
        let mut a = owner(left);
        let b = owner(right);

        a.clone_from(&b);
        assert_eq!(left_drops.get(), 1);
        assert_eq!(a.owners(), 2);
        assert_eq!(a.storage().get().map(Tracked::value), Some(2));

        drop(a);
        drop(b);
        assert_eq!(right_drops.get(), 1);
    }

    #[test]
    fn clone_from_co_owner() {
        let (value, drops) = Tracked::new(3);
        let mut a = owner(value);
        let b = a.clone();

        a.clone_from(&b);
        assert_eq!(a.owners(), 2);
        assert_eq!(drops.get(), 0);
        assert_eq!(a.storage().get().map(Tracked::value), Some(3));

        drop(b);
        drop(a);
        assert_eq!(drops.get(), 1);
    }
}
