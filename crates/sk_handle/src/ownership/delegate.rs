use sk_ptr::{Storage, StorageStrategy};

use super::{OwnerState, Ownership, UniqueOwnership, sealed};

/// Transfer of ownership: "copying" drains the source.
///
/// There is no `Clone`. A copy is the explicit [`DelegateOwner::drain`]
/// (`Handle::drain`), an assignment is [`DelegateOwner::reassign`]
/// (`Handle::assign_from`). Both need the source mutably, and both leave it
/// denoting nothing. A drained handle still exists and drops as a no-op.
///
/// # Examples
///
/// ```
/// use sk_handle::DelegateHandle;
///
/// let mut a: DelegateHandle<i32> = DelegateHandle::from_box(Box::new(5));
/// let b = a.drain();
///
/// assert!(a.is_null());
/// assert_eq!(*b, 5);
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Delegate {}

impl Ownership for Delegate {
    type State<T, S: StorageStrategy<T>> = DelegateOwner<T, S>;

    const NAME: &'static str = "delegate";
}

impl UniqueOwnership for Delegate {}

/// Ownership state of [`Delegate`].
pub struct DelegateOwner<T, S: StorageStrategy<T>> {
    storage: Storage<T, S>,
}

impl<T, S: StorageStrategy<T>> DelegateOwner<T, S> {
    /// Moves the resource into a new owner, leaving `self` null.
    pub fn drain(&mut self) -> Self {
        log::debug!("draining {} resource at {:p}", S::NAME, self.storage);
        Self {
            storage: self.storage.take(),
        }
    }

    /// Takes `source`'s resource, leaving `source` null.
    ///
    /// The resource `self` held before is released first, unless it is the
    /// very resource being handed over.
    pub fn reassign(&mut self, source: &mut Self) {
        let incoming = source.storage.take();
        if !incoming.same_resource(&self.storage) {
            log::debug!(
                "reassigning {} owner from {:p} to {:p}",
                S::NAME,
                self.storage,
                incoming
            );
            // SAFETY: a delegate owner is the only holder of its resource.
            unsafe { self.storage.release() };
            self.storage = incoming;
        }
    }
}

impl sealed::Sealed for Delegate {}

impl<T, S: StorageStrategy<T>> sealed::Sealed for DelegateOwner<T, S> {}

impl<T, S: StorageStrategy<T>> OwnerState<T, S> for DelegateOwner<T, S> {
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

impl<T, S: StorageStrategy<T>> Drop for DelegateOwner<T, S> {
    fn drop(&mut self) {
        // SAFETY: null once drained, otherwise the sole holder.
        unsafe { self.storage.release() };
    }
}

#[cfg(test)]
mod tests {
    use super::DelegateOwner;
    use crate::ownership::OwnerState;
    use crate::testing::Tracked;
    use alloc::boxed::Box;
    use sk_ptr::{Scalar, Storage};

    fn owner(value: Tracked) -> DelegateOwner<Tracked, Scalar> {
        DelegateOwner::adopt(Storage::from_box(Box::new(value)))
    }

    #[test]
    fn drain_moves_resource() {
        let (value, drops) = Tracked::new(5);
        let mut a = owner(value);
        let b = a.drain();

        assert_eq!(a.owners(), 0);
        assert!(a.storage().get().is_none());
        assert_eq!(b.storage().get().map(Tracked::value), Some(5));

        drop(a);
        assert_eq!(drops.get(), 0);
        drop(b);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn reassign_releases_previous() {
        let (left, left_drops) = Tracked::new(1);
        let (right, right_drops) = Tracked::new(2);
        let mut a = owner(left);
        let mut b = owner(right);

        a.reassign(&mut b);
        assert_eq!(left_drops.get(), 1);
        assert!(b.storage().is_null());
        assert_eq!(a.storage().get().map(Tracked::value), Some(2));

        drop(b);
        assert_eq!(right_drops.get(), 0);
        drop(a);
        assert_eq!(right_drops.get(), 1);
    }

    #[test]
    fn reassign_from_drained_empties_target() {
        let (left, left_drops) = Tracked::new(1);
        let (right, _) = Tracked::new(2);
        let mut a = owner(left);
        let mut b = owner(right);
        let _c = b.drain();

        a.reassign(&mut b);
        assert_eq!(left_drops.get(), 1);
        assert!(a.storage().is_null());
    }
}
