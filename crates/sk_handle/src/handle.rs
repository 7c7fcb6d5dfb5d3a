use alloc::boxed::Box;
use core::fmt;
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;

use sk_ptr::{Scalar, Storage, StorageStrategy};

use crate::AccessError;
use crate::ownership::{
    Delegate, Linked, OwnerState, Ownership, RefCounted, RestrictCopy, UniqueOwnership,
};

// -----------------------------------------------------------------------------
// Handle

/// A pointer-like handle whose storage and ownership strategies are chosen
/// at compile time.
///
/// - `S` decides how the resource is released: [`Scalar`] or
///   [`Array`](sk_ptr::Array).
/// - `O` decides what cloning, assigning and dropping do: [`RestrictCopy`],
///   [`RefCounted`], [`Linked`] or [`Delegate`].
///
/// The handle holds nothing but the ownership state. It has no `Drop` impl
/// of its own, and it is `Clone` exactly when the ownership state is.
///
/// # Access
///
/// Every handle derefs to `T` (the first element for arrays). Mutable access
/// is only safe while no co-owner can observe it, so `DerefMut` exists for
/// [`UniqueOwnership`] families only. Shared families use
/// [`get_mut`](Self::get_mut), which succeeds while the handle is the sole
/// owner, or store a `Cell`-like `T` to mutate through every co-owner.
///
/// # Examples
///
/// ```
/// use sk_handle::Handle;
///
/// let mut h: Handle<i32> = Handle::from_box(Box::new(3));
/// *h += 1;
/// assert_eq!(*h, 4);
/// ```
pub struct Handle<T, S: StorageStrategy<T> = Scalar, O: Ownership = RestrictCopy> {
    pub(crate) state: O::State<T, S>,
}

/// Single owner, never copied. See [`RestrictCopy`].
pub type UniqueHandle<T, S = Scalar> = Handle<T, S, RestrictCopy>;

/// Shared owner with a detached count. See [`RefCounted`].
pub type CountedHandle<T, S = Scalar> = Handle<T, S, RefCounted>;

/// Shared owner in a ring of co-owners. See [`Linked`].
pub type LinkedHandle<T, S = Scalar> = Handle<T, S, Linked>;

/// Owner that hands its resource over on drain. See [`Delegate`].
pub type DelegateHandle<T, S = Scalar> = Handle<T, S, Delegate>;

impl<T, S: StorageStrategy<T>, O: Ownership> Handle<T, S, O> {
    /// Takes charge of a raw resource pointer.
    ///
    /// # Safety
    /// - `ptr` must denote a live allocation produced by `Box<S::Pointee>`
    ///   (for arrays, a boxed slice of the right length).
    /// - Nothing else may release or access the resource afterwards except
    ///   through this handle and its co-owners.
    #[inline]
    pub unsafe fn from_raw(ptr: NonNull<S::Pointee>) -> Self {
        // SAFETY: upheld by the caller.
        Self::from_storage(unsafe { Storage::new(ptr) })
    }

    /// Takes charge of a boxed resource.
    #[inline]
    pub fn from_box(boxed: Box<S::Pointee>) -> Self {
        Self::from_storage(Storage::from_box(boxed))
    }

    /// Takes charge of a storage instance.
    #[inline]
    pub fn from_storage(storage: Storage<T, S>) -> Self {
        Self {
            state: <O::State<T, S> as OwnerState<T, S>>::adopt(storage),
        }
    }

    /// The storage instance behind this handle.
    #[inline(always)]
    pub fn storage(&self) -> &Storage<T, S> {
        self.state.storage()
    }

    /// Address of the pointee, for reaching into its members through raw pointers.
    ///
    /// Null when the handle denotes nothing.
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.state.storage().as_raw()
    }

    /// Returns `true` if the handle denotes no resource.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.state.storage().is_null()
    }

    /// Number of live handles sharing the resource, 0 when null.
    #[inline]
    pub fn owners(&self) -> usize {
        self.state.owners()
    }

    /// Returns `true` if no other handle shares the resource.
    #[inline]
    pub fn is_unique(&self) -> bool {
        self.state.is_unique()
    }

    /// Returns `true` if both handles denote the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.state.storage().same_resource(other.state.storage())
    }

    /// Shared access to the pointee.
    pub fn try_get(&self) -> Result<&T, AccessError> {
        let storage = self.state.storage();
        if storage.is_null() {
            return Err(AccessError::Null);
        }
        storage.get().ok_or(AccessError::Empty)
    }

    /// Exclusive access to the pointee, refused while co-owners are alive.
    pub fn try_get_mut(&mut self) -> Result<&mut T, AccessError> {
        self.check_exclusive()?;
        // SAFETY: this handle is the sole owner, and is borrowed mutably. The
        // storage is only used to reach the pointee, never replaced.
        unsafe { self.state.storage_mut().get_mut() }.ok_or(AccessError::Empty)
    }

    /// Exclusive access to the pointee if this handle is its sole owner.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.try_get_mut().ok()
    }

    pub(crate) fn check_exclusive(&self) -> Result<(), AccessError> {
        if self.state.storage().is_null() {
            return Err(AccessError::Null);
        }
        if !self.state.is_unique() {
            return Err(AccessError::Shared {
                owners: self.state.owners(),
            });
        }
        Ok(())
    }
}

impl<T, S: StorageStrategy<T>> Handle<T, S, Delegate> {
    /// Moves the resource into a new handle, leaving `self` null.
    ///
    /// This is the delegate family's copy: it mutates its source.
    ///
    /// ```
    /// use sk_handle::DelegateHandle;
    ///
    /// let mut a: DelegateHandle<i32> = DelegateHandle::from_box(Box::new(5));
    /// {
    ///     let mut b = a.drain();
    ///     *b = -12;
    /// }
    /// assert!(a.try_get().is_err());
    /// ```
    #[inline]
    pub fn drain(&mut self) -> Self {
        Self {
            state: self.state.drain(),
        }
    }

    /// Releases the current resource and takes `source`'s, leaving `source` null.
    ///
    /// ```
    /// use sk_handle::DelegateHandle;
    ///
    /// let mut a: DelegateHandle<i32> = DelegateHandle::from_box(Box::new(5));
    /// let mut b: DelegateHandle<i32> = DelegateHandle::from_box(Box::new(1));
    ///
    /// a.assign_from(&mut b);
    /// assert_eq!(*a, 1);
    /// assert!(b.is_null());
    /// ```
    #[inline]
    pub fn assign_from(&mut self, source: &mut Self) {
        self.state.reassign(&mut source.state);
    }
}

impl<T, S, O> Clone for Handle<T, S, O>
where
    S: StorageStrategy<T>,
    O: Ownership,
    O::State<T, S>: Clone,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }

    #[inline]
    fn clone_from(&mut self, source: &Self) {
        self.state.clone_from(&source.state);
    }
}

impl<T, S: StorageStrategy<T>, O: Ownership> Deref for Handle<T, S, O> {
    type Target = T;

    #[track_caller]
    fn deref(&self) -> &T {
        match self.try_get() {
            Ok(value) => value,
            Err(e) => panic!("cannot dereference {} handle: {e}", O::NAME),
        }
    }
}

impl<T, S: StorageStrategy<T>, O: UniqueOwnership> DerefMut for Handle<T, S, O> {
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        match self.try_get_mut() {
            Ok(value) => value,
            Err(e) => panic!("cannot dereference {} handle: {e}", O::NAME),
        }
    }
}

impl<T, S: StorageStrategy<T>, O: Ownership> fmt::Pointer for Handle<T, S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}

impl<T, S: StorageStrategy<T>, O: Ownership> fmt::Debug for Handle<T, S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("storage", &S::NAME)
            .field("ownership", &O::NAME)
            .field("ptr", &self.as_ptr())
            .field("owners", &self.owners())
            .finish()
    }
}
