use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use sk_ptr::Array;

use crate::ownership::{OwnerState, Ownership, UniqueOwnership};
use crate::{AccessError, Handle};

// -----------------------------------------------------------------------------
// Array handles

impl<T, O: Ownership> Handle<T, Array, O> {
    /// Takes charge of the elements of `vec`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sk_handle::{Array, UniqueHandle};
    ///
    /// let mut h: UniqueHandle<i32, Array> = UniqueHandle::from_vec(vec![0; 3]);
    /// h[0] = 3;
    /// h[1] = 2;
    /// h[2] = 1;
    ///
    /// assert_eq!(*h, 3);
    /// assert_eq!(h.as_slice(), &[3, 2, 1]);
    /// ```
    #[inline]
    pub fn from_vec(vec: Vec<T>) -> Self {
        Self::from_box(vec.into_boxed_slice())
    }

    /// Number of elements, 0 when null.
    #[inline]
    pub fn len(&self) -> usize {
        self.state.storage().len()
    }

    /// Returns `true` if the array has no elements or the handle is null.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The whole array, empty when null.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.state.storage().as_slice()
    }

    /// The whole array, mutably, refused while co-owners are alive.
    pub fn try_as_mut_slice(&mut self) -> Result<&mut [T], AccessError> {
        self.check_exclusive()?;
        // SAFETY: this handle is the sole owner, and is borrowed mutably. The
        // storage is only used to reach the pointee, never replaced.
        Ok(unsafe { self.state.storage_mut().as_mut_slice() })
    }

    /// Bounds-checked read access.
    pub fn element(&self, index: usize) -> Result<&T, AccessError> {
        let storage = self.state.storage();
        if storage.is_null() {
            return Err(AccessError::Null);
        }
        storage.element(index).ok_or(AccessError::OutOfBounds {
            index,
            len: storage.len(),
        })
    }

    /// Bounds-checked write access, refused while co-owners are alive.
    pub fn element_mut(&mut self, index: usize) -> Result<&mut T, AccessError> {
        self.check_exclusive()?;
        let len = self.len();
        // SAFETY: this handle is the sole owner, and is borrowed mutably. The
        // storage is only used to reach the pointee, never replaced.
        unsafe { self.state.storage_mut().element_mut(index) }
            .ok_or(AccessError::OutOfBounds { index, len })
    }

    /// Read access without bounds checks.
    ///
    /// # Safety
    /// - The handle must not be null.
    /// - `index` must be less than [`len`](Self::len).
    #[inline]
    pub unsafe fn element_unchecked(&self, index: usize) -> &T {
        // SAFETY: upheld by the caller.
        unsafe { self.state.storage().thin().get(index) }
    }

    /// Write access without bounds or sharing checks.
    ///
    /// # Safety
    /// - The handle must not be null.
    /// - `index` must be less than [`len`](Self::len).
    /// - No co-owner may access the resource while the reference is alive.
    #[inline]
    pub unsafe fn element_unchecked_mut(&mut self, index: usize) -> &mut T {
        // SAFETY: upheld by the caller; the storage is not replaced.
        unsafe { self.state.storage_mut().thin_mut().into_mut(index) }
    }
}

impl<T, O: Ownership> Index<usize> for Handle<T, Array, O> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        match self.element(index) {
            Ok(value) => value,
            Err(e) => panic!("cannot index {} handle: {e}", O::NAME),
        }
    }
}

impl<T, O: UniqueOwnership> IndexMut<usize> for Handle<T, Array, O> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.element_mut(index) {
            Ok(value) => value,
            Err(e) => panic!("cannot index {} handle: {e}", O::NAME),
        }
    }
}
