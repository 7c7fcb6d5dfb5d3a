use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

// -----------------------------------------------------------------------------
// ThinSlice

/// A slice like `&'a [T]`, without length information.
///
/// Indexing never checks bounds in release builds. With the `debug` alias
/// active the length is kept and every access is asserted in-bounds.
///
/// # Examples
///
/// ```
/// use sk_ptr::ThinSlice;
///
/// let x = [3, 2, 1];
///
/// let ptr = ThinSlice::from_ref(&x);
///
/// assert_eq!(unsafe { *ptr.get(2) }, 1);
/// ```
pub struct ThinSlice<'a, T> {
    ptr: NonNull<T>,
    #[cfg(any(feature = "debug", debug_assertions))]
    len: usize,
    _marker: PhantomData<&'a [T]>,
}

impl<T> Clone for ThinSlice<'_, T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ThinSlice<'_, T> {}

impl<'a, T> ThinSlice<'a, T> {
    /// Converts a slice reference to a `ThinSlice`.
    #[inline(always)]
    pub const fn from_ref(r: &'a [T]) -> Self {
        Self {
            ptr: NonNull::from_ref(r).cast(),
            #[cfg(any(feature = "debug", debug_assertions))]
            len: r.len(),
            _marker: PhantomData,
        }
    }

    /// Indexes the slice without doing bounds checks.
    ///
    /// # Safety
    /// `index` must be in-bounds.
    #[cfg_attr(any(feature = "debug", debug_assertions), track_caller)]
    #[cfg_attr(not(any(feature = "debug", debug_assertions)), inline(always))]
    pub unsafe fn get(self, index: usize) -> &'a T {
        crate::cfg::debug! {
            assert!(index < self.len, "index {index} out of bounds for thin slice of length {}", self.len);
        }

        // SAFETY: `index` is in-bounds so the resulting pointer is valid to deref.
        unsafe { &*self.ptr.as_ptr().add(index) }
    }
}

impl<T> fmt::Debug for ThinSlice<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThinSlice({:p})", self.ptr)
    }
}

// -----------------------------------------------------------------------------
// ThinSliceMut

/// A slice like `&'a mut [T]`, without length information.
///
/// See [`ThinSlice`] for the bounds-checking rules.
///
/// # Examples
///
/// ```
/// use sk_ptr::ThinSliceMut;
///
/// let mut x = [0, 0, 0];
///
/// let mut ptr = ThinSliceMut::from_mut(&mut x);
/// unsafe { *ptr.get_mut(1) = 2 };
///
/// assert_eq!(x, [0, 2, 0]);
/// ```
pub struct ThinSliceMut<'a, T> {
    ptr: NonNull<T>,
    #[cfg(any(feature = "debug", debug_assertions))]
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

impl<'a, T> ThinSliceMut<'a, T> {
    /// Converts a mutable slice reference to a `ThinSliceMut`.
    #[inline(always)]
    pub const fn from_mut(r: &'a mut [T]) -> Self {
        #[cfg(any(feature = "debug", debug_assertions))]
        let len = r.len();

        Self {
            ptr: NonNull::from_mut(r).cast(),
            #[cfg(any(feature = "debug", debug_assertions))]
            len,
            _marker: PhantomData,
        }
    }

    /// Indexes the slice mutably without doing bounds checks.
    ///
    /// # Safety
    /// `index` must be in-bounds.
    #[cfg_attr(any(feature = "debug", debug_assertions), track_caller)]
    #[cfg_attr(not(any(feature = "debug", debug_assertions)), inline(always))]
    pub unsafe fn get_mut(&mut self, index: usize) -> &mut T {
        crate::cfg::debug! {
            assert!(index < self.len, "index {index} out of bounds for thin slice of length {}", self.len);
        }

        // SAFETY: `index` is in-bounds and `self` is borrowed exclusively.
        unsafe { &mut *self.ptr.as_ptr().add(index) }
    }

    /// Consumes the view, returning the element at `index` for the full lifetime `'a`.
    ///
    /// # Safety
    /// `index` must be in-bounds.
    #[cfg_attr(any(feature = "debug", debug_assertions), track_caller)]
    #[cfg_attr(not(any(feature = "debug", debug_assertions)), inline(always))]
    pub unsafe fn into_mut(self, index: usize) -> &'a mut T {
        crate::cfg::debug! {
            assert!(index < self.len, "index {index} out of bounds for thin slice of length {}", self.len);
        }

        // SAFETY: `index` is in-bounds and the view held the exclusive borrow.
        unsafe { &mut *self.ptr.as_ptr().add(index) }
    }

    /// Reborrows as a read-only [`ThinSlice`].
    #[inline(always)]
    pub fn as_thin(&self) -> ThinSlice<'_, T> {
        ThinSlice {
            ptr: self.ptr,
            #[cfg(any(feature = "debug", debug_assertions))]
            len: self.len,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ThinSliceMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThinSliceMut({:p})", self.ptr)
    }
}
