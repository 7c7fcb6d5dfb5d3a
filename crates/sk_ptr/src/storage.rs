use alloc::boxed::Box;
use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::{ThinSlice, ThinSliceMut};

// -----------------------------------------------------------------------------
// StorageStrategy

/// How a resource of element type `T` is laid out and released.
///
/// A strategy is a type-level policy; it is never instantiated.
///
/// # Safety
///
/// - [`first`](Self::first) must return a pointer to the first element of
///   the resource, and [`len`](Self::len) the number of initialized elements
///   starting there.
/// - [`release`](Self::release) must free exactly the allocation described
///   by `ptr`, with the deallocation matching how it was allocated.
pub unsafe trait StorageStrategy<T> {
    /// The pointee of the resource pointer: `T` or `[T]`.
    type Pointee: ?Sized;

    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Pointer to the first element of the resource.
    fn first(ptr: NonNull<Self::Pointee>) -> NonNull<T>;

    /// Number of elements in the resource.
    fn len(ptr: NonNull<Self::Pointee>) -> usize;

    /// Releases the resource.
    ///
    /// # Safety
    /// - `ptr` must denote a live allocation produced by `Box<Self::Pointee>`.
    /// - No reference into the resource may outlive this call.
    unsafe fn release(ptr: NonNull<Self::Pointee>);
}

/// Single-object storage, released like `Box<T>`.
///
/// Indexed access is not available for this strategy.
#[derive(Debug, Clone, Copy)]
pub enum Scalar {}

// SAFETY: A scalar resource is one element, allocated and freed as `Box<T>`.
unsafe impl<T> StorageStrategy<T> for Scalar {
    type Pointee = T;

    const NAME: &'static str = "scalar";

    #[inline(always)]
    fn first(ptr: NonNull<T>) -> NonNull<T> {
        ptr
    }

    #[inline(always)]
    fn len(_: NonNull<T>) -> usize {
        1
    }

    #[inline]
    unsafe fn release(ptr: NonNull<T>) {
        // SAFETY: the caller guarantees `ptr` came from `Box<T>` and is live.
        drop(unsafe { Box::from_raw(ptr.as_ptr()) });
    }
}

/// Array storage, released like `Box<[T]>`.
#[derive(Debug, Clone, Copy)]
pub enum Array {}

// SAFETY: The fat pointer carries the length, the slice is freed as `Box<[T]>`.
unsafe impl<T> StorageStrategy<T> for Array {
    type Pointee = [T];

    const NAME: &'static str = "array";

    #[inline(always)]
    fn first(ptr: NonNull<[T]>) -> NonNull<T> {
        ptr.cast()
    }

    #[inline(always)]
    fn len(ptr: NonNull<[T]>) -> usize {
        ptr.len()
    }

    #[inline]
    unsafe fn release(ptr: NonNull<[T]>) {
        // SAFETY: the caller guarantees `ptr` came from `Box<[T]>` and is live.
        drop(unsafe { Box::from_raw(ptr.as_ptr()) });
    }
}

// -----------------------------------------------------------------------------
// Storage

/// One storage-strategy instance: a nullable resource pointer.
///
/// `Storage` has no `Drop` impl. Whoever owns it must call
/// [`release`](Self::release) exactly once per allocation, or hand the
/// pointer on with [`take`](Self::take).
///
/// # Examples
///
/// ```
/// use sk_ptr::{Array, Storage};
///
/// let mut storage: Storage<i32, Array> = Storage::from_box(vec![3, 2, 1].into_boxed_slice());
/// assert_eq!(storage.as_slice(), &[3, 2, 1]);
///
/// unsafe { storage.release() };
/// assert!(storage.is_null());
/// ```
pub struct Storage<T, S: StorageStrategy<T>> {
    ptr: Option<NonNull<S::Pointee>>,
    _marker: PhantomData<(T, S)>,
}

impl<T, S: StorageStrategy<T>> Storage<T, S> {
    /// Wraps an already allocated resource pointer.
    ///
    /// Construction does not imply ownership: nothing is released unless
    /// [`release`](Self::release) is called.
    ///
    /// # Safety
    /// - `ptr` must denote a live allocation produced by `Box<S::Pointee>`.
    /// - The resource must stay valid for as long as this instance is non-null.
    #[inline]
    pub const unsafe fn new(ptr: NonNull<S::Pointee>) -> Self {
        Self {
            ptr: Some(ptr),
            _marker: PhantomData,
        }
    }

    /// An instance denoting no resource.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            ptr: None,
            _marker: PhantomData,
        }
    }

    /// Wraps a boxed resource, leaking the box into this instance.
    #[inline]
    pub fn from_box(boxed: Box<S::Pointee>) -> Self {
        Self {
            ptr: Some(NonNull::from(Box::leak(boxed))),
            _marker: PhantomData,
        }
    }

    /// The resource pointer, or `None` when this instance denotes nothing.
    #[inline(always)]
    pub const fn as_ptr(&self) -> Option<NonNull<S::Pointee>> {
        self.ptr
    }

    /// Address of the first element, null when this instance denotes nothing.
    #[inline]
    pub fn as_raw(&self) -> *mut T {
        match self.ptr {
            Some(ptr) => S::first(ptr).as_ptr(),
            None => core::ptr::null_mut(),
        }
    }

    /// Returns `true` if this instance denotes nothing.
    #[inline(always)]
    pub const fn is_null(&self) -> bool {
        self.ptr.is_none()
    }

    /// Number of elements, 0 when null.
    #[inline]
    pub fn len(&self) -> usize {
        self.ptr.map_or(0, S::len)
    }

    /// Returns `true` if both instances denote the same allocation.
    ///
    /// Two null instances denote the same (absent) resource.
    #[inline]
    pub fn same_resource(&self, other: &Self) -> bool {
        match (self.ptr, other.ptr) {
            (Some(a), Some(b)) => a.cast::<u8>() == b.cast::<u8>(),
            (None, None) => true,
            _ => false,
        }
    }

    /// Drains the pointer into a new instance, leaving this one null.
    #[inline]
    pub fn take(&mut self) -> Self {
        Self {
            ptr: self.ptr.take(),
            _marker: PhantomData,
        }
    }

    /// Forgets the pointer without releasing it.
    ///
    /// Used by co-owners that leave while others keep the resource alive.
    #[inline]
    pub fn clear(&mut self) {
        self.ptr = None;
    }

    /// A second instance denoting the same allocation.
    ///
    /// # Safety
    /// The caller must make sure only one of the aliases ever releases the
    /// resource, and that the others are nulled or forgotten by then.
    #[inline]
    pub const unsafe fn alias(&self) -> Self {
        Self {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Shared access to the first element.
    ///
    /// Returns `None` when null or when the resource has no elements.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        let ptr = self.ptr?;
        if S::len(ptr) == 0 {
            return None;
        }
        // SAFETY: non-null instances denote a live resource with at least one element.
        Some(unsafe { S::first(ptr).as_ref() })
    }

    /// Exclusive access to the first element.
    ///
    /// # Safety
    /// No alias of this instance may be used to access the resource while
    /// the returned reference is alive.
    #[inline]
    pub unsafe fn get_mut(&mut self) -> Option<&mut T> {
        let ptr = self.ptr?;
        if S::len(ptr) == 0 {
            return None;
        }
        // SAFETY: live resource, exclusivity upheld by the caller.
        Some(unsafe { S::first(ptr).as_mut() })
    }

    /// Releases the resource and nulls this instance.
    ///
    /// Does nothing when the instance is already null, so a second call is a no-op.
    ///
    /// # Safety
    /// No alias of this instance may still need the resource.
    pub unsafe fn release(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            log::trace!("releasing {} resource at {:p}", S::NAME, S::first(ptr));
            // SAFETY: non-null instances denote a live `Box` allocation,
            // the caller guarantees no alias still needs it.
            unsafe { S::release(ptr) };
        }
    }
}

impl<T> Storage<T, Array> {
    /// The whole array, empty when null.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match self.ptr {
            // SAFETY: non-null instances denote a live, initialized slice.
            Some(ptr) => unsafe { ptr.as_ref() },
            None => &[],
        }
    }

    /// The whole array, mutably. Empty when null.
    ///
    /// # Safety
    /// No alias of this instance may be used to access the resource while
    /// the returned slice is alive.
    #[inline]
    pub unsafe fn as_mut_slice(&mut self) -> &mut [T] {
        match self.ptr {
            // SAFETY: live slice, exclusivity upheld by the caller.
            Some(mut ptr) => unsafe { ptr.as_mut() },
            None => &mut [],
        }
    }

    /// Bounds-checked element access.
    #[inline]
    pub fn element(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Bounds-checked mutable element access.
    ///
    /// # Safety
    /// Same as [`as_mut_slice`](Self::as_mut_slice).
    #[inline]
    pub unsafe fn element_mut(&mut self, index: usize) -> Option<&mut T> {
        unsafe { self.as_mut_slice() }.get_mut(index)
    }

    /// Unchecked view of the array.
    #[inline]
    pub fn thin(&self) -> ThinSlice<'_, T> {
        ThinSlice::from_ref(self.as_slice())
    }

    /// Unchecked mutable view of the array.
    ///
    /// # Safety
    /// Same as [`as_mut_slice`](Self::as_mut_slice).
    #[inline]
    pub unsafe fn thin_mut(&mut self) -> ThinSliceMut<'_, T> {
        ThinSliceMut::from_mut(unsafe { self.as_mut_slice() })
    }
}

impl<T, S: StorageStrategy<T>> fmt::Pointer for Storage<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_raw(), f)
    }
}

impl<T, S: StorageStrategy<T>> fmt::Debug for Storage<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Storage<{}>({:p})", S::NAME, self.as_raw())
    }
}
