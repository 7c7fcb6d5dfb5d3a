use alloc::boxed::Box;
use core::cell::Cell;
use core::mem;
use core::ptr::NonNull;

use sk_ptr::{Storage, StorageStrategy};

use super::{OwnerState, Ownership, sealed};

// -----------------------------------------------------------------------------
// Node

/// One link of the ring of co-owners. Each handle owns exactly one node.
struct Node {
    next: Cell<NonNull<Node>>,
    prev: Cell<NonNull<Node>>,
}

impl Node {
    /// Allocates a node linked to itself: a ring of size one.
    fn singleton() -> NonNull<Node> {
        let node = NonNull::from(Box::leak(Box::new(Node {
            next: Cell::new(NonNull::dangling()),
            prev: Cell::new(NonNull::dangling()),
        })));
        // SAFETY: just allocated.
        let this = unsafe { node.as_ref() };
        this.next.set(node);
        this.prev.set(node);
        node
    }

    /// Allocates a node and splices it into `other`'s ring, right before `other`.
    ///
    /// # Safety
    /// `other` must be a live node of a well-formed ring.
    unsafe fn splice_before(other: NonNull<Node>) -> NonNull<Node> {
        let node = Node::singleton();
        // SAFETY: both nodes are live, neighbours of a live node are live.
        unsafe {
            let this = node.as_ref();
            let other_ref = other.as_ref();
            this.next.set(other);
            this.prev.set(other_ref.prev.get());
            other_ref.prev.set(node);
            this.prev.get().as_ref().next.set(node);
        }
        node
    }
}

/// Number of nodes in the ring containing `node`.
///
/// # Safety
/// `node` must be a live node of a well-formed ring.
unsafe fn ring_len(node: NonNull<Node>) -> usize {
    let mut len = 1;
    // SAFETY: every node reachable in a well-formed ring is live.
    let mut cursor = unsafe { node.as_ref() }.next.get();
    while cursor != node {
        len += 1;
        cursor = unsafe { cursor.as_ref() }.next.get();
    }
    len
}

/// Asserts `n.next.prev == n` and `n.prev.next == n` for every node of the ring.
///
/// # Safety
/// Every node reachable from `node` must be live.
#[cfg_attr(not(any(feature = "debug", debug_assertions)), expect(dead_code, reason = "debug only"))]
unsafe fn assert_ring(node: NonNull<Node>) {
    let mut cursor = node;
    loop {
        // SAFETY: reachable nodes are live.
        let current = unsafe { cursor.as_ref() };
        let next = current.next.get();
        let prev = current.prev.get();
        assert!(
            unsafe { next.as_ref() }.prev.get() == cursor,
            "broken ring: next.prev does not point back at {cursor:p}"
        );
        assert!(
            unsafe { prev.as_ref() }.next.get() == cursor,
            "broken ring: prev.next does not point back at {cursor:p}"
        );
        cursor = next;
        if cursor == node {
            break;
        }
    }
}

// -----------------------------------------------------------------------------
// Linked

/// Shared ownership tracked by an intrusive ring of per-handle nodes.
///
/// No shared count is allocated: each co-owner carries one node, and the
/// resource is released by the handle that leaves a ring of size one.
///
/// # Examples
///
/// ```
/// use core::cell::Cell;
/// use sk_handle::LinkedHandle;
///
/// let h1: LinkedHandle<Cell<i32>> = LinkedHandle::from_box(Box::new(Cell::new(5)));
/// {
///     let h2 = h1.clone();
///     h2.set(9);
/// }
/// assert!(h1.is_unique());
/// assert_eq!(h1.get(), 9);
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Linked {}

impl Ownership for Linked {
    type State<T, S: StorageStrategy<T>> = LinkedOwner<T, S>;

    const NAME: &'static str = "linked";
}

/// Ownership state of [`Linked`].
pub struct LinkedOwner<T, S: StorageStrategy<T>> {
    storage: Storage<T, S>,
    node: NonNull<Node>,
}

impl<T, S: StorageStrategy<T>> LinkedOwner<T, S> {
    #[inline]
    fn is_self_linked(&self) -> bool {
        // SAFETY: the node lives as long as its handle.
        unsafe { self.node.as_ref() }.next.get() == self.node
    }

    #[inline]
    fn check_ring(&self) {
        crate::cfg::debug! {
            // SAFETY: the ring of a live handle only contains live nodes.
            unsafe { assert_ring(self.node) };
        }
    }
}

impl sealed::Sealed for Linked {}

impl<T, S: StorageStrategy<T>> sealed::Sealed for LinkedOwner<T, S> {}

impl<T, S: StorageStrategy<T>> OwnerState<T, S> for LinkedOwner<T, S> {
    fn adopt(storage: Storage<T, S>) -> Self {
        Self {
            storage,
            node: Node::singleton(),
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

    /// Walks the ring, O(number of co-owners).
    fn owners(&self) -> usize {
        if self.storage.is_null() {
            0
        } else {
            // SAFETY: the ring of a live handle only contains live nodes.
            unsafe { ring_len(self.node) }
        }
    }

    #[inline]
    fn is_unique(&self) -> bool {
        !self.storage.is_null() && self.is_self_linked()
    }
}

impl<T, S: StorageStrategy<T>> Clone for LinkedOwner<T, S> {
    fn clone(&self) -> Self {
        let owner = Self {
            // SAFETY: the ring decides which alias releases.
            storage: unsafe { self.storage.alias() },
            // SAFETY: our node is live and its ring well-formed.
            node: unsafe { Node::splice_before(self.node) },
        };
        owner.check_ring();
        owner
    }

    /// Copy-and-swap: the new node joins the source ring before `self`
    /// leaves its old one.
    fn clone_from(&mut self, source: &Self) {
        let mut temp = source.clone();
        mem::swap(self, &mut temp);
    }
}

impl<T, S: StorageStrategy<T>> Drop for LinkedOwner<T, S> {
    fn drop(&mut self) {
        if self.is_self_linked() {
            // SAFETY: a self-linked node means no other co-owner is left.
            unsafe { self.storage.release() };
        } else {
            // SAFETY: our neighbours are live members of the same ring.
            unsafe {
                let this = self.node.as_ref();
                let next = this.next.get();
                let prev = this.prev.get();
                prev.as_ref().next.set(next);
                next.as_ref().prev.set(prev);
                log::trace!("unlinked node {:p} from ring", self.node);
                crate::cfg::debug! { assert_ring(next); }
            }
            self.storage.clear();
        }

        // SAFETY: the node is no longer reachable from any ring.
        drop(unsafe { Box::from_raw(self.node.as_ptr()) });
    }
}
