use std::alloc::{self, handle_alloc_error, Layout};
use std::ptr::NonNull;

/// Allocation strategy backing a [`RingVec`](crate::RingVec).
///
/// The container injects an implementation at construction and routes every
/// buffer acquisition and release through it. Two allocators belong to the
/// same pool when memory allocated by one may be released by the other; the
/// three propagation flags decide whether the allocator travels with the
/// buffer during copy-assignment, move-assignment, and swap.
///
/// Implementations must never observe a zero-size layout: the container
/// substitutes a dangling pointer for zero-capacity buffers and zero-sized
/// element types before reaching the allocator.
pub trait BufferAlloc {
    /// Acquires a block for `layout`.
    ///
    /// Diverges instead of returning on allocation failure, leaving the
    /// caller's state untouched.
    fn allocate(&self, layout: Layout) -> NonNull<u8>;

    /// Releases a block previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this allocator (or one
    /// in the same pool) with the same `layout`, and must not be used after
    /// this call.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Whether memory allocated by `self` may be released by `other`.
    fn same_pool(&self, other: &Self) -> bool;

    /// Whether copy-assignment adopts the source allocator.
    fn propagate_on_clone(&self) -> bool {
        false
    }

    /// Whether move-assignment adopts the source allocator.
    fn propagate_on_assign(&self) -> bool {
        true
    }

    /// Whether a swap exchanges the allocators along with the buffers.
    fn propagate_on_swap(&self) -> bool {
        false
    }
}

/// Default allocation strategy backed by the global heap.
///
/// Every instance belongs to the same pool. Propagation flags mirror the
/// standard allocator: move-assignment propagates, copy-assignment and swap
/// do not (the flags are moot for a stateless allocator).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeapAlloc;

impl BufferAlloc for HeapAlloc {
    fn allocate(&self, layout: Layout) -> NonNull<u8> {
        debug_assert!(layout.size() > 0, "zero-size layouts never reach the allocator");
        // SAFETY: layout has non-zero size per the trait contract.
        let ptr = unsafe { alloc::alloc(layout) };
        match NonNull::new(ptr) {
            Some(ptr) => ptr,
            None => handle_alloc_error(layout),
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded caller contract matches `dealloc`'s.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
    }

    fn same_pool(&self, _other: &Self) -> bool {
        true
    }
}
