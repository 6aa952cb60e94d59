use std::alloc::Layout;
use std::cmp::Ordering;
use std::fmt;
use std::mem::{self, ManuallyDrop};
use std::ops::{Index, IndexMut};
use std::ptr::{self, NonNull};
use std::slice;

use crate::alloc::{BufferAlloc, HeapAlloc};
use crate::error::RingVecError;
use crate::iter::{RingVecIter, RingVecIterMut};

/// Maps a logical position (0 = newest) to a physical slot.
///
/// Equivalent to `(newest + cap - pos) % cap`, written branchy so the sum
/// cannot overflow for capacities near `usize::MAX` (zero-sized elements).
#[inline]
pub(crate) fn physical_slot(newest: usize, cap: usize, pos: usize) -> usize {
    debug_assert!(newest < cap && pos < cap);
    if pos <= newest {
        newest - pos
    } else {
        cap - (pos - newest)
    }
}

/// A fixed-capacity circular buffer over allocator-provided storage.
///
/// Elements are stored in one contiguous block of `capacity` slots reused
/// circularly: once the buffer is full, each [`push`](RingVec::push) evicts
/// the oldest element and hands it back. Logical position 0 is always the
/// newest element; iteration runs newest to oldest.
///
/// Layout invariant, preserved by every operation: either the buffer is not
/// yet full and the live elements occupy slots `0..len` with the newest at
/// slot `len - 1`, or the buffer is exactly full and the newest-slot index
/// marks the rotation point. Either way slots `0..len` are exactly the
/// initialized region.
pub struct RingVec<T, A: BufferAlloc = HeapAlloc> {
    pub(crate) buf: NonNull<T>,
    pub(crate) cap: usize,
    pub(crate) len: usize,
    pub(crate) newest: usize,
    pub(crate) alloc: A,
}

// SAFETY: the buffer pointer is uniquely owned and only reachable through
// the container's borrow-checked API.
unsafe impl<T: Send, A: BufferAlloc + Send> Send for RingVec<T, A> {}
// SAFETY: shared access is read-only; mutation requires `&mut self`.
unsafe impl<T: Sync, A: BufferAlloc + Sync> Sync for RingVec<T, A> {}

impl<T> RingVec<T> {
    /// Creates an empty buffer with zero capacity on the global heap.
    #[must_use]
    pub fn new() -> Self {
        Self::new_in(HeapAlloc)
    }

    /// Creates an empty buffer with `cap` preallocated slots.
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::CapacityOverflow` if `cap` exceeds
    /// [`max_len`](RingVec::max_len).
    pub fn with_capacity(cap: usize) -> Result<Self, RingVecError> {
        Self::with_capacity_in(cap, HeapAlloc)
    }

    /// Creates a full buffer of `count` default-constructed elements.
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::CapacityOverflow` if `count` exceeds
    /// [`max_len`](RingVec::max_len).
    pub fn from_default(count: usize) -> Result<Self, RingVecError>
    where
        T: Default,
    {
        Self::from_default_in(count, HeapAlloc)
    }

    /// Creates a full buffer of `count` clones of `value`.
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::CapacityOverflow` if `count` exceeds
    /// [`max_len`](RingVec::max_len).
    pub fn from_elem(value: T, count: usize) -> Result<Self, RingVecError>
    where
        T: Clone,
    {
        Self::from_elem_in(value, count, HeapAlloc)
    }

    /// Creates a full buffer holding a clone of `values`, sized exactly to
    /// it. The first slice element becomes the oldest buffer element.
    #[must_use]
    pub fn from_slice(values: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from_slice_in(values, HeapAlloc)
    }
}

impl<T, A: BufferAlloc> RingVec<T, A> {
    /// Creates an empty buffer with zero capacity owned by `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self {
            buf: NonNull::dangling(),
            cap: 0,
            len: 0,
            newest: 0,
            alloc,
        }
    }

    /// Creates an empty buffer with `cap` slots acquired from `alloc`.
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::CapacityOverflow` if `cap` exceeds
    /// [`max_len`](RingVec::max_len).
    pub fn with_capacity_in(cap: usize, alloc: A) -> Result<Self, RingVecError> {
        Self::check_capacity(cap)?;
        let buf = Self::allocate_slots(&alloc, cap);
        Ok(Self {
            buf,
            cap,
            len: 0,
            newest: 0,
            alloc,
        })
    }

    /// Creates a full buffer of `count` default-constructed elements in
    /// storage owned by `alloc`.
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::CapacityOverflow` if `count` exceeds
    /// [`max_len`](RingVec::max_len).
    pub fn from_default_in(count: usize, alloc: A) -> Result<Self, RingVecError>
    where
        T: Default,
    {
        let mut out = Self::with_capacity_in(count, alloc)?;
        out.fill_forward(count, |_| T::default());
        Ok(out)
    }

    /// Creates a full buffer of `count` clones of `value` in storage owned
    /// by `alloc`.
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::CapacityOverflow` if `count` exceeds
    /// [`max_len`](RingVec::max_len).
    pub fn from_elem_in(value: T, count: usize, alloc: A) -> Result<Self, RingVecError>
    where
        T: Clone,
    {
        let mut out = Self::with_capacity_in(count, alloc)?;
        out.fill_forward(count, |_| value.clone());
        Ok(out)
    }

    /// Creates a full buffer holding a clone of `values` in storage owned by
    /// `alloc`. The first slice element becomes the oldest buffer element.
    #[must_use]
    pub fn from_slice_in(values: &[T], alloc: A) -> Self
    where
        T: Clone,
    {
        // A live slice can never exceed the maximum allocation size, so the
        // capacity check is vacuous here.
        let buf = Self::allocate_slots(&alloc, values.len());
        let mut out = Self {
            buf,
            cap: values.len(),
            len: 0,
            newest: 0,
            alloc,
        };
        out.fill_forward(values.len(), |slot| values[slot].clone());
        out
    }

    /// Writes `count` elements into the fresh slots `0..count`, oldest
    /// first, leaving the buffer exactly full.
    ///
    /// Caller provides an empty buffer with `cap == count`. `len` tracks
    /// every completed write so a panicking producer drops only what exists.
    fn fill_forward(&mut self, count: usize, mut make: impl FnMut(usize) -> T) {
        debug_assert!(self.len == 0 && self.cap == count);
        for slot in 0..count {
            // SAFETY: slot < cap and the slot is uninitialized.
            unsafe { ptr::write(self.buf.as_ptr().add(slot), make(slot)) };
            self.len = slot + 1;
        }
        self.newest = count.saturating_sub(1);
        self.debug_assert_invariant();
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total usable slots; changes only through [`reserve`](RingVec::reserve)
    /// and [`shrink_to_fit`](RingVec::shrink_to_fit).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Upper bound on the number of slots any buffer of this element type
    /// can hold.
    #[must_use]
    pub fn max_len(&self) -> usize {
        Self::max_slots()
    }

    /// Borrows the allocation strategy.
    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    fn max_slots() -> usize {
        if mem::size_of::<T>() == 0 {
            usize::MAX
        } else {
            isize::MAX as usize / mem::size_of::<T>()
        }
    }

    fn check_capacity(requested: usize) -> Result<(), RingVecError> {
        if requested > Self::max_slots() {
            return Err(RingVecError::CapacityOverflow {
                requested,
                max: Self::max_slots(),
            });
        }
        Ok(())
    }

    #[allow(clippy::expect_used)]
    fn slot_layout(count: usize) -> Layout {
        Layout::array::<T>(count).expect("slot count validated against max_len")
    }

    /// Acquires `count` slots from `alloc`, or a dangling pointer when the
    /// layout is zero-sized (zero capacity, or zero-sized `T`).
    pub(crate) fn allocate_slots(alloc: &A, count: usize) -> NonNull<T> {
        let layout = Self::slot_layout(count);
        if layout.size() == 0 {
            return NonNull::dangling();
        }
        alloc.allocate(layout).cast()
    }

    /// Releases `count` slots previously acquired from `alloc`'s pool.
    ///
    /// # Safety
    ///
    /// `buf` must have come from [`allocate_slots`](Self::allocate_slots)
    /// with the same `count`, on an allocator of the same pool, and every
    /// element in it must already be moved out or dropped.
    pub(crate) unsafe fn release_slots(alloc: &A, buf: NonNull<T>, count: usize) {
        let layout = Self::slot_layout(count);
        if layout.size() != 0 {
            // SAFETY: forwarded caller contract.
            unsafe { alloc.deallocate(buf.cast(), layout) };
        }
    }

    /// Decomposes the buffer without running `Drop`.
    pub(crate) fn into_raw_parts(self) -> (A, NonNull<T>, usize, usize, usize) {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the allocator is moved out of
        // it exactly once.
        let alloc = unsafe { ptr::read(&this.alloc) };
        (alloc, this.buf, this.cap, this.len, this.newest)
    }

    #[inline]
    pub(crate) fn slot_of(&self, pos: usize) -> usize {
        debug_assert!(pos < self.len);
        physical_slot(self.newest, self.cap, pos)
    }

    #[inline]
    fn slot_ptr(&self, slot: usize) -> *mut T {
        debug_assert!(slot < self.cap);
        // SAFETY: slot < cap keeps the offset inside the allocation; for
        // zero-sized T the offset is a no-op on the dangling base.
        unsafe { self.buf.as_ptr().add(slot) }
    }

    /// Pointer to the element at logical position `pos` (0 = newest).
    #[inline]
    pub(crate) fn logical_ptr(&self, pos: usize) -> *mut T {
        self.slot_ptr(self.slot_of(pos))
    }

    #[inline]
    fn debug_assert_invariant(&self) {
        debug_assert!(
            self.len == 0 || self.len == self.cap || self.newest == self.len - 1,
            "ring layout violated: len {} cap {} newest {}",
            self.len,
            self.cap,
            self.newest
        );
    }

    /// Appends `value` as the newest element.
    ///
    /// While the buffer has headroom this grows `len` and returns `None`.
    /// Once full, the new element takes the slot of the oldest one, which is
    /// moved out and returned as `Some(evicted)`: it is never dropped behind
    /// the caller's back, and never overwritten while still live.
    ///
    /// # Panics
    ///
    /// Panics if the buffer has zero capacity.
    pub fn push(&mut self, value: T) -> Option<T> {
        assert!(self.cap > 0, "Cannot push into a zero-capacity buffer");
        self.newest = if self.len == 0 {
            0
        } else {
            (self.newest + 1) % self.cap
        };
        let slot = self.slot_ptr(self.newest);
        let evicted = if self.len < self.cap {
            // Invariant places the next free slot exactly here.
            self.len += 1;
            None
        } else {
            // SAFETY: the advanced slot holds the oldest live element; it is
            // read out exactly once before being overwritten below.
            Some(unsafe { ptr::read(slot) })
        };
        // SAFETY: slot is in bounds and currently uninitialized.
        unsafe { ptr::write(slot, value) };
        self.debug_assert_invariant();
        evicted
    }

    /// Constructs the new element via `make` and pushes it.
    ///
    /// # Panics
    ///
    /// Panics if the buffer has zero capacity.
    pub fn push_with<F: FnOnce() -> T>(&mut self, make: F) -> Option<T> {
        self.push(make())
    }

    /// Drops all live elements. Capacity is unchanged; a following `push`
    /// reuses the existing allocation.
    pub fn clear(&mut self) {
        let live: *mut [T] = ptr::slice_from_raw_parts_mut(self.buf.as_ptr(), self.len);
        self.len = 0;
        self.newest = 0;
        // SAFETY: slots 0..len were exactly the initialized region; len is
        // zeroed first so a panicking element Drop cannot cause a re-drop.
        unsafe { ptr::drop_in_place(live) };
    }

    /// Keeps the `count` newest elements and drops the rest. No-op when
    /// `count >= len`.
    pub fn truncate(&mut self, count: usize) {
        if count >= self.len {
            return;
        }
        if count == 0 {
            self.clear();
            return;
        }
        if self.len == self.cap && self.newest != self.cap - 1 {
            // Wrapped full buffer: rotate into physical order first so the
            // oldest element sits at slot 0.
            // SAFETY: all cap slots are live when the buffer is full.
            let all = unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.cap) };
            all.rotate_left(self.newest + 1);
            self.newest = self.cap - 1;
        }
        // Slots now run oldest-to-newest from 0; the victims are the lowest
        // drop_n slots and the survivors slide down over them.
        let drop_n = self.len - count;
        let base = self.buf.as_ptr();
        self.len = 0;
        self.newest = 0;
        // SAFETY: len is parked at zero, so a panicking element Drop leaks
        // the survivors instead of double-dropping; the region move is a
        // memmove over slots within the allocation.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base, drop_n));
            ptr::copy(base.add(drop_n), base, count);
        }
        self.len = count;
        self.newest = count - 1;
        self.debug_assert_invariant();
    }

    /// Grows capacity to at least `new_cap`. Requests at or below the
    /// current capacity are ignored; capacity never shrinks here.
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::CapacityOverflow` if `new_cap` exceeds
    /// [`max_len`](RingVec::max_len).
    pub fn reserve(&mut self, new_cap: usize) -> Result<(), RingVecError> {
        Self::check_capacity(new_cap)?;
        if new_cap > self.cap {
            self.reallocate(new_cap);
        }
        Ok(())
    }

    /// Reallocates so that `capacity == len`, releasing all headroom.
    pub fn shrink_to_fit(&mut self) {
        self.reallocate(self.len);
    }

    /// Replaces the backing allocation with one of `new_cap` slots, keeping
    /// the `min(len, new_cap)` newest elements. Kept elements land in slots
    /// `0..keep` with the newest at `keep - 1`, restoring the
    /// not-full-or-exactly-full layout.
    fn reallocate(&mut self, new_cap: usize) {
        if new_cap == self.cap {
            return;
        }
        let keep = self.len.min(new_cap);
        let new_buf = Self::allocate_slots(&self.alloc, new_cap);
        for pos in 0..keep {
            // SAFETY: the source slot is live and read exactly once; the
            // destination is fresh. Newest (pos 0) lands highest.
            unsafe {
                ptr::write(
                    new_buf.as_ptr().add(keep - 1 - pos),
                    ptr::read(self.logical_ptr(pos)),
                );
            }
        }
        for pos in keep..self.len {
            // SAFETY: positions keep.. are the oldest elements, not moved
            // above; each is dropped exactly once.
            unsafe { ptr::drop_in_place(self.logical_ptr(pos)) };
        }
        // SAFETY: every live element was moved out or dropped above.
        unsafe { Self::release_slots(&self.alloc, self.buf, self.cap) };
        self.buf = new_buf;
        self.cap = new_cap;
        self.len = keep;
        self.newest = keep.saturating_sub(1);
        self.debug_assert_invariant();
    }

    /// Resizes to exactly `count` elements.
    ///
    /// Shrinking keeps the `count` newest elements. Growing first raises
    /// capacity to `count` if needed, then fills with clones of `value`
    /// appended as the new oldest elements; existing elements keep their
    /// logical positions.
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::CapacityOverflow` if `count` exceeds
    /// [`max_len`](RingVec::max_len).
    pub fn resize(&mut self, count: usize, value: T) -> Result<(), RingVecError>
    where
        T: Clone,
    {
        self.resize_with(count, || value.clone())
    }

    /// [`resize`](RingVec::resize) with a producer closure instead of a
    /// cloned template value.
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::CapacityOverflow` if `count` exceeds
    /// [`max_len`](RingVec::max_len).
    pub fn resize_with<F: FnMut() -> T>(
        &mut self,
        count: usize,
        mut make: F,
    ) -> Result<(), RingVecError> {
        match count.cmp(&self.len) {
            Ordering::Equal => Ok(()),
            Ordering::Less => {
                self.truncate(count);
                Ok(())
            }
            Ordering::Greater => {
                self.reserve(count)?;
                // Here the live region is slots 0..len with the newest at
                // len - 1 (reallocate normalizes, and a not-full buffer is
                // already in that shape). Slide it up and fill the vacated
                // low slots, which are the oldest logical positions.
                let old_len = self.len;
                let grow_n = count - old_len;
                let base = self.buf.as_ptr();
                self.len = 0;
                self.newest = 0;
                // SAFETY: count <= cap so both regions are in bounds; the
                // slide is a memmove; len stays parked at zero until every
                // slot in 0..count is initialized, so a panicking `make`
                // leaks instead of touching uninitialized slots.
                unsafe {
                    ptr::copy(base, base.add(grow_n), old_len);
                    for slot in 0..grow_n {
                        ptr::write(base.add(slot), make());
                    }
                }
                self.len = count;
                self.newest = count - 1;
                self.debug_assert_invariant();
                Ok(())
            }
        }
    }

    /// Gets the element at logical position `pos` (0 = newest).
    ///
    /// Returns `None` if `pos` is out of bounds.
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<&T> {
        if pos >= self.len {
            return None;
        }
        // SAFETY: pos < len, so the slot is live.
        Some(unsafe { &*self.logical_ptr(pos) })
    }

    /// Mutable [`get`](RingVec::get).
    pub fn get_mut(&mut self, pos: usize) -> Option<&mut T> {
        if pos >= self.len {
            return None;
        }
        // SAFETY: pos < len, so the slot is live; `&mut self` is exclusive.
        Some(unsafe { &mut *self.logical_ptr(pos) })
    }

    /// Checked access carrying the offending index and the bound.
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::IndexOutOfBounds` if `pos >= len`.
    pub fn try_get(&self, pos: usize) -> Result<&T, RingVecError> {
        self.get(pos).ok_or(RingVecError::IndexOutOfBounds {
            index: pos,
            length: self.len,
        })
    }

    /// Mutable [`try_get`](RingVec::try_get).
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::IndexOutOfBounds` if `pos >= len`.
    pub fn try_get_mut(&mut self, pos: usize) -> Result<&mut T, RingVecError> {
        let length = self.len;
        self.get_mut(pos).ok_or(RingVecError::IndexOutOfBounds {
            index: pos,
            length,
        })
    }

    /// The newest element, or `None` when empty.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Mutable [`front`](RingVec::front).
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// The oldest live element, or `None` when empty.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.get(self.len.checked_sub(1)?)
    }

    /// Mutable [`back`](RingVec::back).
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let pos = self.len.checked_sub(1)?;
        self.get_mut(pos)
    }

    /// The live elements as one contiguous slice, in physical slot order
    /// (not logical order; use [`iter`](RingVec::iter) for newest-first).
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // Slots 0..len are exactly the initialized region in every
        // reachable state.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// Mutable [`as_slice`](RingVec::as_slice).
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for as_slice; `&mut self` is exclusive.
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    /// Raw base pointer of the backing allocation.
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Mutable raw base pointer of the backing allocation.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_ptr()
    }

    /// Iterates the live elements newest to oldest.
    #[must_use]
    pub fn iter(&self) -> RingVecIter<'_, T, A> {
        RingVecIter::new(self)
    }

    /// Mutable [`iter`](RingVec::iter).
    pub fn iter_mut(&mut self) -> RingVecIterMut<'_, T, A> {
        RingVecIterMut::new(self)
    }

    /// Clones the live elements into storage owned by `alloc`.
    ///
    /// As with `Clone`, the result is sized to the live count: its capacity
    /// equals `self.len()`, headroom is not preserved.
    #[must_use]
    pub fn clone_in(&self, alloc: A) -> Self
    where
        T: Clone,
    {
        let buf = Self::allocate_slots(&alloc, self.len);
        let mut out = Self {
            buf,
            cap: self.len,
            len: 0,
            newest: 0,
            alloc,
        };
        for slot in 0..self.len {
            // SAFETY: source slot is live; destination slot is fresh. The
            // slot-for-slot copy plus the shared newest index preserves
            // logical order in both layout cases.
            unsafe { ptr::write(buf.as_ptr().add(slot), (*self.slot_ptr(slot)).clone()) };
            out.len = slot + 1;
        }
        if self.len > 0 {
            out.newest = self.newest;
        }
        out.debug_assert_invariant();
        out
    }

    /// Re-homes the buffer into storage owned by `alloc`.
    ///
    /// When `alloc` shares a pool with the current allocator this only
    /// re-tags ownership, in constant time. Otherwise fresh storage of the
    /// same capacity is acquired from `alloc` and every live element is
    /// moved over individually.
    #[must_use]
    pub fn into_alloc(self, alloc: A) -> Self {
        let (src_alloc, buf, cap, len, newest) = self.into_raw_parts();
        if alloc.same_pool(&src_alloc) {
            return Self {
                buf,
                cap,
                len,
                newest,
                alloc,
            };
        }
        let new_buf = Self::allocate_slots(&alloc, cap);
        for slot in 0..len {
            // SAFETY: slots 0..len are live in the source; each is read
            // exactly once. Same slot, same newest: layout is unchanged.
            unsafe { ptr::write(new_buf.as_ptr().add(slot), ptr::read(buf.as_ptr().add(slot))) };
        }
        // SAFETY: all elements moved out; the allocation returns to its own
        // pool.
        unsafe { Self::release_slots(&src_alloc, buf, cap) };
        Self {
            buf: new_buf,
            cap,
            len,
            newest,
            alloc,
        }
    }

    /// Move-assignment with allocator awareness.
    ///
    /// Drops the current contents and releases the current storage. If the
    /// allocator propagates on move-assignment it is adopted from `other`;
    /// when the (possibly adopted) allocators share a pool the source
    /// allocation is taken over in constant time, otherwise every live
    /// element is moved into fresh storage sized to the source's live count.
    pub fn assign(&mut self, other: Self) {
        self.clear();
        // SAFETY: contents dropped above; the old buffer is replaced below
        // before any further use.
        unsafe { Self::release_slots(&self.alloc, self.buf, self.cap) };
        self.buf = NonNull::dangling();
        self.cap = 0;

        let (src_alloc, src_buf, src_cap, src_len, src_newest) = other.into_raw_parts();
        if self.alloc.propagate_on_assign() || self.alloc.same_pool(&src_alloc) {
            if self.alloc.propagate_on_assign() {
                self.alloc = src_alloc;
            }
            self.buf = src_buf;
            self.cap = src_cap;
            self.len = src_len;
            self.newest = src_newest;
            self.debug_assert_invariant();
            return;
        }
        // Unrelated pools: element-wise move, storage sized to the live
        // count.
        let buf = Self::allocate_slots(&self.alloc, src_len);
        self.buf = buf;
        self.cap = src_len;
        for slot in 0..src_len {
            // SAFETY: source slots 0..len are live; each is read once.
            unsafe { ptr::write(buf.as_ptr().add(slot), ptr::read(src_buf.as_ptr().add(slot))) };
        }
        self.len = src_len;
        self.newest = if src_len > 0 { src_newest } else { 0 };
        // SAFETY: source is fully drained; its allocation goes back to its
        // own pool.
        unsafe { Self::release_slots(&src_alloc, src_buf, src_cap) };
        self.debug_assert_invariant();
    }

    /// Exchanges the complete state of two buffers.
    ///
    /// Succeeds when `self`'s allocator propagates on swap (both allocators
    /// travel with their buffers) or when the two allocators share a pool
    /// (metadata swap only, allocators stay put).
    ///
    /// # Errors
    ///
    /// Returns `RingVecError::AllocatorMismatch` when the allocators are
    /// unrelated and non-propagating; both buffers are left untouched.
    pub fn try_swap(&mut self, other: &mut Self) -> Result<(), RingVecError> {
        if self.alloc.propagate_on_swap() {
            mem::swap(self, other);
            return Ok(());
        }
        if self.alloc.same_pool(&other.alloc) {
            mem::swap(&mut self.buf, &mut other.buf);
            mem::swap(&mut self.cap, &mut other.cap);
            mem::swap(&mut self.len, &mut other.len);
            mem::swap(&mut self.newest, &mut other.newest);
            return Ok(());
        }
        Err(RingVecError::AllocatorMismatch)
    }
}

impl<T, A: BufferAlloc> Drop for RingVec<T, A> {
    fn drop(&mut self) {
        let live: *mut [T] = ptr::slice_from_raw_parts_mut(self.buf.as_ptr(), self.len);
        // SAFETY: slots 0..len are the initialized region; the allocation is
        // released exactly once with the layout it was created with.
        unsafe {
            ptr::drop_in_place(live);
            Self::release_slots(&self.alloc, self.buf, self.cap);
        }
    }
}

impl<T: Clone, A: BufferAlloc + Clone> Clone for RingVec<T, A> {
    fn clone(&self) -> Self {
        self.clone_in(self.alloc.clone())
    }

    /// Copy-assignment with allocator awareness: drops the current contents
    /// and storage, adopts the source allocator if it propagates on
    /// copy-assignment, then rebuilds sized to the source's live count.
    fn clone_from(&mut self, other: &Self) {
        self.clear();
        // SAFETY: contents dropped above; the buffer is replaced below.
        unsafe { Self::release_slots(&self.alloc, self.buf, self.cap) };
        self.buf = NonNull::dangling();
        self.cap = 0;
        if self.alloc.propagate_on_clone() {
            self.alloc = other.alloc.clone();
        }
        let buf = Self::allocate_slots(&self.alloc, other.len);
        self.buf = buf;
        self.cap = other.len;
        for slot in 0..other.len {
            // SAFETY: source slot is live, destination fresh; len tracks
            // completed writes so a panicking clone drops only what exists.
            unsafe { ptr::write(buf.as_ptr().add(slot), (*other.slot_ptr(slot)).clone()) };
            self.len = slot + 1;
        }
        self.newest = if other.len > 0 { other.newest } else { 0 };
        self.debug_assert_invariant();
    }
}

impl<T, A: BufferAlloc + Default> Default for RingVec<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: fmt::Debug, A: BufferAlloc> fmt::Debug for RingVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A: BufferAlloc> Index<usize> for RingVec<T, A> {
    type Output = T;

    fn index(&self, pos: usize) -> &T {
        assert!(
            pos < self.len,
            "Index {} out of bounds for buffer of length {}",
            pos,
            self.len
        );
        // SAFETY: bounds asserted above.
        unsafe { &*self.logical_ptr(pos) }
    }
}

impl<T, A: BufferAlloc> IndexMut<usize> for RingVec<T, A> {
    fn index_mut(&mut self, pos: usize) -> &mut T {
        assert!(
            pos < self.len,
            "Index {} out of bounds for buffer of length {}",
            pos,
            self.len
        );
        // SAFETY: bounds asserted above; `&mut self` is exclusive.
        unsafe { &mut *self.logical_ptr(pos) }
    }
}

impl<T: PartialEq, A: BufferAlloc, B: BufferAlloc> PartialEq<RingVec<T, B>> for RingVec<T, A> {
    /// Logical-sequence equality: capacities and physical rotations are
    /// ignored, only the newest-to-oldest element sequences compare.
    fn eq(&self, other: &RingVec<T, B>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: BufferAlloc> Eq for RingVec<T, A> {}

impl<T, A: BufferAlloc> Extend<T> for RingVec<T, A> {
    /// Pushes every yielded element; once the buffer is full each push
    /// evicts the oldest element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer has zero capacity and the iterator is non-empty.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T, A: BufferAlloc + Default> FromIterator<T> for RingVec<T, A> {
    /// Builds a full buffer sized exactly to the yielded element count.
    ///
    /// The yield order becomes oldest-to-newest, matching
    /// [`from_slice`](RingVec::from_slice). Elements are staged through a
    /// `Vec` because the capacity must match the exact count up front;
    /// ring storage never grows implicitly.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let staged: Vec<T> = iter.into_iter().collect();
        let count = staged.len();
        let alloc = A::default();
        let buf = Self::allocate_slots(&alloc, count);
        let mut out = Self {
            buf,
            cap: count,
            len: 0,
            newest: 0,
            alloc,
        };
        for (slot, value) in staged.into_iter().enumerate() {
            // SAFETY: slot < cap and the slot is uninitialized.
            unsafe { ptr::write(out.buf.as_ptr().add(slot), value) };
            out.len = slot + 1;
        }
        out.newest = count.saturating_sub(1);
        out.debug_assert_invariant();
        out
    }
}
