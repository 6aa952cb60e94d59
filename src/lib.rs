//! `RingVec`: a fixed-capacity, allocator-aware circular buffer with a
//! vector-style API.
//!
//! `RingVec` stores elements in one contiguous allocation of `capacity`
//! slots reused circularly. While there is headroom a push simply grows the
//! buffer; once full, each push evicts the oldest element and hands it back
//! to the caller. Capacity only ever changes through explicit calls
//! (`reserve`, `shrink_to_fit`, `resize`); the buffer never grows on its
//! own.
//!
//! Logical position 0 is always the *newest* element. Indexing, `front`,
//! `back`, and iteration all use this newest-first view, independent of
//! where elements physically sit in the allocation.
//!
//! # Ring semantics
//!
//! ```
//! use ringvec::RingVec;
//!
//! let mut recent = RingVec::with_capacity(3).unwrap();
//! assert_eq!(recent.push("a"), None);
//! assert_eq!(recent.push("b"), None);
//! assert_eq!(recent.push("c"), None);
//!
//! // Full: the next push evicts the oldest element and returns it.
//! assert_eq!(recent.push("d"), Some("a"));
//!
//! // Newest first.
//! let window: Vec<_> = recent.iter().copied().collect();
//! assert_eq!(window, vec!["d", "c", "b"]);
//! assert_eq!(recent.front(), Some(&"d"));
//! assert_eq!(recent.back(), Some(&"b"));
//! ```
//!
//! # Capacity control
//!
//! ```
//! use ringvec::RingVec;
//!
//! let mut buffer: RingVec<u32> = RingVec::new();
//! buffer.reserve(5).unwrap();
//! for i in 0..4 {
//!     buffer.push(i);
//! }
//! assert_eq!((buffer.len(), buffer.capacity()), (4, 5));
//!
//! buffer.clear();
//! assert_eq!((buffer.len(), buffer.capacity()), (0, 5));
//!
//! buffer.resize(10, 2).unwrap();
//! assert_eq!(buffer.len(), 10);
//! assert!(buffer.iter().all(|&v| v == 2));
//!
//! buffer.shrink_to_fit();
//! assert_eq!(buffer.capacity(), buffer.len());
//! ```
//!
//! # Allocator awareness
//!
//! Storage is acquired through the [`BufferAlloc`] capability, injected at
//! construction. The default [`HeapAlloc`] uses the global heap; custom
//! implementations (arenas, pools, instrumented allocators) plug in through
//! the `*_in` constructors. Three propagation flags on the trait decide
//! whether the allocator travels with the buffer during copy-assignment
//! ([`clone_from`](Clone::clone_from)), move-assignment
//! ([`assign`](RingVec::assign)), and [`try_swap`](RingVec::try_swap).
//! Storage may be taken over wholesale between same-pool allocators but
//! must be moved element by element between unrelated ones.
//!
//! # Errors and contracts
//!
//! Checked positional access (`try_get`) and capacity requests (`reserve`,
//! `resize`) report structured [`RingVecError`] values carrying the
//! offending quantity and its bound. Caller-contract violations (`[]`
//! beyond `len`, pushing into a zero-capacity buffer) panic with explicit
//! messages rather than being silently absorbed.

mod alloc;
mod core;
mod error;
mod iter;

pub use crate::alloc::{BufferAlloc, HeapAlloc};
pub use crate::core::RingVec;
pub use crate::error::RingVecError;
pub use crate::iter::{RingVecIntoIter, RingVecIter, RingVecIterMut};
