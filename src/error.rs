use thiserror::Error;

/// Error types for `RingVec` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum RingVecError {
    /// Index is beyond the current number of live elements
    #[error("Index out of bounds: index {index} is beyond buffer length {length}")]
    IndexOutOfBounds {
        /// Index that was accessed
        index: usize,
        /// Current number of live elements
        length: usize,
    },
    /// Requested capacity exceeds the maximum addressable slot count
    #[error("Capacity overflow: requested {requested} slots, but at most {max} are addressable")]
    CapacityOverflow {
        /// Number of slots requested
        requested: usize,
        /// Maximum slot count for the element type
        max: usize,
    },
    /// Swap attempted between buffers whose allocators cannot exchange memory
    #[error("Allocator mismatch: swap requires propagating or interchangeable allocators")]
    AllocatorMismatch,
}
