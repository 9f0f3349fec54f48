//! Error types for fallible allocation within the contiguous collections.
use std::alloc::Layout;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant};

/// The requested capacity can't be represented as a memory layout, because its size in bytes would
/// exceed [`isize::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityOverflow;

impl Display for CapacityOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Capacity overflow!")
    }
}

impl Error for CapacityOverflow {}

/// The global allocator returned null for the contained [`Layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocFailed {
    pub layout: Layout,
}

impl Display for AllocFailed {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to allocate {} bytes with alignment {}!",
            self.layout.size(),
            self.layout.align()
        )
    }
}

impl Error for AllocFailed {}

/// Any error that can occur while acquiring storage. Returned by the `try_*` methods of
/// [`RawStorage`](super::RawStorage) and [`DynamicArray`](super::DynamicArray), which leave the
/// collection untouched when they fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, IsVariant)]
pub enum StorageError {
    CapacityOverflow(CapacityOverflow),
    AllocFailed(AllocFailed),
}

/// An index or position that lies outside of the live elements of a collection. This is a
/// contract violation rather than a recoverable error, so it is only ever raised as a panic.
#[derive(Debug)]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}
