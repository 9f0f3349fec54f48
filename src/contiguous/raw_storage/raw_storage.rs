use std::alloc::{self, Layout};
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::slice;

use crate::contiguous::error::{AllocFailed, CapacityOverflow, StorageError};
use crate::util::result::ResultExtension;

/// An owned, fixed-capacity block of uninitialized memory with room for exactly `cap` values of
/// `T`.
///
/// A RawStorage knows nothing about which of its slots hold live values. It never constructs or
/// drops a `T`, dropping a RawStorage only returns its memory to the global allocator. Whoever
/// writes values into the slots is responsible for dropping (or moving out) each of them before
/// the storage goes away, otherwise those values are leaked.
///
/// Ownership of the allocation is unique: a RawStorage can be moved, [`swap`](RawStorage::swap)ped
/// or [`take`](RawStorage::take)n but never cloned.
///
/// # Time Complexity
/// | Method | Complexity |
/// |-|-|
/// | `with_cap` | `O(1)` |
/// | `cap` | `O(1)` |
/// | `slot_ptr` | `O(1)` |
/// | `swap` | `O(1)` |
/// | `take` | `O(1)` |
pub struct RawStorage<T> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) cap: usize,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> RawStorage<T> {
    /// Creates a new RawStorage with capacity 0. No memory is allocated.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::RawStorage;
    /// let storage: RawStorage<u8> = RawStorage::new();
    /// assert_eq!(storage.cap(), 0);
    /// ```
    pub const fn new() -> RawStorage<T> {
        RawStorage {
            ptr: NonNull::dangling(),
            cap: 0,
            _phantom: PhantomData,
        }
    }

    /// Allocates a new RawStorage with room for exactly `cap` values. None of the slots are
    /// initialized.
    ///
    /// # Panics
    /// Panics if the memory layout size would exceed [`isize::MAX`].
    ///
    /// # Errors
    /// In the event of an allocation error, this method calls [`alloc::handle_alloc_error`] as
    /// recommended, rather than panicking.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::RawStorage;
    /// let storage: RawStorage<String> = RawStorage::with_cap(8);
    /// assert_eq!(storage.cap(), 8);
    /// ```
    pub fn with_cap(cap: usize) -> RawStorage<T> {
        match Self::try_with_cap(cap) {
            Ok(storage) => storage,
            Err(StorageError::AllocFailed(AllocFailed { layout })) => {
                alloc::handle_alloc_error(layout)
            },
            Err(StorageError::CapacityOverflow(err)) => Err(err).throw(),
        }
    }

    /// Attempts to allocate a new RawStorage with room for exactly `cap` values, returning an error
    /// instead of aborting or panicking.
    ///
    /// # Errors
    /// Returns [`StorageError::CapacityOverflow`] if the layout size would exceed [`isize::MAX`] and
    /// [`StorageError::AllocFailed`] if the global allocator can't provide the memory.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::RawStorage;
    /// assert!(RawStorage::<u64>::try_with_cap(16).is_ok());
    /// assert!(RawStorage::<u64>::try_with_cap(usize::MAX).unwrap_err().is_capacity_overflow());
    /// ```
    pub fn try_with_cap(cap: usize) -> Result<RawStorage<T>, StorageError> {
        let layout = Self::make_layout(cap)?;

        let ptr = if layout.size() == 0 {
            // Covers both cap == 0 and zero-sized T.
            NonNull::dangling()
        } else {
            // SAFETY: Zero-sized layouts have been guarded against.
            let raw_ptr = unsafe { alloc::alloc(layout) }.cast::<T>();
            NonNull::new(raw_ptr).ok_or(AllocFailed { layout })?
        };

        Ok(RawStorage {
            ptr,
            cap,
            _phantom: PhantomData,
        })
    }

    /// Returns the number of slots in the RawStorage.
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Returns a pointer to the first slot. The pointer is dangling if the capacity is 0 or `T` is
    /// zero-sized.
    pub const fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns a mutable pointer to the first slot. The pointer is dangling if the capacity is 0 or
    /// `T` is zero-sized.
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns a pointer to the slot at `offset`. An `offset` equal to the capacity is allowed and
    /// produces the one-past-the-end address, which must not be read or written.
    ///
    /// # Safety
    /// `offset` must be less than or equal to [`cap`](RawStorage::cap). This is only asserted in
    /// debug builds.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::RawStorage;
    /// let mut storage: RawStorage<u32> = RawStorage::with_cap(2);
    /// unsafe {
    ///     storage.slot_ptr(0).write(7);
    ///     storage.slot_ptr(1).write(9);
    ///     assert_eq!(storage.slot_ptr(2).offset_from(storage.slot_ptr(0)), 2);
    ///     assert_eq!(storage[1].assume_init(), 9);
    /// }
    /// ```
    pub const unsafe fn slot_ptr(&self, offset: usize) -> *mut T {
        debug_assert!(offset <= self.cap, "slot offset past the end of the storage");
        // SAFETY: The caller guarantees that offset <= cap, so the result is within the
        // allocation or one past its end. cap * size_of::<T>() <= isize::MAX is enforced when
        // allocating.
        unsafe { self.ptr.add(offset).as_ptr() }
    }

    /// Exchanges the allocations of self and `other` without touching any of the slots.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::RawStorage;
    /// let mut a: RawStorage<u8> = RawStorage::with_cap(4);
    /// let mut b: RawStorage<u8> = RawStorage::new();
    /// a.swap(&mut b);
    /// assert_eq!((a.cap(), b.cap()), (0, 4));
    /// ```
    pub fn swap(&mut self, other: &mut RawStorage<T>) {
        mem::swap(self, other);
    }

    /// Moves the allocation out of self, leaving an empty RawStorage in its place.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::RawStorage;
    /// let mut a: RawStorage<u8> = RawStorage::with_cap(4);
    /// let b = a.take();
    /// assert_eq!((a.cap(), b.cap()), (0, 4));
    /// ```
    pub fn take(&mut self) -> RawStorage<T> {
        mem::replace(self, RawStorage::new())
    }
}

impl<T> RawStorage<T> {
    /// A helper function to create a [`Layout`] for `cap` values of `T`.
    pub(crate) fn make_layout(cap: usize) -> Result<Layout, CapacityOverflow> {
        Layout::array::<T>(cap).map_err(|_| CapacityOverflow)
    }
}

impl<T> Default for RawStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        // Any live values must already have been dropped or moved out by the owner, only the
        // memory itself is released here.
        match Self::make_layout(self.cap) {
            Ok(layout) if layout.size() != 0 => {
                // SAFETY: A non-zero layout means that ptr was allocated by the global allocator
                // with this exact layout in try_with_cap.
                unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
            },
            // Nothing was allocated.
            _ => (),
        }
    }
}

impl<T> Deref for RawStorage<T> {
    type Target = [MaybeUninit<T>];

    fn deref(&self) -> &Self::Target {
        // SAFETY: The pointer is nonnull, properly aligned and valid for cap slots. MaybeUninit<T>
        // has the same layout as T and places no requirements on its contents.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast(), self.cap) }
    }
}

impl<T> DerefMut for RawStorage<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As for deref, with uniqueness guaranteed by &mut self.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.cap) }
    }
}

impl<T> Debug for RawStorage<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawStorage")
            .field("ptr", &self.ptr)
            .field("cap", &self.cap)
            .finish()
    }
}

// SAFETY: RawStorage uniquely owns its allocation, so it can be sent whenever T can.
unsafe impl<T: Send> Send for RawStorage<T> {}
// SAFETY: Shared access only hands out shared references to the slots.
unsafe impl<T: Sync> Sync for RawStorage<T> {}
