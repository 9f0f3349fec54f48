use std::borrow::{Borrow, BorrowMut};
use std::cmp;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::slice;

use super::guard::InitGuard;
use crate::contiguous::RawStorage;
use crate::contiguous::error::{CapacityOverflow, IndexOutOfBounds, StorageError};
use crate::util::result::ResultExtension;

const MIN_CAP: usize = 1;

const GROWTH_FACTOR: usize = 2;

/// A growable contiguous collection, built on a [`RawStorage<T>`] and a count of the live values
/// at its front.
///
/// Slots `0..len` always hold live values and slots `len..cap` are uninitialized. The capacity
/// never shrinks unless the DynamicArray is replaced, so truncating keeps the allocation around for
/// reuse.
///
/// When a push or insert needs more room, the capacity doubles (starting from 1). The new value is
/// constructed in the new storage before any existing value is moved, so a panic while producing
/// it leaves the DynamicArray exactly as it was.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the DynamicArray.
/// - `i`: The index of the item in question.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `cap` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `pop` | `O(1)` |
/// | `insert` | `O(n-i)`*, `O(n)` |
/// | `remove` | `O(n-i)` |
/// | `erase` | `O(n-i)` |
/// | `reserve` | `O(n)`**, `O(1)` |
/// | `resize` | `O(n)` |
/// | `take` | `O(1)` |
///
/// \* If the DynamicArray doesn't have capacity for another element, the values are relocated into
/// a new allocation, taking `O(n)`.
///
/// \** If the DynamicArray already has the requested capacity, `reserve` is `O(1)`.
pub struct DynamicArray<T> {
    pub(crate) storage: RawStorage<T>,
    pub(crate) len: usize,
}

impl<T> DynamicArray<T> {
    /// Creates a new DynamicArray with length and capacity 0. Memory will be allocated when the
    /// first value is added.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let arr: DynamicArray<u8> = DynamicArray::new();
    /// assert_eq!(arr.len(), 0);
    /// assert_eq!(arr.cap(), 0);
    /// ```
    pub const fn new() -> DynamicArray<T> {
        DynamicArray {
            storage: RawStorage::new(),
            len: 0,
        }
    }

    /// Creates a new, empty DynamicArray with capacity exactly equal to `cap`.
    ///
    /// # Panics
    /// Panics if the memory layout size would exceed [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut arr: DynamicArray<u8> = DynamicArray::with_cap(5);
    /// assert_eq!(arr.cap(), 5);
    /// arr.extend([1, 2, 3, 4, 5]);
    /// assert_eq!(arr.cap(), 5);
    /// ```
    pub fn with_cap(cap: usize) -> DynamicArray<T> {
        DynamicArray {
            storage: RawStorage::with_cap(cap),
            len: 0,
        }
    }

    /// Attempts to create a new, empty DynamicArray with capacity exactly equal to `cap`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the layout overflows or the allocation fails.
    pub fn try_with_cap(cap: usize) -> Result<DynamicArray<T>, StorageError> {
        Ok(DynamicArray {
            storage: RawStorage::try_with_cap(cap)?,
            len: 0,
        })
    }

    /// Creates a DynamicArray holding `len` default values, with capacity exactly `len`.
    ///
    /// # Panics
    /// Panics if the memory layout size would exceed [`isize::MAX`]. If [`Default::default`]
    /// panics, all values created so far are dropped before the panic continues.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let arr: DynamicArray<i32> = DynamicArray::with_len(5);
    /// assert_eq!(&*arr, &[0, 0, 0, 0, 0]);
    /// assert_eq!(arr.cap(), 5);
    /// ```
    pub fn with_len(len: usize) -> DynamicArray<T>
    where
        T: Default,
    {
        let mut arr = Self::with_cap(len);
        arr.resize_with(len, T::default);
        arr
    }

    /// Returns the number of live values in the DynamicArray.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the DynamicArray contains no values.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut arr: DynamicArray<u8> = DynamicArray::new();
    /// assert!(arr.is_empty());
    /// arr.push(1);
    /// assert!(!arr.is_empty())
    /// ```
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of values the DynamicArray can hold without reallocating.
    pub const fn cap(&self) -> usize {
        self.storage.cap()
    }

    /// Ensures that the capacity is at least `new_cap`, reallocating to exactly `new_cap` if it is
    /// currently smaller. Does nothing otherwise.
    ///
    /// # Panics
    /// Panics if the memory layout size would exceed [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::from([1, 2, 3]);
    /// arr.reserve(10);
    /// assert_eq!(arr.cap(), 10);
    /// arr.reserve(4);
    /// assert_eq!(arr.cap(), 10);
    /// assert_eq!(&*arr, &[1, 2, 3]);
    /// ```
    pub fn reserve(&mut self, new_cap: usize) {
        if new_cap <= self.cap() {
            return;
        }

        let len = self.len;
        self.relocate(RawStorage::with_cap(new_cap), len);
    }

    /// Attempts to ensure that the capacity is at least `new_cap`. On failure the DynamicArray is
    /// left untouched.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the layout overflows or the allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::from([1_u64, 2]);
    /// assert!(arr.try_reserve(usize::MAX).is_err());
    /// assert_eq!((&*arr, arr.cap()), (&[1, 2][..], 2));
    /// ```
    pub fn try_reserve(&mut self, new_cap: usize) -> Result<(), StorageError> {
        if new_cap <= self.cap() {
            return Ok(());
        }

        let len = self.len;
        self.relocate(RawStorage::try_with_cap(new_cap)?, len);
        Ok(())
    }

    /// Resizes the DynamicArray to `new_len`, filling new slots with values produced by `f`, or
    /// dropping the values past `new_len` when shrinking. The capacity is never reduced.
    ///
    /// When growing beyond the current capacity, the capacity becomes exactly `new_len`. If `f`
    /// panics, the values it already produced are dropped and the length is unchanged.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::from([1, 2]);
    /// let mut next = 10;
    /// arr.resize_with(4, || { next += 1; next });
    /// assert_eq!(&*arr, &[1, 2, 11, 12]);
    /// ```
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, mut f: F) {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }

        self.reserve(new_len);

        // SAFETY: The capacity is now at least new_len, so every slot in len..new_len is in bounds
        // and uninitialized.
        let mut guard = unsafe { InitGuard::new(self.storage.slot_ptr(self.len)) };
        for _ in self.len..new_len {
            // SAFETY: At most new_len - len values are written.
            unsafe { guard.write_next(f()) }
        }
        self.len += guard.commit();
    }

    /// Resizes the DynamicArray to `new_len`, filling new slots with [`Default::default`].
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut arr: DynamicArray<u32> = DynamicArray::from([4, 5, 6, 7, 8]);
    /// arr.resize(2);
    /// assert_eq!(&*arr, &[4, 5]);
    /// arr.resize(4);
    /// assert_eq!(&*arr, &[4, 5, 0, 0]);
    /// assert_eq!(arr.cap(), 5);
    /// ```
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Drops every value at or after `new_len`. Has no effect if `new_len >= len`. The capacity is
    /// unchanged.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }

        // SAFETY: new_len < len <= cap.
        let tail = ptr::slice_from_raw_parts_mut(
            unsafe { self.storage.slot_ptr(new_len) },
            self.len - new_len,
        );
        // Shorten first, so that a panicking Drop can't cause the tail to be dropped twice.
        self.len = new_len;
        // SAFETY: The tail holds the initialized values which were just removed from the live
        // range.
        unsafe { ptr::drop_in_place(tail) }
    }

    /// Drops all values, keeping the capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Pushes `value` onto the end of the DynamicArray, doubling the capacity if it is full, and
    /// returns a reference to it.
    ///
    /// # Panics
    /// Panics if the memory layout size would exceed [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::new();
    /// arr.push(1);
    /// assert_eq!(arr.cap(), 1);
    /// arr.push(2);
    /// *arr.push(3) += 10;
    /// assert_eq!(arr.cap(), 4);
    /// assert_eq!(&*arr, &[1, 2, 13]);
    /// ```
    pub fn push(&mut self, value: T) -> &mut T {
        self.emplace_with(|| value)
    }

    /// Constructs a value with `f` directly in the next free slot and returns a reference to it.
    ///
    /// If the DynamicArray is full, `f` runs against the newly allocated storage before any
    /// existing value is relocated, so a panic in `f` leaves length, capacity and values unchanged.
    ///
    /// # Panics
    /// Panics if the memory layout size would exceed [`isize::MAX`].
    pub fn emplace_with<F: FnOnce() -> T>(&mut self, f: F) -> &mut T {
        let index = self.len;

        if self.len == self.cap() {
            let new_storage = RawStorage::<T>::with_cap(self.grown_cap());
            // SAFETY: The new capacity is greater than len, so the slot at index is in bounds.
            unsafe { new_storage.slot_ptr(index).write(f()) }
            self.relocate(new_storage, index);
        } else {
            // SAFETY: len < cap, so the slot at index is in bounds and uninitialized.
            unsafe { self.storage.slot_ptr(index).write(f()) }
        }

        self.len += 1;
        // SAFETY: The value at index was just initialized and is uniquely borrowed through self.
        unsafe { &mut *self.storage.slot_ptr(index) }
    }

    /// Inserts `value` at `index`, shifting every value after it one place to the right, and
    /// returns `index`. An `index` equal to the length pushes onto the end.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::from([0, 1, 2]);
    /// assert_eq!(arr.insert(1, 100), 1);
    /// arr.insert(1, 200);
    /// arr.insert(5, 300);
    /// assert_eq!(&*arr, &[0, 200, 100, 1, 2, 300]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        self.emplace(index, || value)
    }

    /// Constructs a value with `f` and inserts it at `index`, returning `index`.
    ///
    /// The value is always produced before anything is shifted or relocated: into a temporary when
    /// there is spare capacity, or straight into its final slot in the new storage when growing. A
    /// panic in `f` therefore leaves the DynamicArray unchanged.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn emplace<F: FnOnce() -> T>(&mut self, index: usize, f: F) -> usize {
        self.check_position(index);

        if index == self.len {
            self.emplace_with(f);
            return index;
        }

        if self.len == self.cap() {
            let new_storage = RawStorage::<T>::with_cap(self.grown_cap());
            // SAFETY: index < len < new cap.
            unsafe { new_storage.slot_ptr(index).write(f()) }
            self.relocate(new_storage, index);
        } else {
            let value = f();
            // SAFETY: index < len < cap, so shifting index..len right by one stays within the
            // storage. After the copy, the slot at index is logically uninitialized and is
            // immediately overwritten without dropping.
            unsafe {
                let slot = self.storage.slot_ptr(index);
                ptr::copy(slot, slot.add(1), self.len - index);
                slot.write(value);
            }
        }

        self.len += 1;
        index
    }

    /// Removes and returns the value at `index`, shifting every value after it one place to the
    /// left.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut arr: DynamicArray<_> = "Hello world!".chars().collect();
    /// assert_eq!(arr.remove(1), 'e');
    /// assert_eq!(arr.remove(4), ' ');
    /// assert_eq!(arr, "Hlloworld!".chars().collect());
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        self.check_index(index);

        // SAFETY: index < len, so the value is initialized. It is moved out before the following
        // values are shifted over its slot, and len is reduced to exclude the now duplicated last
        // slot.
        unsafe {
            let slot = self.storage.slot_ptr(index);
            let value = slot.read();
            ptr::copy(slot.add(1), slot, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Drops the value at `index`, shifting every value after it one place to the left, and
    /// returns the position of the value that followed it (now `index`).
    ///
    /// The removed value is only dropped once the DynamicArray is consistent again, so a panicking
    /// [`Drop`] can't cause a double drop. It is still lost in that case.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::from([1, 9, 2, 3]);
    /// assert_eq!(arr.erase(0), 0);
    /// assert_eq!(&*arr, &[9, 2, 3]);
    /// ```
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Pops the last value off the end of the DynamicArray, returning it if there was one.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut arr = DynamicArray::from([9, 2]);
    /// assert_eq!(arr.pop(), Some(2));
    /// assert_eq!(arr.pop(), Some(9));
    /// assert_eq!(arr.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            // Decrement len before reading.
            self.len -= 1;

            // SAFETY: The slot at the old last index is initialized and is no longer counted as
            // live, so reading it out moves the value.
            Some(unsafe { self.storage.slot_ptr(self.len).read() })
        }
    }

    /// Exchanges the contents of self and `other` without moving or copying any values.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut a = DynamicArray::from([1, 2, 3]);
    /// let mut b = DynamicArray::from([4]);
    /// a.swap_contents(&mut b);
    /// assert_eq!((&*a, &*b), (&[4][..], &[1, 2, 3][..]));
    /// ```
    pub fn swap_contents(&mut self, other: &mut DynamicArray<T>) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Moves the contents out of self into a new DynamicArray, leaving self empty with capacity 0.
    /// The values keep their addresses.
    ///
    /// # Examples
    /// ```
    /// # use dynamic_array::contiguous::DynamicArray;
    /// let mut a = DynamicArray::from([1, 2, 3]);
    /// let first = a.as_ptr();
    /// let b = a.take();
    /// assert_eq!((a.len(), a.cap()), (0, 0));
    /// assert_eq!(b.as_ptr(), first);
    /// ```
    pub fn take(&mut self) -> DynamicArray<T> {
        let mut taken = DynamicArray::new();
        self.swap_contents(&mut taken);
        taken
    }
}

impl<T> DynamicArray<T> {
    /// Returns the capacity to grow to when the DynamicArray is full.
    ///
    /// # Panics
    /// Panics if doubling the capacity would overflow [`usize`].
    pub(crate) fn grown_cap(&self) -> usize {
        let cap = self.cap().checked_mul(GROWTH_FACTOR).ok_or(CapacityOverflow).throw();
        cmp::max(cap, MIN_CAP)
    }

    /// Moves every live value into `new_storage` and adopts it, releasing the old allocation. The
    /// values from `gap` onwards are shifted one slot to the right, leaving the slot at `gap` to the
    /// caller. Passing `gap == len` moves the values without leaving a gap.
    ///
    /// Moving can't fail, so once this is called the old storage is always replaced.
    pub(crate) fn relocate(&mut self, mut new_storage: RawStorage<T>, gap: usize) {
        debug_assert!(gap <= self.len);
        let tail = self.len - gap;
        debug_assert!(new_storage.cap() >= self.len + usize::from(tail != 0));

        #[cfg(feature = "trace")]
        tracing::trace!(
            len = self.len,
            old_cap = self.cap(),
            new_cap = new_storage.cap(),
            "relocating dynamic array"
        );

        // SAFETY: Both ranges are in bounds of their storage and the two allocations don't
        // overlap. The source values are bitwise moved, after which the old storage is only
        // deallocated, never dropped element-wise.
        unsafe {
            ptr::copy_nonoverlapping(self.storage.as_ptr(), new_storage.as_mut_ptr(), gap);
            if tail != 0 {
                ptr::copy_nonoverlapping(
                    self.storage.slot_ptr(gap),
                    new_storage.slot_ptr(gap + 1),
                    tail,
                );
            }
        }

        self.storage.swap(&mut new_storage);
    }

    /// Checks that `index` refers to a live value.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    #[track_caller]
    pub(crate) fn check_index(&self, index: usize) {
        if index >= self.len {
            Err(IndexOutOfBounds {
                index,
                len: self.len,
            })
            .throw()
        }
    }

    /// Checks that `index` is a valid insertion position, which includes the end.
    ///
    /// # Panics
    /// Panics if the provided index is greater than the length.
    #[track_caller]
    pub(crate) fn check_position(&self, index: usize) {
        if index > self.len {
            Err(IndexOutOfBounds {
                index,
                len: self.len,
            })
            .throw()
        }
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // SAFETY: All values less than len are initialized and safe to drop.
        unsafe { ptr::drop_in_place::<[T]>(&mut **self) }

        // Implicitly drop self.storage, which only deallocates.
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: The pointer is nonnull and properly aligned, and the first len slots are
        // initialized. The borrow checker prevents mutation for the lifetime of the slice.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As for deref, with uniqueness guaranteed by &mut self.
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.len) }
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for DynamicArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Borrow<[T]> for DynamicArray<T> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T> BorrowMut<[T]> for DynamicArray<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// Deep copies the DynamicArray into a new allocation with capacity equal to its length. If a
    /// clone panics, the clones made so far are dropped and the allocation is released.
    fn clone(&self) -> Self {
        let mut storage = RawStorage::with_cap(self.len);

        // SAFETY: storage has exactly len uninitialized slots and at most len values are written.
        let mut guard = unsafe { InitGuard::new(storage.as_mut_ptr()) };
        for value in self.iter() {
            // SAFETY: See above.
            unsafe { guard.write_next(value.clone()) }
        }
        let len = guard.commit();

        DynamicArray {
            storage,
            len,
        }
    }

    /// Makes self a deep copy of `source`, reusing the current allocation when it is large enough.
    ///
    /// If `source` doesn't fit, a complete copy is built first and swapped in, so a panicking clone
    /// leaves self untouched. Otherwise the shared prefix is assigned in place and the remaining
    /// values are either dropped or cloned into spare capacity.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.cap() {
            let mut rebuilt = source.clone();
            self.swap_contents(&mut rebuilt);
            return;
        }

        let shared = cmp::min(self.len, source.len);
        self[..shared].clone_from_slice(&source[..shared]);

        if source.len <= self.len {
            self.truncate(source.len);
        } else {
            // SAFETY: source.len <= cap, so the slots in len..source.len are in bounds and
            // uninitialized.
            let mut guard = unsafe { InitGuard::new(self.storage.slot_ptr(self.len)) };
            for value in &source[shared..] {
                // SAFETY: See above.
                unsafe { guard.write_next(value.clone()) }
            }
            self.len += guard.commit();
        }
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for item in iter {
            self.push(*item);
        }
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(value: I) -> Self {
        let iter = value.into_iter();
        let mut arr = DynamicArray::with_cap(iter.size_hint().0);

        for item in iter {
            arr.push(item);
        }

        arr
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {
    fn from(value: [T; N]) -> Self {
        // The exact size hint gives a capacity of exactly N.
        value.into_iter().collect()
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: Hash> Hash for DynamicArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug> Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicArray")
            .field("contents", &&**self)
            .field("len", &self.len)
            .field("cap", &self.cap())
            .finish()
    }
}
