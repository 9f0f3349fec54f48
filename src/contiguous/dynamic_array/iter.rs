use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::mem::ManuallyDrop;
use std::ptr;
use std::slice;

use super::DynamicArray;
use crate::contiguous::RawStorage;

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;

    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        // The live values are handed over to the iterator along with the storage, so the
        // DynamicArray itself must not drop them.
        let mut arr = ManuallyDrop::new(self);
        IntoIter {
            storage: arr.storage.take(),
            start: 0,
            end: arr.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;

    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;

    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An owned type for owned iteration over a [`DynamicArray`]. See [`DynamicArray::into_iter`].
///
/// The values in `start..end` are still live. Dropping the iterator drops them and then releases
/// the storage.
pub struct IntoIter<T> {
    pub(crate) storage: RawStorage<T>,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl<T> IntoIter<T> {
    /// Returns the values that haven't been yielded yet as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The values in start..end are initialized and within the storage.
        unsafe { slice::from_raw_parts(self.storage.slot_ptr(self.start), self.end - self.start) }
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: The values in start..end haven't been yielded and are still initialized.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.storage.slot_ptr(self.start),
                self.end - self.start,
            ))
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            // SAFETY: start < end, so the slot is initialized. Advancing start afterwards means the
            // value is moved out rather than copied.
            let value = unsafe { self.storage.slot_ptr(self.start).read() };
            self.start += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            self.end -= 1;
            // SAFETY: The slot at the decremented end was initialized and is no longer in range.
            Some(unsafe { self.storage.slot_ptr(self.end).read() })
        } else {
            None
        }
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T: Debug> Debug for IntoIter<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
