use std::mem;
use std::ptr;

/// Tracks a run of slots being initialized front to back. If the guard is dropped before
/// [`commit`](InitGuard::commit) is called, for example because constructing the next value
/// panicked, every value written so far is dropped again, leaving the slots uninitialized.
pub(crate) struct InitGuard<T> {
    start: *mut T,
    init: usize,
}

impl<T> InitGuard<T> {
    /// Creates a guard over the uninitialized slots starting at `start`.
    ///
    /// # Safety
    /// `start` must be valid for writes for as many slots as will be written through the guard and
    /// nothing else may access those slots while the guard exists.
    pub(crate) const unsafe fn new(start: *mut T) -> InitGuard<T> {
        InitGuard {
            start,
            init: 0,
        }
    }

    /// Writes `value` into the next slot.
    ///
    /// # Safety
    /// The next slot must be within the range promised to [`InitGuard::new`].
    pub(crate) unsafe fn write_next(&mut self, value: T) {
        // SAFETY: The caller guarantees that the slot is in range and unaliased.
        unsafe { self.start.add(self.init).write(value) }
        self.init += 1;
    }

    /// Hands ownership of the written values back to the caller, returning how many there are.
    pub(crate) fn commit(self) -> usize {
        let init = self.init;
        mem::forget(self);
        init
    }
}

impl<T> Drop for InitGuard<T> {
    fn drop(&mut self) {
        // SAFETY: Exactly init values have been written starting at start, and none of them have
        // been handed out.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.start, self.init)) }
    }
}
