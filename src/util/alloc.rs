//! Element types for observing how a collection constructs, clones and drops its values.
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ZeroSizedType;

/// Increments a shared counter every time an instance is dropped.
#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<Cell<usize>>);

impl CountedDrop {
    pub fn new(counter: &Rc<Cell<usize>>) -> CountedDrop {
        CountedDrop(Rc::clone(counter))
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

/// A value that can only be cloned a limited number of times. Once the shared budget is spent,
/// cloning panics, which simulates a failing copy in the middle of a bulk operation. Every live
/// instance is tracked, so tests can check that nothing leaks or gets dropped twice.
#[derive(Debug)]
pub struct FallibleClone {
    pub value: u32,
    tracker: Rc<CloneTracker>,
}

#[derive(Debug, Default)]
pub struct CloneTracker {
    pub budget: Cell<usize>,
    pub live: Cell<usize>,
}

impl CloneTracker {
    pub fn new(budget: usize) -> Rc<CloneTracker> {
        Rc::new(CloneTracker {
            budget: Cell::new(budget),
            live: Cell::new(0),
        })
    }

    pub fn make(self: &Rc<Self>, value: u32) -> FallibleClone {
        self.live.set(self.live.get() + 1);
        FallibleClone {
            value,
            tracker: Rc::clone(self),
        }
    }
}

impl Clone for FallibleClone {
    fn clone(&self) -> Self {
        let budget = self.tracker.budget.get();
        if budget == 0 {
            panic!("clone budget exhausted");
        }
        self.tracker.budget.set(budget - 1);
        self.tracker.make(self.value)
    }
}

impl Drop for FallibleClone {
    fn drop(&mut self) {
        self.tracker.live.set(self.tracker.live.get() - 1);
    }
}

impl PartialEq for FallibleClone {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
