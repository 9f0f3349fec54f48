//! A module containing [`DynamicArray`] and associated types.
//!
//! The only other public type is [`IntoIter`] for owned iteration. [`IterMut`](std::slice::IterMut)
//! and [`Iter`](std::slice::Iter) from [`std::slice`] are used for borrowed iteration.
//!
//! [`DynamicArray`] is also re-exported under the parent module.

mod dynamic_array;
mod guard;
mod iter;

pub use dynamic_array::*;
pub use iter::*;
