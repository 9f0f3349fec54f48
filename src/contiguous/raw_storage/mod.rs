//! A module containing [`RawStorage`], the untyped allocation underneath
//! [`DynamicArray`](super::DynamicArray).
//!
//! [`RawStorage`] is also re-exported under the parent module.

mod raw_storage;

pub use raw_storage::*;
