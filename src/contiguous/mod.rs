//! Contiguous collection types. Namely [`RawStorage`], an owned block of uninitialized slots, and
//! [`DynamicArray`], which tracks the live values within one and grows it as required.
#![warn(missing_docs)]

pub mod dynamic_array;
#[allow(missing_docs)]
pub mod error;
pub mod raw_storage;

#[doc(inline)]
pub use dynamic_array::DynamicArray;
#[doc(inline)]
pub use raw_storage::RawStorage;
