//! A from-scratch growable array, split into the two layers that a dynamic array is really made
//! of.
//!
//! # Layers
//! - [`RawStorage<T>`](contiguous::RawStorage) owns an allocation with room for a fixed number of
//!   values, but never constructs or drops any of them. It can be moved or swapped, not cloned.
//! - [`DynamicArray<T>`](contiguous::DynamicArray) owns exactly one RawStorage plus the number of
//!   live values at its front. It decides when values are constructed, moved and dropped, and
//!   replaces its storage with a larger one (doubling from 1) whenever it runs out of room.
//!
//! # Failure
//! There are two kinds of failure that the DynamicArray has to survive:
//! - Running out of memory. The infallible methods defer to
//!   [`handle_alloc_error`](std::alloc::handle_alloc_error) like [`Vec`] does, while the `try_*`
//!   methods return a [`StorageError`](contiguous::error::StorageError) and leave the collection
//!   untouched.
//! - User code panicking while a value is being created, whether that is a closure,
//!   [`Default::default`] or [`Clone::clone`]. New values are always produced before any existing
//!   value is relocated, and runs of new values are written under a guard that drops them again if
//!   a later one fails. Nothing is leaked or dropped twice, and growth never leaves a half-moved
//!   array behind.
//!
//! Moving a value in Rust is a bitwise copy that can't fail, so relocation itself is always a move.
//!
//! Out of bounds positions are contract violations and panic, they are not reported as errors.
//!
//! # Dependencies
//! Errors are derived with `derive_more`. With the default `trace` feature, every relocation emits
//! a `tracing` event at the trace level, which is compiled out of release builds.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod contiguous;

pub(crate) mod util;
