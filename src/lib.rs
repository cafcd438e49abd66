//! An elastic dynamic-array container.
//!
//! [`FlexArr`] is a contiguous growable *and shrinkable* array. Unlike
//! `std::vec::Vec`, which only ever grows, a `FlexArr` carries a per-instance
//! [`ReservePolicy`] that both expands the buffer when it fills past a
//! threshold and gives memory back when enough elements are removed, keeping
//! wasted capacity bounded by a constant factor of the live size.
//!
//! On top of the container sit the rank-based sequence algorithms the buffer
//! invariants make cheap: descending linear search, order-aware
//! deduplication, binary search over sorted content, and bubble/merge sorts.
//!
//! [`FlexArr`]: collections::FlexArr
//! [`ReservePolicy`]: collections::ReservePolicy

pub mod collections;

pub mod prelude;
