//! Memory model shared by both machines
//!
//! - [`heap`]: address-indexed node store with monotonic allocation and
//!   in-place overwrite
//! - [`stack`]: the stack of heap addresses used for the reduction spine
//!
//! # Addresses
//!
//! An [`Addr`] names one heap node. Overwriting the node stored at an address
//! is how a reduced expression becomes visible to every other node pointing at
//! it; no node ever holds a direct reference to another node.

pub mod heap;
pub mod stack;

/// Heap address
pub type Addr = usize;

/// Target of an indirection that has not been filled in yet (a `letrec`
/// binding under construction, or a G-machine `Alloc` slot).
pub const PLACEHOLDER: Addr = Addr::MAX;
