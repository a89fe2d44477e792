//! Optimization Barrier
//!
//! Keeps the optimizer from deleting benchmarked work whose result is unused.
//!
//! Guarantee by backend:
//! - rustc + LLVM (all tier-1 targets): `black_box` lowers to an empty inline
//!   asm block that takes the value's address with a memory clobber, so the
//!   producing computation must be materialized.
//! - Other codegen backends (cranelift, Miri) may treat `black_box` as the
//!   identity function. Results on those backends are best effort.
//!
//! Zero-sized results (work returning `()`) carry no data to hide, so a
//! sequentially consistent fence is issued after the call instead.

use std::sync::atomic::{Ordering, fence};

pub use std::hint::black_box;

/// Consume the output of one invocation of benchmarked work.
///
/// Must be called after the work has returned and before the end timestamp
/// is taken.
#[inline(always)]
pub fn do_not_optimize<T>(value: T) {
    drop(black_box(value));
    if std::mem::size_of::<T>() == 0 {
        fence(Ordering::SeqCst);
    }
}
