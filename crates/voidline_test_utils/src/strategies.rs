//! Property-based testing strategies.
//!
//! Strategies here produce plain data so they can drive unit tests inside
//! `voidline_core` as well as integration tests.

use proptest::collection::vec;
use proptest::prelude::*;

/// One step of a pool workload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoolOp {
    /// Allocate a slot.
    Allocate,
    /// Kill a slot. Reduce modulo capacity before use.
    Kill(usize),
    /// Advance by this many seconds.
    Update(f32),
}

/// Random pool workloads of up to `max_len` steps.
pub fn pool_ops(max_len: usize) -> impl Strategy<Value = Vec<PoolOp>> {
    let op = prop_oneof![
        4 => Just(PoolOp::Allocate),
        2 => any::<usize>().prop_map(PoolOp::Kill),
        1 => (0.0f32..2.0).prop_map(PoolOp::Update),
    ];
    vec(op, 0..=max_len)
}

/// Non-empty sequences of tick lengths as fractions of a lifetime.
pub fn decay_steps(max_len: usize) -> impl Strategy<Value = Vec<f32>> {
    vec(0.05f32..=1.0, 1..=max_len.max(1))
}

/// Coordinates of a point within `extent` of the origin on each axis.
pub fn position(extent: f32) -> impl Strategy<Value = (f32, f32, f32)> {
    (-extent..extent, -extent..extent, -extent..extent)
}
