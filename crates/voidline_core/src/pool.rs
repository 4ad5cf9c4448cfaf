//! Fixed-capacity object pool with slot recycling.
//!
//! Slots are preallocated and reused; nothing is allocated per object after
//! construction. A rolling cursor remembers where the last allocation
//! ended so the common path does not rescan from zero:
//!
//! 1. Scan `cursor..capacity` for an inactive slot.
//! 2. Wrap and scan `0..cursor`.
//! 3. If every slot is active, apply the pool's [`AllocationPolicy`].
//!
//! Slots are handed out round-robin, so when the pool is saturated the
//! slot under the cursor holds the oldest allocation.

use std::fmt;

/// What to do when every slot is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationPolicy {
    /// Reset the oldest live object and reuse its slot. Never fails.
    EvictOldest,
    /// Drop the request and log a warning.
    RejectAndLog,
}

/// An object that lives in a [`Pool`].
pub trait Poolable: Default {
    /// Advance by `delta` seconds. Returns `false` once the object has
    /// expired and its slot can be reused.
    fn tick(&mut self, delta: f32) -> bool;

    /// Return to the freshly constructed state before reuse.
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Fixed-capacity pool of `T`.
pub struct Pool<T> {
    slots: Vec<T>,
    active: Vec<bool>,
    active_count: usize,
    cursor: usize,
    policy: AllocationPolicy,
    label: &'static str,
}

impl<T: Poolable> Pool<T> {
    /// Create a pool with `capacity` preallocated slots.
    ///
    /// `label` names the pool in log lines.
    #[must_use]
    pub fn new(capacity: usize, policy: AllocationPolicy, label: &'static str) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, T::default);
        Self {
            slots,
            active: vec![false; capacity],
            active_count: 0,
            cursor: 0,
            policy,
            label,
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live objects.
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    /// Slot the next scan starts from.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Saturation policy.
    #[must_use]
    pub const fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    /// Whether slot `index` holds a live object.
    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    fn find_free(&self) -> Option<usize> {
        (self.cursor..self.capacity())
            .chain(0..self.cursor)
            .find(|&i| !self.active[i])
    }

    /// Take a slot, reset it and run `init` on it.
    ///
    /// Returns the slot index, or `None` when the pool has no slots at all
    /// or is saturated under [`AllocationPolicy::RejectAndLog`].
    pub fn allocate(&mut self, init: impl FnOnce(&mut T)) -> Option<usize> {
        if self.slots.is_empty() {
            tracing::warn!(pool = self.label, "Allocation from a pool with no slots");
            return None;
        }

        let index = match self.find_free() {
            Some(index) => index,
            None => match self.policy {
                AllocationPolicy::EvictOldest => {
                    tracing::trace!(pool = self.label, slot = self.cursor, "Pool saturated, evicting oldest");
                    self.active[self.cursor] = false;
                    self.active_count -= 1;
                    self.cursor
                }
                AllocationPolicy::RejectAndLog => {
                    tracing::warn!(
                        pool = self.label,
                        capacity = self.capacity(),
                        "Pool at capacity, request dropped"
                    );
                    return None;
                }
            },
        };

        let slot = &mut self.slots[index];
        slot.reset();
        init(slot);
        self.active[index] = true;
        self.active_count += 1;
        self.cursor = (index + 1) % self.capacity();
        Some(index)
    }

    /// Deactivate slot `index`. Returns whether it was live.
    pub fn kill(&mut self, index: usize) -> bool {
        match self.active.get_mut(index) {
            Some(active) if *active => {
                *active = false;
                self.active_count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Deactivate every slot and rewind the cursor.
    pub fn clear(&mut self) {
        self.active.fill(false);
        self.active_count = 0;
        self.cursor = 0;
    }

    /// Tick every live object and deactivate the expired ones.
    pub fn update(&mut self, delta: f32) {
        self.update_with(|_, object| object.tick(delta));
    }

    /// Run `f` on every live object; objects for which it returns `false`
    /// are deactivated.
    pub fn update_with(&mut self, mut f: impl FnMut(usize, &mut T) -> bool) {
        for (index, (object, active)) in self.slots.iter_mut().zip(&mut self.active).enumerate() {
            if *active && !f(index, object) {
                *active = false;
                self.active_count -= 1;
            }
        }
    }

    /// Live object in slot `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if self.is_active(index) {
            self.slots.get(index)
        } else {
            None
        }
    }

    /// Live object in slot `index`, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if self.is_active(index) {
            self.slots.get_mut(index)
        } else {
            None
        }
    }

    /// Iterate live objects with their slot indices.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .zip(&self.active)
            .enumerate()
            .filter(|(_, (_, active))| **active)
            .map(|(index, (object, _))| (index, object))
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("label", &self.label)
            .field("capacity", &self.slots.len())
            .field("active", &self.active_count)
            .field("cursor", &self.cursor)
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use voidline_test_utils::strategies::{pool_ops, PoolOp};

    #[derive(Debug, Default)]
    struct Timer {
        remaining: f32,
        tag: u32,
    }

    impl Poolable for Timer {
        fn tick(&mut self, delta: f32) -> bool {
            self.remaining -= delta;
            self.remaining > 0.0
        }
    }

    fn timer(tag: u32) -> impl FnOnce(&mut Timer) {
        move |t| {
            t.remaining = 1.0;
            t.tag = tag;
        }
    }

    #[test]
    fn test_allocate_fills_in_order() {
        let mut pool = Pool::<Timer>::new(4, AllocationPolicy::EvictOldest, "test");
        for expected in 0..4 {
            assert_eq!(pool.allocate(timer(0)), Some(expected));
        }
        assert_eq!(pool.active_count(), 4);
        assert_eq!(pool.cursor(), 0);
    }

    #[test]
    fn test_evict_oldest_reuses_slot_zero() {
        let mut pool = Pool::<Timer>::new(4, AllocationPolicy::EvictOldest, "test");
        for tag in 0..4 {
            pool.allocate(timer(tag));
        }
        assert_eq!(pool.allocate(timer(99)), Some(0));
        assert_eq!(pool.active_count(), 4);
        assert_eq!(pool.get(0).unwrap().tag, 99);
        assert_eq!(pool.get(1).unwrap().tag, 1);
    }

    #[test]
    fn test_eviction_is_round_robin() {
        let mut pool = Pool::<Timer>::new(3, AllocationPolicy::EvictOldest, "test");
        for tag in 0..3 {
            pool.allocate(timer(tag));
        }
        assert_eq!(pool.allocate(timer(10)), Some(0));
        assert_eq!(pool.allocate(timer(11)), Some(1));
        assert_eq!(pool.allocate(timer(12)), Some(2));
        assert_eq!(pool.allocate(timer(13)), Some(0));
    }

    #[test]
    fn test_reject_when_saturated() {
        let mut pool = Pool::<Timer>::new(2, AllocationPolicy::RejectAndLog, "test");
        assert!(pool.allocate(timer(0)).is_some());
        assert!(pool.allocate(timer(1)).is_some());
        assert_eq!(pool.allocate(timer(2)), None);
        assert_eq!(pool.get(0).unwrap().tag, 0);
    }

    #[test]
    fn test_allocation_continues_from_cursor() {
        let mut pool = Pool::<Timer>::new(8, AllocationPolicy::EvictOldest, "test");
        for tag in 0..3 {
            pool.allocate(timer(tag));
        }
        assert_eq!(pool.cursor(), 3);
        assert_eq!(pool.allocate(timer(3)), Some(3));
    }

    #[test]
    fn test_slot_freed_at_cursor_is_reused_before_later_slots() {
        let mut pool = Pool::<Timer>::new(8, AllocationPolicy::EvictOldest, "test");
        for tag in 0..8 {
            pool.allocate(timer(tag));
        }
        assert_eq!(pool.cursor(), 0);

        for index in 0..3 {
            assert!(pool.kill(index));
        }
        for tag in 10..13 {
            pool.allocate(timer(tag));
        }
        assert_eq!(pool.cursor(), 3);

        assert!(pool.kill(3));
        assert_eq!(pool.allocate(timer(30)), Some(3));
        assert_eq!(pool.get(3).unwrap().tag, 30);
        for index in 0..3 {
            assert!(pool.is_active(index));
            assert_eq!(pool.get(index).unwrap().tag, 10 + index as u32);
        }
        assert_eq!(pool.active_count(), 8);
    }

    #[test]
    fn test_freed_slot_found_after_wrap() {
        let mut pool = Pool::<Timer>::new(6, AllocationPolicy::EvictOldest, "test");
        for tag in 0..6 {
            pool.allocate(timer(tag));
        }
        assert!(pool.kill(4));
        assert_eq!(pool.allocate(timer(40)), Some(4));
        assert_eq!(pool.active_count(), 6);
    }

    #[test]
    fn test_update_expires_objects() {
        let mut pool = Pool::<Timer>::new(4, AllocationPolicy::EvictOldest, "test");
        pool.allocate(timer(0));
        pool.allocate(|t| t.remaining = 3.0);
        pool.update(1.5);
        assert_eq!(pool.active_count(), 1);
        assert!(!pool.is_active(0));
        assert!(pool.is_active(1));
    }

    #[test]
    fn test_allocation_resets_slot() {
        let mut pool = Pool::<Timer>::new(1, AllocationPolicy::EvictOldest, "test");
        pool.allocate(timer(5));
        pool.allocate(|_| {});
        assert_eq!(pool.get(0).unwrap().tag, 0);
    }

    #[test]
    fn test_zero_capacity_never_allocates() {
        let mut pool = Pool::<Timer>::new(0, AllocationPolicy::EvictOldest, "test");
        assert_eq!(pool.allocate(timer(0)), None);
    }

    #[test]
    fn test_kill_inactive_is_noop() {
        let mut pool = Pool::<Timer>::new(2, AllocationPolicy::EvictOldest, "test");
        assert!(!pool.kill(0));
        assert!(!pool.kill(7));
        assert_eq!(pool.active_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_active_count_never_exceeds_capacity(
            capacity in 1usize..32,
            ops in pool_ops(200),
        ) {
            let mut pool = Pool::<Timer>::new(capacity, AllocationPolicy::EvictOldest, "prop");
            for op in ops {
                match op {
                    PoolOp::Allocate => {
                        prop_assert!(pool.allocate(timer(0)).is_some());
                    }
                    PoolOp::Kill(slot) => {
                        pool.kill(slot % capacity);
                    }
                    PoolOp::Update(delta) => pool.update(delta),
                }
                prop_assert!(pool.active_count() <= capacity);
                prop_assert_eq!(pool.active_count(), pool.iter_active().count());
            }
        }

        #[test]
        fn prop_n_plus_one_allocations_leave_n_active(capacity in 1usize..128) {
            let mut pool = Pool::<Timer>::new(capacity, AllocationPolicy::EvictOldest, "prop");
            for _ in 0..capacity {
                pool.allocate(timer(0));
            }
            prop_assert_eq!(pool.allocate(timer(1)), Some(0));
            prop_assert_eq!(pool.active_count(), capacity);
        }
    }
}
