//! # Entity Pool
//!
//! Growable slot array for objects that are spawned and killed every few
//! frames: monsters, projectiles, pickups, floating numbers.
//!
//! Killing never removes anything. The slot keeps its (Dead) record and its
//! index goes onto a min-heap of free slots, so the next spawn reuses the
//! lowest free index in O(log n) instead of rescanning for tombstones.
//! Storage is released only when the pool is dropped.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::ecs::EntityHandle;

/// Default number of slots reserved whenever the pool has to grow.
pub const DEFAULT_GROWTH_CHUNK: usize = 256;

/// A record that can live in a [`Pool`].
pub trait Poolable {
    /// Returns true while the record is alive.
    fn is_alive(&self) -> bool;

    /// Turns the record into a tombstone.
    fn mark_dead(&mut self);
}

/// A growable pool with tombstone recycling.
///
/// # Thread Safety
///
/// A pool is owned by one thread at a time. Parallel jobs either receive the
/// whole pool mutably or disjoint slices of [`Pool::slots_mut`]; slots
/// killed through a slice are handed back with [`Pool::reclaim`].
///
/// # Example
///
/// ```rust,ignore
/// let mut pool: Pool<Projectile> = Pool::new();
///
/// let handle = pool.spawn(projectile);
/// pool.kill(handle.slot());
///
/// // Reuses the same slot, with a new generation
/// let again = pool.spawn(projectile);
/// assert_eq!(handle.index(), again.index());
/// ```
#[derive(Clone, Debug)]
pub struct Pool<T> {
    /// The slot array. Dead records stay in place.
    slots: Vec<T>,
    /// Generation of each slot, bumped on every reuse.
    generations: Vec<u32>,
    /// Whether a slot's index is currently in `free`.
    queued: Vec<bool>,
    /// Free slot indices, lowest first.
    free: BinaryHeap<Reverse<u32>>,
    /// Number of living records.
    alive: usize,
    /// Reservation step when the slot array is full.
    growth_chunk: usize,
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Poolable> Pool<T> {
    /// Creates an empty pool with the default growth chunk.
    #[must_use]
    pub fn new() -> Self {
        Self::with_growth_chunk(DEFAULT_GROWTH_CHUNK)
    }

    /// Creates an empty pool that reserves `growth_chunk` slots at a time.
    #[must_use]
    pub fn with_growth_chunk(growth_chunk: usize) -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            queued: Vec::new(),
            free: BinaryHeap::new(),
            alive: 0,
            growth_chunk: growth_chunk.max(1),
        }
    }

    /// Number of slots (alive and dead). Never decreases.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true when no slot was ever spawned.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of living records.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive
    }

    /// Number of Dead slots waiting for reuse.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Reserved capacity of the slot array.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Spawns a record into the lowest free Dead slot, or appends one.
    ///
    /// Appending reserves `growth_chunk` slots at once when the array is
    /// full. Handles issued earlier stay valid across growth. A record that
    /// is already Dead takes a slot but is queued for reuse straight away.
    pub fn spawn(&mut self, value: T) -> EntityHandle {
        let handle = self.place(value);
        self.alive += 1;
        self.reclaim(handle.slot());
        handle
    }

    fn place(&mut self, value: T) -> EntityHandle {
        if let Some(Reverse(index)) = self.free.pop() {
            let slot = index as usize;
            self.queued[slot] = false;
            self.generations[slot] = self.generations[slot].wrapping_add(1);
            self.slots[slot] = value;
            return EntityHandle::new(index, self.generations[slot]);
        }

        if self.slots.len() == self.slots.capacity() {
            self.slots.reserve(self.growth_chunk);
            self.generations.reserve(self.growth_chunk);
            self.queued.reserve(self.growth_chunk);
        }

        let index = self.slots.len() as u32;
        self.slots.push(value);
        self.generations.push(0);
        self.queued.push(false);
        EntityHandle::new(index, 0)
    }

    /// Kills the record at `index` and makes its slot reusable.
    ///
    /// Returns false if the index is out of bounds or already dead, so a
    /// double kill is a no-op.
    pub fn kill(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_alive() => {
                slot.mark_dead();
                self.reclaim(index)
            }
            _ => false,
        }
    }

    /// Recycles a slot that was marked Dead through [`Pool::slots_mut`].
    ///
    /// Returns true if the slot was newly queued for reuse. Living slots and
    /// slots already queued are left untouched.
    pub fn reclaim(&mut self, index: usize) -> bool {
        let Some(slot) = self.slots.get(index) else {
            return false;
        };
        if slot.is_alive() || self.queued[index] {
            return false;
        }
        self.queued[index] = true;
        self.free.push(Reverse(index as u32));
        self.alive -= 1;
        true
    }

    /// Gets a living record by handle. Stale or dead handles yield `None`.
    #[must_use]
    pub fn get(&self, handle: EntityHandle) -> Option<&T> {
        let index = handle.slot();
        if self.generations.get(index) != Some(&handle.generation()) {
            return None;
        }
        self.slots.get(index).filter(|slot| slot.is_alive())
    }

    /// Gets a living record mutably by handle.
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut T> {
        let index = handle.slot();
        if self.generations.get(index) != Some(&handle.generation()) {
            return None;
        }
        self.slots.get_mut(index).filter(|slot| slot.is_alive())
    }

    /// All slots, alive and dead, in storage order.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    /// All slots mutably, for partitioned parallel updates.
    ///
    /// Records killed through this slice must be handed back with
    /// [`Pool::reclaim`] before the next spawn.
    #[inline]
    pub fn slots_mut(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Lazy traversal of living records with their slot index.
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_alive())
    }

    /// Lazy mutable traversal of living records with their slot index.
    pub fn iter_alive_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.is_alive())
    }

    /// Calls `f` for every living record, in storage order.
    pub fn for_each_alive(&self, mut f: impl FnMut(usize, &T)) {
        for (index, slot) in self.iter_alive() {
            f(index, slot);
        }
    }
}
