//! # Pool Handles
//!
//! What `Pool::spawn` hands back. A handle names one occupancy of one slot:
//! once the slot is killed and refilled, the old handle stops resolving.

use std::fmt;

/// Names a pooled record by slot and occupancy.
///
/// Packed as `generation << 32 | slot`. The generation is bumped every time
/// a Dead slot is refilled, so lookups through an outdated handle miss
/// instead of reaching the newcomer. Growing the pool leaves handles alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityHandle(u64);

impl EntityHandle {
    /// Handle that never resolves.
    pub const NULL: Self = Self(u64::MAX);

    /// Packs a slot and its occupancy count.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Slot in the pool's storage.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Slot as a storage offset.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        self.index() as usize
    }

    /// How many times the slot was refilled before this handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// True for [`EntityHandle::NULL`].
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "slot#null")
        } else {
            write!(f, "slot#{}v{}", self.index(), self.generation())
        }
    }
}

impl Default for EntityHandle {
    fn default() -> Self {
        Self::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_parts() {
        let handle = EntityHandle::new(12345, 67890);
        assert_eq!(handle.index(), 12345);
        assert_eq!(handle.generation(), 67890);
        assert!(!handle.is_null());
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityHandle::new(7, 2).to_string(), "slot#7v2");
        assert_eq!(EntityHandle::NULL.to_string(), "slot#null");
        assert_eq!(EntityHandle::new(7, 2).slot(), 7);
    }

    #[test]
    fn test_default_is_null() {
        assert!(EntityHandle::default().is_null());
    }
}
