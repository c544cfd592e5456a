//! # Sound Cue Bus
//!
//! Fire-and-forget sound requests for the audio collaborator.
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │ Simulation  │─────>│  Cue        │─────>│   Audio     │
//! │ (after the  │      │  Channel    │      │  (plays by  │
//! │  barrier)   │      │  (bounded)  │      │   name)     │
//! └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! The simulation never waits for playback. A full channel drops the cue.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Named sound requests emitted by spawn and combat events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player fired a projectile.
    Laser,
    /// A monster took damage and survived.
    EnemyHit,
    /// A monster died.
    EnemyDeath,
    /// The player collected experience.
    PickupXp,
}

impl SoundCue {
    /// Name the audio collaborator keys its sound buffers by.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Laser => "laser",
            Self::EnemyHit => "enemyhit",
            Self::EnemyDeath => "enemydeath",
            Self::PickupXp => "pickupxp",
        }
    }
}

/// Bounded channel carrying [`SoundCue`]s.
pub struct CueBus {
    sender: Sender<SoundCue>,
    receiver: Receiver<SoundCue>,
}

impl CueBus {
    /// Creates a bus holding at most `capacity` undelivered cues.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> CueSender {
        CueSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> CueReceiver {
        CueReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

/// Handle for emitting cues.
#[derive(Clone)]
pub struct CueSender {
    sender: Sender<SoundCue>,
}

impl CueSender {
    /// Emits a cue without blocking.
    ///
    /// Returns `false` if the cue was dropped (channel full or no receiver).
    #[inline]
    pub fn send(&self, cue: SoundCue) -> bool {
        match self.sender.try_send(cue) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for the audio collaborator.
#[derive(Clone)]
pub struct CueReceiver {
    receiver: Receiver<SoundCue>,
}

impl CueReceiver {
    /// Takes every pending cue.
    #[must_use]
    pub fn drain(&self) -> Vec<SoundCue> {
        self.receiver.try_iter().collect()
    }

    /// Takes one pending cue, if any.
    #[inline]
    #[must_use]
    pub fn try_recv(&self) -> Option<SoundCue> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending cues.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_names() {
        assert_eq!(SoundCue::Laser.name(), "laser");
        assert_eq!(SoundCue::EnemyHit.name(), "enemyhit");
        assert_eq!(SoundCue::EnemyDeath.name(), "enemydeath");
        assert_eq!(SoundCue::PickupXp.name(), "pickupxp");
    }

    #[test]
    fn test_send_and_drain_in_order() {
        let bus = CueBus::new(8);
        let tx = bus.sender();
        let rx = bus.receiver();

        assert!(tx.send(SoundCue::Laser));
        assert!(tx.send(SoundCue::EnemyDeath));
        assert_eq!(rx.pending_count(), 2);
        assert_eq!(rx.drain(), vec![SoundCue::Laser, SoundCue::EnemyDeath]);
        assert!(rx.try_recv().is_none());
    }

    #[test]
    fn test_full_bus_drops_cues() {
        let bus = CueBus::new(1);
        let tx = bus.sender();

        assert!(tx.send(SoundCue::Laser));
        assert!(!tx.send(SoundCue::EnemyHit));
        assert_eq!(bus.receiver().drain(), vec![SoundCue::Laser]);
    }
}
