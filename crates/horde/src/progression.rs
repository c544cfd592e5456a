//! # Player Progression
//!
//! Experience accumulates for the whole run and is never reset. Each check
//! raises the level by at most one:
//!
//! ```text
//! required_experience(level) = floor(base * level ^ exponent)
//! ```

use horde_core::Player;

use crate::config::LevelingConfig;

/// Experience threshold of `level` on the configured curve.
#[must_use]
pub fn required_experience(level: u32, curve: &LevelingConfig) -> u32 {
    let needed = f64::from(curve.base) * f64::from(level).powf(f64::from(curve.exponent));
    if needed >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        needed.floor() as u32
    }
}

/// Raises the player one level if the experience covers the threshold.
///
/// Returns true on level-up.
pub fn check_level_up(player: &mut Player, curve: &LevelingConfig) -> bool {
    if player.experience >= required_experience(player.level, curve) as f32 {
        player.level = player.level.saturating_add(1);
        true
    } else {
        false
    }
}

/// Adds experience and runs the level-up check.
///
/// Returns true on level-up.
pub fn award_experience(player: &mut Player, amount: f32, curve: &LevelingConfig) -> bool {
    player.experience += amount;
    check_level_up(player, curve)
}
