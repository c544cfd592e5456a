//! # Render Snapshot
//!
//! Flat per-sprite instance data for the rendering collaborator. The layout
//! is `#[repr(C)]` and [`Pod`], so the buffer can be uploaded as raw bytes
//! with `bytemuck::cast_slice`.
//!
//! Order: monsters, projectiles, pickups, number digits, then the player,
//! which is always the last instance.

use bytemuck::{Pod, Zeroable};
use horde_core::{Body, Effect, Monster, Number, Pickup, Player, Pool, Projectile, TINT_CRITICAL, TINT_NEUTRAL};

/// One sprite to draw.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// World position.
    pub position: [f32; 2],
    /// Uniform scale.
    pub scale: f32,
    /// Texture table index.
    pub sprite_index: u32,
    /// Effect tag (0 none, 1 hit, 2 critical).
    pub effect: u32,
    /// RGBA tint.
    pub tint: [f32; 4],
}

impl RenderInstance {
    fn from_body(body: &Body, tint: [f32; 4]) -> Self {
        Self {
            position: body.position.to_array(),
            scale: body.scale,
            sprite_index: body.sprite_index,
            effect: body.effect.tag(),
            tint,
        }
    }
}

/// The pools and player a snapshot is taken from.
pub struct RenderSource<'a> {
    /// Monsters.
    pub monsters: &'a Pool<Monster>,
    /// Projectiles.
    pub projectiles: &'a Pool<Projectile>,
    /// Pickups.
    pub pickups: &'a Pool<Pickup>,
    /// Floating numbers.
    pub numbers: &'a Pool<Number>,
    /// The player.
    pub player: &'a Player,
}

/// Replaces the contents of `out` with one instance per living sprite.
pub fn collect_instances(source: &RenderSource<'_>, out: &mut Vec<RenderInstance>) {
    out.clear();
    out.reserve(
        source.monsters.alive_count()
            + source.projectiles.alive_count()
            + source.pickups.alive_count()
            + source.numbers.alive_count() * 2
            + 1,
    );

    out.extend(
        source
            .monsters
            .iter_alive()
            .map(|(_, monster)| RenderInstance::from_body(&monster.body, monster.tint)),
    );
    out.extend(
        source
            .projectiles
            .iter_alive()
            .map(|(_, projectile)| RenderInstance::from_body(&projectile.body, TINT_NEUTRAL)),
    );
    out.extend(
        source
            .pickups
            .iter_alive()
            .map(|(_, pickup)| RenderInstance::from_body(&pickup.body, TINT_NEUTRAL)),
    );

    for (_, number) in source.numbers.iter_alive() {
        let tint = if number.body.effect == Effect::Critical {
            TINT_CRITICAL
        } else {
            TINT_NEUTRAL
        };
        let base = RenderInstance::from_body(&number.body, tint);
        out.extend(number.layout().map(|(digit, position)| RenderInstance {
            position: position.to_array(),
            sprite_index: base.sprite_index + u32::from(digit),
            ..base
        }));
    }

    out.push(RenderInstance::from_body(&source.player.body, TINT_NEUTRAL));
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_shared::Vec2;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), 36);
        let instances = [RenderInstance::default(); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 72);
    }

    #[test]
    fn test_digits_and_player_last() {
        let monsters = Pool::new();
        let projectiles = Pool::new();
        let pickups = Pool::new();
        let mut numbers: Pool<Number> = Pool::new();
        let mut player = Player::default();
        player.body.sprite_index = 99;

        let mut label = Number::default();
        label.body.sprite_index = 10;
        label.body.position = Vec2::new(1.0, 1.0);
        label.set_value(42);
        numbers.spawn(label);

        let source = RenderSource {
            monsters: &monsters,
            projectiles: &projectiles,
            pickups: &pickups,
            numbers: &numbers,
            player: &player,
        };
        let mut out = Vec::new();
        collect_instances(&source, &mut out);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].sprite_index, 14);
        assert_eq!(out[1].sprite_index, 12);
        assert_eq!(out[2].sprite_index, 99);
    }
}
