//! Viewport-derived sizes and speeds
//!
//! All gameplay distances are in pixels at the current tile size. The base
//! profile describes the game at a 60px tile; everything scales linearly
//! from there.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Fixed reference values that every derived value is scaled from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingProfile {
    pub base_tile: f32,
    pub player_speed: f32,
    pub shark_speed: f32,
    pub player_hitbox: f32,
    pub shark_hitbox: f32,
    pub displacement_scale: f32,
    pub min_tile: f32,
    pub max_tile: f32,
}

impl Default for ScalingProfile {
    fn default() -> Self {
        Self {
            base_tile: BASE_TILE,
            player_speed: BASE_PLAYER_SPEED,
            shark_speed: BASE_SHARK_SPEED,
            player_hitbox: BASE_PLAYER_HITBOX,
            shark_hitbox: BASE_SHARK_HITBOX,
            displacement_scale: BASE_DISPLACEMENT_SCALE,
            min_tile: MIN_TILE,
            max_tile: MAX_TILE,
        }
    }
}

/// Derived per-viewport values consumed by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scaling {
    pub tile_size: f32,
    /// Pixels per tick
    pub player_speed: f32,
    /// Pixels per tick
    pub shark_speed: f32,
    pub player_hitbox: f32,
    pub shark_hitbox: f32,
    /// Strength of the water displacement effect (render only)
    pub displacement_scale: f32,
}

impl Default for Scaling {
    fn default() -> Self {
        Self::from_tile_size(&ScalingProfile::default(), BASE_TILE)
    }
}

fn whole_px(size: f32, tile_size: f32) -> f32 {
    size.round().min(tile_size.floor()).max(1.0)
}

impl Scaling {
    /// Derive everything from an explicit tile size (clamped)
    pub fn from_tile_size(profile: &ScalingProfile, tile_size: f32) -> Self {
        let tile_size = if tile_size.is_finite() {
            tile_size.clamp(profile.min_tile, profile.max_tile)
        } else {
            profile.min_tile
        };
        let scale = tile_size / profile.base_tile;

        Self {
            tile_size,
            player_speed: profile.player_speed * scale,
            shark_speed: profile.shark_speed * scale,
            // Whole-pixel hitboxes, never zero and never wider than a tile
            player_hitbox: whole_px(profile.player_hitbox * scale, tile_size),
            shark_hitbox: whole_px(profile.shark_hitbox * scale, tile_size),
            displacement_scale: profile.displacement_scale * scale,
        }
    }

    /// Largest tile such that the whole grid fits the viewport
    pub fn from_viewport(
        profile: &ScalingProfile,
        width: f32,
        height: f32,
        cols: usize,
        rows: usize,
    ) -> Self {
        // Degenerate viewports (zero, negative, NaN) fall back to the minimum tile
        if !(width > 0.0 && height > 0.0) {
            return Self::from_tile_size(profile, profile.min_tile);
        }
        let cols = cols.max(1) as f32;
        let rows = rows.max(1) as f32;
        let raw = (width / cols).min(height / rows);
        Self::from_tile_size(profile, raw)
    }

    /// Inset between the tile-sized sprite box and the player hitbox
    #[inline]
    pub fn player_pad(&self) -> f32 {
        (self.tile_size - self.player_hitbox) / 2.0
    }

    /// Inset between the tile-sized sprite box and the shark hitbox
    #[inline]
    pub fn shark_pad(&self) -> f32 {
        (self.tile_size - self.shark_hitbox) / 2.0
    }

    /// Pixel size of a cols x rows board
    pub fn board_size(&self, cols: usize, rows: usize) -> Vec2 {
        Vec2::new(cols as f32, rows as f32) * self.tile_size
    }
}
