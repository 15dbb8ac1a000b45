//! Glass-tile bridge
//!
//! Pairs of tiles side by side; in each pair one holds and one shatters the
//! first time the egg comes down on it. Landing on a safe tile never measures
//! fall damage: dropping through a bad tile is the failure here.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Landing, LandingProbe, LandingResolver, Surface};
use super::hitbox::TableHitbox;

/// Placement of the glass bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassBridgeLayout {
    /// Center of the first row, at ground level
    pub start: Vec3,
    /// Height of the glass surface
    pub height: f32,
    pub rows: usize,
    /// Distance between rows along X
    pub row_step: f32,
    /// Offset of each tile from the bridge's center line along Z
    pub spread_z: f32,
    pub tile_half: f32,
    /// Vertical slack for catching the egg at bridge level
    pub slack: f32,
    /// Per row, whether the +Z tile is the safe one; `None` rolls each row
    pub right_safe: Option<Vec<bool>>,
}

impl Default for GlassBridgeLayout {
    fn default() -> Self {
        Self {
            start: Vec3::new(25.0, 0.0, 0.0),
            height: 2.85,
            rows: 8,
            row_step: 2.0,
            spread_z: 0.9,
            tile_half: 0.5,
            slack: 0.2,
            // First half safe on the right, second half on the left
            right_safe: Some(vec![true, true, true, true, false, false, false, false]),
        }
    }
}

/// A single glass tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlassTile {
    pub position: Vec3,
    pub is_safe: bool,
    pub is_broken: bool,
    pub hitbox: TableHitbox,
}

#[derive(Debug, Clone)]
pub struct GlassBridge {
    pub tiles: Vec<GlassTile>,
    pub y_level: f32,
    slack: f32,
    /// Tile that shattered during the last landing attempt
    last_broken: Option<usize>,
}

impl GlassBridge {
    pub fn new(layout: &GlassBridgeLayout, rng: &mut impl Rng) -> Self {
        let mut tiles = Vec::with_capacity(layout.rows * 2);
        for row in 0..layout.rows {
            let right_safe = match &layout.right_safe {
                Some(pattern) => pattern.get(row).copied().unwrap_or(true),
                None => rng.random_bool(0.5),
            };
            let x_offset = row as f32 * layout.row_step;
            for (side, is_safe) in [(-1.0, !right_safe), (1.0, right_safe)] {
                let position = layout.start + Vec3::new(x_offset, 0.0, side * layout.spread_z);
                tiles.push(GlassTile {
                    position,
                    is_safe,
                    is_broken: false,
                    hitbox: TableHitbox::centered(
                        Vec3::new(position.x, layout.height, position.z),
                        layout.tile_half,
                    ),
                });
            }
        }
        Self {
            tiles,
            y_level: layout.height,
            slack: layout.slack,
            last_broken: None,
        }
    }

    /// Index of the tile that shattered on the last attempt, if any
    pub fn take_broken(&mut self) -> Option<usize> {
        self.last_broken.take()
    }

    /// Restore every tile
    pub fn reset(&mut self) {
        for tile in &mut self.tiles {
            tile.is_broken = false;
        }
        self.last_broken = None;
    }

    /// Whether the probe is at bridge level and not rising
    fn at_bridge_level(&self, probe: &LandingProbe) -> bool {
        probe.position.y >= self.y_level + probe.half_height - self.slack
            && probe.foot_y() <= self.y_level + self.slack
            && probe.velocity_y <= 0.0
    }
}

impl LandingResolver for GlassBridge {
    fn try_land(&mut self, probe: &LandingProbe) -> Option<Landing> {
        if !self.at_bridge_level(probe) {
            return None;
        }
        let (index, tile) = self
            .tiles
            .iter_mut()
            .enumerate()
            .find(|(_, t)| !t.is_broken && t.hitbox.contains_xz(probe.position))?;

        if tile.is_safe {
            return Some(Landing::rest(
                Surface::GlassTile(index),
                probe.rest_on(self.y_level),
                false,
            ));
        }

        tile.is_broken = true;
        self.last_broken = Some(index);
        log::debug!("Glass tile {index} shattered at {:?}", tile.position);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bridge() -> GlassBridge {
        let mut rng = Pcg32::seed_from_u64(7);
        GlassBridge::new(&GlassBridgeLayout::default(), &mut rng)
    }

    fn probe(x: f32, z: f32, y: f32, vel: f32) -> LandingProbe {
        LandingProbe {
            position: Vec3::new(x, y, z),
            old_y: y + 0.01,
            velocity_y: vel,
            half_height: 0.7,
        }
    }

    #[test]
    fn test_layout_pairs_tiles() {
        let b = bridge();
        assert_eq!(b.tiles.len(), 16);
        // Row 0: left unsafe, right safe
        assert!(!b.tiles[0].is_safe);
        assert!(b.tiles[1].is_safe);
        assert!(b.tiles[0].position.z < 0.0);
        // Row 4 flips
        assert!(b.tiles[8].is_safe);
        assert!(!b.tiles[9].is_safe);
        // Exactly one safe tile per row
        for pair in b.tiles.chunks(2) {
            assert!(pair[0].is_safe != pair[1].is_safe);
        }
    }

    #[test]
    fn test_safe_tile_holds() {
        let mut b = bridge();
        let landing = b.try_land(&probe(25.0, 0.9, 3.5, -1.0)).unwrap();
        assert_eq!(landing.surface, Surface::GlassTile(1));
        assert!((landing.center_y - 3.55).abs() < 1e-5);
        assert!(!landing.fall_damage);
    }

    #[test]
    fn test_unsafe_tile_breaks_once() {
        let mut b = bridge();
        assert!(b.try_land(&probe(25.0, -0.9, 3.5, -1.0)).is_none());
        assert!(b.tiles[0].is_broken);
        assert_eq!(b.take_broken(), Some(0));
        // Broken tiles are ignored afterwards
        assert!(b.try_land(&probe(25.0, -0.9, 3.5, -1.0)).is_none());
        assert_eq!(b.take_broken(), None);
        b.reset();
        assert!(b.tiles.iter().all(|t| !t.is_broken));
    }

    #[test]
    fn test_rising_egg_passes_through() {
        let mut b = bridge();
        assert!(b.try_land(&probe(25.0, -0.9, 3.5, 2.0)).is_none());
        assert!(!b.tiles[0].is_broken);
    }

    #[test]
    fn test_random_pattern_has_one_safe_per_row() {
        let layout = GlassBridgeLayout {
            right_safe: None,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(99);
        let b = GlassBridge::new(&layout, &mut rng);
        for pair in b.tiles.chunks(2) {
            assert!(pair[0].is_safe != pair[1].is_safe);
        }
    }
}
