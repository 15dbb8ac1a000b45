//! Wind bridge: a grid of tiles that give way after being stood on, under a
//! gusting wind that pushes the egg sideways
//!
//! Tiles are tracked by a stand timer that climbs while the egg stands on them
//! and decays at half rate otherwise. Falling well below the bridge while
//! still over it is a crash of its own, separate from fall damage.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Landing, LandingProbe, LandingResolver, Surface};
use super::hitbox::TableHitbox;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindBridgeLayout {
    /// Center of the near edge at deck height
    pub position: Vec3,
    pub columns: usize,
    pub rows: usize,
    pub tile_size: f32,
    /// Tile hitbox half-size as a fraction of `tile_size`
    pub tile_extent: f32,
    /// Tile surface above `position.y`
    pub tile_top_offset: f32,
    /// Rows at the far end marked as finish tiles
    pub end_rows: usize,
    /// Seconds of standing before a tile gives way
    pub stand_time: f32,
    /// Seconds between gusts
    pub gust_interval: f32,
    pub min_wind: f32,
    /// Gust strength above `min_wind`
    pub max_extra_wind: f32,
    /// Wind multiplier while standing on a tile
    pub standing_wind_factor: f32,
    /// Center may sit this far under the deck and still be over the bridge
    pub bridge_depth: f32,
    /// Falling this far under the deck is a crash
    pub fall_limit: f32,
    /// Vertical band for counting a tile as stood on
    pub stand_band: f32,
    /// Vertical band for landing on a tile
    pub catch_band: f32,
    /// Crossing this many rows reaches the finish
    pub exit_row: usize,
    /// Where the egg is sent once across
    pub exit_target: Vec3,
}

impl Default for WindBridgeLayout {
    fn default() -> Self {
        Self {
            position: Vec3::new(-46.0, 24.3, 58.0),
            columns: 10,
            rows: 30,
            tile_size: 2.0,
            tile_extent: 0.4,
            tile_top_offset: 0.5,
            end_rows: 3,
            stand_time: 3.0,
            gust_interval: 3.5,
            min_wind: 1.2,
            max_extra_wind: 2.8,
            standing_wind_factor: 0.4,
            bridge_depth: 3.0,
            fall_limit: 8.0,
            stand_band: 0.6,
            catch_band: 0.5,
            exit_row: 27,
            exit_target: Vec3::new(0.0, 24.3 + 1.0, 125.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindTile {
    pub position: Vec3,
    pub active: bool,
    pub stand_timer: f32,
    pub hitbox: TableHitbox,
    /// One of the finish rows
    pub is_end_tile: bool,
}

#[derive(Debug, Clone)]
pub struct WindBridge {
    pub layout: WindBridgeLayout,
    pub tiles: Vec<WindTile>,
    /// Current gust, in XZ
    pub wind: Vec2,
    pub bounds: TableHitbox,
    pub player_on_bridge: bool,
    gust_timer: f32,
    /// Set by the last landing claim
    standing: bool,
}

impl WindBridge {
    pub fn new(layout: WindBridgeLayout) -> Self {
        let width = layout.columns as f32 * layout.tile_size;
        let length = layout.rows as f32 * layout.tile_size;
        let start_x = layout.position.x - width * 0.5;
        let start_z = layout.position.z;
        let half = layout.tile_size * layout.tile_extent;

        let mut tiles = Vec::with_capacity(layout.columns * layout.rows);
        for col in 0..layout.columns {
            for row in 0..layout.rows {
                let position = Vec3::new(
                    start_x + col as f32 * layout.tile_size + layout.tile_size * 0.5,
                    layout.position.y,
                    start_z + row as f32 * layout.tile_size + layout.tile_size * 0.5,
                );
                tiles.push(WindTile {
                    position,
                    active: true,
                    stand_timer: 0.0,
                    hitbox: TableHitbox::centered(
                        position + Vec3::Y * layout.tile_top_offset,
                        half,
                    ),
                    is_end_tile: row + layout.end_rows >= layout.rows,
                });
            }
        }

        Self {
            layout,
            tiles,
            wind: Vec2::ZERO,
            bounds: TableHitbox::new(
                start_x,
                start_x + width,
                start_z,
                start_z + length,
                layout.position.y + layout.tile_top_offset,
            ),
            player_on_bridge: false,
            gust_timer: 0.0,
            standing: false,
        }
    }

    /// Roll gusts, track whether the egg is over the bridge, age stood-on tiles
    pub fn update(&mut self, dt: f32, p: Vec3, half_height: f32, rng: &mut impl Rng) {
        self.gust_timer += dt;
        if self.gust_timer >= self.layout.gust_interval {
            let angle = rng.random::<f32>() * TAU;
            let strength = self.layout.min_wind + rng.random::<f32>() * self.layout.max_extra_wind;
            self.wind = Vec2::from_angle(angle) * strength;
            self.gust_timer = 0.0;
            log::trace!("Wind gust {:?}", self.wind);
        }

        // Once over the bridge, stay flagged while inside its footprint
        let over = self.bounds.covers_xz(p);
        let near_deck = p.y >= self.bounds.top_y - self.layout.bridge_depth;
        self.player_on_bridge = over && (near_deck || self.player_on_bridge);
        if !self.player_on_bridge {
            return;
        }

        let stand_band = self.layout.stand_band;
        let stand_time = self.layout.stand_time;
        for (i, tile) in self.tiles.iter_mut().enumerate().filter(|(_, t)| t.active) {
            let on_tile = tile.hitbox.covers_xz(p)
                && (p.y - (tile.hitbox.top_y + half_height)).abs() < stand_band;
            if on_tile {
                tile.stand_timer += dt;
                if tile.stand_timer >= stand_time {
                    tile.active = false;
                    log::debug!("Wind tile {i} gave way");
                }
            } else {
                tile.stand_timer = (tile.stand_timer - dt * 0.5).max(0.0);
            }
        }
    }

    /// Push the egg with the current gust; weaker while standing on a tile
    pub fn drift(&self, p: &mut Vec3, dt: f32, standing_on_tile: bool) {
        if !self.player_on_bridge {
            return;
        }
        let factor = if standing_on_tile {
            self.layout.standing_wind_factor
        } else {
            1.0
        };
        let push = self.wind * dt * factor;
        p.x += push.x;
        p.z += push.y;
    }

    /// Whether the egg has dropped out from under the bridge
    pub fn player_fell(&self, p: Vec3) -> bool {
        self.player_on_bridge && p.y < self.bounds.top_y - self.layout.fall_limit
    }

    /// Whether the egg has crossed the finish line while on the bridge
    pub fn crossed_exit(&self, p: Vec3) -> bool {
        self.player_on_bridge
            && self.bounds.covers_xz(p)
            && p.z >= self.layout.position.z + self.layout.exit_row as f32 * self.layout.tile_size
    }

    /// Whether the last landing claim was on a wind tile
    pub fn take_standing(&mut self) -> bool {
        std::mem::take(&mut self.standing)
    }

    /// Reactivate every tile and calm the wind
    pub fn reset(&mut self) {
        for tile in &mut self.tiles {
            tile.active = true;
            tile.stand_timer = 0.0;
        }
        self.wind = Vec2::ZERO;
        self.gust_timer = 0.0;
        self.player_on_bridge = false;
        self.standing = false;
    }
}

impl LandingResolver for WindBridge {
    fn try_land(&mut self, probe: &LandingProbe) -> Option<Landing> {
        self.standing = false;
        if probe.velocity_y > 0.0 {
            return None;
        }
        let band = self.layout.catch_band;
        let (index, rest_y) = self.tiles.iter().enumerate().find_map(|(i, t)| {
            let rest_y = probe.rest_on(t.hitbox.top_y);
            (t.active
                && t.hitbox.covers_xz(probe.position)
                && (probe.position.y - rest_y).abs() <= band)
                .then_some((i, rest_y))
        })?;
        self.standing = true;
        Some(Landing::rest(Surface::WindTile(index), rest_y, false))
    }
}
