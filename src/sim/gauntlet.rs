//! Gauntlet: walls sliding down a road, each with one good and one bad hole
//!
//! Walls wrap from the near end back to the far end. Touching a wall anywhere
//! except the good hole counts as a hit; a wall hits the egg at most once per
//! pass, so the damage does not depend on the tick rate.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::hitbox::TableHitbox;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GauntletLayout {
    /// Center of the road's near edge, at road surface height
    pub start: Vec3,
    pub road_length: f32,
    pub road_width: f32,
    pub wall_count: usize,
    /// Z of the first wall past `start`
    pub first_wall_offset: f32,
    pub wall_spacing: f32,
    pub wall_height: f32,
    pub hole_width: f32,
    pub mid_pillar_width: f32,
    /// Walls move toward `start` at this speed
    pub wall_speed: f32,
    /// Walls wrap once they get this close to `start`
    pub despawn_offset: f32,
    /// Half-depth of the Z band around a wall where contact is tested
    pub contact_depth: f32,
    /// Radius of the egg against the walls
    pub player_radius: f32,
}

impl Default for GauntletLayout {
    fn default() -> Self {
        Self {
            start: Vec3::new(-45.0, 23.6, 28.0),
            road_length: 30.0,
            road_width: 10.0,
            wall_count: 3,
            first_wall_offset: 6.0,
            wall_spacing: 8.0,
            wall_height: 5.0,
            hole_width: 1.2,
            mid_pillar_width: 1.2,
            wall_speed: 6.0,
            despawn_offset: 2.0,
            contact_depth: 0.5,
            player_radius: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GauntletWall {
    pub z: f32,
    /// Already hit the egg during this pass
    #[serde(skip)]
    struck: bool,
}

/// Where the egg is relative to a wall's openings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WallZone {
    GoodHole,
    BadHole,
    Solid,
}

#[derive(Debug, Clone)]
pub struct Gauntlet {
    pub layout: GauntletLayout,
    pub walls: Vec<GauntletWall>,
}

impl Gauntlet {
    pub fn new(layout: GauntletLayout) -> Self {
        let mut gauntlet = Self {
            layout,
            walls: Vec::new(),
        };
        gauntlet.reset();
        gauntlet
    }

    /// Flat road surface the walls slide along
    pub fn road_hitbox(&self) -> TableHitbox {
        let l = &self.layout;
        let half = l.road_width * 0.5;
        TableHitbox::new(
            l.start.x - half,
            l.start.x + half,
            l.start.z,
            l.start.z + l.road_length,
            l.start.y,
        )
    }

    pub fn update(&mut self, dt: f32) {
        let l = &self.layout;
        let despawn_z = l.start.z + l.despawn_offset;
        for wall in &mut self.walls {
            wall.z -= l.wall_speed * dt;
            if wall.z < despawn_z {
                wall.z = l.start.z + l.road_length + l.despawn_offset;
                wall.struck = false;
            }
        }
    }

    /// Test the egg (as a sphere of `radius`) against every wall
    ///
    /// Returns true when a wall newly hits it this tick.
    pub fn check_player(&mut self, p: Vec3, radius: f32) -> bool {
        let on_road = self.road_hitbox().contains_xz(p);
        let l = self.layout;
        let bottom_y = l.start.y;
        let top_y = l.start.y + l.wall_height;
        let mut hit = false;
        for wall in &mut self.walls {
            let near = on_road
                && (p.z - wall.z).abs() <= radius + l.contact_depth
                && p.y + radius >= bottom_y
                && p.y - radius <= top_y;
            if !near {
                wall.struck = false;
                continue;
            }
            if zone_at(&l, p.x - l.start.x) == WallZone::GoodHole || wall.struck {
                continue;
            }
            wall.struck = true;
            hit = true;
        }
        hit
    }

    pub fn reset(&mut self) {
        let l = &self.layout;
        self.walls = (0..l.wall_count)
            .map(|i| GauntletWall {
                z: l.start.z + l.first_wall_offset + i as f32 * l.wall_spacing,
                struck: false,
            })
            .collect();
    }
}

fn zone_at(l: &GauntletLayout, local_x: f32) -> WallZone {
    let hole_half = l.hole_width * 0.5;
    let offset = l.mid_pillar_width * 0.5 + hole_half;
    let in_hole = |center: f32| local_x > center - hole_half && local_x < center + hole_half;
    if in_hole(-offset) {
        WallZone::GoodHole
    } else if in_hole(offset) {
        WallZone::BadHole
    } else {
        WallZone::Solid
    }
}
