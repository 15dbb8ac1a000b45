//! Course layout: where every obstacle sits
//!
//! The shipped course is the `Default`. A JSON file can replace any part of it;
//! sections left out keep their defaults.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{BlockingBox, Ground, Ramp, Slab};
use super::gauntlet::GauntletLayout;
use super::glass_bridge::GlassBridgeLayout;
use super::hazard::BallLaneLayout;
use super::hitbox::{LandingWindow, RampHitbox, TableHitbox};
use super::ladder::Ladder;
use super::maze::MazeLayout;
use super::platform::PlatformPath;
use super::trampoline::Trampoline;
use super::wind_bridge::WindBridgeLayout;
use super::win_zone::WinZoneLayout;
use crate::consts::SPAWN_POSITION;

/// Height the pillow and barriers start blocking from
const UPPER_LEVEL_Y: f32 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseLayout {
    /// Where each attempt starts
    pub spawn: Vec3,
    /// Tables on the ground floor; each also blocks walking into its sides
    pub tables: Vec<TableHitbox>,
    pub table_window: LandingWindow,
    pub ramp: Ramp,
    pub platforms: Vec<PlatformPath>,
    pub glass_bridge: GlassBridgeLayout,
    pub trampoline: Trampoline,
    /// Named slabs that reset the watermark without a damage check
    pub safe_zones: Vec<Slab>,
    /// Extra side blockers besides the tables and the ramp rail
    pub blockers: Vec<BlockingBox>,
    pub ladder: Ladder,
    pub maze: MazeLayout,
    pub gauntlet: GauntletLayout,
    pub balls: BallLaneLayout,
    pub wind_bridge: WindBridgeLayout,
    pub win_zone: WinZoneLayout,
    pub ground: Ground,
}

impl Default for CourseLayout {
    fn default() -> Self {
        let mid_safe_zone = TableHitbox::new(43.0, 47.0, -2.0, 2.0, 15.0);
        let ladder_pillow = TableHitbox::new(-40.5, 28.0, 27.8, 33.0, 22.9);
        let barrier_back = TableHitbox::new(-40.5, 28.0, 28.1, 28.5, 23.6);
        let barrier_front = TableHitbox::new(-40.5, 28.0, 31.6, 32.0, 23.6);

        Self {
            spawn: SPAWN_POSITION,
            tables: vec![
                TableHitbox::new(-2.8, -1.2, -0.8, 0.8, 0.68),
                TableHitbox::new(-0.8, 0.8, -0.8, 0.8, 1.45),
                TableHitbox::new(1.7, 3.3, -0.8, 0.8, 1.45),
                TableHitbox::new(4.2, 5.8, -2.3, -0.7, 1.45),
                TableHitbox::new(6.7, 8.3, 0.7, 2.3, 1.45),
                TableHitbox::new(9.2, 10.8, -2.3, -0.7, 1.45),
                TableHitbox::new(11.7, 13.3, 0.7, 2.3, 1.45),
                TableHitbox::new(14.2, 15.8, -2.3, -0.7, 1.45),
                TableHitbox::new(17.2, 18.8, -0.8, 0.8, 1.45),
                TableHitbox::new(17.2, 18.8, 1.7, 3.3, 0.68),
            ],
            table_window: LandingWindow::TABLE,
            ramp: Ramp {
                hitbox: RampHitbox {
                    min_x: 20.0,
                    max_x: 24.0,
                    min_z: -1.2,
                    max_z: 1.2,
                    start_y: 2.05,
                    end_y: 2.85,
                },
                side_rail: TableHitbox::new(20.0, 24.0, -0.9, 0.9, 2.05),
                window: LandingWindow::RAMP,
            },
            platforms: vec![
                platform((39.0, 15.0, -4.5), (39.0, 15.0, 4.5), 2.5, 0.0, 1),
                platform((35.0, 15.0, -5.0), (35.0, 15.0, 5.0), 4.0, 0.2, -1),
                platform((31.0, 15.0, -6.0), (31.0, 15.0, 6.0), 3.0, 0.5, 1),
                platform((27.0, 15.0, -4.0), (27.0, 15.0, 4.0), 5.5, 0.8, -1),
            ],
            glass_bridge: GlassBridgeLayout::default(),
            trampoline: Trampoline::default(),
            safe_zones: vec![
                Slab::new("mid_safe_zone", mid_safe_zone, LandingWindow::SLAB),
                Slab::new("ladder_pillow", ladder_pillow, LandingWindow::SLAB),
                Slab::new("barrier_back", barrier_back, LandingWindow::SLAB),
                Slab::new("barrier_front", barrier_front, LandingWindow::SLAB),
            ],
            blockers: vec![
                BlockingBox::new(mid_safe_zone),
                BlockingBox::new(ladder_pillow).above(UPPER_LEVEL_Y),
                BlockingBox::new(barrier_back).above(UPPER_LEVEL_Y),
                BlockingBox::new(barrier_front).above(UPPER_LEVEL_Y),
            ],
            ladder: Ladder::default(),
            maze: MazeLayout::default(),
            gauntlet: GauntletLayout::default(),
            balls: BallLaneLayout::default(),
            wind_bridge: WindBridgeLayout::default(),
            win_zone: WinZoneLayout::default(),
            ground: Ground::default(),
        }
    }
}

fn platform(
    start: (f32, f32, f32),
    end: (f32, f32, f32),
    speed: f32,
    progress: f32,
    direction: i8,
) -> PlatformPath {
    PlatformPath {
        start: start.into(),
        end: end.into(),
        speed,
        progress,
        direction,
        half_extent: 1.5,
    }
}

impl CourseLayout {
    /// Parse a course from JSON; missing sections keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a course from a file, falling back to the shipped course on any failure
    pub fn load(path: &Path) -> Self {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| Self::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(course) => {
                log::info!("Loaded course from {}", path.display());
                course
            }
            Err(e) => {
                log::warn!("Could not load course {}: {e}; using the shipped course", path.display());
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
