//! Walled maze on the upper level, built from a text map

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{Landing, LandingProbe, LandingResolver, Slab, Surface};
use super::hitbox::{LandingWindow, TableHitbox};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeLayout {
    /// Center of the wall block at row 0, column 0 (base height)
    pub start: Vec3,
    pub block_size: f32,
    /// One string per row; any non-space character is a wall block
    pub rows: Vec<String>,
    /// Horizontal radius of the egg against walls
    pub player_radius: f32,
    /// Walls apply from `start.y - below` to `start.y + above`
    pub band_below: f32,
    pub band_above: f32,
    pub floor: TableHitbox,
}

impl Default for MazeLayout {
    fn default() -> Self {
        let rows = [
            "bbbbbbbb b",
            "b   rrrr b",
            "b     rr b",
            "b wwwwww b",
            "b     rr b",
            "bwwrr    b",
            "b      rrb",
            "br rrrrrrb",
            "br       b",
            "bbbbbb bbb",
        ];
        Self {
            start: Vec3::new(11.0, 15.0, 7.0),
            block_size: 2.0,
            rows: rows.iter().map(|r| r.to_string()).collect(),
            player_radius: 0.4,
            band_below: 1.0,
            band_above: 6.0,
            floor: TableHitbox::new(10.0, 30.0, 6.0, 26.0, 15.0),
        }
    }
}

/// Center of one wall block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MazeWall {
    pub x: f32,
    pub z: f32,
}

#[derive(Debug, Clone)]
pub struct Maze {
    pub walls: Vec<MazeWall>,
    pub floor: Slab,
    start: Vec3,
    half_block: f32,
    player_radius: f32,
    band_below: f32,
    band_above: f32,
}

impl Maze {
    pub fn new(layout: &MazeLayout) -> Self {
        let walls = layout
            .rows
            .iter()
            .enumerate()
            .flat_map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .filter(|(_, c)| *c != ' ')
                    .map(move |(col, _)| MazeWall {
                        x: layout.start.x + col as f32 * layout.block_size,
                        z: layout.start.z + row as f32 * layout.block_size,
                    })
            })
            .collect::<Vec<_>>();
        log::debug!("Maze built with {} wall blocks", walls.len());
        Self {
            walls,
            floor: Slab::new("maze_floor", layout.floor, LandingWindow::TABLE),
            start: layout.start,
            half_block: layout.block_size * 0.5,
            player_radius: layout.player_radius,
            band_below: layout.band_below,
            band_above: layout.band_above,
        }
    }

    /// Undo the XZ move if the egg overlaps any wall; returns true if reverted
    pub fn push_out(&self, current: &mut Vec3, previous: Vec3) -> bool {
        if current.y < self.start.y - self.band_below || current.y > self.start.y + self.band_above
        {
            return false;
        }
        let reach = self.half_block + self.player_radius;
        let blocked = self
            .walls
            .iter()
            .any(|w| (current.x - w.x).abs() < reach && (current.z - w.z).abs() < reach);
        if blocked {
            current.x = previous.x;
            current.z = previous.z;
        }
        blocked
    }
}

impl LandingResolver for Maze {
    fn try_land(&mut self, probe: &LandingProbe) -> Option<Landing> {
        self.floor
            .catch(probe)
            .map(|rest_y| Landing::rest(Surface::MazeFloor, rest_y, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_walls() {
        let maze = Maze::new(&MazeLayout::default());
        let expected: usize = MazeLayout::default()
            .rows
            .iter()
            .map(|r| r.chars().filter(|c| *c != ' ').count())
            .sum();
        assert_eq!(maze.walls.len(), expected);
        assert_eq!(maze.walls[0], MazeWall { x: 11.0, z: 7.0 });
    }

    #[test]
    fn test_wall_reverts_move() {
        let maze = Maze::new(&MazeLayout::default());
        // Row 1 col 1 is open; walking into the block at row 0 col 1
        let previous = Vec3::new(13.0, 15.7, 9.0);
        let mut current = Vec3::new(13.0, 15.7, 8.3);
        assert!(maze.push_out(&mut current, previous));
        assert_eq!(current, previous);
    }

    #[test]
    fn test_open_cell_is_free() {
        let maze = Maze::new(&MazeLayout::default());
        let previous = Vec3::new(13.0, 15.7, 9.0);
        let mut current = Vec3::new(13.5, 15.7, 9.0);
        assert!(!maze.push_out(&mut current, previous));
        assert_eq!(current.x, 13.5);
    }

    #[test]
    fn test_walls_ignored_below_band() {
        let maze = Maze::new(&MazeLayout::default());
        let previous = Vec3::new(11.0, 0.7, 5.0);
        let mut current = Vec3::new(11.0, 0.7, 7.0);
        assert!(!maze.push_out(&mut current, previous));
    }

    #[test]
    fn test_floor_landing_skips_damage() {
        let mut maze = Maze::new(&MazeLayout::default());
        let probe = LandingProbe {
            position: Vec3::new(15.0, 15.65, 15.0),
            old_y: 15.75,
            velocity_y: -1.0,
            half_height: 0.7,
        };
        let landing = maze.try_land(&probe).unwrap();
        assert_eq!(landing.surface, Surface::MazeFloor);
        assert!(!landing.fall_damage);
        assert!((landing.center_y - 15.7).abs() < 1e-5);
    }
}
