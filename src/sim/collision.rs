//! Collision detection and response for course obstacles
//!
//! Two contracts cover every obstacle:
//! - horizontal blocking: walking into the side of a box undoes the XZ move
//! - landing: a `LandingResolver` may claim the egg for this tick and say
//!   where it rests
//!
//! Landing resolvers are tried in a fixed priority order each tick; the first
//! claim wins and nothing below it is consulted.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::hitbox::{LandingWindow, RampHitbox, TableHitbox};

/// Everything a landing resolver gets to look at
#[derive(Debug, Clone, Copy)]
pub struct LandingProbe {
    /// Position after this tick's gravity step
    pub position: Vec3,
    /// Center height at the start of the tick
    pub old_y: f32,
    pub velocity_y: f32,
    pub half_height: f32,
}

impl LandingProbe {
    #[inline]
    pub fn foot_y(&self) -> f32 {
        self.position.y - self.half_height
    }

    #[inline]
    pub fn rest_on(&self, surface_y: f32) -> f32 {
        surface_y + self.half_height
    }
}

/// Which surface claimed the egg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Ladder,
    Platform(usize),
    Ramp,
    GlassTile(usize),
    Trampoline,
    SafeZone(usize),
    MazeFloor,
    Table(usize),
    Ground,
    WindTile(usize),
}

/// What the claimed surface does to vertical motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Support {
    /// Stand still on the surface
    Rest,
    /// Launch upward at the given velocity
    Bounce { velocity: f32 },
}

/// A resolver's claim on this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub surface: Surface,
    /// Center height to snap to
    pub center_y: f32,
    pub support: Support,
    /// Whether the fall that ended here is measured for damage
    pub fall_damage: bool,
    /// Displacement the surface carries the egg by this tick
    pub carry: Vec3,
}

impl Landing {
    pub fn rest(surface: Surface, center_y: f32, fall_damage: bool) -> Self {
        Self {
            surface,
            center_y,
            support: Support::Rest,
            fall_damage,
            carry: Vec3::ZERO,
        }
    }
}

/// One entry in the landing priority list
pub trait LandingResolver {
    /// Claim the egg for this tick, or pass
    fn try_land(&mut self, probe: &LandingProbe) -> Option<Landing>;
}

/// Undo the XZ part of a move that walked into the side of `hitbox`
///
/// Returns true when the move was reverted. Anything within `tolerance` of
/// the resting height (or above it) counts as on top and is never blocked.
pub fn block_horizontal(
    current: &mut Vec3,
    previous: Vec3,
    hitbox: &TableHitbox,
    half_height: f32,
    tolerance: f32,
) -> bool {
    let resting_center_y = hitbox.top_y + half_height;
    if current.y > resting_center_y - tolerance {
        return false;
    }
    if hitbox.contains_xz(*current) {
        current.x = previous.x;
        current.z = previous.z;
        return true;
    }
    false
}

/// A box that blocks horizontal movement into its sides
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockingBox {
    pub hitbox: TableHitbox,
    #[serde(default = "default_block_tolerance")]
    pub tolerance: f32,
    /// Only block while the egg is higher than this
    #[serde(default)]
    pub only_above: Option<f32>,
}

fn default_block_tolerance() -> f32 {
    BlockingBox::DEFAULT_TOLERANCE
}

impl BlockingBox {
    pub const DEFAULT_TOLERANCE: f32 = 0.05;

    pub fn new(hitbox: TableHitbox) -> Self {
        Self {
            hitbox,
            tolerance: Self::DEFAULT_TOLERANCE,
            only_above: None,
        }
    }

    pub fn above(mut self, y: f32) -> Self {
        self.only_above = Some(y);
        self
    }

    pub fn apply(&self, current: &mut Vec3, previous: Vec3, half_height: f32) -> bool {
        if self.only_above.is_some_and(|min_y| current.y <= min_y) {
            return false;
        }
        block_horizontal(current, previous, &self.hitbox, half_height, self.tolerance)
    }
}

/// A flat landing surface with its own capture window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slab {
    pub name: String,
    pub hitbox: TableHitbox,
    #[serde(default = "default_slab_window")]
    pub window: LandingWindow,
}

fn default_slab_window() -> LandingWindow {
    LandingWindow::SLAB
}

impl Slab {
    pub fn new(name: impl Into<String>, hitbox: TableHitbox, window: LandingWindow) -> Self {
        Self {
            name: name.into(),
            hitbox,
            window,
        }
    }

    /// Resting center height if the probe lands here
    pub fn catch(&self, probe: &LandingProbe) -> Option<f32> {
        let rest_y = probe.rest_on(self.hitbox.top_y);
        (self.hitbox.contains_xz(probe.position)
            && self
                .window
                .accepts(probe.old_y, probe.position.y, rest_y, probe.velocity_y))
        .then_some(rest_y)
    }
}

/// How a group of slabs reports its landings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlabKind {
    /// Fall damage applies
    Table,
    /// Watermark resets, no damage check
    SafeZone,
}

/// An ordered group of slabs; the first one that catches the egg wins
#[derive(Debug, Clone)]
pub struct SlabSet {
    pub kind: SlabKind,
    pub slabs: Vec<Slab>,
}

impl SlabSet {
    pub fn new(kind: SlabKind, slabs: Vec<Slab>) -> Self {
        Self { kind, slabs }
    }
}

impl LandingResolver for SlabSet {
    fn try_land(&mut self, probe: &LandingProbe) -> Option<Landing> {
        self.slabs.iter().enumerate().find_map(|(i, slab)| {
            slab.catch(probe).map(|rest_y| match self.kind {
                SlabKind::Table => Landing::rest(Surface::Table(i), rest_y, true),
                SlabKind::SafeZone => Landing::rest(Surface::SafeZone(i), rest_y, false),
            })
        })
    }
}

/// Sloped ramp; the surface height follows X continuously
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub hitbox: RampHitbox,
    /// Flat box fed to horizontal blocking so the egg cannot leak off the sides
    pub side_rail: TableHitbox,
    pub window: LandingWindow,
}

impl LandingResolver for Ramp {
    fn try_land(&mut self, probe: &LandingProbe) -> Option<Landing> {
        if !self.hitbox.contains_xz(probe.position) {
            return None;
        }
        let rest_y = probe.rest_on(self.hitbox.surface_at(probe.position.x));
        self.window
            .accepts(probe.old_y, probe.position.y, rest_y, probe.velocity_y)
            .then(|| Landing::rest(Surface::Ramp, rest_y, true))
    }
}

/// Infinite ground plane; the last resort under everything
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    pub height: f32,
    pub window: LandingWindow,
}

impl Default for Ground {
    fn default() -> Self {
        Self {
            height: 0.0,
            window: LandingWindow::GROUND,
        }
    }
}

impl LandingResolver for Ground {
    fn try_land(&mut self, probe: &LandingProbe) -> Option<Landing> {
        let rest_y = probe.rest_on(self.height);
        self.window
            .accepts(probe.old_y, probe.position.y, rest_y, probe.velocity_y)
            .then(|| Landing::rest(Surface::Ground, rest_y, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HALF: f32 = 0.7;

    fn table() -> TableHitbox {
        TableHitbox::new(-0.8, 0.8, -0.8, 0.8, 1.45)
    }

    fn probe(x: f32, z: f32, old_y: f32, y: f32, vel: f32) -> LandingProbe {
        LandingProbe {
            position: Vec3::new(x, y, z),
            old_y,
            velocity_y: vel,
            half_height: HALF,
        }
    }

    #[test]
    fn test_walking_into_table_side_reverts() {
        let previous = Vec3::new(-1.0, 0.7, 0.0);
        let mut current = Vec3::new(-0.7, 0.7, 0.1);
        assert!(block_horizontal(&mut current, previous, &table(), HALF, 0.05));
        assert_eq!(current.x, previous.x);
        assert_eq!(current.z, previous.z);
        assert_eq!(current.y, 0.7);
    }

    #[test]
    fn test_walking_on_top_is_not_blocked() {
        let previous = Vec3::new(0.0, 2.15, 0.0);
        let mut current = Vec3::new(0.3, 2.15, 0.0);
        assert!(!block_horizontal(&mut current, previous, &table(), HALF, 0.05));
        assert_eq!(current, Vec3::new(0.3, 2.15, 0.0));
    }

    #[test]
    fn test_blocker_only_above() {
        let b = BlockingBox::new(TableHitbox::new(-40.5, 28.0, 27.8, 33.0, 22.9)).above(15.0);
        let previous = Vec3::new(0.0, 0.7, 26.0);
        let mut current = Vec3::new(0.0, 0.7, 28.0);
        // On the ground far below the pillow: no invisible wall
        assert!(!b.apply(&mut current, previous, HALF));
        let previous = Vec3::new(0.0, 16.0, 26.0);
        let mut current = Vec3::new(0.0, 16.0, 28.0);
        assert!(b.apply(&mut current, previous, HALF));
        assert_eq!(current.z, 26.0);
    }

    #[test]
    fn test_table_landing_claims_once_descending() {
        let mut tables = SlabSet::new(
            SlabKind::Table,
            vec![Slab::new("t", table(), LandingWindow::TABLE)],
        );
        let landing = tables.try_land(&probe(0.0, 0.0, 2.2, 2.1, -1.0)).unwrap();
        assert_eq!(landing.surface, Surface::Table(0));
        assert!((landing.center_y - 2.15).abs() < 1e-5);
        assert!(landing.fall_damage);
        // Jumping up through the table from below is ignored
        assert!(tables.try_land(&probe(0.0, 0.0, 1.0, 2.1, 3.0)).is_none());
        // Outside the footprint
        assert!(tables.try_land(&probe(2.0, 0.0, 2.2, 2.1, -1.0)).is_none());
    }

    #[test]
    fn test_landing_is_idempotent() {
        let mut tables = SlabSet::new(
            SlabKind::Table,
            vec![Slab::new("t", table(), LandingWindow::TABLE)],
        );
        let first = tables.try_land(&probe(0.0, 0.0, 2.2, 2.1, -1.0)).unwrap();
        let resting = probe(0.0, 0.0, first.center_y, first.center_y, 0.0);
        let second = tables.try_land(&resting).unwrap();
        assert_eq!(first.center_y, second.center_y);
        assert_eq!(first.surface, second.surface);
    }

    #[test]
    fn test_safe_zone_skips_damage() {
        let mut zones = SlabSet::new(
            SlabKind::SafeZone,
            vec![Slab::new(
                "mid",
                TableHitbox::new(43.0, 47.0, -2.0, 2.0, 15.0),
                LandingWindow::SLAB,
            )],
        );
        let landing = zones.try_land(&probe(45.0, 0.0, 15.75, 15.69, -2.0)).unwrap();
        assert!(!landing.fall_damage);
        assert_eq!(landing.surface, Surface::SafeZone(0));
    }

    #[test]
    fn test_ramp_follows_slope() {
        let mut ramp = Ramp {
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
        };
        let landing = ramp.try_land(&probe(22.0, 0.0, 3.2, 3.1, -0.5)).unwrap();
        assert!((landing.center_y - 3.15).abs() < 1e-5);
        assert!(ramp.try_land(&probe(22.0, 1.5, 3.2, 3.1, -0.5)).is_none());
    }

    #[test]
    fn test_ground_catches_fall() {
        let mut ground = Ground::default();
        let landing = ground.try_land(&probe(5.0, 5.0, 0.75, 0.6, -2.0)).unwrap();
        assert_eq!(landing.center_y, 0.7);
        assert!(ground.try_land(&probe(5.0, 5.0, 3.0, 2.9, -2.0)).is_none());
    }

    proptest! {
        #[test]
        fn prop_side_entry_reverts_to_previous(
            px in -3.0f32..-0.81, pz in -3.0f32..3.0,
            cx in -0.79f32..0.79, cz in -0.79f32..0.79,
            y in 0.0f32..2.09,
        ) {
            let previous = Vec3::new(px, y, pz);
            let mut current = Vec3::new(cx, y, cz);
            block_horizontal(&mut current, previous, &table(), HALF, 0.05);
            prop_assert_eq!(current.x, previous.x);
            prop_assert_eq!(current.z, previous.z);
        }

        #[test]
        fn prop_above_threshold_never_reverts(
            cx in -0.79f32..0.79, cz in -0.79f32..0.79,
            y in 2.11f32..10.0,
        ) {
            let previous = Vec3::new(-2.0, y, 0.0);
            let mut current = Vec3::new(cx, y, cz);
            let before = current;
            prop_assert!(!block_horizontal(&mut current, previous, &table(), HALF, 0.05));
            prop_assert_eq!(current, before);
        }
    }
}
