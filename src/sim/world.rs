//! Built course: every obstacle's live state, plus the order they are consulted in

use glam::Vec3;
use rand::Rng;

use super::collision::{
    BlockingBox, Ground, Landing, LandingProbe, LandingResolver, Ramp, Slab, SlabKind, SlabSet,
};
use super::course::CourseLayout;
use super::gauntlet::Gauntlet;
use super::glass_bridge::GlassBridge;
use super::hazard::BallLane;
use super::hitbox::LandingWindow;
use super::ladder::Ladder;
use super::maze::Maze;
use super::platform::PlatformSet;
use super::trampoline::Trampoline;
use super::wind_bridge::WindBridge;
use super::win_zone::WinZone;

/// Number of landing resolvers, in priority order
pub const LANDING_RESOLVERS: usize = 9;

#[derive(Debug, Clone)]
pub struct World {
    pub spawn: Vec3,
    pub blockers: Vec<BlockingBox>,
    pub ladder: Ladder,
    pub platforms: PlatformSet,
    pub ramp: Ramp,
    pub glass_bridge: GlassBridge,
    pub trampoline: Trampoline,
    pub safe_zones: SlabSet,
    pub maze: Maze,
    pub tables: SlabSet,
    pub ground: Ground,
    pub wind_bridge: WindBridge,
    pub gauntlet: Gauntlet,
    pub balls: BallLane,
    pub win_zone: WinZone,
}

impl World {
    pub fn new(course: &CourseLayout, rng: &mut impl Rng) -> Self {
        let gauntlet = Gauntlet::new(course.gauntlet);
        let win_zone = WinZone::new(course.win_zone);

        let mut blockers: Vec<BlockingBox> =
            course.tables.iter().copied().map(BlockingBox::new).collect();
        blockers.push(BlockingBox::new(course.ramp.side_rail));
        blockers.extend(course.blockers.iter().copied());

        // The road and the finish platform are walkable like any other safe slab
        let mut safe_slabs = course.safe_zones.clone();
        safe_slabs.push(Slab::new(
            "gauntlet_road",
            gauntlet.road_hitbox(),
            LandingWindow::TABLE,
        ));
        safe_slabs.push(Slab::new(
            "win_platform",
            win_zone.hitbox,
            LandingWindow::SLAB,
        ));

        let tables = course
            .tables
            .iter()
            .enumerate()
            .map(|(i, t)| Slab::new(format!("table_{i}"), *t, course.table_window))
            .collect();

        Self {
            spawn: course.spawn,
            blockers,
            ladder: course.ladder,
            platforms: PlatformSet::new(&course.platforms),
            ramp: course.ramp,
            glass_bridge: GlassBridge::new(&course.glass_bridge, rng),
            trampoline: course.trampoline.clone(),
            safe_zones: SlabSet::new(SlabKind::SafeZone, safe_slabs),
            maze: Maze::new(&course.maze),
            tables: SlabSet::new(SlabKind::Table, tables),
            ground: course.ground,
            wind_bridge: WindBridge::new(course.wind_bridge),
            gauntlet,
            balls: BallLane::new(course.balls.clone()),
            win_zone,
        }
    }

    /// Landing resolvers from highest to lowest priority
    pub fn landing_order(&mut self) -> [&mut dyn LandingResolver; LANDING_RESOLVERS] {
        [
            &mut self.platforms,
            &mut self.ramp,
            &mut self.glass_bridge,
            &mut self.trampoline,
            &mut self.safe_zones,
            &mut self.maze,
            &mut self.tables,
            &mut self.ground,
            &mut self.wind_bridge,
        ]
    }

    /// Ask each resolver in turn; the first claim wins
    pub fn resolve_landing(&mut self, probe: &LandingProbe) -> Option<Landing> {
        self.trampoline.hit = false;
        self.landing_order()
            .into_iter()
            .find_map(|resolver| resolver.try_land(probe))
    }

    /// Run every side blocker; returns true if any reverted the move
    pub fn block_horizontal(&self, current: &mut Vec3, previous: Vec3, half_height: f32) -> bool {
        let mut blocked = false;
        for blocker in &self.blockers {
            blocked |= blocker.apply(current, previous, half_height);
        }
        blocked
    }

    /// Put every obstacle back to its starting state
    pub fn reset(&mut self) {
        self.platforms.reset();
        self.glass_bridge.reset();
        self.trampoline.hit = false;
        self.wind_bridge.reset();
        self.gauntlet.reset();
        self.balls.reset();
        self.win_zone.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Surface;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world() -> World {
        let mut rng = Pcg32::seed_from_u64(11);
        World::new(&CourseLayout::default(), &mut rng)
    }

    fn falling_onto(x: f32, z: f32, rest_y: f32) -> LandingProbe {
        LandingProbe {
            position: Vec3::new(x, rest_y - 0.02, z),
            old_y: rest_y + 0.02,
            velocity_y: -1.0,
            half_height: 0.7,
        }
    }

    #[test]
    fn test_blockers_include_tables_and_rail() {
        let w = world();
        assert_eq!(w.blockers.len(), 10 + 1 + 4);
    }

    #[test]
    fn test_safe_zones_include_road_and_finish() {
        let w = world();
        let names: Vec<&str> = w.safe_zones.slabs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "mid_safe_zone",
                "ladder_pillow",
                "barrier_back",
                "barrier_front",
                "gauntlet_road",
                "win_platform"
            ]
        );
    }

    #[test]
    fn test_table_claims_before_ground() {
        let mut w = world();
        let landing = w.resolve_landing(&falling_onto(0.0, 0.0, 2.15)).unwrap();
        assert_eq!(landing.surface, Surface::Table(1));
        let landing = w.resolve_landing(&falling_onto(30.0, 30.0, 0.7)).unwrap();
        assert_eq!(landing.surface, Surface::Ground);
    }

    #[test]
    fn test_nothing_claims_midair() {
        let mut w = world();
        assert!(w.resolve_landing(&falling_onto(100.0, -100.0, 8.0)).is_none());
    }

    #[test]
    fn test_blocking_reverts_into_table() {
        let w = world();
        let previous = Vec3::new(-1.0, 0.7, 0.0);
        let mut current = Vec3::new(-0.7, 0.7, 0.0);
        assert!(w.block_horizontal(&mut current, previous, 0.7));
        assert_eq!(current, previous);
    }

    #[test]
    fn test_reset_restores_tiles() {
        let mut w = world();
        w.glass_bridge.tiles[0].is_broken = true;
        w.wind_bridge.tiles[3].active = false;
        w.win_zone.has_won = true;
        w.reset();
        assert!(!w.glass_bridge.tiles[0].is_broken);
        assert!(w.wind_bridge.tiles[3].active);
        assert!(!w.win_zone.has_won);
    }
}
