//! Moving platforms: ping-pong between two points and carry whoever stands on them

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{Landing, LandingProbe, LandingResolver, Surface};
use super::hitbox::{LandingWindow, TableHitbox};

/// Paths shorter than this do not move
const MIN_PATH_LENGTH: f32 = 0.001;

/// Placement of one platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformPath {
    pub start: Vec3,
    pub end: Vec3,
    /// Travel speed (units/s)
    pub speed: f32,
    /// Starting point along the path, 0..=1
    pub progress: f32,
    /// +1 toward `end`, -1 toward `start`
    pub direction: i8,
    /// Half the platform's side length
    pub half_extent: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovingPlatform {
    pub path: PlatformPath,
    pub progress: f32,
    pub direction: i8,
    /// Current interpolated position (top center)
    pub position: Vec3,
    pub hitbox: TableHitbox,
    /// Displacement over the last tick
    pub current_offset: Vec3,
    pub window: LandingWindow,
}

impl MovingPlatform {
    pub fn new(path: PlatformPath) -> Self {
        let progress = path.progress.clamp(0.0, 1.0);
        let position = path.start.lerp(path.end, progress);
        Self {
            path,
            progress,
            direction: if path.direction < 0 { -1 } else { 1 },
            position,
            hitbox: TableHitbox::centered(position, path.half_extent),
            current_offset: Vec3::ZERO,
            window: LandingWindow::TABLE,
        }
    }

    /// Move along the path by one tick, bouncing at either end
    pub fn advance(&mut self, dt: f32) {
        let dist = self.path.start.distance(self.path.end);
        if dist <= MIN_PATH_LENGTH {
            self.current_offset = Vec3::ZERO;
            return;
        }
        self.progress += self.path.speed * dt / dist * self.direction as f32;
        if self.progress >= 1.0 || self.progress <= 0.0 {
            self.direction = -self.direction;
        }
        self.progress = self.progress.clamp(0.0, 1.0);

        let next = self.path.start.lerp(self.path.end, self.progress);
        self.current_offset = next - self.position;
        self.position = next;
        self.hitbox = TableHitbox::centered(next, self.path.half_extent);
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.path);
    }
}

/// All platforms, tried in order
#[derive(Debug, Clone, Default)]
pub struct PlatformSet {
    pub platforms: Vec<MovingPlatform>,
}

impl PlatformSet {
    pub fn new(paths: &[PlatformPath]) -> Self {
        Self {
            platforms: paths.iter().copied().map(MovingPlatform::new).collect(),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        for platform in &mut self.platforms {
            platform.advance(dt);
        }
    }

    pub fn reset(&mut self) {
        for platform in &mut self.platforms {
            platform.reset();
        }
    }
}

impl LandingResolver for PlatformSet {
    fn try_land(&mut self, probe: &LandingProbe) -> Option<Landing> {
        self.platforms.iter().enumerate().find_map(|(i, p)| {
            let rest_y = probe.rest_on(p.hitbox.top_y);
            (p.hitbox.contains_xz(probe.position)
                && p.window
                    .accepts(probe.old_y, probe.position.y, rest_y, probe.velocity_y))
            .then(|| Landing {
                carry: p.current_offset,
                ..Landing::rest(Surface::Platform(i), rest_y, false)
            })
        })
    }
}
