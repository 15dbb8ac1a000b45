//! Trampoline: a disc that throws the egg straight up

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{Landing, LandingProbe, LandingResolver, Support, Surface};
use super::hitbox::DiscHitbox;
use crate::flat_distance;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trampoline {
    pub disc: DiscHitbox,
    /// Upward velocity given on contact
    pub bounce_force: f32,
    /// Foot level must be within this of the disc height
    pub catch_band: f32,
    /// Extra radius of the frame that blocks walking in from the side
    pub frame_margin: f32,
    /// The frame only blocks while the foot is at or below this height
    pub frame_height: f32,
    /// Set for the tick the egg bounced, for the renderer; cleared by the
    /// world before each landing pass
    #[serde(skip)]
    pub hit: bool,
}

impl Default for Trampoline {
    fn default() -> Self {
        Self {
            disc: DiscHitbox {
                center: Vec3::new(41.0, 0.0, 0.0),
                radius: 0.4,
                height: 0.5,
            },
            bounce_force: 35.0,
            catch_band: 0.5,
            frame_margin: 1.1,
            frame_height: 1.0,
            hit: false,
        }
    }
}

impl Trampoline {
    /// Undo horizontal moves into the trampoline frame; returns true if reverted
    pub fn block_side(&self, current: &mut Vec3, previous: Vec3, half_height: f32) -> bool {
        let foot_y = current.y - half_height;
        if foot_y <= self.frame_height
            && flat_distance(*current, self.disc.center) < self.disc.radius + self.frame_margin
        {
            current.x = previous.x;
            current.z = previous.z;
            return true;
        }
        false
    }
}

impl LandingResolver for Trampoline {
    fn try_land(&mut self, probe: &LandingProbe) -> Option<Landing> {
        let foot_y = probe.foot_y();
        let at_level = (foot_y - self.disc.height).abs() <= self.catch_band;
        if !at_level || probe.velocity_y > 0.0 || !self.disc.contains_xz(probe.position) {
            return None;
        }
        self.hit = true;
        Some(Landing {
            surface: Surface::Trampoline,
            center_y: probe.rest_on(self.disc.height),
            support: Support::Bounce {
                velocity: self.bounce_force,
            },
            fall_damage: false,
            carry: Vec3::ZERO,
        })
    }
}
