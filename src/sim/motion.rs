//! Vertical motion: gravity, jumping and ladder climbing

use serde::{Deserialize, Serialize};

use crate::Tuning;

/// Scalar vertical dynamics of the egg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalMotion {
    /// Signed vertical velocity (negative = falling)
    pub velocity_y: f32,
    /// True only while grounded or climbing
    pub can_jump: bool,
    /// True while inside a ladder volume; gravity is suspended
    pub is_climbing: bool,
}

impl Default for VerticalMotion {
    fn default() -> Self {
        Self {
            velocity_y: 0.0,
            can_jump: true,
            is_climbing: false,
        }
    }
}

impl VerticalMotion {
    /// Integrate one step of gravity into `y`
    ///
    /// Climbing zeroes velocity and leaves `y` for the climb input to drive.
    pub fn apply_gravity(&mut self, dt: f32, y: &mut f32, tuning: &Tuning) {
        if self.is_climbing {
            self.velocity_y = 0.0;
            return;
        }
        self.velocity_y += tuning.gravity * dt;
        *y += self.velocity_y * dt;
    }

    /// Jump if grounded or climbing; returns whether the jump happened
    pub fn try_jump(&mut self, tuning: &Tuning) -> bool {
        if self.can_jump || self.is_climbing {
            self.velocity_y = tuning.jump_force;
            self.can_jump = false;
            self.is_climbing = false;
            true
        } else {
            false
        }
    }

    /// Settle on a surface
    #[inline]
    pub fn ground(&mut self) {
        self.velocity_y = 0.0;
        self.can_jump = true;
    }

    /// Launch upward without granting another jump
    #[inline]
    pub fn launch(&mut self, velocity_y: f32) {
        self.velocity_y = velocity_y;
        self.can_jump = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
