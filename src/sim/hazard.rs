//! Rolling balls: hazards that roll along the high bridge and fall off its end
//!
//! Not a supporting surface. Touching a ball shatters the egg outright.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Where and how balls are launched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallLaneLayout {
    /// Seconds between spawns
    pub spawn_interval: f32,
    pub ball_radius: f32,
    /// Center height while rolling
    pub floor_y: f32,
    /// X where balls appear
    pub start_x: f32,
    /// Past this X the bridge ends and balls fall
    pub edge_x: f32,
    /// Balls past this X are recycled
    pub delete_x: f32,
    /// Balls below this Y are recycled
    pub kill_y: f32,
    /// Spawn Z range
    pub spawn_z: (f32, f32),
    /// Rail positions the balls bounce between
    pub rail_z: (f32, f32),
    /// Forward speed range
    pub speed: (f32, f32),
    /// Lateral drift range
    pub drift: (f32, f32),
    /// Downward acceleration once off the edge
    pub fall_gravity: f32,
    /// Overlap required before contact counts
    pub contact_margin: f32,
    /// Balls further than this along X are skipped by the contact test
    pub contact_reach_x: f32,
}

impl Default for BallLaneLayout {
    fn default() -> Self {
        let ball_radius = 0.5;
        Self {
            spawn_interval: 3.0,
            ball_radius,
            floor_y: 23.4 + ball_radius,
            start_x: -28.0,
            edge_x: 28.0,
            delete_x: 40.0,
            kill_y: -10.0,
            spawn_z: (29.0, 31.0),
            rail_z: (28.5 + ball_radius, 31.6 - ball_radius),
            speed: (4.0, 7.0),
            drift: (-1.2, 1.2),
            fall_gravity: 15.0,
            contact_margin: 0.1,
            contact_reach_x: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingBall {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Visual roll angle in degrees
    pub rotation_angle: f32,
    pub active: bool,
    pub is_falling: bool,
}

/// Pool of rolling balls
#[derive(Debug, Clone)]
pub struct BallLane {
    pub layout: BallLaneLayout,
    pub balls: Vec<RollingBall>,
    spawn_timer: f32,
}

impl BallLane {
    pub fn new(layout: BallLaneLayout) -> Self {
        Self {
            layout,
            balls: Vec::new(),
            spawn_timer: 0.0,
        }
    }

    pub fn active_count(&self) -> usize {
        self.balls.iter().filter(|b| b.active).count()
    }

    /// Spawn on schedule and move every active ball
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        self.spawn_timer += dt;
        if self.spawn_timer >= self.layout.spawn_interval {
            self.spawn(rng);
            self.spawn_timer = 0.0;
        }

        let l = &self.layout;
        for ball in self.balls.iter_mut().filter(|b| b.active) {
            ball.position += ball.velocity * dt;

            if !ball.is_falling {
                if ball.position.z < l.rail_z.0 {
                    ball.position.z = l.rail_z.0;
                    ball.velocity.z = -ball.velocity.z;
                } else if ball.position.z > l.rail_z.1 {
                    ball.position.z = l.rail_z.1;
                    ball.velocity.z = -ball.velocity.z;
                }
                let step = ball.velocity.x * dt;
                ball.rotation_angle -= (step / l.ball_radius).to_degrees();
            }

            if ball.position.x > l.edge_x {
                ball.is_falling = true;
                ball.velocity.y -= l.fall_gravity * dt;
            } else {
                ball.position.y = l.floor_y;
                ball.velocity.y = 0.0;
            }

            if ball.position.y < l.kill_y || ball.position.x > l.delete_x {
                ball.active = false;
            }
        }
    }

    /// Sphere test against the egg; a touching ball is consumed
    pub fn check_hit(&mut self, player: Vec3, player_radius: f32) -> bool {
        let l = &self.layout;
        let reach = l.ball_radius + player_radius - l.contact_margin;
        let hit = self.balls.iter_mut().find(|b| {
            b.active
                && (player.x - b.position.x).abs() <= l.contact_reach_x
                && player.distance(b.position) < reach
        });
        match hit {
            Some(ball) => {
                ball.active = false;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.balls.clear();
        self.spawn_timer = 0.0;
    }

    /// Reuse an inactive ball if there is one
    fn spawn(&mut self, rng: &mut impl Rng) {
        let l = &self.layout;
        let fresh = RollingBall {
            position: Vec3::new(l.start_x, l.floor_y, random_in(rng, l.spawn_z)),
            velocity: Vec3::new(random_in(rng, l.speed), 0.0, random_in(rng, l.drift)),
            rotation_angle: 0.0,
            active: true,
            is_falling: false,
        };
        match self.balls.iter_mut().find(|b| !b.active) {
            Some(slot) => *slot = fresh,
            None => self.balls.push(fresh),
        }
        log::trace!("Ball spawned at {:?}", fresh.position);
    }
}

fn random_in(rng: &mut impl Rng, (min, max): (f32, f32)) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}
