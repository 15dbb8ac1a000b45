//! Game state and core simulation types
//!
//! Everything one run needs lives here: the phase machine, the egg, the built
//! course and the seeded RNG. Nothing is global.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Surface;
use super::course::CourseLayout;
use super::damage::{DamageOutcome, FallTracker, Shell};
use super::motion::VerticalMotion;
use super::world::World;
use crate::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for confirm to start a run
    Menu,
    /// Active gameplay
    Playing,
    /// Egg destroyed; the shatter animation plays until confirm
    Crashed,
}

/// What destroyed the egg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// A single fall at or past the crash threshold
    FatalFall,
    /// Cracks added up to the maximum
    Cracked,
    /// Touched a rolling ball
    Hazard,
    /// Dropped out from under the wind bridge
    BlownOff,
    /// Left the finish platform after winning
    LeftWinZone,
}

/// Things that happened during a tick, for audio/visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// Crack count changed (including back to zero on reset)
    DamageTierChanged { cracks: u8 },
    Crashed { cause: CrashCause },
    /// A fall measured for damage ended on a surface
    Landed { surface: Surface, fall: f32 },
    /// A glass tile shattered under the egg
    TileBroken { index: usize },
    Bounced,
    /// A gauntlet wall clipped the egg
    WallHit,
    /// Crossed the wind bridge and got sent to the finish
    Teleported { to: Vec3 },
    Won,
}

/// Receives damage and gameplay notifications from the simulation
pub trait GameObserver {
    /// Crack count changed
    fn on_damage_tier_changed(&mut self, cracks: u8);

    fn on_event(&mut self, _event: &GameEvent) {}
}

/// The egg
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center of the body
    pub position: Vec3,
    pub motion: VerticalMotion,
    pub fall: FallTracker,
    pub shell: Shell,
    /// Surface claimed on the last tick, if any
    pub standing_on: Option<Surface>,
}

impl Player {
    pub fn new(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            motion: VerticalMotion::default(),
            fall: FallTracker::new(spawn.y),
            shell: Shell::default(),
            standing_on: None,
        }
    }
}

/// Complete state of one run (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    pub world: World,
    /// Simulation clock (seconds)
    pub time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Clock value when the egg crashed
    pub crash_started_at: Option<f64>,
    /// Reached the finish platform this run
    pub won: bool,
    /// Movement is fenced to the finish platform
    pub restrict_to_win_zone: bool,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// New run on the shipped course
    pub fn new(seed: u64) -> Self {
        Self::with_course(seed, Tuning::default(), &CourseLayout::default())
    }

    pub fn with_course(seed: u64, tuning: Tuning, course: &CourseLayout) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = World::new(course, &mut rng);
        Self {
            seed,
            tuning,
            phase: GamePhase::Menu,
            player: Player::new(world.spawn),
            world,
            time: 0.0,
            time_ticks: 0,
            crash_started_at: None,
            won: false,
            restrict_to_win_zone: false,
            events: Vec::new(),
            rng,
        }
    }

    pub fn set_phase(&mut self, to: GamePhase) {
        if self.phase == to {
            return;
        }
        let from = self.phase;
        log::info!("Phase {from:?} -> {to:?}");
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Respawn the egg and restore the course
    pub fn reset_level(&mut self) {
        let had_cracks = self.player.shell.cracks != 0;
        self.player = Player::new(self.world.spawn);
        self.world.reset();
        self.crash_started_at = None;
        self.won = false;
        self.restrict_to_win_zone = false;
        if had_cracks {
            self.events.push(GameEvent::DamageTierChanged { cracks: 0 });
        }
        log::debug!("Level reset, egg at {:?}", self.player.position);
    }

    /// Record a damage outcome; a shattered shell ends the run with `cause`
    pub fn apply_damage(&mut self, outcome: DamageOutcome, cause: CrashCause) {
        match outcome {
            DamageOutcome::Unharmed => {}
            DamageOutcome::Cracked { cracks } => {
                log::debug!("Shell cracked ({cracks}/{})", self.tuning.max_cracks);
                self.events.push(GameEvent::DamageTierChanged { cracks });
            }
            DamageOutcome::Shattered => {
                self.events.push(GameEvent::DamageTierChanged {
                    cracks: self.player.shell.cracks,
                });
                self.crash(cause);
            }
        }
    }

    /// Destroy the egg and start the shatter animation
    pub fn crash(&mut self, cause: CrashCause) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let before = self.player.shell.cracks;
        self.player.shell.shatter(self.tuning.max_cracks);
        if self.player.shell.cracks != before {
            self.events.push(GameEvent::DamageTierChanged {
                cracks: self.player.shell.cracks,
            });
        }
        log::warn!("Egg crashed ({cause:?}) at {:?}", self.player.position);
        self.crash_started_at = Some(self.time);
        self.events.push(GameEvent::Crashed { cause });
        self.set_phase(GamePhase::Crashed);
    }

    /// Shatter animation progress, 0 to 1; 0 when not crashed
    pub fn crash_progress(&self) -> f32 {
        match self.crash_started_at {
            Some(start) if self.phase == GamePhase::Crashed => {
                let elapsed = (self.time - start) as f32;
                (elapsed / self.tuning.crash_animation).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hand queued events to `observer`, emptying the queue
    pub fn dispatch_events(&mut self, observer: &mut impl GameObserver) {
        for event in self.drain_events() {
            if let GameEvent::DamageTierChanged { cracks } = event {
                observer.on_damage_tier_changed(cracks);
            }
            observer.on_event(&event);
        }
    }
}
