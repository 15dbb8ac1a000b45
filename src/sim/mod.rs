//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable resolver order (see `World::landing_order`)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod course;
pub mod damage;
pub mod gauntlet;
pub mod glass_bridge;
pub mod hazard;
pub mod hitbox;
pub mod ladder;
pub mod maze;
pub mod motion;
pub mod platform;
pub mod state;
pub mod tick;
pub mod trampoline;
pub mod wind_bridge;
pub mod win_zone;
pub mod world;

pub use collision::{
    BlockingBox, Ground, Landing, LandingProbe, LandingResolver, Ramp, Slab, SlabKind, SlabSet,
    Support, Surface, block_horizontal,
};
pub use course::CourseLayout;
pub use damage::{DamageOutcome, FallSeverity, FallTracker, Shell};
pub use hitbox::{DiscHitbox, LandingWindow, RampHitbox, TableHitbox};
pub use motion::VerticalMotion;
pub use state::{CrashCause, GameEvent, GameObserver, GamePhase, GameState, Player};
pub use tick::{Stepper, TickInput, tick};
pub use world::World;
