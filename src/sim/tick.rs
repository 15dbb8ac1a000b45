//! Fixed timestep simulation tick
//!
//! One call runs the whole frame resolution: input, hazards, side blocking,
//! gravity, the landing chain, then the wind bridge and the finish checks.

use glam::Vec2;

use super::collision::{LandingProbe, Support, Surface};
use super::damage::FallSeverity;
use super::state::{CrashCause, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired horizontal direction in world XZ (already camera-relative);
    /// lengths over 1 are clamped
    pub movement: Vec2,
    /// Ladder axis: +1 climbs, -1 descends
    pub climb: f32,
    pub sprint: bool,
    /// Jump (one-shot)
    pub jump: bool,
    /// Start / acknowledge / restart (one-shot)
    pub confirm: bool,
}

impl TickInput {
    /// Clear inputs that must only act on one tick
    pub fn clear_one_shots(&mut self) {
        self.jump = false;
        self.confirm = false;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time += dt as f64;
    state.time_ticks += 1;

    // The gauntlet keeps running behind the menus
    state.world.gauntlet.update(dt);

    match state.phase {
        GamePhase::Menu => {
            if input.confirm {
                state.reset_level();
                state.set_phase(GamePhase::Playing);
            }
            return;
        }
        GamePhase::Crashed => {
            if input.confirm {
                state.set_phase(GamePhase::Menu);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    if input.confirm && state.won {
        log::info!("Restarting after a win");
        state.reset_level();
        return;
    }

    let previous = state.player.position;
    apply_input(state, input, dt);

    // Rolling balls
    state.world.balls.update(dt, &mut state.rng);
    if state
        .world
        .balls
        .check_hit(state.player.position, state.tuning.body_radius)
    {
        state.crash(CrashCause::Hazard);
        return;
    }

    let half = state.tuning.half_height;
    let world = &mut state.world;
    let player = &mut state.player;

    player.motion.is_climbing = world.ladder.contains(player.position);

    // Horizontal blocking: every blocker runs, then maze walls, then the
    // trampoline frame
    world.block_horizontal(&mut player.position, previous, half);
    world.maze.push_out(&mut player.position, previous);
    world.trampoline.block_side(&mut player.position, previous, half);

    let radius = world.gauntlet.layout.player_radius;
    if world.gauntlet.check_player(player.position, radius) {
        log::info!("Gauntlet wall hit at {:?}", player.position);
        state.events.push(GameEvent::WallHit);
        let outcome = state.player.shell.crack(state.tuning.max_cracks);
        state.apply_damage(outcome, CrashCause::Cracked);
        if state.phase != GamePhase::Playing {
            return;
        }
    }

    // Gravity
    let old_y = state.player.position.y;
    {
        let player = &mut state.player;
        player
            .motion
            .apply_gravity(dt, &mut player.position.y, &state.tuning);
        if !player.motion.is_climbing {
            player.fall.observe(player.position.y, player.motion.velocity_y);
        }
    }

    state.world.platforms.advance(dt);

    resolve_vertical(state, old_y);
    if state.phase != GamePhase::Playing {
        return;
    }

    update_wind_bridge(state, dt);
    if state.phase != GamePhase::Playing {
        return;
    }

    check_finish(state);
}

/// Walk or climb, jump, and keep a winner on the finish platform
fn apply_input(state: &mut GameState, input: &TickInput, dt: f32) {
    let tuning = &state.tuning;
    let player = &mut state.player;
    let before = player.position;

    let speed = if input.sprint {
        tuning.walk_speed * tuning.sprint_multiplier
    } else {
        tuning.walk_speed
    };

    if player.motion.is_climbing {
        let step = input.climb.clamp(-1.0, 1.0) * speed * dt;
        let floor_y = tuning.rest_height(state.world.ground.height);
        player.position.y = state.world.ladder.climb(player.position.y, step, floor_y);
    }
    let step = input.movement.clamp_length_max(1.0) * speed * dt;
    player.position.x += step.x;
    player.position.z += step.y;

    if input.jump && player.motion.try_jump(tuning) {
        log::debug!("Jump from {:?}", player.position);
    }

    if state.restrict_to_win_zone && !state.world.win_zone.contains(player.position) {
        player.position = before;
    }
}

/// Climbing short-circuit, then the landing chain
fn resolve_vertical(state: &mut GameState, old_y: f32) {
    if state.player.motion.is_climbing {
        let player = &mut state.player;
        player.motion.velocity_y = 0.0;
        player.motion.can_jump = true;
        player.fall.reset_to(player.position.y);
        player.standing_on = Some(Surface::Ladder);
        return;
    }

    let probe = LandingProbe {
        position: state.player.position,
        old_y,
        velocity_y: state.player.motion.velocity_y,
        half_height: state.tuning.half_height,
    };
    let landing = state.world.resolve_landing(&probe);

    if let Some(index) = state.world.glass_bridge.take_broken() {
        state.events.push(GameEvent::TileBroken { index });
    }

    let Some(landing) = landing else {
        state.player.standing_on = None;
        return;
    };

    let player = &mut state.player;
    player.position.y = landing.center_y;
    player.standing_on = Some(landing.surface);
    match landing.support {
        Support::Rest => player.motion.ground(),
        Support::Bounce { velocity } => {
            player.motion.launch(velocity);
            log::debug!("Bounced at {velocity}");
            state.events.push(GameEvent::Bounced);
        }
    }

    if landing.fall_damage {
        let fall = state.player.fall.land(landing.center_y);
        let severity = FallSeverity::classify(fall, &state.tuning);
        if severity != FallSeverity::Harmless {
            log::debug!("Landed on {:?} after a {fall:.2} fall", landing.surface);
            state.events.push(GameEvent::Landed {
                surface: landing.surface,
                fall,
            });
        }
        let outcome = state
            .player
            .shell
            .apply_fall(severity, state.tuning.max_cracks);
        let cause = if severity == FallSeverity::Fatal {
            CrashCause::FatalFall
        } else {
            CrashCause::Cracked
        };
        state.apply_damage(outcome, cause);
    } else {
        state.player.fall.reset_to(landing.center_y);
    }

    state.player.position += landing.carry;
}

/// Tile aging, wind drift, the bridge's own fall check and its exit
fn update_wind_bridge(state: &mut GameState, dt: f32) {
    let half = state.tuning.half_height;
    let bridge = &mut state.world.wind_bridge;
    let standing_on_tile = bridge.take_standing();
    bridge.update(dt, state.player.position, half, &mut state.rng);
    bridge.drift(&mut state.player.position, dt, standing_on_tile);

    if bridge.player_fell(state.player.position) {
        state.crash(CrashCause::BlownOff);
        return;
    }

    if bridge.crossed_exit(state.player.position) {
        let to = bridge.layout.exit_target;
        log::info!("Crossed the wind bridge, moving to {to:?}");
        state.player.position = to;
        state.player.motion.velocity_y = 0.0;
        state.player.fall.reset_to(to.y);
        bridge.player_on_bridge = false;
        state.events.push(GameEvent::Teleported { to });
    }
}

/// One-shot win trigger and the fence that follows it
fn check_finish(state: &mut GameState) {
    let position = state.player.position;
    if !state.won && state.world.win_zone.check_arrival(position, state.tuning.half_height) {
        log::info!("Finish reached in {:.1}s", state.time);
        state.won = true;
        state.restrict_to_win_zone = true;
        state.events.push(GameEvent::Won);
    }

    if state.restrict_to_win_zone && !state.world.win_zone.contains(position) {
        state.crash(CrashCause::LeftWinZone);
    }
}

/// Runs fixed ticks to cover variable frame times
#[derive(Debug, Clone, Default)]
pub struct Stepper {
    accumulator: f32,
}

impl Stepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed ticks as `frame_dt` covers; returns how many ran
    ///
    /// One-shot inputs are cleared after the first tick that sees them.
    pub fn advance(&mut self, state: &mut GameState, input: &mut TickInput, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            input.clear_one_shots();
        }

        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hazard::RollingBall;
    use glam::Vec3;
    use proptest::prelude::*;

    /// Hold the egg still at `at` with a fresh watermark
    fn drop_from(state: &mut GameState, at: Vec3) {
        state.player.position = at;
        state.player.motion.velocity_y = 0.0;
        state.player.motion.can_jump = false;
        state.player.fall.reset_to(at.y);
    }

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(
            &mut state,
            &TickInput {
                confirm: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        state.events.clear();
        state
    }

    fn idle(state: &mut GameState, ticks: usize) {
        let input = TickInput::default();
        for _ in 0..ticks {
            tick(state, &input, SIM_DT);
        }
    }

    /// Ticks until the egg stands on something or `max` runs out
    fn settle(state: &mut GameState, max: usize) {
        let input = TickInput::default();
        for _ in 0..max {
            tick(state, &input, SIM_DT);
            if state.phase != GamePhase::Playing
                || (state.player.standing_on.is_some() && state.player.motion.velocity_y == 0.0)
            {
                return;
            }
        }
    }

    #[test]
    fn test_menu_to_playing_to_crashed_to_menu() {
        let mut state = GameState::new(1);
        idle(&mut state, 10);
        assert_eq!(state.phase, GamePhase::Menu);

        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &confirm, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);

        state.crash(CrashCause::Hazard);
        idle(&mut state, 5);
        assert_eq!(state.phase, GamePhase::Crashed);
        assert!(state.crash_progress() > 0.0);

        tick(&mut state, &confirm, SIM_DT);
        assert_eq!(state.phase, GamePhase::Menu);
        tick(&mut state, &confirm, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.shell.cracks, 0);
    }

    #[test]
    fn test_resting_on_ground_is_stable() {
        let mut state = playing(2);
        idle(&mut state, 240);
        assert!((state.player.position.y - 0.7).abs() < 1e-5);
        assert_eq!(state.player.standing_on, Some(Surface::Ground));
        assert_eq!(state.player.shell.cracks, 0);
    }

    #[test]
    fn test_walking_moves_at_walk_speed() {
        let mut state = playing(3);
        let input = TickInput {
            movement: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!((state.player.position.z - 7.5).abs() < 1e-3);
    }

    #[test]
    fn test_walking_into_table_is_blocked() {
        let mut state = playing(4);
        state.player.position = Vec3::new(-1.0, 0.7, 0.0);
        let input = TickInput {
            movement: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.player.position.x <= -0.8);
    }

    // Scenario A: falls onto a table resting at 2.15
    fn land_on_table(peak: f32) -> GameState {
        let mut state = playing(5);
        drop_from(&mut state, Vec3::new(0.0, peak, 0.0));
        settle(&mut state, 600);
        state
    }

    #[test]
    fn test_short_fall_onto_table_is_harmless() {
        let state = land_on_table(2.15 + 0.5);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.standing_on, Some(Surface::Table(1)));
        assert!((state.player.position.y - 2.15).abs() < 1e-5);
        assert_eq!(state.player.shell.cracks, 0);
        assert_eq!(state.player.fall.peak, state.player.position.y);
    }

    #[test]
    fn test_medium_fall_onto_table_cracks() {
        let state = land_on_table(2.15 + 1.2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.shell.cracks, 1);
        assert!(state.events.contains(&GameEvent::DamageTierChanged { cracks: 1 }));
    }

    #[test]
    fn test_long_fall_onto_table_crashes() {
        let state = land_on_table(2.15 + 1.6);
        assert_eq!(state.phase, GamePhase::Crashed);
        assert_eq!(state.player.shell.cracks, 3);
        assert!(state.events.contains(&GameEvent::Crashed {
            cause: CrashCause::FatalFall
        }));
    }

    #[test]
    fn test_three_cracks_crash() {
        let mut state = playing(6);
        for _ in 0..3 {
            drop_from(&mut state, Vec3::new(0.0, 2.15 + 1.2, 0.0));
            settle(&mut state, 600);
        }
        assert_eq!(state.phase, GamePhase::Crashed);
        assert!(state.events.contains(&GameEvent::Crashed {
            cause: CrashCause::Cracked
        }));
    }

    // P1: once claimed, the egg stays put with velocity zero and a jump ready
    #[test]
    fn test_landing_is_idempotent() {
        let mut state = land_on_table(2.5);
        let resting = state.player.position;
        idle(&mut state, 30);
        assert_eq!(state.player.position, resting);
        assert_eq!(state.player.motion.velocity_y, 0.0);
        assert!(state.player.motion.can_jump);
    }

    // Scenario B: unsafe glass gives way and the egg keeps falling
    #[test]
    fn test_unsafe_glass_tile_drops_egg() {
        let mut state = playing(7);
        // Row 0, -Z side is unsafe in the shipped pattern
        drop_from(&mut state, Vec3::new(25.0, 2.85 + 0.7 + 0.1, -0.9));
        idle(&mut state, 30);
        assert!(state.world.glass_bridge.tiles[0].is_broken);
        assert!(state.events.contains(&GameEvent::TileBroken { index: 0 }));
        assert!(state.player.position.y < 3.55);
        assert!(state.player.motion.velocity_y < 0.0);
    }

    #[test]
    fn test_safe_glass_tile_holds_without_damage() {
        let mut state = playing(8);
        drop_from(&mut state, Vec3::new(25.0, 3.55 + 1.3, 0.9));
        settle(&mut state, 600);
        assert_eq!(state.player.standing_on, Some(Surface::GlassTile(1)));
        assert_eq!(state.player.shell.cracks, 0);
    }

    // P4: a broken tile stays broken until reset
    #[test]
    fn test_broken_tile_restored_by_reset() {
        let mut state = playing(9);
        drop_from(&mut state, Vec3::new(25.0, 3.65, -0.9));
        idle(&mut state, 30);
        assert!(state.world.glass_bridge.tiles[0].is_broken);
        state.reset_level();
        assert!(state.world.glass_bridge.tiles.iter().all(|t| !t.is_broken));
    }

    // Scenario C
    #[test]
    fn test_trampoline_launches() {
        let mut state = playing(10);
        drop_from(&mut state, Vec3::new(41.0, 1.5, 0.0));
        let input = TickInput::default();
        let mut bounced = false;
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT);
            if state.player.standing_on == Some(Surface::Trampoline) {
                bounced = true;
                break;
            }
        }
        assert!(bounced);
        assert_eq!(state.player.motion.velocity_y, 35.0);
        assert!(!state.player.motion.can_jump);
        assert!(state.world.trampoline.hit);
        assert!((state.player.fall.peak - 1.2).abs() < 1e-5);
    }

    // Scenario D
    #[test]
    fn test_rolling_ball_is_instant_crash() {
        let mut state = playing(11);
        state.player.position = Vec3::new(0.0, 23.6, 30.0);
        state.world.balls.balls.push(RollingBall {
            position: Vec3::new(0.3, 23.9, 30.0),
            velocity: Vec3::new(5.0, 0.0, 0.0),
            rotation_angle: 0.0,
            active: true,
            is_falling: false,
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Crashed);
        assert_eq!(state.player.shell.cracks, 3);
        assert!(!state.world.balls.balls[0].active);
        assert!(state.events.contains(&GameEvent::Crashed {
            cause: CrashCause::Hazard
        }));
    }

    // P6: standing on a platform carries the egg with it
    #[test]
    fn test_platform_carries_egg() {
        let mut state = playing(12);
        let platform = &state.world.platforms.platforms[0];
        let top = platform.hitbox.top_y;
        state.player.position = Vec3::new(platform.position.x, top + 0.7, platform.position.z);
        state.player.fall.reset_to(top + 0.7);
        idle(&mut state, 1);
        assert_eq!(state.player.standing_on, Some(Surface::Platform(0)));

        let before = state.player.position;
        idle(&mut state, 1);
        let platform = &state.world.platforms.platforms[0];
        assert!((state.player.position.y - (top + 0.7)).abs() < 1e-5);
        assert!((state.player.position.z - before.z - platform.current_offset.z).abs() < 1e-5);
        assert!(platform.current_offset.z > 0.0);
    }

    #[test]
    fn test_ladder_climb() {
        let mut state = playing(13);
        state.player.position = Vec3::new(23.0, 15.7, 27.0);
        idle(&mut state, 1);
        assert!(state.player.motion.is_climbing);
        assert!(state.player.motion.can_jump);
        assert_eq!(state.player.standing_on, Some(Surface::Ladder));

        let up = TickInput {
            climb: 1.0,
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state, &up, SIM_DT);
        }
        assert!((state.player.position.y - 18.2).abs() < 1e-2);
        assert_eq!(state.player.fall.peak, state.player.position.y);
    }

    #[test]
    fn test_gauntlet_hit_cracks_once_per_wall() {
        let mut state = playing(14);
        let wall_z = state.world.gauntlet.walls[0].z;
        state.player.position = Vec3::new(-45.0, 24.3, wall_z - 0.8);
        state.player.fall.reset_to(24.3);
        idle(&mut state, 20);
        assert_eq!(state.player.shell.cracks, 1);
        assert!(state.events.contains(&GameEvent::WallHit));
    }

    #[test]
    fn test_wind_bridge_exit_and_win() {
        let mut state = playing(15);
        // Last regular row, standing on a tile near the finish line
        state.player.position = Vec3::new(-47.0, 25.5, 111.95);
        state.player.fall.reset_to(25.5);
        let forward = TickInput {
            movement: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &forward, SIM_DT);
            if state.events.iter().any(|e| matches!(e, GameEvent::Teleported { .. })) {
                break;
            }
        }
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::Teleported { .. })));
        assert_eq!(state.player.motion.velocity_y, 0.0);
        settle(&mut state, 120);
        idle(&mut state, 2);
        assert!(state.won);
        assert!(state.restrict_to_win_zone);
        assert!(state.events.contains(&GameEvent::Won));
        assert_eq!(state.player.standing_on, Some(Surface::SafeZone(5)));
        assert!((state.player.position.y - 25.0).abs() < 1e-5);

        // Free to walk around inside the zone
        let east = TickInput {
            movement: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &east, SIM_DT);
        }
        assert!((state.player.position.x - 0.625).abs() < 1e-3);
        assert!((state.player.position.z - 125.0).abs() < 1e-5);

        // A step that would leave the zone is undone
        state.player.position = Vec3::new(5.99, 25.0, 125.0);
        tick(&mut state, &east, SIM_DT);
        assert_eq!(state.player.position.x, 5.99);
        assert_eq!(state.player.position.z, 125.0);
        for _ in 0..30 {
            tick(&mut state, &east, SIM_DT);
        }
        assert_eq!(state.player.position.x, 5.99);
        assert_eq!(state.phase, GamePhase::Playing);

        // Confirm while won starts over
        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &confirm, SIM_DT);
        assert!(!state.won);
        assert_eq!(state.player.position, state.world.spawn);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_ground_past_exit_line_does_not_teleport() {
        let mut state = playing(18);
        state.player.position = Vec3::new(30.0, 0.7, 111.9);
        let forward = TickInput {
            movement: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &forward, SIM_DT);
        }
        idle(&mut state, 10);
        assert!(state.player.position.z > 112.0);
        assert!((state.player.position.y - 0.7).abs() < 1e-5);
        assert!(!state.won);
        assert!(!state.world.wind_bridge.player_on_bridge);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::Teleported { .. })));
    }

    #[test]
    fn test_falling_through_wind_bridge_crashes() {
        let mut state = playing(16);
        let tile = state.world.wind_bridge.tiles[5 * 30 + 5];
        state.world.wind_bridge.tiles[5 * 30 + 5].active = false;
        drop_from(&mut state, Vec3::new(tile.position.x, 25.5, tile.position.z));
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::Crashed);
        assert!(state.events.contains(&GameEvent::Crashed {
            cause: CrashCause::BlownOff
        }));
    }

    #[test]
    fn test_stepper_runs_fixed_ticks() {
        let mut state = playing(17);
        let mut stepper = Stepper::new();
        let mut input = TickInput {
            jump: true,
            ..Default::default()
        };
        let ticks = stepper.advance(&mut state, &mut input, 1.0 / 60.0 + 1e-4);
        assert_eq!(ticks, 2);
        assert!(!input.jump);
        // A huge frame is clamped and capped
        let ticks = stepper.advance(&mut state, &mut input, 5.0);
        assert_eq!(ticks, MAX_SUBSTEPS);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(99);
        let mut b = playing(99);
        let inputs = [
            TickInput {
                movement: Vec2::new(0.3, -0.7),
                sprint: true,
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..400 {
            for input in &inputs {
                tick(&mut a, input, SIM_DT);
                tick(&mut b, input, SIM_DT);
            }
        }
        assert_eq!(a.player.position, b.player.position);
        assert_eq!(a.world.balls.balls.len(), b.world.balls.balls.len());
        assert_eq!(a.world.wind_bridge.wind, b.world.wind_bridge.wind);
    }

    proptest! {
        // P3: cracks never drop within a life and max cracks means crashed
        #[test]
        fn prop_damage_tier_monotonic(drops in prop::collection::vec(0.0f32..2.0, 1..6)) {
            let mut state = playing(21);
            let mut last = 0;
            for extra in drops {
                if state.phase != GamePhase::Playing {
                    break;
                }
                drop_from(&mut state, Vec3::new(0.0, 2.15 + extra, 0.0));
                settle(&mut state, 600);
                let cracks = state.player.shell.cracks;
                prop_assert!(cracks >= last);
                if cracks >= state.tuning.max_cracks {
                    prop_assert_eq!(state.phase, GamePhase::Crashed);
                }
                last = cracks;
            }
        }
    }
}
