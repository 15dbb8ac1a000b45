//! Egg Climb entry point
//!
//! Runs the simulation headless with a scripted walk and logs what happens.
//! Useful for checking a tuning or course file without a renderer.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;

    use egg_climb::Tuning;
    use egg_climb::consts::*;
    use egg_climb::sim::{CourseLayout, GameEvent, GameObserver, GamePhase, GameState, Stepper, TickInput};

    /// Frame time the runner feeds the stepper
    const FRAME_DT: f32 = 1.0 / 60.0;

    #[derive(Parser)]
    #[command(name = "egg-climb")]
    #[command(about = "Run the egg climb simulation headless", long_about = None)]
    struct Cli {
        /// Tuning JSON file (missing fields keep their defaults)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Course layout JSON file (missing sections keep their defaults)
        #[arg(long)]
        course: Option<PathBuf>,
        /// Run seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Simulated seconds to run
        #[arg(long, default_value_t = 30.0)]
        seconds: f32,
        /// Walking direction in degrees, 0 = +Z
        #[arg(long, default_value_t = 0.0)]
        heading: f32,
        /// Jump every this many seconds; 0 never jumps
        #[arg(long, default_value_t = 1.5)]
        jump_every: f32,
        #[arg(long)]
        sprint: bool,
        /// Print the effective course as JSON and exit
        #[arg(long)]
        dump_course: bool,
    }

    /// Logs every event the simulation reports
    #[derive(Default)]
    struct LogObserver {
        worst_cracks: u8,
        tiles_broken: usize,
    }

    impl GameObserver for LogObserver {
        fn on_damage_tier_changed(&mut self, cracks: u8) {
            self.worst_cracks = self.worst_cracks.max(cracks);
            log::info!("Damage tier now {cracks}");
        }

        fn on_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::TileBroken { .. } => {
                    self.tiles_broken += 1;
                    log::info!("{event:?}");
                }
                GameEvent::DamageTierChanged { .. } => {}
                _ => log::info!("{event:?}"),
            }
        }
    }

    pub fn run() {
        let cli = Cli::parse();

        let tuning = cli
            .tuning
            .as_deref()
            .map(Tuning::load)
            .unwrap_or_default();
        let course = cli
            .course
            .as_deref()
            .map(CourseLayout::load)
            .unwrap_or_default();

        if cli.dump_course {
            match course.to_json() {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Could not serialize course: {e}"),
            }
            return;
        }

        let mut state = GameState::with_course(cli.seed, tuning, &course);
        log::info!("Game initialized with seed: {}", cli.seed);

        let mut stepper = Stepper::new();
        let mut observer = LogObserver::default();
        let mut input = TickInput {
            confirm: true,
            ..Default::default()
        };
        let heading = Vec2::from_angle(cli.heading.to_radians());
        // from_angle measures from +X; rotate so 0 degrees walks along +Z
        let direction = Vec2::new(heading.y, heading.x);

        let frames = (cli.seconds / FRAME_DT).ceil() as u64;
        let mut since_jump = 0.0;
        for _ in 0..frames {
            if state.phase == GamePhase::Playing {
                input.movement = direction;
                input.sprint = cli.sprint;
                input.climb = 1.0;
                since_jump += FRAME_DT;
                if cli.jump_every > 0.0 && since_jump >= cli.jump_every {
                    input.jump = true;
                    since_jump = 0.0;
                }
            }

            stepper.advance(&mut state, &mut input, FRAME_DT);
            state.dispatch_events(&mut observer);

            if state.phase == GamePhase::Crashed && state.crash_progress() >= 1.0 {
                break;
            }
        }

        let p = state.player.position;
        println!(
            "phase={:?} won={} cracks={}/{} worst={} tiles_broken={} ticks={} time={:.2}s position=({:.2}, {:.2}, {:.2})",
            state.phase,
            state.won,
            state.player.shell.cracks,
            state.tuning.max_cracks,
            observer.worst_cracks,
            observer.tiles_broken,
            state.time_ticks,
            state.time,
            p.x,
            p.y,
            p.z,
        );
        log::debug!("Simulated at {:.0} Hz", 1.0 / SIM_DT);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Egg Climb (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the embedding page on the web
}
