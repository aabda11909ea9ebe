//! Playroom entry point
//!
//! On the web this wires logging, visibility and the wake lock; the page
//! drives the games. Natively it runs a headless demo of both games, which
//! is handy for checking tuning and persistence from a terminal.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use playroom::Settings;
    use playroom::platform::{FrameLoop, WakeLock, web};

    web::init_logging();
    log::info!("Playroom starting...");

    let settings = Settings::load();
    let frames = Rc::new(RefCell::new(FrameLoop::default()));
    let lock = Rc::new(RefCell::new(WakeLock::new()));

    frames.borrow_mut().on_visibility(web::is_visible());
    if settings.wake_lock {
        web::acquire_wake_lock(lock.clone());
    }
    web::watch_visibility(frames, lock);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    env_logger::init();
    log::info!("Playroom (native) starting...");

    // playroom [cards.json] [settings.json] [data-dir]
    let mut args = std::env::args().skip(1);
    let catalog_path = PathBuf::from(args.next().unwrap_or_else(|| "cards.json".into()));
    let settings_path = PathBuf::from(args.next().unwrap_or_else(|| "playroom.json".into()));
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| ".playroom".into()));

    let settings = playroom::Settings::load_from(&settings_path);
    let catalog = playroom::Catalog::load_file(&catalog_path);
    let seed = playroom::now_ms();

    native::play_spelling(&catalog, &settings, &data_dir, seed);
    native::play_pong(&settings, seed);
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;

    use playroom::consts::*;
    use playroom::persistence::{FileStore, ProgressEndpoint, ProgressSync};
    use playroom::platform::FrameLoop;
    use playroom::pong::{PongEvent, PongPhase, PongState, TickInput, tick};
    use playroom::sim::Bounds;
    use playroom::spelling::{SpellingRound, SpellingSession, TapOutcome};
    use playroom::{Catalog, Settings};

    /// Give up on a round after this many simulated seconds
    const ROUND_TIMEOUT_SECS: f32 = 60.0;
    const PONG_SECS: f32 = 120.0;

    pub fn play_spelling(catalog: &Catalog, settings: &Settings, data_dir: &Path, seed: u64) {
        let local = FileStore::new(data_dir.join("cache"));
        let remote = ProgressEndpoint::new(FileStore::new(data_dir.join("remote")));
        let mut sync = ProgressSync::new(local, Some(remote));

        let book = sync.load();
        let mut session = SpellingSession::start(catalog, book, settings.clone(), Bounds::new(800.0, 600.0), seed);

        // Fumble the first word once so both outcomes show up
        let mut fumble = true;
        while let Some(round) = session.next_round() {
            autoplay(round, fumble);
            fumble = false;

            if let Some(result) = session.record_round(playroom::now_ms()) {
                log::info!(
                    "{}: {} (score {})",
                    result.item_id,
                    if result.correct { "correct" } else { "with mistakes" },
                    result.new_score
                );
                let status = sync.save(session.book());
                log::debug!("Saved progress: {:?}", status);
            }
        }

        let book = session.book();
        log::info!(
            "Spelling done: {} words practised, {} mastered",
            session.results().len(),
            book.mastered_count(settings.mastery_threshold)
        );
    }

    /// Tap letters in order at a steady pace until the word is spelled
    fn autoplay(round: &mut SpellingRound, mut fumble: bool) {
        let mut frames = FrameLoop::default();
        let mut elapsed = 0.0;
        let mut cooldown = 0.0;

        while !round.is_complete() && elapsed < ROUND_TIMEOUT_SECS {
            for _ in 0..frames.advance(SIM_DT) {
                elapsed += SIM_DT;
                cooldown -= SIM_DT;

                if cooldown <= 0.0
                    && let Some(expected) = round.expected_letter()
                {
                    let pick = round
                        .world
                        .bodies()
                        .iter()
                        .find(|b| b.is_free() && (b.label == expected) != fumble)
                        .map(|b| b.id);
                    if let Some(id) = pick {
                        match round.tap(id) {
                            TapOutcome::Wrong => fumble = false,
                            TapOutcome::Correct { .. } | TapOutcome::Ignored => {}
                        }
                        cooldown = 0.4;
                    } else {
                        // No decoys on the board to fumble with
                        fumble = false;
                    }
                }

                round.update(SIM_DT);
            }
        }

        if !round.is_complete() {
            log::warn!("Gave up on '{}' after {:.0}s", round.word(), elapsed);
        }
    }

    pub fn play_pong(settings: &Settings, seed: u64) {
        let bounds = Bounds::new(PONG_WIDTH, PONG_HEIGHT);
        let mut state = PongState::new(seed, bounds, settings.start_level);
        state.tilt_sensitivity = settings.tilt_sensitivity;

        let mut frames = FrameLoop::default();
        let mut input = TickInput::default();
        let mut elapsed = 0.0;

        while elapsed < PONG_SECS && state.phase != PongPhase::GameOver {
            for _ in 0..frames.advance(SIM_DT) {
                elapsed += SIM_DT;

                // Lean toward the ball, a bit lazily
                let offset = state.ball.pos.x - state.player.x;
                input.tilt = (offset / (PADDLE_WIDTH * 1.5)).clamp(-1.0, 1.0);
                input.launch = state.phase == PongPhase::Serve;

                for event in tick(&mut state, &input, SIM_DT) {
                    match event {
                        PongEvent::Point { scorer } => {
                            log::debug!("Point to {:?}: {}-{}", scorer, state.player_points, state.opponent_points)
                        }
                        PongEvent::LevelUp { level } => log::info!("Reached level {}", level),
                        PongEvent::GameOver => log::info!("Game over"),
                        PongEvent::WallHit | PongEvent::PaddleHit { .. } => {}
                    }
                }
            }
        }

        log::info!(
            "Pong done after {:.0}s: level {}, {} levels cleared",
            elapsed,
            state.level.level,
            state.levels_cleared
        );
    }
}
