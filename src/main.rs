//! Calendar Breaker headless runner
//!
//! Plays a full run on autopilot with no window and no sound device, then
//! prints the final stats as JSON. Pass a tuning JSON file as the first
//! argument to override the defaults. Set `RUST_LOG=debug` to watch it play
//! and `CALENDAR_BREAKER_AUDIO=mute` to silence the sound log.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use calendar_breaker::{
        GameEngine, LogAudio, ManualScheduler, NullRenderer, Tuning, audio::or_silent,
        sim::GamePhase,
    };

    /// Give up after ten minutes of simulated play
    const MAX_FRAMES: u64 = 60 * 60 * 10;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Headless audio backend: `log` (default) or `mute`
    const AUDIO_ENV: &str = "CALENDAR_BREAKER_AUDIO";

    env_logger::init();

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load(&path).unwrap_or_else(|e| {
            log::error!("Could not load tuning from {path}: {e}; using defaults");
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    let backend = std::env::var(AUDIO_ENV).unwrap_or_default();
    let audio = or_silent(LogAudio::for_backend(&backend));

    let mut engine = GameEngine::new(
        tuning,
        Box::new(NullRenderer),
        audio,
        Box::new(ManualScheduler::new()),
    );
    engine.set_autopilot(true);
    engine.start_game();
    engine.start();

    let mut frames = 0;
    while frames < MAX_FRAMES
        && !matches!(engine.state(), GamePhase::GameOver | GamePhase::Victory)
    {
        engine.frame(frames as f64 * FRAME_MS);
        frames += 1;
    }
    engine.stop();

    let stats = engine.stats();
    log::info!(
        "Finished in {:?} after {} frames ({:.1}s of play)",
        engine.state(),
        frames,
        stats.time_elapsed
    );
    match serde_json::to_string_pretty(&stats) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize stats: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web shell drives GameEngine directly through the library
}
