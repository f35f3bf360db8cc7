//! Game engine: frame loop, commands and collaborator fan-out
//!
//! One [`GameEngine`] owns one session: the simulation state, the level
//! catalog, the raw input table and the pending frame handle. Nothing here
//! is global, so any number of engines can run side by side.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::AudioSink;
use crate::consts::{FRAME_DT, MAX_FRAME_DT};
use crate::frame::{FrameHandle, FrameScheduler};
use crate::input::{Key, PointerSource};
use crate::render::{FrameSnapshot, Renderer};
use crate::settings::Tuning;
use crate::sim::{GamePhase, GameState, GameStats, LevelManager, TickInput, tick};

pub struct GameEngine {
    state: GameState,
    levels: LevelManager,
    input: TickInput,
    renderer: Box<dyn Renderer>,
    audio: Box<dyn AudioSink>,
    scheduler: Box<dyn FrameScheduler>,
    /// Pending frame request, `Some` while the loop is running
    frame: Option<FrameHandle>,
    last_frame_ms: Option<f64>,
}

impl GameEngine {
    /// Engine with an entropy-seeded RNG, sitting in the menu
    pub fn new(
        tuning: Tuning,
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioSink>,
        scheduler: Box<dyn FrameScheduler>,
    ) -> Self {
        let rng = Pcg32::from_rng(&mut rand::rng());
        Self::with_rng(tuning, renderer, audio, scheduler, rng)
    }

    /// Same as [`GameEngine::new`] but reproducible
    pub fn with_seed(
        tuning: Tuning,
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioSink>,
        scheduler: Box<dyn FrameScheduler>,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            tuning,
            renderer,
            audio,
            scheduler,
            Pcg32::seed_from_u64(seed),
        )
    }

    fn with_rng(
        tuning: Tuning,
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioSink>,
        scheduler: Box<dyn FrameScheduler>,
        mut rng: Pcg32,
    ) -> Self {
        let levels = LevelManager::new(tuning.canvas_width, &mut rng);
        let state = GameState::new(tuning, levels.first().clone(), rng);
        log::info!(
            "Engine ready: {} levels, field {}x{}",
            levels.level_count(),
            state.tuning.canvas_width,
            state.tuning.canvas_height
        );
        Self {
            state,
            levels,
            input: TickInput::default(),
            renderer,
            audio,
            scheduler,
            frame: None,
            last_frame_ms: None,
        }
    }

    // --- Frame loop ---

    /// Begin requesting frames. No-op if already running.
    pub fn start(&mut self) {
        if self.frame.is_some() {
            return;
        }
        self.last_frame_ms = None;
        self.frame = Some(self.scheduler.request_frame());
        log::debug!("Frame loop started");
    }

    /// Stop the loop and release the pending frame request. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
            log::debug!("Frame loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    /// Frame callback. `now_ms` is the host's frame timestamp in milliseconds.
    ///
    /// Runs one tick, renders, and requests the next frame. Callbacks that
    /// arrive after [`GameEngine::stop`] are ignored.
    pub fn frame(&mut self, now_ms: f64) {
        if self.frame.take().is_none() {
            return;
        }

        let dt = match self.last_frame_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => FRAME_DT,
        };
        self.last_frame_ms = Some(now_ms);

        self.step(dt);
        self.renderer.render(&FrameSnapshot::capture(&self.state));

        self.frame = Some(self.scheduler.request_frame());
    }

    /// Advance the simulation by one tick without rendering
    pub fn step(&mut self, dt: f32) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        let before = self.state.phase;
        tick(&mut self.state, &self.input, &self.levels, dt);
        if self.state.phase != before {
            log::debug!("Phase {:?} -> {:?}", before, self.state.phase);
        }
        self.flush_audio();
    }

    fn flush_audio(&mut self) {
        for event in self.state.events.drain(..) {
            if let Err(e) = self.audio.play(event) {
                log::warn!("{e}");
            }
        }
    }

    // --- Commands ---

    /// MENU -> PLAYING
    pub fn start_game(&mut self) {
        if self.state.phase != GamePhase::Menu {
            log::warn!("start ignored in {:?}", self.state.phase);
            return;
        }
        self.state.phase = GamePhase::Playing;
        log::info!("Game started: {}", self.state.level.name);
    }

    /// PLAYING <-> PAUSED
    pub fn toggle_pause(&mut self) {
        self.state.phase = match self.state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => {
                log::warn!("pause ignored in {:?}", other);
                return;
            }
        };
        log::info!("{:?}", self.state.phase);
    }

    /// Fresh stats and the first level, straight into play
    pub fn restart(&mut self) {
        self.state.reset_run(self.levels.first().clone());
        self.state.phase = GamePhase::Playing;
        self.input.held = Default::default();
        log::info!("Restarted on {}", self.state.level.name);
    }

    /// The single "confirm" action: start, pause/resume or restart
    pub fn confirm(&mut self) {
        match self.state.phase {
            GamePhase::Menu => self.start_game(),
            GamePhase::Playing | GamePhase::Paused => self.toggle_pause(),
            phase if phase.is_terminal() => self.restart(),
            phase => log::warn!("confirm ignored in {:?}", phase),
        }
    }

    // --- Input ---

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Confirm => self.confirm(),
            _ => self.input.held.set(key, true),
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.held.set(key, false);
    }

    /// Center the paddle on pointer `x` (play-field pixels).
    ///
    /// Mouse only steers during play; touch steers in any phase.
    pub fn pointer_move(&mut self, x: f32, source: PointerSource) {
        if source == PointerSource::Mouse && self.state.phase != GamePhase::Playing {
            return;
        }
        if !x.is_finite() {
            return;
        }
        let width = self.state.tuning.canvas_width;
        self.state.paddle.center_on(x, width);
    }

    /// Let the demo AI drive the paddle
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    // --- Queries ---

    pub fn state(&self) -> GamePhase {
        self.state.phase
    }

    /// Copy of the run statistics
    pub fn stats(&self) -> GameStats {
        self.state.stats
    }

    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot::capture(&self.state)
    }

    pub fn level_count(&self) -> usize {
        self.levels.level_count()
    }

    pub fn levels(&self) -> &LevelManager {
        &self.levels
    }

    pub fn tuning(&self) -> &Tuning {
        &self.state.tuning
    }

    /// Full simulation state
    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    /// Mutable simulation state, for hosts that stage custom situations
    pub fn game_state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
