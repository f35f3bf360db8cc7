//! End-to-end scenarios driven through the public engine surface

use std::cell::RefCell;
use std::rc::Rc;

use calendar_breaker::consts::FRAME_DT;
use calendar_breaker::sim::{
    Dimensions, GamePhase, GameStats, MeetingBlock, MeetingType, PowerUp, PowerUpKind,
};
use calendar_breaker::{
    AudioError, AudioSink, FrameHandle, FrameScheduler, FrameSnapshot, GameEngine, Key,
    ManualScheduler, PointerSource, Renderer, SoundEvent, Tuning,
};
use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
struct Frame {
    phase: GamePhase,
    blocks: usize,
    stats: GameStats,
}

#[derive(Clone, Default)]
struct RecordingRenderer(Rc<RefCell<Vec<Frame>>>);

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &FrameSnapshot<'_>) {
        self.0.borrow_mut().push(Frame {
            phase: frame.phase,
            blocks: frame.blocks.len(),
            stats: frame.stats,
        });
    }
}

#[derive(Clone, Default)]
struct RecordingAudio(Rc<RefCell<Vec<SoundEvent>>>);

impl AudioSink for RecordingAudio {
    fn play(&mut self, event: SoundEvent) -> Result<(), AudioError> {
        self.0.borrow_mut().push(event);
        Ok(())
    }
}

/// Sink whose device went away
struct BrokenAudio;

impl AudioSink for BrokenAudio {
    fn play(&mut self, event: SoundEvent) -> Result<(), AudioError> {
        Err(AudioError::Playback {
            event,
            reason: "device lost".into(),
        })
    }
}

#[derive(Clone, Default)]
struct SharedScheduler(Rc<RefCell<ManualScheduler>>);

impl FrameScheduler for SharedScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.0.borrow_mut().request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.0.borrow_mut().cancel_frame(handle);
    }
}

struct Harness {
    engine: GameEngine,
    frames: Rc<RefCell<Vec<Frame>>>,
    sounds: Rc<RefCell<Vec<SoundEvent>>>,
    scheduler: Rc<RefCell<ManualScheduler>>,
    now_ms: f64,
}

impl Harness {
    fn new(seed: u64) -> Self {
        let renderer = RecordingRenderer::default();
        let audio = RecordingAudio::default();
        let scheduler = SharedScheduler::default();
        let frames = renderer.0.clone();
        let sounds = audio.0.clone();
        let pending = scheduler.0.clone();
        let engine = GameEngine::with_seed(
            Tuning::default(),
            Box::new(renderer),
            Box::new(audio),
            Box::new(scheduler),
            seed,
        );
        Self {
            engine,
            frames,
            sounds,
            scheduler: pending,
            now_ms: 0.0,
        }
    }

    fn playing(seed: u64) -> Self {
        let mut harness = Self::new(seed);
        harness.engine.key_down(Key::Confirm);
        harness.engine.key_up(Key::Confirm);
        harness.engine.start();
        harness
    }

    /// Deliver one 60 Hz frame callback
    fn frame(&mut self) {
        self.now_ms += 1000.0 / 60.0;
        self.engine.frame(self.now_ms);
    }

    fn count(&self, event: SoundEvent) -> usize {
        self.sounds.borrow().iter().filter(|e| **e == event).count()
    }

    /// A single standup right above a rising ball, plus one far away
    fn stage_standup_hit(&mut self, keep_one: bool) {
        let state = self.engine.game_state_mut();
        state.blocks = vec![standup(1, 10.0)];
        if keep_one {
            state.blocks.push(standup(2, 800.0));
        }
        state.ball.pos = Vec2::new(71.0, 155.0);
        state.ball.vel = Vec2::new(0.0, -6.0);
    }

    fn drop_ball(&mut self) {
        let ball = &mut self.engine.game_state_mut().ball;
        ball.pos = Vec2::new(500.0, 760.0);
        ball.vel = Vec2::new(0.0, 6.0);
    }
}

fn standup(id: u32, x: f32) -> MeetingBlock {
    MeetingBlock {
        id,
        pos: Vec2::new(x, 100.0),
        size: Dimensions::new(122.0, 45.0),
        kind: MeetingType::Standup,
        hits: 0,
        max_hits: 1,
        color: 0x3b82f6,
        title: "standup".to_string(),
    }
}

#[test]
fn standup_hit_head_on() {
    let mut h = Harness::playing(1);
    h.stage_standup_hit(true);
    h.frame();

    let stats = h.engine.stats();
    assert_eq!(stats.score, 100);
    assert_eq!(stats.meetings_cancelled, 1);
    assert_eq!(h.engine.game_state().blocks.len(), 1);
    assert!(h.engine.game_state().blocks.iter().all(|b| b.id != 1));
    assert_eq!(h.count(SoundEvent::MeetingCancelled), 1);

    let frames = h.frames.borrow();
    let last = frames.last().unwrap();
    assert_eq!(last.blocks, 1);
    assert_eq!(last.stats.score, 100);
}

#[test]
fn last_life_lost_is_game_over() {
    let mut h = Harness::playing(2);
    h.engine.game_state_mut().stats.lives = 1;
    h.drop_ball();
    h.frame();

    assert_eq!(h.engine.stats().lives, 0);
    assert_eq!(h.engine.state(), GamePhase::GameOver);
    assert_eq!(h.count(SoundEvent::GameOver), 1);

    // Nothing moves until a restart
    let ball = h.engine.game_state().ball.pos;
    h.frame();
    assert_eq!(h.engine.game_state().ball.pos, ball);

    h.engine.key_down(Key::Confirm);
    assert_eq!(h.engine.state(), GamePhase::Playing);
    assert_eq!(h.engine.stats().lives, 3);
    assert_eq!(h.engine.stats().score, 0);
}

#[test]
fn zero_velocity_gets_default_direction() {
    let mut h = Harness::playing(3);
    {
        let ball = &mut h.engine.game_state_mut().ball;
        ball.pos = Vec2::new(500.0, 400.0);
        ball.vel = Vec2::ZERO;
    }
    h.frame();

    let vel = h.engine.game_state().ball.vel;
    assert_eq!(vel, Vec2::new(0.0, -3.0));
    assert_eq!(h.engine.state(), GamePhase::Playing);
}

#[test]
fn level_complete_fires_once_then_loads_next_week() {
    let mut h = Harness::playing(4);
    h.stage_standup_hit(false);
    h.frame();
    assert_eq!(h.engine.state(), GamePhase::LevelComplete);

    let mut frames = 0;
    while h.engine.state() == GamePhase::LevelComplete && frames < 600 {
        h.frame();
        frames += 1;
    }
    assert_eq!(h.count(SoundEvent::LevelComplete), 1);
    assert_eq!(h.engine.state(), GamePhase::Playing);

    let expected = h.engine.levels().level(2).unwrap().meetings.len();
    assert_eq!(h.engine.stats().level, 2);
    assert_eq!(h.engine.game_state().blocks.len(), expected);
    // Stats carry over between weeks
    assert_eq!(h.engine.stats().score, 100);
    assert_eq!(h.engine.stats().lives, 3);
}

#[test]
fn clearing_final_week_is_victory() {
    let mut h = Harness::playing(5);
    for _ in 0..3 {
        h.stage_standup_hit(false);
        h.frame();
        assert_eq!(h.engine.state(), GamePhase::LevelComplete);
        let mut frames = 0;
        while h.engine.state() == GamePhase::LevelComplete && frames < 600 {
            h.frame();
            frames += 1;
        }
    }
    assert_eq!(h.engine.state(), GamePhase::Victory);
    assert_eq!(h.engine.stats().level, 3);
    assert_eq!(h.count(SoundEvent::LevelComplete), 3);

    // Victory only accepts a restart
    h.engine.toggle_pause();
    assert_eq!(h.engine.state(), GamePhase::Victory);
    h.engine.restart();
    assert_eq!(h.engine.state(), GamePhase::Playing);
    assert_eq!(h.engine.stats().level, 1);
}

#[test]
fn life_loss_cancels_pending_effects() {
    let mut h = Harness::playing(6);
    for kind in [PowerUpKind::WidePaddle, PowerUpKind::CoffeeBreak] {
        let state = h.engine.game_state_mut();
        let paddle = state.paddle.clone();
        let id = state.next_entity_id();
        state.power_ups.push(PowerUp {
            id,
            kind,
            pos: Vec2::new(paddle.center_x() - 12.0, paddle.pos.y - 5.0),
            vel: Vec2::new(0.0, 2.0),
            size: Dimensions::new(24.0, 24.0),
        });
        h.frame();
    }
    assert_eq!(h.engine.stats().power_ups_collected, 2);
    assert_eq!(h.engine.game_state().paddle.size.width, 180.0);
    assert_eq!(h.engine.snapshot().effects.len(), 2);

    h.drop_ball();
    h.frame();
    assert_eq!(h.engine.stats().lives, 2);
    assert!(h.engine.game_state().effects.is_empty());
    assert_eq!(h.engine.game_state().paddle.size.width, 120.0);

    // Play past both original expiry times; nothing is reverted again
    for _ in 0..(11.0 / FRAME_DT) as usize {
        let ball = &mut h.engine.game_state_mut().ball;
        ball.pos = Vec2::new(500.0, 400.0);
        ball.vel = Vec2::new(4.0, -6.0);
        h.frame();
    }
    assert_eq!(h.engine.game_state().paddle.size.width, 120.0);
    assert!((h.engine.game_state().ball.vel.length() - 52.0f32.sqrt()).abs() < 1e-3);
}

#[test]
fn pause_freezes_effect_timers() {
    let mut h = Harness::playing(7);
    {
        let state = h.engine.game_state_mut();
        let paddle = state.paddle.clone();
        let id = state.next_entity_id();
        state.power_ups.push(PowerUp {
            id,
            kind: PowerUpKind::WidePaddle,
            pos: Vec2::new(paddle.center_x() - 12.0, paddle.pos.y - 5.0),
            vel: Vec2::new(0.0, 2.0),
            size: Dimensions::new(24.0, 24.0),
        });
    }
    h.frame();
    let elapsed = h.engine.stats().time_elapsed;

    h.engine.toggle_pause();
    for _ in 0..(20.0 / FRAME_DT) as usize {
        h.frame();
    }
    assert_eq!(h.engine.state(), GamePhase::Paused);
    assert_eq!(h.engine.stats().time_elapsed, elapsed);
    assert_eq!(h.engine.game_state().paddle.size.width, 180.0);

    // Every paused frame was still rendered
    assert!(h.frames.borrow().iter().any(|f| f.phase == GamePhase::Paused));
}

#[test]
fn mouse_ignored_outside_play_touch_is_not() {
    let mut h = Harness::new(8);
    let start = h.engine.game_state().paddle.pos.x;
    h.engine.pointer_move(50.0, PointerSource::Mouse);
    assert_eq!(h.engine.game_state().paddle.pos.x, start);

    h.engine.pointer_move(50.0, PointerSource::Touch);
    assert_eq!(h.engine.game_state().paddle.pos.x, 0.0);
}

#[test]
fn broken_audio_does_not_stop_play() {
    let mut engine = GameEngine::with_seed(
        Tuning::default(),
        Box::new(RecordingRenderer::default()),
        Box::new(BrokenAudio),
        Box::new(ManualScheduler::new()),
        9,
    );
    engine.start_game();
    engine.start();
    let before = engine.game_state().ball.pos;
    {
        let ball = &mut engine.game_state_mut().ball;
        ball.pos = Vec2::new(4.0, 400.0);
        ball.vel = Vec2::new(-5.0, 3.0);
    }
    engine.frame(16.0);
    engine.frame(32.0);
    assert_eq!(engine.state(), GamePhase::Playing);
    assert_ne!(engine.game_state().ball.pos, before);
    assert!(engine.is_running());
}

#[test]
fn stop_releases_pending_frame() {
    let mut h = Harness::playing(10);
    h.frame();
    h.frame();
    assert_eq!(h.scheduler.borrow().requested(), 3);
    assert!(h.scheduler.borrow().pending().is_some());

    h.engine.stop();
    h.engine.stop();
    assert_eq!(h.scheduler.borrow().cancelled(), 1);
    assert!(h.scheduler.borrow().pending().is_none());

    let rendered = h.frames.borrow().len();
    h.frame();
    assert_eq!(h.frames.borrow().len(), rendered);
}

#[test]
fn engines_are_independent() {
    let mut a = Harness::playing(11);
    let mut b = Harness::new(11);

    a.engine.key_down(Key::Right);
    for _ in 0..10 {
        a.frame();
    }
    assert_eq!(b.engine.state(), GamePhase::Menu);
    assert_eq!(b.engine.stats().time_elapsed, 0.0);
    assert!(b.frames.borrow().is_empty());
    assert!(a.engine.game_state().paddle.pos.x > b.engine.game_state().paddle.pos.x);

    b.engine.start_game();
    b.engine.start();
    b.frame();
    assert_eq!(a.scheduler.borrow().requested(), 11);
    assert_eq!(b.scheduler.borrow().requested(), 2);
}

#[test]
fn snapshot_serializes_for_the_renderer() {
    let h = Harness::playing(12);
    let json = h.engine.snapshot().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["phase"], "Playing");
    assert_eq!(value["level_name"], "Week 1: New Job");
    assert_eq!(value["stats"]["lives"], 3);
    assert_eq!(
        value["blocks"].as_array().unwrap().len(),
        h.engine.game_state().blocks.len()
    );
}
