//! Engine: owns the game state and its services and runs frames
//!
//! One frame is: drain input, apply a resize, tick the simulation, dispatch
//! the events it raised, draw. Everything happens on the calling thread.

use glam::Vec2;

use crate::audio::{AudioManager, SoundEffect};
use crate::consts::EVENT_QUEUE_CAPACITY;
use crate::error::EngineError;
use crate::persistence::Progress;
use crate::platform::{EventSender, FramePacer, HeadlessPlatform, InputCollector, event_queue};
use crate::renderer::{Assets, Framebuffer, draw_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TileMap, tick};

/// Running game instance
pub struct Engine {
    pub state: GameState,
    audio: AudioManager,
    progress: Progress,
    input: InputCollector,
    sender: EventSender,
    framebuffer: Framebuffer,
    assets: Assets,
    pacer: FramePacer,
    running: bool,
    frames: u64,
}

impl Engine {
    /// Build the engine and resume from saved progress.
    ///
    /// Starts the theme music and leaves the game on the main menu.
    pub fn new(
        settings: &Settings,
        levels: Vec<TileMap>,
        assets: Assets,
        audio: AudioManager,
        progress: Progress,
        pacer: FramePacer,
    ) -> Result<Self, EngineError> {
        if levels.is_empty() {
            return Err(EngineError::EmptyLevelList);
        }

        let level = progress.load(levels.len());
        let viewport = Vec2::new(settings.buffer_width as f32, settings.buffer_height as f32);
        let state = GameState::new(levels, level, settings.tuning.clone(), viewport);
        let (sender, receiver) = event_queue(EVENT_QUEUE_CAPACITY);

        let mut engine = Self {
            state,
            audio,
            progress,
            input: InputCollector::new(receiver),
            sender,
            framebuffer: Framebuffer::new(settings.buffer_width, settings.buffer_height),
            assets,
            pacer,
            running: true,
            frames: 0,
        };
        engine.audio.play(SoundEffect::Theme);
        log::info!(
            "Engine ready: {} levels, starting at level {} (progress in {})",
            engine.state.levels.len(),
            level + 1,
            engine.progress.path().display()
        );
        Ok(engine)
    }

    /// Producer handle for a platform layer to push input into
    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Run one frame with the given delta time (seconds)
    pub fn run_frame(&mut self, dt: f32) {
        let input = self.input.drain();

        if let Some((width, height)) = self.input.take_resize() {
            self.state.set_viewport(Vec2::new(width as f32, height as f32));
            self.framebuffer.resize(width, height);
        }

        tick(&mut self.state, &input, dt);

        for event in self.state.drain_events() {
            self.handle_event(event);
        }

        draw_frame(&mut self.framebuffer, &self.state, &self.assets);
        self.frames += 1;
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::PlaySound(effect) => self.audio.play(effect),
            GameEvent::SaveProgress(level) => {
                if let Err(e) = self.progress.save(level) {
                    log::error!("Failed to save progress: {}", e);
                }
            }
            GameEvent::Quit => {
                log::info!("Quit requested");
                self.running = false;
            }
        }
    }

    /// Loop until quit, or until `max_frames` frames have run.
    ///
    /// A headless platform, if given, injects its scripted events before
    /// each frame. Returns the number of frames run by this call.
    pub fn run(
        &mut self,
        max_frames: Option<u64>,
        mut platform: Option<&mut HeadlessPlatform>,
    ) -> u64 {
        let start = self.frames;
        let mut dt = self.pacer.target().as_secs_f32();

        while self.running {
            if max_frames.is_some_and(|max| self.frames - start >= max) {
                break;
            }
            if let Some(platform) = platform.as_deref_mut() {
                platform.pump();
            }
            self.run_frame(dt);
            dt = self.pacer.finish_frame();
        }

        let ran = self.frames - start;
        log::info!("Stopped after {} frames", ran);
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingBackend;
    use crate::platform::{Key, PlatformEvent, ReplayScript};
    use crate::sim::{GamePhase, TileFlags};

    fn engine(dir: &std::path::Path) -> (Engine, RecordingBackend) {
        let settings = Settings {
            buffer_width: 320,
            buffer_height: 180,
            ..Settings::default()
        };
        let map = TileMap::from_rows(
            &[
                vec![TileFlags::START, TileFlags::EMPTY],
                vec![TileFlags::GROUND, TileFlags::GROUND],
            ],
            96,
        );
        let backend = RecordingBackend::new();
        let audio = AudioManager::new(Box::new(backend.clone()), &settings);
        let assets = Assets::placeholder(320, 180, 96, &settings.tuning);
        let engine = Engine::new(
            &settings,
            vec![map],
            assets,
            audio,
            Progress::new(dir.join("progress.txt")),
            FramePacer::fixed(60),
        )
        .unwrap();
        (engine, backend)
    }

    #[test]
    fn test_theme_plays_at_start() {
        let dir = tempfile::tempdir().unwrap();
        let (_engine, backend) = engine(dir.path());
        assert_eq!(backend.effects(), vec![SoundEffect::Theme]);
    }

    #[test]
    fn test_no_levels_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        let audio = AudioManager::new(Box::new(RecordingBackend::new()), &settings);
        let result = Engine::new(
            &settings,
            Vec::new(),
            Assets::placeholder(8, 8, 96, &settings.tuning),
            audio,
            Progress::new(dir.path().join("progress.txt")),
            FramePacer::fixed(60),
        );
        assert!(matches!(result, Err(EngineError::EmptyLevelList)));
    }

    #[test]
    fn test_enter_starts_level() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, _) = engine(dir.path());
        let tx = engine.event_sender();
        tx.send(PlatformEvent::KeyDown {
            key: Key::Enter,
            repeat: false,
        });
        engine.run_frame(1.0 / 60.0);
        assert_eq!(engine.state.phase, GamePhase::InLevel);
    }

    #[test]
    fn test_close_stops_loop() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, _) = engine(dir.path());
        let script: ReplayScript =
            serde_json::from_str(r#"[{ "frame": 3, "events": ["CloseRequested"] }]"#).unwrap();
        let mut platform = HeadlessPlatform::new(script, engine.event_sender());

        let ran = engine.run(Some(100), Some(&mut platform));
        assert_eq!(ran, 4);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_frame_limit() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, _) = engine(dir.path());
        assert_eq!(engine.run(Some(5), None), 5);
        assert!(engine.is_running());
    }

    #[test]
    fn test_resize_reaches_state_and_framebuffer() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, _) = engine(dir.path());
        engine.event_sender().send(PlatformEvent::Resized {
            width: 200,
            height: 100,
        });
        engine.run_frame(1.0 / 60.0);
        assert_eq!(engine.framebuffer().width(), 200);
        assert_eq!(engine.state.viewport, Vec2::new(200.0, 100.0));
        assert_eq!(engine.state.menu.play.position, Vec2::new(100.0, 50.0));
    }
}
