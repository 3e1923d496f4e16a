//! Per-frame simulation step
//!
//! Runs the phase state machine: menu screens hit-test their buttons, the
//! level phase drives kinematics, collision and the triggers they report.

use glam::Vec2;

use super::collision::update_player_position;
use super::player::Controls;
use super::state::{GameEvent, GamePhase, GameState};
use super::tilemap::TileFlags;
use crate::audio::SoundEffect;
use crate::ui::ButtonKind;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal input in [-1, 1]
    pub movement: f32,
    /// Jump pressed this frame
    pub jump: bool,
    /// Jump button held
    pub space: bool,
    /// Mouse button pressed this frame
    pub click: bool,
    /// Cursor in screen space, if known
    pub cursor: Option<Vec2>,
    /// Last input came from a gamepad
    pub use_gamepad: bool,
    /// Quit requested (escape or window close)
    pub quit: bool,
    /// Confirm pressed this frame (enter)
    pub next: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.use_gamepad = input.use_gamepad;

    let mut click = input.click;
    let quit = match state.phase {
        GamePhase::MainMenu => {
            state.camera.reset();
            if press(state, ButtonKind::Play, input.cursor, &mut click) || input.next {
                state.start_level();
                false
            } else {
                press(state, ButtonKind::Quit, input.cursor, &mut click)
            }
        }

        GamePhase::InLevel => {
            in_level(state, input, dt);
            false
        }

        GamePhase::LevelComplete => {
            state.camera.reset();
            if press(state, ButtonKind::Next, input.cursor, &mut click) || input.next {
                debug_assert!(!state.is_last_level(), "level complete on the last level");
                state.level = (state.level + 1).min(state.levels.len() - 1);
                state.start_level();
                false
            } else {
                press(state, ButtonKind::Quit, input.cursor, &mut click)
            }
        }

        GamePhase::LevelFailed => {
            state.camera.reset();
            if press(state, ButtonKind::Restart, input.cursor, &mut click) || input.next {
                state.start_level();
                false
            } else {
                press(state, ButtonKind::Quit, input.cursor, &mut click)
            }
        }

        GamePhase::End => {
            state.camera.reset();
            if press(state, ButtonKind::Restart, input.cursor, &mut click) || input.next {
                state.reload_levels();
                state.level = 0;
                state.coin_collected = false;
                state.coin_index = None;
                state.collected_coins.clear();
                state.reset_player();
                state.phase = GamePhase::MainMenu;
                state.push_event(GameEvent::SaveProgress(0));
                log::info!("Back to the main menu, progress reset");
                false
            } else {
                press(state, ButtonKind::Quit, input.cursor, &mut click)
            }
        }
    };

    if quit || input.quit {
        state.push_event(GameEvent::Quit);
    }
}

/// Update one menu button; a press plays the select sound
fn press(state: &mut GameState, kind: ButtonKind, cursor: Option<Vec2>, click: &mut bool) -> bool {
    let pressed = state.menu.button_mut(kind).update(cursor, click);
    if pressed {
        state.push_event(GameEvent::PlaySound(SoundEffect::Select));
    }
    pressed
}

/// One frame of gameplay
pub fn in_level(state: &mut GameState, input: &TickInput, dt: f32) {
    debug_assert_eq!(state.phase, GamePhase::InLevel);
    debug_assert!(state.level < state.levels.len());

    let controls = Controls {
        movement: input.movement,
        jump: input.jump,
        jump_held: input.space,
    };
    let on_ground = state.collision.on_ground;
    if state
        .player
        .apply_controls(&controls, on_ground, dt, &state.tuning)
    {
        state.push_event(GameEvent::PlaySound(SoundEffect::Jump));
    }

    let map = &mut state.levels[state.level];
    state.collision = update_player_position(map, &mut state.player, dt);
    state.player.clamp_speed();

    state.camera.follow(
        state.player.position,
        state.viewport,
        state.tuning.camera_follow_speed,
        dt,
    );

    let touched = state.collision.touched;

    // Coins first so one grabbed on a hazard frame is still put back
    if touched.contains(TileFlags::COIN) {
        if let Some(index) = state.collision.coin_index {
            state.collected_coins.push(index);
            state.coin_index = Some(index);
        }
        state.coin_collected = true;
        state.coin_count += 1;
        state.push_event(GameEvent::PlaySound(SoundEffect::Coin));
        log::debug!("Coins: {}", state.coin_count);
    }

    if touched.contains(TileFlags::END) && state.coin_collected {
        state.player.velocity = Vec2::ZERO;
        state.push_event(GameEvent::PlaySound(SoundEffect::Completed));
        if state.is_last_level() {
            state.phase = GamePhase::End;
            state.push_event(GameEvent::SaveProgress(0));
            log::info!("Finished the last level");
        } else {
            state.phase = GamePhase::LevelComplete;
            state.push_event(GameEvent::SaveProgress(state.level as u32 + 1));
            log::info!("Level {} complete", state.level + 1);
        }
        return;
    }

    if touched.intersects(TileFlags::DEATH | TileFlags::SPIKES) {
        state.restore_coins();
        state.push_event(GameEvent::PlaySound(SoundEffect::Failed));
        state.phase = GamePhase::LevelFailed;
        log::info!("Level {} failed", state.level + 1);
        return;
    }

    state.player.update_animation(dt, &state.tuning);
}
