//! Per-phase frame composition

use glam::Vec2;

use super::assets::Assets;
use super::framebuffer::{Framebuffer, Rgba};
use super::sprite::draw_sprite;
use crate::consts::TIP_LEVELS;
use crate::sim::{GamePhase, GameState, TileFlags};
use crate::ui::phase_buttons;

/// World position of the tutorial tip sign
pub const TIP_POSITION: Vec2 = Vec2::new(1400.0, 800.0);
/// Tiles this far outside the screen are still drawn
pub const CULL_MARGIN: f32 = 100.0;

/// Draw the whole frame for the current phase
pub fn draw_frame(fb: &mut Framebuffer, state: &GameState, assets: &Assets) {
    fb.clear(Rgba::BLACK);
    let screen_center = Vec2::new(fb.width() as f32, fb.height() as f32) * 0.5;

    if state.phase == GamePhase::InLevel {
        draw_level(fb, state, assets, screen_center);
        return;
    }

    draw_sprite(fb, Vec2::ZERO, assets.screen(state.phase), screen_center);
    for &kind in phase_buttons(state.phase) {
        let button = state.menu.button(kind);
        draw_sprite(fb, Vec2::ZERO, assets.button(kind), button.position);
    }
}

fn draw_level(fb: &mut Framebuffer, state: &GameState, assets: &Assets, screen_center: Vec2) {
    draw_sprite(fb, Vec2::ZERO, &assets.background, screen_center);

    let camera = state.camera.position;
    let view_min = camera - Vec2::splat(CULL_MARGIN);
    let view_max = camera + Vec2::new(fb.width() as f32, fb.height() as f32) + CULL_MARGIN;

    for (tile, pos) in state.current_map().decorations() {
        if pos.x <= view_min.x || pos.x >= view_max.x || pos.y <= view_min.y || pos.y >= view_max.y
        {
            continue;
        }
        let sprite = match tile {
            TileFlags::GROUND => &assets.ground,
            TileFlags::END => &assets.door,
            TileFlags::COIN => &assets.coin,
            TileFlags::SPIKES => &assets.spikes,
            _ => continue,
        };
        draw_sprite(fb, camera, sprite, pos);
    }

    if state.level < TIP_LEVELS
        && let Some(tip) = assets.tip(state.level, state.use_gamepad)
    {
        draw_sprite(fb, camera, tip, TIP_POSITION);
    }

    let player = &state.player;
    let frame = assets.player_frame(player.current_animation, player.frame_index());
    draw_sprite(fb, camera, frame, player.position);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::framebuffer::colors;
    use crate::sim::TileMap;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        let map = TileMap::from_rows(
            &[
                vec![TileFlags::START, TileFlags::COIN],
                vec![TileFlags::GROUND, TileFlags::GROUND],
            ],
            96,
        );
        GameState::new(vec![map], 0, Tuning::default(), Vec2::new(640.0, 360.0))
    }

    #[test]
    fn test_menu_draws_buttons() {
        let state = state();
        let assets = Assets::placeholder(640, 360, 96, &Tuning::default());
        let mut fb = Framebuffer::new(640, 360);
        draw_frame(&mut fb, &state, &assets);

        // Button border at the play button's left edge, menu colour elsewhere
        let play = state.menu.play.position;
        let x = (play.x - 225.0) as u32;
        assert_eq!(fb.get(x, play.y as u32), Some(colors::BUTTON_BORDER));
        assert_eq!(fb.get(2, 350), Some(colors::MENU));
    }

    #[test]
    fn test_level_draws_tiles_and_player() {
        let mut state = state();
        state.start_level();
        // Put the world origin at the screen's bottom-left
        state.camera.position = Vec2::new(-200.0, -100.0);

        let assets = Assets::placeholder(640, 360, 96, &Tuning::default());
        let mut fb = Framebuffer::new(640, 360);
        draw_frame(&mut fb, &state, &assets);

        // Ground tile (1, 0) centred on world (96, 0) -> screen (296, 100)
        assert_eq!(fb.get(296, 100), Some(colors::GRASS));
        // Player centre
        let p = state.player.position - state.camera.position;
        assert_eq!(fb.get(p.x as u32, p.y as u32), Some(colors::PLAYER));
        // Empty sky
        assert_eq!(fb.get(630, 350), Some(colors::SKY));
    }
}
