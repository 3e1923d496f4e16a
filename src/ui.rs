//! Menu buttons
//!
//! Buttons live in screen space (pixels, y-up, origin bottom-left of the
//! backbuffer) and are hit-tested against the cursor once per frame.

use glam::Vec2;

use crate::sim::GamePhase;

/// Half width/height of every menu button
pub const BUTTON_HALF_SIZE: Vec2 = Vec2::new(225.0, 90.0);
/// Height of the quit button's centre above the bottom of the screen
pub const QUIT_BUTTON_Y: f32 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    Play,
    Next,
    Restart,
    Quit,
}

impl ButtonKind {
    /// Sprite file name under the assets directory
    pub fn file_name(self) -> &'static str {
        match self {
            ButtonKind::Play => "play button.bmp",
            ButtonKind::Next => "next button.bmp",
            ButtonKind::Restart => "restart button.bmp",
            ButtonKind::Quit => "quit button.bmp",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub kind: ButtonKind,
    /// Centre in screen space
    pub position: Vec2,
    pub half_size: Vec2,
    pub hovered: bool,
    /// Pressed this frame
    pub pressed: bool,
}

impl Button {
    pub fn new(kind: ButtonKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            half_size: BUTTON_HALF_SIZE,
            hovered: false,
            pressed: false,
        }
    }

    /// Strictly inside the button rectangle
    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.position - self.half_size;
        let max = self.position + self.half_size;
        point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y
    }

    /// Refresh hover state and report a press.
    ///
    /// A press needs the cursor inside and a click; the click is consumed so a
    /// second button under the same cursor cannot fire in the same frame.
    pub fn update(&mut self, cursor: Option<Vec2>, click: &mut bool) -> bool {
        self.pressed = false;
        self.hovered = cursor.is_some_and(|c| self.contains(c));
        if self.hovered && *click {
            *click = false;
            self.pressed = true;
        }
        self.pressed
    }
}

/// Every menu button, laid out for one viewport
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub play: Button,
    pub next: Button,
    pub restart: Button,
    pub quit: Button,
}

impl Menu {
    pub fn new(viewport: Vec2) -> Self {
        let center = viewport * 0.5;
        Self {
            play: Button::new(ButtonKind::Play, center),
            next: Button::new(ButtonKind::Next, center),
            restart: Button::new(ButtonKind::Restart, center),
            quit: Button::new(ButtonKind::Quit, Vec2::new(center.x, QUIT_BUTTON_Y)),
        }
    }

    pub fn button(&self, kind: ButtonKind) -> &Button {
        match kind {
            ButtonKind::Play => &self.play,
            ButtonKind::Next => &self.next,
            ButtonKind::Restart => &self.restart,
            ButtonKind::Quit => &self.quit,
        }
    }

    pub fn button_mut(&mut self, kind: ButtonKind) -> &mut Button {
        match kind {
            ButtonKind::Play => &mut self.play,
            ButtonKind::Next => &mut self.next,
            ButtonKind::Restart => &mut self.restart,
            ButtonKind::Quit => &mut self.quit,
        }
    }
}

/// Buttons shown on a screen: the phase's primary action, then quit
pub fn phase_buttons(phase: GamePhase) -> &'static [ButtonKind] {
    match phase {
        GamePhase::MainMenu => &[ButtonKind::Play, ButtonKind::Quit],
        GamePhase::LevelComplete => &[ButtonKind::Next, ButtonKind::Quit],
        GamePhase::LevelFailed | GamePhase::End => &[ButtonKind::Restart, ButtonKind::Quit],
        GamePhase::InLevel => &[],
    }
}
