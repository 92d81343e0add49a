use macroquad::prelude::*;

use crate::editor::{Command, InsertionMode};

const REPEAT_DELAY: f32 = 0.4;
const REPEAT_RATE: f32 = 0.05;

/// Left mouse button phase for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Up,
    Pressed,
    Held,
    Released,
}

/// Everything the editor reads from the host in one frame.
#[derive(Clone, Debug)]
pub struct FrameInput {
    pub pointer: Vec2,
    pub button: ButtonState,
    /// `(rows, columns)`; negative values scroll up or left.
    pub scroll: (i32, i32),
    pub commands: Vec<Command>,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::pointer(Vec2::ZERO, ButtonState::Up)
    }

    pub fn pointer(pointer: Vec2, button: ButtonState) -> Self {
        Self {
            pointer,
            button,
            scroll: (0, 0),
            commands: Vec::new(),
        }
    }
}

/// Tracks how long each scroll key has been held.
pub(crate) struct InputState {
    held: [f32; 4],
}

impl InputState {
    pub(crate) fn new() -> Self {
        Self { held: [0.0; 4] }
    }

    /// Samples mouse and keyboard for this frame.
    pub(crate) fn poll(&mut self, dt: f32) -> FrameInput {
        let (mx, my) = mouse_position();
        let button = if is_mouse_button_pressed(MouseButton::Left) {
            ButtonState::Pressed
        } else if is_mouse_button_down(MouseButton::Left) {
            ButtonState::Held
        } else if is_mouse_button_released(MouseButton::Left) {
            ButtonState::Released
        } else {
            ButtonState::Up
        };
        let mut frame = FrameInput::pointer(vec2(mx, my), button);

        let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);
        let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

        if ctrl {
            if is_key_pressed(KeyCode::S) {
                frame.commands.push(Command::Save);
            }
            return frame;
        }

        for mode in InsertionMode::all() {
            if let Some(key) = digit_key(mode.key())
                && is_key_pressed(key)
            {
                frame.commands.push(Command::SetMode(mode));
            }
        }
        for (key, command) in [
            (KeyCode::Delete, Command::DeleteSelection),
            (KeyCode::Escape, Command::ClearSelection),
            (KeyCode::F, Command::FillSelection),
            (KeyCode::G, Command::ToggleGrid),
        ] {
            if is_key_pressed(key) {
                frame.commands.push(command);
            }
        }
        if is_key_pressed(KeyCode::C) {
            let delta = if shift { -1 } else { 1 };
            frame.commands.push(Command::AdjustBrushColor(delta));
        }

        // Shift scrolls every frame while held; otherwise keys repeat.
        for (i, (keys, (dr, dc))) in [
            ([KeyCode::W, KeyCode::Up], (-1, 0)),
            ([KeyCode::S, KeyCode::Down], (1, 0)),
            ([KeyCode::A, KeyCode::Left], (0, -1)),
            ([KeyCode::D, KeyCode::Right], (0, 1)),
        ]
        .into_iter()
        .enumerate()
        {
            let down = keys.iter().any(|&k| is_key_down(k));
            let pressed = keys.iter().any(|&k| is_key_pressed(k));
            let repeat = input_repeat(down, pressed, &mut self.held[i], dt);
            if (shift && down) || repeat {
                frame.scroll.0 += dr;
                frame.scroll.1 += dc;
            }
        }

        let (_, wheel) = mouse_wheel();
        if wheel != 0.0 {
            let step = if wheel > 0.0 { -1 } else { 1 };
            if shift {
                frame.scroll.1 += step;
            } else {
                frame.scroll.0 += step;
            }
        }

        frame
    }
}

fn digit_key(c: char) -> Option<KeyCode> {
    Some(match c {
        '1' => KeyCode::Key1,
        '2' => KeyCode::Key2,
        '3' => KeyCode::Key3,
        '4' => KeyCode::Key4,
        '5' => KeyCode::Key5,
        '6' => KeyCode::Key6,
        _ => return None,
    })
}

fn input_repeat(down: bool, pressed: bool, held: &mut f32, dt: f32) -> bool {
    if down {
        *held += dt;
        pressed || (*held > REPEAT_DELAY && *held % REPEAT_RATE < dt)
    } else {
        *held = 0.0;
        false
    }
}
