// Copyright (c) 2026 rezky_nightky

use crossterm::event::{KeyCode, KeyModifiers};

use atmos::WeatherMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    Quit,
    TogglePause,
    Weather(WeatherMode),
    Pan(f32, f32),
    Turn(f32),
    Tilt(f32),
    Faster,
    Slower,
}

pub fn key_action(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyAction> {
    let turn = std::f32::consts::PI / 16.0;
    match (code, modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => Some(KeyAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(KeyAction::Quit),
        (KeyCode::Char('p'), _) => Some(KeyAction::TogglePause),
        (KeyCode::Char('r'), _) => Some(KeyAction::Weather(WeatherMode::Raining)),
        (KeyCode::Char('s'), _) => Some(KeyAction::Weather(WeatherMode::Snowing)),
        (KeyCode::Char('n'), _) => Some(KeyAction::Weather(WeatherMode::None)),
        (KeyCode::Left, _) => Some(KeyAction::Pan(-1.0, 0.0)),
        (KeyCode::Right, _) => Some(KeyAction::Pan(1.0, 0.0)),
        (KeyCode::Up, _) => Some(KeyAction::Pan(0.0, -1.0)),
        (KeyCode::Down, _) => Some(KeyAction::Pan(0.0, 1.0)),
        (KeyCode::Char('['), _) => Some(KeyAction::Turn(-turn)),
        (KeyCode::Char(']'), _) => Some(KeyAction::Turn(turn)),
        (KeyCode::PageUp, _) => Some(KeyAction::Tilt(0.05)),
        (KeyCode::PageDown, _) => Some(KeyAction::Tilt(-0.05)),
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), KeyModifiers::SHIFT) => Some(KeyAction::Faster),
        (KeyCode::Char('-'), _) => Some(KeyAction::Slower),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_keys_switch_modes() {
        assert_eq!(
            key_action(KeyCode::Char('s'), KeyModifiers::NONE),
            Some(KeyAction::Weather(WeatherMode::Snowing))
        );
        assert_eq!(
            key_action(KeyCode::Char('n'), KeyModifiers::NONE),
            Some(KeyAction::Weather(WeatherMode::None))
        );
    }

    #[test]
    fn quit_and_unknown_keys() {
        assert_eq!(key_action(KeyCode::Esc, KeyModifiers::NONE), Some(KeyAction::Quit));
        assert_eq!(key_action(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(KeyAction::Quit));
        assert_eq!(key_action(KeyCode::Char('z'), KeyModifiers::NONE), None);
    }
}
