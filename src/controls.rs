use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::Intent;
use crate::playback::{clamp_speed, PlaybackState, SPEED_STEP};
use crate::presentation::{clamp_font_size, PresentationConfig, FONT_SIZE_STEP};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    Intent(Intent),
    /// Key belongs to the script editor.
    Edit(KeyEvent),
    Quit,
    None,
}

/// Next speed one step up or down, kept on the 0.1 grid.
pub fn step_speed(speed: f64, up: bool) -> f64 {
    let delta = if up { SPEED_STEP } else { -SPEED_STEP };
    clamp_speed(((speed + delta) * 10.0).round() / 10.0)
}

pub fn step_font_size(size: u16, up: bool) -> u16 {
    if up {
        clamp_font_size(size.saturating_add(FONT_SIZE_STEP))
    } else {
        clamp_font_size(size.saturating_sub(FONT_SIZE_STEP))
    }
}

/// Translate a key press into an action.
///
/// Ctrl chords work in every view. While playing nothing is editable, so
/// bare keys are accepted as shortcuts too; otherwise they go to the editor.
pub fn map_key(key: KeyEvent, state: PlaybackState, config: PresentationConfig) -> Action {
    let speed_up = Action::Intent(Intent::SetSpeed(step_speed(state.speed, true)));
    let speed_down = Action::Intent(Intent::SetSpeed(step_speed(state.speed, false)));
    let font_up = Action::Intent(Intent::SetFontSize(step_font_size(config.font_size, true)));
    let font_down = Action::Intent(Intent::SetFontSize(step_font_size(config.font_size, false)));

    if key.code == KeyCode::F(11) {
        return Action::Intent(Intent::ToggleFullscreen);
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('p') => Action::Intent(Intent::PlayToggle),
            KeyCode::Char('r') => Action::Intent(Intent::Reset),
            KeyCode::Char('a') => Action::Intent(Intent::CycleAlign),
            KeyCode::Char('f') => Action::Intent(Intent::ToggleFocus),
            KeyCode::Char('l') => Action::Intent(Intent::ToggleFullscreen),
            KeyCode::Char('q' | 'c') => Action::Quit,
            KeyCode::Right => speed_up,
            KeyCode::Left => speed_down,
            KeyCode::Up => font_up,
            KeyCode::Down => font_down,
            _ => Action::None,
        };
    }

    if !state.is_playing {
        return Action::Edit(key);
    }

    match key.code {
        KeyCode::Char(' ') => Action::Intent(Intent::PlayToggle),
        KeyCode::Char('r') => Action::Intent(Intent::Reset),
        KeyCode::Char('a') => Action::Intent(Intent::CycleAlign),
        KeyCode::Char('f') => Action::Intent(Intent::ToggleFocus),
        KeyCode::Char('F') => Action::Intent(Intent::ToggleFullscreen),
        KeyCode::Char('+' | '=') | KeyCode::Right => speed_up,
        KeyCode::Char('-') | KeyCode::Left => speed_down,
        KeyCode::Char(']') | KeyCode::Up => font_up,
        KeyCode::Char('[') | KeyCode::Down => font_down,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}
