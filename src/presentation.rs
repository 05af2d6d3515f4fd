use clap::ValueEnum;

pub const MIN_FONT_SIZE: u16 = 16;
pub const MAX_FONT_SIZE: u16 = 72;
pub const FONT_SIZE_STEP: u16 = 4;
pub const DEFAULT_FONT_SIZE: u16 = 32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// left -> center -> right -> left
    pub fn next(self) -> Self {
        match self {
            Self::Left => Self::Center,
            Self::Center => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl From<Align> for ratatui::layout::Alignment {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => Self::Left,
            Align::Center => Self::Center,
            Align::Right => Self::Right,
        }
    }
}

pub fn clamp_font_size(size: u16) -> u16 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Cosmetic settings. Nothing here affects timing or indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresentationConfig {
    pub font_size: u16,
    pub align: Align,
    pub fullscreen: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            align: Align::Left,
            fullscreen: false,
        }
    }
}
