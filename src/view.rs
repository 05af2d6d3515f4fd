/// The three mutually exclusive presentation variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    /// Script is editable; units and the active index are not shown.
    Edit,
    /// Every unit is listed, the active one highlighted and kept centered.
    Sequential,
    /// Only the active unit is shown, statically centered. Nothing scrolls.
    Focus,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Sequential => "scroll",
            Self::Focus => "focus",
        }
    }

    pub fn scrolls(self) -> bool {
        matches!(self, Self::Sequential)
    }
}

pub fn select_view(is_playing: bool, focus_mode: bool) -> View {
    match (is_playing, focus_mode) {
        (false, _) => View::Edit,
        (true, false) => View::Sequential,
        (true, true) => View::Focus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_always_edits() {
        assert_eq!(select_view(false, false), View::Edit);
        assert_eq!(select_view(false, true), View::Edit);
    }

    #[test]
    fn playing_picks_by_focus_flag() {
        assert_eq!(select_view(true, false), View::Sequential);
        assert_eq!(select_view(true, true), View::Focus);
    }

    #[test]
    fn only_sequential_scrolls() {
        assert!(View::Sequential.scrolls());
        assert!(!View::Focus.scrolls());
        assert!(!View::Edit.scrolls());
    }
}
