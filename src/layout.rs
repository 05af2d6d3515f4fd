use crate::position::{UnitRect, ViewportGeometry};
use crate::segment::Unit;

/// Font size that maps to the full column width and single-row gaps.
const BASE_FONT_SIZE: u32 = 16;
const MIN_TEXT_WIDTH: u16 = 10;

/// Width of the text column for a font size. Bigger type, fewer columns.
pub fn text_width(area_width: u16, font_size: u16) -> u16 {
    let font = u32::from(font_size.max(1));
    let scaled = u32::from(area_width) * BASE_FONT_SIZE / font;
    let scaled = u16::try_from(scaled).unwrap_or(u16::MAX);
    scaled.max(MIN_TEXT_WIDTH).min(area_width)
}

/// Blank rows after each unit.
pub fn unit_gap(font_size: u16) -> u16 {
    (u32::from(font_size) / BASE_FONT_SIZE).max(1) as u16
}

/// Greedy word wrap on character counts. Words longer than `width` are
/// split. Always yields at least one row.
pub fn wrap(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word = word;
        let mut word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > width {
            rows.push(std::mem::take(&mut current));
            current_len = 0;
        }

        while word_len > width {
            if current_len > 0 {
                rows.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let split = word
                .char_indices()
                .nth(width)
                .map_or(word.len(), |(idx, _)| idx);
            rows.push(word[..split].to_string());
            word = &word[split..];
            word_len -= width;
        }

        if word_len == 0 {
            continue;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if current_len > 0 || rows.is_empty() {
        rows.push(current);
    }
    rows
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutKey {
    pub width: u16,
    pub height: u16,
    pub font_size: u16,
}

#[derive(Clone, Debug, Default)]
pub struct PlacedUnit {
    pub rows: Vec<String>,
    pub top: u16,
}

/// Row layout of the sequential view.
///
/// Half a viewport of padding sits above the first unit and below the
/// last one so both can be centered.
#[derive(Clone, Debug, Default)]
pub struct ScriptLayout {
    pub units: Vec<PlacedUnit>,
    pub container_height: u16,
    pub content_height: u16,
}

impl ScriptLayout {
    pub fn build(units: &[Unit], width: u16, container_height: u16, font_size: u16) -> Self {
        let gap = unit_gap(font_size);
        let padding = container_height / 2;
        let mut top = padding;
        let mut placed = Vec::with_capacity(units.len());

        for unit in units {
            let rows = wrap(unit.as_str(), width);
            let height = usize_to_u16_saturating(rows.len());
            placed.push(PlacedUnit { rows, top });
            top = top.saturating_add(height).saturating_add(gap);
        }

        Self {
            units: placed,
            container_height,
            content_height: top.saturating_add(padding),
        }
    }

    pub fn max_scroll(&self) -> u16 {
        self.content_height.saturating_sub(self.container_height)
    }

    /// Index of the unit occupying `row`, if any.
    pub fn unit_at_row(&self, row: u16) -> Option<usize> {
        self.units.iter().position(|unit| {
            let end = unit.top.saturating_add(usize_to_u16_saturating(unit.rows.len()));
            row >= unit.top && row < end
        })
    }
}

impl ViewportGeometry for ScriptLayout {
    fn position_of(&self, index: usize) -> Option<UnitRect> {
        self.units.get(index).map(|unit| UnitRect {
            top: f64::from(unit.top),
            height: unit.rows.len() as f64,
        })
    }

    fn container_height(&self) -> f64 {
        f64::from(self.container_height)
    }
}

pub fn usize_to_u16_saturating(value: usize) -> u16 {
    match u16::try_from(value) {
        Ok(v) => v,
        Err(_) => u16::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::centered_offset;
    use crate::segment::segment;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn splits_words_longer_than_the_row() {
        assert_eq!(wrap("abcdefghij xy", 4), vec!["abcd", "efgh", "ij", "xy"]);
        assert_eq!(wrap("ab cdefgh", 4), vec!["ab", "cdef", "gh"]);
    }

    #[test]
    fn wrapping_counts_characters_not_bytes() {
        assert_eq!(wrap("héllo wörld", 5), vec!["héllo", "wörld"]);
    }

    #[test]
    fn blank_text_still_takes_a_row() {
        assert_eq!(wrap("", 8), vec![String::new()]);
    }

    #[test]
    fn font_size_narrows_the_column() {
        assert_eq!(text_width(80, 16), 80);
        assert_eq!(text_width(80, 32), 40);
        assert_eq!(text_width(80, 72), 17);
        assert_eq!(text_width(6, 72), 6);
        assert_eq!(unit_gap(16), 1);
        assert_eq!(unit_gap(32), 2);
        assert_eq!(unit_gap(72), 4);
    }

    #[test]
    fn units_are_stacked_below_half_a_viewport() {
        let units = segment("one\ntwo two two\nthree");
        let layout = ScriptLayout::build(&units, 8, 20, 32);

        let tops: Vec<u16> = layout.units.iter().map(|unit| unit.top).collect();
        assert_eq!(tops, vec![10, 13, 17]);
        assert_eq!(layout.content_height, 30);
        assert_eq!(layout.max_scroll(), 10);
        assert_eq!(layout.unit_at_row(14), Some(1));
        assert_eq!(layout.unit_at_row(16), None);
    }

    #[test]
    fn first_and_last_units_center_within_scroll_range() {
        let units = segment("one\ntwo\nthree");
        let layout = ScriptLayout::build(&units, 20, 20, 16);
        let height = layout.container_height();

        let first = centered_offset(layout.position_of(0).expect("first"), height);
        let last = centered_offset(layout.position_of(2).expect("last"), height);
        assert!(first >= 0.0);
        assert!(last <= f64::from(layout.max_scroll()));
        assert_eq!(layout.position_of(3), None);
    }
}
