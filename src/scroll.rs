//! Eased scrolling for the sequential view.
//!
//! Smooth commands only move the target; `step` closes a fixed fraction of
//! the remaining distance per frame and snaps once it is under half a row.

use crate::position::ScrollSink;

const SNAP_DISTANCE: f64 = 0.5;

#[derive(Clone, Debug)]
pub struct SmoothScroll {
    offset: f64,
    target: f64,
    max: f64,
    /// Fraction of the remaining distance covered per frame.
    rate: f64,
}

impl SmoothScroll {
    pub fn new(rate: f64) -> Self {
        Self {
            offset: 0.0,
            target: 0.0,
            max: 0.0,
            rate: rate.clamp(0.05, 1.0),
        }
    }

    /// Update the scrollable range; offset and target are clamped into it.
    pub fn set_max(&mut self, max: u16) {
        self.max = f64::from(max);
        self.offset = self.clamp(self.offset);
        self.target = self.clamp(self.target);
    }

    pub fn step(&mut self) {
        let remaining = self.target - self.offset;
        if remaining.abs() < SNAP_DISTANCE {
            self.offset = self.target;
        } else {
            self.offset += remaining * self.rate;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.offset != self.target
    }

    /// Current offset as a whole terminal row.
    pub fn row(&self) -> u16 {
        self.offset.round().clamp(0.0, f64::from(u16::MAX)) as u16
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(0.0, self.max)
    }
}

impl ScrollSink for SmoothScroll {
    fn scroll_to(&mut self, offset: f64, smooth: bool) {
        self.target = self.clamp(offset);
        if !smooth {
            self.offset = self.target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_scroll_eases_toward_target() {
        let mut scroll = SmoothScroll::new(0.5);
        scroll.set_max(100);
        scroll.scroll_to(40.0, true);
        assert_eq!(scroll.offset, 0.0);
        assert!(scroll.is_animating());

        scroll.step();
        assert_eq!(scroll.offset, 20.0);
        scroll.step();
        assert_eq!(scroll.offset, 30.0);

        for _ in 0..20 {
            scroll.step();
        }
        assert!(!scroll.is_animating());
        assert_eq!(scroll.row(), 40);
    }

    #[test]
    fn jump_is_immediate() {
        let mut scroll = SmoothScroll::new(0.3);
        scroll.set_max(100);
        scroll.scroll_to(60.0, true);
        scroll.step();

        scroll.scroll_to(0.0, false);
        assert_eq!(scroll.offset, 0.0);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn targets_are_clamped_to_the_scroll_range() {
        let mut scroll = SmoothScroll::new(1.0);
        scroll.set_max(10);
        scroll.scroll_to(-4.0, true);
        assert_eq!(scroll.target, 0.0);
        scroll.scroll_to(25.0, false);
        assert_eq!(scroll.offset, 10.0);

        scroll.set_max(3);
        assert_eq!(scroll.offset, 3.0);
        assert_eq!(scroll.target, 3.0);
    }
}
