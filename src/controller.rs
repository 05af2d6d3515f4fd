use std::time::Instant;

use tracing::debug;

use crate::playback::{clamp_speed, tick_period, PlaybackClock, PlaybackState, TickToken};
use crate::position::{PositionTracker, ScrollSink, ViewportGeometry};
use crate::presentation::{clamp_font_size, PresentationConfig};
use crate::segment::{segment, Unit};
use crate::view::{select_view, View};

pub const PLACEHOLDER_SCRIPT: &str = "Enter your script here...";

/// A discrete user request coming from the control surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    PlayToggle,
    Reset,
    SetSpeed(f64),
    SetFontSize(u16),
    CycleAlign,
    ToggleFocus,
    ToggleFullscreen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced(usize),
    /// The last unit was already active; playback stopped there.
    Ended(usize),
    /// Stale token, nothing due, or not playing.
    Ignored,
}

/// Owns the script and all playback/presentation state.
///
/// Fields are private; every change goes through a transition below so
/// the single-pending-tick rule and the index bounds always hold.
#[derive(Debug)]
pub struct Prompter {
    script: String,
    units: Vec<Unit>,
    state: PlaybackState,
    config: PresentationConfig,
    clock: PlaybackClock,
    tracker: PositionTracker,
}

impl Default for Prompter {
    fn default() -> Self {
        Self::new(PLACEHOLDER_SCRIPT)
    }
}

impl Prompter {
    pub fn new(script: impl Into<String>) -> Self {
        let script = script.into();
        let units = segment(&script);
        Self {
            script,
            units,
            state: PlaybackState::default(),
            config: PresentationConfig::default(),
            clock: PlaybackClock::new(),
            tracker: PositionTracker::new(),
        }
    }

    pub fn with_settings(
        mut self,
        speed: f64,
        focus_mode: bool,
        config: PresentationConfig,
    ) -> Self {
        self.state.speed = clamp_speed(speed);
        self.state.focus_mode = focus_mode;
        self.config = PresentationConfig {
            font_size: clamp_font_size(config.font_size),
            ..config
        };
        self
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn config(&self) -> PresentationConfig {
        self.config
    }

    pub fn view(&self) -> View {
        select_view(self.state.is_playing, self.state.focus_mode)
    }

    pub fn active_unit(&self) -> Option<&Unit> {
        self.units.get(self.state.active_index)
    }

    pub fn timer_live(&self) -> bool {
        self.clock.is_live()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.clock.deadline()
    }

    /// Replace the script. Rejected while playing.
    pub fn set_script(&mut self, script: impl Into<String>) -> bool {
        if self.state.is_playing {
            debug!("script edit ignored while playing");
            return false;
        }
        self.script = script.into();
        self.units = segment(&self.script);
        self.state.active_index = self
            .state
            .active_index
            .min(self.units.len().saturating_sub(1));
        true
    }

    pub fn play(&mut self, now: Instant) -> bool {
        if self.state.is_playing {
            return false;
        }
        if self.units.is_empty() {
            debug!("play ignored: script has no units");
            return false;
        }
        self.state.is_playing = true;
        self.clock.schedule(now, tick_period(self.state.speed));
        debug!(
            active_index = self.state.active_index,
            speed = self.state.speed,
            "playback started"
        );
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.state.is_playing {
            return false;
        }
        self.state.is_playing = false;
        self.clock.cancel();
        debug!(active_index = self.state.active_index, "playback paused");
        true
    }

    pub fn toggle_play(&mut self, now: Instant) -> bool {
        if self.state.is_playing {
            self.pause()
        } else {
            self.play(now)
        }
    }

    /// Advance by one unit, or stop when the last unit is already active.
    pub fn tick(&mut self, token: TickToken, now: Instant) -> TickOutcome {
        if !self.state.is_playing || !self.clock.fire(token, now) {
            return TickOutcome::Ignored;
        }

        let last = self.units.len().saturating_sub(1);
        if self.state.active_index >= last {
            self.state.active_index = last;
            self.state.is_playing = false;
            self.clock.cancel();
            debug!(active_index = last, "reached last unit, playback stopped");
            return TickOutcome::Ended(last);
        }

        self.state.active_index += 1;
        debug!(active_index = self.state.active_index, "advanced");
        TickOutcome::Advanced(self.state.active_index)
    }

    /// Fire the pending tick if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> TickOutcome {
        match self.clock.due(now) {
            Some(token) => self.tick(token, now),
            None => TickOutcome::Ignored,
        }
    }

    pub fn reset(&mut self, sink: &mut dyn ScrollSink) {
        self.clock.cancel();
        self.state.is_playing = false;
        self.state.active_index = 0;
        self.tracker.jump_to_top(sink);
        debug!("reset to start");
    }

    /// Change speed; while playing the pending tick is replaced by one at
    /// the new period, measured from `now`.
    pub fn set_speed(&mut self, speed: f64, now: Instant) {
        self.state.speed = clamp_speed(speed);
        if self.state.is_playing {
            self.clock.schedule(now, tick_period(self.state.speed));
        }
        debug!(speed = self.state.speed, "speed changed");
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.config.font_size = clamp_font_size(size);
    }

    pub fn cycle_align(&mut self) {
        self.config.align = self.config.align.next();
    }

    pub fn toggle_focus(&mut self) {
        self.state.focus_mode = !self.state.focus_mode;
        debug!(focus_mode = self.state.focus_mode, "focus mode toggled");
    }

    pub fn toggle_fullscreen(&mut self) {
        self.config.fullscreen = !self.config.fullscreen;
    }

    pub fn apply(&mut self, intent: Intent, now: Instant, sink: &mut dyn ScrollSink) {
        match intent {
            Intent::PlayToggle => {
                self.toggle_play(now);
            }
            Intent::Reset => self.reset(sink),
            Intent::SetSpeed(speed) => self.set_speed(speed, now),
            Intent::SetFontSize(size) => self.set_font_size(size),
            Intent::CycleAlign => self.cycle_align(),
            Intent::ToggleFocus => self.toggle_focus(),
            Intent::ToggleFullscreen => self.toggle_fullscreen(),
        }
    }

    /// Center the active unit if the index or view changed since last time.
    pub fn sync_scroll(
        &mut self,
        geometry: &dyn ViewportGeometry,
        sink: &mut dyn ScrollSink,
    ) -> Option<f64> {
        self.tracker
            .sync(self.state.active_index, self.view(), geometry, sink)
    }

    /// Make the next `sync_scroll` re-center, e.g. after the layout changed.
    pub fn invalidate_scroll(&mut self) {
        self.tracker.forget();
    }
}
