use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::prelude::{Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use tracing::info;

use crate::controller::{Intent, Prompter, TickOutcome, PLACEHOLDER_SCRIPT};
use crate::controls::{map_key, Action};
use crate::editor::Editor;
use crate::layout::{text_width, usize_to_u16_saturating, wrap, LayoutKey, ScriptLayout};
use crate::presentation::Align;
use crate::scroll::SmoothScroll;
use crate::view::View;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const IDLE_POLL: Duration = Duration::from_millis(120);
const SCROLL_RATE: f64 = 0.25;

const KEY_HINTS: &str =
    "^P play  ^R reset  ^←/→ speed  ^↑/↓ font  ^A align  ^F focus  F11 fullscreen  ^Q quit";

fn inset_rect(area: Rect, horizontal: u16, vertical: u16) -> Rect {
    let x = area.x.saturating_add(horizontal);
    let y = area.y.saturating_add(vertical);
    let width = area.width.saturating_sub(horizontal.saturating_mul(2));
    let height = area.height.saturating_sub(vertical.saturating_mul(2));
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Horizontally centered column of `width` inside `area`.
fn centered_column(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn active_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn dimmed_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub struct App {
    prompter: Prompter,
    editor: Editor,
    scroll: SmoothScroll,

    layout: ScriptLayout,
    layout_key: Option<LayoutKey>,

    edit_scroll: u16,
    last_frame: Instant,
    status: String,
}

impl App {
    pub fn new(prompter: Prompter) -> Self {
        let editor = Editor::new(prompter.script());
        Self {
            prompter,
            editor,
            scroll: SmoothScroll::new(SCROLL_RATE),
            layout: ScriptLayout::default(),
            layout_key: None,
            edit_scroll: 0,
            last_frame: Instant::now(),
            status: String::new(),
        }
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let state = self.prompter.state();
        match map_key(key, state, self.prompter.config()) {
            Action::Quit => return true,
            Action::Intent(intent) => {
                self.prompter.apply(intent, now, &mut self.scroll);
                self.status = self.describe(intent);
            }
            Action::Edit(key) => {
                if self.editor.handle_key(key) && self.prompter.set_script(self.editor.text()) {
                    self.layout_key = None;
                }
                self.status.clear();
            }
            Action::None => {}
        }
        false
    }

    fn describe(&self, intent: Intent) -> String {
        let state = self.prompter.state();
        let config = self.prompter.config();
        match intent {
            Intent::PlayToggle if state.is_playing => "Playing".to_string(),
            Intent::PlayToggle if self.prompter.units().is_empty() => {
                "Nothing to play: the script is empty".to_string()
            }
            Intent::PlayToggle => "Paused".to_string(),
            Intent::Reset => "Reset to start".to_string(),
            Intent::SetSpeed(_) => format!("Speed {:.1}x", state.speed),
            Intent::SetFontSize(_) => format!("Font {}px", config.font_size),
            Intent::CycleAlign => format!("Align {}", config.align.label()),
            Intent::ToggleFocus => {
                format!("Focus mode {}", if state.focus_mode { "on" } else { "off" })
            }
            Intent::ToggleFullscreen => {
                format!("Fullscreen {}", if config.fullscreen { "on" } else { "off" })
            }
        }
    }

    /// Fire a due tick and step the scroll animation.
    pub fn advance(&mut self, now: Instant) {
        if let TickOutcome::Ended(last) = self.prompter.poll(now) {
            self.status = format!("End of script ({} units)", last + 1);
            info!(units = last + 1, "script finished");
        }

        if now.saturating_duration_since(self.last_frame) >= FRAME_INTERVAL {
            self.scroll.step();
            self.last_frame = now;
        }
    }

    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let mut timeout = IDLE_POLL;
        if self.scroll.is_animating() {
            timeout = timeout.min(FRAME_INTERVAL);
        }
        if let Some(deadline) = self.prompter.next_deadline() {
            timeout = timeout.min(deadline.saturating_duration_since(now));
        }
        timeout
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let fullscreen = self.prompter.config().fullscreen;
        let root = frame.size();

        let body = if fullscreen {
            root
        } else {
            let chunks = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inset_rect(root, 1, 0));
            self.draw_controls(frame, chunks[0]);
            self.draw_status(frame, inset_rect(chunks[2], 1, 0));
            chunks[1]
        };

        let content = if fullscreen {
            body
        } else {
            let view = self.prompter.view();
            let block = Block::default()
                .title(format!(" prompter: {} ", view.label()))
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::new(1, 1, 0, 0));
            let inner = block.inner(body);
            frame.render_widget(block, body);
            inner
        };

        match self.prompter.view() {
            View::Edit => self.draw_editor(frame, content),
            View::Sequential => self.draw_sequential(frame, content),
            View::Focus => self.draw_focus(frame, content),
        }
    }

    fn draw_controls(&self, frame: &mut Frame<'_>, area: Rect) {
        let state = self.prompter.state();
        let config = self.prompter.config();
        let units = self.prompter.units().len();

        let play = if self.prompter.timer_live() {
            Span::styled(" ▶ PLAY ", Style::default().fg(Color::Black).bg(Color::Blue))
        } else {
            Span::styled(" ⏸ STOP ", Style::default().fg(Color::White).bg(Color::DarkGray))
        };
        let focus = if state.focus_mode {
            Span::styled(" FOCUS ", Style::default().fg(Color::Black).bg(Color::Green))
        } else {
            Span::styled(" FOCUS ", Style::default().fg(Color::Gray))
        };
        let position = if units == 0 {
            "0/0".to_string()
        } else {
            format!("{}/{units}", state.active_index + 1)
        };

        let line = Line::from(vec![
            play,
            Span::raw(format!(
                "  speed {:.1}x  font {}px  align {}  ",
                state.speed,
                config.font_size,
                config.align.label()
            )),
            focus,
            Span::styled(format!("  unit {position}"), Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let text = if self.status.is_empty() {
            KEY_HINTS.to_string()
        } else {
            format!("{} | {KEY_HINTS}", self.status)
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::Gray)),
            area,
        );
    }

    fn draw_editor(&mut self, frame: &mut Frame<'_>, area: Rect) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let align = self.prompter.config().align;
        let (line, col) = self.editor.cursor_line_col();
        let line_u16 = usize_to_u16_saturating(line);

        if line_u16 < self.edit_scroll {
            self.edit_scroll = line_u16;
        } else if line_u16 >= self.edit_scroll.saturating_add(area.height) {
            self.edit_scroll = line_u16 - area.height + 1;
        }

        let col_u16 = usize_to_u16_saturating(col);
        let h_scroll = if align == Align::Left && col_u16 >= area.width {
            col_u16 - area.width + 1
        } else {
            0
        };

        let paragraph = if self.editor.text().is_empty() {
            Paragraph::new(PLACEHOLDER_SCRIPT).style(dimmed_style())
        } else {
            Paragraph::new(Text::raw(self.editor.text().to_string()))
                .style(Style::default().fg(Color::White))
                .scroll((self.edit_scroll, h_scroll))
        };
        frame.render_widget(paragraph.alignment(Alignment::from(align)), area);

        let line_len = self
            .editor
            .text()
            .split('\n')
            .nth(line)
            .map_or(0, |text| usize_to_u16_saturating(text.chars().count()));
        let x_offset = match align {
            Align::Left => col_u16 - h_scroll,
            Align::Center => area.width.saturating_sub(line_len) / 2 + col_u16,
            Align::Right => area.width.saturating_sub(line_len) + col_u16,
        };
        let x = area.x + x_offset.min(area.width.saturating_sub(1));
        let y = area.y + (line_u16 - self.edit_scroll);
        frame.set_cursor(x, y);
    }

    /// Relayout if needed, let the tracker center the active unit, then
    /// render the visible rows at the animated offset.
    fn draw_sequential(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let config = self.prompter.config();
        let width = text_width(area.width, config.font_size);
        let key = LayoutKey {
            width,
            height: area.height,
            font_size: config.font_size,
        };

        if self.layout_key.as_ref() != Some(&key) {
            self.layout =
                ScriptLayout::build(self.prompter.units(), width, area.height, config.font_size);
            self.layout_key = Some(key);
            self.prompter.invalidate_scroll();
        }

        self.scroll.set_max(self.layout.max_scroll());
        self.prompter.sync_scroll(&self.layout, &mut self.scroll);

        let active = self.prompter.state().active_index;
        let start = self.scroll.row();
        let lines: Vec<Line> = (0..area.height)
            .map(|offset| {
                let row = start.saturating_add(offset);
                match self.layout.unit_at_row(row) {
                    Some(idx) => {
                        let unit = &self.layout.units[idx];
                        let text = unit.rows[usize::from(row - unit.top)].clone();
                        let style = if idx == active {
                            active_style()
                        } else {
                            dimmed_style()
                        };
                        Line::styled(text, style)
                    }
                    None => Line::raw(""),
                }
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::from(config.align)),
            centered_column(area, width),
        );
    }

    fn draw_focus(&self, frame: &mut Frame<'_>, area: Rect) {
        let Some(unit) = self.prompter.active_unit() else {
            return;
        };
        let config = self.prompter.config();
        let width = text_width(area.width, config.font_size);
        let rows = wrap(unit.as_str(), width);
        let height = usize_to_u16_saturating(rows.len()).min(area.height);
        let top = (area.height - height) / 2;

        let column = centered_column(area, width);
        let target = Rect {
            y: column.y + top,
            height,
            ..column
        };
        let lines: Vec<Line> = rows
            .into_iter()
            .map(|row| Line::styled(row, active_style()))
            .collect();
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::from(config.align)),
            target,
        );
    }
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

pub fn run_interactive(mut app: App) -> Result<()> {
    let _guard = TerminalGuard::enter()?;

    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key, Instant::now()) {
                        break;
                    }
                }
                _ => {}
            }
        }

        app.advance(Instant::now());
    }

    Ok(())
}
