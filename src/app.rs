use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::theme::BASE_STYLE;
use crate::widget::{PanelLayout, PickerView};
use crossterm::event::{
    poll, read, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rangepick::{day::add_days, DayCell, DayPredicate, Picker, PickerEvent, Range};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::time::Instant;
use time::Date;
use tracing::{debug, trace};

#[derive(Clone, Debug)]
pub(crate) struct App<P> {
    picker: Picker<P>,
    today: Date,
    cursor: Date,
    state: AppState,
    /// The area last drawn into, for mapping mouse positions to days
    area: Rect,
}

impl<P: DayPredicate> App<P> {
    pub(crate) fn new(picker: Picker<P>, today: Date) -> App<P> {
        let cursor = picker.range().start.unwrap_or(today);
        App {
            picker,
            today,
            cursor,
            state: AppState::Picking,
            area: Rect::default(),
        }
    }

    /// Run until the user accepts a range or quits.  Returns the range if it
    /// was accepted.
    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<Option<Range>> {
        while !self.done() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok((self.state == AppState::Accepted).then(|| self.picker.range().clone()))
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(&mut *self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        // Wake up when a debounced drag move is due even if no input arrives
        if let Some(deadline) = self.picker.next_deadline() {
            if !poll(deadline.saturating_duration_since(Instant::now()))? {
                self.tick(Instant::now());
                return Ok(());
            }
        }
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        let event = read()?;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        } else if let Event::Mouse(ev) = event {
            self.handle_mouse(ev, Instant::now());
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        self.tick(Instant::now());
        Ok(())
    }

    fn tick(&mut self, now: Instant) {
        self.picker.tick(now);
        for ev in self.picker.drain_events() {
            match ev {
                PickerEvent::RangeChange(range) => {
                    debug!(start = ?range.start, end = ?range.end, "Range changed");
                }
                PickerEvent::FocusedPartChange(part) => debug!(?part, "Focus changed"),
                PickerEvent::PreviewChange(preview) => trace!(?preview, "Preview changed"),
                PickerEvent::ShownMonthChange(month) => debug!(%month, "Showing new month"),
            }
        }
    }

    /// The day cell drawn at the given terminal position
    fn cell_at(&self, column: u16, row: u16) -> Option<DayCell> {
        let (panel, row, col) =
            PanelLayout::new(self.area, self.picker.options().months).hit(column, row)?;
        self.picker.panels().get(panel)?.cell(row, col)
    }

    fn handle_mouse(&mut self, ev: MouseEvent, now: Instant) {
        if self.state != AppState::Picking {
            return;
        }
        let cell = self.cell_at(ev.column, ev.row);
        match (ev.kind, cell) {
            (MouseEventKind::Down(MouseButton::Left), Some(cell)) => {
                self.cursor = cell.date;
                self.picker.press(cell);
            }
            (MouseEventKind::Drag(MouseButton::Left), Some(cell)) => {
                self.picker.pointer_move(cell, now);
            }
            (MouseEventKind::Up(MouseButton::Left), Some(cell)) => self.picker.release(cell),
            (MouseEventKind::Up(MouseButton::Left), None) => self.picker.global_release(),
            (MouseEventKind::Moved, Some(cell)) => self.picker.hover_enter(cell),
            (MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left), None) => {
                self.picker.hover_leave();
            }
            (MouseEventKind::ScrollDown, _) => {
                self.picker.next_month();
            }
            (MouseEventKind::ScrollUp, _) => {
                self.picker.prev_month();
            }
            _ => (),
        }
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Picking => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(7),
                KeyCode::Char(' ') => self.picker.select(self.cursor),
                KeyCode::Tab | KeyCode::BackTab => {
                    self.picker.focus_part(self.picker.focused_part().toggle());
                    true
                }
                KeyCode::Char('n') | KeyCode::PageDown => self.picker.next_month(),
                KeyCode::Char('p') | KeyCode::PageUp => self.picker.prev_month(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.set_cursor(self.today);
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Enter => {
                    self.state = AppState::Accepted;
                    true
                }
                KeyCode::Esc if self.picker.session().is_some() => {
                    self.picker.cancel();
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Picking;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Picking;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('-') => state.handle_input(JumpToInput::Negative),
                        KeyCode::Char('+') => state.handle_input(JumpToInput::Positive),
                        KeyCode::Char(c) => match c.to_digit(10).and_then(|d| u8::try_from(d).ok())
                        {
                            Some(d) => state.handle_input(JumpToInput::Digit(d)),
                            None => JumpToOutput::Invalid,
                        },
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(month) => {
                            self.state = AppState::Picking;
                            self.picker.set_shown_month(month);
                            self.cursor = month;
                            true
                        }
                    }
                }
            }
            AppState::Quitting | AppState::Accepted => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn done(&self) -> bool {
        matches!(self.state, AppState::Quitting | AppState::Accepted)
    }

    fn move_cursor(&mut self, days: i64) -> bool {
        match add_days(self.cursor, days) {
            Some(date) => {
                self.set_cursor(date);
                true
            }
            None => false,
        }
    }

    /// Move the cursor, scrolling to keep it in view.  The preview follows
    /// the cursor as it would the mouse.
    fn set_cursor(&mut self, date: Date) {
        self.cursor = date;
        self.picker.reveal(date);
        self.picker.hover_enter(DayCell::active(date));
    }
}

impl<P: DayPredicate> Widget for &mut App<P> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.area = area;
        buf.set_style(area, BASE_STYLE);
        PickerView::new(&self.picker, self.today)
            .cursor(self.cursor)
            .render(area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Picking,
    Helping,
    Jumping(JumpToState),
    Quitting,
    Accepted,
}
