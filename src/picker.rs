//! One logical selection surface shared by every displayed month panel.
//!
//! Panels never hold selection state of their own.  They report raw events
//! for their cells to the [`Picker`], which runs the state machine once and
//! records what changed as [`PickerEvent`]s.  Because the drag session and
//! the preview live here rather than in any one panel, a drag started in one
//! month carries on into the next.
use crate::calendar::{DayCell, MonthGrid};
use crate::day::{add_months, start_of_month};
use crate::debounce::DEFAULT_WINDOW;
use crate::disabled::{Constraints, DayPredicate};
use crate::drag::{candidate, Commit, DragController, DragOptions, DragSession};
use crate::preview::preview;
use crate::range::{assign, normalize, AssignPolicy, Part, Range};
use std::time::{Duration, Instant};
use time::{Date, Weekday};
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PickerOptions {
    /// Number of consecutive months displayed side by side
    pub months: usize,
    pub week_start: Weekday,
    pub drag_selection: bool,
    pub adjacent_days_selectable: bool,
    pub show_preview: bool,
    pub debounce: Duration,
    pub policy: AssignPolicy,
    pub initial_part: Part,
}

impl Default for PickerOptions {
    fn default() -> PickerOptions {
        PickerOptions {
            months: 2,
            week_start: Weekday::Sunday,
            drag_selection: true,
            adjacent_days_selectable: false,
            show_preview: true,
            debounce: DEFAULT_WINDOW,
            policy: AssignPolicy::default(),
            initial_part: Part::Start,
        }
    }
}

/// Notification of a change in picker state.  Each `RangeChange` carries the
/// complete range, not a delta.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PickerEvent {
    RangeChange(Range),
    FocusedPartChange(Part),
    PreviewChange(Option<Range>),
    ShownMonthChange(Date),
}

#[derive(Clone, Debug)]
pub struct Picker<P> {
    options: PickerOptions,
    constraints: Constraints<P>,
    range: Range,
    focused: Part,
    drag: DragController,
    hovered: Option<Date>,
    preview: Option<Range>,
    shown_month: Date,
    events: Vec<PickerEvent>,
}

impl<P: DayPredicate> Picker<P> {
    /// Create a picker showing the month of the range's start, or of `today`
    /// if there is no start
    pub fn new(
        options: PickerOptions,
        constraints: Constraints<P>,
        range: Range,
        today: Date,
    ) -> Picker<P> {
        let range = normalize(range);
        let shown_month = start_of_month(range.start.unwrap_or(today));
        Picker {
            drag: DragController::new(DragOptions {
                enabled: options.drag_selection,
                adjacent_days_selectable: options.adjacent_days_selectable,
                debounce: options.debounce,
            }),
            focused: options.initial_part,
            options,
            constraints,
            range,
            hovered: None,
            preview: None,
            shown_month,
            events: Vec::new(),
        }
    }

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub fn constraints(&self) -> &Constraints<P> {
        &self.constraints
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn focused_part(&self) -> Part {
        self.focused
    }

    pub fn preview(&self) -> Option<&Range> {
        self.preview.as_ref()
    }

    pub fn hovered(&self) -> Option<Date> {
        self.hovered
    }

    pub fn session(&self) -> Option<DragSession> {
        self.drag.session()
    }

    pub fn is_disabled(&self, day: Date) -> bool {
        self.constraints.is_disabled(day)
    }

    /// When the pending debounced move becomes due, if there is one.  The
    /// caller should call [`Picker::tick()`] at or after this instant.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.drag.next_deadline()
    }

    /// Take every event emitted since the last call, in emission order
    pub fn drain_events(&mut self) -> Vec<PickerEvent> {
        std::mem::take(&mut self.events)
    }

    // Pointer input:

    pub fn press(&mut self, cell: DayCell) {
        trace!(date = %cell.date, "press");
        self.hovered = Some(cell.date);
        let commit = self.drag.press(cell, &self.constraints);
        self.apply(commit);
        self.refresh_preview();
    }

    pub fn pointer_move(&mut self, cell: DayCell, now: Instant) {
        trace!(date = %cell.date, "move");
        self.hovered = Some(cell.date);
        let commit = self.drag.move_to(cell, &self.constraints, now);
        self.apply(commit);
        self.refresh_preview();
    }

    /// Pointer released over a day cell.  A completed drag finishes on the
    /// last enabled day it reached, which need not be `cell`.
    pub fn release(&mut self, cell: DayCell) {
        trace!(date = %cell.date, "release");
        self.hovered = Some(cell.date);
        let commit = self.drag.release(&self.constraints);
        self.apply(commit);
        self.refresh_preview();
    }

    /// Pointer released outside every panel.  Closes any open session the
    /// same way [`Picker::release()`] would, and leaves nothing hovered.
    pub fn global_release(&mut self) {
        if self.drag.is_active() {
            trace!("global release");
            self.hovered = None;
            let commit = self.drag.release(&self.constraints);
            self.apply(commit);
            self.refresh_preview();
        }
    }

    pub fn click(&mut self, cell: DayCell) {
        let commit = self.drag.click(cell, &self.constraints);
        self.apply(commit);
        self.refresh_preview();
    }

    pub fn hover_enter(&mut self, cell: DayCell) {
        if self.hovered != Some(cell.date) {
            trace!(date = %cell.date, "hover");
            self.hovered = Some(cell.date);
            self.refresh_preview();
        }
    }

    /// The pointer left every panel.  An ongoing drag is unaffected and keeps
    /// driving the preview.
    pub fn hover_leave(&mut self) {
        if !self.drag.is_active() {
            self.hovered = None;
        }
        self.refresh_preview();
    }

    /// Abandon the current session.  Commits already made stay.
    pub fn cancel(&mut self) {
        self.drag.cancel();
        self.refresh_preview();
    }

    /// Let time pass, firing a debounced move if its window has elapsed
    pub fn tick(&mut self, now: Instant) {
        let commit = self.drag.tick(now);
        if commit.is_some() {
            self.apply(commit);
            self.refresh_preview();
        }
    }

    // Keyboard and programmatic input:

    /// Select `day` for the focused part, as a click would.  Returns `false`
    /// if the day is disabled.
    pub fn select(&mut self, day: Date) -> bool {
        self.select_part(day, self.focused)
    }

    /// Select `day` for the given part, then move focus to the other part.
    /// Returns `false` if the day is disabled.
    pub fn select_part(&mut self, day: Date, part: Part) -> bool {
        if self.constraints.is_disabled(day) {
            trace!(%day, "Ignoring selection of disabled day");
            return false;
        }
        self.commit(assign(&self.range, day, part, self.options.policy));
        self.set_focus(part.toggle());
        self.refresh_preview();
        true
    }

    pub fn focus_part(&mut self, part: Part) {
        self.set_focus(part);
    }

    /// Replace the range from outside, without emitting `RangeChange`
    pub fn set_range(&mut self, range: Range) {
        self.range = normalize(range);
        self.refresh_preview();
    }

    // Navigation:

    /// The first day of the first displayed month
    pub fn shown_month(&self) -> Date {
        self.shown_month
    }

    /// The first day of each displayed month, in order
    pub fn shown_months(&self) -> Vec<Date> {
        (0..self.options.months)
            .map_while(|i| add_months(self.shown_month, i32::try_from(i).ok()?))
            .collect()
    }

    pub fn panels(&self) -> Vec<MonthGrid> {
        self.shown_months()
            .into_iter()
            .map_while(|m| MonthGrid::new(m, self.options.week_start).ok())
            .collect()
    }

    /// The panel whose month navigation follows the focused part: the first
    /// when picking a start, otherwise the second (if there is one)
    pub fn active_panel(&self) -> usize {
        match self.focused {
            Part::Start => 0,
            Part::End => self.options.months.saturating_sub(1).min(1),
        }
    }

    pub fn set_shown_month(&mut self, date: Date) {
        let month = start_of_month(date);
        if month != self.shown_month {
            debug!(%month, "Shown month changed");
            self.shown_month = month;
            self.events.push(PickerEvent::ShownMonthChange(month));
        }
    }

    /// Shift the displayed months.  Returns `false` at the edges of time.
    pub fn shift_months(&mut self, months: i32) -> bool {
        match add_months(self.shown_month, months) {
            Some(m) => {
                self.set_shown_month(m);
                true
            }
            None => false,
        }
    }

    pub fn next_month(&mut self) -> bool {
        self.shift_months(1)
    }

    pub fn prev_month(&mut self) -> bool {
        self.shift_months(-1)
    }

    /// Whether `day` falls within one of the displayed months
    pub fn is_shown(&self, day: Date) -> bool {
        let month = start_of_month(day);
        self.shown_months().contains(&month)
    }

    /// Scroll the displayed months the least amount needed to show `day`
    pub fn reveal(&mut self, day: Date) {
        let month = start_of_month(day);
        if month < self.shown_month {
            self.set_shown_month(month);
        } else if !self.is_shown(day) {
            let back = i32::try_from(self.options.months.saturating_sub(1)).unwrap_or(0);
            if let Some(first) = add_months(month, -back) {
                self.set_shown_month(first);
            }
        }
    }

    fn apply(&mut self, commit: Option<Commit>) {
        let Some(commit) = commit else {
            return;
        };
        match commit {
            Commit::Click(day) => {
                let part = self.focused;
                self.commit(assign(&self.range, day, part, self.options.policy));
                self.set_focus(part.toggle());
            }
            Commit::Anchor(anchor) => {
                self.commit(assign(
                    &self.range,
                    anchor,
                    Part::Start,
                    self.options.policy,
                ));
            }
            Commit::Span { anchor, target } => {
                self.commit(candidate(&self.range, anchor, target));
            }
            Commit::Finish { anchor, target } => {
                self.commit(candidate(&self.range, anchor, target));
                // The target lands on the end of a forwards drag and on the
                // start otherwise; focus moves past whichever part it set
                let last = if anchor < target { Part::End } else { Part::Start };
                self.set_focus(last.toggle());
            }
        }
    }

    fn commit(&mut self, range: Range) {
        let range = normalize(range);
        debug!(start = ?range.start, end = ?range.end, key = %range.key, "Range committed");
        self.range = range.clone();
        self.events.push(PickerEvent::RangeChange(range));
    }

    fn set_focus(&mut self, part: Part) {
        if self.focused != part {
            self.focused = part;
            self.events.push(PickerEvent::FocusedPartChange(part));
        }
    }

    fn compute_preview(&self) -> Option<Range> {
        if !self.options.show_preview {
            return None;
        }
        if let Some((anchor, target)) = self.drag.span() {
            return Some(candidate(&self.range, anchor, target));
        }
        preview(&self.range, self.hovered)
    }

    fn refresh_preview(&mut self) {
        let preview = self.compute_preview();
        if preview != self.preview {
            self.preview.clone_from(&preview);
            self.events.push(PickerEvent::PreviewChange(preview));
        }
    }
}
