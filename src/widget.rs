use crate::theme::{
    endpoint_style, range_style, status::FOCUSED_STYLE, BASE_STYLE, CURSOR_MODIFIER,
    DISABLED_STYLE, FALLBACK_RANGE_COLOR, PASSIVE_STYLE, PREVIEW_STYLE, TITLE_STYLE, TODAY_STYLE,
    WEEKDAY_STYLE,
};
use rangepick::{
    calendar::{DayCell, WEEKS_SHOWN},
    day::DAYS_IN_WEEK,
    DayPredicate, Part, Picker,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};
use time::{Date, Weekday};

/// Number of columns per day: two digits and a space
const DAY_WIDTH: u16 = 3;

/// Width of one month panel, including the space after the last column
const PANEL_WIDTH: u16 = DAY_WIDTH * DAYS_IN_WEEK as u16;

/// Columns between adjacent panels
const PANEL_GAP: u16 = 3;

/// Lines above the first week of a panel: the title and the weekday header
const WEEKS_TOP: u16 = 2;

#[allow(clippy::cast_possible_truncation)]
const PANEL_HEIGHT: u16 = WEEKS_TOP + WEEKS_SHOWN as u16;

/// Where the panels of a picker land within a given area.  Used both for
/// drawing and for mapping mouse positions back to day cells.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PanelLayout {
    left: u16,
    top: u16,
    months: u16,
}

impl PanelLayout {
    pub(crate) fn new(area: Rect, months: usize) -> PanelLayout {
        let months = u16::try_from(months).unwrap_or(u16::MAX);
        let width = months
            .saturating_mul(PANEL_WIDTH + PANEL_GAP)
            .saturating_sub(PANEL_GAP);
        PanelLayout {
            left: area.x.saturating_add(area.width.saturating_sub(width) / 2),
            top: area.y,
            months,
        }
    }

    fn panel_left(&self, panel: u16) -> u16 {
        self.left
            .saturating_add(panel.saturating_mul(PANEL_WIDTH + PANEL_GAP))
    }

    fn status_line(&self) -> u16 {
        self.top.saturating_add(PANEL_HEIGHT + 1)
    }

    /// Returns the panel, week row, and weekday column of the day drawn at
    /// the given terminal position, if any
    pub(crate) fn hit(&self, x: u16, y: u16) -> Option<(usize, usize, usize)> {
        let row = y.checked_sub(self.top.saturating_add(WEEKS_TOP))?;
        if usize::from(row) >= WEEKS_SHOWN {
            return None;
        }
        let dx = x.checked_sub(self.left)?;
        let panel = dx / (PANEL_WIDTH + PANEL_GAP);
        let within = dx % (PANEL_WIDTH + PANEL_GAP);
        if panel >= self.months || within >= PANEL_WIDTH {
            return None;
        }
        Some((
            usize::from(panel),
            usize::from(row),
            usize::from(within / DAY_WIDTH),
        ))
    }
}

/// Draws every month panel of a picker side by side, with the selected
/// range below them
#[derive(Debug)]
pub(crate) struct PickerView<'a, P> {
    picker: &'a Picker<P>,
    today: Date,
    cursor: Option<Date>,
}

impl<'a, P: DayPredicate> PickerView<'a, P> {
    pub(crate) fn new(picker: &'a Picker<P>, today: Date) -> Self {
        PickerView {
            picker,
            today,
            cursor: None,
        }
    }

    pub(crate) fn cursor(mut self, cursor: Date) -> Self {
        self.cursor = Some(cursor);
        self
    }

    fn range_color(&self) -> Color {
        self.picker
            .range()
            .color
            .as_deref()
            .and_then(|c| c.parse::<Color>().ok())
            .unwrap_or(FALLBACK_RANGE_COLOR)
    }

    fn day_style(&self, cell: DayCell, color: Color) -> Style {
        let date = cell.date;
        let range = self.picker.range();
        let style = if cell.passive {
            PASSIVE_STYLE
        } else if self.picker.is_disabled(date) {
            DISABLED_STYLE
        } else if range.is_start(date) || range.is_end(date) {
            endpoint_style(color)
        } else if range.contains(date) {
            range_style(color)
        } else if self.picker.preview().is_some_and(|p| p.contains(date)) {
            PREVIEW_STYLE
        } else if date == self.today {
            TODAY_STYLE
        } else {
            BASE_STYLE
        };
        if !cell.passive && self.cursor == Some(date) {
            style.add_modifier(CURSOR_MODIFIER)
        } else {
            style
        }
    }

    fn status(&self) -> Line<'static> {
        let range = self.picker.range();
        let focused = self.picker.focused_part();
        let endpoint = |date: Option<Date>, part: Part| {
            let text = date.map_or_else(|| String::from("----------"), |d| d.to_string());
            Span::styled(
                text,
                if focused == part {
                    FOCUSED_STYLE
                } else {
                    BASE_STYLE
                },
            )
        };
        Line::from_iter([
            Span::styled("Start: ", BASE_STYLE),
            endpoint(range.start, Part::Start),
            Span::styled("   End: ", BASE_STYLE),
            endpoint(range.end, Part::End),
        ])
    }
}

impl<P: DayPredicate> Widget for PickerView<'_, P> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = PanelLayout::new(area, self.picker.options().months);
        let color = self.range_color();
        let mut canvas = BufferCanvas::new(area, buf);
        for (i, grid) in std::iter::zip(0u16.., self.picker.panels()) {
            let x = layout.panel_left(i);
            let title = format!("{} {}", grid.month_name(), grid.year());
            let title_width = u16::try_from(title.len()).unwrap_or(PANEL_WIDTH);
            canvas.print(
                x.saturating_add(PANEL_WIDTH.saturating_sub(title_width) / 2),
                layout.top,
                &title,
                TITLE_STYLE,
            );
            let header = grid
                .weekdays()
                .into_iter()
                .map(weekday_abbrev)
                .collect::<Vec<_>>()
                .join(" ");
            canvas.print(x, layout.top.saturating_add(1), &header, WEEKDAY_STYLE);
            for (row, week) in std::iter::zip(0u16.., grid.weeks()) {
                let y = layout.top.saturating_add(WEEKS_TOP + row);
                for (col, &cell) in std::iter::zip(0u16.., week) {
                    let day = cell.day();
                    canvas.print(
                        x.saturating_add(col * DAY_WIDTH),
                        y,
                        &format!("{day:>2}"),
                        self.day_style(cell, color),
                    );
                }
            }
        }
        canvas.print_line(layout.left, layout.status_line(), self.status());
    }
}

fn weekday_abbrev(wd: Weekday) -> &'static str {
    match wd {
        Weekday::Sunday => "Su",
        Weekday::Monday => "Mo",
        Weekday::Tuesday => "Tu",
        Weekday::Wednesday => "We",
        Weekday::Thursday => "Th",
        Weekday::Friday => "Fr",
        Weekday::Saturday => "Sa",
    }
}

/// Writes text at absolute positions, clipped to an area
#[derive(Debug)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        let area = area.intersection(buf.area);
        Self { area, buf }
    }

    fn contains(&self, x: u16, y: u16) -> bool {
        (self.area.left()..self.area.right()).contains(&x)
            && (self.area.top()..self.area.bottom()).contains(&y)
    }

    fn print(&mut self, x: u16, y: u16, s: &str, style: Style) {
        if self.contains(x, y) {
            let width = usize::from(self.area.right() - x);
            self.buf.set_stringn(x, y, s, width, style);
        }
    }

    fn print_line(&mut self, x: u16, y: u16, line: Line<'_>) {
        if self.contains(x, y) {
            let width = self.area.right() - x;
            self.buf.set_line(x, y, &line, width);
        }
    }
}
