use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

/// Days shown from the neighboring months
pub(crate) const PASSIVE_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const DISABLED_STYLE: Style = BASE_STYLE
    .fg(Color::DarkGray)
    .add_modifier(Modifier::CROSSED_OUT);

pub(crate) const TODAY_STYLE: Style = BASE_STYLE
    .fg(Color::LightYellow)
    .add_modifier(Modifier::BOLD);

pub(crate) const PREVIEW_STYLE: Style = BASE_STYLE.bg(Color::DarkGray);

/// Used when the range's color can't be read
pub(crate) const FALLBACK_RANGE_COLOR: Color = Color::Blue;

pub(crate) const CURSOR_MODIFIER: Modifier = Modifier::REVERSED;

pub(crate) const fn range_style(color: Color) -> Style {
    BASE_STYLE.fg(Color::Black).bg(color)
}

pub(crate) const fn endpoint_style(color: Color) -> Style {
    range_style(color).add_modifier(Modifier::BOLD)
}

pub(crate) mod status {
    use super::*;

    pub(crate) const FOCUSED_STYLE: Style =
        BASE_STYLE.add_modifier(Modifier::BOLD.union(Modifier::UNDERLINED));
}

pub(crate) mod jumpto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
