use crate::day::{last_weekday, ToDay};
use serde::Deserialize;
use time::{Date, Weekday};

pub const DEFAULT_KEY: &str = "selection";

pub const DEFAULT_COLOR: &str = "#3d91ff";

/// Which end of the range the next committed selection targets
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Part {
    #[default]
    Start,
    End,
}

impl Part {
    pub fn toggle(self) -> Part {
        match self {
            Part::Start => Part::End,
            Part::End => Part::Start,
        }
    }
}

/// A selected date range.
///
/// Either endpoint may be absent while the user is still picking.  Once both
/// are present, `start <= end` holds for every range produced by this crate;
/// that is enforced by [`normalize()`] rather than at construction.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Range {
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub key: String,
    pub color: Option<String>,
}

impl Range {
    pub fn new<S: Into<String>>(key: S) -> Range {
        Range {
            start: None,
            end: None,
            key: key.into(),
            color: None,
        }
    }

    /// Build a range from arbitrary date inputs.  Inputs that can't be read
    /// as dates leave the corresponding endpoint absent.
    pub fn from_inputs<S: ToDay, E: ToDay>(start: &S, end: &E) -> Range {
        Range {
            start: start.to_day(),
            end: end.to_day(),
            ..Range::default()
        }
        .normalized()
    }

    pub fn with_start(mut self, date: Date) -> Range {
        self.start = Some(date);
        self
    }

    pub fn with_end(mut self, date: Date) -> Range {
        self.end = Some(date);
        self
    }

    pub fn with_color<S: Into<String>>(mut self, color: S) -> Range {
        self.color = Some(color.into());
        self
    }

    pub fn normalized(self) -> Range {
        normalize(self)
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_start(&self, day: Date) -> bool {
        self.start == Some(day)
    }

    pub fn is_end(&self, day: Date) -> bool {
        self.end == Some(day)
    }

    /// True if `day` lies between the two endpoints, inclusive.  Always false
    /// for a partially-defined range.
    pub fn contains(&self, day: Date) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= day && day <= end,
            _ => false,
        }
    }

    /// True if `day` opens a visual segment of the range when it is drawn in
    /// rows of weeks starting on `week_start`: either the range's start or the
    /// first day of a later week inside the range.
    pub fn is_range_start(&self, day: Date, week_start: Weekday) -> bool {
        self.contains(day) && (self.is_start(day) || day.weekday() == week_start)
    }

    /// Counterpart of [`Range::is_range_start()`] for the closing edge of each
    /// week's segment
    pub fn is_range_end(&self, day: Date, week_start: Weekday) -> bool {
        self.contains(day) && (self.is_end(day) || day.weekday() == last_weekday(week_start))
    }

    pub fn assign(&self, day: Date, part: Part, policy: AssignPolicy) -> Range {
        assign(self, day, part, policy)
    }
}

impl Default for Range {
    fn default() -> Range {
        Range::new(DEFAULT_KEY)
    }
}

/// Options controlling what a fresh start-date pick does to the end date
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct AssignPolicy {
    /// Picking a new start clears the end, so that the whole range moves
    pub move_range_on_first_selection: bool,
    /// Keep the end date even when `move_range_on_first_selection` is set
    pub retain_end_date_on_first_selection: bool,
}

impl AssignPolicy {
    fn clears_end(self) -> bool {
        self.move_range_on_first_selection && !self.retain_end_date_on_first_selection
    }
}

/// Set one endpoint of `range` to `day` and return the normalized result.
///
/// - Setting the start clears the end first if `policy` says so, then pulls
///   a remaining end forward to `day` if `day` is past it.
/// - Setting the end before the current start swaps: `day` becomes the start
///   and the old start becomes the end.
///
/// Callers are responsible for rejecting disabled days beforehand.
pub fn assign(range: &Range, day: Date, part: Part, policy: AssignPolicy) -> Range {
    let mut next = range.clone();
    match part {
        Part::Start => {
            next.start = Some(day);
            if policy.clears_end() {
                next.end = None;
            }
            if next.end.is_some_and(|end| day > end) {
                next.end = Some(day);
            }
        }
        Part::End => match range.start {
            Some(start) if day < start => {
                next.start = Some(day);
                next.end = Some(start);
            }
            _ => next.end = Some(day),
        },
    }
    normalize(next)
}

/// Swap the endpoints of `range` if both are present and inverted; otherwise
/// return it unchanged.  Idempotent.
pub fn normalize(mut range: Range) -> Range {
    if let (Some(start), Some(end)) = (range.start, range.end) {
        if start > end {
            range.start = Some(end);
            range.end = Some(start);
        }
    }
    range
}

/// Returns the first range in `ranges` that contains `day` or has it as an
/// endpoint
pub fn range_for_date(day: Date, ranges: &[Range]) -> Option<&Range> {
    ranges
        .iter()
        .find(|r| r.contains(day) || r.is_start(day) || r.is_end(day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn range(start: Option<Date>, end: Option<Date>) -> Range {
        Range {
            start,
            end,
            ..Range::default()
        }
    }

    #[test]
    fn test_normalize_swaps_inverted() {
        let r = normalize(range(Some(date!(2024 - 01 - 20)), Some(date!(2024 - 01 - 10))));
        assert_eq!(r.start, Some(date!(2024 - 01 - 10)));
        assert_eq!(r.end, Some(date!(2024 - 01 - 20)));
        assert_eq!(normalize(r.clone()), r);
    }

    #[test]
    fn test_normalize_leaves_partial() {
        let r = range(None, Some(date!(2024 - 01 - 10)));
        assert_eq!(normalize(r.clone()), r);
        let r = range(Some(date!(2024 - 01 - 10)), Some(date!(2024 - 01 - 10)));
        assert_eq!(normalize(r.clone()), r);
    }

    #[test]
    fn test_assign_end_before_start_swaps() {
        let r = range(Some(date!(2024 - 01 - 10)), None);
        let r = assign(&r, date!(2024 - 01 - 05), Part::End, AssignPolicy::default());
        assert_eq!(r.start, Some(date!(2024 - 01 - 05)));
        assert_eq!(r.end, Some(date!(2024 - 01 - 10)));
    }

    #[test]
    fn test_assign_end_after_start() {
        let r = range(Some(date!(2024 - 01 - 10)), Some(date!(2024 - 01 - 12)));
        let r = assign(&r, date!(2024 - 01 - 20), Part::End, AssignPolicy::default());
        assert_eq!(r.start, Some(date!(2024 - 01 - 10)));
        assert_eq!(r.end, Some(date!(2024 - 01 - 20)));
    }

    #[test]
    fn test_assign_end_on_start_is_single_day() {
        let r = range(Some(date!(2024 - 01 - 10)), None);
        let r = assign(&r, date!(2024 - 01 - 10), Part::End, AssignPolicy::default());
        assert_eq!(r.start, Some(date!(2024 - 01 - 10)));
        assert_eq!(r.end, Some(date!(2024 - 01 - 10)));
    }

    #[test]
    fn test_assign_end_without_start() {
        let r = assign(
            &Range::default(),
            date!(2024 - 01 - 10),
            Part::End,
            AssignPolicy::default(),
        );
        assert_eq!(r.start, None);
        assert_eq!(r.end, Some(date!(2024 - 01 - 10)));
    }

    #[test]
    fn test_assign_start_past_end_collapses() {
        let r = range(Some(date!(2024 - 01 - 10)), Some(date!(2024 - 01 - 15)));
        let r = assign(&r, date!(2024 - 01 - 20), Part::Start, AssignPolicy::default());
        assert_eq!(r.start, Some(date!(2024 - 01 - 20)));
        assert_eq!(r.end, Some(date!(2024 - 01 - 20)));
    }

    #[test]
    fn test_assign_start_keeps_end() {
        let r = range(Some(date!(2024 - 01 - 10)), Some(date!(2024 - 01 - 15)));
        let r = assign(&r, date!(2024 - 01 - 12), Part::Start, AssignPolicy::default());
        assert_eq!(r.start, Some(date!(2024 - 01 - 12)));
        assert_eq!(r.end, Some(date!(2024 - 01 - 15)));
    }

    #[test]
    fn test_assign_start_move_range_clears_end() {
        let policy = AssignPolicy {
            move_range_on_first_selection: true,
            retain_end_date_on_first_selection: false,
        };
        let r = range(Some(date!(2024 - 01 - 10)), Some(date!(2024 - 01 - 15)));
        let r = assign(&r, date!(2024 - 01 - 20), Part::Start, policy);
        assert_eq!(r.start, Some(date!(2024 - 01 - 20)));
        assert_eq!(r.end, None);
    }

    #[test]
    fn test_assign_start_move_range_retaining_end() {
        let policy = AssignPolicy {
            move_range_on_first_selection: true,
            retain_end_date_on_first_selection: true,
        };
        let r = range(Some(date!(2024 - 01 - 10)), Some(date!(2024 - 01 - 15)));
        let r = assign(&r, date!(2024 - 01 - 20), Part::Start, policy);
        assert_eq!(r.start, Some(date!(2024 - 01 - 20)));
        assert_eq!(r.end, Some(date!(2024 - 01 - 20)));
    }

    #[test]
    fn test_assign_preserves_identity() {
        let r = Range::new("trip").with_color("#ff0000");
        let r = assign(&r, date!(2024 - 01 - 10), Part::Start, AssignPolicy::default());
        assert_eq!(r.key, "trip");
        assert_eq!(r.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_from_inputs() {
        let r = Range::from_inputs(&"2024-01-20", &"2024-01-10T09:00:00");
        assert_eq!(r.start, Some(date!(2024 - 01 - 10)));
        assert_eq!(r.end, Some(date!(2024 - 01 - 20)));
        let r = Range::from_inputs(&"not a date", &date!(2024 - 01 - 10));
        assert_eq!(r.start, None);
        assert_eq!(r.end, Some(date!(2024 - 01 - 10)));
    }

    #[test]
    fn test_week_segments() {
        // 2024-01-07 is a Sunday
        let r = range(Some(date!(2024 - 01 - 03)), Some(date!(2024 - 01 - 10)));
        assert!(r.is_range_start(date!(2024 - 01 - 03), Weekday::Sunday));
        assert!(r.is_range_start(date!(2024 - 01 - 07), Weekday::Sunday));
        assert!(!r.is_range_start(date!(2024 - 01 - 08), Weekday::Sunday));
        assert!(r.is_range_end(date!(2024 - 01 - 06), Weekday::Sunday));
        assert!(r.is_range_end(date!(2024 - 01 - 10), Weekday::Sunday));
        assert!(!r.is_range_end(date!(2024 - 01 - 07), Weekday::Sunday));
        assert!(r.is_range_start(date!(2024 - 01 - 08), Weekday::Monday));
        assert!(!r.is_range_start(date!(2023 - 12 - 31), Weekday::Sunday));
    }

    #[test]
    fn test_range_for_date() {
        let ranges = [
            range(Some(date!(2024 - 01 - 01)), Some(date!(2024 - 01 - 05))),
            range(Some(date!(2024 - 01 - 10)), None),
        ];
        assert_eq!(
            range_for_date(date!(2024 - 01 - 03), &ranges),
            Some(&ranges[0])
        );
        assert_eq!(
            range_for_date(date!(2024 - 01 - 10), &ranges),
            Some(&ranges[1])
        );
        assert_eq!(range_for_date(date!(2024 - 01 - 07), &ranges), None);
    }
}
