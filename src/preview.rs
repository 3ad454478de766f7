use crate::range::Range;
use time::Date;

/// The range that would result if the hovered day were picked next.
///
/// The preview only ever reaches from an existing endpoint out to `hovered`:
///
/// - With no endpoints, it is the single hovered day.
/// - With one endpoint, it spans that endpoint and the hovered day.
/// - With both endpoints, it spans the start and the hovered day, reaching
///   backwards when the hovered day is earlier.  Hovering the start itself
///   previews the committed range.
///
/// Returns `None` when nothing is hovered.
pub fn preview(range: &Range, hovered: Option<Date>) -> Option<Range> {
    let h = hovered?;
    let (start, end) = match (range.start, range.end) {
        (None, None) => (h, h),
        (Some(a), None) | (None, Some(a)) => (a.min(h), a.max(h)),
        (Some(start), Some(end)) => match h.cmp(&start) {
            std::cmp::Ordering::Greater => (start, h),
            std::cmp::Ordering::Less => (h, start),
            std::cmp::Ordering::Equal => (start, end),
        },
    };
    Some(Range {
        start: Some(start),
        end: Some(end),
        ..range.clone()
    })
}
