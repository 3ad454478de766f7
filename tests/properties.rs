//! Property tests for the invariants every committed range must satisfy,
//! whatever sequence of input produced it.

use proptest::prelude::*;
use rangepick::{
    assign, normalize, preview, AssignPolicy, Constraints, DayCell, NoDays, Part, Picker,
    PickerEvent, PickerOptions, Range,
};
use std::time::{Duration, Instant};
use time::macros::date;
use time::Date;

const BASE: Date = date!(2024 - 01 - 01);

fn day(offset: i64) -> Date {
    BASE + time::Duration::days(offset)
}

fn any_day() -> impl Strategy<Value = Date> {
    (0i64..90).prop_map(day)
}

fn any_endpoint() -> impl Strategy<Value = Option<Date>> {
    proptest::option::of(any_day())
}

fn any_range() -> impl Strategy<Value = Range> {
    (any_endpoint(), any_endpoint()).prop_map(|(start, end)| Range {
        start,
        end,
        ..Range::default()
    })
}

fn any_part() -> impl Strategy<Value = Part> {
    prop_oneof![Just(Part::Start), Just(Part::End)]
}

fn any_policy() -> impl Strategy<Value = AssignPolicy> {
    (any::<bool>(), any::<bool>()).prop_map(|(m, r)| AssignPolicy {
        move_range_on_first_selection: m,
        retain_end_date_on_first_selection: r,
    })
}

fn is_ordered(range: &Range) -> bool {
    match (range.start, range.end) {
        (Some(start), Some(end)) => start <= end,
        _ => true,
    }
}

#[derive(Clone, Debug)]
enum Input {
    Press(DayCell),
    Move(DayCell),
    Release(DayCell),
    GlobalRelease,
    Click(DayCell),
    Hover(DayCell),
    Leave,
    Wait(u64),
    Select(Date),
    Cancel,
}

fn any_cell() -> impl Strategy<Value = DayCell> {
    (any_day(), proptest::bool::weighted(0.2)).prop_map(|(date, passive)| DayCell { date, passive })
}

fn any_input() -> impl Strategy<Value = Input> {
    prop_oneof![
        3 => any_cell().prop_map(Input::Press),
        6 => any_cell().prop_map(Input::Move),
        3 => any_cell().prop_map(Input::Release),
        1 => Just(Input::GlobalRelease),
        1 => any_cell().prop_map(Input::Click),
        2 => any_cell().prop_map(Input::Hover),
        1 => Just(Input::Leave),
        2 => (0u64..40).prop_map(Input::Wait),
        1 => any_day().prop_map(Input::Select),
        1 => Just(Input::Cancel),
    ]
}

#[test]
fn proptest_normalize_orders_and_is_idempotent() {
    proptest!(|(range in any_range())| {
        let once = normalize(range.clone());
        prop_assert!(is_ordered(&once));
        prop_assert_eq!(normalize(once.clone()), once.clone());
        // Normalizing never invents or loses an endpoint
        let count = |r: &Range| u8::from(r.start.is_some()) + u8::from(r.end.is_some());
        prop_assert_eq!(count(&once), count(&range));
    });
}

#[test]
fn proptest_assign_is_ordered() {
    proptest!(|(range in any_range(), d in any_day(), part in any_part(), policy in any_policy())| {
        let next = assign(&normalize(range), d, part, policy);
        prop_assert!(is_ordered(&next));
        prop_assert!(next.start == Some(d) || next.end == Some(d));
    });
}

#[test]
fn proptest_preview_contains_hovered() {
    proptest!(|(range in any_range(), hovered in any_day())| {
        let p = preview(&normalize(range), Some(hovered));
        prop_assert!(p.is_some());
        if let Some(p) = p {
            prop_assert!(p.contains(hovered));
            prop_assert!(is_ordered(&p));
        }
    });
}

#[test]
fn proptest_commits_are_ordered_and_enabled() {
    proptest!(|(
        disabled in proptest::collection::vec(any_day(), 0..15),
        inputs in proptest::collection::vec(any_input(), 0..60),
        drag_selection in any::<bool>(),
    )| {
        let constraints = Constraints::new().disable_dates(disabled.clone());
        let mut picker = Picker::new(
            PickerOptions {
                drag_selection,
                ..PickerOptions::default()
            },
            constraints,
            Range::default(),
            BASE,
        );
        let mut now = Instant::now();
        for input in inputs {
            now += Duration::from_millis(3);
            match input {
                Input::Press(cell) => picker.press(cell),
                Input::Move(cell) => picker.pointer_move(cell, now),
                Input::Release(cell) => picker.release(cell),
                Input::GlobalRelease => picker.global_release(),
                Input::Click(cell) => picker.click(cell),
                Input::Hover(cell) => picker.hover_enter(cell),
                Input::Leave => picker.hover_leave(),
                Input::Wait(ms) => {
                    now += Duration::from_millis(ms);
                    picker.tick(now);
                }
                Input::Select(d) => {
                    picker.select(d);
                }
                Input::Cancel => picker.cancel(),
            }
            for ev in picker.drain_events() {
                if let PickerEvent::RangeChange(r) = ev {
                    prop_assert!(is_ordered(&r));
                    for endpoint in [r.start, r.end].into_iter().flatten() {
                        prop_assert!(!disabled.contains(&endpoint));
                    }
                }
            }
            prop_assert!(is_ordered(picker.range()));
        }
    });
}

#[test]
fn proptest_burst_equals_last_move() {
    proptest!(|(anchor in any_day(), targets in proptest::collection::vec(any_day(), 1..20))| {
        // A press that never leaves the anchor is a click, not a drag
        prop_assume!(targets.iter().any(|&t| t != anchor));
        let mut picker = Picker::new(
            PickerOptions::default(),
            Constraints::<NoDays>::new(),
            Range::default(),
            BASE,
        );
        let t0 = Instant::now();
        picker.press(DayCell::active(anchor));
        let mut last = anchor;
        for (i, &target) in targets.iter().enumerate() {
            let at = t0 + Duration::from_millis(u64::try_from(i).unwrap_or(0));
            picker.pointer_move(DayCell::active(target), at);
            last = target;
        }
        picker.tick(t0 + Duration::from_secs(1));
        let expected = if last < anchor { (last, anchor) } else { (anchor, last) };
        prop_assert_eq!(picker.range().start, Some(expected.0));
        prop_assert_eq!(picker.range().end, Some(expected.1));
        picker.release(DayCell::active(last));
        prop_assert_eq!(picker.range().start, Some(expected.0));
        prop_assert_eq!(picker.range().end, Some(expected.1));
        prop_assert!(picker.session().is_none());
    });
}
