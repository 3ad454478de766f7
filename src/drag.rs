//! Turning pointer press/move/release into range commits.
//!
//! A press only opens a session.  Nothing is committed until the session
//! resolves as either a click (release without moving to another day) or a
//! drag (the pointer reached a different day while held).  Moves during a
//! drag are debounced so that a burst of pointer motion produces a single
//! commit for the last day reached.
use crate::calendar::DayCell;
use crate::debounce::{Debounce, DEFAULT_WINDOW};
use crate::disabled::{Constraints, DayPredicate};
use crate::range::{assign, AssignPolicy, Part, Range};
use std::time::{Duration, Instant};
use time::Date;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DragOptions {
    /// When false, a press commits immediately as a click
    pub enabled: bool,
    /// Allow pressing days shown from a neighboring month
    pub adjacent_days_selectable: bool,
    pub debounce: Duration,
}

impl Default for DragOptions {
    fn default() -> DragOptions {
        DragOptions {
            enabled: true,
            adjacent_days_selectable: false,
            debounce: DEFAULT_WINDOW,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DragPhase {
    /// No pointer is held.  `swallow_click` is set whenever a press or
    /// release has already committed, so that a click synthesized from the
    /// same gesture is not taken as a second selection.
    Idle { swallow_click: bool },
    Pressed { anchor: Date },
    /// `target` is the last enabled day the pointer moved onto
    Dragging { anchor: Date, target: Date },
}

/// Snapshot of the current pointer interaction
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DragSession {
    pub active: bool,
    pub anchor: Option<Date>,
    pub moved: bool,
}

/// A range mutation requested by the state machine
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Commit {
    /// Plain click: set the focused part to the day, then advance focus
    Click(Date),
    /// The pointer left the anchor for the first time; the anchor becomes
    /// the start
    Anchor(Date),
    /// Debounced live update while dragging
    Span { anchor: Date, target: Date },
    /// The drag was released
    Finish { anchor: Date, target: Date },
}

/// The range a drag between `anchor` and `target` produces, in either
/// direction.  Used both for commits and for the preview, so the two never
/// disagree.
pub fn candidate(range: &Range, anchor: Date, target: Date) -> Range {
    let anchored = Range {
        start: Some(anchor),
        ..range.clone()
    };
    assign(&anchored, target, Part::End, AssignPolicy::default())
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DragController {
    options: DragOptions,
    phase: DragPhase,
    debounce: Debounce<Date>,
}

impl DragController {
    pub fn new(options: DragOptions) -> DragController {
        DragController {
            options,
            phase: DragPhase::Idle {
                swallow_click: false,
            },
            debounce: Debounce::new(options.debounce),
        }
    }

    pub fn options(&self) -> DragOptions {
        self.options
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, DragPhase::Idle { .. })
    }

    pub fn session(&self) -> Option<DragSession> {
        match self.phase {
            DragPhase::Idle { .. } => None,
            DragPhase::Pressed { anchor } => Some(DragSession {
                active: true,
                anchor: Some(anchor),
                moved: false,
            }),
            DragPhase::Dragging { anchor, .. } => Some(DragSession {
                active: true,
                anchor: Some(anchor),
                moved: true,
            }),
        }
    }

    /// The anchor and latest target of an ongoing drag, including a target
    /// still waiting out the debounce window
    pub fn span(&self) -> Option<(Date, Date)> {
        match self.phase {
            DragPhase::Dragging { anchor, target } => Some((anchor, target)),
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    fn selectable<P: DayPredicate>(&self, cell: DayCell, constraints: &Constraints<P>) -> bool {
        !constraints.is_disabled(cell.date)
            && (!cell.passive || self.options.adjacent_days_selectable)
    }

    pub fn press<P: DayPredicate>(
        &mut self,
        cell: DayCell,
        constraints: &Constraints<P>,
    ) -> Option<Commit> {
        if !self.selectable(cell, constraints) {
            trace!(date = %cell.date, "Ignoring press on unselectable day");
            return None;
        }
        self.debounce.reset();
        if !self.options.enabled {
            self.phase = DragPhase::Idle {
                swallow_click: true,
            };
            return Some(Commit::Click(cell.date));
        }
        debug!(anchor = %cell.date, "Opening selection session");
        self.phase = DragPhase::Pressed { anchor: cell.date };
        None
    }

    pub fn move_to<P: DayPredicate>(
        &mut self,
        cell: DayCell,
        constraints: &Constraints<P>,
        now: Instant,
    ) -> Option<Commit> {
        if constraints.is_disabled(cell.date) {
            return None;
        }
        let day = cell.date;
        match self.phase {
            DragPhase::Idle { .. } => None,
            DragPhase::Pressed { anchor } if anchor == day => None,
            DragPhase::Pressed { anchor } => {
                debug!(%anchor, "Pointer left anchor; session is a drag");
                self.phase = DragPhase::Dragging {
                    anchor,
                    target: day,
                };
                self.debounce.schedule(day, now);
                Some(Commit::Anchor(anchor))
            }
            DragPhase::Dragging { anchor, target } => {
                if target != day {
                    trace!(%day, "Drag target moved");
                    self.phase = DragPhase::Dragging {
                        anchor,
                        target: day,
                    };
                    self.debounce.schedule(day, now);
                }
                None
            }
        }
    }

    /// Fire the debounced move if it is due
    pub fn tick(&mut self, now: Instant) -> Option<Commit> {
        let DragPhase::Dragging { anchor, .. } = self.phase else {
            return None;
        };
        self.debounce
            .poll(now)
            .map(|target| Commit::Span { anchor, target })
    }

    pub fn release<P: DayPredicate>(&mut self, constraints: &Constraints<P>) -> Option<Commit> {
        match self.phase {
            DragPhase::Idle { .. } => None,
            DragPhase::Pressed { anchor } => {
                debug!(%anchor, "Session closed as a click");
                self.close(true);
                (!constraints.is_disabled(anchor)).then_some(Commit::Click(anchor))
            }
            DragPhase::Dragging { anchor, target } => {
                debug!(%anchor, %target, "Session closed as a drag");
                self.close(true);
                Some(Commit::Finish { anchor, target })
            }
        }
    }

    /// A click event, for input models that report one after the release.
    /// The click that follows a press or release which already committed is
    /// swallowed, so only a click with no such gesture before it selects.
    pub fn click<P: DayPredicate>(
        &mut self,
        cell: DayCell,
        constraints: &Constraints<P>,
    ) -> Option<Commit> {
        match self.phase {
            DragPhase::Idle {
                swallow_click: true,
            } => {
                self.phase = DragPhase::Idle {
                    swallow_click: false,
                };
                None
            }
            DragPhase::Idle {
                swallow_click: false,
            } => self
                .selectable(cell, constraints)
                .then_some(Commit::Click(cell.date)),
            _ => None,
        }
    }

    /// Abandon the session without committing anything further
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!("Selection session cancelled");
        }
        self.close(false);
    }

    fn close(&mut self, swallow_click: bool) {
        self.debounce.reset();
        self.phase = DragPhase::Idle { swallow_click };
    }
}

impl Default for DragController {
    fn default() -> DragController {
        DragController::new(DragOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disabled::NoDays;
    use time::macros::date;

    fn cell(date: Date) -> DayCell {
        DayCell::active(date)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_press_release_is_click() {
        let c = Constraints::new();
        let mut drag = DragController::default();
        assert_eq!(drag.press(cell(date!(2024 - 01 - 10)), &c), None);
        assert_eq!(
            drag.session(),
            Some(DragSession {
                active: true,
                anchor: Some(date!(2024 - 01 - 10)),
                moved: false
            })
        );
        assert_eq!(drag.release(&c), Some(Commit::Click(date!(2024 - 01 - 10))));
        assert_eq!(drag.session(), None);
        assert_eq!(
            drag.phase(),
            DragPhase::Idle {
                swallow_click: true
            }
        );
        // The click reported for the same gesture is not a second selection
        assert_eq!(drag.click(cell(date!(2024 - 01 - 10)), &c), None);
        assert_eq!(
            drag.click(cell(date!(2024 - 01 - 10)), &c),
            Some(Commit::Click(date!(2024 - 01 - 10)))
        );
    }

    #[test]
    fn test_move_within_anchor_is_not_drag() {
        let c = Constraints::new();
        let t0 = Instant::now();
        let mut drag = DragController::default();
        drag.press(cell(date!(2024 - 01 - 10)), &c);
        assert_eq!(drag.move_to(cell(date!(2024 - 01 - 10)), &c, t0), None);
        assert_eq!(drag.session().map(|s| s.moved), Some(false));
    }

    #[test]
    fn test_drag_commits_anchor_then_debounced_span() {
        let c = Constraints::new();
        let t0 = Instant::now();
        let mut drag = DragController::default();
        drag.press(cell(date!(2024 - 01 - 10)), &c);
        assert_eq!(
            drag.move_to(cell(date!(2024 - 01 - 11)), &c, t0),
            Some(Commit::Anchor(date!(2024 - 01 - 10)))
        );
        assert_eq!(drag.move_to(cell(date!(2024 - 01 - 12)), &c, t0 + ms(4)), None);
        assert_eq!(drag.move_to(cell(date!(2024 - 01 - 15)), &c, t0 + ms(8)), None);
        assert_eq!(drag.tick(t0 + ms(16)), None);
        assert_eq!(
            drag.tick(t0 + ms(24)),
            Some(Commit::Span {
                anchor: date!(2024 - 01 - 10),
                target: date!(2024 - 01 - 15)
            })
        );
        assert_eq!(drag.tick(t0 + ms(50)), None);
        assert_eq!(
            drag.release(&c),
            Some(Commit::Finish {
                anchor: date!(2024 - 01 - 10),
                target: date!(2024 - 01 - 15)
            })
        );
        assert_eq!(
            drag.phase(),
            DragPhase::Idle {
                swallow_click: true
            }
        );
    }

    #[test]
    fn test_release_cancels_pending_move() {
        let c = Constraints::new();
        let t0 = Instant::now();
        let mut drag = DragController::default();
        drag.press(cell(date!(2024 - 01 - 10)), &c);
        drag.move_to(cell(date!(2024 - 01 - 12)), &c, t0);
        assert!(drag.next_deadline().is_some());
        assert_eq!(
            drag.release(&c),
            Some(Commit::Finish {
                anchor: date!(2024 - 01 - 10),
                target: date!(2024 - 01 - 12)
            })
        );
        assert_eq!(drag.next_deadline(), None);
        assert_eq!(drag.tick(t0 + ms(100)), None);
    }

    #[test]
    fn test_disabled_days_are_not_targets() {
        let c = Constraints::new().disable_dates([date!(2024 - 01 - 13)]);
        let t0 = Instant::now();
        let mut drag = DragController::default();
        drag.press(cell(date!(2024 - 01 - 10)), &c);
        drag.move_to(cell(date!(2024 - 01 - 12)), &c, t0);
        drag.move_to(cell(date!(2024 - 01 - 13)), &c, t0 + ms(1));
        assert_eq!(
            drag.span(),
            Some((date!(2024 - 01 - 10), date!(2024 - 01 - 12)))
        );
        assert_eq!(
            drag.release(&c),
            Some(Commit::Finish {
                anchor: date!(2024 - 01 - 10),
                target: date!(2024 - 01 - 12)
            })
        );
    }

    #[test]
    fn test_press_rejections() {
        let c = Constraints::new().disable_dates([date!(2024 - 01 - 13)]);
        let mut drag = DragController::default();
        assert_eq!(drag.press(cell(date!(2024 - 01 - 13)), &c), None);
        assert!(!drag.is_active());
        let passive = DayCell {
            date: date!(2024 - 02 - 01),
            passive: true,
        };
        assert_eq!(drag.press(passive, &c), None);
        assert!(!drag.is_active());
        let mut drag = DragController::new(DragOptions {
            adjacent_days_selectable: true,
            ..DragOptions::default()
        });
        drag.press(passive, &c);
        assert!(drag.is_active());
    }

    #[test]
    fn test_drag_disabled_press_clicks() {
        let c = Constraints::<NoDays>::default();
        let mut drag = DragController::new(DragOptions {
            enabled: false,
            ..DragOptions::default()
        });
        assert_eq!(
            drag.press(cell(date!(2024 - 01 - 10)), &c),
            Some(Commit::Click(date!(2024 - 01 - 10)))
        );
        assert!(!drag.is_active());
        assert_eq!(
            drag.move_to(cell(date!(2024 - 01 - 11)), &c, Instant::now()),
            None
        );
        assert_eq!(drag.release(&c), None);
        assert_eq!(drag.click(cell(date!(2024 - 01 - 10)), &c), None);
    }

    #[test]
    fn test_drag_passes_over_adjacent_month_days() {
        let c = Constraints::new();
        let t0 = Instant::now();
        let mut drag = DragController::default();
        assert!(!drag.options().adjacent_days_selectable);
        drag.press(cell(date!(2024 - 01 - 29)), &c);
        let passive = DayCell {
            date: date!(2024 - 02 - 02),
            passive: true,
        };
        assert_eq!(
            drag.move_to(passive, &c, t0),
            Some(Commit::Anchor(date!(2024 - 01 - 29)))
        );
        assert_eq!(
            drag.span(),
            Some((date!(2024 - 01 - 29), date!(2024 - 02 - 02)))
        );
        assert_eq!(
            drag.release(&c),
            Some(Commit::Finish {
                anchor: date!(2024 - 01 - 29),
                target: date!(2024 - 02 - 02)
            })
        );
    }

    #[test]
    fn test_click_after_drag_is_swallowed() {
        let c = Constraints::new();
        let t0 = Instant::now();
        let mut drag = DragController::default();
        drag.press(cell(date!(2024 - 01 - 10)), &c);
        drag.move_to(cell(date!(2024 - 01 - 12)), &c, t0);
        drag.release(&c);
        assert_eq!(drag.click(cell(date!(2024 - 01 - 12)), &c), None);
        assert_eq!(
            drag.click(cell(date!(2024 - 01 - 12)), &c),
            Some(Commit::Click(date!(2024 - 01 - 12)))
        );
    }

    #[test]
    fn test_cancel() {
        let c = Constraints::new();
        let t0 = Instant::now();
        let mut drag = DragController::default();
        drag.press(cell(date!(2024 - 01 - 10)), &c);
        drag.move_to(cell(date!(2024 - 01 - 12)), &c, t0);
        drag.cancel();
        assert!(!drag.is_active());
        assert_eq!(drag.tick(t0 + ms(100)), None);
        assert_eq!(drag.release(&c), None);
    }

    #[test]
    fn test_candidate_either_direction() {
        let r = Range::default();
        let fwd = candidate(&r, date!(2024 - 01 - 10), date!(2024 - 01 - 15));
        assert_eq!(fwd.start, Some(date!(2024 - 01 - 10)));
        assert_eq!(fwd.end, Some(date!(2024 - 01 - 15)));
        let back = candidate(&fwd, date!(2024 - 01 - 10), date!(2024 - 01 - 04));
        assert_eq!(back.start, Some(date!(2024 - 01 - 04)));
        assert_eq!(back.end, Some(date!(2024 - 01 - 10)));
        let same = candidate(&back, date!(2024 - 01 - 10), date!(2024 - 01 - 10));
        assert_eq!(same.start, Some(date!(2024 - 01 - 10)));
        assert_eq!(same.end, Some(date!(2024 - 01 - 10)));
    }
}
