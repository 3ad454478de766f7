//! Date-range selection for calendar interfaces.
//!
//! The [`Picker`] turns raw pointer and keyboard input from any number of
//! side-by-side month panels into one normalized [`Range`], with click and
//! drag selection, a hover preview, and disabled-day constraints.  It draws
//! nothing itself: callers lay out the [`MonthGrid`]s it provides, report
//! which [`DayCell`] each event landed on, and drain the resulting
//! [`PickerEvent`]s.
//!
//! Time is passed in explicitly wherever it matters, so a picker driven by
//! the same inputs always ends in the same state.
pub mod calendar;
pub mod config;
pub mod day;
pub mod debounce;
pub mod disabled;
pub mod drag;
pub mod picker;
pub mod preview;
pub mod range;
pub use crate::calendar::{DayCell, MonthGrid, OutOfTimeError};
pub use crate::config::{ConfigError, PickerConfig};
pub use crate::day::{parse, ToDay};
pub use crate::disabled::{is_disabled, Constraints, DayPredicate, NoDays, WeekdaySet};
pub use crate::picker::{Picker, PickerEvent, PickerOptions};
pub use crate::preview::preview;
pub use crate::range::{assign, normalize, range_for_date, AssignPolicy, Part, Range};
