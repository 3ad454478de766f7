use crate::day::{iter_days_after, start_of_month, start_of_week, DAYS_IN_WEEK};
use std::iter::once;
use thiserror::Error;
use time::{Date, Month, Weekday};

/// Every month grid shows this many weeks, regardless of the month's length
pub const WEEKS_SHOWN: usize = 6;

pub const DAYS_SHOWN: usize = WEEKS_SHOWN * DAYS_IN_WEEK as usize;

/// A day as shown in one month panel
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DayCell {
    pub date: Date,
    /// The day belongs to a neighboring month and is only shown to fill out
    /// the grid
    pub passive: bool,
}

impl DayCell {
    /// A cell for `date` in the panel showing the month of `month`
    pub fn new(date: Date, month: Date) -> DayCell {
        DayCell {
            date,
            passive: (date.year(), date.month()) != (month.year(), month.month()),
        }
    }

    /// A cell that is part of whatever month is being shown
    pub fn active(date: Date) -> DayCell {
        DayCell {
            date,
            passive: false,
        }
    }

    pub fn day(&self) -> u8 {
        self.date.day()
    }
}

/// The 42 contiguous days displayed for one month, starting on the
/// configured first day of the week
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MonthGrid {
    month: Date,
    week_start: Weekday,
    days: [DayCell; DAYS_SHOWN],
}

impl MonthGrid {
    pub fn new(month: Date, week_start: Weekday) -> Result<MonthGrid, OutOfTimeError> {
        let month = start_of_month(month);
        let first = start_of_week(month, week_start).ok_or(OutOfTimeError)?;
        let days = once(first)
            .chain(iter_days_after(first))
            .take(DAYS_SHOWN)
            .map(|d| DayCell::new(d, month))
            .collect::<Vec<_>>();
        let days = <[DayCell; DAYS_SHOWN]>::try_from(days).map_err(|_| OutOfTimeError)?;
        Ok(MonthGrid {
            month,
            week_start,
            days,
        })
    }

    /// The first day of the month this grid shows
    pub fn month(&self) -> Date {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.month.year()
    }

    pub fn month_name(&self) -> Month {
        self.month.month()
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// The weekdays in column order
    pub fn weekdays(&self) -> [Weekday; DAYS_IN_WEEK as usize] {
        let mut wd = self.week_start;
        std::array::from_fn(|_| {
            let r = wd;
            wd = wd.next();
            r
        })
    }

    pub fn days(&self) -> &[DayCell] {
        &self.days
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> + '_ {
        self.days.chunks(DAYS_IN_WEEK.into())
    }

    /// The cell in the given row (week) and column (weekday) of the grid
    pub fn cell(&self, row: usize, column: usize) -> Option<DayCell> {
        if column >= usize::from(DAYS_IN_WEEK) {
            return None;
        }
        self.days
            .get(row * usize::from(DAYS_IN_WEEK) + column)
            .copied()
    }

    pub fn position(&self, date: Date) -> Option<(usize, usize)> {
        let i = self.days.iter().position(|c| c.date == date)?;
        let width = usize::from(DAYS_IN_WEEK);
        Some((i / width, i % width))
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub struct OutOfTimeError;
