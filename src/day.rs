//! Day-granularity date values.
//!
//! Every date that enters the picker passes through [`ToDay`], which reduces
//! it to a [`time::Date`].  Input that cannot be understood becomes `None`
//! rather than an error, and is from then on treated as an absent endpoint.
use std::cmp::Ordering;
use std::iter::successors;
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Weekday,
};

pub const DAYS_IN_WEEK: u8 = 7;

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

static YMD_SLASH_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]/[month]/[day]");

static DATETIME_T_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

static DATETIME_SPACE_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Conversion of assorted date representations into a calendar day.
///
/// Time-of-day and offsets are discarded without conversion: an
/// `OffsetDateTime` yields the calendar day in its own offset, and epoch
/// timestamps (in seconds) yield the UTC calendar day.
pub trait ToDay {
    fn to_day(&self) -> Option<Date>;
}

impl ToDay for Date {
    fn to_day(&self) -> Option<Date> {
        Some(*self)
    }
}

impl ToDay for PrimitiveDateTime {
    fn to_day(&self) -> Option<Date> {
        Some(self.date())
    }
}

impl ToDay for OffsetDateTime {
    fn to_day(&self) -> Option<Date> {
        Some(self.date())
    }
}

impl ToDay for i64 {
    fn to_day(&self) -> Option<Date> {
        OffsetDateTime::from_unix_timestamp(*self)
            .ok()
            .map(OffsetDateTime::date)
    }
}

impl ToDay for str {
    fn to_day(&self) -> Option<Date> {
        parse_text(self)
    }
}

impl ToDay for String {
    fn to_day(&self) -> Option<Date> {
        parse_text(self)
    }
}

impl<T: ToDay + ?Sized> ToDay for &T {
    fn to_day(&self) -> Option<Date> {
        (**self).to_day()
    }
}

impl<T: ToDay> ToDay for Option<T> {
    fn to_day(&self) -> Option<Date> {
        self.as_ref().and_then(ToDay::to_day)
    }
}

/// Normalize `input` to a calendar day, or `None` if it can't be understood.
///
/// `parse(&parse(x)) == parse(x)` for every input.
pub fn parse<T: ToDay + ?Sized>(input: &T) -> Option<Date> {
    input.to_day()
}

fn parse_text(s: &str) -> Option<Date> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = Date::parse(s, &YMD_FMT) {
        return Some(d);
    }
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(dt.date());
    }
    [DATETIME_T_FMT, DATETIME_SPACE_FMT]
        .into_iter()
        .find_map(|fmt| PrimitiveDateTime::parse(s, &fmt).ok())
        .map(PrimitiveDateTime::date)
        .or_else(|| Date::parse(s, &YMD_SLASH_FMT).ok())
}

pub fn compare_day(a: Date, b: Date) -> Ordering {
    a.cmp(&b)
}

pub fn add_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(Duration::days(days))
}

/// Move `date` by `months` calendar months, clamping the day of the month to
/// the length of the target month (January 31 plus one month is the last day
/// of February).
pub fn add_months(date: Date, months: i32) -> Option<Date> {
    let index = date
        .year()
        .checked_mul(12)?
        .checked_add(i32::from(u8::from(date.month())) - 1)?
        .checked_add(months)?;
    let year = index.div_euclid(12);
    let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let day = date.day().min(days_in_month(first));
    first.replace_day(day).ok()
}

/// The first instant of `date`, for callers that need a datetime rather than
/// a bare day
pub fn start_of_day(date: Date) -> PrimitiveDateTime {
    date.midnight()
}

pub fn start_of_month(date: Date) -> Date {
    // Day 1 exists in every month
    date.replace_day(1).unwrap_or(date)
}

/// Returns the first day of the week containing `date`, for weeks beginning
/// on `week_start`.  Returns `None` only at the very beginning of time.
pub fn start_of_week(date: Date, week_start: Weekday) -> Option<Date> {
    let back = (date.weekday().number_days_from_sunday() + DAYS_IN_WEEK
        - week_start.number_days_from_sunday())
        % DAYS_IN_WEEK;
    add_days(date, -i64::from(back))
}

pub fn days_in_month(date: Date) -> u8 {
    match date.month() {
        Month::February if time::util::is_leap_year(date.year()) => 29,
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

/// Convert a week-start index (0 = Sunday … 6 = Saturday) to a [`Weekday`]
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    (index < DAYS_IN_WEEK).then(|| Weekday::Sunday.nth_next(index))
}

/// The weekday that ends a week beginning on `week_start`
pub fn last_weekday(week_start: Weekday) -> Weekday {
    week_start.previous()
}

pub fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day()).skip(1)
}
