use crate::day::ToDay;
use time::{Date, Weekday};

/// A caller-supplied rule marking additional days as unselectable
pub trait DayPredicate {
    fn matches(&self, day: Date) -> bool;
}

impl<F: Fn(Date) -> bool> DayPredicate for F {
    fn matches(&self, day: Date) -> bool {
        self(day)
    }
}

/// Predicate that matches no day
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct NoDays;

impl DayPredicate for NoDays {
    fn matches(&self, _day: Date) -> bool {
        false
    }
}

/// Predicate matching every day that falls on one of a set of weekdays
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn new() -> WeekdaySet {
        WeekdaySet(0)
    }

    pub fn weekends() -> WeekdaySet {
        WeekdaySet::from_iter([Weekday::Saturday, Weekday::Sunday])
    }

    pub fn insert(&mut self, wd: Weekday) {
        self.0 |= 1 << wd.number_days_from_sunday();
    }

    pub fn contains(&self, wd: Weekday) -> bool {
        self.0 & (1 << wd.number_days_from_sunday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> WeekdaySet {
        let mut set = WeekdaySet::new();
        for wd in iter {
            set.insert(wd);
        }
        set
    }
}

impl DayPredicate for WeekdaySet {
    fn matches(&self, day: Date) -> bool {
        self.contains(day.weekday())
    }
}

/// Everything that can make a day unselectable.
///
/// Whether a day belongs to the month a panel is showing is deliberately not
/// part of this: adjacent-month days are a display concern.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Constraints<P> {
    pub min_date: Option<Date>,
    pub max_date: Option<Date>,
    pub disabled_dates: Vec<Date>,
    pub predicate: P,
}

impl Constraints<NoDays> {
    pub fn new() -> Constraints<NoDays> {
        Constraints {
            min_date: None,
            max_date: None,
            disabled_dates: Vec::new(),
            predicate: NoDays,
        }
    }
}

impl<P> Constraints<P> {
    pub fn min_date<T: ToDay + ?Sized>(mut self, date: &T) -> Self {
        self.min_date = date.to_day();
        self
    }

    pub fn max_date<T: ToDay + ?Sized>(mut self, date: &T) -> Self {
        self.max_date = date.to_day();
        self
    }

    /// Add dates to the disabled list; inputs that aren't dates are dropped
    pub fn disable_dates<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToDay,
    {
        self.disabled_dates
            .extend(dates.into_iter().filter_map(|d| d.to_day()));
        self
    }

    pub fn with_predicate<Q>(self, predicate: Q) -> Constraints<Q> {
        Constraints {
            min_date: self.min_date,
            max_date: self.max_date,
            disabled_dates: self.disabled_dates,
            predicate,
        }
    }
}

impl<P: DayPredicate> Constraints<P> {
    pub fn is_disabled(&self, day: Date) -> bool {
        is_disabled(day, self)
    }
}

/// True if `day` is before the minimum date, after the maximum date, listed
/// among the disabled dates, or matched by the custom predicate
pub fn is_disabled<P: DayPredicate>(day: Date, constraints: &Constraints<P>) -> bool {
    constraints.min_date.is_some_and(|min| day < min)
        || constraints.max_date.is_some_and(|max| day > max)
        || constraints.disabled_dates.contains(&day)
        || constraints.predicate.matches(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_unconstrained() {
        let c = Constraints::new();
        assert!(!c.is_disabled(date!(2024 - 01 - 10)));
        assert!(!c.is_disabled(Date::MIN));
        assert!(!c.is_disabled(Date::MAX));
    }

    #[test]
    fn test_min_max_inclusive() {
        let c = Constraints::new()
            .min_date("2024-01-10")
            .max_date(&date!(2024 - 01 - 20));
        assert!(c.is_disabled(date!(2024 - 01 - 09)));
        assert!(!c.is_disabled(date!(2024 - 01 - 10)));
        assert!(!c.is_disabled(date!(2024 - 01 - 20)));
        assert!(c.is_disabled(date!(2024 - 01 - 21)));
    }

    #[test]
    fn test_unparseable_bound_is_absent() {
        let c = Constraints::new().min_date("whenever");
        assert_eq!(c.min_date, None);
        assert!(!c.is_disabled(date!(1900 - 01 - 01)));
    }

    #[test]
    fn test_disabled_dates_ignore_time_of_day() {
        let c = Constraints::new().disable_dates([
            datetime!(2024-01-12 18:45:00),
            datetime!(2024-01-14 00:00:01),
        ]);
        assert!(c.is_disabled(date!(2024 - 01 - 12)));
        assert!(!c.is_disabled(date!(2024 - 01 - 13)));
        assert!(c.is_disabled(date!(2024 - 01 - 14)));
    }

    #[test]
    fn test_disabled_dates_drop_garbage() {
        let c = Constraints::new().disable_dates(["2024-01-12", "nope"]);
        assert_eq!(c.disabled_dates, vec![date!(2024 - 01 - 12)]);
    }

    #[test]
    fn test_closure_predicate() {
        let c = Constraints::new().with_predicate(|d: Date| d.day() == 13);
        assert!(c.is_disabled(date!(2024 - 09 - 13)));
        assert!(!c.is_disabled(date!(2024 - 09 - 14)));
    }

    #[test]
    fn test_weekday_set() {
        let c = Constraints::new().with_predicate(WeekdaySet::weekends());
        // 2024-01-13 is a Saturday
        assert!(c.is_disabled(date!(2024 - 01 - 13)));
        assert!(c.is_disabled(date!(2024 - 01 - 14)));
        assert!(!c.is_disabled(date!(2024 - 01 - 15)));
        assert!(WeekdaySet::new().is_empty());
    }
}
