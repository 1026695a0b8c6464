//! Weekday and operating-day types.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// Error returned for a day number outside 1..=7.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid weekday number {0}: must be 1 (Monday) to 7 (Sunday)")]
pub struct InvalidWeekday(pub u8);

/// A day of the week as used by segment schedules: 1 = Monday .. 7 = Sunday.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Weekday(u8);

impl Weekday {
    /// Construct from a day number, 1 (Monday) to 7 (Sunday).
    pub fn new(number: u8) -> Result<Self, InvalidWeekday> {
        if (1..=7).contains(&number) {
            Ok(Weekday(number))
        } else {
            Err(InvalidWeekday(number))
        }
    }

    /// The weekday a calendar date falls on.
    pub fn from_date(date: NaiveDate) -> Self {
        // number_from_monday is 1..=7 by construction
        Weekday(date.weekday().number_from_monday() as u8)
    }

    /// The day number, 1..=7.
    pub fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Debug for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Weekday({})", self.0)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The set of weekdays on which a segment operates.
///
/// Stored as a bitmask; duplicate day numbers in the input collapse.
/// Serialized as a sorted array of day numbers (e.g. `[1, 2, 5]`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OperatingDays(u8);

impl OperatingDays {
    /// The empty set: a segment that never operates.
    pub fn none() -> Self {
        OperatingDays(0)
    }

    /// Every day of the week.
    pub fn every_day() -> Self {
        OperatingDays(0b0111_1111)
    }

    /// Build from raw day numbers, rejecting anything outside 1..=7.
    pub fn from_numbers<I: IntoIterator<Item = u8>>(days: I) -> Result<Self, InvalidWeekday> {
        let mut mask = 0u8;
        for n in days {
            mask |= 1 << (Weekday::new(n)?.number() - 1);
        }
        Ok(OperatingDays(mask))
    }

    /// Whether the segment operates on the given weekday.
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << (day.number() - 1)) != 0
    }

    /// Add a day to the set.
    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << (day.number() - 1);
    }

    /// The days in the set, ascending.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        (1..=7).filter_map(move |n| {
            let day = Weekday(n);
            self.contains(day).then_some(day)
        })
    }

    /// Number of days in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if the segment operates on no day at all.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Weekday> for OperatingDays {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut days = OperatingDays::none();
        for day in iter {
            days.insert(day);
        }
        days
    }
}

impl fmt::Debug for OperatingDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|d| d.number())).finish()
    }
}

impl Serialize for OperatingDays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for day in self.iter() {
            seq.serialize_element(&day.number())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for OperatingDays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let numbers = Vec::<u8>::deserialize(deserializer)?;
        OperatingDays::from_numbers(numbers).map_err(de::Error::custom)
    }
}
