//! Calendar dates with ISO-week arithmetic.
//!
//! A [`CalendarDate`] is a civil day in local time with no time-of-day
//! component. Its text form `YYYY-MM-DD` is the on-disk format of every
//! weekly database file name and task record, so it never depends on locale.
//!
//! A date can be locked, after which it refuses every mutation. Task records
//! lock their creation date so it stays fixed for the life of the task.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Write};
use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Serialize, Serializer};

use crate::error::ParseError;

/// Day of the week, Monday-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Days since Monday, `0..=6`.
    pub fn index(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        // chrono numbers from Monday already; Sunday-first platforms would need a remap here
        Weekday::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A civil calendar day that can be frozen with [`CalendarDate::lock`].
///
/// Equality, ordering and hashing look at the day only, never at the lock.
#[derive(Debug, Clone, Copy)]
pub struct CalendarDate {
    day: NaiveDate,
    locked: bool,
}

impl CalendarDate {
    /// Today in local civil time, unlocked.
    pub fn now() -> Self {
        Self::from_naive(Local::now().date_naive())
    }

    pub fn from_naive(day: NaiveDate) -> Self {
        Self { day, locked: false }
    }

    /// Build a date from civil components, `None` if no such day exists.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from_naive)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.day
    }

    pub fn year(&self) -> i32 {
        self.day.year()
    }

    /// Month of the year, `1..=12`.
    pub fn month(&self) -> u32 {
        self.day.month()
    }

    /// Day of the month, `1..=31`.
    pub fn day(&self) -> u32 {
        self.day.day()
    }

    pub fn week_day(&self) -> Weekday {
        self.day.weekday().into()
    }

    /// Week of the year counted in Monday-started weeks.
    ///
    /// Days before the first Monday of the year form a partial week 1. When
    /// January 1st is itself a Monday there is no partial week and that day
    /// opens week 1.
    pub fn week_number(&self) -> u32 {
        let Some(mut first_monday) = Self::from_ymd(self.year(), 1, 1) else {
            return 1;
        };
        let partial_first_week = first_monday.week_day() != Weekday::Monday;
        if partial_first_week {
            first_monday.shift_to(Weekday::Sunday);
            first_monday.shift(1);
        }
        if *self < first_monday {
            return 1;
        }

        let full_weeks = first_monday.days_to(&self.week_start()) / 7;
        let base = if partial_first_week { 2 } else { 1 };
        base + full_weeks as u32
    }

    /// Move by a signed number of days. No-op when locked.
    pub fn shift(&mut self, days: i64) {
        if self.locked || days == 0 {
            return;
        }
        let shifted = if days > 0 {
            self.day.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.day.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(day) = shifted {
            self.day = day;
        }
    }

    /// Move to the given weekday of the same Monday-started week.
    pub fn shift_to(&mut self, weekday: Weekday) {
        self.shift(weekday.index() - self.week_day().index());
    }

    /// Unlocked copy moved to the Monday of this date's week.
    pub fn week_start(&self) -> Self {
        let mut monday = Self::from_naive(self.day);
        monday.shift_to(Weekday::Monday);
        monday
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_to(&self, other: &CalendarDate) -> i64 {
        other.day.signed_duration_since(self.day).num_days()
    }

    /// Parse `DDDD-DD-DD` from the front of `input`.
    ///
    /// On success the cursor is advanced past the date and any following text
    /// is left alone. On failure neither `self` nor the cursor changes.
    pub fn read(&mut self, input: &mut &str) -> Result<(), ParseError> {
        if self.locked {
            return Err(ParseError::Locked);
        }
        let bytes = input.as_bytes();
        let year = digits(bytes, 0, 4)?;
        expect_byte(bytes, 4, b'-', "'-'")?;
        let month = digits(bytes, 5, 2)?;
        expect_byte(bytes, 7, b'-', "'-'")?;
        let day = digits(bytes, 8, 2)?;

        let parsed = NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or_else(|| ParseError::NoSuchDay(input[..10].to_string()))?;

        self.day = parsed;
        *input = &input[10..];
        Ok(())
    }

    /// Write the `YYYY-MM-DD` form to `sink`.
    pub fn write<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        write!(sink, "{self}")
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

fn digits(bytes: &[u8], offset: usize, count: usize) -> Result<u32, ParseError> {
    let mut value = 0u32;
    for pos in offset..offset + count {
        match bytes.get(pos) {
            Some(b) if b.is_ascii_digit() => value = value * 10 + u32::from(b - b'0'),
            _ => {
                return Err(ParseError::Unexpected {
                    expected: "digit",
                    offset: pos,
                })
            }
        }
    }
    Ok(value)
}

fn expect_byte(
    bytes: &[u8],
    offset: usize,
    wanted: u8,
    expected: &'static str,
) -> Result<(), ParseError> {
    if bytes.get(offset) == Some(&wanted) {
        Ok(())
    } else {
        Err(ParseError::Unexpected { expected, offset })
    }
}

impl Default for CalendarDate {
    fn default() -> Self {
        Self::now()
    }
}

impl PartialEq for CalendarDate {
    fn eq(&self, other: &Self) -> bool {
        self.day == other.day
    }
}

impl Eq for CalendarDate {}

impl PartialOrd for CalendarDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.day.cmp(&other.day)
    }
}

impl Hash for CalendarDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.day.hash(state);
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year(),
            self.month(),
            self.day()
        )
    }
}

/// Parses a whole string; unlike [`CalendarDate::read`] trailing text is an error.
impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut date = CalendarDate::now();
        let mut cursor = s;
        date.read(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(ParseError::TrailingInput(cursor.to_string()));
        }
        Ok(date)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().expect("valid date")
    }

    #[test]
    fn display_is_zero_padded() {
        let d = CalendarDate::from_ymd(987, 3, 4).expect("date");
        assert_eq!(d.to_string(), "0987-03-04");
    }

    #[test]
    fn text_round_trip() {
        for raw in ["2011-01-26", "2020-02-29", "1999-12-31", "2024-01-01"] {
            let parsed = date(raw);
            assert_eq!(parsed.to_string(), raw);
            assert_eq!(date(&parsed.to_string()), parsed);
        }
    }

    #[test]
    fn read_rejects_days_that_do_not_exist() {
        let mut target = date("2020-05-05");
        let mut cursor = "2021-02-30";
        let err = target.read(&mut cursor).expect_err("no such day");
        assert_eq!(err, ParseError::NoSuchDay("2021-02-30".to_string()));
        assert_eq!(target, date("2020-05-05"));
        assert_eq!(cursor, "2021-02-30");
    }

    #[test]
    fn read_rejects_malformed_digits() {
        let mut target = date("2020-05-05");
        for raw in ["2021-2-03", "20a1-02-03", "2021/02/03", "2021-02-0", ""] {
            let mut cursor = raw;
            assert!(target.read(&mut cursor).is_err(), "{raw} should fail");
            assert_eq!(cursor, raw);
        }
        assert_eq!(target, date("2020-05-05"));
    }

    #[test]
    fn read_leaves_trailing_input() {
        let mut target = CalendarDate::now();
        let mut cursor = "2021-03-04:A:rest";
        target.read(&mut cursor).expect("read");
        assert_eq!(target, date("2021-03-04"));
        assert_eq!(cursor, ":A:rest");
    }

    #[test]
    fn from_str_rejects_trailing_input() {
        let err = "2021-03-04x".parse::<CalendarDate>().expect_err("trailing");
        assert_eq!(err, ParseError::TrailingInput("x".to_string()));
    }

    #[test]
    fn locked_date_ignores_mutation() {
        let mut d = date("2021-03-04");
        d.lock();
        assert!(d.is_locked());

        d.shift(3);
        d.shift_to(Weekday::Sunday);
        assert_eq!(d, date("2021-03-04"));

        let mut cursor = "2022-01-01";
        assert_eq!(d.read(&mut cursor), Err(ParseError::Locked));
        assert_eq!(d, date("2021-03-04"));
    }

    #[test]
    fn comparisons_ignore_lock() {
        let plain = date("2021-03-04");
        let mut locked = plain;
        locked.lock();
        assert_eq!(plain, locked);
        assert!(plain <= locked);
        assert!(date("2021-03-03") < locked);
    }

    #[test]
    fn week_day_is_monday_first() {
        assert_eq!(date("2024-01-01").week_day(), Weekday::Monday);
        assert_eq!(date("2024-01-06").week_day(), Weekday::Saturday);
        assert_eq!(date("2024-01-07").week_day(), Weekday::Sunday);
        assert_eq!(Weekday::Sunday.index(), 6);
    }

    #[test]
    fn shift_to_stays_within_week() {
        let mut d = date("2024-01-07");
        d.shift_to(Weekday::Monday);
        assert_eq!(d, date("2024-01-01"));

        let mut d = date("2024-01-01");
        d.shift_to(Weekday::Sunday);
        assert_eq!(d, date("2024-01-07"));
    }

    #[test]
    fn shift_to_is_idempotent() {
        for start in ["2024-02-14", "2023-12-31", "2021-01-01"] {
            for weekday in Weekday::ALL {
                let mut once = date(start);
                once.shift_to(weekday);
                let mut twice = once;
                twice.shift_to(weekday);
                assert_eq!(once, twice);
                assert_eq!(once.week_day(), weekday);
            }
        }
    }

    #[test]
    fn shift_crosses_month_and_year() {
        let mut d = date("2023-12-30");
        d.shift(3);
        assert_eq!(d, date("2024-01-02"));
        d.shift(-33);
        assert_eq!(d, date("2023-11-30"));
    }

    #[test]
    fn days_to_is_signed() {
        let a = date("2024-03-01");
        let b = date("2024-02-27");
        assert_eq!(a.days_to(&b), -3);
        assert_eq!(b.days_to(&a), 3);
        assert_eq!(a.days_to(&a), 0);
    }

    #[test]
    fn week_start_returns_monday() {
        let mut locked = date("2024-01-04");
        locked.lock();
        let monday = locked.week_start();
        assert_eq!(monday, date("2024-01-01"));
        assert!(!monday.is_locked());
    }

    #[test]
    fn week_number_when_year_starts_on_monday() {
        // 2024-01-01 is a Monday
        assert_eq!(date("2024-01-01").week_number(), 1);
        assert_eq!(date("2024-01-07").week_number(), 1);
        assert_eq!(date("2024-01-08").week_number(), 2);
        assert_eq!(date("2024-01-15").week_number(), 3);
        let mut d = date("2024-01-01");
        for week in 1..=52 {
            assert_eq!(d.week_number(), week);
            d.shift(7);
        }
    }

    #[test]
    fn week_number_with_partial_first_week() {
        // 2021-01-01 is a Friday, the first Monday is 2021-01-04
        assert_eq!(date("2021-01-01").week_number(), 1);
        assert_eq!(date("2021-01-03").week_number(), 1);
        assert_eq!(date("2021-01-04").week_number(), 2);
        assert_eq!(date("2021-01-10").week_number(), 2);
        assert_eq!(date("2021-01-11").week_number(), 3);
        assert_eq!(date("2021-12-31").week_number(), 53);
    }

    #[test]
    fn write_emits_text_form() {
        let mut out = Vec::new();
        date("2011-01-26").write(&mut out).expect("write");
        assert_eq!(out, b"2011-01-26");
    }
}
