// SPDX-License-Identifier: MIT

//!
//! Conversion between calendar dates and epidemiological weeks
//!
//! Boundary arithmetic is done on day numbers (days since the start of the
//! common era, as per [`Datelike::num_days_from_ce`]) rather than on
//! [`NaiveDate`]s, so resolving the week of any representable date can't fail
//! even at the very ends of chrono's range.
//!

use crate::{
    CalendarRules, EpiWeek, EpiWeekError, EpiWeekRange, Preset, RESPIRATORY_SEASON_END_WEEK,
    RESPIRATORY_SEASON_START_WEEK, Week,
};
use chrono::{Datelike, Days, NaiveDate};
use log::trace;
use serde::Serialize;
use thiserror::Error;

const DAYS_PER_WEEK: i64 = 7;

/// Errors that can arise when converting weeks to dates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error(transparent)]
    Week(#[from] EpiWeekError),

    /// The dates of the week can't be represented
    #[error("The dates of week {week} of {year} are out of range")]
    DateOutOfRange { year: i32, week: u8 },
}

/// The first and last day of an epidemiological week
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WeekDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekDates {
    /// Whether `date` falls within the week
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Each day of the week in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while(|day| *day <= self.end)
    }
}

/// Day number of 1 January of `year` in the proleptic Gregorian calendar
fn jan_1_day_number(year: i64) -> i64 {
    let y = year - 1;
    365 * y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400) + 1
}

/// Weekday of a day number, counted from Monday = 0 (day 1 was a Monday)
fn weekday_from_monday(day_number: i64) -> i64 {
    (day_number - 1).rem_euclid(DAYS_PER_WEEK)
}

fn date_from_day_number(day_number: i64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(i32::try_from(day_number).ok()?)
}

/// Epidemiological week calendar for a fixed set of [`CalendarRules`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EpiWeekCalendar {
    rules: CalendarRules,
}

impl EpiWeekCalendar {
    pub fn new(rules: CalendarRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> CalendarRules {
        self.rules
    }

    /// Day number on which week 1 of `year` starts
    fn week1_start_day(&self, year: i64) -> i64 {
        let jan_1 = jan_1_day_number(year);
        let anchor = i64::from(self.rules.anchor_weekday().num_days_from_monday());

        // First anchor weekday on or after 1 January
        let mut anchor_day_of_month =
            1 + (anchor - weekday_from_monday(jan_1)).rem_euclid(DAYS_PER_WEEK);
        if anchor_day_of_month < i64::from(self.rules.min_january_days()) {
            anchor_day_of_month += DAYS_PER_WEEK;
        }

        jan_1 + (anchor_day_of_month - 1) - (DAYS_PER_WEEK - 1)
    }

    /// Day number on which `week` starts (no check that week 53 exists)
    fn week_start_day(&self, week: EpiWeek) -> i64 {
        self.week1_start_day(i64::from(week.year()))
            + (i64::from(week.week().value()) - 1) * DAYS_PER_WEEK
    }

    /// First day of week 1 of `year`, if representable
    pub fn week1_start(&self, year: i32) -> Option<NaiveDate> {
        date_from_day_number(self.week1_start_day(i64::from(year)))
    }

    /// The epidemiological week `date` falls in
    pub fn epi_week_of(&self, date: NaiveDate) -> EpiWeek {
        let day = i64::from(date.num_days_from_ce());
        let candidate = i64::from(date.year());
        let start = self.week1_start_day(candidate);

        let (year, start) = if day < start {
            trace!("{date} falls before week 1 of {candidate}");
            (candidate - 1, self.week1_start_day(candidate - 1))
        } else {
            let next_start = self.week1_start_day(candidate + 1);
            if day >= next_start {
                trace!("{date} falls in week 1 of {}", candidate + 1);
                (candidate + 1, next_start)
            } else {
                (candidate, start)
            }
        };

        // Within a year of `date.year()` so always fits, as does the week
        let week = (day - start).div_euclid(DAYS_PER_WEEK) + 1;
        EpiWeek::from_parts(year as i32, Week::from_raw(week as u8))
    }

    /// The first and last day of week `week` of `year`.
    ///
    /// Week 53 of a 52-week year isn't rejected, its dates are those of week 1
    /// of the following year.  Check with [`Self::is_valid`] if that matters.
    pub fn epi_week_to_date_range(
        &self,
        year: i32,
        week: i64,
    ) -> Result<WeekDates, CalendarError> {
        let week = EpiWeek::new(year, week)?;
        self.week_dates(week)
    }

    /// The first and last day of `week`
    pub fn week_dates(&self, week: EpiWeek) -> Result<WeekDates, CalendarError> {
        let out_of_range = || CalendarError::DateOutOfRange {
            year: week.year(),
            week: week.week().value(),
        };
        let start = date_from_day_number(self.week_start_day(week)).ok_or_else(out_of_range)?;
        let end = start
            .checked_add_days(Days::new(DAYS_PER_WEEK as u64 - 1))
            .ok_or_else(out_of_range)?;
        Ok(WeekDates { start, end })
    }

    /// Number of epidemiological weeks in `year` (52 or 53)
    pub fn weeks_in_year(&self, year: i32) -> u8 {
        let year = i64::from(year);
        let days = self.week1_start_day(year + 1) - self.week1_start_day(year);
        (days / DAYS_PER_WEEK) as u8
    }

    /// Whether `week` actually exists (i.e. isn't week 53 of a 52-week year)
    pub fn is_valid(&self, week: EpiWeek) -> bool {
        week.week().value() <= self.weeks_in_year(week.year())
    }

    /// The week after `week`, if the year doesn't overflow
    pub fn next_week(&self, week: EpiWeek) -> Option<EpiWeek> {
        if week.week().value() >= self.weeks_in_year(week.year()) {
            Some(EpiWeek::from_parts(week.year().checked_add(1)?, Week::from_raw(1)))
        } else {
            Some(EpiWeek::from_parts(
                week.year(),
                Week::from_raw(week.week().value() + 1),
            ))
        }
    }

    /// The week before `week`, if the year doesn't overflow
    pub fn previous_week(&self, week: EpiWeek) -> Option<EpiWeek> {
        if week.week().value() == 1 {
            let year = week.year().checked_sub(1)?;
            Some(EpiWeek::from_parts(
                year,
                Week::from_raw(self.weeks_in_year(year)),
            ))
        } else {
            Some(EpiWeek::from_parts(
                week.year(),
                Week::from_raw(week.week().value() - 1),
            ))
        }
    }

    /// The real number of weeks in `range`, accounting for 53-week years
    pub fn exact_week_count(&self, range: EpiWeekRange) -> i64 {
        let days = self.week_start_day(range.hasta()) - self.week_start_day(range.desde());
        days / DAYS_PER_WEEK + 1
    }

    /// The week `n` real calendar weeks before `from`, if representable
    pub fn exact_weeks_ago(&self, from: EpiWeek, n: u32) -> Option<EpiWeek> {
        let day = self.week_start_day(from) - i64::from(n) * DAYS_PER_WEEK;
        date_from_day_number(day).map(|date| self.epi_week_of(date))
    }

    /// Every week that exists within `range`, in order
    pub fn weeks(&self, range: EpiWeekRange) -> Vec<EpiWeek> {
        let mut weeks = Vec::new();
        let mut current = Some(range.desde());
        while let Some(week) = current {
            if week > range.hasta() {
                break;
            }
            if self.is_valid(week) {
                weeks.push(week);
            }
            current = self.next_week(week);
        }
        weeks
    }

    /// Resolve a named period against `today`
    pub fn preset_range(&self, kind: Preset, today: NaiveDate) -> EpiWeekRange {
        let current = self.epi_week_of(today);
        let year = current.year();
        let week = |year: i32, week: u8| EpiWeek::from_parts(year, Week::from_raw(week));
        let rolling = |length: u32| EpiWeekRange::new(current.weeks_ago(length - 1), current);

        match kind {
            Preset::LastWeek => rolling(1),
            Preset::Last4Weeks => rolling(4),
            Preset::Last12Weeks => rolling(12),
            Preset::Last52Weeks => rolling(52),
            Preset::RespiratorySeason => {
                let start_year = if current.week().value() >= RESPIRATORY_SEASON_START_WEEK {
                    year
                } else {
                    year - 1
                };
                EpiWeekRange::new(
                    week(start_year, RESPIRATORY_SEASON_START_WEEK),
                    week(start_year + 1, RESPIRATORY_SEASON_END_WEEK),
                )
            }
            Preset::YearToDate => EpiWeekRange::new(week(year, 1), current),
            Preset::FullYear => {
                EpiWeekRange::new(week(year, 1), week(year, self.weeks_in_year(year)))
            }
            Preset::PreviousYear => {
                let year = year - 1;
                EpiWeekRange::new(week(year, 1), week(year, self.weeks_in_year(year)))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Weekday;
    use epi_calendar_macros::epi_week;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn mmwr() -> EpiWeekCalendar {
        EpiWeekCalendar::new(CalendarRules::mmwr())
    }

    #[test]
    fn day_numbers_match_chrono() {
        for year in [-400, -1, 0, 1, 4, 100, 1900, 2000, 2024, 2025, 9999] {
            assert_eq!(
                jan_1_day_number(i64::from(year)),
                i64::from(date(year, 1, 1).num_days_from_ce())
            );
            assert_eq!(
                weekday_from_monday(jan_1_day_number(i64::from(year))),
                i64::from(date(year, 1, 1).weekday().num_days_from_monday())
            );
        }
    }

    #[test]
    fn year_boundary_regressions() {
        let calendar = mmwr();
        assert_eq!(calendar.epi_week_of(date(2024, 12, 29)), epi_week!(2025, 1));
        assert_eq!(calendar.epi_week_of(date(2025, 1, 1)), epi_week!(2025, 1));
        assert_eq!(calendar.epi_week_of(date(2025, 1, 4)), epi_week!(2025, 1));
        assert_eq!(calendar.epi_week_of(date(2025, 1, 5)), epi_week!(2025, 2));
        assert_eq!(calendar.epi_week_of(date(2025, 1, 11)), epi_week!(2025, 2));
    }

    #[test]
    fn late_december_rolls_forward() {
        let calendar = mmwr();
        assert_eq!(calendar.epi_week_of(date(2023, 12, 30)), epi_week!(2023, 52));
        assert_eq!(calendar.epi_week_of(date(2023, 12, 31)), epi_week!(2024, 1));
        assert_eq!(calendar.epi_week_of(date(2019, 12, 29)), epi_week!(2020, 1));
    }

    #[test]
    fn early_january_rolls_back() {
        let calendar = mmwr();
        assert_eq!(calendar.epi_week_of(date(2022, 1, 1)), epi_week!(2021, 52));
        assert_eq!(calendar.epi_week_of(date(2022, 1, 2)), epi_week!(2022, 1));
        assert_eq!(calendar.epi_week_of(date(2021, 1, 2)), epi_week!(2020, 53));
        assert_eq!(calendar.epi_week_of(date(2026, 1, 3)), epi_week!(2025, 53));
        assert_eq!(calendar.epi_week_of(date(2026, 1, 4)), epi_week!(2026, 1));
    }

    #[test]
    fn weeks_in_year() {
        let calendar = mmwr();
        for year in [2014, 2020, 2025] {
            assert_eq!(calendar.weeks_in_year(year), 53, "{year}");
        }
        for year in [2015, 2021, 2022, 2023, 2024, 2026] {
            assert_eq!(calendar.weeks_in_year(year), 52, "{year}");
        }
        assert_eq!(calendar.epi_week_of(date(2014, 12, 31)), epi_week!(2014, 53));
        assert_eq!(calendar.epi_week_of(date(2015, 12, 31)), epi_week!(2015, 52));
        assert!(calendar.is_valid(epi_week!(2020, 53)));
        assert!(!calendar.is_valid(epi_week!(2021, 53)));
    }

    #[test]
    fn week_always_in_bounds_and_monotonic() {
        let calendar = mmwr();
        let mut previous = calendar.epi_week_of(date(1899, 12, 31));
        for day in date(1900, 1, 1).iter_days().take(365 * 250) {
            let week = calendar.epi_week_of(day);
            assert!((1..=53).contains(&week.week().value()), "{day}");
            assert!(calendar.is_valid(week), "{day}");

            // Either the same week or the very next one
            if week != previous {
                assert_eq!(calendar.next_week(previous), Some(week), "{day}");
                assert_eq!(day.weekday(), Weekday::Sun, "{day}");
            }

            // Dates a week or more apart are in strictly ordered weeks
            let week_later = calendar.epi_week_of(day + Days::new(7));
            assert!(week.is_before(&week_later), "{day}");

            previous = week;
        }
    }

    #[test]
    fn iso_rules_match_iso_week() {
        let calendar = EpiWeekCalendar::new(CalendarRules::iso());
        for day in date(1980, 1, 1).iter_days().take(365 * 60) {
            let iso = day.iso_week();
            let week = calendar.epi_week_of(day);
            assert_eq!((week.year(), u32::from(week.week().value())), (iso.year(), iso.week()));
        }
    }

    #[test]
    fn other_rules() {
        // Week 1 is whichever week contains 1 January
        let rules = CalendarRules::new(Weekday::Sun, 1).unwrap();
        let calendar = EpiWeekCalendar::new(rules);
        assert_eq!(calendar.epi_week_of(date(2022, 1, 1)), epi_week!(2022, 1));
        assert_eq!(calendar.week1_start(2022), Some(date(2021, 12, 26)));

        // Week 1 is the first full week of January
        let rules = CalendarRules::new(Weekday::Sun, 7).unwrap();
        let calendar = EpiWeekCalendar::new(rules);
        assert_eq!(calendar.week1_start(2025), Some(date(2025, 1, 5)));
        assert_eq!(calendar.epi_week_of(date(2025, 1, 4)), epi_week!(2024, 52));
    }

    #[test]
    fn epi_week_to_date_range() {
        let calendar = mmwr();
        let dates = calendar.epi_week_to_date_range(2025, 1).unwrap();
        assert_eq!(dates.start, date(2024, 12, 29));
        assert_eq!(dates.end, date(2025, 1, 4));
        assert!(dates.contains(date(2025, 1, 1)));
        assert!(!dates.contains(date(2025, 1, 5)));
        assert_eq!(dates.days().count(), 7);

        let dates = calendar.epi_week_to_date_range(2025, 53).unwrap();
        assert_eq!(dates.start, date(2025, 12, 28));

        // Week 53 of a 52-week year spills into the next year
        let dates = calendar.epi_week_to_date_range(2024, 53).unwrap();
        assert_eq!(calendar.epi_week_of(dates.end), epi_week!(2025, 1));

        assert_eq!(
            calendar.epi_week_to_date_range(2025, 0),
            Err(CalendarError::Week(EpiWeekError::InvalidWeek(0)))
        );
        assert_eq!(
            calendar.epi_week_to_date_range(2025, 54),
            Err(CalendarError::Week(EpiWeekError::InvalidWeek(54)))
        );
        assert_eq!(
            calendar.epi_week_to_date_range(i32::MAX, 1),
            Err(CalendarError::DateOutOfRange {
                year: i32::MAX,
                week: 1
            })
        );
    }

    #[test]
    fn round_trip() {
        let calendar = mmwr();
        for year in 1990..2040 {
            for week in 1..=i64::from(calendar.weeks_in_year(year)) {
                let dates = calendar.epi_week_to_date_range(year, week).unwrap();
                let expected = EpiWeek::new(year, week).unwrap();
                assert_eq!(calendar.epi_week_of(dates.start), expected);
                assert_eq!(calendar.epi_week_of(dates.end), expected);
            }
        }
    }

    #[test]
    fn extremes_of_chrono_range() {
        let calendar = mmwr();
        let week = calendar.epi_week_of(NaiveDate::MIN);
        assert!((1..=53).contains(&week.week().value()));
        let week = calendar.epi_week_of(NaiveDate::MAX);
        assert!((1..=53).contains(&week.week().value()));
    }

    #[test]
    fn next_and_previous_week() {
        let calendar = mmwr();
        assert_eq!(calendar.next_week(epi_week!(2025, 52)), Some(epi_week!(2025, 53)));
        assert_eq!(calendar.next_week(epi_week!(2025, 53)), Some(epi_week!(2026, 1)));
        assert_eq!(calendar.next_week(epi_week!(2024, 52)), Some(epi_week!(2025, 1)));
        assert_eq!(calendar.previous_week(epi_week!(2026, 1)), Some(epi_week!(2025, 53)));
        assert_eq!(calendar.previous_week(epi_week!(2025, 1)), Some(epi_week!(2024, 52)));
        assert_eq!(calendar.previous_week(epi_week!(2025, 9)), Some(epi_week!(2025, 8)));
        assert_eq!(calendar.next_week(EpiWeek::new(i32::MAX, 53).unwrap()), None);
    }

    #[test]
    fn exact_arithmetic() {
        let calendar = mmwr();

        // 2025 has 53 weeks, which the approximation misses
        let range = EpiWeekRange::new(epi_week!(2025, 1), epi_week!(2026, 1));
        assert_eq!(range.week_count(), 53);
        assert_eq!(calendar.exact_week_count(range), 54);

        let range = EpiWeekRange::new(epi_week!(2023, 1), epi_week!(2023, 52));
        assert_eq!(calendar.exact_week_count(range), 52);

        assert_eq!(
            calendar.exact_weeks_ago(epi_week!(2026, 1), 1),
            Some(epi_week!(2025, 53))
        );
        assert_eq!(epi_week!(2026, 1).weeks_ago(1), epi_week!(2025, 52));
        assert_eq!(
            calendar.exact_weeks_ago(epi_week!(2025, 10), 0),
            Some(epi_week!(2025, 10))
        );
    }

    #[test]
    fn weeks() {
        let calendar = mmwr();
        let range = EpiWeekRange::new(epi_week!(2025, 51), epi_week!(2026, 2));
        assert_eq!(
            calendar.weeks(range),
            vec![
                epi_week!(2025, 51),
                epi_week!(2025, 52),
                epi_week!(2025, 53),
                epi_week!(2026, 1),
                epi_week!(2026, 2),
            ]
        );

        // Weeks that don't exist are skipped
        let range = EpiWeekRange::new(epi_week!(2024, 53), epi_week!(2025, 1));
        assert_eq!(calendar.weeks(range), vec![epi_week!(2025, 1)]);

        let range = EpiWeekRange::new(epi_week!(2023, 1), epi_week!(2024, 52));
        assert_eq!(calendar.weeks(range).len() as i64, calendar.exact_week_count(range));
    }

    #[test]
    fn preset_range() {
        let calendar = mmwr();

        // 2025-02-26 is in week 9 of 2025
        let today = date(2025, 2, 26);
        assert_eq!(calendar.epi_week_of(today), epi_week!(2025, 9));

        let range = calendar.preset_range(Preset::LastWeek, today);
        assert_eq!(range, EpiWeekRange::single(epi_week!(2025, 9)));

        let range = calendar.preset_range(Preset::Last4Weeks, today);
        assert_eq!(range, EpiWeekRange::new(epi_week!(2025, 6), epi_week!(2025, 9)));

        let range = calendar.preset_range(Preset::Last12Weeks, today);
        assert_eq!(range.desde(), epi_week!(2024, 50));
        assert_eq!(range.week_count(), 12);

        let range = calendar.preset_range(Preset::Last52Weeks, today);
        assert_eq!(range.desde(), epi_week!(2024, 10));
        assert_eq!(range.week_count(), 52);

        let range = calendar.preset_range(Preset::RespiratorySeason, today);
        assert_eq!(range, EpiWeekRange::new(epi_week!(2024, 40), epi_week!(2025, 20)));

        let range = calendar.preset_range(Preset::YearToDate, today);
        assert_eq!(range, EpiWeekRange::new(epi_week!(2025, 1), epi_week!(2025, 9)));

        let range = calendar.preset_range(Preset::FullYear, today);
        assert_eq!(range, EpiWeekRange::new(epi_week!(2025, 1), epi_week!(2025, 53)));

        let range = calendar.preset_range(Preset::PreviousYear, today);
        assert_eq!(range, EpiWeekRange::new(epi_week!(2024, 1), epi_week!(2024, 52)));
    }

    #[test]
    fn respiratory_season_switches_at_week_40() {
        let calendar = mmwr();

        // 2025-09-27 is the last day of week 39, 2025-09-28 the first of week 40
        let range = calendar.preset_range(Preset::RespiratorySeason, date(2025, 9, 27));
        assert_eq!(range, EpiWeekRange::new(epi_week!(2024, 40), epi_week!(2025, 20)));

        let range = calendar.preset_range(Preset::RespiratorySeason, date(2025, 9, 28));
        assert_eq!(range, EpiWeekRange::new(epi_week!(2025, 40), epi_week!(2026, 20)));
    }

    #[test]
    fn last_4_weeks_is_always_4_weeks() {
        let calendar = mmwr();
        for today in date(2019, 1, 1).iter_days().take(365 * 8) {
            let range = calendar.preset_range(Preset::Last4Weeks, today);
            assert_eq!(range.week_count(), 4, "{today}");
            assert_eq!(range.hasta(), calendar.epi_week_of(today));
        }
    }
}
