// SPDX-License-Identifier: MIT

//!
//! The epidemiological week types
//!

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The lowest week number
pub const MIN_WEEK: u8 = 1;

/// The highest week number (only reached in 53-week years)
pub const MAX_WEEK: u8 = 53;

/// Weeks per year assumed by the approximate range arithmetic
pub const APPROX_WEEKS_PER_YEAR: i64 = 52;

/// Errors that can arise in relation to an [`EpiWeek`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EpiWeekError {
    /// The week number is not allowed (must be 1 <= week <= 53)
    #[error("Week `{0}` is not allowed (must be between 1 and 53)")]
    InvalidWeek(i64),

    /// The string isn't of the form `YYYY-Www`, `YYYY-ww` or `YYYY/ww`
    #[error("Can't parse `{0}` as an epidemiological week (expected e.g. 2025-W01)")]
    Parse(String),
}

/// The week number within an epidemiological year
#[rustfmt::skip]
#[derive(derive_more::Display, Serialize, Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub struct Week(u8);

impl Week {
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Only for values the calendar arithmetic has already bounded
    pub(crate) fn from_raw(value: u8) -> Self {
        debug_assert!((MIN_WEEK..=MAX_WEEK).contains(&value));
        Week(value)
    }
}

impl TryFrom<i64> for Week {
    type Error = EpiWeekError;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(MIN_WEEK)..=i64::from(MAX_WEEK)).contains(&value) {
            Ok(Week(value as u8))
        } else {
            Err(EpiWeekError::InvalidWeek(value))
        }
    }
}

impl<'de> Deserialize<'de> for Week {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Week::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// An epidemiological week: the epi-year and the week within it.
///
/// The year is the *epidemiological* year, which differs from the calendar
/// year for some dates at the very end of December or start of January.
///
/// Ordering is chronological, i.e. by `(year, week)`.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpiWeek {
    year: i32,
    week: Week,
}

impl EpiWeek {
    /// Create a new [`EpiWeek`] if the week number is valid
    ///
    /// This does not check that week 53 exists in `year`, see
    /// [`crate::EpiWeekCalendar::is_valid`] for that.
    pub fn new(year: i32, week: i64) -> Result<Self, EpiWeekError> {
        Ok(EpiWeek {
            year,
            week: Week::try_from(week)?,
        })
    }

    pub(crate) fn from_parts(year: i32, week: Week) -> Self {
        EpiWeek { year, week }
    }

    /// Get the epidemiological year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Get the week number
    pub fn week(&self) -> Week {
        self.week
    }

    /// Whether this week comes strictly before `other`
    pub fn is_before(&self, other: &EpiWeek) -> bool {
        self < other
    }

    /// Step back `n` weeks assuming every year has 52 weeks.
    ///
    /// This is the fast approximation used for rolling windows; it drifts by a
    /// week each time a 53-week year is crossed.  Use
    /// [`crate::EpiWeekCalendar::exact_weeks_ago`] for real calendar weeks.
    /// Saturates at `i32::MIN`.
    pub fn weeks_ago(&self, n: u32) -> EpiWeek {
        let mut year = i64::from(self.year);
        let mut week = i64::from(self.week.value()) - i64::from(n);
        if week < 1 {
            let years_back = (APPROX_WEEKS_PER_YEAR - week) / APPROX_WEEKS_PER_YEAR;
            year -= years_back;
            week += APPROX_WEEKS_PER_YEAR * years_back;
        }
        EpiWeek {
            year: i32::try_from(year).unwrap_or(i32::MIN),
            week: Week::from_raw(week as u8),
        }
    }
}

impl fmt::Display for EpiWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week.value())
    }
}

impl FromStr for EpiWeek {
    type Err = EpiWeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parse_error = || EpiWeekError::Parse(s.to_string());

        // rsplit so that negative years keep their sign
        let (year, week) = trimmed.rsplit_once(['-', '/']).ok_or_else(parse_error)?;
        let week = week.trim_start_matches(['W', 'w']);

        let year = year.parse::<i32>().map_err(|_| parse_error())?;
        let week = week.parse::<i64>().map_err(|_| parse_error())?;
        EpiWeek::new(year, week)
    }
}

#[derive(Deserialize)]
struct RawEpiWeek {
    year: i32,
    week: i64,
}

impl<'de> Deserialize<'de> for EpiWeek {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEpiWeek::deserialize(deserializer)?;
        EpiWeek::new(raw.year, raw.week).map_err(serde::de::Error::custom)
    }
}
