// SPDX-License-Identifier: MIT

//!
//! The rules that define where epidemiological weeks start and which week is
//! week 1.  Fixed per deployment, typically loaded from a config file.
//!

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors that can arise in relation to [`CalendarRules`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// The minimum number of January days in week 1 must be 1 <= days <= 7
    #[error("Minimum January days `{0}` is not allowed (must be between 1 and 7)")]
    InvalidMinJanuaryDays(u32),
}

/// Week numbering rules.
///
/// Weeks start on `week_start` and end on the anchor weekday (the day before
/// `week_start`).  Week 1 ends on the first anchor weekday of January whose day
/// of the month is at least `min_january_days`, i.e. week 1 is the first week
/// with at least that many days in January.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CalendarRules {
    week_start: Weekday,
    min_january_days: u32,
}

impl CalendarRules {
    /// Create new rules if the result will be valid
    pub fn new(week_start: Weekday, min_january_days: u32) -> Result<Self, RulesError> {
        if !(1..=7).contains(&min_january_days) {
            return Err(RulesError::InvalidMinJanuaryDays(min_january_days));
        }
        Ok(CalendarRules {
            week_start,
            min_january_days,
        })
    }

    /// CDC/MMWR weeks: Sunday to Saturday, week 1 has at least 4 days in
    /// January
    pub fn mmwr() -> Self {
        CalendarRules {
            week_start: Weekday::Sun,
            min_january_days: 4,
        }
    }

    /// ISO-8601 weeks: Monday to Sunday, week 1 contains the first Thursday
    pub fn iso() -> Self {
        CalendarRules {
            week_start: Weekday::Mon,
            min_january_days: 4,
        }
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// The last day of every week (e.g. Saturday for MMWR)
    pub fn anchor_weekday(&self) -> Weekday {
        self.week_start.pred()
    }

    pub fn min_january_days(&self) -> u32 {
        self.min_january_days
    }
}

impl Default for CalendarRules {
    fn default() -> Self {
        Self::mmwr()
    }
}

#[derive(Deserialize)]
struct RawCalendarRules {
    week_start: Weekday,
    min_january_days: u32,
}

impl<'de> Deserialize<'de> for CalendarRules {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawCalendarRules::deserialize(deserializer)?;
        CalendarRules::new(raw.week_start, raw.min_january_days)
            .map_err(serde::de::Error::custom)
    }
}
