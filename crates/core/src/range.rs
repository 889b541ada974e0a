// SPDX-License-Identifier: MIT

//!
//! Inclusive ranges of epidemiological weeks
//!

use crate::{APPROX_WEEKS_PER_YEAR, EpiWeek};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// An inclusive range of epidemiological weeks (`desde ..= hasta`).
///
/// `desde` is never after `hasta`: ranges built the wrong way round are
/// swapped.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EpiWeekRange {
    desde: EpiWeek,
    hasta: EpiWeek,
}

impl EpiWeekRange {
    /// Create a range, normalising the order of the ends
    pub fn new(desde: EpiWeek, hasta: EpiWeek) -> Self {
        if hasta < desde {
            debug!("Swapping out of order range {desde} .. {hasta}");
            EpiWeekRange {
                desde: hasta,
                hasta: desde,
            }
        } else {
            EpiWeekRange { desde, hasta }
        }
    }

    /// A range covering a single week
    pub fn single(week: EpiWeek) -> Self {
        EpiWeekRange {
            desde: week,
            hasta: week,
        }
    }

    /// The first week (inclusive)
    pub fn desde(&self) -> EpiWeek {
        self.desde
    }

    /// The last week (inclusive)
    pub fn hasta(&self) -> EpiWeek {
        self.hasta
    }

    /// Whether `week` lies within the range (ends included)
    pub fn contains(&self, week: &EpiWeek) -> bool {
        self.desde <= *week && *week <= self.hasta
    }

    /// Number of weeks in the range, assuming 52 weeks in every year crossed.
    ///
    /// Good enough for labels; undercounts by one for each 53-week year the
    /// range spans.  See [`crate::EpiWeekCalendar::exact_week_count`].
    pub fn week_count(&self) -> i64 {
        let desde_week = i64::from(self.desde.week().value());
        let hasta_week = i64::from(self.hasta.week().value());

        if self.desde.year() == self.hasta.year() {
            return hasta_week - desde_week + 1;
        }

        let whole_years = i64::from(self.hasta.year()) - i64::from(self.desde.year()) - 1;
        (APPROX_WEEKS_PER_YEAR - desde_week + 1) + APPROX_WEEKS_PER_YEAR * whole_years + hasta_week
    }
}

impl fmt::Display for EpiWeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.desde, self.hasta)
    }
}

#[derive(Deserialize)]
struct RawEpiWeekRange {
    desde: EpiWeek,
    hasta: EpiWeek,
}

impl<'de> Deserialize<'de> for EpiWeekRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEpiWeekRange::deserialize(deserializer)?;
        Ok(EpiWeekRange::new(raw.desde, raw.hasta))
    }
}
