// SPDX-License-Identifier: MIT

//!
//! *Part of the wider EpiCalendar project*
//!
//! This crate is the single source of truth for epidemiological week
//! arithmetic used by surveillance dashboards: which epi-week a date falls in,
//! the dates a week covers, week ranges, and the named periods offered by
//! period pickers.
//!
//! Week numbering is configured by [`CalendarRules`] (CDC/MMWR by default, ISO
//! available) and applied by an [`EpiWeekCalendar`].  Everything is pure: the
//! current date is always passed in explicitly.
//!
//! As with the other crates in the project, if a type is instantiated the
//! developer can be sure it's valid.
//!

mod calendar;
mod epi_week;
mod preset;
mod range;
mod rules;

pub use calendar::*;
pub use epi_week::*;
pub use preset::*;
pub use range::*;
pub use rules::*;

pub use epi_calendar_macros::{epi_week, week};
