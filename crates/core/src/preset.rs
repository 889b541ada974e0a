// SPDX-License-Identifier: MIT

//!
//! Named period presets offered by period pickers
//!

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// First week of the respiratory season
pub const RESPIRATORY_SEASON_START_WEEK: u8 = 40;

/// Last week of the respiratory season (in the following epi-year)
pub const RESPIRATORY_SEASON_END_WEEK: u8 = 20;

/// The preset name isn't one of [`Preset::ALL`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown preset `{0}`")]
pub struct PresetError(pub String);

/// A named period, resolved against "today" by
/// [`crate::EpiWeekCalendar::preset_range`]
#[rustfmt::skip]
#[derive(derive_more::Display, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// The current week only
    #[display("last_week")]
    #[serde(rename = "last_week")]
    LastWeek,

    /// The current week and the 3 before it
    #[display("last_4_weeks")]
    #[serde(rename = "last_4_weeks")]
    Last4Weeks,

    /// The current week and the 11 before it
    #[display("last_12_weeks")]
    #[serde(rename = "last_12_weeks")]
    Last12Weeks,

    /// The current week and the 51 before it
    #[display("last_52_weeks")]
    #[serde(rename = "last_52_weeks")]
    Last52Weeks,

    /// Week 40 through week 20 of the following year
    #[display("respiratory_season")]
    #[serde(rename = "respiratory_season")]
    RespiratorySeason,

    /// Week 1 of the current epi-year through the current week
    #[display("year_to_date")]
    #[serde(rename = "year_to_date")]
    YearToDate,

    /// Every week of the current epi-year
    #[display("full_year")]
    #[serde(rename = "full_year")]
    FullYear,

    /// Every week of the previous epi-year
    #[display("previous_year")]
    #[serde(rename = "previous_year")]
    PreviousYear,
}

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::LastWeek,
        Preset::Last4Weeks,
        Preset::Last12Weeks,
        Preset::Last52Weeks,
        Preset::RespiratorySeason,
        Preset::YearToDate,
        Preset::FullYear,
        Preset::PreviousYear,
    ];
}

impl FromStr for Preset {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Preset::ALL
            .into_iter()
            .find(|preset| preset.to_string() == wanted)
            .ok_or_else(|| PresetError(s.to_string()))
    }
}
