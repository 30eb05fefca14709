//! Error type shared by the crate.

use crate::date::Date;

/// Errors from date construction, calendar lookup and label formatting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The `(year, month, day)` triple does not name a Gregorian date.
    #[error("{year:04}-{month:02}-{day:02} is not a valid Gregorian date")]
    InvalidGregorian { year: i32, month: i32, day: i32 },

    /// The date cannot be expressed in the lunisolar calendar, either because
    /// it lies outside the computed range or because resolution produced
    /// inconsistent data.
    #[error("date {0} is not supported by the lunisolar calendar")]
    UnsupportedDate(Date),

    /// No ephemeris was computed for this 歲.
    #[error("no ephemeris for annus {0}")]
    NoEphemeris(i32),

    /// The ephemeris of a 歲 does not yield a valid month sequence.
    #[error("inconsistent ephemeris for annus {annus}: {reason}")]
    MalformedEphemeris { annus: i32, reason: String },

    /// Lunar month number outside `1..=12`.
    #[error("lunar month {0} not in 1..=12")]
    InvalidMonth(u32),

    /// Lunar day number outside `1..=30`.
    #[error("lunar day {0} not in 1..=30")]
    InvalidDay(u32),

    /// Solar term number outside `1..=24`.
    #[error("solar term {0} not in 1..=24")]
    InvalidSolarTerm(u32),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
