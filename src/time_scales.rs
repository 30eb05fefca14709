//! Deals with different time scales, specifically, conversion from TDB/TT into
//! UT (UTC or UT1).
//!
//! Only conversions necessary for other computations in this crate are
//! included.

use crate::date::Date;

/// Seconds per day.
const DAY_SECS: f64 = 86400.0;
/// TT − TAI, in seconds.
const TT_MINUS_TAI: f64 = 32.184;

/// [Barycentric dynamic time](https://en.wikipedia.org/wiki/Barycentric_Dynamical_Time),
/// represented in Julian date (JD).
///
/// Ephemeris data are typically computed in this
/// time scale, and should be converted to UT when calculating dates.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tdb(pub f64);

/// [Terristrial time](https://en.wikipedia.org/wiki/Terrestrial_Time),
/// represented in Julian date (JD).
///
/// Note: Because TT differs no more than centisenconds from TDB during
/// thousands of years, they are treated numerically the same in this crate for
/// calendar calculation.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tt(pub f64);

impl From<Tdb> for Tt {
    fn from(tdb: Tdb) -> Tt {
        Tt(tdb.0)
    }
}

impl From<Tai> for Tt {
    fn from(tai: Tai) -> Tt {
        Tt(tai.0 + TT_MINUS_TAI / DAY_SECS)
    }
}

/// [International atomic time](https://en.wikipedia.org/wiki/International_Atomic_Time),
/// represented in Julian date (JD).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tai(pub f64);

impl From<Tt> for Tai {
    fn from(tt: Tt) -> Tai {
        Tai(tt.0 - TT_MINUS_TAI / DAY_SECS)
    }
}

impl From<Tdb> for Tai {
    fn from(tdb: Tdb) -> Tai {
        Tt::from(tdb).into()
    }
}

/// [Universal time](https://en.wikipedia.org/wiki/Universal_Time), the actual
/// civil time used for determining the actual date at a given time point.
///
/// This can be either UTC (coordinated universal time, based on TAI with leap
/// seconds) or UT1 (mean solar time on the Prime Meridian) depending on the
/// year. Specifically, UTC from 1972-01-01T00:00Z to the latest known leap
/// second, UT1 otherwise.
///
/// Due to irregularity of Earth's rotation, conversion from TAI to UT1 relies
/// on data points with inter-/extrapolation: polynomial fits by Espenak and
/// Meeus before 1972, and
/// [a long-term parabola](https://astro.ukho.gov.uk/nao/lvm/) after the leap
/// second table expires.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Ut(pub f64);

impl Ut {
    /// Converts a TAI (or other time scale easily convertible to TAI) into UT.
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::time_scales::{Tdb, Ut};
    /// let tdb = Tdb(2451543.166666667);
    /// let ut = Ut::convert(tdb);
    /// assert_eq!((1999, 12, 30), ut.date_in_timezone(0).gregorian());
    /// ```
    pub fn convert<T>(time: T) -> Self
    where
        T: Into<Tai>,
    {
        let tai = time.into();
        let data = leap_seconds::data();

        if tai < data.starts {
            let tt = Tt::from(tai);
            return Ut(tt.0 - delta_t::before_utc(tt) / DAY_SECS); // NOTE UT1
        } else if tai > data.expires {
            let diff = leap_seconds::estimate(tai) + data.c2;
            return Ut(tai.0 - diff / DAY_SECS); // NOTE UT1, not UTC
        }

        let ls = match data.leap_seconds.partition_point(|ls| ls.tai <= tai) {
            0 => return Ut(tai.0 - 10.0 / DAY_SECS),
            i => &data.leap_seconds[i - 1],
        };
        let leap = (tai.0 - ls.tai.0).min(2.0) / 2.0;
        Ut(tai.0 - (ls.delta_secs as f64 + leap) / DAY_SECS)
    }
    /// Returns the date at the time point in timezone ahead (east) of UTC by
    /// `tz_offset_minutes`minutes.
    ///
    /// For Beijing time (UTC+8), `tz_offset_minutes` should be +480.
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::time_scales::{Tdb, Ut};
    /// let tdb = Tdb(2451543.166666667);
    /// let ut = Ut::convert(tdb);
    /// assert_eq!((1999, 12, 30), ut.date_in_timezone(480).gregorian());
    /// ```
    pub fn date_in_timezone(&self, tz_offset_minutes: i32) -> Date {
        self.date_at_offset(f64::from(tz_offset_minutes) / 1440.0)
    }
    /// Like [`Ut::date_in_timezone`], for offsets that are not whole minutes
    /// (e.g. local mean time). `offset_days` is the offset in days.
    pub fn date_at_offset(&self, offset_days: f64) -> Date {
        Date::from_jdn((self.0 + offset_days).round() as u32)
    }
}

/// Decimal Gregorian year of a TT instant, as used by the ΔT fits.
fn decimal_year(tt: Tt) -> f64 {
    (tt.0 - 2451544.5) / 365.2425 + 2000.0
}

mod delta_t {
    use super::{Tt, decimal_year};

    /// ΔT = TT − UT1 in seconds, for instants before UTC began.
    pub(super) fn before_utc(tt: Tt) -> f64 {
        let y = decimal_year(tt);
        match y {
            y if y >= 1961.0 => {
                let t = y - 1975.0;
                45.45 + 1.067 * t - t * t / 260.0 - t.powi(3) / 718.0
            }
            y if y >= 1941.0 => {
                let t = y - 1950.0;
                29.07 + 0.407 * t - t * t / 233.0 + t.powi(3) / 2547.0
            }
            y if y >= 1920.0 => {
                let t = y - 1920.0;
                21.20 + 0.84493 * t - 0.076100 * t * t + 0.0020936 * t.powi(3)
            }
            y if y >= 1900.0 => {
                let t = y - 1900.0;
                -2.79 + 1.494119 * t - 0.0598939 * t * t + 0.0061966 * t.powi(3)
                    - 0.000197 * t.powi(4)
            }
            y if y >= 1860.0 => {
                let t = y - 1860.0;
                7.62 + 0.5737 * t - 0.251754 * t * t + 0.01680668 * t.powi(3)
                    - 0.0004473624 * t.powi(4)
                    + t.powi(5) / 233174.0
            }
            y => {
                let u = (y - 1820.0) / 100.0;
                -20.0 + 32.0 * u * u
            }
        }
    }
}

mod leap_seconds {
    use super::{DAY_SECS, Tai, Tt, decimal_year};
    use crate::date::Date;
    use std::sync::LazyLock;

    /// Days ending with a positive leap second.
    pub(super) const DATES: &[(i32, i32, i32)] = &[
        (1972, 6, 30),
        (1972, 12, 31),
        (1973, 12, 31),
        (1974, 12, 31),
        (1975, 12, 31),
        (1976, 12, 31),
        (1977, 12, 31),
        (1978, 12, 31),
        (1979, 12, 31),
        (1981, 6, 30),
        (1982, 6, 30),
        (1983, 6, 30),
        (1985, 6, 30),
        (1987, 12, 31),
        (1989, 12, 31),
        (1990, 12, 31),
        (1992, 6, 30),
        (1993, 6, 30),
        (1994, 6, 30),
        (1995, 12, 31),
        (1997, 6, 30),
        (1998, 12, 31),
        (2005, 12, 31),
        (2008, 12, 31),
        (2012, 6, 30),
        (2015, 6, 30),
        (2016, 12, 31),
    ];
    /// Last day covered by the published leap second table.
    pub(super) const DATE_EXPIRES: (i32, i32, i32) = (2026, 6, 30);

    #[derive(Debug, Clone)]
    pub(super) struct Data {
        pub(super) starts: Tai,
        pub(super) leap_seconds: Vec<LeapSecond>,
        pub(super) expires: Tai,
        pub(super) c2: f64,
    }
    #[derive(Debug, Clone)]
    pub(super) struct LeapSecond {
        pub(super) tai: Tai,
        pub(super) delta_secs: i32,
    }

    static COMPUTED: LazyLock<Data> = LazyLock::new(compute);

    pub(super) fn data() -> &'static Data {
        &COMPUTED
    }

    /// JDN of a day known to be valid; the tables above are checked by tests.
    fn jdn((y, m, d): (i32, i32, i32)) -> f64 {
        Date::from_gregorian(y, m, d).map_or(f64::NAN, |date| date.jdn() as f64)
    }

    fn compute() -> Data {
        let starts = Tai(jdn((1972, 1, 1)) - 0.5 + 10.0 / DAY_SECS);
        let leap_seconds = (10..)
            .zip(DATES)
            .map(|(delta_secs, &ymd)| LeapSecond {
                // 23:59:60 UTC of the day, expressed in TAI
                tai: Tai(jdn(ymd) + (43199 + delta_secs) as f64 / DAY_SECS),
                delta_secs,
            })
            .collect();
        let total = (DATES.len() + 10) as f64;
        let expires = Tai(jdn(DATE_EXPIRES) + (43199.0 + total) / DAY_SECS);
        let c2 = total - estimate(expires);
        Data {
            starts,
            leap_seconds,
            expires,
            c2,
        }
    }

    /// Long-term ΔT parabola with a fluctuation term, in seconds.
    pub(super) fn estimate<T: Into<Tt>>(tt: T) -> f64 {
        use std::f64::consts::PI;
        let y = decimal_year(tt.into());
        let t = (y - 1825.0) / 100.0;
        31.4115 * t * t + 284.8435805251424 * (2.0 * PI * (t + 0.75) / 14.0).cos()
    }
}
