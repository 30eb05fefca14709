//! Chinese calendar
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 本程序以天文算法推算節氣與合朔，據以編算夏曆，見 [`ephemeris`]。日期按北京時間，1929 年前為北京地方平時，見 [`date_cst`]。

use serde::Serialize;

use crate::date::Date;
use crate::error::{Error, Result};
use crate::time_scales::{Tdb, Ut};

pub mod ephemeris;
pub mod fmt;
pub mod lunisolar;

pub use fmt::{season, sexagenary_year};

/// 北京時間相對 UTC 的分鐘數
pub const CST_OFFSET_MINUTES: i32 = 480;

/// 北京地方平時（東經 116°25′）相對 UTC 的時數，即 UTC+7:45:40
pub const BEIJING_LMT_OFFSET_HOURS: f64 = 1397.0 / 180.0;

/// 曆法改用 UTC+8 之日，1929-01-01 的儒略日數
const CST_ADOPTED_JDN: u32 = 2425613;

/// 「歲」，相鄰兩冬至間的時段，或自冬至所在月（十一月）至下一冬至前月（十月或閏十月）的時段。
///
/// 支持的年份取決於曆表數據，見 [`ephemeris`]。
///
/// 注意：「歲」與「年」在曆法上不同，年以正月為首，但曆法編算須以兩冬至間的「歲」為基礎，本程序亦以「歲」編排，並依日期計算所在「年」。
///
/// # 用例
///
/// ```
/// use nongli::Date;
/// use nongli::chinese::{Annus, Month::*};
///
/// let date = Date::from_gregorian(2000, 1, 1).unwrap();
/// let annus = Annus::from_date(date).unwrap();
///
/// assert_eq!(Ok((1999, Common(11), 25)), annus.ymd_for(date));
/// ```
#[derive(Debug, Clone)]
pub struct Annus {
    /// 序號，為該歲大部分時段所在的公元年
    pub annus: i32,
    /// 該歲的曆表
    pub ephemeris: &'static ephemeris::Annus,
    /// 全部月首，包括次一歲首月用以標記本歲最末日
    pub months: Vec<NewMoon>,
}
/// 月首信息
#[derive(Debug, Copy, Clone)]
pub struct NewMoon {
    /// 月名
    pub month: Month,
    /// 月首所在日期
    pub date: Date,
}
/// 月名，`Common` 為平月，`Leap` 為閏月。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub enum Month {
    Common(u32),
    Leap(u32),
}
impl Month {
    /// 取得月序號，無論平閏。
    pub fn num(&self) -> u32 {
        use Month::*;
        *match self {
            Common(v) | Leap(v) => v,
        }
    }
    /// 閏月為 `true`，平月為 `false`
    pub fn is_leap(&self) -> bool {
        matches!(self, Self::Leap(_))
    }
    /// 取得月名的文本形式，十一、十二月稱「冬月」「腊月」。
    ///
    /// # Errors
    ///
    /// 月序號不在 `1..=12` 間時回報 [`Error::InvalidMonth`]。
    pub fn name(&self) -> Result<String> {
        fmt::month(*self)
    }
}

impl Annus {
    /// 取得與公元 `annus` 年對應的歲。
    ///
    /// 若曆表無該歲資料則回報 [`Error::NoEphemeris`]；曆表無法排出十二或十三個月時回報
    /// [`Error::MalformedEphemeris`]。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::chinese::Annus;
    ///
    /// let annus = Annus::new(2000).unwrap();
    /// assert_eq!(13, annus.months.len());
    /// ```
    pub fn new(annus: i32) -> Result<Self> {
        use Month::*;

        let malformed = |reason: String| Error::MalformedEphemeris { annus, reason };

        let ephemeris = ephemeris::Annus::get(annus).ok_or(Error::NoEphemeris(annus))?;
        let new_moon_dates: Vec<_> = ephemeris.new_moon.iter().map(|&tdb| date_cst(tdb)).collect();
        let term_date = |term: usize| {
            ephemeris
                .solar_term
                .get(term)
                .map(|&tdb| date_cst(tdb))
                .ok_or_else(|| malformed(format!("solar term {term} out of table")))
        };
        let ws = term_date(0)?;
        let ws_next = term_date(24)?;
        let m11_idx = new_moon_dates
            .partition_point(|date| date <= &ws)
            .checked_sub(1)
            .ok_or_else(|| malformed("no new moon before winter solstice".to_owned()))?;
        let m11n_idx = new_moon_dates
            .partition_point(|date| date <= &ws_next)
            .checked_sub(1)
            .ok_or_else(|| malformed("no new moon before next winter solstice".to_owned()))?;
        let mut needs_leap = match m11n_idx - m11_idx {
            12 => false,
            13 => true,
            n => return Err(malformed(format!("{n} months between winter solstices"))),
        };

        // 中氣為自冬至起的偶數序節氣
        let major_terms = (0..=24)
            .step_by(2)
            .map(term_date)
            .collect::<Result<Vec<_>>>()?;
        let has_major_term =
            |start: Date, end: Date| major_terms.iter().any(|date| (start..end).contains(date));

        let mut months = Vec::with_capacity(m11n_idx - m11_idx + 1);
        let mut month = 10;
        for i in m11_idx..=m11n_idx {
            // 首個無中氣之月為閏月，沿用前月序號
            if needs_leap
                && i < m11n_idx
                && !has_major_term(new_moon_dates[i], new_moon_dates[i + 1])
            {
                months.push(NewMoon {
                    month: Leap(month),
                    date: new_moon_dates[i],
                });
                needs_leap = false;
                continue;
            }
            month = month % 12 + 1;
            months.push(NewMoon {
                month: Common(month),
                date: new_moon_dates[i],
            });
        }
        if needs_leap {
            return Err(malformed("no month without major solar term".to_owned()));
        }

        Ok(Annus {
            annus,
            ephemeris,
            months,
        })
    }
    /// 依特定日期取得其所在歲。
    ///
    /// 若曆表無該歲資料則回報 [`Error::UnsupportedDate`]。
    ///
    /// 歲首早於公元年首，故 1899 年 12 月的日期亦可能屬於首歲。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::Date;
    /// use nongli::chinese::Annus;
    ///
    /// let date = Date::from_gregorian(1999, 12, 31).unwrap();
    /// let annus = Annus::from_date(date).unwrap();
    ///
    /// assert_eq!(2000, annus.annus);
    /// ```
    pub fn from_date(date: Date) -> Result<Self> {
        // 自範圍內最近的歲查起，越出範圍方為無數據
        let mut y = date
            .gregorian()
            .0
            .clamp(*ephemeris::RANGE.start(), *ephemeris::RANGE.end());
        loop {
            let annus = match Self::new(y) {
                Err(Error::NoEphemeris(_)) => return Err(Error::UnsupportedDate(date)),
                res => res?,
            };

            let (start, end) = (annus.first_day(), annus.end());
            if (start..end).contains(&date) {
                return Ok(annus);
            }

            y += if date < start { -1 } else { 1 };
        }
    }

    /// 該歲首日，即十一月初一。
    pub fn first_day(&self) -> Date {
        self.months[0].date
    }

    /// 次歲首日，即本歲最末日的次日。
    pub fn end(&self) -> Date {
        self.months[self.months.len() - 1].date
    }

    /// 取得給定日期在該歲的年月日，返回格式為 `(年, 月, 日)`。
    ///
    /// 若所給日期不在該歲，則回報 `Err` 並指出該日期在該歲之前還是之後。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::Date;
    /// use nongli::chinese::{Annus, Month::*};
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// let annus = Annus::from_date(date).unwrap();
    ///
    /// assert_eq!(Ok((1999, Common(11), 25)), annus.ymd_for(date));
    /// ```
    pub fn ymd_for(&self, date: Date) -> Result<(i32, Month, u32), OtherAnnus> {
        if date < self.first_day() {
            return Err(OtherAnnus::Before);
        } else if date >= self.end() {
            return Err(OtherAnnus::After);
        }

        let m = self.months[self.months.partition_point(|m| m.date <= date) - 1];
        let d = date.jdn() - m.date.jdn() + 1;
        let y = if m.month.num() >= 11 {
            self.annus - 1
        } else {
            self.annus
        };
        Ok((y, m.month, d))
    }

    /// 取得給定日期所在節氣信息，若當日並無交節，則給出該日相對其前一個交節的日數差。返回值格式如下：
    ///
    /// - `.0`：取得的節氣所在歲（冬至前的小雪、大雪屬前一歲，故須回報所在歲）
    /// - `.1`：該節氣序號，1..=24 對應立春到大寒
    /// - `.2`：所給 `date` 在該節交節後第幾日，為 0 則表示當日交節
    ///
    /// 本方法支持自該歲首日至次歲冬至前日的區間，若給定日期不在其間則回報 `Err`。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::Date;
    /// use nongli::chinese::Annus;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// let annus = Annus::from_date(date).unwrap();
    ///
    /// assert_eq!(Ok((2000, 22, 10)), annus.solar_term_for(date)); // 冬至過後第 10 天
    /// ```
    pub fn solar_term_for(&self, date: Date) -> Result<(i32, u32, u32), OtherAnnus> {
        use OtherAnnus::*;
        if date < self.first_day() {
            return Err(Before);
        } else if date >= date_cst(self.ephemeris.solar_term[24]) {
            return Err(After);
        }
        let (annus, idx, term_start) = if date < date_cst(self.ephemeris.solar_term[0]) {
            let (idx, term_start) = (22u32..24)
                .zip(self.ephemeris.preceding.map(date_cst))
                .rev()
                .find(|&(_, term_start)| date >= term_start)
                .ok_or(Before)?;
            (self.annus - 1, idx, term_start)
        } else {
            let idx = self.ephemeris.solar_term[..24].partition_point(|&tdb| date_cst(tdb) <= date) - 1;
            (self.annus, idx as u32, date_cst(self.ephemeris.solar_term[idx]))
        };
        // date >= term_start
        Ok((annus, (idx + 21) % 24 + 1, date.jdn() - term_start.jdn()))
    }

    /// 列出該歲自冬至起的二十四節氣，格式為 `(節氣序號, 交節日期)`。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::chinese::Annus;
    ///
    /// let annus = Annus::new(2024).unwrap();
    /// let (term, date) = annus.solar_terms().nth(3).unwrap();
    /// assert_eq!((1, "2024-02-04".to_owned()), (term, date.iso_gregorian())); // 立春
    /// ```
    pub fn solar_terms(&self) -> impl Iterator<Item = (u32, Date)> {
        self.ephemeris.solar_term[..24]
            .iter()
            .enumerate()
            .map(|(idx, &tdb)| ((idx as u32 + 21) % 24 + 1, date_cst(tdb)))
    }
}

/// 表示給定日期不在該歲，並指出其在前還是在後。
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum OtherAnnus {
    #[error("date is before this annus")]
    Before,
    #[error("date is after this annus")]
    After,
}

/// 將給定曆表時間轉為北京時間日期。
///
/// 1929 年起用 UTC+8，此前用北京地方平時（[`BEIJING_LMT_OFFSET_HOURS`]）。
pub fn date_cst(tdb: Tdb) -> Date {
    let ut = Ut::convert(tdb);
    let local_mean = ut.date_at_offset(BEIJING_LMT_OFFSET_HOURS / 24.0);
    if local_mean.jdn() < CST_ADOPTED_JDN {
        local_mean
    } else {
        ut.date_in_timezone(CST_OFFSET_MINUTES)
    }
}

/// 取得所給公元年的干支序號，`1` 為甲子，`60` 為癸亥。
///
/// # 用例
///
/// ```
/// use nongli::chinese::sexagenary_for_year;
///
/// assert_eq!(1, sexagenary_for_year(-2696));
/// assert_eq!(1, sexagenary_for_year(1984));
/// ```
pub fn sexagenary_for_year(year: i32) -> u32 {
    (year.rem_euclid(60) as u32 + 2696) % 60 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_date() {
        let dataset = [
            (2017, (2017, 1, 27)),
            (2017, (2017, 12, 17)),
            (2018, (2017, 12, 18)),
        ];
        for (std, (y, m, d)) in dataset {
            assert_eq!(
                Ok(std),
                Annus::from_date(Date::from_gregorian(y, m, d).unwrap()).map(|a| a.annus)
            );
        }
    }

    #[test]
    fn from_date_first_annus() {
        let first_day = Annus::new(*ephemeris::RANGE.start()).unwrap().first_day();
        assert_eq!((1899, 12), (first_day.gregorian().0, first_day.gregorian().1));
        for date in [first_day, Date::from_gregorian(1899, 12, 15).unwrap()] {
            assert_eq!(Ok(1900), Annus::from_date(date).map(|a| a.annus));
        }
        assert_eq!(
            Err(Error::UnsupportedDate(first_day + -1)),
            Annus::from_date(first_day + -1).map(|a| a.annus)
        );
    }

    #[test]
    fn solar_terms_before_first_solstice() {
        let annus = Annus::new(*ephemeris::RANGE.start()).unwrap();
        let ws = date_cst(annus.ephemeris.solar_term[0]);
        let mut date = annus.first_day();
        let mut terms = vec![];
        while date < ws {
            let (an, term, off) = annus.solar_term_for(date).unwrap();
            assert_eq!(1899, an);
            if off == 0 {
                terms.push(term);
            }
            date = date + 1;
        }
        assert_eq!(vec![21], terms); // 大雪
    }

    #[test]
    fn beijing_local_mean_time_before_1929() {
        use Month::*;
        // 合朔在 UTC+8 子夜稍後，按地方平時仍為前一日
        let dataset = [
            ((1916, 2, 3), (1916, Common(1), 1)),
            ((1914, 11, 17), (1914, Common(10), 1)),
            ((1920, 11, 10), (1920, Common(10), 1)),
        ];
        for ((y, m, d), std) in dataset {
            let date = Date::from_gregorian(y, m, d).unwrap();
            let annus = Annus::from_date(date).unwrap();
            assert_eq!(Ok(std), annus.ymd_for(date), "{y}-{m}-{d}");
        }
    }

    #[test]
    fn from_date_out_of_range() {
        for (y, m, d) in [(1850, 6, 1), (2150, 6, 1)] {
            let date = Date::from_gregorian(y, m, d).unwrap();
            assert_eq!(Err(Error::UnsupportedDate(date)), Annus::from_date(date).map(|a| a.annus));
        }
        assert_eq!(Err(Error::NoEphemeris(1899)), Annus::new(1899).map(|a| a.annus));
    }

    #[test]
    fn months() {
        let annus = Annus::new(2000).unwrap();
        let stds = [
            (11, "1999-12-08"),
            (12, "2000-01-07"),
            (1, "2000-02-05"),
            (2, "2000-03-06"),
            (3, "2000-04-05"),
            (4, "2000-05-04"),
            (5, "2000-06-02"),
            (6, "2000-07-02"),
            (7, "2000-07-31"),
            (8, "2000-08-29"),
            (9, "2000-09-28"),
            (10, "2000-10-27"),
            (11, "2000-11-26"),
        ];
        assert_eq!(stds.len(), annus.months.len());
        for (std, month) in stds.iter().zip(&annus.months) {
            assert_eq!(Month::Common(std.0), month.month);
            assert_eq!(std.1, month.date.iso_gregorian());
        }
    }

    #[test]
    fn leap_months() {
        let stds = [
            (11, "2016-11-29"),
            (12, "2016-12-29"),
            (1, "2017-01-28"),
            (2, "2017-02-26"),
            (3, "2017-03-28"),
            (4, "2017-04-26"),
            (5, "2017-05-26"),
            (6, "2017-06-24"),
            (-6, "2017-07-23"),
            (7, "2017-08-22"),
            (8, "2017-09-20"),
            (9, "2017-10-20"),
            (10, "2017-11-18"),
            (11, "2017-12-18"),
        ];
        let annus = Annus::new(2017).unwrap();
        for (std, month) in stds.iter().zip(&annus.months) {
            let std_month = if std.0 > 0 {
                Month::Common(std.0 as u32)
            } else {
                Month::Leap(-std.0 as u32)
            };
            assert_eq!(
                (std_month, std.1.into()),
                (month.month, month.date.iso_gregorian())
            );
        }
        assert_eq!(stds.len(), annus.months.len());
    }

    #[test]
    fn leap_month_placement() {
        use Month::*;
        // (歲, 閏月, 閏月首日)
        let dataset = [
            (2020, Leap(4), "2020-05-23"),
            (2023, Leap(2), "2023-03-22"),
            (2025, Leap(6), "2025-07-25"),
        ];
        for (an, leap, first_day) in dataset {
            let annus = Annus::new(an).unwrap();
            let found: Vec<_> = annus.months.iter().filter(|m| m.month.is_leap()).collect();
            assert_eq!(1, found.len(), "annus {an}");
            assert_eq!((leap, first_day.to_owned()), (found[0].month, found[0].date.iso_gregorian()));
        }
    }

    #[test]
    fn every_annus_is_well_formed() {
        for an in ephemeris::RANGE {
            let annus = Annus::new(an).unwrap();
            let len = annus.months.len();
            assert!(len == 13 || len == 14, "annus {an}: {len} months");
            let leaps = annus.months.iter().filter(|m| m.month.is_leap()).count();
            assert_eq!(len == 14, leaps == 1, "annus {an}");
            assert_eq!(Month::Common(11), annus.months[0].month);
            assert_eq!(Month::Common(11), annus.months[len - 1].month);
        }
    }

    #[test]
    fn dates() {
        use Month::*;
        use OtherAnnus::*;
        let data = [
            ((2016, 11, 29), Ok((2016, Common(11), 1))),
            ((2017, 1, 27), Ok((2016, Common(12), 30))),
            ((2017, 1, 28), Ok((2017, Common(1), 1))),
            ((2017, 7, 22), Ok((2017, Common(6), 29))),
            ((2017, 7, 23), Ok((2017, Leap(6), 1))),
            ((2017, 12, 17), Ok((2017, Common(10), 30))),
            ((2016, 11, 28), Err(Before)),
            ((2017, 12, 18), Err(After)),
        ];
        let annus = Annus::new(2017).unwrap();
        for ((y, m, d), std) in data {
            assert_eq!(std, annus.ymd_for(Date::from_gregorian(y, m, d).unwrap()));
        }
    }

    #[test]
    fn solar_terms() {
        use OtherAnnus::*;
        let dataset = [
            ((2016, 11, 28), Err(Before)),
            ((2016, 11, 29), Ok((2016, 20, 7))),
            ((2016, 12, 7), Ok((2016, 21, 0))),
            ((2016, 12, 21), Ok((2017, 22, 0))),
            ((2016, 12, 22), Ok((2017, 22, 1))),
            ((2017, 1, 20), Ok((2017, 24, 0))),
            ((2017, 2, 3), Ok((2017, 1, 0))),
            ((2017, 12, 7), Ok((2017, 21, 0))),
            ((2017, 12, 17), Ok((2017, 21, 10))),
            ((2017, 12, 18), Ok((2017, 21, 11))),
            ((2017, 12, 21), Ok((2017, 21, 14))),
            ((2017, 12, 22), Err(After)),
        ];
        let annus = Annus::new(2017).unwrap();
        for ((y, m, d), std) in dataset {
            assert_eq!(
                std,
                annus.solar_term_for(Date::from_gregorian(y, m, d).unwrap())
            );
        }
    }

    #[test]
    fn solar_term_listing() {
        let annus = Annus::new(2024).unwrap();
        let terms: Vec<_> = annus.solar_terms().collect();
        assert_eq!(24, terms.len());
        assert_eq!((22, "2023-12-22".to_owned()), (terms[0].0, terms[0].1.iso_gregorian()));
        assert_eq!((21, "2024-12-06".to_owned()), (terms[23].0, terms[23].1.iso_gregorian()));
    }

    #[test]
    fn year_sexagenary() {
        for (std, year) in [(60, -2697), (1, -2696), (17, 2000)] {
            assert_eq!(std, sexagenary_for_year(year));
        }
    }
}
