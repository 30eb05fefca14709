//! 公曆日期換算為可直接顯示的農曆日期。
//!
//! 換算分兩步：先由 [`LunarSource`] 求出農曆年月日及當日節氣，再依 [`fmt`] 中各表生成文本。
//! 預設來源 [`Astronomical`] 即本模塊所屬曆法實現。
//!
//! # 用例
//!
//! ```
//! use nongli::{Date, to_lunisolar};
//!
//! let date = Date::from_gregorian(2024, 2, 10).unwrap();
//! let lunar = to_lunisolar(date).unwrap();
//!
//! assert_eq!("甲辰年", lunar.year);
//! assert_eq!("正月初一", lunar.month_day);
//! assert_eq!("初春", lunar.season);
//! assert_eq!(None, lunar.solar_term);
//! ```

use std::fmt::Display;

use serde::Serialize;

use super::{Annus, Month, fmt};
use crate::date::Date;
use crate::error::{Error, Result};

/// 農曆年月日及當日所交節氣的序號。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LunarYmd {
    /// 農曆年，以正月為首，與其大部分時段所在公元年同號
    pub year: i32,
    pub month: Month,
    /// `1..=30`
    pub day: u32,
    /// 當日交節則為節氣序號（`1..=24`，立春至大寒），否則為 `None`
    pub solar_term: Option<u32>,
}

/// 求取農曆年月日的來源。
pub trait LunarSource {
    /// 求所給公曆日期的農曆年月日。
    ///
    /// # Errors
    ///
    /// 無法換算的日期回報 [`Error::UnsupportedDate`]。
    fn resolve(&self, date: Date) -> Result<LunarYmd>;
}

/// 以天文推算的曆表為來源，見 [`super::ephemeris`]。
#[derive(Debug, Default, Copy, Clone)]
pub struct Astronomical;

impl LunarSource for Astronomical {
    fn resolve(&self, date: Date) -> Result<LunarYmd> {
        let annus = Annus::from_date(date)?;
        let (year, month, day) = annus
            .ymd_for(date)
            .map_err(|_| Error::UnsupportedDate(date))?;
        let (_, term, offset) = annus
            .solar_term_for(date)
            .map_err(|_| Error::UnsupportedDate(date))?;
        let solar_term = (offset == 0).then_some(term);
        Ok(LunarYmd {
            year,
            month,
            day,
            solar_term,
        })
    }
}

/// 供界面顯示的農曆日期。
///
/// 文本欄位均為簡體字；`lunar_*` 欄位保留數值以免調用方解析文本。
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LunisolarDate {
    /// 干支年名，如「甲辰年」
    pub year: String,
    /// 月名，如「正月」「闰四月」「腊月」
    pub month: String,
    /// 日名，如「初一」「廿九」
    pub day: String,
    /// 季節名，如「初春」
    pub season: String,
    /// 當日所交節氣，如「立春」
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar_term: Option<String>,
    /// 月名與日名相連，如「正月初一」
    pub month_day: String,
    pub lunar_year: i32,
    pub lunar_month: Month,
    pub lunar_day: u32,
}

impl LunisolarDate {
    /// 同 [`to_lunisolar`]。
    ///
    /// # Errors
    ///
    /// 見 [`to_lunisolar`]。
    pub fn from_date(date: Date) -> Result<Self> {
        to_lunisolar(date)
    }

    /// 由農曆年月日生成顯示文本。
    ///
    /// # Errors
    ///
    /// 月序號不在 `1..=12`、日序號不在 `1..=30` 或節氣序號不在 `1..=24` 時，分別回報
    /// [`Error::InvalidMonth`]、[`Error::InvalidDay`]、[`Error::InvalidSolarTerm`]。
    pub fn from_ymd(ymd: LunarYmd) -> Result<Self> {
        let month = fmt::month(ymd.month)?;
        let day = fmt::day(ymd.day)?;
        let season = fmt::season(&month).to_owned();
        let month_day = format!("{month}{day}");
        Ok(Self {
            year: fmt::sexagenary_year(ymd.year),
            month,
            day,
            season,
            solar_term: ymd.solar_term.map(fmt::solar_term).transpose()?.map(str::to_owned),
            month_day,
            lunar_year: ymd.year,
            lunar_month: ymd.month,
            lunar_day: ymd.day,
        })
    }
}

impl TryFrom<Date> for LunisolarDate {
    type Error = Error;

    fn try_from(date: Date) -> Result<Self> {
        to_lunisolar(date)
    }
}

impl Display for LunisolarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.year, self.month_day, self.season)?;
        if let Some(term) = &self.solar_term {
            write!(f, " {term}")?;
        }
        Ok(())
    }
}

/// 將公曆日期換算為農曆日期。
///
/// # Errors
///
/// 日期超出曆表範圍（見 [`super::ephemeris::RANGE`]）時回報 [`Error::UnsupportedDate`]；
/// 換算出的數據不合法時亦然。調用方可改以 [`fmt::gregorian`] 顯示公曆日期。
pub fn to_lunisolar(date: Date) -> Result<LunisolarDate> {
    convert_with(&Astronomical, date)
}

/// 以指定來源將公曆日期換算為農曆日期。
///
/// # Errors
///
/// 與 [`to_lunisolar`] 相同，來源的一切錯誤均歸為 [`Error::UnsupportedDate`]。
pub fn convert_with<S: LunarSource + ?Sized>(source: &S, date: Date) -> Result<LunisolarDate> {
    let converted = source
        .resolve(date)
        .and_then(LunisolarDate::from_ymd)
        .map_err(|err| match err {
            Error::UnsupportedDate(_) => err,
            other => {
                tracing::warn!(%date, error = %other, "malformed lunar date");
                Error::UnsupportedDate(date)
            }
        })?;
    tracing::trace!(%date, lunar = %converted, "converted");
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Month::*;

    struct Fixed(LunarYmd);

    impl LunarSource for Fixed {
        fn resolve(&self, _date: Date) -> Result<LunarYmd> {
            Ok(self.0)
        }
    }

    fn date(y: i32, m: i32, d: i32) -> Date {
        Date::from_gregorian(y, m, d).unwrap()
    }

    #[test]
    fn chinese_new_year_2024() {
        let lunar = to_lunisolar(date(2024, 2, 10)).unwrap();
        assert_eq!(
            LunisolarDate {
                year: "甲辰年".into(),
                month: "正月".into(),
                day: "初一".into(),
                season: "初春".into(),
                solar_term: None,
                month_day: "正月初一".into(),
                lunar_year: 2024,
                lunar_month: Common(1),
                lunar_day: 1,
            },
            lunar
        );
    }

    #[test]
    fn last_month_belongs_to_previous_year() {
        let lunar = to_lunisolar(date(2024, 2, 9)).unwrap();
        assert_eq!(("癸卯年", "腊月三十", "季冬"), (&*lunar.year, &*lunar.month_day, &*lunar.season));
        let lunar = to_lunisolar(date(2023, 12, 13)).unwrap();
        assert_eq!(("冬月", "初一", "仲冬"), (&*lunar.month, &*lunar.day, &*lunar.season));
    }

    #[test]
    fn leap_months() {
        for ((y, m, d), month, season) in [
            ((2023, 3, 22), "闰二月", "仲春"),
            ((2020, 5, 23), "闰四月", "初夏"),
            ((2017, 7, 23), "闰六月", "季夏"),
        ] {
            let lunar = to_lunisolar(date(y, m, d)).unwrap();
            assert_eq!(month, lunar.month);
            assert_eq!("初一", lunar.day);
            assert_eq!(season, lunar.season);
            assert!(lunar.lunar_month.is_leap());
        }
    }

    #[test]
    fn solar_term_days() {
        for ((y, m, d), term) in [
            ((2024, 2, 4), "立春"),
            ((2024, 4, 4), "清明"),
            ((2024, 6, 21), "夏至"),
            ((2024, 12, 21), "冬至"),
            ((2017, 12, 7), "大雪"),
        ] {
            let lunar = to_lunisolar(date(y, m, d)).unwrap();
            assert_eq!(Some(term), lunar.solar_term.as_deref(), "{y}-{m}-{d}");
        }
        assert_eq!(None, to_lunisolar(date(2024, 2, 5)).unwrap().solar_term);
    }

    #[test]
    fn first_annus_before_solstice() {
        let lunar = to_lunisolar(date(1899, 12, 15)).unwrap();
        assert_eq!((1899, Common(11)), (lunar.lunar_year, lunar.lunar_month));
        let terms: Vec<_> = (1..22)
            .filter_map(|d| to_lunisolar(date(1899, 12, d)).ok()?.solar_term)
            .collect();
        assert_eq!(vec!["大雪".to_owned()], terms);
    }

    #[test]
    fn out_of_range() {
        for d in [date(1800, 1, 1), date(2200, 1, 1)] {
            assert_eq!(Err(Error::UnsupportedDate(d)), to_lunisolar(d));
        }
    }

    #[test]
    fn malformed_source() {
        let d = date(2024, 2, 10);
        for ymd in [
            LunarYmd {
                year: 2024,
                month: Common(1),
                day: 31,
                solar_term: None,
            },
            LunarYmd {
                year: 2024,
                month: Leap(13),
                day: 1,
                solar_term: None,
            },
            LunarYmd {
                year: 2024,
                month: Common(1),
                day: 0,
                solar_term: None,
            },
            LunarYmd {
                year: 2024,
                month: Common(1),
                day: 1,
                solar_term: Some(25),
            },
        ] {
            assert_eq!(Err(Error::UnsupportedDate(d)), convert_with(&Fixed(ymd), d));
        }
    }

    #[test]
    fn idempotent() {
        let d = date(2025, 7, 25);
        assert_eq!(to_lunisolar(d), LunisolarDate::try_from(d));
    }

    #[test]
    fn display() {
        let lunar = to_lunisolar(date(2024, 2, 4)).unwrap();
        assert_eq!("癸卯年 腊月廿五 季冬 立春", lunar.to_string());
    }

    #[test]
    fn serializes_camel_case() {
        let lunar = to_lunisolar(date(2024, 2, 4)).unwrap();
        let json = serde_json::to_value(&lunar).unwrap();
        assert_eq!("立春", json["solarTerm"]);
        assert_eq!("腊月廿五", json["monthDay"]);
        assert_eq!(2023, json["lunarYear"]);
        let json = serde_json::to_value(to_lunisolar(date(2024, 2, 10)).unwrap()).unwrap();
        assert!(json.get("solarTerm").is_none());
    }
}
