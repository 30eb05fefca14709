//! 月相節氣曆表數據
//!
//! 曆表並非預製，而是由 [`crate::astronomy`] 即時推算：節氣取視太陽黃經每 15° 之時刻，朔取月日合朔時刻。
//! 首次查詢時一次推算 [`RANGE`] 內全部歲的曆表，此後只讀。

use std::ops::RangeInclusive;
use std::sync::LazyLock;
use std::time::Instant;

use crate::astronomy;
use crate::date::Date;
use crate::time_scales::Tdb;

/// 有曆表的歲（見 [`Annus::annus`]）範圍。
pub const RANGE: RangeInclusive<i32> = 1900..=2100;

/// 每歲所列合朔數
pub const NEW_MOONS: usize = 15;

/// 保存一歲的曆表數據
#[derive(Debug)]
pub struct Annus {
    /// 序號，為該歲大部分時段所在公元年
    pub annus: i32,
    /// 從冬至開始的各節氣時刻，亦含次歲冬至以便計算末日
    pub solar_term: [Tdb; 25],
    /// 冬至前的小雪、大雪時刻，即前一歲的末二節氣，歲首十一月或始於其間
    pub preceding: [Tdb; 2],
    /// 合朔時刻，從冬至當日或之前最近一朔開始，連續十五個月
    pub new_moon: [Tdb; NEW_MOONS],
}

static DATA: LazyLock<Vec<Annus>> = LazyLock::new(|| {
    let started = Instant::now();
    let data: Vec<_> = RANGE.map(Annus::compute).collect();
    tracing::debug!(
        first = *RANGE.start(),
        last = *RANGE.end(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "computed lunisolar ephemeris"
    );
    data
});

impl Annus {
    /// 取得公元 `annus` 年對應的歳的曆表。
    ///
    /// 無數據則返回 `None`。
    pub fn get(annus: i32) -> Option<&'static Self> {
        if !RANGE.contains(&annus) {
            return None;
        }
        DATA.binary_search_by_key(&annus, |an| an.annus)
            .ok()
            .map(|i| &DATA[i])
    }

    /// 推算一歲的曆表。
    fn compute(annus: i32) -> Self {
        // 前一年 12 月 22 日前後為冬至，此後每氣約 15.2 日
        let winter_solstice_guess = Date::from_gregorian(annus - 1, 12, 22)
            .map_or(f64::NAN, |date| date.jdn() as f64);
        // 以冬至為 0，第 i 氣
        let term = |i: i32| {
            let guess = winter_solstice_guess + f64::from(i) * astronomy::TROPICAL_YEAR / 24.0;
            let longitude = astronomy::normalize_degrees(270.0 + 15.0 * f64::from(i));
            astronomy::solar_longitude_crossing(longitude, Tdb(guess))
        };
        let solar_term: [Tdb; 25] = std::array::from_fn(|i| term(i as i32));
        let preceding = [term(-2), term(-1)];

        let ws_date = super::date_cst(solar_term[0]);
        let mut k = astronomy::lunation_at_or_before(solar_term[0]);
        // 合朔與冬至同日而時刻較晚時，按日期仍屬同月
        while super::date_cst(astronomy::new_moon(k + 1)) <= ws_date {
            k += 1;
        }
        let new_moon = std::array::from_fn(|i| astronomy::new_moon(k + i as i32));

        Annus {
            annus,
            solar_term,
            preceding,
            new_moon,
        }
    }
}
