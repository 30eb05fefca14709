//! 格式化日期相關功能
//!
//! 輸出文本一律用簡體字（腊月、闰月、惊蛰等），與日常農曆顯示一致。

use crate::date::Date;
use crate::error::{Error, Result};

/// 漢數字，第 `1..=9` 項分別為「一」到「九」。為便於格式化日期，第 0 項為「十」。
pub const NUM_CHINESE: &[&str] = &["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// 天干，甲至癸。
pub static HEAVENLY_STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

/// 地支，子至亥。
pub static EARTHLY_BRANCHES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

/// 日名，初一至三十。
pub static LUNAR_DAYS: [&str; 30] = [
    "初一", "初二", "初三", "初四", "初五", "初六", "初七", "初八", "初九", "初十",
    "十一", "十二", "十三", "十四", "十五", "十六", "十七", "十八", "十九", "二十",
    "廿一", "廿二", "廿三", "廿四", "廿五", "廿六", "廿七", "廿八", "廿九", "三十",
];

/// 月名與季節名對照，月名不含閏字。
pub static MONTH_SEASONS: [(&str, &str); 12] = [
    ("正月", "初春"),
    ("二月", "仲春"),
    ("三月", "暮春"),
    ("四月", "初夏"),
    ("五月", "仲夏"),
    ("六月", "季夏"),
    ("七月", "初秋"),
    ("八月", "仲秋"),
    ("九月", "深秋"),
    ("十月", "初冬"),
    ("冬月", "仲冬"),
    ("腊月", "季冬"),
];

/// 閏月前綴
pub const LEAP_PREFIX: &str = "闰";

/// 年名後綴
pub const YEAR_SUFFIX: &str = "年";

/// 干支序號轉為文本形式。`1` 為甲子，`60` 為癸亥。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("乙巳", chinese::fmt::sexagenary(42));
/// ```
pub fn sexagenary(num: u32) -> String {
    let (stem, branch) = (wrap_index(num, 10), wrap_index(num, 12));
    HEAVENLY_STEMS[stem].to_owned() + EARTHLY_BRANCHES[branch]
}

/// 將 1 起算的循環序號化為表索引：餘數為 0 者取末項。
fn wrap_index(num: u32, len: u32) -> usize {
    match num % len {
        0 => len as usize - 1,
        r => r as usize - 1,
    }
}

/// 取得農曆年的干支年名，如「甲辰年」。
///
/// 公元年數減三，以十除之餘數為天干，以十二除之餘數為地支，餘數為 0 者取末位（癸、亥）。
///
/// # 用例
///
/// ```
/// use nongli::chinese::fmt::sexagenary_year;
///
/// assert_eq!("甲子年", sexagenary_year(1984));
/// assert_eq!("癸亥年", sexagenary_year(1983));
/// assert_eq!("甲辰年", sexagenary_year(2024));
/// ```
pub fn sexagenary_year(year: i32) -> String {
    let radix = i64::from(year) - 3;
    // rem_euclid 保證公元前年份亦落在 0..10、0..12
    let stem = radix.rem_euclid(10) as u32;
    let branch = radix.rem_euclid(12) as u32;
    HEAVENLY_STEMS[wrap_index(stem, 10)].to_owned()
        + EARTHLY_BRANCHES[wrap_index(branch, 12)]
        + YEAR_SUFFIX
}

/// 取得月名（含「月」字）。十一、十二月稱「冬月」「腊月」。
///
/// # 用例
///
/// ```
/// use nongli::chinese::{self, Month::*};
///
/// assert_eq!("冬月", chinese::fmt::month(Common(11)).unwrap());
/// assert_eq!("闰正月", chinese::fmt::month(Leap(1)).unwrap());
/// ```
///
/// # Errors
///
/// 若月序號不在 `1..=12` 間則回報 [`Error::InvalidMonth`]。
pub fn month(m: super::Month) -> Result<String> {
    let num = m.num();
    let base = match num {
        1 => "正",
        2..=9 => NUM_CHINESE[num as usize],
        10 => "十",
        11 => "冬",
        12 => "腊",
        _ => return Err(Error::InvalidMonth(num)),
    };
    let prefix = if m.is_leap() { LEAP_PREFIX } else { "" };
    Ok(format!("{prefix}{base}月"))
}

/// 取得日名，前十日為「初一」到「初十」，第 21 至 29 日為「廿一」到「廿九」。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("初十", chinese::fmt::day(10).unwrap());
/// assert_eq!("廿五", chinese::fmt::day(25).unwrap());
/// assert_eq!("三十", chinese::fmt::day(30).unwrap());
/// assert!(chinese::fmt::day(31).is_err());
/// ```
///
/// # Errors
///
/// 若日序號不在 `1..=30` 間則回報 [`Error::InvalidDay`]。
pub fn day(d: u32) -> Result<String> {
    d.checked_sub(1)
        .and_then(|idx| LUNAR_DAYS.get(idx as usize))
        .map(|&name| name.to_owned())
        .ok_or(Error::InvalidDay(d))
}

/// 依月名取季節名。月名前的「闰」字先行去除，故閏月與本月同季；查無此月名則原樣返回（去閏字後）。
///
/// # 用例
///
/// ```
/// use nongli::chinese::fmt::season;
///
/// assert_eq!("初夏", season("四月"));
/// assert_eq!("初夏", season("闰四月"));
/// assert_eq!("十三月", season("十三月"));
/// ```
pub fn season(month: &str) -> &str {
    let base = month.strip_prefix(LEAP_PREFIX).unwrap_or(month);
    MONTH_SEASONS
        .iter()
        .find(|(name, _)| *name == base)
        .map_or(base, |&(_, season)| season)
}

/// 節氣序號轉為名稱。`1..=24` 分別為立春到大寒。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("谷雨", chinese::fmt::solar_term(6).unwrap());
/// assert_eq!("大寒", chinese::fmt::solar_term(24).unwrap());
/// ```
///
/// # Errors
///
/// 若序號不在 `1..=24` 間則回報 [`Error::InvalidSolarTerm`]。
pub fn solar_term(term: u32) -> Result<&'static str> {
    const NAMES: [&str; 24] = [
        "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至", "小暑",
        "大暑", "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至",
        "小寒", "大寒",
    ];
    term.checked_sub(1)
        .and_then(|idx| NAMES.get(idx as usize))
        .copied()
        .ok_or(Error::InvalidSolarTerm(term))
}

/// 以中文格式顯示公曆日期，供無法換算農曆時退而顯示。
///
/// 不含年份時為「2月05日」（日補零），含年份時為「2024年2月5日」。
///
/// # 用例
///
/// ```
/// use nongli::Date;
/// use nongli::chinese::fmt::gregorian;
///
/// let date = Date::from_gregorian(2024, 2, 5).unwrap();
/// assert_eq!("2月05日", gregorian(date, false));
/// assert_eq!("2024年2月5日", gregorian(date, true));
/// ```
pub fn gregorian(date: Date, with_year: bool) -> String {
    let (y, m, d) = date.gregorian();
    if with_year {
        format!("{y}年{m}月{d}日")
    } else {
        format!("{m}月{d:02}日")
    }
}
