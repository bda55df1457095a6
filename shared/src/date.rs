//! 日期类型模块
//!
//! 比赛、步数都以"天"为粒度，时区换算由后端按比赛 tz 负责。
//! `StepDate` 是可序列化的 YYYY-MM-DD 日期，内部为 `chrono::NaiveDate`，
//! 提供解析、比较和加减天数等操作。

use chrono::{Datelike, Duration, NaiveDate};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 日粒度日期，序列化为 "YYYY-MM-DD" 字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepDate(NaiveDate);

impl StepDate {
    #[inline]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// 严格按 "YYYY-MM-DD" 解析
    ///
    /// 返回 None 如果格式不符或日期不存在（如 2 月 30 日）
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Self)
    }

    /// 按年月日构造，无效组合返回 None
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// 加减天数（负数为往前）
    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    #[inline]
    pub fn inner(&self) -> NaiveDate {
        self.0
    }

    /// 当前日期（UTC 日历日）
    ///
    /// WASM 环境下走 `js_sys::Date`，宿主环境走 chrono，
    /// 便于纯逻辑测试在非浏览器目标上运行。
    pub fn today() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let now = js_sys::Date::new_0();
            Self::from_ymd(
                now.get_utc_full_year() as i32,
                now.get_utc_month() + 1,
                now.get_utc_date(),
            )
            .unwrap_or_else(|| Self(NaiveDate::default()))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self(chrono::Utc::now().date_naive())
        }
    }
}

impl fmt::Display for StepDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for StepDate {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(())
    }
}

impl Serialize for StepDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for StepDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        StepDate::parse(&s)
            .ok_or_else(|| D::Error::custom(format!("invalid date: {:?}, expected YYYY-MM-DD", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_iso_dates_only() {
        assert_eq!(
            StepDate::parse("2025-02-01"),
            StepDate::from_ymd(2025, 2, 1)
        );
        assert!(StepDate::parse("2025-02-30").is_none());
        assert!(StepDate::parse("01/02/2025").is_none());
        assert!(StepDate::parse("2025-2-1x").is_none());
        assert!(StepDate::parse("").is_none());
    }

    #[test]
    fn ordering_is_chronological() {
        let a = StepDate::parse("2025-01-01").unwrap();
        let b = StepDate::parse("2025-02-01").unwrap();
        assert!(a < b);
        assert!(b >= a);
        assert_eq!(a, StepDate::parse("2025-01-01").unwrap());
    }

    #[test]
    fn plus_days_crosses_month_boundaries() {
        let end = StepDate::parse("2025-03-31").unwrap();
        assert_eq!(end.plus_days(2), StepDate::parse("2025-04-02").unwrap());
        assert_eq!(end.plus_days(-31), StepDate::parse("2025-02-28").unwrap());
    }

    #[test]
    fn display_round_trips() {
        let d = StepDate::parse("2025-12-09").unwrap();
        assert_eq!(d.to_string(), "2025-12-09");
        assert_eq!(StepDate::parse(&d.to_string()), Some(d));
    }
}
