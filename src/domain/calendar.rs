// ==========================================
// 团队排练排期系统 - 日期区间与星期过滤
// ==========================================
// DateRange 为闭区间 [start, end],日期不含时分
// ==========================================

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

// ==========================================
// DateRange - 日期闭区间
// ==========================================
// 构造不做校验,由引擎在使用前检查 is_valid()
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 单日区间
    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// 从 start 起 N 个月的窗口 (含 start,不含 start+N月 当天)
    ///
    /// 目标月没有 start 的日号时 (例如 11-30 起 3 个月),窗口止于目标月末
    ///
    /// 例: 2026-01-01 起 3 个月 → [2026-01-01, 2026-03-31]
    ///     2026-11-30 起 3 个月 → [2026-11-30, 2027-02-28]
    pub fn months_from(start: NaiveDate, months: u32) -> Option<Self> {
        let months = months.max(1);
        let target = start.checked_add_months(Months::new(months))?;
        let end = if target.day() < start.day() {
            target
        } else {
            target.pred_opt()?
        };
        Some(Self::new(start, end))
    }

    /// 一个季度的窗口
    pub fn quarter_from(start: NaiveDate) -> Option<Self> {
        Self::months_from(start, 3)
    }

    /// 某年某月的整月区间
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        Self::months_from(start, 1)
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 区间内所有日期 (升序,含两端); 非法区间为空
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// 区间天数; 非法区间为 0
    pub fn len_days(&self) -> i64 {
        if self.is_valid() {
            (self.end - self.start).num_days() + 1
        } else {
            0
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

// ==========================================
// WeekdayFilter - 候选日星期过滤
// ==========================================
// 默认: 只看周日 (固定排练日)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayFilter {
    Only(Weekday),
    AnyOf(Vec<Weekday>),
    AnyDay,
}

impl WeekdayFilter {
    pub fn only(weekday: Weekday) -> Self {
        WeekdayFilter::Only(weekday)
    }

    pub fn any_day() -> Self {
        WeekdayFilter::AnyDay
    }

    pub fn rehearsal_default() -> Self {
        WeekdayFilter::Only(Weekday::Sun)
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday();
        match self {
            WeekdayFilter::Only(w) => *w == weekday,
            WeekdayFilter::AnyOf(days) => days.contains(&weekday),
            WeekdayFilter::AnyDay => true,
        }
    }
}

impl Default for WeekdayFilter {
    fn default() -> Self {
        Self::rehearsal_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_inclusive() {
        let range = DateRange::new(date(2026, 2, 27), date(2026, 3, 2));
        let days: Vec<_> = range.days().collect();

        assert_eq!(days.len(), 4);
        assert_eq!(days[0], date(2026, 2, 27));
        assert_eq!(days[3], date(2026, 3, 2));
        assert_eq!(range.len_days(), 4);
    }

    #[test]
    fn test_invalid_range_is_empty() {
        let range = DateRange::new(date(2026, 3, 2), date(2026, 3, 1));
        assert!(!range.is_valid());
        assert_eq!(range.days().count(), 0);
        assert_eq!(range.len_days(), 0);
        assert!(!range.contains(date(2026, 3, 1)));
    }

    #[test]
    fn test_quarter_from() {
        let range = DateRange::quarter_from(date(2026, 1, 1)).unwrap();
        assert_eq!(range.end, date(2026, 3, 31));

        // 目标月无 30 日,止于 2 月末
        let range = DateRange::quarter_from(date(2026, 11, 30)).unwrap();
        assert_eq!(range.end, date(2027, 2, 28));

        let range = DateRange::quarter_from(date(2027, 11, 30)).unwrap();
        assert_eq!(range.end, date(2028, 2, 29));

        let range = DateRange::months_from(date(2026, 1, 31), 1).unwrap();
        assert_eq!(range.end, date(2026, 2, 28));

        let range = DateRange::months_from(date(2026, 1, 28), 1).unwrap();
        assert_eq!(range.end, date(2026, 2, 27));
    }

    #[test]
    fn test_month() {
        let feb = DateRange::month(2028, 2).unwrap();
        assert_eq!(feb.start, date(2028, 2, 1));
        assert_eq!(feb.end, date(2028, 2, 29));
        assert!(DateRange::month(2026, 13).is_none());
    }

    #[test]
    fn test_weekday_filter() {
        // 2026-03-01 是周日
        let sunday = date(2026, 3, 1);
        let monday = date(2026, 3, 2);

        let filter = WeekdayFilter::rehearsal_default();
        assert!(filter.matches(sunday));
        assert!(!filter.matches(monday));

        let weekend = WeekdayFilter::AnyOf(vec![Weekday::Sat, Weekday::Sun]);
        assert!(weekend.matches(sunday));
        assert!(weekend.matches(date(2026, 2, 28)));
        assert!(!weekend.matches(monday));

        assert!(WeekdayFilter::any_day().matches(monday));
    }
}
