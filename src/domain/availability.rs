// ==========================================
// 团队排练排期系统 - 可用性领域模型
// ==========================================
// 职责: 单日可用性、按时段的显式更新、成员×日期索引
// 红线: 缺失记录返回 Unknown,不报错
// ==========================================

use crate::domain::types::{AvailabilityStatus, Period};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// DayAvailability - 单日可用性
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    #[serde(default)]
    pub morning: AvailabilityStatus,
    #[serde(default)]
    pub evening: AvailabilityStatus,
}

impl DayAvailability {
    pub fn new(morning: AvailabilityStatus, evening: AvailabilityStatus) -> Self {
        Self { morning, evening }
    }

    /// 读取指定时段状态
    pub fn status(&self, period: Period) -> AvailabilityStatus {
        match period {
            Period::Morning => self.morning,
            Period::Evening => self.evening,
        }
    }

    /// 合并一次时段更新
    ///
    /// 只替换 update 指定的时段,另一时段原样保留
    pub fn merge(&self, update: AvailabilityUpdate) -> DayAvailability {
        match update.period {
            Period::Morning => DayAvailability {
                morning: update.status,
                evening: self.evening,
            },
            Period::Evening => DayAvailability {
                morning: self.morning,
                evening: update.status,
            },
        }
    }
}

// ==========================================
// AvailabilityUpdate - 时段更新
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub period: Period,
    pub status: AvailabilityStatus,
}

impl AvailabilityUpdate {
    pub fn new(period: Period, status: AvailabilityStatus) -> Self {
        Self { period, status }
    }
}

// ==========================================
// AvailabilityIndex - 成员×日期索引
// ==========================================
// 序列化形式: { "member_id": { "YYYY-MM-DD": { "morning": ..., "evening": ... } } }
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityIndex {
    entries: HashMap<String, BTreeMap<NaiveDate, DayAvailability>>,
}

impl AvailabilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询单日可用性,无记录时两个时段均为 Unknown
    pub fn get(&self, member_id: &str, date: NaiveDate) -> DayAvailability {
        self.entries
            .get(member_id)
            .and_then(|days| days.get(&date))
            .copied()
            .unwrap_or_default()
    }

    /// 查询上午状态 (排练推荐口径)
    pub fn morning_status(&self, member_id: &str, date: NaiveDate) -> AvailabilityStatus {
        self.get(member_id, date).morning
    }

    /// 是否存在显式记录
    pub fn contains(&self, member_id: &str, date: NaiveDate) -> bool {
        self.entries
            .get(member_id)
            .map(|days| days.contains_key(&date))
            .unwrap_or(false)
    }

    /// 直接写入单日记录 (覆盖)
    pub fn insert(&mut self, member_id: impl Into<String>, date: NaiveDate, day: DayAvailability) {
        self.entries
            .entry(member_id.into())
            .or_default()
            .insert(date, day);
    }

    /// 对单日应用一次时段更新,返回合并后的记录
    pub fn apply(
        &mut self,
        member_id: &str,
        date: NaiveDate,
        update: AvailabilityUpdate,
    ) -> DayAvailability {
        let days = self.entries.entry(member_id.to_string()).or_default();
        let merged = days.get(&date).copied().unwrap_or_default().merge(update);
        days.insert(date, merged);
        merged
    }

    /// 对一组日期应用同一更新 (拖选提交)
    ///
    /// # 返回
    /// 实际写入的天数
    pub fn apply_range<I>(&mut self, member_id: &str, dates: I, update: AvailabilityUpdate) -> usize
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut written = 0;
        for date in dates {
            self.apply(member_id, date, update);
            written += 1;
        }
        written
    }

    /// 某成员的全部记录 (按日期升序)
    pub fn member_days(
        &self,
        member_id: &str,
    ) -> impl Iterator<Item = (NaiveDate, DayAvailability)> + '_ {
        self.entries
            .get(member_id)
            .into_iter()
            .flat_map(|days| days.iter().map(|(d, a)| (*d, *a)))
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn member_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_merge_only_touches_named_period() {
        let day = DayAvailability::new(AvailabilityStatus::Maybe, AvailabilityStatus::Available);

        let merged = day.merge(AvailabilityUpdate::new(
            Period::Morning,
            AvailabilityStatus::Unavailable,
        ));
        assert_eq!(merged.morning, AvailabilityStatus::Unavailable);
        assert_eq!(merged.evening, AvailabilityStatus::Available);

        let merged = day.merge(AvailabilityUpdate::new(Period::Evening, AvailabilityStatus::Unknown));
        assert_eq!(merged.morning, AvailabilityStatus::Maybe);
        assert_eq!(merged.evening, AvailabilityStatus::Unknown);
    }

    #[test]
    fn test_missing_entry_is_unknown() {
        let mut index = AvailabilityIndex::new();
        index.insert(
            "m1",
            date(2026, 3, 1),
            DayAvailability::new(AvailabilityStatus::Available, AvailabilityStatus::Available),
        );

        assert_eq!(
            index.morning_status("m1", date(2026, 3, 2)),
            AvailabilityStatus::Unknown
        );
        assert_eq!(index.get("ghost", date(2026, 3, 1)), DayAvailability::default());
        assert!(!index.contains("ghost", date(2026, 3, 1)));
    }

    #[test]
    fn test_apply_creates_and_merges() {
        let mut index = AvailabilityIndex::new();
        let d = date(2026, 3, 1);

        index.apply("m1", d, AvailabilityUpdate::new(Period::Evening, AvailabilityStatus::Maybe));
        let merged =
            index.apply("m1", d, AvailabilityUpdate::new(Period::Morning, AvailabilityStatus::Available));

        assert_eq!(merged.morning, AvailabilityStatus::Available);
        assert_eq!(merged.evening, AvailabilityStatus::Maybe);
        assert_eq!(index.entry_count(), 1);
    }

    #[test]
    fn test_apply_range_counts_days() {
        let mut index = AvailabilityIndex::new();
        let days = (1..=5).map(|d| date(2026, 3, d));

        let written = index.apply_range(
            "m1",
            days,
            AvailabilityUpdate::new(Period::Morning, AvailabilityStatus::Unavailable),
        );

        assert_eq!(written, 5);
        assert_eq!(index.member_count(), 1);
        assert_eq!(
            index.morning_status("m1", date(2026, 3, 4)),
            AvailabilityStatus::Unavailable
        );
    }

    #[test]
    fn test_json_shape_uses_iso_dates() {
        let mut index = AvailabilityIndex::new();
        index.insert(
            "m1",
            date(2026, 3, 1),
            DayAvailability::new(AvailabilityStatus::Available, AvailabilityStatus::Unknown),
        );

        let value = serde_json::to_value(&index).unwrap();
        assert_eq!(value["m1"]["2026-03-01"]["morning"], "available");

        let parsed: AvailabilityIndex = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, index);
    }
}
