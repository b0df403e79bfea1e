// ==========================================
// 团队排练排期系统 - 单日可用性汇总引擎
// ==========================================
// 输入: 日期 + 名册 + 可用性索引
// 输出: DayAvailabilitySummary (四个互斥分桶 + 比率)
// 红线: 纯函数,同输入同输出; 缺失记录归入 unknown
// ==========================================

use crate::domain::availability::AvailabilityIndex;
use crate::domain::member::Member;
use crate::domain::types::AvailabilityStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DayAvailabilitySummary - 单日汇总
// ==========================================
// 不变量: available + maybe + unavailable + unknown == 名册人数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAvailabilitySummary {
    pub date: NaiveDate,
    pub available: Vec<Member>,
    pub maybe: Vec<Member>,
    pub unavailable: Vec<Member>,
    pub unknown: Vec<Member>,

    /// 在团成员数 (比率分母)
    pub active_count: usize,

    /// 可出席比率 [0, 1]; 在团人数为 0 时记为 0
    pub ratio: f64,
}

impl DayAvailabilitySummary {
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// 四个分桶总人数
    pub fn total(&self) -> usize {
        self.available.len() + self.maybe.len() + self.unavailable.len() + self.unknown.len()
    }
}

// ==========================================
// AvailabilityAggregator - 汇总引擎
// ==========================================
pub struct AvailabilityAggregator {
    // 无状态引擎
}

impl AvailabilityAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 汇总某日上午的成员可用性
    ///
    /// # 参数
    /// - `date`: 日期
    /// - `roster`: 成员名册 (可为空)
    /// - `index`: 可用性索引
    ///
    /// # 比率口径
    /// 分子为 available 中的在团成员数,分母为名册中的在团成员数;
    /// 非在团成员仍按其记录进入对应分桶。
    pub fn summarize(
        &self,
        date: NaiveDate,
        roster: &[Member],
        index: &AvailabilityIndex,
    ) -> DayAvailabilitySummary {
        let mut available = Vec::new();
        let mut maybe = Vec::new();
        let mut unavailable = Vec::new();
        let mut unknown = Vec::new();

        for member in roster {
            let bucket = match index.morning_status(&member.id, date) {
                AvailabilityStatus::Available => &mut available,
                AvailabilityStatus::Maybe => &mut maybe,
                AvailabilityStatus::Unavailable => &mut unavailable,
                AvailabilityStatus::Unknown => &mut unknown,
            };
            bucket.push(member.clone());
        }

        let active_count = roster.iter().filter(|m| m.is_active()).count();
        let active_available = available.iter().filter(|m| m.is_active()).count();
        let ratio = Self::calculate_ratio(active_available, active_count);

        tracing::debug!(
            date = %date,
            available = available.len(),
            maybe = maybe.len(),
            unavailable = unavailable.len(),
            unknown = unknown.len(),
            ratio,
            "单日可用性汇总"
        );

        DayAvailabilitySummary {
            date,
            available,
            maybe,
            unavailable,
            unknown,
            active_count,
            ratio,
        }
    }

    /// 在团人数为 0 时比率记为 0,避免 NaN 传递到分级
    fn calculate_ratio(available: usize, active: usize) -> f64 {
        if active == 0 {
            return 0.0;
        }
        available as f64 / active as f64
    }
}

impl Default for AvailabilityAggregator {
    fn default() -> Self {
        Self::new()
    }
}
