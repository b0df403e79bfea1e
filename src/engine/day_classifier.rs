// ==========================================
// 团队排练排期系统 - 日历分级引擎
// ==========================================
// 规则:
// - 不满足星期过滤 或 不在区间内 → Disabled
// - ratio >= high   → High
// - ratio >= medium → Medium
// - 其余            → Low
// 阈值下界包含; NaN 落入 Low,保证全覆盖
// ==========================================

use crate::domain::calendar::{DateRange, WeekdayFilter};
use crate::domain::types::Tier;
use crate::engine::aggregator::DayAvailabilitySummary;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// TierThresholds - 分级阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high: 0.75,
            medium: 0.5,
        }
    }
}

// ==========================================
// DayClassifier - 分级引擎
// ==========================================
pub struct DayClassifier {
    thresholds: TierThresholds,
}

impl DayClassifier {
    pub fn new() -> Self {
        Self::with_thresholds(TierThresholds::default())
    }

    pub fn with_thresholds(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> TierThresholds {
        self.thresholds
    }

    /// 对日历格子分级
    ///
    /// # 参数
    /// - `date`: 日期
    /// - `range`: 当前有效区间
    /// - `filter`: 星期过滤
    /// - `summary`: 该日汇总; 候选日应由调用方预先计算
    ///
    /// # 返回
    /// 四个 Tier 之一,不会失败
    pub fn classify(
        &self,
        date: NaiveDate,
        range: &DateRange,
        filter: &WeekdayFilter,
        summary: Option<&DayAvailabilitySummary>,
    ) -> Tier {
        if !filter.matches(date) || !range.contains(date) {
            return Tier::Disabled;
        }

        match summary {
            Some(summary) => self.tier_for_ratio(summary.ratio),
            None => {
                tracing::warn!(date = %date, "候选日缺少汇总,按比率 0 分级");
                self.tier_for_ratio(0.0)
            }
        }
    }

    /// 比率 → 分级 (不含 Disabled)
    pub fn tier_for_ratio(&self, ratio: f64) -> Tier {
        if ratio >= self.thresholds.high {
            Tier::High
        } else if ratio >= self.thresholds.medium {
            Tier::Medium
        } else {
            Tier::Low
        }
    }
}

impl Default for DayClassifier {
    fn default() -> Self {
        Self::new()
    }
}
