// ==========================================
// 团队排练排期系统 - 排练候选日排序引擎
// ==========================================
// 输入: 日期区间 + 星期过滤 + 名册 + 可用性索引 + 最低人数
// 输出: Vec<RankedCandidate> (可出席人数降序,同数按日期升序)
// 红线: 区间非法直接报错,不返回部分结果
// ==========================================

use crate::domain::availability::AvailabilityIndex;
use crate::domain::calendar::{DateRange, WeekdayFilter};
use crate::domain::member::Member;
use crate::engine::aggregator::{AvailabilityAggregator, DayAvailabilitySummary};
use crate::engine::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 默认最低出席人数
pub const DEFAULT_MIN_REQUIRED: u32 = 4;

// ==========================================
// RankedCandidate - 排序后的候选日
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub date: NaiveDate,
    pub summary: DayAvailabilitySummary,

    /// available 人数 >= min_required
    pub meets_threshold: bool,
}

// ==========================================
// CandidateRanker - 候选日排序引擎
// ==========================================
pub struct CandidateRanker {
    aggregator: AvailabilityAggregator,
}

impl CandidateRanker {
    pub fn new() -> Self {
        Self {
            aggregator: AvailabilityAggregator::new(),
        }
    }

    /// 生成并排序候选日
    ///
    /// # 参数
    /// - `range`: 闭区间
    /// - `filter`: 星期过滤 (默认周日)
    /// - `roster`: 成员名册
    /// - `index`: 可用性索引
    /// - `min_required`: 最低出席人数
    ///
    /// # 返回
    /// - Ok(Vec<RankedCandidate>): 完整排序结果; 名册为空时为空列表
    /// - Err(EngineError::InvalidRange): start > end
    pub fn rank_candidates(
        &self,
        range: &DateRange,
        filter: &WeekdayFilter,
        roster: &[Member],
        index: &AvailabilityIndex,
        min_required: u32,
    ) -> EngineResult<Vec<RankedCandidate>> {
        if !range.is_valid() {
            return Err(EngineError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }

        if roster.is_empty() {
            tracing::debug!(range = %range, "名册为空,无候选日");
            return Ok(Vec::new());
        }

        let mut candidates: Vec<RankedCandidate> = range
            .days()
            .filter(|date| filter.matches(*date))
            .map(|date| {
                let summary = self.aggregator.summarize(date, roster, index);
                let meets_threshold = summary.available_count() >= min_required as usize;
                RankedCandidate {
                    date,
                    summary,
                    meets_threshold,
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.summary
                .available_count()
                .cmp(&a.summary.available_count())
                .then_with(|| a.date.cmp(&b.date))
        });

        tracing::debug!(
            range = %range,
            candidates = candidates.len(),
            qualified = candidates.iter().filter(|c| c.meets_threshold).count(),
            "候选日排序完成"
        );

        Ok(candidates)
    }

    /// 最佳候选日: 排序后第一个满足人数要求的日期
    pub fn best_candidate(
        &self,
        range: &DateRange,
        filter: &WeekdayFilter,
        roster: &[Member],
        index: &AvailabilityIndex,
        min_required: u32,
    ) -> EngineResult<Option<RankedCandidate>> {
        let ranked = self.rank_candidates(range, filter, roster, index, min_required)?;
        Ok(Self::pick_best(&ranked))
    }

    /// 从已排序的候选列表中取最佳候选日
    pub fn pick_best(ranked: &[RankedCandidate]) -> Option<RankedCandidate> {
        ranked.iter().find(|c| c.meets_threshold).cloned()
    }
}

impl Default for CandidateRanker {
    fn default() -> Self {
        Self::new()
    }
}
