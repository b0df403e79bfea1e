// ==========================================
// 团队排练排期系统 - 可用性 / 排练建议 API
// ==========================================
// 职责: 从数据源加载快照,调用引擎,返回汇总、候选日与日历分级
// 架构: API 层 → Engine 层 (纯计算) + Repository 层 (快照与写入)
// 红线: 引擎只在完整快照上计算; 数据源错误在调用引擎前返回
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::SchedulingConfig;
use crate::domain::availability::{AvailabilityIndex, AvailabilityUpdate, DayAvailability};
use crate::domain::calendar::DateRange;
use crate::domain::member::Member;
use crate::domain::types::{AvailabilityStatus, Period, Tier};
use crate::engine::aggregator::{AvailabilityAggregator, DayAvailabilitySummary};
use crate::engine::candidate_ranker::{CandidateRanker, RankedCandidate};
use crate::engine::day_classifier::DayClassifier;
use crate::repository::provider::{AvailabilityStore, RosterProvider};

// ==========================================
// 响应类型
// ==========================================

/// 排练建议响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehearsalSuggestionResponse {
    pub range: DateRange,
    pub min_required: u32,

    /// 完整排序结果
    pub candidates: Vec<RankedCandidate>,

    /// 第一个满足最低人数的候选日
    pub best: Option<RankedCandidate>,
}

/// 日历格子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub tier: Tier,

    /// 当前语言下的分级标签
    pub label: String,

    /// Disabled 格子无比率
    pub ratio: Option<f64>,
}

// ==========================================
// AvailabilityApi
// ==========================================
pub struct AvailabilityApi {
    roster: Arc<dyn RosterProvider>,
    store: Arc<dyn AvailabilityStore>,
    config: SchedulingConfig,
    aggregator: AvailabilityAggregator,
    ranker: CandidateRanker,
    classifier: DayClassifier,
}

impl AvailabilityApi {
    /// 创建新的AvailabilityApi实例
    ///
    /// # 参数
    /// - roster: 名册数据源
    /// - store: 可用性数据源
    /// - config: 已加载的排期配置 (分级阈值在此固定)
    pub fn new(
        roster: Arc<dyn RosterProvider>,
        store: Arc<dyn AvailabilityStore>,
        config: SchedulingConfig,
    ) -> Self {
        let classifier = DayClassifier::with_thresholds(config.tier_thresholds);
        Self {
            roster,
            store,
            config,
            aggregator: AvailabilityAggregator::new(),
            ranker: CandidateRanker::new(),
            classifier,
        }
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 单日汇总
    pub fn get_day_summary(&self, date: NaiveDate) -> ApiResult<DayAvailabilitySummary> {
        let (members, index) = self.load_snapshot(&DateRange::single(date))?;
        Ok(self.aggregator.summarize(date, &members, &index))
    }

    /// 排练建议
    ///
    /// # 参数
    /// - start / end: 闭区间
    /// - min_required: 最低出席人数; None 时使用配置值
    ///
    /// # 返回
    /// - Err(ApiError::InvalidRange): start > end,不返回部分结果
    pub fn get_rehearsal_suggestions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        min_required: Option<u32>,
    ) -> ApiResult<RehearsalSuggestionResponse> {
        let range = DateRange::new(start, end);
        Self::ensure_valid(&range)?;

        let min_required = min_required.unwrap_or(self.config.min_required);
        tracing::info!(range = %range, min_required, "查询排练建议");

        let (members, index) = self.load_snapshot(&range)?;
        let candidates = self.ranker.rank_candidates(
            &range,
            &self.config.rehearsal_filter,
            &members,
            &index,
            min_required,
        )?;
        let best = CandidateRanker::pick_best(&candidates);

        Ok(RehearsalSuggestionResponse {
            range,
            min_required,
            candidates,
            best,
        })
    }

    /// 默认推荐窗口: 从 today 起配置的月数
    pub fn default_suggestion_window(&self, today: NaiveDate) -> ApiResult<DateRange> {
        DateRange::months_from(today, self.config.suggestion_window_months).ok_or_else(|| {
            ApiError::InternalError(format!(
                "推荐窗口超出日期范围: start={}, months={}",
                today, self.config.suggestion_window_months
            ))
        })
    }

    /// 日历分级
    ///
    /// # 参数
    /// - active_range: 可选区间,区间外的日期为 Disabled
    /// - view: 渲染的日期 (通常为一个月)
    ///
    /// # 返回
    /// view 中每天一个格子,按日期升序
    pub fn get_calendar_tiers(
        &self,
        active_range: &DateRange,
        view: &DateRange,
    ) -> ApiResult<Vec<CalendarCell>> {
        Self::ensure_valid(active_range)?;
        Self::ensure_valid(view)?;

        let (members, index) = self.load_snapshot(view)?;
        let filter = &self.config.rehearsal_filter;

        let cells = view
            .days()
            .map(|date| {
                let summary = (filter.matches(date) && active_range.contains(date))
                    .then(|| self.aggregator.summarize(date, &members, &index));
                let tier = self
                    .classifier
                    .classify(date, active_range, filter, summary.as_ref());

                CalendarCell {
                    date,
                    tier,
                    label: tier.label(),
                    ratio: summary.map(|s| s.ratio),
                }
            })
            .collect();

        Ok(cells)
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 设置单日单时段的可用性
    pub fn set_availability(
        &self,
        member_id: &str,
        date: NaiveDate,
        period: Period,
        status: AvailabilityStatus,
    ) -> ApiResult<DayAvailability> {
        let member = self.require_member(member_id)?;

        let day = self
            .store
            .apply_update(&member.id, date, AvailabilityUpdate::new(period, status))?;

        tracing::info!(
            member_id = %member.id,
            date = %date,
            period = %period,
            status = %status,
            "可用性已更新"
        );
        Ok(day)
    }

    /// 拖选提交: 对选中区间内每一天应用同一更新
    ///
    /// # 返回
    /// 写入的天数
    pub fn apply_selection(
        &self,
        member_id: &str,
        selection: &DateRange,
        period: Period,
        status: AvailabilityStatus,
    ) -> ApiResult<usize> {
        Self::ensure_valid(selection)?;
        let member = self.require_member(member_id)?;

        let written = self.store.apply_range_update(
            &member.id,
            selection,
            AvailabilityUpdate::new(period, status),
        )?;

        tracing::info!(
            member_id = %member.id,
            range = %selection,
            period = %period,
            status = %status,
            written,
            "区间可用性已更新"
        );
        Ok(written)
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn ensure_valid(range: &DateRange) -> ApiResult<()> {
        if range.is_valid() {
            Ok(())
        } else {
            Err(ApiError::InvalidRange {
                start: range.start,
                end: range.end,
            })
        }
    }

    fn require_member(&self, member_id: &str) -> ApiResult<Member> {
        let member_id = member_id.trim();
        if member_id.is_empty() {
            return Err(ApiError::InvalidInput("成员ID不能为空".to_string()));
        }

        self.roster
            .find_member(member_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Member(id={})不存在", member_id)))
    }

    /// 加载名册与区间内可用性
    fn load_snapshot(&self, range: &DateRange) -> ApiResult<(Vec<Member>, AvailabilityIndex)> {
        let members = self.roster.list_members()?;
        let ids: Vec<String> = members.iter().map(|m| m.id.clone()).collect();
        let index = self.store.load_index(&ids, range)?;
        Ok((members, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MemberStatus;
    use crate::repository::memory_store::InMemoryStore;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn setup() -> (Arc<InMemoryStore>, AvailabilityApi) {
        let members = vec![
            Member::new("a", "A", MemberStatus::Active),
            Member::new("b", "B", MemberStatus::Active),
            Member::new("c", "C", MemberStatus::Active),
            Member::new("d", "D", MemberStatus::Inactive),
        ];
        let store = Arc::new(InMemoryStore::new(members, AvailabilityIndex::new()));
        let api = AvailabilityApi::new(store.clone(), store.clone(), SchedulingConfig::default());
        (store, api)
    }

    #[test]
    fn test_set_availability_then_summary() {
        let (_store, api) = setup();
        let sunday = d(3, 1);

        api.set_availability("a", sunday, Period::Morning, AvailabilityStatus::Available)
            .unwrap();
        api.set_availability("b", sunday, Period::Morning, AvailabilityStatus::Available)
            .unwrap();
        api.set_availability("c", sunday, Period::Morning, AvailabilityStatus::Maybe)
            .unwrap();

        let summary = api.get_day_summary(sunday).unwrap();
        assert_eq!(summary.available_count(), 2);
        assert_eq!(summary.maybe.len(), 1);
        assert_eq!(summary.unknown.len(), 1);
        assert!((summary.ratio - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_availability_rejects_unknown_member() {
        let (_store, api) = setup();
        let err = api
            .set_availability("zz", d(3, 1), Period::Morning, AvailabilityStatus::Available)
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = api
            .set_availability("  ", d(3, 1), Period::Morning, AvailabilityStatus::Available)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_suggestions_invalid_range() {
        let (_store, api) = setup();
        let err = api
            .get_rehearsal_suggestions(d(4, 1), d(3, 1), None)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRange { .. }));
    }

    #[test]
    fn test_suggestions_best_uses_override() {
        let (_store, api) = setup();
        let selection = DateRange::new(d(3, 8), d(3, 8));
        for member in ["a", "b"] {
            api.apply_selection(member, &selection, Period::Morning, AvailabilityStatus::Available)
                .unwrap();
        }

        let response = api
            .get_rehearsal_suggestions(d(3, 1), d(3, 31), None)
            .unwrap();
        assert_eq!(response.min_required, 4);
        assert_eq!(response.candidates.len(), 5);
        assert_eq!(response.candidates[0].date, d(3, 8));
        assert!(response.best.is_none());

        let response = api
            .get_rehearsal_suggestions(d(3, 1), d(3, 31), Some(2))
            .unwrap();
        assert_eq!(response.best.map(|c| c.date), Some(d(3, 8)));
    }

    #[test]
    fn test_calendar_tiers_disable_non_candidates() {
        let (_store, api) = setup();
        let view = DateRange::month(2026, 3).unwrap();
        let active = DateRange::new(d(3, 1), d(3, 15));

        let cells = api.get_calendar_tiers(&active, &view).unwrap();
        assert_eq!(cells.len(), 31);

        // 3/1 周日且在区间内
        assert_eq!(cells[0].tier, Tier::Low);
        assert_eq!(cells[0].ratio, Some(0.0));
        // 3/2 周一
        assert_eq!(cells[1].tier, Tier::Disabled);
        assert_eq!(cells[1].ratio, None);
        // 3/22 周日但在区间外
        assert_eq!(cells[21].tier, Tier::Disabled);
    }

    #[test]
    fn test_apply_selection_counts_days() {
        let (store, api) = setup();
        let selection = DateRange::new(d(3, 2), d(3, 6));
        let written = api
            .apply_selection("c", &selection, Period::Evening, AvailabilityStatus::Unavailable)
            .unwrap();
        assert_eq!(written, 5);

        let snapshot = store.snapshot().unwrap();
        assert_eq!(
            snapshot.availability.get("c", d(3, 4)).evening,
            AvailabilityStatus::Unavailable
        );
        assert_eq!(
            snapshot.availability.get("c", d(3, 4)).morning,
            AvailabilityStatus::Unknown
        );
    }
}
