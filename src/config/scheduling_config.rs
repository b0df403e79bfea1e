// ==========================================
// 团队排练排期系统 - 排期配置
// ==========================================
// 职责: 汇总排练日、最低人数、分级阈值、推荐窗口
// ==========================================

use crate::domain::calendar::WeekdayFilter;
use crate::engine::candidate_ranker::DEFAULT_MIN_REQUIRED;
use crate::engine::day_classifier::TierThresholds;
use serde::{Deserialize, Serialize};

/// 默认推荐窗口 (月)
pub const DEFAULT_SUGGESTION_WINDOW_MONTHS: u32 = 3;

/// 排期配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// 候选排练日的星期过滤
    pub rehearsal_filter: WeekdayFilter,

    /// 最低出席人数
    pub min_required: u32,

    /// 日历分级阈值
    pub tier_thresholds: TierThresholds,

    /// 推荐窗口月数
    pub suggestion_window_months: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            rehearsal_filter: WeekdayFilter::rehearsal_default(),
            min_required: DEFAULT_MIN_REQUIRED,
            tier_thresholds: TierThresholds::default(),
            suggestion_window_months: DEFAULT_SUGGESTION_WINDOW_MONTHS,
        }
    }
}

impl SchedulingConfig {
    /// 校验配置一致性
    ///
    /// # 规则
    /// - 0 <= medium <= high <= 1
    /// - suggestion_window_months >= 1
    /// - AnyOf 不能为空
    pub fn validate(&self) -> Result<(), String> {
        let TierThresholds { high, medium } = self.tier_thresholds;
        if !(0.0..=1.0).contains(&high) || !(0.0..=1.0).contains(&medium) {
            return Err(format!("分级阈值必须在 [0, 1] 内: high={}, medium={}", high, medium));
        }
        if medium > high {
            return Err(format!("medium 阈值 {} 高于 high 阈值 {}", medium, high));
        }
        if self.suggestion_window_months == 0 {
            return Err("推荐窗口月数必须 >= 1".to_string());
        }
        if let WeekdayFilter::AnyOf(days) = &self.rehearsal_filter {
            if days.is_empty() {
                return Err("排练日星期列表不能为空".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SchedulingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_required, 4);
        assert_eq!(config.rehearsal_filter, WeekdayFilter::rehearsal_default());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = SchedulingConfig {
            tier_thresholds: TierThresholds {
                high: 0.4,
                medium: 0.6,
            },
            ..SchedulingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_bounds_threshold_rejected() {
        let config = SchedulingConfig {
            tier_thresholds: TierThresholds {
                high: 1.2,
                medium: 0.5,
            },
            ..SchedulingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_weekday_list_rejected() {
        let config = SchedulingConfig {
            rehearsal_filter: WeekdayFilter::AnyOf(Vec::new()),
            ..SchedulingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
