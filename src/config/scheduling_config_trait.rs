// ==========================================
// 团队排练排期系统 - 排期配置读取 Trait
// ==========================================
// 职责: 定义排期所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::scheduling_config::SchedulingConfig;
use crate::domain::calendar::WeekdayFilter;
use crate::engine::day_classifier::TierThresholds;
use async_trait::async_trait;
use std::error::Error;

/// 配置层 Result 类型
pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// SchedulingConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait SchedulingConfigReader: Send + Sync {
    /// 获取排练日星期过滤
    ///
    /// # 默认值
    /// - SUN
    async fn get_rehearsal_filter(&self) -> ConfigResult<WeekdayFilter>;

    /// 获取最低出席人数
    ///
    /// # 默认值
    /// - 4
    async fn get_min_required_members(&self) -> ConfigResult<u32>;

    /// 获取日历分级阈值
    ///
    /// # 默认值
    /// - high=0.75, medium=0.5
    async fn get_tier_thresholds(&self) -> ConfigResult<TierThresholds>;

    /// 获取推荐窗口月数
    ///
    /// # 默认值
    /// - 3
    async fn get_suggestion_window_months(&self) -> ConfigResult<u32>;

    /// 加载完整排期配置
    ///
    /// 组合后的配置校验失败时整体回退为默认值
    async fn load_scheduling_config(&self) -> ConfigResult<SchedulingConfig> {
        let config = SchedulingConfig {
            rehearsal_filter: self.get_rehearsal_filter().await?,
            min_required: self.get_min_required_members().await?,
            tier_thresholds: self.get_tier_thresholds().await?,
            suggestion_window_months: self.get_suggestion_window_months().await?,
        };

        if let Err(reason) = config.validate() {
            tracing::warn!(reason = %reason, "排期配置不一致,使用默认配置");
            return Ok(SchedulingConfig::default());
        }

        Ok(config)
    }
}
