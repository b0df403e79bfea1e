// ==========================================
// 团队排练排期系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::scheduling_config::DEFAULT_SUGGESTION_WINDOW_MONTHS;
use crate::config::scheduling_config_trait::{ConfigResult, SchedulingConfigReader};
use crate::db::open_sqlite_connection;
use crate::domain::calendar::WeekdayFilter;
use crate::engine::candidate_ranker::DEFAULT_MIN_REQUIRED;
use crate::engine::day_classifier::TierThresholds;
use async_trait::async_trait;
use chrono::Weekday;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        Ok(self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?)
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.lock()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err("配置键不能为空".into());
        }

        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;

        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 会覆盖同名 global 配置; `__meta_` 开头的键不回写
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            if key.starts_with("__meta_") {
                continue;
            }
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    // ===== 解析工具 =====

    /// 解析星期配置
    ///
    /// 格式: "SUN" / "SAT,SUN" / "ANY"
    fn parse_weekday_filter(raw: &str) -> Option<WeekdayFilter> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("any") {
            return Some(WeekdayFilter::AnyDay);
        }

        let days: Vec<Weekday> = raw
            .split(',')
            .map(|s| s.trim().parse::<Weekday>())
            .collect::<Result<_, _>>()
            .ok()?;

        match days.as_slice() {
            [] => None,
            [single] => Some(WeekdayFilter::Only(*single)),
            _ => Some(WeekdayFilter::AnyOf(days)),
        }
    }

    fn parse_ratio(key: &str, raw: &str, default: f64) -> f64 {
        match raw.trim().parse::<f64>() {
            Ok(v) if (0.0..=1.0).contains(&v) => v,
            _ => {
                tracing::warn!(key, value = raw, default, "比率配置非法,使用默认值");
                default
            }
        }
    }

    fn parse_positive_u32(key: &str, raw: &str, default: u32) -> u32 {
        match raw.trim().parse::<u32>() {
            Ok(v) if v > 0 => v,
            _ => {
                tracing::warn!(key, value = raw, default, "整数配置非法,使用默认值");
                default
            }
        }
    }
}

// ==========================================
// SchedulingConfigReader 实现
// ==========================================
#[async_trait]
impl SchedulingConfigReader for ConfigManager {
    async fn get_rehearsal_filter(&self) -> ConfigResult<WeekdayFilter> {
        let value = self.get_config_or_default(config_keys::REHEARSAL_WEEKDAY, "SUN")?;
        Ok(Self::parse_weekday_filter(&value).unwrap_or_else(|| {
            tracing::warn!(value = %value, "排练日配置非法,使用周日");
            WeekdayFilter::rehearsal_default()
        }))
    }

    async fn get_min_required_members(&self) -> ConfigResult<u32> {
        let value = self.get_config_or_default(
            config_keys::MIN_REQUIRED_MEMBERS,
            &DEFAULT_MIN_REQUIRED.to_string(),
        )?;
        Ok(Self::parse_positive_u32(
            config_keys::MIN_REQUIRED_MEMBERS,
            &value,
            DEFAULT_MIN_REQUIRED,
        ))
    }

    async fn get_tier_thresholds(&self) -> ConfigResult<TierThresholds> {
        let defaults = TierThresholds::default();
        let high = self.get_config_or_default(config_keys::TIER_HIGH_RATIO, "0.75")?;
        let medium = self.get_config_or_default(config_keys::TIER_MEDIUM_RATIO, "0.5")?;

        Ok(TierThresholds {
            high: Self::parse_ratio(config_keys::TIER_HIGH_RATIO, &high, defaults.high),
            medium: Self::parse_ratio(config_keys::TIER_MEDIUM_RATIO, &medium, defaults.medium),
        })
    }

    async fn get_suggestion_window_months(&self) -> ConfigResult<u32> {
        let value = self.get_config_or_default(
            config_keys::SUGGESTION_WINDOW_MONTHS,
            &DEFAULT_SUGGESTION_WINDOW_MONTHS.to_string(),
        )?;
        Ok(Self::parse_positive_u32(
            config_keys::SUGGESTION_WINDOW_MONTHS,
            &value,
            DEFAULT_SUGGESTION_WINDOW_MONTHS,
        ))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 排练日
    pub const REHEARSAL_WEEKDAY: &str = "rehearsal_weekday";
    pub const MIN_REQUIRED_MEMBERS: &str = "min_required_members";

    // 日历分级
    pub const TIER_HIGH_RATIO: &str = "tier_high_ratio";
    pub const TIER_MEDIUM_RATIO: &str = "tier_medium_ratio";

    // 推荐窗口
    pub const SUGGESTION_WINDOW_MONTHS: &str = "suggestion_window_months";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weekday_filter() {
        assert_eq!(
            ConfigManager::parse_weekday_filter("SUN"),
            Some(WeekdayFilter::Only(Weekday::Sun))
        );
        assert_eq!(
            ConfigManager::parse_weekday_filter("sat, sun"),
            Some(WeekdayFilter::AnyOf(vec![Weekday::Sat, Weekday::Sun]))
        );
        assert_eq!(
            ConfigManager::parse_weekday_filter("any"),
            Some(WeekdayFilter::AnyDay)
        );
        assert_eq!(ConfigManager::parse_weekday_filter("funday"), None);
    }

    #[test]
    fn test_parse_ratio_falls_back() {
        assert_eq!(ConfigManager::parse_ratio("k", "0.8", 0.75), 0.8);
        assert_eq!(ConfigManager::parse_ratio("k", "1.5", 0.75), 0.75);
        assert_eq!(ConfigManager::parse_ratio("k", "abc", 0.75), 0.75);
    }

    #[test]
    fn test_parse_positive_u32_falls_back() {
        assert_eq!(ConfigManager::parse_positive_u32("k", "6", 4), 6);
        assert_eq!(ConfigManager::parse_positive_u32("k", "0", 4), 4);
        assert_eq!(ConfigManager::parse_positive_u32("k", "-1", 4), 4);
    }
}
