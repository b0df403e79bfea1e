// ==========================================
// 团队排练排期系统 - 配置层
// ==========================================
// 职责: 排期配置管理 (排练日、最低人数、分级阈值)
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod scheduling_config;
pub mod scheduling_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use scheduling_config::SchedulingConfig;
pub use scheduling_config_trait::{ConfigResult, SchedulingConfigReader};
