// ==========================================
// 团队排练排期系统 - 核心库
// ==========================================
// 职责: 成员可用性汇总、排练候选日排序、日历分级
// 技术栈: Rust + SQLite
// 分层: domain → engine → repository / config / importer → api → app
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 纯计算
pub mod engine;

// 导入层 - CSV
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/表结构）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AvailabilityIndex, AvailabilityStatus, AvailabilityUpdate, DateRange, DayAvailability,
    Member, MemberStatus, Period, Tier, WeekdayFilter,
};

// 引擎
pub use engine::{
    AvailabilityAggregator, CandidateRanker, DayAvailabilitySummary, DayClassifier,
    DragSelection, EngineError, RankedCandidate, TierThresholds,
};

// API
pub use api::{ApiError, AvailabilityApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "团队排练排期系统";
