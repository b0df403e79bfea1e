// ==========================================
// 团队排练排期系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("日期区间非法: start={start} 晚于 end={end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
