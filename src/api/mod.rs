// ==========================================
// 团队排练排期系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行调用
// ==========================================

pub mod availability_api;
pub mod error;

// 重导出核心类型
pub use availability_api::{AvailabilityApi, CalendarCell, RehearsalSuggestionResponse};
pub use error::{ApiError, ApiResult};
