// ==========================================
// 团队排练排期系统 - 领域模型层
// ==========================================
// 职责: 定义成员、可用性、日期区间等领域类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod availability;
pub mod calendar;
pub mod member;
pub mod types;

// 重导出核心类型
pub use availability::{AvailabilityIndex, AvailabilityUpdate, DayAvailability};
pub use calendar::{DateRange, WeekdayFilter};
pub use member::Member;
pub use types::{AvailabilityStatus, MemberStatus, Period, Tier};
