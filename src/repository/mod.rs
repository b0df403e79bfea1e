// ==========================================
// 团队排练排期系统 - 数据仓储层
// ==========================================
// 职责: 名册与可用性的持久化 (SQLite) 与内存实现
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod availability_repo;
pub mod error;
pub mod member_repo;
pub mod memory_store;
pub mod provider;

// 重导出
pub use availability_repo::AvailabilityRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use member_repo::MemberRepository;
pub use memory_store::{InMemoryStore, TeamSnapshot};
pub use provider::{AvailabilityStore, RosterProvider};
