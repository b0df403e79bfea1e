// ==========================================
// 团队排练排期系统 - 引擎层
// ==========================================
// 职责: 可用性汇总、候选日排序、日历分级、拖选状态机
// 红线: 引擎不做 I/O, 全部为纯计算,可并发调用
// ==========================================

pub mod aggregator;
pub mod candidate_ranker;
pub mod day_classifier;
pub mod drag_selection;
pub mod error;

// 重导出核心引擎
pub use aggregator::{AvailabilityAggregator, DayAvailabilitySummary};
pub use candidate_ranker::{CandidateRanker, RankedCandidate, DEFAULT_MIN_REQUIRED};
pub use day_classifier::{DayClassifier, TierThresholds};
pub use drag_selection::DragSelection;
pub use error::{EngineError, EngineResult};
