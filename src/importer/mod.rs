// ==========================================
// 团队排练排期系统 - 导入层
// ==========================================
// 职责: 名册与可用性 CSV 导入,写入数据源
// ==========================================

pub mod availability_importer;
pub mod csv_parser;
pub mod error;

pub use availability_importer::{AvailabilityCsvImporter, ImportSummary};
pub use csv_parser::{CsvParser, RawRecord};
pub use error::{ImportError, ImportResult};
