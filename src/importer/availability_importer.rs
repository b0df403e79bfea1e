// ==========================================
// 团队排练排期系统 - 名册 / 可用性 CSV 导入
// ==========================================
// 名册列:   id, name, status
// 可用性列: member_id, date, morning, evening
// 四列均为必需; 状态大小写不敏感; 空白单元格视为 unknown
// 同一 (成员, 日期) 重复出现时后行覆盖前行
// ==========================================

use crate::domain::availability::{AvailabilityIndex, DayAvailability};
use crate::domain::member::Member;
use crate::domain::types::{AvailabilityStatus, MemberStatus};
use crate::importer::csv_parser::{CsvParser, RawRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::member_repo::MemberRepository;
use crate::repository::provider::AvailabilityStore;
use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;

const ROSTER_COLUMNS: &[&str] = &["id", "name", "status"];
const AVAILABILITY_COLUMNS: &[&str] = &["member_id", "date", "morning", "evening"];

/// 导入结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub members: usize,
    pub entries: usize,
}

pub struct AvailabilityCsvImporter;

impl AvailabilityCsvImporter {
    // ===== 名册 =====

    pub fn parse_roster(path: &Path) -> ImportResult<Vec<Member>> {
        Self::map_roster(CsvParser::parse_file(path, ROSTER_COLUMNS)?)
    }

    pub fn parse_roster_reader<R: Read>(reader: R) -> ImportResult<Vec<Member>> {
        Self::map_roster(CsvParser::parse_reader(reader, ROSTER_COLUMNS)?)
    }

    fn map_roster(records: Vec<RawRecord>) -> ImportResult<Vec<Member>> {
        records
            .iter()
            .map(|record| {
                let id = record.field("id");
                if id.is_empty() {
                    return Err(ImportError::PrimaryKeyMissing {
                        row: record.row,
                        field: "id".to_string(),
                    });
                }

                let raw_status = record.field("status");
                let status = if raw_status.is_empty() {
                    MemberStatus::Active
                } else {
                    MemberStatus::parse(raw_status).ok_or_else(|| ImportError::InvalidStatus {
                        row: record.row,
                        field: "status".to_string(),
                        value: raw_status.to_string(),
                    })?
                };

                let name = match record.field("name") {
                    "" => id,
                    name => name,
                };

                Ok(Member::new(id, name, status))
            })
            .collect()
    }

    /// 导入名册 (按ID新增或更新,单事务)
    pub fn import_roster(path: &Path, repo: &MemberRepository) -> ImportResult<usize> {
        let members = Self::parse_roster(path)?;
        let count = repo.upsert_batch(&members)?;
        tracing::info!(path = %path.display(), count, "名册导入完成");
        Ok(count)
    }

    // ===== 可用性 =====

    pub fn parse_availability(path: &Path) -> ImportResult<AvailabilityIndex> {
        Self::map_availability(CsvParser::parse_file(path, AVAILABILITY_COLUMNS)?)
    }

    pub fn parse_availability_reader<R: Read>(reader: R) -> ImportResult<AvailabilityIndex> {
        Self::map_availability(CsvParser::parse_reader(reader, AVAILABILITY_COLUMNS)?)
    }

    fn map_availability(records: Vec<RawRecord>) -> ImportResult<AvailabilityIndex> {
        let mut index = AvailabilityIndex::new();

        for record in &records {
            let member_id = record.field("member_id");
            if member_id.is_empty() {
                return Err(ImportError::PrimaryKeyMissing {
                    row: record.row,
                    field: "member_id".to_string(),
                });
            }

            let raw_date = record.field("date");
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
                ImportError::DateFormatError {
                    row: record.row,
                    field: "date".to_string(),
                    value: raw_date.to_string(),
                }
            })?;

            let day = DayAvailability::new(
                Self::status_field(record, "morning")?,
                Self::status_field(record, "evening")?,
            );

            if index.contains(member_id, date) {
                tracing::warn!(row = record.row, member_id, date = %date, "重复记录,后行覆盖前行");
            }
            index.insert(member_id, date, day);
        }

        Ok(index)
    }

    fn status_field(record: &RawRecord, field: &str) -> ImportResult<AvailabilityStatus> {
        let raw = record.field(field);
        AvailabilityStatus::parse(raw).ok_or_else(|| ImportError::InvalidStatus {
            row: record.row,
            field: field.to_string(),
            value: raw.to_string(),
        })
    }

    /// 导入可用性到数据源
    ///
    /// 每条记录整日覆盖; 任一条写入失败则整个文件不落库
    pub fn import_availability(
        path: &Path,
        store: &dyn AvailabilityStore,
    ) -> ImportResult<ImportSummary> {
        let index = Self::parse_availability(path)?;
        let summary = Self::write_index(&index, store)?;
        tracing::info!(
            path = %path.display(),
            members = summary.members,
            entries = summary.entries,
            "可用性导入完成"
        );
        Ok(summary)
    }

    pub fn write_index(
        index: &AvailabilityIndex,
        store: &dyn AvailabilityStore,
    ) -> ImportResult<ImportSummary> {
        let entries = store.apply_index(index)?;
        Ok(ImportSummary {
            members: index.member_count(),
            entries,
        })
    }
}
