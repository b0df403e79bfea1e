// ==========================================
// 团队排练排期系统 - 成员可用性数据仓储
// ==========================================
// 表: member_availability (member_id, avail_date) 唯一
//     availability_log 记录每次时段写入
// 红线: 读-合并-写在同一事务内完成,重叠写入由 SQLite 串行化
// ==========================================

use crate::domain::availability::{AvailabilityIndex, AvailabilityUpdate, DayAvailability};
use crate::domain::calendar::DateRange;
use crate::domain::types::{AvailabilityStatus, Period};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::provider::AvailabilityStore;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// AvailabilityRepository - 可用性仓储
// ==========================================
pub struct AvailabilityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AvailabilityRepository {
    /// 创建新的可用性仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn parse_date(raw: &str) -> RepositoryResult<NaiveDate> {
        NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| RepositoryError::FieldValueError {
            field: "member_availability.avail_date".to_string(),
            message: format!("{}: {}", raw, e),
        })
    }

    // 存量脏数据按 Unknown 处理,不中断查询
    fn parse_status(raw: &str) -> AvailabilityStatus {
        AvailabilityStatus::parse(raw).unwrap_or_else(|| {
            tracing::warn!(value = raw, "无法识别的可用性状态,按 unknown 处理");
            AvailabilityStatus::Unknown
        })
    }

    /// 查询单日记录
    ///
    /// # 返回
    /// - Ok(None): 无记录 (调用方视为 Unknown)
    pub fn find(&self, member_id: &str, date: NaiveDate) -> RepositoryResult<Option<DayAvailability>> {
        let conn = self.get_conn()?;
        Self::find_in(&conn, member_id, date)
    }

    fn find_in(
        conn: &Connection,
        member_id: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Option<DayAvailability>> {
        let raw = conn
            .query_row(
                "SELECT morning, evening FROM member_availability WHERE member_id = ?1 AND avail_date = ?2",
                params![member_id, date.format(DATE_FORMAT).to_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        Ok(raw.map(|(morning, evening)| {
            DayAvailability::new(Self::parse_status(&morning), Self::parse_status(&evening))
        }))
    }

    /// 事务内: 读取 → 合并 → 写回 → 记日志
    fn merge_in_tx(
        tx: &Transaction<'_>,
        member_id: &str,
        date: NaiveDate,
        update: AvailabilityUpdate,
    ) -> RepositoryResult<DayAvailability> {
        let merged = Self::find_in(tx, member_id, date)?
            .unwrap_or_default()
            .merge(update);
        Self::upsert_in_tx(tx, member_id, date, merged)?;
        Self::log_in_tx(tx, member_id, date, update)?;
        Ok(merged)
    }

    fn upsert_in_tx(
        tx: &Transaction<'_>,
        member_id: &str,
        date: NaiveDate,
        day: DayAvailability,
    ) -> RepositoryResult<()> {
        tx.execute(
            r#"
            INSERT INTO member_availability (member_id, avail_date, morning, evening)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(member_id, avail_date) DO UPDATE SET
                morning = excluded.morning,
                evening = excluded.evening,
                updated_at = datetime('now')
            "#,
            params![
                member_id,
                date.format(DATE_FORMAT).to_string(),
                day.morning.to_db_str(),
                day.evening.to_db_str()
            ],
        )?;
        Ok(())
    }

    fn log_in_tx(
        tx: &Transaction<'_>,
        member_id: &str,
        date: NaiveDate,
        update: AvailabilityUpdate,
    ) -> RepositoryResult<()> {
        tx.execute(
            r#"
            INSERT INTO availability_log (change_id, member_id, avail_date, period, status)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                Uuid::new_v4().to_string(),
                member_id,
                date.format(DATE_FORMAT).to_string(),
                update.period.to_db_str(),
                update.status.to_db_str()
            ],
        )?;
        Ok(())
    }

    /// 某成员的变更日志条数
    pub fn count_changes(&self, member_id: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM availability_log WHERE member_id = ?1",
            params![member_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl AvailabilityStore for AvailabilityRepository {
    fn load_index(
        &self,
        member_ids: &[String],
        range: &DateRange,
    ) -> RepositoryResult<AvailabilityIndex> {
        let mut index = AvailabilityIndex::new();
        if member_ids.is_empty() || !range.is_valid() {
            return Ok(index);
        }

        let wanted: HashSet<&str> = member_ids.iter().map(String::as_str).collect();
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT member_id, avail_date, morning, evening
            FROM member_availability
            WHERE avail_date BETWEEN ?1 AND ?2
            ORDER BY member_id, avail_date
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                range.start.format(DATE_FORMAT).to_string(),
                range.end.format(DATE_FORMAT).to_string()
            ],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )?;

        for row in rows {
            let (member_id, date, morning, evening) = row?;
            if !wanted.contains(member_id.as_str()) {
                continue;
            }
            let date = Self::parse_date(&date)?;
            index.insert(
                member_id,
                date,
                DayAvailability::new(Self::parse_status(&morning), Self::parse_status(&evening)),
            );
        }

        tracing::debug!(range = %range, entries = index.entry_count(), "加载可用性快照");
        Ok(index)
    }

    fn apply_update(
        &self,
        member_id: &str,
        date: NaiveDate,
        update: AvailabilityUpdate,
    ) -> RepositoryResult<DayAvailability> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let merged = Self::merge_in_tx(&tx, member_id, date, update)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(merged)
    }

    /// 区间更新在单个事务内完成,任一天失败则整体回滚
    fn apply_range_update(
        &self,
        member_id: &str,
        range: &DateRange,
        update: AvailabilityUpdate,
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut written = 0;
        for date in range.days() {
            Self::merge_in_tx(&tx, member_id, date, update)?;
            written += 1;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::info!(member_id, range = %range, written, "区间可用性已更新");
        Ok(written)
    }

    /// 整批写入在单个事务内完成,任一条失败则整体回滚
    fn apply_index(&self, index: &AvailabilityIndex) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut member_ids: Vec<&str> = index.member_ids().collect();
        member_ids.sort_unstable();

        let mut written = 0;
        for member_id in member_ids {
            for (date, day) in index.member_days(member_id) {
                Self::upsert_in_tx(&tx, member_id, date, day)?;
                for period in [Period::Morning, Period::Evening] {
                    let update = AvailabilityUpdate::new(period, day.status(period));
                    Self::log_in_tx(&tx, member_id, date, update)?;
                }
                written += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::info!(members = index.member_count(), written, "批量可用性已写入");
        Ok(written)
    }
}
