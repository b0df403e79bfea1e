// ==========================================
// 团队排练排期系统 - 成员数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::member::Member;
use crate::domain::types::MemberStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::provider::RosterProvider;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// MemberRepository - 成员仓储
// ==========================================

/// 成员仓储
/// 职责: 管理 member 表的 CRUD 操作
pub struct MemberRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MemberRepository {
    /// 创建新的成员仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<(String, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    }

    fn to_member((id, name, status): (String, String, String)) -> RepositoryResult<Member> {
        let status = MemberStatus::parse(&status).ok_or_else(|| RepositoryError::FieldValueError {
            field: "member.status".to_string(),
            message: format!("无法识别的成员状态: {} (member_id={})", status, id),
        })?;
        Ok(Member { id, name, status })
    }

    /// 新增成员
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): ID 已存在
    pub fn insert(&self, member: &Member) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO member (id, name, status) VALUES (?1, ?2, ?3)",
            params![member.id, member.name, member.status.to_db_str()],
        )?;
        Ok(())
    }

    const UPSERT_SQL: &'static str = r#"
        INSERT INTO member (id, name, status) VALUES (?1, ?2, ?3)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            status = excluded.status,
            updated_at = datetime('now')
    "#;

    /// 新增或更新成员
    pub fn upsert(&self, member: &Member) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            Self::UPSERT_SQL,
            params![member.id, member.name, member.status.to_db_str()],
        )?;
        Ok(())
    }

    /// 批量新增或更新 (单事务,任一条失败则整体回滚)
    ///
    /// # 返回
    /// 写入条数
    pub fn upsert_batch(&self, members: &[Member]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        {
            let mut stmt = tx.prepare(Self::UPSERT_SQL)?;
            for member in members {
                stmt.execute(params![member.id, member.name, member.status.to_db_str()])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(members.len())
    }

    /// 按ID查询
    pub fn find_by_id(&self, member_id: &str) -> RepositoryResult<Option<Member>> {
        let conn = self.get_conn()?;
        let raw = conn
            .query_row(
                "SELECT id, name, status FROM member WHERE id = ?1",
                params![member_id],
                Self::map_row,
            )
            .optional()?;

        raw.map(Self::to_member).transpose()
    }

    /// 全部成员 (按ID升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Member>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name, status FROM member ORDER BY id")?;
        let rows = stmt.query_map([], Self::map_row)?;

        let mut members = Vec::new();
        for row in rows {
            members.push(Self::to_member(row?)?);
        }
        Ok(members)
    }

    /// 在团成员
    pub fn list_active(&self) -> RepositoryResult<Vec<Member>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(Member::is_active)
            .collect())
    }

    /// 删除成员 (级联删除其可用性记录)
    ///
    /// # 返回
    /// - Err(NotFound): 成员不存在
    pub fn delete(&self, member_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM member WHERE id = ?1", params![member_id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Member".to_string(),
                id: member_id.to_string(),
            });
        }
        Ok(())
    }
}

impl RosterProvider for MemberRepository {
    fn list_members(&self) -> RepositoryResult<Vec<Member>> {
        self.list_all()
    }

    fn find_member(&self, member_id: &str) -> RepositoryResult<Option<Member>> {
        self.find_by_id(member_id)
    }
}
