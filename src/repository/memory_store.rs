// ==========================================
// 团队排练排期系统 - 内存数据源
// ==========================================
// 用途: 测试与 JSON 快照驱动的计算
// 同时实现 RosterProvider 与 AvailabilityStore; 写入经 RwLock 串行化
// ==========================================

use crate::domain::availability::{AvailabilityIndex, AvailabilityUpdate, DayAvailability};
use crate::domain::calendar::DateRange;
use crate::domain::member::Member;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::provider::{AvailabilityStore, RosterProvider};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// 名册 + 可用性的序列化快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub members: Vec<Member>,
    #[serde(default)]
    pub availability: AvailabilityIndex,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    members: RwLock<Vec<Member>>,
    index: RwLock<AvailabilityIndex>,
}

impl InMemoryStore {
    pub fn new(members: Vec<Member>, index: AvailabilityIndex) -> Self {
        Self {
            members: RwLock::new(members),
            index: RwLock::new(index),
        }
    }

    pub fn from_snapshot(snapshot: TeamSnapshot) -> Self {
        Self::new(snapshot.members, snapshot.availability)
    }

    /// 导出当前数据
    pub fn snapshot(&self) -> RepositoryResult<TeamSnapshot> {
        let members = self.members.read().map_err(lock_error)?.clone();
        let availability = self.index.read().map_err(lock_error)?.clone();
        Ok(TeamSnapshot {
            members,
            availability,
        })
    }

    pub fn add_member(&self, member: Member) -> RepositoryResult<()> {
        let mut members = self.members.write().map_err(lock_error)?;
        if members.iter().any(|m| m.id == member.id) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "member.id={}",
                member.id
            )));
        }
        members.push(member);
        Ok(())
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> RepositoryError {
    RepositoryError::LockError(e.to_string())
}

impl RosterProvider for InMemoryStore {
    fn list_members(&self) -> RepositoryResult<Vec<Member>> {
        Ok(self.members.read().map_err(lock_error)?.clone())
    }
}

impl AvailabilityStore for InMemoryStore {
    fn load_index(
        &self,
        member_ids: &[String],
        range: &DateRange,
    ) -> RepositoryResult<AvailabilityIndex> {
        let source = self.index.read().map_err(lock_error)?;
        let mut index = AvailabilityIndex::new();

        for member_id in member_ids {
            for (date, day) in source.member_days(member_id) {
                if range.contains(date) {
                    index.insert(member_id.clone(), date, day);
                }
            }
        }
        Ok(index)
    }

    fn apply_update(
        &self,
        member_id: &str,
        date: NaiveDate,
        update: AvailabilityUpdate,
    ) -> RepositoryResult<DayAvailability> {
        let mut index = self.index.write().map_err(lock_error)?;
        Ok(index.apply(member_id, date, update))
    }

    fn apply_range_update(
        &self,
        member_id: &str,
        range: &DateRange,
        update: AvailabilityUpdate,
    ) -> RepositoryResult<usize> {
        let mut index = self.index.write().map_err(lock_error)?;
        Ok(index.apply_range(member_id, range.days(), update))
    }

    fn apply_index(&self, batch: &AvailabilityIndex) -> RepositoryResult<usize> {
        let mut index = self.index.write().map_err(lock_error)?;
        for member_id in batch.member_ids() {
            for (date, day) in batch.member_days(member_id) {
                index.insert(member_id, date, day);
            }
        }
        Ok(batch.entry_count())
    }
}
