// ==========================================
// 团队排练排期系统 - 名册 / 可用性数据源接口
// ==========================================
// 用途: 引擎只消费快照; 数据源负责加载与串行化写入
// 实现者: MemberRepository / AvailabilityRepository (SQLite), InMemoryStore
// ==========================================

use crate::domain::availability::{AvailabilityIndex, AvailabilityUpdate, DayAvailability};
use crate::domain::calendar::DateRange;
use crate::domain::member::Member;
use crate::repository::error::RepositoryResult;
use chrono::NaiveDate;

/// 名册数据源
pub trait RosterProvider: Send + Sync {
    /// 当前全部成员 (含非在团成员)
    fn list_members(&self) -> RepositoryResult<Vec<Member>>;

    /// 按ID查询成员
    fn find_member(&self, member_id: &str) -> RepositoryResult<Option<Member>> {
        Ok(self
            .list_members()?
            .into_iter()
            .find(|m| m.id == member_id))
    }
}

/// 可用性数据源
pub trait AvailabilityStore: Send + Sync {
    /// 加载指定成员在区间内的可用性快照
    ///
    /// 无记录的 (成员, 日期) 不出现在索引中,由索引查询时默认为 Unknown
    fn load_index(
        &self,
        member_ids: &[String],
        range: &DateRange,
    ) -> RepositoryResult<AvailabilityIndex>;

    /// 对单日应用一次时段更新,返回合并后的记录
    fn apply_update(
        &self,
        member_id: &str,
        date: NaiveDate,
        update: AvailabilityUpdate,
    ) -> RepositoryResult<DayAvailability>;

    /// 对区间内每一天应用同一更新
    ///
    /// # 返回
    /// 写入的天数
    fn apply_range_update(
        &self,
        member_id: &str,
        range: &DateRange,
        update: AvailabilityUpdate,
    ) -> RepositoryResult<usize> {
        let mut written = 0;
        for date in range.days() {
            self.apply_update(member_id, date, update)?;
            written += 1;
        }
        Ok(written)
    }

    /// 整批写入索引中的记录 (两个时段整体覆盖)
    ///
    /// 全部写入或全部不写
    ///
    /// # 返回
    /// 写入的 (成员, 日期) 条数
    fn apply_index(&self, index: &AvailabilityIndex) -> RepositoryResult<usize>;
}
