// ==========================================
// 团队排练排期系统 - 成员领域模型
// ==========================================
// 成员由外部名册维护,计算时视为只读快照
// ==========================================

use crate::domain::types::MemberStatus;
use serde::{Deserialize, Serialize};

/// 团队成员
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    /// 成员ID (不透明字符串)
    pub id: String,

    /// 显示名称
    pub name: String,

    /// 成员状态
    pub status: MemberStatus,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: MemberStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
        }
    }

    /// 是否计入比率分母
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active() {
        assert!(Member::new("m1", "Aoi", MemberStatus::Active).is_active());
        assert!(!Member::new("m2", "Ren", MemberStatus::Inactive).is_active());
        assert!(!Member::new("m3", "Sora", MemberStatus::Pending).is_active());
    }
}
