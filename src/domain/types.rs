// ==========================================
// 团队排练排期系统 - 领域类型定义
// ==========================================
// 职责: 成员状态、可用性状态、时段、日历分级
// 红线: 缺失记录即 Unknown,不是错误
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 成员状态 (Member Status)
// ==========================================
// 只有 Active 成员计入比率分母
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,   // 在团
    Inactive, // 休团
    Pending,  // 待确认
}

impl MemberStatus {
    /// 从字符串解析 (大小写不敏感)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(MemberStatus::Active),
            "inactive" => Some(MemberStatus::Inactive),
            "pending" => Some(MemberStatus::Pending),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
            MemberStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 可用性状态 (Availability Status)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,   // 可以
    Maybe,       // 待定
    Unavailable, // 不行
    #[default]
    Unknown,     // 未填写
}

impl AvailabilityStatus {
    /// 从字符串解析 (大小写不敏感)
    ///
    /// 空字符串视为 Unknown; 无法识别的值返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" => Some(AvailabilityStatus::Available),
            "maybe" => Some(AvailabilityStatus::Maybe),
            "unavailable" => Some(AvailabilityStatus::Unavailable),
            "unknown" | "" => Some(AvailabilityStatus::Unknown),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Maybe => "maybe",
            AvailabilityStatus::Unavailable => "unavailable",
            AvailabilityStatus::Unknown => "unknown",
        }
    }

    /// 当前语言下的显示名称
    pub fn label(&self) -> String {
        crate::i18n::t(&format!("status.{}", self.to_db_str()))
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 时段 (Period)
// ==========================================
// 排练固定在上午,推荐只看 Morning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Morning,
    Evening,
}

impl Period {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "morning" | "am" => Some(Period::Morning),
            "evening" | "pm" => Some(Period::Evening),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            Period::Morning => "morning",
            Period::Evening => "evening",
        }
    }

    pub fn label(&self) -> String {
        crate::i18n::t(&format!("period.{}", self.to_db_str()))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 日历分级 (Tier)
// ==========================================
// Disabled: 非候选日,渲染为不可交互
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Disabled,
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Tier::Disabled => "disabled",
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
        }
    }

    /// 当前语言下的显示名称
    pub fn label(&self) -> String {
        crate::i18n::t(&format!("tier.{}", self.to_db_str()))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
