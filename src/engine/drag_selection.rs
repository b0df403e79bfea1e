// ==========================================
// 团队排练排期系统 - 日历拖选状态机
// ==========================================
// 状态: Idle → Dragging { anchor, current } → Committed(range)
// 提交后的区间逐日交给 AvailabilityIndex::apply_range / 仓储的区间更新
// 反向拖动 (current 早于 anchor) 提交时自动归一为 start <= end
// ==========================================

use crate::domain::calendar::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum DragSelection {
    #[default]
    Idle,
    Dragging {
        anchor: NaiveDate,
        current: NaiveDate,
    },
    Committed {
        range: DateRange,
    },
}

impl DragSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按下鼠标: 任意状态下都重新开始
    pub fn begin(&mut self, date: NaiveDate) {
        *self = DragSelection::Dragging {
            anchor: date,
            current: date,
        };
    }

    /// 拖动经过某日; 非拖动状态忽略
    pub fn extend(&mut self, date: NaiveDate) {
        if let DragSelection::Dragging { current, .. } = self {
            *current = date;
        }
    }

    /// 松开鼠标: 拖动中 → 已提交,返回归一后的区间
    pub fn commit(&mut self) -> Option<DateRange> {
        // 只有拖动中才有预览区间
        let range = self.preview()?;
        *self = DragSelection::Committed { range };
        tracing::debug!(range = %range, "拖选提交");
        Some(range)
    }

    pub fn cancel(&mut self) {
        *self = DragSelection::Idle;
    }

    /// 拖动中的预览区间
    pub fn preview(&self) -> Option<DateRange> {
        match *self {
            DragSelection::Dragging { anchor, current } => Some(DateRange::new(
                anchor.min(current),
                anchor.max(current),
            )),
            _ => None,
        }
    }

    pub fn preview_contains(&self, date: NaiveDate) -> bool {
        self.preview().map(|r| r.contains(date)).unwrap_or(false)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragSelection::Dragging { .. })
    }

    pub fn committed_range(&self) -> Option<DateRange> {
        match *self {
            DragSelection::Committed { range } => Some(range),
            _ => None,
        }
    }
}
