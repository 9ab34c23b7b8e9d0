// ==========================================
// 仓储库位分配系统 - 上架会话状态机
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 6. 上架会话状态机
// 职责: 用显式状态机承载上架流程,取代散落的全局选中态
// 红线: 非法转换必须报错并指明 from/to; "当前库位"是显式字段
// ==========================================

use crate::domain::types::PlacementPhase;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// SessionError - 会话状态机错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("无效的阶段转换: from={from} to={to}")]
    InvalidTransition {
        from: PlacementPhase,
        to: PlacementPhase,
    },

    #[error("选定库位不在候选列表内: location_id={location_id}")]
    ChoiceNotSuggested { location_id: String },
}

// ==========================================
// PlacementSession - 上架会话
// ==========================================
// 流程: Idle -> ItemSelected -> LocationSuggested -> LocationChosen -> Confirmed
// reset 可从任意阶段回到 Idle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementSession {
    phase: PlacementPhase,
    item_id: Option<String>,
    current_location_id: Option<String>, // 移库来源库位 (新上架为 None)
    suggested_location_ids: Vec<String>,
    chosen_location_id: Option<String>,
}

impl PlacementSession {
    /// 创建空闲会话
    pub fn new() -> Self {
        Self {
            phase: PlacementPhase::Idle,
            item_id: None,
            current_location_id: None,
            suggested_location_ids: Vec::new(),
            chosen_location_id: None,
        }
    }

    /// 当前阶段
    pub fn phase(&self) -> PlacementPhase {
        self.phase
    }

    /// 选定物料 (移库时同时声明来源库位)
    pub fn select_item(
        &mut self,
        item_id: String,
        current_location_id: Option<String>,
    ) -> Result<(), SessionError> {
        self.ensure_phase(PlacementPhase::Idle, PlacementPhase::ItemSelected)?;
        self.item_id = Some(item_id);
        self.current_location_id = current_location_id;
        self.phase = PlacementPhase::ItemSelected;
        Ok(())
    }

    /// 记录建议引擎返回的候选库位 (空列表也是合法结果)
    pub fn receive_suggestions(
        &mut self,
        location_ids: Vec<String>,
    ) -> Result<(), SessionError> {
        self.ensure_phase(PlacementPhase::ItemSelected, PlacementPhase::LocationSuggested)?;
        self.suggested_location_ids = location_ids;
        self.phase = PlacementPhase::LocationSuggested;
        Ok(())
    }

    /// 选定目标库位 (必须出自候选列表)
    pub fn choose_location(&mut self, location_id: String) -> Result<(), SessionError> {
        self.ensure_phase(PlacementPhase::LocationSuggested, PlacementPhase::LocationChosen)?;
        if !self.suggested_location_ids.contains(&location_id) {
            return Err(SessionError::ChoiceNotSuggested { location_id });
        }
        self.chosen_location_id = Some(location_id);
        self.phase = PlacementPhase::LocationChosen;
        Ok(())
    }

    /// 确认提交 (调用方在此之后调用 PlacementApi::apply_placement)
    pub fn confirm(&mut self) -> Result<(), SessionError> {
        self.ensure_phase(PlacementPhase::LocationChosen, PlacementPhase::Confirmed)?;
        self.phase = PlacementPhase::Confirmed;
        Ok(())
    }

    /// 从任意阶段回到空闲 (取消流程或提交后复位)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// 会话内选定的物料
    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    /// 移库来源库位
    pub fn current_location_id(&self) -> Option<&str> {
        self.current_location_id.as_deref()
    }

    /// 选定的目标库位
    pub fn chosen_location_id(&self) -> Option<&str> {
        self.chosen_location_id.as_deref()
    }

    fn ensure_phase(
        &self,
        expected: PlacementPhase,
        to: PlacementPhase,
    ) -> Result<(), SessionError> {
        if self.phase != expected {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        Ok(())
    }
}

impl Default for PlacementSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_flow() {
        let mut session = PlacementSession::new();
        session.select_item("ITEM-1".to_string(), None).unwrap();
        session
            .receive_suggestions(vec!["L1".to_string(), "L2".to_string()])
            .unwrap();
        session.choose_location("L2".to_string()).unwrap();
        session.confirm().unwrap();
        assert_eq!(session.phase(), PlacementPhase::Confirmed);
        assert_eq!(session.chosen_location_id(), Some("L2"));
    }

    #[test]
    fn test_invalid_transition() {
        let mut session = PlacementSession::new();
        let err = session.confirm().unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                from: PlacementPhase::Idle,
                to: PlacementPhase::Confirmed,
            }
        );
    }

    #[test]
    fn test_choice_must_come_from_suggestions() {
        let mut session = PlacementSession::new();
        session.select_item("ITEM-1".to_string(), Some("L9".to_string())).unwrap();
        session.receive_suggestions(vec!["L1".to_string()]).unwrap();
        let err = session.choose_location("L7".to_string()).unwrap_err();
        assert!(matches!(err, SessionError::ChoiceNotSuggested { .. }));
    }

    #[test]
    fn test_reset_from_any_phase() {
        let mut session = PlacementSession::new();
        session.select_item("ITEM-1".to_string(), None).unwrap();
        session.reset();
        assert_eq!(session.phase(), PlacementPhase::Idle);
        assert_eq!(session.item_id(), None);
    }
}
