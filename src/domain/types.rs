// ==========================================
// 仓储库位分配系统 - 领域类型定义
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 0. 类型体系
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 核对状态 (Reconcile Status)
// ==========================================
// 红线: 状态永远由 声明值/实际值 推导,禁止独立存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconcileStatus {
    Lack,   // 实际 < 声明 (缺少)
    Excess, // 实际 > 声明 (多余)
    Match,  // 实际 == 声明 (相符)
}

impl fmt::Display for ReconcileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileStatus::Lack => write!(f, "LACK"),
            ReconcileStatus::Excess => write!(f, "EXCESS"),
            ReconcileStatus::Match => write!(f, "MATCH"),
        }
    }
}

// ==========================================
// 比对口径 (Comparison Mode)
// ==========================================
// 依据: WMS_Core_Specs 4. 核对引擎
// 每种单据固定一种口径,消除"有时比数量、有时比计量"的歧义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonMode {
    Quantity,    // 按数量比对
    Measurement, // 按计量值比对 (如重量)
}

impl ComparisonMode {
    /// 从字符串解析口径
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "MEASUREMENT" => ComparisonMode::Measurement,
            _ => ComparisonMode::Quantity, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ComparisonMode::Quantity => "QUANTITY",
            ComparisonMode::Measurement => "MEASUREMENT",
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 单据类型 (Document Kind)
// ==========================================
// 入库单 / 出库单 / 盘点单 共用同一套核对逻辑
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    Import,     // 入库单
    Export,     // 出库单
    StockCheck, // 盘点单
}

impl DocumentKind {
    /// 从字符串解析单据类型
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "EXPORT" => DocumentKind::Export,
            "STOCK_CHECK" => DocumentKind::StockCheck,
            _ => DocumentKind::Import, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DocumentKind::Import => "IMPORT",
            DocumentKind::Export => "EXPORT",
            DocumentKind::StockCheck => "STOCK_CHECK",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 单据状态 (Document Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    InProgress, // 进行中 (可记录实际值)
    Completed,  // 已完成 (差异均已确认)
}

impl DocumentStatus {
    /// 从字符串解析单据状态
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "COMPLETED" => DocumentStatus::Completed,
            _ => DocumentStatus::InProgress, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DocumentStatus::InProgress => "IN_PROGRESS",
            DocumentStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 上架流程阶段 (Placement Phase)
// ==========================================
// 依据: WMS_Core_Specs 6. 上架会话状态机
// 红线: 阶段只能沿 Idle -> ItemSelected -> LocationSuggested
//       -> LocationChosen -> Confirmed 推进, reset 可从任意阶段回到 Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementPhase {
    Idle,              // 空闲
    ItemSelected,      // 已选定物料
    LocationSuggested, // 已生成候选库位
    LocationChosen,    // 已选定目标库位
    Confirmed,         // 已确认提交
}

impl fmt::Display for PlacementPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementPhase::Idle => write!(f, "IDLE"),
            PlacementPhase::ItemSelected => write!(f, "ITEM_SELECTED"),
            PlacementPhase::LocationSuggested => write!(f, "LOCATION_SUGGESTED"),
            PlacementPhase::LocationChosen => write!(f, "LOCATION_CHOSEN"),
            PlacementPhase::Confirmed => write!(f, "CONFIRMED"),
        }
    }
}
