// ==========================================
// 仓储库位分配系统 - 库存单元数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑; location_id 的写入走 PlacementRepository
// ==========================================

use crate::domain::unit::InventoryUnit;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// UnitRepository - 库存单元仓储
// ==========================================

/// 库存单元仓储
/// 职责: 管理 inventory_unit 表的读与登记
pub struct UnitRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UnitRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 入库登记新单元 (尚未上架, location_id 为空)
    pub fn insert(&self, unit: &InventoryUnit) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO inventory_unit (unit_id, item_id, location_id, created_at)
               VALUES (?, ?, ?, ?)"#,
            params![
                &unit.unit_id,
                &unit.item_id,
                &unit.location_id,
                unit.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        )?;
        Ok(())
    }

    /// 按 id 查询单元
    pub fn find_by_id(&self, unit_id: &str) -> RepositoryResult<Option<InventoryUnit>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT unit_id, item_id, location_id, created_at
               FROM inventory_unit WHERE unit_id = ?1"#,
        )?;
        let unit = stmt.query_row(params![unit_id], Self::map_row).optional()?;
        Ok(unit)
    }

    /// 按 id 批量查询 (上架批次校验用)
    pub fn find_by_ids(&self, unit_ids: &[String]) -> RepositoryResult<Vec<InventoryUnit>> {
        let mut units = Vec::with_capacity(unit_ids.len());
        for unit_id in unit_ids {
            if let Some(unit) = self.find_by_id(unit_id)? {
                units.push(unit);
            }
        }
        Ok(units)
    }

    /// 查询某物料的全部单元
    pub fn find_by_item(&self, item_id: &str) -> RepositoryResult<Vec<InventoryUnit>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT unit_id, item_id, location_id, created_at
               FROM inventory_unit WHERE item_id = ?1 ORDER BY unit_id"#,
        )?;
        let units = stmt
            .query_map(params![item_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(units)
    }

    /// 查询某库位上的全部单元
    pub fn find_by_location(&self, location_id: &str) -> RepositoryResult<Vec<InventoryUnit>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT unit_id, item_id, location_id, created_at
               FROM inventory_unit WHERE location_id = ?1 ORDER BY unit_id"#,
        )?;
        let units = stmt
            .query_map(params![location_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(units)
    }

    /// 行映射
    fn map_row(row: &Row<'_>) -> rusqlite::Result<InventoryUnit> {
        let created_at_str: String = row.get(3)?;
        Ok(InventoryUnit {
            unit_id: row.get(0)?,
            item_id: row.get(1)?,
            location_id: row.get(2)?,
            created_at: NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
                .unwrap_or_default(),
        })
    }
}
