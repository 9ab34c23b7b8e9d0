// ==========================================
// 仓储库位分配系统 - 物料主数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::item::ItemMaster;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ItemRepository - 物料主数据仓储
// ==========================================

/// 物料主数据仓储
/// 职责: 管理 item_master 表; 提供空库位首次分配所需的默认容量
pub struct ItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ItemRepository {
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

    /// 登记物料
    pub fn insert(&self, item: &ItemMaster) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO item_master (item_id, item_name, default_slot_capacity)
               VALUES (?, ?, ?)"#,
            params![&item.item_id, &item.item_name, item.default_slot_capacity],
        )?;
        Ok(())
    }

    /// 按 id 查询物料
    pub fn find_by_id(&self, item_id: &str) -> RepositoryResult<Option<ItemMaster>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT item_id, item_name, default_slot_capacity
               FROM item_master WHERE item_id = ?1"#,
        )?;
        let item = stmt.query_row(params![item_id], Self::map_row).optional()?;
        Ok(item)
    }

    /// 读取全部物料的默认容量映射 (item_id -> default_slot_capacity)
    pub fn default_capacity_map(&self) -> RepositoryResult<HashMap<String, i64>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT item_id, default_slot_capacity FROM item_master")?;
        let pairs = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pairs.into_iter().collect())
    }

    /// 行映射
    fn map_row(row: &Row<'_>) -> rusqlite::Result<ItemMaster> {
        Ok(ItemMaster {
            item_id: row.get(0)?,
            item_name: row.get(1)?,
            default_slot_capacity: row.get(2)?,
        })
    }
}
