// ==========================================
// 仓储库位分配系统 - 库位数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑; 占用字段的写入走 PlacementRepository
// ==========================================

use crate::domain::location::{LocationCoord, StorageLocation};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// LocationRepository - 库位仓储
// ==========================================

/// 库位仓储
/// 职责: 管理 storage_location 表的读与登记
pub struct LocationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LocationRepository {
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

    /// 登记库位 (初始无占用)
    pub fn insert(&self, location: &StorageLocation) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO storage_location (
                location_id, zone, floor, row_code, line_code,
                is_road, is_door, assigned_item_id, occupant_count,
                capacity_for_item, revision
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                &location.location_id,
                &location.coord.zone,
                &location.coord.floor,
                &location.coord.row,
                &location.coord.line,
                location.is_road as i64,
                location.is_door as i64,
                &location.assigned_item_id,
                location.occupant_count,
                location.capacity_for_item,
                location.revision,
            ],
        )?;
        Ok(())
    }

    /// 按 id 查询单个库位
    pub fn find_by_id(&self, location_id: &str) -> RepositoryResult<Option<StorageLocation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT location_id, zone, floor, row_code, line_code,
                   is_road, is_door, assigned_item_id, occupant_count,
                   capacity_for_item, revision
            FROM storage_location
            WHERE location_id = ?1
            "#,
        )?;

        let location = stmt
            .query_row(params![location_id], Self::map_row)
            .optional()?;
        Ok(location)
    }

    /// 读取库位全量快照 (建议引擎/网格构建的输入)
    pub fn find_all(&self) -> RepositoryResult<Vec<StorageLocation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT location_id, zone, floor, row_code, line_code,
                   is_road, is_door, assigned_item_id, occupant_count,
                   capacity_for_item, revision
            FROM storage_location
            ORDER BY zone, floor, row_code, line_code
            "#,
        )?;

        let locations = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(locations)
    }

    /// 查询当前承载某物料的库位列表
    pub fn find_by_item(&self, item_id: &str) -> RepositoryResult<Vec<StorageLocation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT location_id, zone, floor, row_code, line_code,
                   is_road, is_door, assigned_item_id, occupant_count,
                   capacity_for_item, revision
            FROM storage_location
            WHERE assigned_item_id = ?1
            ORDER BY zone, floor, row_code, line_code
            "#,
        )?;

        let locations = stmt
            .query_map(params![item_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(locations)
    }

    /// 行映射
    fn map_row(row: &Row<'_>) -> rusqlite::Result<StorageLocation> {
        Ok(StorageLocation {
            location_id: row.get(0)?,
            coord: LocationCoord {
                zone: row.get(1)?,
                floor: row.get(2)?,
                row: row.get(3)?,
                line: row.get(4)?,
            },
            is_road: row.get::<_, i64>(5)? != 0,
            is_door: row.get::<_, i64>(6)? != 0,
            assigned_item_id: row.get(7)?,
            occupant_count: row.get(8)?,
            capacity_for_item: row.get(9)?,
            revision: row.get(10)?,
        })
    }
}
