// ==========================================
// 仓储库位分配系统 - 上架事务仓储
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 3. 上架事务 / 5. 并发模型
// 职责: 在单个 SQLite 事务内提交 PlacementPlan
// 红线: 库位占用与单元位置的唯一合法写入路径;
//       任一库位版本号不匹配则整个事务回滚
// ==========================================

use crate::domain::placement::PlacementPlan;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// PlacementRepository - 上架事务仓储
// ==========================================
pub struct PlacementRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PlacementRepository {
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

    /// 原子提交一个上架规划
    ///
    /// # 并发控制
    /// 每个受影响库位按 `WHERE location_id = ? AND revision = ?` 更新并自增
    /// revision; 任一更新命中 0 行即判定乐观锁冲突,整个事务回滚,由调用方
    /// 基于新快照整批重试 (禁止部分重试)。
    ///
    /// 单元行按 `WHERE unit_id = ? AND location_id IS ?` 更新,来源位置
    /// 与规划快照不符同样整批回滚 (StaleUnitLocation)。
    ///
    /// # 返回
    /// - Ok(()): 全部库位与单元已更新
    /// - Err(OptimisticLockFailure / StaleUnitLocation): 并发冲突,未产生任何变更
    pub fn commit(&self, plan: &PlacementPlan) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        for mutation in &plan.location_mutations {
            let after = &mutation.after;
            let affected = tx.execute(
                r#"UPDATE storage_location
                   SET assigned_item_id = ?, occupant_count = ?,
                       capacity_for_item = ?, revision = revision + 1
                   WHERE location_id = ? AND revision = ?"#,
                params![
                    &after.assigned_item_id,
                    after.occupant_count,
                    after.capacity_for_item,
                    &after.location_id,
                    mutation.expected_revision,
                ],
            )?;

            if affected == 0 {
                // 判断是记录不存在还是 revision 冲突
                let actual: Result<i64, _> = tx.query_row(
                    "SELECT revision FROM storage_location WHERE location_id = ?",
                    params![&after.location_id],
                    |row| row.get(0),
                );
                let err = match actual {
                    Ok(actual_revision) => {
                        warn!(
                            location_id = %after.location_id,
                            expected = mutation.expected_revision,
                            actual = actual_revision,
                            "上架提交遇到乐观锁冲突,整批回滚"
                        );
                        RepositoryError::OptimisticLockFailure {
                            location_id: after.location_id.clone(),
                            expected: mutation.expected_revision,
                            actual: actual_revision,
                        }
                    }
                    Err(_) => RepositoryError::NotFound {
                        entity: "StorageLocation".to_string(),
                        id: after.location_id.clone(),
                    },
                };
                tx.rollback()?;
                return Err(err);
            }
        }

        for unit_move in &plan.unit_moves {
            // 单元写入同样带条件: 来源位置与规划快照不符即判并发冲突。
            // 否则两个调用方可以把同一单元同时"放进"两个不同库位,
            // 各自只碰到不相交的库位版本号,留下无人持有的幽灵占用。
            let affected = tx.execute(
                r#"UPDATE inventory_unit SET location_id = ?
                   WHERE unit_id = ? AND location_id IS ?"#,
                params![
                    &unit_move.to_location_id,
                    &unit_move.unit_id,
                    &unit_move.from_location_id,
                ],
            )?;
            if affected == 0 {
                let actual: Result<Option<String>, _> = tx.query_row(
                    "SELECT location_id FROM inventory_unit WHERE unit_id = ?",
                    params![&unit_move.unit_id],
                    |row| row.get(0),
                );
                let err = match actual {
                    Ok(actual_location) => {
                        warn!(
                            unit_id = %unit_move.unit_id,
                            expected = ?unit_move.from_location_id,
                            actual = ?actual_location,
                            "上架提交遇到单元位置冲突,整批回滚"
                        );
                        RepositoryError::StaleUnitLocation {
                            unit_id: unit_move.unit_id.clone(),
                            expected: unit_move.from_location_id.clone(),
                            actual: actual_location,
                        }
                    }
                    Err(_) => RepositoryError::NotFound {
                        entity: "InventoryUnit".to_string(),
                        id: unit_move.unit_id.clone(),
                    },
                };
                tx.rollback()?;
                return Err(err);
            }
        }

        tx.commit()?;
        Ok(())
    }
}
