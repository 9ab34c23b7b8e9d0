// ==========================================
// 仓储库位分配系统 - 核对单据仓储
// ==========================================
// 红线: Repository 不含业务逻辑; 状态列只存单据级状态,
//       明细行的 LACK/EXCESS/MATCH 永远由引擎推导,不落库
// ==========================================

use crate::domain::reconciliation::{ReconcileDocument, ReconciliationLine};
use crate::domain::types::{ComparisonMode, DocumentKind, DocumentStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// DocumentRepository - 核对单据仓储
// ==========================================

/// 核对单据仓储
/// 职责: 管理 reconcile_document / reconcile_line 两张表
pub struct DocumentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DocumentRepository {
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

    /// 创建单据
    pub fn create_document(&self, document: &ReconcileDocument) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO reconcile_document (
                document_id, kind, comparison_mode, status, created_at
            ) VALUES (?, ?, ?, ?, ?)"#,
            params![
                &document.document_id,
                document.kind.to_db_str(),
                document.comparison_mode.to_db_str(),
                document.status.to_db_str(),
                document.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        )?;
        Ok(())
    }

    /// 按 id 查询单据
    pub fn find_document(&self, document_id: &str) -> RepositoryResult<Option<ReconcileDocument>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT document_id, kind, comparison_mode, status, created_at
               FROM reconcile_document WHERE document_id = ?1"#,
        )?;
        let document = stmt
            .query_row(params![document_id], Self::map_document_row)
            .optional()?;
        Ok(document)
    }

    /// 更新单据状态
    pub fn update_document_status(
        &self,
        document_id: &str,
        status: DocumentStatus,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE reconcile_document SET status = ? WHERE document_id = ?",
            params![status.to_db_str(), document_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ReconcileDocument".to_string(),
                id: document_id.to_string(),
            });
        }
        Ok(())
    }

    /// 写入明细行 (单据首次填充)
    pub fn insert_line(&self, line: &ReconciliationLine) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO reconcile_line (
                line_id, document_id, item_id,
                declared_quantity, declared_measurement,
                counted_quantity, counted_measurement
            ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
            params![
                &line.line_id,
                &line.document_id,
                &line.item_id,
                line.declared_quantity,
                line.declared_measurement,
                line.counted_quantity,
                line.counted_measurement,
            ],
        )?;
        Ok(())
    }

    /// 按 id 查询明细行
    pub fn find_line(&self, line_id: &str) -> RepositoryResult<Option<ReconciliationLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT line_id, document_id, item_id,
                      declared_quantity, declared_measurement,
                      counted_quantity, counted_measurement
               FROM reconcile_line WHERE line_id = ?1"#,
        )?;
        let line = stmt.query_row(params![line_id], Self::map_line_row).optional()?;
        Ok(line)
    }

    /// 查询单据的全部明细行
    pub fn find_lines(&self, document_id: &str) -> RepositoryResult<Vec<ReconciliationLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT line_id, document_id, item_id,
                      declared_quantity, declared_measurement,
                      counted_quantity, counted_measurement
               FROM reconcile_line WHERE document_id = ?1 ORDER BY line_id"#,
        )?;
        let lines = stmt
            .query_map(params![document_id], Self::map_line_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines)
    }

    /// 写入清点结果 (清点流程的唯一写入口)
    pub fn update_counted(
        &self,
        line_id: &str,
        counted_quantity: i64,
        counted_measurement: Option<f64>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"UPDATE reconcile_line
               SET counted_quantity = ?, counted_measurement = ?
               WHERE line_id = ?"#,
            params![counted_quantity, counted_measurement, line_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ReconciliationLine".to_string(),
                id: line_id.to_string(),
            });
        }
        Ok(())
    }

    /// 单据行映射
    fn map_document_row(row: &Row<'_>) -> rusqlite::Result<ReconcileDocument> {
        let created_at_str: String = row.get(4)?;
        Ok(ReconcileDocument {
            document_id: row.get(0)?,
            kind: DocumentKind::from_str(&row.get::<_, String>(1)?),
            comparison_mode: ComparisonMode::from_str(&row.get::<_, String>(2)?),
            status: DocumentStatus::from_str(&row.get::<_, String>(3)?),
            created_at: NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
                .unwrap_or_default(),
        })
    }

    /// 明细行映射
    fn map_line_row(row: &Row<'_>) -> rusqlite::Result<ReconciliationLine> {
        Ok(ReconciliationLine {
            line_id: row.get(0)?,
            document_id: row.get(1)?,
            item_id: row.get(2)?,
            declared_quantity: row.get(3)?,
            declared_measurement: row.get(4)?,
            counted_quantity: row.get(5)?,
            counted_measurement: row.get(6)?,
        })
    }
}
