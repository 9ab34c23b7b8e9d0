// ==========================================
// 仓储库位分配系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ===== 配置默认值 =====

/// 物料主数据缺失时的单库位默认容量
pub const DEFAULT_SLOT_CAPACITY: i64 = 1;

/// 建议列表长度上限 (0 = 不限)
pub const DEFAULT_SUGGESTION_LIMIT: usize = 0;

/// 上架事务整批重试次数上限
pub const DEFAULT_PLACEMENT_MAX_RETRIES: u32 = 3;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 为保证连接行为一致,会对传入连接再次应用统一 PRAGMA (幂等)。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值 (scope_id='global')
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入配置值 (scope_id='global', upsert)
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
               ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value"#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 物料主数据缺失时的单库位默认容量
    pub fn default_slot_capacity(&self) -> Result<i64, Box<dyn Error>> {
        Ok(self
            .get_config_value("default_slot_capacity")?
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SLOT_CAPACITY))
    }

    /// 建议列表长度上限 (0 = 不限)
    pub fn suggestion_limit(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self
            .get_config_value("suggestion_limit")?
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SUGGESTION_LIMIT))
    }

    /// 上架事务整批重试次数上限
    pub fn placement_max_retries(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self
            .get_config_value("placement_max_retries")?
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PLACEMENT_MAX_RETRIES))
    }
}
