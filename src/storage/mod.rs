//! 本地键值存储模块
//!
//! 提供生词本的持久化后端，支持：
//! - 基于 SQLite 的键值表（跨进程重启保留）
//! - 内存键值存储（测试及数据库不可用时的降级方案）

// ============================================================
// 子模块声明
// ============================================================

pub mod migrations;

// ============================================================
// 重新导出主要类型
// ============================================================

pub use migrations::run_migrations;

// ============================================================
// 依赖导入
// ============================================================

use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

// ============================================================
// 错误类型定义
// ============================================================

/// 存储模块错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("迁移错误: {0}")]
    Migration(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("锁获取失败: {0}")]
    LockError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// ============================================================
// KeyValueStore - 持久化后端抽象
// ============================================================

/// 键值持久化后端
///
/// 值均为序列化后的文本，读取不存在的键返回 `None`。
pub trait KeyValueStore {
    /// 读取指定键的值
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// 写入（覆盖）指定键的值
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

// ============================================================
// DatabaseManager - SQLite 键值存储
// ============================================================

/// 数据库连接管理器
pub struct DatabaseManager {
    connection: Mutex<Connection>,
    db_path: String,
}

impl DatabaseManager {
    /// 打开（或创建）数据库文件
    ///
    /// 自动创建父目录、启用 WAL 模式，并运行数据库迁移。
    ///
    /// # Example
    /// ```ignore
    /// let db = DatabaseManager::new("./data/vocabulary.db")?;
    /// ```
    pub fn new<P: AsRef<Path>>(db_path: P) -> StorageResult<Self> {
        let path = db_path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let connection = Connection::open(path)?;
        connection.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;

        let manager = Self {
            connection: Mutex::new(connection),
            db_path: path.to_string_lossy().to_string(),
        };
        manager.initialize()?;

        tracing::debug!(path = %manager.db_path, "vocabulary database opened");
        Ok(manager)
    }

    /// 创建内存数据库（用于测试）
    pub fn in_memory() -> StorageResult<Self> {
        let manager = Self {
            connection: Mutex::new(Connection::open_in_memory()?),
            db_path: ":memory:".to_string(),
        };
        manager.initialize()?;

        Ok(manager)
    }

    /// 初始化数据库（运行迁移）
    pub fn initialize(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        migrations::run_migrations(&conn)?;
        Ok(())
    }

    /// 获取数据库连接的锁
    pub fn get_connection(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|e| StorageError::LockError(e.to_string()))
    }

    /// 获取数据库路径
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// 删除指定键，返回是否确实删除了记录
    pub fn delete(&self, key: &str) -> StorageResult<bool> {
        let conn = self.get_connection()?;
        let affected = conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(affected > 0)
    }

    /// 列出所有键（按字典序）
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key ASC")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

impl KeyValueStore for DatabaseManager {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let conn = self.get_connection()?;
        let result = conn.query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
            row.get(0)
        });

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            [key, value],
        )?;
        Ok(())
    }
}

// ============================================================
// MemoryStore - 内存键值存储
// ============================================================

/// 进程内键值存储，不跨重启保留
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|e| StorageError::LockError(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================
// 测试
// ============================================================
