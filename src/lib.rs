//! Danci 生词本
//!
//! 用户输入生词与可选释义，生成三条模板例句后保存到本地键值存储，
//! 并提供不区分大小写的过滤视图与最近搜索记录。
//!
//! - `vocabulary`: 生词本状态、条目模型与相对时间描述
//! - `storage`: 键值持久化后端（SQLite / 内存）
//! - `commands`: 面向界面层的命令入口
//! - `config` / `logging`: 环境配置与日志初始化

pub mod commands;
pub mod config;
pub mod logging;
pub mod storage;
pub mod vocabulary;

pub use config::VocabConfig;
pub use storage::{DatabaseManager, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use vocabulary::{Entry, RecentSearches, VocabularyStore};
