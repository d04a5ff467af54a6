//! 生词本命令
//!
//! 面向界面层的调用入口：界面持有 [`VocabularyState`]，通过以下命令读写生词本，
//! 返回可直接序列化给前端的视图类型，错误统一转换为字符串。

use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

use crate::config::VocabConfig;
use crate::logging::{init_tracing, FileLogGuard};
use crate::storage::{DatabaseManager, KeyValueStore, MemoryStore, StorageError};
use crate::vocabulary::{format_time_ago, Entry, VocabularyStore};

/// 界面层使用的后端类型
pub type DynBackend = Box<dyn KeyValueStore + Send>;

// ============================================================
// 应用状态管理
// ============================================================

/// 生词本托管状态
pub struct VocabularyState {
    pub store: Mutex<Option<VocabularyStore<DynBackend>>>,
}

impl Default for VocabularyState {
    fn default() -> Self {
        Self {
            store: Mutex::new(None),
        }
    }
}

impl VocabularyState {
    /// 启动入口：读取环境配置、安装日志并加载生词本
    ///
    /// 返回的日志守卫需由宿主在进程生命周期内持有。
    pub fn bootstrap() -> Result<(Self, Option<FileLogGuard>), String> {
        Self::bootstrap_with(&VocabConfig::from_env())
    }

    /// 使用给定配置启动
    pub fn bootstrap_with(config: &VocabConfig) -> Result<(Self, Option<FileLogGuard>), String> {
        let guard = init_tracing(config);
        tracing::info!(db_path = %config.db_path.display(), "starting vocabulary");

        let state = Self::default();
        state.initialize(config)?;
        Ok((state, guard))
    }

    /// 打开配置中的数据库并加载生词本
    ///
    /// 数据库无法打开时退回到内存存储，本次运行的数据不会保留。
    pub fn initialize(&self, config: &VocabConfig) -> Result<(), String> {
        let backend: DynBackend = match DatabaseManager::new(&config.db_path) {
            Ok(db) => Box::new(db),
            Err(e) => {
                tracing::warn!(
                    path = %config.db_path.display(),
                    error = %e,
                    "database unavailable, falling back to in-memory storage"
                );
                Box::new(MemoryStore::new())
            }
        };

        self.install(backend)
    }

    /// 使用指定后端加载生词本
    pub fn with_backend(backend: DynBackend) -> Result<Self, String> {
        let state = Self::default();
        state.install(backend)?;
        Ok(state)
    }

    fn install(&self, backend: DynBackend) -> Result<(), String> {
        let mut guard = self.lock()?;
        *guard = Some(VocabularyStore::load(backend));
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<VocabularyStore<DynBackend>>>, String> {
        self.store
            .lock()
            .map_err(|e| StorageError::LockError(e.to_string()).to_string())
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut VocabularyStore<DynBackend>) -> T,
    ) -> Result<T, String> {
        let mut guard = self.lock()?;
        let store = guard
            .as_mut()
            .ok_or_else(|| "生词本未初始化".to_string())?;
        Ok(f(store))
    }
}

// ============================================================
// 响应类型定义
// ============================================================

/// 单个生词的展示数据
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub word: String,
    pub definition: String,
    pub examples: Vec<String>,
    /// RFC 3339 创建时间
    pub timestamp: String,
    /// 相对时间，如 `5 minutes ago`
    pub time_ago: String,
}

impl From<&Entry> for EntryView {
    fn from(entry: &Entry) -> Self {
        Self {
            word: entry.word.clone(),
            definition: entry.definition.clone(),
            examples: entry.examples.to_vec(),
            timestamp: entry
                .created_at
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            time_ago: format_time_ago(entry.created_at),
        }
    }
}

// ============================================================
// 命令
// ============================================================

/// 添加生词；生词为空时返回 `Ok(None)`
pub fn add_word(
    state: &VocabularyState,
    word: String,
    definition: String,
) -> Result<Option<EntryView>, String> {
    state.with_store(|store| store.add_word(&word, &definition).map(EntryView::from))
}

/// 按关键字过滤生词（不区分大小写），空关键字返回全部
pub fn search_words(state: &VocabularyState, search_term: String) -> Result<Vec<EntryView>, String> {
    state.with_store(|store| {
        store
            .filter(&search_term)
            .into_iter()
            .map(EntryView::from)
            .collect()
    })
}

/// 全部生词，最新在前
pub fn list_words(state: &VocabularyState) -> Result<Vec<EntryView>, String> {
    state.with_store(|store| store.entries().iter().map(EntryView::from).collect())
}

/// 最近搜索，最新在前
pub fn get_recent_searches(state: &VocabularyState) -> Result<Vec<String>, String> {
    state.with_store(|store| store.recent().to_vec())
}

/// 记录一次搜索，返回更新后的最近搜索列表
pub fn record_search(state: &VocabularyState, word: String) -> Result<Vec<String>, String> {
    state.with_store(|store| {
        store.record_search(&word);
        store.recent().to_vec()
    })
}
