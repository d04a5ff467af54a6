//! 生词本状态
//!
//! `VocabularyStore` 独占已保存条目和最近搜索两份集合。
//! 初始化时从键值后端各加载一次；每次变更后整份重新序列化写回。

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::{KeyValueStore, StorageResult};
use crate::vocabulary::entry::Entry;
use crate::vocabulary::recent::RecentSearches;

/// 已保存条目的存储键
pub const ENTRIES_KEY: &str = "vocabulary";

/// 最近搜索的存储键
pub const RECENT_KEY: &str = "recentlySearched";

/// 生词本：已保存条目（最新在前）与最近搜索
///
/// 两份集合分别存放在 [`ENTRIES_KEY`] 与 [`RECENT_KEY`] 下，
/// 每次变更后整份写回 `backend`。
///
/// # Example
/// ```ignore
/// let mut store = VocabularyStore::load(DatabaseManager::new("vocabulary.db")?);
/// store.add_word("Balm", "");
/// let matches = store.filter("bal");
/// ```
pub struct VocabularyStore<S: KeyValueStore> {
    backend: S,
    entries: Vec<Entry>,
    recent: RecentSearches,
}

impl<S: KeyValueStore> VocabularyStore<S> {
    /// 从后端加载两份集合
    ///
    /// 键不存在、读取失败或内容无法解析时，对应集合为空，不会返回错误。
    pub fn load(backend: S) -> Self {
        let entries: Vec<Entry> = load_or_default::<_, Vec<Entry>>(&backend, ENTRIES_KEY)
            .into_iter()
            .filter(|entry| !entry.word.trim().is_empty())
            .collect();
        let recent: RecentSearches = load_or_default(&backend, RECENT_KEY);

        tracing::info!(
            entries = entries.len(),
            recent = recent.len(),
            "vocabulary loaded"
        );

        Self {
            backend,
            entries,
            recent,
        }
    }

    /// 添加生词
    ///
    /// 生词去除首尾空白后为空时不做任何事并返回 `None`。
    /// 否则新条目插入到最前，同时记录一次搜索，并写回条目列表。
    pub fn add_word(&mut self, word: &str, definition: &str) -> Option<&Entry> {
        if word.trim().is_empty() {
            return None;
        }

        self.entries.insert(0, Entry::new(word, definition));
        self.record_search(word);
        self.persist(ENTRIES_KEY, &self.entries);

        tracing::debug!(word, total = self.entries.len(), "word added");
        self.entries.first()
    }

    /// 记录一次搜索并写回最近搜索列表
    pub fn record_search(&mut self, word: &str) {
        self.recent.record(word);
        self.persist(RECENT_KEY, &self.recent);
    }

    /// 生词中包含 `search_term`（不区分大小写）的条目，保持原有顺序
    pub fn filter(&self, search_term: &str) -> Vec<&Entry> {
        let needle = search_term.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.word.to_lowercase().contains(&needle))
            .collect()
    }

    /// 全部条目，最新在前
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// 最近搜索，最新在前
    pub fn recent(&self) -> &[String] {
        self.recent.as_slice()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// 写回失败只记录日志，内存中的状态保持不变
    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = write_json(&self.backend, key, value) {
            tracing::error!(key, error = %e, "failed to persist vocabulary state");
        }
    }
}

fn write_json<S, T>(backend: &S, key: &str, value: &T) -> StorageResult<()>
where
    S: KeyValueStore,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    backend.set(key, &json)
}

fn load_or_default<S, T>(backend: &S, key: &str) -> T
where
    S: KeyValueStore,
    T: DeserializeOwned + Default,
{
    match backend.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "malformed persisted value, starting empty");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read persisted value, starting empty");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};
    use crate::vocabulary::entry::DEFAULT_DEFINITION;

    fn empty_store() -> VocabularyStore<MemoryStore> {
        VocabularyStore::load(MemoryStore::new())
    }

    /// 写入总是失败的后端
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::LockError("unavailable".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::LockError("unavailable".to_string()))
        }
    }

    #[test]
    fn test_add_empty_word_is_noop() {
        let mut store = empty_store();
        assert!(store.add_word("", "anything").is_none());
        assert!(store.add_word("   \t", "anything").is_none());

        assert!(store.is_empty());
        assert!(store.recent().is_empty());
        assert_eq!(store.backend().get(ENTRIES_KEY).unwrap(), None);
        assert_eq!(store.backend().get(RECENT_KEY).unwrap(), None);
    }

    #[test]
    fn test_add_word_builds_entry() {
        let mut store = empty_store();
        let entry = store.add_word("Balm", "").cloned().unwrap();

        assert_eq!(entry.word, "Balm");
        assert_eq!(entry.definition, DEFAULT_DEFINITION);
        assert_eq!(entry.examples.len(), 3);
        assert!(entry.examples.iter().all(|e| e.contains("Balm")));
        assert_eq!(store.recent(), ["Balm"]);
    }

    #[test]
    fn test_add_word_prepends_and_persists() {
        let mut store = empty_store();
        store.add_word("first", "1");
        store.add_word("second", "2");

        let words: Vec<&str> = store.entries().iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, ["second", "first"]);
        assert_eq!(store.recent(), ["second", "first"]);

        let raw = store.backend().get(ENTRIES_KEY).unwrap().unwrap();
        let persisted: Vec<Entry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[0].word, "second");

        let raw = store.backend().get(RECENT_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"["second","first"]"#);
    }

    #[test]
    fn test_add_word_keeps_untrimmed_word() {
        let mut store = empty_store();
        store.add_word(" calm ", "");
        assert_eq!(store.entries()[0].word, " calm ");
        assert_eq!(store.recent(), [" calm "]);
    }

    #[test]
    fn test_record_search_dedupes_and_caps() {
        let mut store = empty_store();
        store.record_search("x");
        store.record_search("x");
        assert_eq!(store.recent(), ["x"]);

        for i in 0..11 {
            store.record_search(&format!("w{i}"));
        }
        assert_eq!(store.recent().len(), 10);
        assert!(!store.recent().iter().any(|w| w == "x" || w == "w0"));
        assert_eq!(store.recent()[0], "w10");
        // 仅记录搜索不会产生条目
        assert!(store.is_empty());
    }

    #[test]
    fn test_filter() {
        let mut store = empty_store();
        store.add_word("Apple", "");
        store.add_word("application", "");
        store.add_word("banana", "");

        let all: Vec<&str> = store.filter("").into_iter().map(|e| e.word.as_str()).collect();
        assert_eq!(all, ["banana", "application", "Apple"]);

        let app: Vec<&str> = store.filter("APP").into_iter().map(|e| e.word.as_str()).collect();
        assert_eq!(app, ["application", "Apple"]);

        assert!(store.filter("XYZ").is_empty());
    }

    #[test]
    fn test_load_malformed_values_starts_empty() {
        let backend = MemoryStore::new();
        backend.set(ENTRIES_KEY, "{not json").unwrap();
        backend.set(RECENT_KEY, r#"{"word": 1}"#).unwrap();

        let store = VocabularyStore::load(backend);
        assert!(store.is_empty());
        assert!(store.recent().is_empty());
    }

    #[test]
    fn test_load_keys_fall_back_independently() {
        let backend = MemoryStore::new();
        {
            let mut seed = VocabularyStore::load(&backend);
            seed.add_word("keep", "me");
        }
        backend.set(RECENT_KEY, "42").unwrap();

        let store = VocabularyStore::load(&backend);
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].word, "keep");
        assert!(store.recent().is_empty());
    }

    #[test]
    fn test_load_null_timestamp_starts_empty() {
        let backend = MemoryStore::new();
        backend
            .set(
                ENTRIES_KEY,
                r#"[
                    {"word": "ok", "definition": "x", "examples": ["a","b","c"], "timestamp": 0},
                    {"word": "no time", "definition": "x", "examples": ["a","b","c"], "timestamp": null}
                ]"#,
            )
            .unwrap();

        let store = VocabularyStore::load(backend);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_skips_blank_words() {
        let backend = MemoryStore::new();
        backend
            .set(
                ENTRIES_KEY,
                r#"[
                    {"word": "  ", "definition": "x", "examples": ["a","b","c"], "timestamp": 0},
                    {"word": "ok", "definition": "x", "examples": ["a","b","c"], "timestamp": 0}
                ]"#,
            )
            .unwrap();

        let store = VocabularyStore::load(backend);
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].word, "ok");
    }

    #[test]
    fn test_unavailable_backend_does_not_fail() {
        let mut store = VocabularyStore::load(FailingStore);
        assert!(store.is_empty());

        let entry = store.add_word("still", "works");
        assert!(entry.is_some());
        assert_eq!(store.len(), 1);
        assert_eq!(store.recent(), ["still"]);
    }
}
