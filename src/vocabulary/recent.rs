//! 最近搜索记录

use serde::{Deserialize, Serialize};

/// 最近搜索保留条数上限
pub const RECENT_SEARCH_LIMIT: usize = 10;

/// 最近搜索列表：最新在前、无重复、最多 [`RECENT_SEARCH_LIMIT`] 条
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RecentSearches {
    words: Vec<String>,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次搜索：移除已有的相同词（区分大小写），插入到最前，并截断到上限
    pub fn record(&mut self, word: &str) {
        self.words.retain(|w| w != word);
        self.words.insert(0, word.to_string());
        self.words.truncate(RECENT_SEARCH_LIMIT);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.words.iter()
    }
}

impl From<Vec<String>> for RecentSearches {
    /// 按原顺序重建，保留每个词第一次出现的位置
    fn from(words: Vec<String>) -> Self {
        let mut deduped: Vec<String> = Vec::with_capacity(words.len().min(RECENT_SEARCH_LIMIT));
        for word in words {
            if deduped.len() == RECENT_SEARCH_LIMIT {
                break;
            }
            if !deduped.contains(&word) {
                deduped.push(word);
            }
        }
        Self { words: deduped }
    }
}

impl From<RecentSearches> for Vec<String> {
    fn from(recent: RecentSearches) -> Self {
        recent.words
    }
}

impl<'a> IntoIterator for &'a RecentSearches {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}
