//! 生词本核心模块
//!
//! - `entry`: 条目模型与例句模板
//! - `recent`: 最近搜索记录
//! - `store`: 生词本状态与持久化
//! - `time_ago`: 相对时间描述

pub mod entry;
pub mod recent;
pub mod store;
pub mod time_ago;

pub use entry::{Entry, DEFAULT_DEFINITION, EXAMPLE_TEMPLATES};
pub use recent::{RecentSearches, RECENT_SEARCH_LIMIT};
pub use store::{VocabularyStore, ENTRIES_KEY, RECENT_KEY};
pub use time_ago::{format_time_ago, format_time_ago_at};
