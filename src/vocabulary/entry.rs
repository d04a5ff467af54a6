//! 生词条目模型
//!
//! 条目创建时生成三条模板例句，之后不再修改。

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 未填写释义时使用的占位文本
pub const DEFAULT_DEFINITION: &str = "No definition provided";

/// 例句模板，`{word}` 处替换为生词
pub const EXAMPLE_TEMPLATES: [&str; 3] = [
    "\"My headache was pretty bad, but this tea really helped {word} the pain,\" Sarah said as she relaxed on the couch.",
    "\"Hey mom, I know you're stressed about the party - let me help {word} the situation by taking care of the decorations!\"",
    "\"This movie night is definitely going to {word} my bad mood after that rough day at work,\" Tom laughed as he grabbed the popcorn.",
];

/// 一条已保存的生词
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// 生词（保留用户输入的原样）
    pub word: String,
    /// 释义
    pub definition: String,
    /// 例句，固定三条
    pub examples: [String; 3],
    /// 创建时间
    #[serde(
        rename = "timestamp",
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// 以当前时间创建条目
    ///
    /// 调用方负责保证 `word` 去除首尾空白后非空。
    pub fn new(word: &str, definition: &str) -> Self {
        Self::with_timestamp(word, definition, Utc::now())
    }

    /// 以指定时间创建条目
    pub fn with_timestamp(word: &str, definition: &str, created_at: DateTime<Utc>) -> Self {
        let definition = if definition.trim().is_empty() {
            DEFAULT_DEFINITION.to_string()
        } else {
            definition.to_string()
        };

        Self {
            word: word.to_string(),
            definition,
            examples: generate_examples(word),
            created_at,
        }
    }
}

/// 将生词代入三条例句模板
pub fn generate_examples(word: &str) -> [String; 3] {
    EXAMPLE_TEMPLATES.map(|template| template.replace("{word}", word))
}

// ============================================================
// 时间戳序列化
// ============================================================

/// 写出为毫秒精度的 RFC 3339 UTC 字符串，如 `2024-05-01T12:30:00.000Z`
fn serialize_timestamp<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// 接受 RFC 3339 字符串或 Unix 毫秒时间戳
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Millis(i64),
    }

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom),
        RawTimestamp::Millis(millis) => Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {millis}"))),
    }
}
