use std::path::PathBuf;

const APP_DIR_NAME: &str = "danci-vocab";
const DB_FILE_NAME: &str = "vocabulary.db";

#[derive(Debug, Clone)]
pub struct VocabConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// 是否额外写入按天滚动的日志文件
    pub file_logs: bool,
    pub log_dir: PathBuf,
}

impl VocabConfig {
    /// 从环境变量读取配置，先加载 `.env`（文件不存在时忽略）
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过 `lookup` 取变量值构建配置，空白值视为未设置
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let db_path = var("VOCAB_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let log_level = var("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let file_logs = var("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let log_dir = var("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./logs"));

        Self {
            db_path,
            log_level,
            file_logs,
            log_dir,
        }
    }
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// 平台数据目录下的数据库文件；无数据目录时使用当前目录
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(DB_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}
