use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::VocabConfig;

const LOG_FILE_NAME: &str = "vocabulary.log";

/// 文件日志写入线程的守卫，需在进程生命周期内持有
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// 按配置安装全局 tracing subscriber
///
/// 非法的过滤表达式退回 `info`；日志目录无法创建时只输出到 stdout。
/// 已存在全局 subscriber 时输出提示并保留原有 subscriber。
pub fn init_tracing(config: &VocabConfig) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(true);
    let registry = tracing_subscriber::registry().with(env_filter).with(stdout_layer);

    let (file_layer, guard) = match file_writer(config) {
        Some((writer, guard)) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(FileLogGuard { _guard: guard }))
        }
        None => (None, None),
    };

    if let Err(err) = registry.with(file_layer).try_init() {
        eprintln!("tracing subscriber already installed, keeping it: {err}");
        return None;
    }

    guard
}

fn file_writer(
    config: &VocabConfig,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    if !config.file_logs {
        return None;
    }

    if let Err(err) = std::fs::create_dir_all(&config.log_dir) {
        eprintln!(
            "failed to create log directory {}: {err}",
            config.log_dir.display()
        );
        return None;
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, LOG_FILE_NAME);
    Some(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_writer_disabled_by_default() {
        let config = VocabConfig::from_lookup(|_| None);
        assert!(file_writer(&config).is_none());
    }

    #[test]
    fn test_file_writer_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let config = VocabConfig {
            file_logs: true,
            log_dir: log_dir.clone(),
            ..VocabConfig::from_lookup(|_| None)
        };

        assert!(file_writer(&config).is_some());
        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_init_tracing_is_repeatable() {
        let config = VocabConfig {
            log_level: "[not a filter".to_string(),
            ..VocabConfig::from_lookup(|_| None)
        };
        let _first = init_tracing(&config);
        // 第二次安装失败，不返回文件守卫
        assert!(init_tracing(&config).is_none());
        tracing::info!("tracing initialized");
    }
}
