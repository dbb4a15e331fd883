// src/logging/tracing_setup.rs

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

pub const LOG_FILE_NAME: &str = "adapter_log.json";

/// 初始化全局 tracing 日志：按小时滚动的 JSON 文件，非阻塞写入。
///
/// 返回的 guard 必须存活到进程退出，否则缓冲中的日志会丢失。
pub fn init_tracing(log_dir: &str) -> Result<WorkerGuard, tracing::subscriber::SetGlobalDefaultError> {
    let log_file = rolling::hourly(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().json().with_writer(non_blocking));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}
