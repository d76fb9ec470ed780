//! 日志基础设施

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// 初始化全局日志
    ///
    /// `RUST_LOG` 优先于配置中的级别。配置了 `log_dir` 时额外写按天滚动的文件，
    /// 返回的 guard 必须持有到进程退出，否则缓冲中的日志会丢失。
    pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", config.level)));

        let console = fmt::layer().with_target(false).compact();

        match &config.log_dir {
            Some(dir) => {
                let appender = rolling::daily(dir, format!("{}.log", config.file_prefix));
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let file = fmt::layer().with_ansi(false).with_writer(writer);

                tracing_subscriber::registry()
                    .with(filter)
                    .with(console)
                    .with(file)
                    .init();
                Some(guard)
            }
            None => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(console)
                    .init();
                None
            }
        }
    }
}
