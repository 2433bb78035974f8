//! 日志初始化

/// 初始化 env_logger，默认级别 `info`，可用 `RUST_LOG` 覆盖。
///
/// 重复调用是安全的（之后的调用被忽略）。
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
