/// Initialize logging with env_logger.
///
/// `RUST_LOG` wins when set, otherwise `log_level` applies.
pub fn init(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();
}
