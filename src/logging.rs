//! # 日志初始化模块

use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// 根据 `-v` 出现的次数选择日志级别。
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// 初始化日志系统，输出到 stderr，格式为 `[LEVEL] message`。
///
/// `RUST_LOG` 环境变量可以覆盖命令行指定的级别。
pub fn init_logger(verbosity: u8) {
    Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(level_for(verbosity))
        .parse_default_env()
        .init();
}
