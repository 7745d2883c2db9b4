use clap::Parser;
use log::debug;

use bmp_stego::{
    cli::{Cli, Commands},
    handler::{handle_decode, handle_encode},
    logging::init_logger,
};

/// 程序的主入口点
///
/// 负责解析命令行参数、初始化日志，并根据指定的子命令（`encode` 或 `decode`）
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();
    init_logger(cli.verbose);

    // 根据子命令调用相应的处理函数
    let report = match cli.command {
        Commands::Encode(args) => handle_encode(args)?,
        Commands::Decode(args) => handle_decode(args)?,
    };

    debug!(
        "{:?} finished: {} bytes, output {}",
        report.operation,
        report.bytes,
        report.output.display()
    );
    Ok(())
}
