//! # bmp_stego 库
//!
//! 本库包含 BMP LSB 隐写工具的核心逻辑：比特打包、帧编解码、容量检查与载体 I/O。

// 声明库包含的所有模块。

pub mod capacity;
pub mod carrier;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod handler;
pub mod logging;
pub mod steganography;

pub use codec::{Frame, FrameCodec, Operation};
pub use config::StegoConfig;
pub use error::{Result, StegoError};
