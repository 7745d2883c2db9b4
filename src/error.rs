//! # 错误类型模块
//!
//! 隐写核心 (比特打包、帧编解码、容量检查、载体 I/O) 共用的错误类型。

use std::fmt;

/// 编解码过程中可能出现的错误。所有错误对当前操作都是致命的，不做重试。
#[derive(Debug, thiserror::Error)]
pub enum StegoError {
    /// 载体或数据源中剩余的字节数不足。
    #[error("short read: needed {needed} bytes, only {available} available")]
    ShortRead { needed: usize, available: usize },

    /// 输出端接收的字节数少于请求写入的字节数。
    #[error("short write: sink accepted fewer than {expected} bytes")]
    ShortWrite { expected: u64 },

    /// 无法为字段分配缓冲区。
    #[error("could not reserve {size} bytes for the {field} buffer")]
    AllocationFailure { field: Field, size: usize },

    /// 声明或提供的长度超出配置上限，在分配之前即被拒绝。
    #[error("{field} too large ({size} bytes, max {max})")]
    FieldTooLarge { field: Field, size: usize, max: usize },

    /// 载体中的魔数与预期不符，图像中没有可识别的隐藏数据。
    #[error("magic marker not found: the carrier does not hold a hidden file")]
    MagicMismatch,

    /// 载体容量不足以容纳整个帧。
    #[error("carrier too small: {required} bytes required, {available} available")]
    CapacityExceeded { required: u64, available: u64 },

    /// 恢复出的扩展名无法安全地用作文件名。
    #[error("invalid extension: {0}")]
    InvalidExtension(String),

    /// 底层 I/O 错误。
    #[error("carrier I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 帧中带长度的字段，用于错误信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Extension,
    Payload,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Extension => f.write_str("extension"),
            Field::Payload => f.write_str("payload"),
        }
    }
}

/// 失败的检查类别，供顶层向用户报告。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Capacity,
    Magic,
    Io,
    Input,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Capacity => f.write_str("capacity check"),
            Category::Magic => f.write_str("magic check"),
            Category::Io => f.write_str("I/O"),
            Category::Input => f.write_str("input validation"),
        }
    }
}

impl StegoError {
    /// 返回该错误对应的检查类别。
    pub fn category(&self) -> Category {
        match self {
            StegoError::CapacityExceeded { .. } => Category::Capacity,
            StegoError::MagicMismatch => Category::Magic,
            StegoError::ShortRead { .. } | StegoError::ShortWrite { .. } | StegoError::Io(_) => {
                Category::Io
            }
            StegoError::AllocationFailure { .. }
            | StegoError::FieldTooLarge { .. }
            | StegoError::InvalidExtension(_) => Category::Input,
        }
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;
