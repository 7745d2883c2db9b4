//! # 编解码配置模块

use crate::constants::{BMP_HEADER_SIZE, DEFAULT_MAX_EXTENSION, DEFAULT_MAX_PAYLOAD, MAGIC_STRING};

/// 帧编解码器的配置。
///
/// 两个上限用于在分配缓冲区之前拒绝过大的长度字段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StegoConfig {
    /// 原样复制、不参与隐写的头部字节数。
    pub header_size: usize,
    /// 帧开头的魔数标记。
    pub magic: Vec<u8>,
    /// 数据部分的最大长度 (字节)。
    pub max_payload_size: usize,
    /// 扩展名的最大长度 (字节)。
    pub max_extension_len: usize,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            header_size: BMP_HEADER_SIZE,
            magic: MAGIC_STRING.to_vec(),
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            max_extension_len: DEFAULT_MAX_EXTENSION,
        }
    }
}

impl StegoConfig {
    pub fn with_magic(mut self, magic: impl Into<Vec<u8>>) -> Self {
        self.magic = magic.into();
        self
    }

    pub fn with_max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }

    pub fn with_max_extension_len(mut self, max_extension_len: usize) -> Self {
        self.max_extension_len = max_extension_len;
        self
    }
}
