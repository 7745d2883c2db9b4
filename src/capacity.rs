//! # 容量检查模块
//!
//! 在写入任何载体字节之前，确认载体能容纳完整的帧。

use crate::constants::{CARRIER_BYTES_PER_BYTE, INT_FIELD_SIZE};
use crate::error::{Result, StegoError};

/// 一个帧在载体中的布局尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub header_size: usize,
    pub magic_len: usize,
    pub extension_len: usize,
    pub payload_len: usize,
}

impl FrameLayout {
    /// 帧本身的字节数 (魔数 + 两个长度字段 + 扩展名 + 数据)。
    pub fn frame_bytes(&self) -> u64 {
        (self.magic_len + INT_FIELD_SIZE + self.extension_len + INT_FIELD_SIZE) as u64
            + self.payload_len as u64
    }

    /// 载体需要的总字节数，包括头部。
    pub fn required_carrier_bytes(&self) -> u64 {
        self.header_size as u64 + self.frame_bytes() * CARRIER_BYTES_PER_BYTE as u64
    }
}

/// 载体长度是否足以容纳 `layout` 描述的帧。
pub fn check_capacity(carrier_len: u64, layout: &FrameLayout) -> bool {
    carrier_len >= layout.required_carrier_bytes()
}

/// 与 [`check_capacity`] 相同，但在容量不足时返回带有具体数字的错误。
///
/// # Errors
///
/// 容量不足时返回 [`StegoError::CapacityExceeded`]，其中的数字均不含头部。
pub fn ensure_capacity(carrier_len: u64, layout: &FrameLayout) -> Result<()> {
    if check_capacity(carrier_len, layout) {
        return Ok(());
    }

    Err(StegoError::CapacityExceeded {
        required: layout.required_carrier_bytes() - layout.header_size as u64,
        available: carrier_len.saturating_sub(layout.header_size as u64),
    })
}
