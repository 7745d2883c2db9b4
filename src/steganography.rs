//! # LSB 比特打包模块
//!
//! 每个载体字节只替换最低有效位，高 7 位保持不变。
//! 数值按最高位优先的顺序写入：第 0 个载体字节保存数值的最高位。

use crate::constants::{CARRIER_BYTES_PER_BYTE, CARRIER_BYTES_PER_INT};

/// 把 `value` 的低 `window.len()` 位按最高位优先写入 `window` 各字节的最低位。
fn pack_bits(value: u32, window: &mut [u8]) {
    let width = window.len();
    for (i, byte) in window.iter_mut().enumerate() {
        let bit = ((value >> (width - 1 - i)) & 1) as u8;
        *byte = (*byte & 0xFE) | bit;
    }
}

fn unpack_bits(window: &[u8]) -> u32 {
    window
        .iter()
        .fold(0u32, |acc, &byte| (acc << 1) | u32::from(byte & 1))
}

/// 将一个字节隐藏到 8 个载体字节中。
///
/// `value` 的第 7 位写入 `window[0]`，第 0 位写入 `window[7]`。
pub fn pack_byte(value: u8, window: &mut [u8; CARRIER_BYTES_PER_BYTE]) {
    pack_bits(u32::from(value), window);
}

/// 从 8 个载体字节中恢复一个字节。
pub fn unpack_byte(window: &[u8; CARRIER_BYTES_PER_BYTE]) -> u8 {
    unpack_bits(window) as u8
}

/// 将一个 `u32` 隐藏到 32 个载体字节中，最高位写入 `window[0]`。
pub fn pack_u32(value: u32, window: &mut [u8; CARRIER_BYTES_PER_INT]) {
    pack_bits(value, window);
}

/// 从 32 个载体字节中恢复一个 `u32`。
pub fn unpack_u32(window: &[u8; CARRIER_BYTES_PER_INT]) -> u32 {
    unpack_bits(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_byte_writes_msb_first() {
        let mut window = [0u8; 8];
        pack_byte(0b1000_0001, &mut window);
        assert_eq!(window, [1, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn pack_byte_only_touches_lsb() {
        let mut window = [0xFF, 0xFE, 0x80, 0x7F, 0x00, 0x55, 0xAA, 0x01];
        let before = window;
        pack_byte(0x5A, &mut window);
        for (old, new) in before.iter().zip(window.iter()) {
            assert_eq!(old & 0xFE, new & 0xFE);
        }
        assert_eq!(unpack_byte(&window), 0x5A);
    }

    #[test]
    fn pack_u32_places_bit_31_first() {
        let mut window = [0u8; 32];
        pack_u32(0x8000_0000, &mut window);
        assert_eq!(window[0], 1);
        assert!(window[1..].iter().all(|&b| b == 0));
        assert_eq!(unpack_u32(&window), 0x8000_0000);
    }
}
