//! # 载体 I/O 模块
//!
//! 以纯顺序的方式读取载体字节、写出修改后的载体。
//! 除了开头跳过 (或复制) 头部之外不需要任何随机访问。

use std::io::{self, ErrorKind, Read, Write};

use crate::error::{Result, StegoError};

/// 顺序读取载体字节的游标。
pub struct CarrierReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> CarrierReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// 已经从载体中读取的字节数。
    pub fn position(&self) -> u64 {
        self.position
    }

    /// 读满 `buf`，载体提前结束时返回 [`StegoError::ShortRead`]。
    pub fn read_window(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(StegoError::ShortRead {
                        needed: buf.len(),
                        available: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(StegoError::Io(err)),
            }
        }
        self.position += filled as u64;
        Ok(())
    }

    /// 跳过 `len` 个字节 (解码时用于跳过头部)。
    pub fn skip(&mut self, len: usize) -> Result<()> {
        let skipped = io::copy(&mut self.inner.by_ref().take(len as u64), &mut io::sink())?;
        self.position += skipped;
        if skipped < len as u64 {
            return Err(StegoError::ShortRead {
                needed: len,
                available: skipped as usize,
            });
        }
        Ok(())
    }
}

/// 顺序写出载体字节的游标。
pub struct CarrierWriter<W> {
    inner: W,
    position: u64,
}

impl<W: Write> CarrierWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// 已经写出的字节数。
    pub fn position(&self) -> u64 {
        self.position
    }

    /// 完整写出 `buf`，输出端不再接收数据时返回 [`StegoError::ShortWrite`]。
    pub fn write_window(&mut self, buf: &[u8]) -> Result<()> {
        match self.inner.write_all(buf) {
            Ok(()) => {
                self.position += buf.len() as u64;
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::WriteZero => Err(StegoError::ShortWrite {
                expected: buf.len() as u64,
            }),
            Err(err) => Err(StegoError::Io(err)),
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

/// 将头部原样从源复制到输出，返回复制的头部内容。
pub fn copy_header<R: Read, W: Write>(
    source: &mut CarrierReader<R>,
    sink: &mut CarrierWriter<W>,
    header_size: usize,
) -> Result<Vec<u8>> {
    let mut header = vec![0u8; header_size];
    source.read_window(&mut header)?;
    sink.write_window(&header)?;
    Ok(header)
}

/// 将源中剩余的所有字节原样复制到输出，返回复制的字节数。
///
/// `remaining` 是预期还要复制的字节数，输出端提前满时随 `ShortWrite` 一起报告。
pub fn copy_remainder<R: Read, W: Write>(
    source: &mut CarrierReader<R>,
    sink: &mut CarrierWriter<W>,
    remaining: u64,
) -> Result<u64> {
    let copied = match io::copy(&mut source.inner, &mut sink.inner) {
        Ok(n) => n,
        Err(err) if err.kind() == ErrorKind::WriteZero => {
            return Err(StegoError::ShortWrite {
                expected: remaining,
            });
        }
        Err(err) => return Err(StegoError::Io(err)),
    };
    source.position += copied;
    sink.position += copied;
    Ok(copied)
}

/// 从 54 字节的 BMP 头部中解析出的图像几何信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpGeometry {
    pub width: i32,
    pub height: i32,
    pub bits_per_pixel: u16,
}

impl BmpGeometry {
    /// 头部长度不足 30 字节时返回 `None`。
    pub fn parse(header: &[u8]) -> Option<Self> {
        let width = i32::from_le_bytes(header.get(18..22)?.try_into().ok()?);
        let height = i32::from_le_bytes(header.get(22..26)?.try_into().ok()?);
        let bits_per_pixel = u16::from_le_bytes(header.get(28..30)?.try_into().ok()?);
        Some(Self {
            width,
            height,
            bits_per_pixel,
        })
    }

    /// 像素数据的理论字节数 (不含行填充)。
    pub fn pixel_bytes(&self) -> u64 {
        let bytes_per_pixel = u64::from(self.bits_per_pixel).div_ceil(8);
        u64::from(self.width.unsigned_abs()) * u64::from(self.height.unsigned_abs()) * bytes_per_pixel
    }
}

/// 头部是否以 `BM` 签名开头。
pub fn has_bmp_signature(header: &[u8]) -> bool {
    header.starts_with(b"BM")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_window_reports_short_read() {
        let mut reader = CarrierReader::new(Cursor::new(vec![1u8, 2, 3]));
        let mut buf = [0u8; 8];
        match reader.read_window(&mut buf) {
            Err(StegoError::ShortRead { needed, available }) => {
                assert_eq!(needed, 8);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn write_window_reports_short_write() {
        let mut storage = [0u8; 4];
        let mut writer = CarrierWriter::new(&mut storage[..]);
        assert!(matches!(
            writer.write_window(&[9u8; 8]),
            Err(StegoError::ShortWrite { expected: 8 })
        ));
    }

    #[test]
    fn geometry_is_read_from_header() {
        let mut header = [0u8; 54];
        header[..2].copy_from_slice(b"BM");
        header[18..22].copy_from_slice(&100i32.to_le_bytes());
        header[22..26].copy_from_slice(&(-20i32).to_le_bytes());
        header[28..30].copy_from_slice(&24u16.to_le_bytes());

        let geometry = BmpGeometry::parse(&header).expect("header is long enough");
        assert_eq!(geometry.width, 100);
        assert_eq!(geometry.height, -20);
        assert_eq!(geometry.pixel_bytes(), 6000);
        assert!(has_bmp_signature(&header));
        assert!(BmpGeometry::parse(&header[..20]).is_none());
    }
}
