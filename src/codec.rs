//! # 帧编解码模块
//!
//! 隐藏在载体中的帧由五个字段按固定顺序组成：
//!
//! ```text
//! ┌──────────┬──────────────┬──────────┬──────────────┬──────────┐
//! │ Magic    │ Extn length  │ Extn     │ Data length  │ Data     │
//! │ (N bytes)│ (u32, MSB)   │ (L bytes)│ (u32, MSB)   │ (M bytes)│
//! └──────────┴──────────────┴──────────┴──────────────┴──────────┘
//! ```
//!
//! 每个字节占 8 个载体字节，每个 `u32` 占 32 个载体字节。
//! 帧之后的载体字节原样保留。

use std::io::{Read, Write};

use log::{debug, info, warn};

use crate::capacity::{FrameLayout, ensure_capacity};
use crate::carrier::{
    BmpGeometry, CarrierReader, CarrierWriter, copy_header, copy_remainder, has_bmp_signature,
};
use crate::config::StegoConfig;
use crate::constants::{CARRIER_BYTES_PER_BYTE, CARRIER_BYTES_PER_INT};
use crate::error::{Field, Result, StegoError};
use crate::steganography::{pack_byte, pack_u32, unpack_byte, unpack_u32};

/// 操作方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encode,
    Decode,
}

/// 隐藏在载体中的文件：扩展名与原始字节。
///
/// 编码时作为输入，解码时作为输出。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub extension: Vec<u8>,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(extension: impl Into<Vec<u8>>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            extension: extension.into(),
            payload: payload.into(),
        }
    }

    /// 该帧在给定配置下的载体布局。
    pub fn layout(&self, config: &StegoConfig) -> FrameLayout {
        FrameLayout {
            header_size: config.header_size,
            magic_len: config.magic.len(),
            extension_len: self.extension.len(),
            payload_len: self.payload.len(),
        }
    }
}

/// 一次成功编码的统计信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    /// 写入的帧字节数 (魔数、长度字段、扩展名与数据)。
    pub frame_bytes: u64,
    /// 输出载体的总字节数。
    pub carrier_bytes: u64,
    /// 帧之后原样复制的载体字节数。
    pub remainder_bytes: u64,
}

/// LSB 帧编解码器。
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    config: StegoConfig,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StegoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StegoConfig {
        &self.config
    }

    /// 将 `frame` 隐藏到载体中，并把结果写到 `sink`。
    ///
    /// 容量检查先于任何写入；检查失败时 `sink` 不会收到任何字节。
    ///
    /// # Arguments
    ///
    /// * `frame` - 要隐藏的扩展名和数据。
    /// * `carrier` - 定位在文件开头的载体源。
    /// * `carrier_len` - 载体总字节数 (含头部)。
    /// * `sink` - 输出载体。
    ///
    /// # Errors
    ///
    /// * 扩展名或数据超过配置上限时返回 `FieldTooLarge`。
    /// * 载体容量不足时返回 `CapacityExceeded`。
    /// * 读写过程中出错时返回 `ShortRead`、`ShortWrite` 或 `Io`，此时输出内容不可用。
    pub fn encode<R: Read, W: Write>(
        &self,
        frame: &Frame,
        carrier: R,
        carrier_len: u64,
        sink: W,
    ) -> Result<EncodeSummary> {
        let layout = self.plan(frame, carrier_len)?;
        info!(
            "carrier has {} bytes, frame needs {}",
            carrier_len,
            layout.required_carrier_bytes()
        );

        let mut source = CarrierReader::new(carrier);
        let mut sink = CarrierWriter::new(sink);

        let header = copy_header(&mut source, &mut sink, self.config.header_size)?;
        log_geometry(&header);

        write_bytes(&self.config.magic, &mut source, &mut sink)?;
        debug!("magic marker written");

        write_u32(frame.extension.len() as u32, &mut source, &mut sink)?;
        write_bytes(&frame.extension, &mut source, &mut sink)?;
        debug!("extension written ({} bytes)", frame.extension.len());

        write_u32(frame.payload.len() as u32, &mut source, &mut sink)?;
        write_bytes(&frame.payload, &mut source, &mut sink)?;
        debug!("payload written ({} bytes)", frame.payload.len());

        let remaining = carrier_len.saturating_sub(source.position());
        let remainder_bytes = copy_remainder(&mut source, &mut sink, remaining)?;
        sink.flush()?;
        debug!("{remainder_bytes} remaining carrier bytes copied");

        Ok(EncodeSummary {
            frame_bytes: layout.frame_bytes(),
            carrier_bytes: sink.position(),
            remainder_bytes,
        })
    }

    /// 在写入任何字节之前校验字段上限与载体容量，返回帧的布局。
    ///
    /// # Errors
    ///
    /// 返回 `FieldTooLarge` 或 `CapacityExceeded`。
    pub fn plan(&self, frame: &Frame, carrier_len: u64) -> Result<FrameLayout> {
        self.check_bound(Field::Extension, frame.extension.len())?;
        self.check_bound(Field::Payload, frame.payload.len())?;

        let layout = frame.layout(&self.config);
        ensure_capacity(carrier_len, &layout)?;
        Ok(layout)
    }

    /// 对内存中的载体编码，返回新的载体。
    pub fn encode_to_vec(&self, frame: &Frame, carrier: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(carrier.len());
        self.encode(frame, carrier, carrier.len() as u64, &mut out)?;
        Ok(out)
    }

    /// 从载体中恢复隐藏的帧。
    ///
    /// 魔数不匹配时立即失败，不会读取或分配后续字段。
    /// 解码不做容量预检查：载体比帧声明的长度短时自然地以 `ShortRead` 失败。
    ///
    /// # Errors
    ///
    /// * 魔数不匹配时返回 `MagicMismatch`。
    /// * 声明的长度超过配置上限时返回 `FieldTooLarge`。
    /// * 缓冲区分配失败时返回 `AllocationFailure`。
    /// * 载体提前结束时返回 `ShortRead`。
    pub fn decode<R: Read>(&self, carrier: R) -> Result<Frame> {
        let mut source = CarrierReader::new(carrier);
        source.skip(self.config.header_size)?;

        let mut magic = Vec::with_capacity(self.config.magic.len());
        read_bytes_into(&mut magic, self.config.magic.len(), &mut source)?;
        if magic != self.config.magic {
            warn!("magic marker mismatch, carrier holds no hidden file");
            return Err(StegoError::MagicMismatch);
        }
        debug!("magic marker verified");

        let extension = self.read_field(Field::Extension, &mut source)?;
        debug!("extension read ({} bytes)", extension.len());

        let payload = self.read_field(Field::Payload, &mut source)?;
        debug!(
            "payload read ({} bytes), frame ends at carrier offset {}",
            payload.len(),
            source.position()
        );

        Ok(Frame { extension, payload })
    }

    fn max_len(&self, field: Field) -> usize {
        let max = match field {
            Field::Extension => self.config.max_extension_len,
            Field::Payload => self.config.max_payload_size,
        };
        max.min(u32::MAX as usize)
    }

    fn check_bound(&self, field: Field, size: usize) -> Result<()> {
        let max = self.max_len(field);
        if size > max {
            return Err(StegoError::FieldTooLarge { field, size, max });
        }
        Ok(())
    }

    /// 读取一个长度字段，校验上限后再读取对应的字节。
    fn read_field<R: Read>(&self, field: Field, source: &mut CarrierReader<R>) -> Result<Vec<u8>> {
        let size = read_u32(source)? as usize;
        self.check_bound(field, size)?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(size)
            .map_err(|_| StegoError::AllocationFailure { field, size })?;
        read_bytes_into(&mut buf, size, source)?;
        Ok(buf)
    }
}

fn log_geometry(header: &[u8]) {
    if !has_bmp_signature(header) {
        warn!("carrier header lacks the BM signature, treating it as opaque");
        return;
    }
    if let Some(geometry) = BmpGeometry::parse(header) {
        info!(
            "image dimensions: width = {}, height = {}, {} bpp, {} pixel bytes",
            geometry.width,
            geometry.height,
            geometry.bits_per_pixel,
            geometry.pixel_bytes()
        );
    }
}

fn write_bytes<R: Read, W: Write>(
    data: &[u8],
    source: &mut CarrierReader<R>,
    sink: &mut CarrierWriter<W>,
) -> Result<()> {
    let mut window = [0u8; CARRIER_BYTES_PER_BYTE];
    for &byte in data {
        source.read_window(&mut window)?;
        pack_byte(byte, &mut window);
        sink.write_window(&window)?;
    }
    Ok(())
}

fn write_u32<R: Read, W: Write>(
    value: u32,
    source: &mut CarrierReader<R>,
    sink: &mut CarrierWriter<W>,
) -> Result<()> {
    let mut window = [0u8; CARRIER_BYTES_PER_INT];
    source.read_window(&mut window)?;
    pack_u32(value, &mut window);
    sink.write_window(&window)
}

fn read_bytes_into<R: Read>(
    out: &mut Vec<u8>,
    len: usize,
    source: &mut CarrierReader<R>,
) -> Result<()> {
    let mut window = [0u8; CARRIER_BYTES_PER_BYTE];
    for _ in 0..len {
        source.read_window(&mut window)?;
        out.push(unpack_byte(&window));
    }
    Ok(())
}

fn read_u32<R: Read>(source: &mut CarrierReader<R>) -> Result<u32> {
    let mut window = [0u8; CARRIER_BYTES_PER_INT];
    source.read_window(&mut window)?;
    Ok(unpack_u32(&window))
}
