//! # 命令处理逻辑模块
//!
//! 包含处理 `encode` 和 `decode` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用帧编解码器以及向用户报告结果。

use crate::cli::{DecodeArgs, EncodeArgs};
use crate::codec::{Frame, FrameCodec, Operation};
use crate::config::StegoConfig;
use crate::constants::{DEFAULT_OUTPUT_STEM, DEFAULT_STEGO_NAME};
use crate::error::{Field, StegoError};
use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// 一次成功操作的结果，用于向用户展示。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub operation: Operation,
    /// 生成的输出文件路径。
    pub output: PathBuf,
    /// 隐藏或恢复的文件字节数。
    pub bytes: usize,
}

/// 处理 'Encode' 命令的执行逻辑。
///
/// 负责读取载体图像和待隐藏文件、在创建输出文件之前检查容量、调用编码器，
/// 编码失败时删除不完整的输出文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `EncodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体或输出路径不是 `.bmp` 文件，或输出文件已存在且未指定 `--force`。
/// * 无法读取载体图像或待隐藏文件。
/// * 载体容量不足以容纳整个帧。
/// * 写入输出图像的过程中失败。
pub fn handle_encode(args: EncodeArgs) -> Result<Report> {
    anyhow::ensure!(
        has_bmp_extension(&args.image),
        "Carrier image must be a .bmp file: {}",
        args.image.to_string_lossy().red().bold()
    );

    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| args.image.with_file_name(DEFAULT_STEGO_NAME));

    anyhow::ensure!(
        has_bmp_extension(&dest),
        "Output image must be a .bmp file: {}",
        dest.to_string_lossy().red().bold()
    );
    anyhow::ensure!(
        !is_same_file(&args.image, &dest),
        "Output image must differ from the carrier image: {}",
        dest.to_string_lossy().red().bold()
    );
    ensure_writable(&dest, args.force)?;

    let secret_len = fs::metadata(&args.secret)
        .with_context(|| {
            format!(
                "Unable to read secret file: {}",
                args.secret.to_string_lossy().red().bold()
            )
        })?
        .len();
    let max_payload = args.max_payload.min(u32::MAX as usize);
    if secret_len > max_payload as u64 {
        let err = StegoError::FieldTooLarge {
            field: Field::Payload,
            size: usize::try_from(secret_len).unwrap_or(usize::MAX),
            max: max_payload,
        };
        return Err(explain(err, Operation::Encode));
    }

    let payload = fs::read(&args.secret).with_context(|| {
        format!(
            "Unable to read secret file: {}",
            args.secret.to_string_lossy().red().bold()
        )
    })?;
    // 扩展名连同前导 `.` 一起隐藏，例如 ".txt"。
    let extension = args
        .secret
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    info!(
        "secret file has {} bytes, extension {:?}",
        payload.len(),
        extension
    );
    let frame = Frame::new(extension, payload);

    let carrier = File::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    let carrier_len = carrier.metadata()?.len();

    let codec = FrameCodec::with_config(
        StegoConfig::default().with_max_payload_size(args.max_payload),
    );

    // 容量不足时不能创建 (或截断) 输出文件。
    codec
        .plan(&frame, carrier_len)
        .map_err(|err| explain(err, Operation::Encode))?;

    let output = File::create(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    let result = codec.encode(
        &frame,
        BufReader::new(carrier),
        carrier_len,
        BufWriter::new(output),
    );

    if let Err(err) = result {
        warn!("encoding failed, removing partial output {}", dest.display());
        if let Err(remove_err) = fs::remove_file(&dest) {
            warn!("could not remove {}: {remove_err}", dest.display());
        }
        return Err(explain(err, Operation::Encode));
    }

    println!(
        "The file has been successfully hidden ({} bytes) and saved: {}",
        frame.payload.len().to_string().green(),
        dest.to_string_lossy().green().bold()
    );

    Ok(Report {
        operation: Operation::Encode,
        output: dest,
        bytes: frame.payload.len(),
    })
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像、验证魔数并恢复扩展名和数据，
/// 最后将数据写入以恢复的扩展名命名的输出文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `DecodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输入路径不是 `.bmp` 文件或无法读取。
/// * 图像中没有可识别的魔数，或声明的长度超出上限、超出载体长度。
/// * 恢复的扩展名无法安全地用作文件名。
/// * 输出文件已存在且未指定 `--force`，或无法写入。
pub fn handle_decode(args: DecodeArgs) -> Result<Report> {
    anyhow::ensure!(
        has_bmp_extension(&args.image),
        "Stego image must be a .bmp file: {}",
        args.image.to_string_lossy().red().bold()
    );

    let carrier = File::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let codec = FrameCodec::with_config(
        StegoConfig::default().with_max_payload_size(args.max_payload),
    );
    let frame = codec
        .decode(BufReader::new(carrier))
        .map_err(|err| explain(err, Operation::Decode))
        .with_context(|| {
            format!(
                "Failed to recover a hidden file from '{}'.",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    let extension =
        parse_extension(&frame.extension).map_err(|err| explain(err, Operation::Decode))?;
    info!(
        "recovered {} bytes with extension {:?}",
        frame.payload.len(),
        extension
    );

    let output = resolve_output_path(args.output.as_deref(), &args.image, &extension);
    ensure_writable(&output, args.force)?;

    fs::write(&output, &frame.payload).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            output.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The file has been successfully recovered ({} bytes) and saved: {}",
        frame.payload.len().to_string().green(),
        output.to_string_lossy().green().bold()
    );

    Ok(Report {
        operation: Operation::Decode,
        output,
        bytes: frame.payload.len(),
    })
}

/// 校验恢复出的扩展名：去掉可选的前导 `.`，拒绝非 UTF-8、路径分隔符和 NUL。
pub fn parse_extension(raw: &[u8]) -> Result<String, StegoError> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| StegoError::InvalidExtension("not valid UTF-8".to_string()))?;
    let text = text.strip_prefix('.').unwrap_or(text);

    if text.contains(['/', '\\', '\0']) || text.contains("..") {
        return Err(StegoError::InvalidExtension(format!("{text:?}")));
    }

    Ok(text.to_string())
}

/// 计算恢复文件的输出路径。
///
/// 用户给出的文件名在第一个 `.` 处截断，再拼接恢复的扩展名；
/// 未给出时使用图像同目录下的 `output`。
pub fn resolve_output_path(requested: Option<&Path>, image: &Path, extension: &str) -> PathBuf {
    let (dir, stem) = match requested {
        Some(path) => {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let stem = name.split('.').next().unwrap_or_default().to_string();
            (path.parent().map(Path::to_path_buf), stem)
        }
        None => (image.parent().map(Path::to_path_buf), String::new()),
    };

    let stem = if stem.is_empty() {
        DEFAULT_OUTPUT_STEM.to_string()
    } else {
        stem
    };
    let file_name = if extension.is_empty() {
        stem
    } else {
        format!("{stem}.{extension}")
    };

    match dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// 路径是否以 `.bmp` 结尾 (不区分大小写)。
pub fn has_bmp_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// 把核心错误包装成面向用户的错误，指出是哪一项检查失败。
fn explain(err: StegoError, operation: Operation) -> anyhow::Error {
    let category = err.category();
    let verb = match operation {
        Operation::Encode => "Encoding",
        Operation::Decode => "Decoding",
    };
    anyhow::Error::new(err).context(format!(
        "{} failed ({}).",
        verb,
        category.to_string().red().bold()
    ))
}
