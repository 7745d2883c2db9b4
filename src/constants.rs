/// BMP 文件的标准头部大小 (字节)。
/// 隐写操作将跳过这个头部，从像素数据开始。
pub const BMP_HEADER_SIZE: usize = 54;

/// 写入载体最前面的魔数标记，解码时用它确认图像中确实藏有数据。
pub const MAGIC_STRING: &[u8] = b"#*";

/// 扩展名长度字段与数据长度字段都按 `u32` 存储，占 4 字节。
pub const INT_FIELD_SIZE: usize = 4;

/// 每个像素字节只存 1 bit，因此隐藏 1 字节需要 8 个像素字节。
pub const CARRIER_BYTES_PER_BYTE: usize = 8;

/// 隐藏一个 `u32` 需要 32 个像素字节。
pub const CARRIER_BYTES_PER_INT: usize = INT_FIELD_SIZE * CARRIER_BYTES_PER_BYTE;

/// 默认允许隐藏/恢复的最大数据长度：16 MiB。
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// 默认允许的最大扩展名长度。
pub const DEFAULT_MAX_EXTENSION: usize = 255;

/// 未指定输出路径时，隐写图像的默认文件名。
pub const DEFAULT_STEGO_NAME: &str = "stego.bmp";

/// 未指定输出路径时，恢复文件的默认文件名主干 (扩展名取自隐藏数据)。
pub const DEFAULT_OUTPUT_STEM: &str = "output";
