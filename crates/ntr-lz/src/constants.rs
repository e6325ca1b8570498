//! Format constants shared by the LZ codecs

/// Magic byte of the forward LZ format.
pub const LZ10_MAGIC: u8 = 0x10;
/// Magic byte of the extended forward LZ format.
pub const LZ11_MAGIC: u8 = 0x11;

/// Sliding-window size of the forward formats.
///
/// A back-reference can never look further back than this many bytes.
pub const LZ_WINDOW_SIZE: usize = 0x1000;

/// Shortest back-reference either forward format can express.
pub const LZ_MIN_MATCH: usize = 3;

/// Longest back-reference the 0x10 format can express.
pub const LZ10_MAX_MATCH: usize = 0xF + 3;

/// Longest back-reference of the two-byte 0x11 form.
pub const LZ11_SHORT_MATCH_MAX: usize = 0xF + 1;
/// Longest back-reference of the three-byte 0x11 form.
pub const LZ11_MEDIUM_MATCH_MAX: usize = 0xFF + 0x11;
/// Longest back-reference of the four-byte 0x11 form.
pub const LZ11_MAX_MATCH: usize = 0xFFFF + 0x111;

/// Largest input length the 24-bit header size field can hold.
pub const MAX_ENCODE_LENGTH: usize = 0xFF_FFFF;

/// Bit cost of a literal block in either forward format.
pub const LITERAL_BITS: u32 = 9;
/// Bit cost of a two-byte back-reference block.
pub const SHORT_MATCH_BITS: u32 = 17;
/// Bit cost of a three-byte back-reference block.
pub const MEDIUM_MATCH_BITS: u32 = 25;
/// Bit cost of a four-byte back-reference block.
pub const LONG_MATCH_BITS: u32 = 33;
