#![cfg(feature = "lz")]

use ntr_core::errors::{DecodeErrors, EncodeErrors};
use ntr_core::options::CodecOptions;
use ntr_lz::{probe_lzovl, LzOvlDecoder};

use crate::traits::CodecTrait;

/// The end-of-file LZ codec used by overlay binaries.
///
/// Decode only; the format is written back to front and no encoder
/// ships here.
pub struct LzOvlCodec
{
    options: CodecOptions
}

impl LzOvlCodec
{
    pub fn new() -> LzOvlCodec
    {
        LzOvlCodec::new_with_options(CodecOptions::default())
    }
    pub const fn new_with_options(options: CodecOptions) -> LzOvlCodec
    {
        LzOvlCodec { options }
    }
}

impl Default for LzOvlCodec
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl CodecTrait for LzOvlCodec
{
    fn short_name(&self) -> &'static str
    {
        "LZ-Ovl"
    }
    fn description(&self) -> &'static str
    {
        "Backwards LZ format used in NDS overlay files and the main program binary"
    }
    fn flag(&self) -> &'static str
    {
        "lzovl"
    }
    fn supports_compress(&self) -> bool
    {
        false
    }
    fn supports(&self, data: &[u8]) -> bool
    {
        probe_lzovl(data)
    }
    fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>, DecodeErrors>
    {
        LzOvlDecoder::new_with_options(self.options, data).decode()
    }
    fn compress(&mut self, _data: &[u8]) -> Result<Vec<u8>, EncodeErrors>
    {
        Err(EncodeErrors::Unsupported("LZ-Ovl"))
    }
    fn parse_options(&mut self, args: &[&str]) -> usize
    {
        // accepted for uniformity with the other LZ codecs even
        // though nothing here encodes
        if args.first() == Some(&"-opt")
        {
            self.options = self.options.set_lookahead(true);
            return 1;
        }
        0
    }
}
