#![cfg(feature = "rle")]

use ntr_core::errors::{DecodeErrors, EncodeErrors};
use ntr_core::options::CodecOptions;
use ntr_rle::{probe_rle, RleDecoder, RleEncoder};

use crate::traits::CodecTrait;

/// The run-length codec, magic `0x30`.
pub struct RleCodec
{
    options: CodecOptions
}

impl RleCodec
{
    pub fn new() -> RleCodec
    {
        RleCodec::new_with_options(CodecOptions::default())
    }
    pub const fn new_with_options(options: CodecOptions) -> RleCodec
    {
        RleCodec { options }
    }
}

impl Default for RleCodec
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl CodecTrait for RleCodec
{
    fn short_name(&self) -> &'static str
    {
        "RLE"
    }
    fn description(&self) -> &'static str
    {
        "Run-length format used in both GBA and NDS games"
    }
    fn flag(&self) -> &'static str
    {
        "rle"
    }
    fn supports(&self, data: &[u8]) -> bool
    {
        probe_rle(data)
    }
    fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>, DecodeErrors>
    {
        RleDecoder::new_with_options(self.options, data).decode()
    }
    fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, EncodeErrors>
    {
        RleEncoder::new(data).encode()
    }
}
