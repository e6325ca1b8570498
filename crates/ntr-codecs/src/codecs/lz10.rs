#![cfg(feature = "lz")]

use ntr_core::errors::{DecodeErrors, EncodeErrors};
use ntr_core::options::CodecOptions;
use ntr_lz::{probe_lz10, Lz10Decoder, Lz10Encoder};

use crate::traits::CodecTrait;

/// The forward LZ codec, magic `0x10`.
pub struct Lz10Codec
{
    options: CodecOptions
}

impl Lz10Codec
{
    pub fn new() -> Lz10Codec
    {
        Lz10Codec::new_with_options(CodecOptions::default())
    }
    pub const fn new_with_options(options: CodecOptions) -> Lz10Codec
    {
        Lz10Codec { options }
    }
}

impl Default for Lz10Codec
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl CodecTrait for Lz10Codec
{
    fn short_name(&self) -> &'static str
    {
        "LZ10"
    }
    fn description(&self) -> &'static str
    {
        "Forward LZ format used in both GBA and NDS games"
    }
    fn flag(&self) -> &'static str
    {
        "lz10"
    }
    fn supports(&self, data: &[u8]) -> bool
    {
        probe_lz10(data)
    }
    fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>, DecodeErrors>
    {
        Lz10Decoder::new_with_options(self.options, data).decode()
    }
    fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, EncodeErrors>
    {
        Lz10Encoder::new_with_options(self.options, data).encode()
    }
    fn parse_options(&mut self, args: &[&str]) -> usize
    {
        if args.first() == Some(&"-opt")
        {
            self.options = self.options.set_lookahead(true);
            return 1;
        }
        0
    }
}
