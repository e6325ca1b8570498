#![cfg(feature = "lz")]

use ntr_core::errors::{DecodeErrors, EncodeErrors};
use ntr_core::options::CodecOptions;
use ntr_lz::{probe_lz11, Lz11Decoder, Lz11Encoder};

use crate::traits::CodecTrait;

/// The extended forward LZ codec, magic `0x11`.
pub struct Lz11Codec
{
    options: CodecOptions
}

impl Lz11Codec
{
    pub fn new() -> Lz11Codec
    {
        Lz11Codec::new_with_options(CodecOptions::default())
    }
    pub const fn new_with_options(options: CodecOptions) -> Lz11Codec
    {
        Lz11Codec { options }
    }
}

impl Default for Lz11Codec
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl CodecTrait for Lz11Codec
{
    fn short_name(&self) -> &'static str
    {
        "LZ11"
    }
    fn description(&self) -> &'static str
    {
        "Extended forward LZ format with longer matches, used in NDS games"
    }
    fn flag(&self) -> &'static str
    {
        "lz11"
    }
    fn supports(&self, data: &[u8]) -> bool
    {
        probe_lz11(data)
    }
    fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>, DecodeErrors>
    {
        Lz11Decoder::new_with_options(self.options, data).decode()
    }
    fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, EncodeErrors>
    {
        Lz11Encoder::new_with_options(self.options, data).encode()
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
