#![cfg(feature = "huffman")]

use ntr_core::errors::{DecodeErrors, EncodeErrors};
use ntr_core::options::CodecOptions;
use ntr_huffman::{probe_huffman, BlockSize, HuffDecoder, HuffEncoder};

use crate::traits::CodecTrait;

/// The Huffman codec over 4-bit symbols, magic `0x24`.
pub struct Huffman4Codec
{
    options: CodecOptions
}

/// The Huffman codec over 8-bit symbols, magic `0x28`.
pub struct Huffman8Codec
{
    options: CodecOptions
}

macro_rules! huffman_codec {
    ($name:tt,$block_size:expr,$short_name:expr,$description:expr,$flag:expr) => {
        impl $name
        {
            pub fn new() -> $name
            {
                $name::new_with_options(CodecOptions::default())
            }
            pub const fn new_with_options(options: CodecOptions) -> $name
            {
                $name { options }
            }
        }

        impl Default for $name
        {
            fn default() -> Self
            {
                Self::new()
            }
        }

        impl CodecTrait for $name
        {
            fn short_name(&self) -> &'static str
            {
                $short_name
            }
            fn description(&self) -> &'static str
            {
                $description
            }
            fn flag(&self) -> &'static str
            {
                $flag
            }
            fn supports(&self, data: &[u8]) -> bool
            {
                probe_huffman(data, $block_size)
            }
            fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>, DecodeErrors>
            {
                HuffDecoder::new_with_options(self.options, data, $block_size).decode()
            }
            fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, EncodeErrors>
            {
                HuffEncoder::new(data, $block_size).encode()
            }
        }
    };
}

huffman_codec!(
    Huffman4Codec,
    BlockSize::Four,
    "Huffman-4",
    "Huffman format over 4-bit symbols, used in both GBA and NDS games",
    "huff4"
);
huffman_codec!(
    Huffman8Codec,
    BlockSize::Eight,
    "Huffman-8",
    "Huffman format over 8-bit symbols, used in both GBA and NDS games",
    "huff8"
);
