/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Entry point for all supported codecs the library understands
//!
//! [`CompressionFormat`] names every format, sniffs streams by magic
//! byte and hands out boxed codecs. The free functions at the bottom
//! are the convenience surface: guess-and-decode, encode-to-format,
//! enumerate codecs, look one up by its command-line flag.
#![allow(unused_imports, unused_variables)]

use log::trace;
use ntr_core::options::CodecOptions;

use crate::composite::CompositeCodec;
use crate::errors::CodecErrors;
use crate::traits::CodecTrait;

#[cfg(feature = "huffman")]
pub mod huffman;
#[cfg(feature = "lz")]
pub mod lz10;
#[cfg(feature = "lz")]
pub mod lz11;
#[cfg(feature = "lz")]
pub mod lzovl;
pub mod null;
#[cfg(feature = "rle")]
pub mod rle;

/// All supported compression formats
///
/// This enum contains all formats the library understands, whether
/// or not their codec features are compiled in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum CompressionFormat
{
    /// Forward LZ, magic `0x10`
    Lz10,
    /// Extended forward LZ, magic `0x11`
    Lz11,
    /// End-of-file LZ used by overlay binaries, no magic
    LzOverlay,
    /// Run-length, magic `0x30`
    Rle,
    /// Huffman with 4-bit symbols, magic `0x24`
    Huffman4,
    /// Huffman with 8-bit symbols, magic `0x28`
    Huffman8,
    /// Stored verbatim behind a length header, magic `0x00`
    Null,
    /// Any unknown format
    Unknown
}

impl CompressionFormat
{
    /// Guess the format of a stream from its header bytes.
    ///
    /// The overlay format has no magic and its trailer check is the
    /// loosest, so it is probed last.
    pub fn guess_format(data: &[u8]) -> Option<CompressionFormat>
    {
        if data.len() < 4
        {
            return None;
        }

        #[cfg(feature = "lz")]
        {
            if ntr_lz::probe_lz10(data)
            {
                return Some(CompressionFormat::Lz10);
            }
            if ntr_lz::probe_lz11(data)
            {
                return Some(CompressionFormat::Lz11);
            }
        }
        #[cfg(feature = "rle")]
        {
            if ntr_rle::probe_rle(data)
            {
                return Some(CompressionFormat::Rle);
            }
        }
        #[cfg(feature = "huffman")]
        {
            if ntr_huffman::probe_huffman(data, ntr_huffman::BlockSize::Four)
            {
                return Some(CompressionFormat::Huffman4);
            }
            if ntr_huffman::probe_huffman(data, ntr_huffman::BlockSize::Eight)
            {
                return Some(CompressionFormat::Huffman8);
            }
        }
        if null::probe_null(data)
        {
            return Some(CompressionFormat::Null);
        }
        #[cfg(feature = "lz")]
        {
            if ntr_lz::probe_lzovl(data)
            {
                return Some(CompressionFormat::LzOverlay);
            }
        }

        None
    }

    /// Map a command-line flag to its format.
    ///
    /// Composite flags name codec groups rather than formats and
    /// resolve through [`codec_by_flag`] instead.
    pub fn from_flag(flag: &str) -> Option<CompressionFormat>
    {
        match flag
        {
            "lz10" => Some(CompressionFormat::Lz10),
            "lz11" => Some(CompressionFormat::Lz11),
            "lzovl" => Some(CompressionFormat::LzOverlay),
            "rle" => Some(CompressionFormat::Rle),
            "huff4" => Some(CompressionFormat::Huffman4),
            "huff8" => Some(CompressionFormat::Huffman8),
            "null" => Some(CompressionFormat::Null),
            _ => None
        }
    }

    /// Return true if a codec able to decode this format is present.
    pub fn has_decoder(self) -> bool
    {
        self.get_codec()
            .map(|codec| codec.supports_decompress())
            .unwrap_or(false)
    }
    /// Return true if a codec able to encode this format is present.
    pub fn has_encoder(self) -> bool
    {
        self.get_codec()
            .map(|codec| codec.supports_compress())
            .unwrap_or(false)
    }

    /// Get the codec of this format with the default options.
    pub fn get_codec(self) -> Result<Box<dyn CodecTrait>, CodecErrors>
    {
        self.get_codec_with_options(CodecOptions::default())
    }

    /// Get the codec of this format with the given options.
    pub fn get_codec_with_options(
        self, options: CodecOptions
    ) -> Result<Box<dyn CodecTrait>, CodecErrors>
    {
        match self
        {
            CompressionFormat::Lz10 =>
            {
                #[cfg(feature = "lz")]
                {
                    Ok(Box::new(lz10::Lz10Codec::new_with_options(options)))
                }
                #[cfg(not(feature = "lz"))]
                {
                    Err(CodecErrors::FeatureNotIncluded(self))
                }
            }
            CompressionFormat::Lz11 =>
            {
                #[cfg(feature = "lz")]
                {
                    Ok(Box::new(lz11::Lz11Codec::new_with_options(options)))
                }
                #[cfg(not(feature = "lz"))]
                {
                    Err(CodecErrors::FeatureNotIncluded(self))
                }
            }
            CompressionFormat::LzOverlay =>
            {
                #[cfg(feature = "lz")]
                {
                    Ok(Box::new(lzovl::LzOvlCodec::new_with_options(options)))
                }
                #[cfg(not(feature = "lz"))]
                {
                    Err(CodecErrors::FeatureNotIncluded(self))
                }
            }
            CompressionFormat::Rle =>
            {
                #[cfg(feature = "rle")]
                {
                    Ok(Box::new(rle::RleCodec::new_with_options(options)))
                }
                #[cfg(not(feature = "rle"))]
                {
                    Err(CodecErrors::FeatureNotIncluded(self))
                }
            }
            CompressionFormat::Huffman4 =>
            {
                #[cfg(feature = "huffman")]
                {
                    Ok(Box::new(huffman::Huffman4Codec::new_with_options(options)))
                }
                #[cfg(not(feature = "huffman"))]
                {
                    Err(CodecErrors::FeatureNotIncluded(self))
                }
            }
            CompressionFormat::Huffman8 =>
            {
                #[cfg(feature = "huffman")]
                {
                    Ok(Box::new(huffman::Huffman8Codec::new_with_options(options)))
                }
                #[cfg(not(feature = "huffman"))]
                {
                    Err(CodecErrors::FeatureNotIncluded(self))
                }
            }
            CompressionFormat::Null => Ok(Box::new(null::NullCodec::new_with_options(options))),
            CompressionFormat::Unknown => Err(CodecErrors::UnknownFormat)
        }
    }
}

/// Every codec the build carries, optionally with the composite
/// codecs appended.
pub fn all_codecs(include_composites: bool) -> Vec<Box<dyn CodecTrait>>
{
    let mut codecs: Vec<Box<dyn CodecTrait>> = Vec::new();

    #[cfg(feature = "lz")]
    {
        codecs.push(Box::new(lz10::Lz10Codec::new()));
        codecs.push(Box::new(lz11::Lz11Codec::new()));
        codecs.push(Box::new(lzovl::LzOvlCodec::new()));
    }
    #[cfg(feature = "rle")]
    {
        codecs.push(Box::new(rle::RleCodec::new()));
    }
    #[cfg(feature = "huffman")]
    {
        codecs.push(Box::new(huffman::Huffman4Codec::new()));
        codecs.push(Box::new(huffman::Huffman8Codec::new()));
    }
    codecs.push(Box::new(null::NullCodec::new()));

    if include_composites
    {
        #[cfg(feature = "huffman")]
        {
            codecs.push(Box::new(CompositeCodec::huffman_any()));
        }
        #[cfg(all(feature = "huffman", feature = "lz"))]
        {
            codecs.push(Box::new(CompositeCodec::gba()));
            codecs.push(Box::new(CompositeCodec::nds()));
        }
    }

    codecs
}

/// Find the codec answering to a command-line flag, composites
/// included.
pub fn codec_by_flag(flag: &str) -> Option<Box<dyn CodecTrait>>
{
    all_codecs(true).into_iter().find(|codec| codec.flag() == flag)
}

/// Guess the format of `data` and decode it.
///
/// # Returns
/// The detected format and the decoded bytes.
pub fn decompress(data: &[u8]) -> Result<(CompressionFormat, Vec<u8>), CodecErrors>
{
    decompress_with_options(data, CodecOptions::default())
}

/// Guess the format of `data` and decode it with the given options.
pub fn decompress_with_options(
    data: &[u8], options: CodecOptions
) -> Result<(CompressionFormat, Vec<u8>), CodecErrors>
{
    let format = CompressionFormat::guess_format(data).ok_or(CodecErrors::UnknownFormat)?;

    trace!("detected format {format:?}");

    let mut codec = format.get_codec_with_options(options)?;

    if !codec.supports_decompress()
    {
        return Err(CodecErrors::NoDecoderForFormat(format));
    }

    let decoded = codec.decompress(data)?;
    Ok((format, decoded))
}

/// Encode `data` into the given format.
pub fn compress(
    data: &[u8], format: CompressionFormat, options: CodecOptions
) -> Result<Vec<u8>, CodecErrors>
{
    let mut codec = format.get_codec_with_options(options)?;

    if !codec.supports_compress()
    {
        return Err(CodecErrors::NoEncoderForFormat(format));
    }

    Ok(codec.compress(data)?)
}
