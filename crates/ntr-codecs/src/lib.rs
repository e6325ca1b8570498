/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Codec registry and composite codecs for GBA/NDS compression
//! formats
//!
//! This crate ties the individual codec crates together behind one
//! object-safe [`CodecTrait`], identifies streams by their magic
//! bytes via [`CompressionFormat`], and builds the composite codecs
//! that pick the best member for a given input.
//!
//! Codecs can be compiled out through the cargo features `lz`, `rle`
//! and `huffman`; the registry reports missing ones instead of
//! failing to build.

pub mod codecs;
pub mod composite;
pub mod errors;
pub mod traits;

pub use codecs::{all_codecs, codec_by_flag, CompressionFormat};
pub use composite::CompositeCodec;
pub use ntr_core::errors::{DecodeErrorStatus, DecodeErrors, EncodeErrors};
pub use ntr_core::options::CodecOptions;
pub use traits::CodecTrait;
