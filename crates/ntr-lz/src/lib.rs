/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! LZ77-family codecs for GBA/NDS byte streams
//!
//! Three related formats live here:
//!
//! - [`Lz10Decoder`]/[`Lz10Encoder`]: the classic forward format
//!   (magic `0x10`), fixed two-byte back-references.
//! - [`Lz11Decoder`]/[`Lz11Encoder`]: the extended forward format
//!   (magic `0x11`), two/three/four-byte back-references selected by an
//!   indicator nibble.
//! - [`LzOvlDecoder`]: the end-of-file variant used by overlay
//!   binaries, which stores its header as a trailer and decompresses
//!   backwards. It has no encoder.
//!
//! The forward encoders share one match finder and one exhaustive
//! parse, selected per call through
//! [`CodecOptions::set_lookahead`](ntr_core::options::CodecOptions::set_lookahead).

pub use lz10::{probe_lz10, Lz10Decoder, Lz10Encoder};
pub use lz11::{probe_lz11, Lz11Decoder, Lz11Encoder};
pub use lzovl::{probe_lzovl, LzOvlDecoder};

pub mod constants;
mod header;
mod lz10;
mod lz11;
mod lzovl;
pub mod matcher;
