/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core utilities shared by the ntr family of compression crates
//!
//! This crate carries the pieces every codec needs but no codec owns:
//! a byte-oriented reader and writer over in-memory buffers, the shared
//! decode/encode error taxonomy and the per-call codec options.

pub mod bytestream;
pub mod errors;
pub mod options;
