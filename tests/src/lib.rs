/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Cross-codec integration tests
//!
//! The per-crate unit tests pin down format details; the tests here
//! drive whole codecs through the registry over a shared corpus of
//! adversarial inputs and check the properties every codec promises:
//! byte-identical round trips, exact decoded lengths and the
//! cross-codec behaviors of the composites.

#![allow(unused)]

use nanorand::{Rng, WyRand};

mod codecs;
mod huffman;
mod lz;
mod overlay;
mod rle;

/// Named inputs stressing the places codecs differ: window handling,
/// run handling, flag packing, nibble asymmetry and the
/// one-past-a-boundary sizes.
pub fn corpus() -> Vec<(&'static str, Vec<u8>)>
{
    let mut rng = WyRand::new_seed(0x05EED);
    let mut entries: Vec<(&'static str, Vec<u8>)> = vec![
        ("empty", Vec::new()),
        ("single byte", vec![0x42]),
        ("two equal bytes", vec![0x42, 0x42]),
        ("long run", vec![0x00; 5000]),
        ("runs of runs", {
            let mut data = Vec::new();
            for byte in 0..32_u8
            {
                data.extend(std::iter::repeat(byte).take(1 + usize::from(byte) * 7));
            }
            data
        }),
        ("repeated phrase", b"well-compressed data compresses well ".repeat(40)),
        ("nibble asymmetric", {
            // high nibble always 0xA, low nibble varied
            let mut data = vec![0_u8; 2000];
            rng.fill(&mut data);
            data.iter_mut().for_each(|b| *b = 0xA0 | (*b & 0xF));
            data
        }),
    ];

    let mut incompressible = vec![0_u8; 4096];
    rng.fill(&mut incompressible);
    entries.push(("incompressible", incompressible));

    for exponent in [4_usize, 8, 12]
    {
        let base = 1 << exponent;
        for size in [base - 1, base, base + 1]
        {
            let mut data = vec![0_u8; size];
            rng.fill(&mut data);
            // fold in some repetition so matches exist
            if size > 64
            {
                let (head, tail) = data.split_at_mut(size / 2);
                tail[..32].copy_from_slice(&head[..32]);
            }
            entries.push(("around a power of two", data));
        }
    }

    entries
}
