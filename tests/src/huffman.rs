//! Huffman round trips and serialized-tree checks

use ntr_codecs::codecs::CompressionFormat;
use ntr_codecs::{CodecTrait, DecodeErrorStatus};

use crate::corpus;

fn roundtrip(format: CompressionFormat)
{
    let mut handle = format.get_codec().unwrap();

    for (name, data) in corpus()
    {
        let packed = handle.compress(&data).unwrap();
        let out = handle.decompress(&packed).unwrap();
        assert_eq!(out, data, "{format:?} corrupted {name:?}");
    }
}

#[test]
fn huffman4_round_trips_the_corpus()
{
    roundtrip(CompressionFormat::Huffman4);
}

#[test]
fn huffman8_round_trips_the_corpus()
{
    roundtrip(CompressionFormat::Huffman8);
}

/// Walk a serialized tree table checking structure: every internal
/// node keeps its children inside the table and within the 6-bit
/// offset, and 4-bit streams carry nibble-clean leaves.
fn check_tree_table(packed: &[u8], four_bit: bool)
{
    let tree_offset = 4;
    let table_span = (usize::from(packed[tree_offset]) + 1) * 2;
    let tree_end = tree_offset + table_span;

    // (address, is_leaf) pairs pending a visit, rooted at the first
    // node byte
    let mut pending = vec![(tree_offset + 1, false)];

    while let Some((addr, is_leaf)) = pending.pop()
    {
        assert!(addr < tree_end, "node address escapes the table");

        let byte = packed[addr];

        if is_leaf
        {
            if four_bit
            {
                assert!(byte <= 0xF, "4-bit leaf {byte:#04x} has its high nibble set");
            }
            continue;
        }

        let offset = usize::from(byte & 0x3F);
        assert!(offset <= 0x3F);

        let child0 = (addr & !1) + 2 * offset + 2;
        pending.push((child0, byte & 0x80 != 0));
        pending.push((child0 + 1, byte & 0x40 != 0));
    }
}

#[test]
fn serialized_trees_respect_the_offset_field()
{
    for (format, four_bit) in [
        (CompressionFormat::Huffman4, true),
        (CompressionFormat::Huffman8, false)
    ]
    {
        let mut handle = format.get_codec().unwrap();

        for (name, data) in corpus()
        {
            let packed = handle.compress(&data).unwrap();
            check_tree_table(&packed, four_bit);
        }
    }
}

#[test]
fn deep_uneven_alphabet_still_lays_out()
{
    // frequency ramp over all 256 values: a lopsided tree whose
    // serialization has to spread parents and children carefully
    let mut data = Vec::new();
    for value in 0..=255_u16
    {
        data.extend(std::iter::repeat(value as u8).take(usize::from(value) * 3 + 1));
    }

    let mut handle = CompressionFormat::Huffman8.get_codec().unwrap();
    let packed = handle.compress(&data).unwrap();
    check_tree_table(&packed, false);
    assert_eq!(handle.decompress(&packed).unwrap(), data);
}

#[test]
fn trailing_words_are_reported_but_decoded()
{
    let data = b"huffman streams end on a word boundary";
    let mut handle = CompressionFormat::Huffman8.get_codec().unwrap();
    let mut packed = handle.compress(data).unwrap();

    // stray extra words past the final one, beyond any alignment
    // slack
    packed.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);

    let error = handle.decompress(&packed).unwrap_err();
    assert!(matches!(
        error.error,
        DecodeErrorStatus::TooMuchInput(_, _)
    ));
    assert_eq!(error.data, data);
}
