//! Run-length round trips and known streams

use ntr_codecs::codecs::CompressionFormat;
use ntr_codecs::CodecTrait;

use crate::corpus;

#[test]
fn rle_round_trips_the_corpus()
{
    let mut handle = CompressionFormat::Rle.get_codec().unwrap();

    for (name, data) in corpus()
    {
        let packed = handle.compress(&data).unwrap();
        let out = handle.decompress(&packed).unwrap();
        assert_eq!(out, data, "RLE corrupted {name:?}");
    }
}

#[test]
fn known_rle_stream_decodes()
{
    let mut handle = CompressionFormat::Rle.get_codec().unwrap();

    // a five-byte run then two literals
    let data = [0x30, 0x07, 0x00, 0x00, 0x82, 0x41, 0x01, 0x42, 0x43];
    assert_eq!(handle.decompress(&data).unwrap(), b"AAAAABC");
}

#[test]
fn worst_case_alternation_stays_within_bounds()
{
    // 2-byte repeats never reach the run threshold, making this pure
    // literal chunks plus flags
    let data: Vec<u8> = (0..4096_u32).flat_map(|i| [(i & 1) as u8; 2]).collect();

    let mut handle = CompressionFormat::Rle.get_codec().unwrap();
    let packed = handle.compress(&data).unwrap();

    // header + data + one flag byte per 128 literals
    assert!(packed.len() <= 4 + data.len() + data.len().div_ceil(128) + 4);
    assert_eq!(handle.decompress(&packed).unwrap(), data);
}

#[test]
fn oversized_inputs_are_rejected_before_writing()
{
    let data = vec![0_u8; 0x100_0000];
    let error = CompressionFormat::Rle
        .get_codec()
        .unwrap()
        .compress(&data)
        .unwrap_err();
    assert!(matches!(
        error,
        ntr_codecs::EncodeErrors::InputTooLarge(_, _)
    ));
}
