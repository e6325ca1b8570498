//! LZ10 and LZ11 round trips and stream-shape checks

use ntr_codecs::codecs::CompressionFormat;
use ntr_codecs::{CodecOptions, CodecTrait};

use crate::corpus;

fn codec(format: CompressionFormat, lookahead: bool) -> Box<dyn CodecTrait>
{
    let options = CodecOptions::default().set_lookahead(lookahead);
    format.get_codec_with_options(options).unwrap()
}

fn roundtrip(format: CompressionFormat, lookahead: bool)
{
    let mut handle = codec(format, lookahead);

    for (name, data) in corpus()
    {
        let packed = handle.compress(&data).unwrap();
        let out = handle.decompress(&packed).unwrap();
        assert_eq!(out.len(), data.len(), "{format:?} length drifted on {name:?}");
        assert_eq!(out, data, "{format:?} corrupted {name:?}");
    }
}

#[test]
fn lz10_round_trips_the_corpus()
{
    roundtrip(CompressionFormat::Lz10, false);
    roundtrip(CompressionFormat::Lz10, true);
}

#[test]
fn lz11_round_trips_the_corpus()
{
    roundtrip(CompressionFormat::Lz11, false);
    roundtrip(CompressionFormat::Lz11, true);
}

#[test]
fn exhaustive_parse_never_loses_to_greedy()
{
    for format in [CompressionFormat::Lz10, CompressionFormat::Lz11]
    {
        let mut greedy = codec(format, false);
        let mut optimal = codec(format, true);

        for (name, data) in corpus()
        {
            let plain = greedy.compress(&data).unwrap();
            let best = optimal.compress(&data).unwrap();
            assert!(
                best.len() <= plain.len(),
                "{format:?} lookahead grew {name:?} from {} to {} bytes",
                plain.len(),
                best.len()
            );
        }
    }
}

/// Walk an LZ10 stream asserting every back-reference stays inside
/// the window and behind the write cursor.
fn check_lz10_displacements(packed: &[u8])
{
    let size = usize::from(packed[1])
        | (usize::from(packed[2]) << 8)
        | (usize::from(packed[3]) << 16);
    let mut pos = 4;
    let mut written = 0_usize;

    while written < size
    {
        let flags = packed[pos];
        pos += 1;

        for i in 0..8
        {
            if written >= size
            {
                break;
            }
            if flags & (0x80 >> i) == 0
            {
                pos += 1;
                written += 1;
                continue;
            }
            let b1 = usize::from(packed[pos]);
            let b2 = usize::from(packed[pos + 1]);
            pos += 2;

            let length = (b1 >> 4) + 3;
            let disp = (((b1 & 0xF) << 8) | b2) + 1;

            assert!(length >= 3);
            assert!(disp >= 1, "zero displacement emitted");
            assert!(disp <= written, "displacement {disp} with {written} written");
            assert!(disp <= 0x1000, "displacement {disp} outside the window");
            written += length;
        }
    }
}

#[test]
fn emitted_back_references_stay_in_the_window()
{
    for lookahead in [false, true]
    {
        let mut handle = codec(CompressionFormat::Lz10, lookahead);

        for (_, data) in corpus()
        {
            let packed = handle.compress(&data).unwrap();
            check_lz10_displacements(&packed);
        }
    }
}

#[test]
fn known_lz10_streams_decode()
{
    let mut handle = codec(CompressionFormat::Lz10, false);

    // flag byte of zero: eight literal slots
    let all_literals = [0x10, 0x05, 0x00, 0x00, 0x00, 0x41, 0x42, 0x43, 0x44, 0x45];
    assert_eq!(handle.decompress(&all_literals).unwrap(), b"ABCDE");

    // one literal then a run-of-pattern match at displacement one
    let pattern_run = [0x10, 0x06, 0x00, 0x00, 0x40, 0x41, 0x20, 0x00];
    assert_eq!(handle.decompress(&pattern_run).unwrap(), b"AAAAAA");
}

#[test]
fn oversized_inputs_are_rejected_before_writing()
{
    let data = vec![0_u8; 0x100_0000];

    for format in [CompressionFormat::Lz10, CompressionFormat::Lz11]
    {
        let error = codec(format, false).compress(&data).unwrap_err();
        assert!(
            matches!(error, ntr_codecs::EncodeErrors::InputTooLarge(0x100_0000, 0xFF_FFFF)),
            "{format:?} accepted an input its header cannot describe"
        );
    }
}
