//! Registry behavior: sniffing, flags, composites and the
//! convenience entry points

use ntr_codecs::codecs::{self, CompressionFormat};
use ntr_codecs::{CodecOptions, CodecTrait, CompositeCodec};

use crate::corpus;

#[test]
fn formats_are_sniffed_from_their_magic()
{
    let body = b"format detection sample";

    for (format, flag) in [
        (CompressionFormat::Lz10, "lz10"),
        (CompressionFormat::Lz11, "lz11"),
        (CompressionFormat::Rle, "rle"),
        (CompressionFormat::Huffman4, "huff4"),
        (CompressionFormat::Huffman8, "huff8"),
        (CompressionFormat::Null, "null")
    ]
    {
        assert_eq!(CompressionFormat::from_flag(flag), Some(format));

        let packed = codecs::compress(body, format, CodecOptions::default()).unwrap();
        assert_eq!(
            CompressionFormat::guess_format(&packed),
            Some(format),
            "sniffing missed {flag}"
        );

        let (detected, out) = codecs::decompress(&packed).unwrap();
        assert_eq!(detected, format);
        assert_eq!(out, body);
    }
}

#[test]
fn garbage_is_not_recognized()
{
    assert_eq!(CompressionFormat::guess_format(&[0xFE, 0xDC, 0xBA]), None);
    assert!(codecs::decompress(&[0xFE, 0xDC, 0xBA, 0x98, 0x76]).is_err());
}

#[test]
fn every_flag_resolves_to_its_codec()
{
    for flag in ["lz10", "lz11", "lzovl", "rle", "huff4", "huff8", "null", "huff", "gba*", "nds*"]
    {
        let codec = codecs::codec_by_flag(flag).unwrap_or_else(|| panic!("no codec for {flag}"));
        assert_eq!(codec.flag(), flag);
    }
    assert!(codecs::codec_by_flag("zip").is_none());
}

#[test]
fn codec_listing_separates_composites()
{
    let plain = codecs::all_codecs(false);
    let with_composites = codecs::all_codecs(true);

    assert_eq!(plain.len(), 7);
    assert_eq!(with_composites.len(), 10);
}

#[test]
fn null_codec_is_the_identity()
{
    let mut null = codecs::codec_by_flag("null").unwrap();

    for (name, data) in corpus()
    {
        let packed = null.compress(&data).unwrap();
        assert_eq!(packed.len(), data.len() + if data.is_empty() { 8 } else { 4 });
        assert_eq!(null.decompress(&packed).unwrap(), data, "NULL corrupted {name:?}");
    }
}

#[test]
fn composites_round_trip_the_corpus()
{
    for composite in [CompositeCodec::gba(), CompositeCodec::nds()]
    {
        let mut composite = composite;

        for (name, data) in corpus()
        {
            let packed = composite.compress(&data).unwrap();
            let out = composite.decompress(&packed).unwrap();
            assert_eq!(
                out,
                data,
                "{} corrupted {name:?} (used {:?})",
                composite.short_name(),
                composite.last_used()
            );
        }
    }
}

#[test]
fn composite_output_is_the_member_minimum()
{
    let mut composite = CompositeCodec::nds();
    let member_flags = ["huff4", "huff8", "lz10", "lz11"];

    for (name, data) in corpus()
    {
        let packed = composite.compress(&data).unwrap();

        for flag in member_flags
        {
            let other = codecs::codec_by_flag(flag).unwrap().compress(&data).unwrap();
            assert!(
                packed.len() <= other.len(),
                "composite lost to {flag} on {name:?}"
            );
        }
    }
}

#[test]
fn lookahead_option_is_claimed_by_lz_codecs_only()
{
    for (flag, consumed) in [
        ("lz10", 1),
        ("lz11", 1),
        ("lzovl", 1),
        ("rle", 0),
        ("huff4", 0),
        ("huff8", 0),
        ("null", 0),
        ("gba*", 1),
        ("nds*", 1)
    ]
    {
        let mut codec = codecs::codec_by_flag(flag).unwrap();
        assert_eq!(
            codec.parse_options(&["-opt", "file.bin"]),
            consumed,
            "flag {flag} mis-parsed -opt"
        );
        assert_eq!(codec.parse_options(&["file.bin"]), 0);
    }
}

#[test]
fn composite_with_options_compresses_no_worse()
{
    let data = b"abcabcabcabc abcabc xyzxyz abcabcabc".repeat(12);

    let mut plain = CompositeCodec::nds();
    let mut tuned = CompositeCodec::nds();
    assert_eq!(tuned.parse_options(&["-opt"]), 1);

    let baseline = plain.compress(&data).unwrap();
    let improved = tuned.compress(&data).unwrap();
    assert!(improved.len() <= baseline.len());
}
