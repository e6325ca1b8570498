//! Overlay (backwards LZ) decode behavior through the registry

use ntr_codecs::codecs::CompressionFormat;
use ntr_codecs::{CodecOptions, CodecTrait, EncodeErrors};

/// A hand-assembled stream: verbatim prefix, a backwards region of
/// three literals plus a long match, and the trailer.
const SAMPLE: [u8; 20] = [
    0x58, 0x59, // verbatim prefix "XY"
    0x00, 0x40, 0x41, 0x41, 0x41, 0x08, // region, stored back to front
    0xFF, 0xFF, 0xFF, 0xFF, // padding
    0x06, 0x00, 0x00, // compressed length
    0x0C, // trailer size
    0x04, 0x00, 0x00, 0x00 // extra size
];

#[test]
fn trailer_padding_must_be_ff()
{
    let mut handle = CompressionFormat::LzOverlay.get_codec().unwrap();

    assert!(handle.supports(&SAMPLE));
    assert_eq!(handle.decompress(&SAMPLE).unwrap(), b"XYAAAAAAAAAA");

    let mut broken = SAMPLE;
    broken[9] = 0x00; // inside the padding span
    assert!(!handle.supports(&broken));
    assert!(handle.decompress(&broken).is_err());
}

#[test]
fn zero_extra_size_copies_verbatim()
{
    let mut handle = CompressionFormat::LzOverlay.get_codec().unwrap();

    let mut data = b"plain binary with no compression".to_vec();
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let out = handle.decompress(&data).unwrap();
    assert_eq!(out.len(), data.len() - 4);
    assert_eq!(out, &data[..data.len() - 4]);
}

#[test]
fn overlay_reports_no_encoder()
{
    let mut handle = CompressionFormat::LzOverlay.get_codec().unwrap();

    assert!(!handle.supports_compress());
    assert!(matches!(
        handle.compress(b"anything").unwrap_err(),
        EncodeErrors::Unsupported(_)
    ));
}

#[test]
fn strict_mode_is_respected_through_the_registry()
{
    // a match with only two bytes written relies on the displacement
    // substitution; strict mode refuses it
    let quirky = [
        0x00, 0x30, 0x41, 0x42, 0x04, //
        0xFF, 0xFF, 0xFF, 0xFF, //
        0x05, 0x00, 0x00, //
        0x0C, //
        0x03, 0x00, 0x00, 0x00
    ];

    let mut lenient = CompressionFormat::LzOverlay.get_codec().unwrap();
    assert_eq!(lenient.decompress(&quirky).unwrap(), b"ABABABAB");

    let strict_options = CodecOptions::default().set_strict_mode(true);
    let mut strict = CompressionFormat::LzOverlay
        .get_codec_with_options(strict_options)
        .unwrap();
    assert!(strict.decompress(&quirky).is_err());
}
