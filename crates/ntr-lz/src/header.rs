//! Stream header helpers shared by the forward LZ codecs
//!
//! The header is four bytes: the magic byte and a 24-bit little-endian
//! decompressed length. A zero length is an escape meaning the real
//! length follows as a full 32-bit little-endian word.

use ntr_core::bytestream::{ByteReader, ByteWriter};
use ntr_core::errors::{DecodeErrorStatus, DecodeErrors};
use ntr_core::options::CodecOptions;

/// Read and validate a magic + length header, returning the declared
/// decompressed length.
pub(crate) fn read_header(
    stream: &mut ByteReader, magic: u8, options: &CodecOptions
) -> Result<usize, DecodeErrors>
{
    if !stream.has(4)
    {
        return Err(DecodeErrors::new_with_error(
            DecodeErrorStatus::StreamTooShort
        ));
    }

    let found = stream.get_u8();

    if found != magic
    {
        return Err(DecodeErrors::new_with_error(DecodeErrorStatus::InvalidData(
            Some(0),
            format!("expected magic {magic:#04x} but found {found:#04x}")
        )));
    }

    let mut size = stream.get_u24_le() as usize;

    if size == 0
    {
        // the escape form, used for data the 24-bit field cannot hold
        match stream.get_u32_le_err()
        {
            Ok(wide) => size = wide as usize,
            Err(_) =>
            {
                return Err(DecodeErrors::new_with_error(
                    DecodeErrorStatus::StreamTooShort
                ))
            }
        }
    }

    if size > options.get_max_output_size()
    {
        return Err(DecodeErrors::new_with_error(
            DecodeErrorStatus::OutputLimitExceeded(options.get_max_output_size(), size)
        ));
    }

    Ok(size)
}

/// Write a magic + length header.
///
/// A zero length is written in the escaped eight-byte form so the
/// matching reader does not misread it as a 32-bit length marker.
pub(crate) fn write_header(stream: &mut ByteWriter, magic: u8, length: usize)
{
    stream.write_u8(magic);

    if length == 0
    {
        stream.write_u24_le(0);
        stream.write_u32_le(0);
    }
    else
    {
        stream.write_u24_le(length as u32);
    }
}

/// Check for unread input past the decode end, tolerating padding up
/// to the next 4-byte boundary.
pub(crate) fn check_trailing(stream: &ByteReader, decoded: usize) -> Option<DecodeErrorStatus>
{
    let consumed = stream.position();
    let aligned_end = (consumed & !3) + 4;

    if stream.len() > aligned_end
    {
        return Some(DecodeErrorStatus::TooMuchInput(
            stream.len() - consumed,
            decoded
        ));
    }
    None
}

#[cfg(test)]
mod tests
{
    use ntr_core::bytestream::{ByteReader, ByteWriter};
    use ntr_core::options::CodecOptions;

    use super::{read_header, write_header};

    #[test]
    fn header_round_trip()
    {
        let options = CodecOptions::default();

        for length in [1_usize, 0xFF, 0x1234, 0xFF_FFFF]
        {
            let mut buf = [0_u8; 8];
            let mut writer = ByteWriter::new(&mut buf);
            write_header(&mut writer, 0x10, length);
            assert_eq!(writer.position(), 4);

            let mut reader = ByteReader::new(&buf);
            assert_eq!(read_header(&mut reader, 0x10, &options).unwrap(), length);
        }
    }

    #[test]
    fn zero_length_uses_escape_form()
    {
        let options = CodecOptions::default();

        let mut buf = [0_u8; 8];
        let mut writer = ByteWriter::new(&mut buf);
        write_header(&mut writer, 0x11, 0);
        assert_eq!(writer.position(), 8);

        let mut reader = ByteReader::new(&buf);
        assert_eq!(read_header(&mut reader, 0x11, &options).unwrap(), 0);
    }

    #[test]
    fn wrong_magic_is_rejected()
    {
        let options = CodecOptions::default();
        let mut reader = ByteReader::new(&[0x30, 0x05, 0x00, 0x00]);
        assert!(read_header(&mut reader, 0x10, &options).is_err());
    }
}
