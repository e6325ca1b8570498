//! The passthrough codec
//!
//! Header byte `0x00` plus the usual 24-bit length (32-bit escape
//! form included), then the body stored verbatim. Exists for
//! completeness and as the floor a composite can compare real codecs
//! against.

use ntr_core::bytestream::{ByteReader, ByteWriter};
use ntr_core::errors::{DecodeErrorStatus, DecodeErrors, EncodeErrors};
use ntr_core::options::CodecOptions;

use crate::traits::CodecTrait;

/// Largest input length the 24-bit header size field can hold.
const MAX_ENCODE_LENGTH: usize = 0xFF_FFFF;

/// Return true if `data` carries a passthrough header whose length
/// agrees with the stream length.
pub fn probe_null(data: &[u8]) -> bool
{
    if data.len() < 4 || data[0] != 0x00
    {
        return false;
    }

    let mut stream = ByteReader::new(data);
    stream.skip(1);

    let size = stream.get_u24_le() as usize;

    if size == 0
    {
        match stream.get_u32_le_err()
        {
            Ok(wide) => wide as usize == data.len() - 8,
            Err(_) => false
        }
    }
    else
    {
        size == data.len() - 4
    }
}

/// The verbatim-storage codec.
pub struct NullCodec
{
    options: CodecOptions
}

impl NullCodec
{
    pub fn new() -> NullCodec
    {
        NullCodec::new_with_options(CodecOptions::default())
    }
    pub const fn new_with_options(options: CodecOptions) -> NullCodec
    {
        NullCodec { options }
    }
}

impl Default for NullCodec
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl CodecTrait for NullCodec
{
    fn short_name(&self) -> &'static str
    {
        "NULL"
    }
    fn description(&self) -> &'static str
    {
        "Uncompressed storage behind a standard length header"
    }
    fn flag(&self) -> &'static str
    {
        "null"
    }
    fn supports(&self, data: &[u8]) -> bool
    {
        probe_null(data)
    }
    fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>, DecodeErrors>
    {
        let mut stream = ByteReader::new(data);

        if !stream.has(4)
        {
            return Err(DecodeErrors::new_with_error(
                DecodeErrorStatus::StreamTooShort
            ));
        }

        let magic = stream.get_u8();

        if magic != 0x00
        {
            return Err(DecodeErrors::new_with_error(DecodeErrorStatus::InvalidData(
                Some(0),
                format!("expected magic 0x00 but found {magic:#04x}")
            )));
        }

        let mut size = stream.get_u24_le() as usize;

        if size == 0
        {
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

        if size > self.options.get_max_output_size()
        {
            return Err(DecodeErrors::new_with_error(
                DecodeErrorStatus::OutputLimitExceeded(self.options.get_max_output_size(), size)
            ));
        }

        if stream.remaining() < size
        {
            return Err(DecodeErrors::new_with_error(DecodeErrorStatus::NotEnoughData(
                stream.remaining(),
                size
            )));
        }

        let out = stream.get_as_ref(size).unwrap().to_vec();

        if stream.remaining() > 0
        {
            return Err(DecodeErrors::new(
                DecodeErrorStatus::TooMuchInput(stream.remaining(), out.len()),
                out
            ));
        }

        Ok(out)
    }
    fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, EncodeErrors>
    {
        if data.len() > MAX_ENCODE_LENGTH
        {
            return Err(EncodeErrors::InputTooLarge(data.len(), MAX_ENCODE_LENGTH));
        }

        let mut buffer = vec![0_u8; data.len() + 8];
        let mut stream = ByteWriter::new(&mut buffer);

        stream.write_u8(0x00);

        if data.is_empty()
        {
            stream.write_u24_le(0);
            stream.write_u32_le(0);
        }
        else
        {
            stream.write_u24_le(data.len() as u32);
        }

        let _ = stream.write_all(data);

        let written = stream.position();
        buffer.truncate(written);

        Ok(buffer)
    }
}
