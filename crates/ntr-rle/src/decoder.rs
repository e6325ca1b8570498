//! Run-length decoder

use log::{debug, warn};
use ntr_core::bytestream::ByteReader;
use ntr_core::errors::{DecodeErrorStatus, DecodeErrors};
use ntr_core::options::CodecOptions;

use crate::RLE_MAGIC;

/// Return true if `data` plausibly starts a run-length stream.
pub fn probe_rle(data: &[u8]) -> bool
{
    data.len() >= 4 && data[0] == RLE_MAGIC
}

/// Decoder for the run-length format.
pub struct RleDecoder<'a>
{
    stream:  ByteReader<'a>,
    options: CodecOptions
}

impl<'a> RleDecoder<'a>
{
    /// Create a new decoder with the default options.
    pub fn new(data: &'a [u8]) -> RleDecoder<'a>
    {
        RleDecoder::new_with_options(CodecOptions::default(), data)
    }
    /// Create a new decoder that obeys the specified restrictions.
    pub fn new_with_options(options: CodecOptions, data: &'a [u8]) -> RleDecoder<'a>
    {
        RleDecoder {
            stream: ByteReader::new(data),
            options
        }
    }
    /// Decompress the stream, returning the decoded bytes.
    pub fn decode(&mut self) -> Result<Vec<u8>, DecodeErrors>
    {
        if !self.stream.has(4)
        {
            return Err(DecodeErrors::new_with_error(
                DecodeErrorStatus::StreamTooShort
            ));
        }

        let magic = self.stream.get_u8();

        if magic != RLE_MAGIC
        {
            return Err(DecodeErrors::new_with_error(DecodeErrorStatus::InvalidData(
                Some(0),
                format!("expected magic {RLE_MAGIC:#04x} but found {magic:#04x}")
            )));
        }

        let mut size = self.stream.get_u24_le() as usize;

        if size == 0
        {
            match self.stream.get_u32_le_err()
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

        debug!("RLE: expecting {size} decompressed bytes");

        let mut out = Vec::with_capacity(size);

        while out.len() < size
        {
            let flag = match self.stream.get_u8_err()
            {
                Ok(byte) => byte,
                Err(_) =>
                {
                    return Err(DecodeErrors::new(
                        DecodeErrorStatus::NotEnoughData(out.len(), size),
                        out
                    ))
                }
            };

            if flag & 0x80 != 0
            {
                let length = usize::from(flag & 0x7F) + 3;
                let byte = match self.stream.get_u8_err()
                {
                    Ok(byte) => byte,
                    Err(_) =>
                    {
                        return Err(DecodeErrors::new(
                            DecodeErrorStatus::NotEnoughData(out.len(), size),
                            out
                        ))
                    }
                };

                for _ in 0..length
                {
                    if out.len() >= size
                    {
                        break;
                    }
                    out.push(byte);
                }
            }
            else
            {
                let length = usize::from(flag & 0x7F) + 1;

                if !self.stream.has(length)
                {
                    return Err(DecodeErrors::new(
                        DecodeErrorStatus::NotEnoughData(out.len(), size),
                        out
                    ));
                }
                for _ in 0..length
                {
                    if out.len() >= size
                    {
                        break;
                    }
                    let byte = self.stream.get_u8();
                    out.push(byte);
                }
            }
        }

        // tolerate padding up to the next 4-byte boundary only
        let consumed = self.stream.position();
        let aligned_end = (consumed & !3) + 4;

        if self.stream.len() > aligned_end
        {
            let status =
                DecodeErrorStatus::TooMuchInput(self.stream.len() - consumed, out.len());
            warn!("RLE: {status:?}");
            return Err(DecodeErrors::new(status, out));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests
{
    use super::RleDecoder;

    #[test]
    fn run_and_literals_decode()
    {
        let data = [0x30, 0x07, 0x00, 0x00, 0x82, 0x41, 0x01, 0x42, 0x43];
        let out = RleDecoder::new(&data).decode().unwrap();
        assert_eq!(out, b"AAAAABC");
    }

    #[test]
    fn surplus_input_is_flagged_but_decoded()
    {
        // declared length stops inside the run; the literal chunk
        // after it is never needed
        let data = [0x30, 0x05, 0x00, 0x00, 0x82, 0x41, 0x01, 0x42, 0x43, 0x00, 0x00, 0x00, 0x00];
        let err = RleDecoder::new(&data).decode().unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.data, b"AAAAA");
    }

    #[test]
    fn truncated_run_errors()
    {
        let data = [0x30, 0x09, 0x00, 0x00, 0x82, 0x41];
        let err = RleDecoder::new(&data).decode().unwrap_err();
        assert!(!err.is_recoverable());
    }
}
